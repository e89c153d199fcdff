use thiserror::Error;

/// Classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local pre-flight check failed; nothing was sent.
    Validation,
    /// Transport-level failure.
    Unreachable,
    /// The service answered with a non-success status.
    Rejected,
    /// The service succeeded but the payload is unusable.
    InvalidResponse,
    /// A credential is needed and none is held.
    AuthenticationRequired,
    /// Another request is still in flight.
    Busy,
    Storage,
    Config,
}

/// Errors raised by the client. The `Display` text is what ends up in
/// `ViewState::error`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Unable to reach the service: {0}")]
    Unreachable(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    InvalidResponse(String),

    #[error("Please login to ask questions")]
    AuthenticationRequired,

    #[error("Another request is already in progress")]
    Busy,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Unreachable(_) => ErrorKind::Unreachable,
            ClientError::Rejected { .. } => ErrorKind::Rejected,
            ClientError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ClientError::AuthenticationRequired => ErrorKind::AuthenticationRequired,
            ClientError::Busy => ErrorKind::Busy,
            ClientError::Storage(_) => ErrorKind::Storage,
            ClientError::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the service refused the bearer credential.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 401 | 403, .. })
    }

    pub(crate) fn invalid_response() -> Self {
        ClientError::InvalidResponse("Invalid response from server".to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
