use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{ClientError, Result};
use crate::models::{Credentials, TokenResponse, UserResponse};
use crate::pipeline::{ApiRequest, RequestPipeline};
use crate::session::{Session, SessionStore};
use crate::workflow::Workflow;

/// Obtains a token from `POST /token`, then looks up the caller's role.
#[derive(Clone)]
pub struct AuthWorkflow {
    pipeline: RequestPipeline,
    session: Arc<SessionStore>,
}

impl AuthWorkflow {
    pub fn new(pipeline: RequestPipeline, session: Arc<SessionStore>) -> Self {
        Self { pipeline, session }
    }

    /// Local only: forget token and role.
    pub async fn logout(&self) {
        self.session.clear().await;
        info!("Logged out");
    }

    /// Look up the role for the held token if it is not known yet. Failures
    /// leave the session authenticated with an unknown role.
    pub async fn refresh_role(&self) {
        let session = self.session.snapshot().await;
        let Some(token) = session.token else {
            return;
        };
        if session.role.is_some() {
            return;
        }
        self.lookup_role(&token).await;
    }

    async fn lookup_role(&self, token: &str) {
        let request = ApiRequest::get("/users/me/").with_bearer(token);
        match self.pipeline.send::<UserResponse>(request).await {
            Ok(UserResponse { role: Some(role) }) if !role.trim().is_empty() => {
                info!("Signed in with role {}", role);
                self.session.set_role(role).await;
            }
            Ok(_) => warn!("User lookup returned no role"),
            Err(e) => warn!("User lookup failed, role unknown: {}", e),
        }
    }
}

#[async_trait]
impl Workflow for AuthWorkflow {
    type Input = (String, String);
    type Request = Credentials;
    type Output = Session;

    fn id(&self) -> &str {
        "auth"
    }

    async fn prepare(&self, input: (String, String)) -> Result<Credentials> {
        let (username, password) = input;
        Credentials::new(&username, &password)
    }

    async fn run(&self, credentials: Credentials) -> Result<Session> {
        info!("Logging in as {}", credentials.username);

        let request = ApiRequest::post_form("/token", credentials.form_fields());
        let response: TokenResponse = self.pipeline.send(request).await.map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;

        let token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                error!("Token payload has no access_token");
                ClientError::invalid_response()
            })?;

        self.session.set_token(token.clone()).await?;
        self.lookup_role(&token).await;

        Ok(self.session.snapshot().await)
    }
}
