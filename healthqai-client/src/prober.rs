use tracing::{error, info};

use crate::error::{ClientError, Result};
use crate::models::LivenessResponse;
use crate::pipeline::{ApiRequest, RequestPipeline};

pub const CHECKING_STATUS: &str = "Checking backend...";
pub const FAILED_STATUS: &str = "Backend connection failed";

/// Best-effort liveness check against the service root.
#[derive(Debug, Clone)]
pub struct BackendProber {
    pipeline: RequestPipeline,
}

impl BackendProber {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the text to show as the backend status. Never fails.
    pub async fn probe(&self) -> String {
        match self.check().await {
            Ok(status) => {
                info!("Backend is up: {}", status);
                format!("Backend: {}", status)
            }
            Err(e) => {
                error!("Backend error: {}", e);
                FAILED_STATUS.to_string()
            }
        }
    }

    async fn check(&self) -> Result<String> {
        let response: LivenessResponse = self.pipeline.send(ApiRequest::get("/")).await?;
        response
            .status
            .or(response.message)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(ClientError::invalid_response)
    }
}
