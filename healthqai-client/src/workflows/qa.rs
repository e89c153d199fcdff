use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{ClientError, Result};
use crate::models::{AskResponse, QaResult, Question};
use crate::pipeline::{ApiRequest, RequestPipeline};
use crate::session::SessionStore;
use crate::workflow::Workflow;

/// A question bound to the credential it will be sent with.
#[derive(Clone)]
pub struct AuthorizedQuestion {
    pub question: Question,
    token: String,
}

impl fmt::Debug for AuthorizedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedQuestion")
            .field("question", &self.question)
            .finish_non_exhaustive()
    }
}

/// Sends a free-form question to `POST /ask` on behalf of the signed-in user.
#[derive(Clone)]
pub struct QaWorkflow {
    pipeline: RequestPipeline,
    session: Arc<SessionStore>,
}

impl QaWorkflow {
    pub fn new(pipeline: RequestPipeline, session: Arc<SessionStore>) -> Self {
        Self { pipeline, session }
    }
}

#[async_trait]
impl Workflow for QaWorkflow {
    type Input = String;
    type Request = AuthorizedQuestion;
    type Output = QaResult;

    fn id(&self) -> &str {
        "qa"
    }

    async fn prepare(&self, input: String) -> Result<AuthorizedQuestion> {
        let question = Question::new(&input)?;
        let token = self.session.token().await.ok_or_else(|| {
            warn!("Question submitted without a session");
            ClientError::AuthenticationRequired
        })?;
        Ok(AuthorizedQuestion { question, token })
    }

    async fn run(&self, request: AuthorizedQuestion) -> Result<QaResult> {
        info!("Asking question ({} chars)", request.question.text.chars().count());

        let body = json!({ "question": request.question.text });
        let api_request = ApiRequest::post_json("/ask", body).with_bearer(request.token);

        let response: AskResponse = self.pipeline.send(api_request).await.map_err(|e| {
            if e.is_credential_rejection() {
                warn!("Credential rejected while asking a question: {}", e);
            } else {
                error!("Question error: {}", e);
            }
            e
        })?;

        let answer = response
            .answer
            .filter(|answer| !answer.trim().is_empty())
            .ok_or_else(|| {
                error!("Answer payload has no answer text");
                ClientError::invalid_response()
            })?;

        info!("Answer received");
        Ok(QaResult {
            question: response.question.unwrap_or(request.question.text),
            answer,
            sources: response.sources.unwrap_or_default(),
        })
    }
}
