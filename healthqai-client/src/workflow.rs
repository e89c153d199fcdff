use async_trait::async_trait;

use crate::error::Result;

/// A user-triggered sequence: local validation, then at most one round of
/// network calls.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Raw input as provided by the user.
    type Input: Send;
    /// Validated request produced by [`Workflow::prepare`].
    type Request: Send;
    type Output: Send;

    /// Unique identifier used in logs
    fn id(&self) -> &str;

    /// Pre-flight checks. Never touches the network.
    async fn prepare(&self, input: Self::Input) -> Result<Self::Request>;

    /// Execute the network part of the workflow.
    async fn run(&self, request: Self::Request) -> Result<Self::Output>;
}
