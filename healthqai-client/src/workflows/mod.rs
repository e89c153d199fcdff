pub mod auth;
pub mod diagnosis;
pub mod qa;

pub use auth::AuthWorkflow;
pub use diagnosis::DiagnosisWorkflow;
pub use qa::QaWorkflow;
