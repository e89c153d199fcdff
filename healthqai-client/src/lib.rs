//! Client-side interaction controller for the HealthQAI service: symptom
//! based diagnosis, sign-in, and authenticated health questions.

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prober;
pub mod session;
pub mod storage;
pub mod view;
pub mod workflow;
pub mod workflows;

// Re-export commonly used types
pub use config::ClientConfig;
pub use controller::ViewController;
pub use error::{ClientError, ErrorKind, Result};
pub use models::{DiagnosisResult, Gender, QaResult, SymptomForm, SymptomReport};
pub use pipeline::{ApiRequest, RequestPipeline};
pub use session::{Session, SessionStore};
pub use storage::{FileSessionStorage, InMemorySessionStorage, SessionStorage};
pub use view::{DisplayState, Tab, ViewState};
pub use workflow::Workflow;
pub use workflows::{AuthWorkflow, DiagnosisWorkflow, QaWorkflow};
