use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::{DiagnosisResult, QaResult};
use crate::prober::CHECKING_STATUS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Diagnosis,
    Qa,
}

/// What the active tab is showing. Holding exactly one of these is what
/// keeps loading, error and result mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Error(String),
    ShowingDiagnosisResult(DiagnosisResult),
    ShowingQaResult(QaResult),
}

/// Display-relevant state owned by the view controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub display: DisplayState,
    pub backend_status: String,
    /// The login surface should be shown.
    pub login_prompt: bool,
    /// The last question was refused because the credential was rejected.
    pub session_expired: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            display: DisplayState::Idle,
            backend_status: CHECKING_STATUS.to_string(),
            login_prompt: false,
            session_expired: false,
        }
    }
}

impl ViewState {
    pub fn loading(&self) -> bool {
        matches!(self.display, DisplayState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.display {
            DisplayState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn diagnosis_result(&self) -> Option<&DiagnosisResult> {
        match &self.display {
            DisplayState::ShowingDiagnosisResult(result) => Some(result),
            _ => None,
        }
    }

    pub fn qa_result(&self) -> Option<&QaResult> {
        match &self.display {
            DisplayState::ShowingQaResult(result) => Some(result),
            _ => None,
        }
    }

    /// Change tab, dropping whatever the previous tab displayed.
    /// Returns false when `tab` is already active.
    pub(crate) fn switch_tab(&mut self, tab: Tab) -> bool {
        if self.active_tab == tab {
            return false;
        }
        self.active_tab = tab;
        self.display = DisplayState::Idle;
        self.login_prompt = false;
        true
    }

    pub(crate) fn clear_qa_result(&mut self) {
        if matches!(self.display, DisplayState::ShowingQaResult(_)) {
            self.display = DisplayState::Idle;
        }
    }
}

/// Single-holder flag marking a workflow in flight.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    held: Arc<AtomicBool>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the flag, or `None` if another workflow holds it.
    pub fn try_acquire(&self) -> Option<LoadingGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard {
                held: self.held.clone(),
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the [`LoadingFlag`] when dropped.
#[derive(Debug)]
pub struct LoadingGuard {
    held: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
