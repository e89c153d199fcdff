//! ViewController – the top-level state machine that sequences workflows and
//! turns their outcomes into [`ViewState`].
//!
//! Every operation follows the same shape:
//! 1. refuse if another workflow holds the loading flag,
//! 2. run the workflow's local checks (a failure goes straight to `Error`),
//! 3. enter `Loading`, await the network part, and land in a result or `Error`.
//!
//! The loading flag is a drop guard, so it is released on every exit path.
//! Operations take `&mut self`; together with the flag this keeps at most one
//! request outstanding, which in turn means responses are applied in the
//! order they were issued.
//!
//! Presentation code reads state through [`ViewController::view`] or follows
//! it live through [`ViewController::subscribe`].

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, Result},
    models::SymptomForm,
    pipeline::RequestPipeline,
    prober::BackendProber,
    session::{Session, SessionStore},
    storage::{FileSessionStorage, SessionStorage},
    view::{DisplayState, LoadingFlag, Tab, ViewState},
    workflow::Workflow,
    workflows::{AuthWorkflow, DiagnosisWorkflow, QaWorkflow},
};

pub struct ViewController {
    view: ViewState,
    updates: watch::Sender<ViewState>,
    loading: LoadingFlag,
    session: Arc<SessionStore>,
    prober: BackendProber,
    diagnosis: DiagnosisWorkflow,
    qa: QaWorkflow,
    auth: AuthWorkflow,
    started: bool,
}

impl ViewController {
    /// Controller talking to `config.base_url`, keeping the token in
    /// `config.session_file`.
    pub async fn new(config: &ClientConfig) -> Result<Self> {
        let pipeline = RequestPipeline::new(config.base_url.clone());
        let storage = Arc::new(FileSessionStorage::new(&config.session_file));
        Self::with_storage(pipeline, storage).await
    }

    pub async fn with_storage(
        pipeline: RequestPipeline,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self> {
        let session = Arc::new(SessionStore::load(storage).await?);
        let view = ViewState::default();
        let (updates, _) = watch::channel(view.clone());

        Ok(Self {
            view,
            updates,
            loading: LoadingFlag::new(),
            prober: BackendProber::new(pipeline.clone()),
            diagnosis: DiagnosisWorkflow::new(pipeline.clone()),
            qa: QaWorkflow::new(pipeline.clone(), session.clone()),
            auth: AuthWorkflow::new(pipeline, session.clone()),
            session,
            started: false,
        })
    }

    /// Probe the backend and restore the session role. Runs once; later
    /// calls do nothing.
    pub async fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.view.backend_status = self.prober.probe().await;
        self.publish();

        self.auth.refresh_role().await;
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Follow every state change, including `Loading` while a request is in flight.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.updates.subscribe()
    }

    pub async fn session(&self) -> Session {
        self.session.snapshot().await
    }

    pub fn is_busy(&self) -> bool {
        self.loading.is_held()
    }

    pub async fn submit_diagnosis(&mut self, form: SymptomForm) {
        let workflow = self.diagnosis.clone();
        match self.execute(&workflow, Tab::Diagnosis, form).await {
            None => {}
            Some(Ok(result)) => self.set_display(DisplayState::ShowingDiagnosisResult(result)),
            Some(Err(e)) => self.fail(e),
        }
    }

    pub async fn submit_question(&mut self, question: &str) {
        let workflow = self.qa.clone();
        match self.execute(&workflow, Tab::Qa, question.to_string()).await {
            None => {}
            Some(Ok(result)) => self.set_display(DisplayState::ShowingQaResult(result)),
            Some(Err(ClientError::AuthenticationRequired)) => {
                self.view.login_prompt = true;
                self.fail(ClientError::AuthenticationRequired);
            }
            Some(Err(e)) => {
                if e.is_credential_rejection() {
                    // The session is kept; re-authenticating is up to the user.
                    self.view.session_expired = true;
                }
                self.fail(e);
            }
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) {
        let workflow = self.auth.clone();
        let input = (username.to_string(), password.to_string());
        match self.execute(&workflow, Tab::Qa, input).await {
            None => {}
            Some(Ok(session)) => {
                info!(
                    "Session established (role {})",
                    session.role.as_deref().unwrap_or("unknown")
                );
                self.view.login_prompt = false;
                self.set_display(DisplayState::Idle);
            }
            Some(Err(e)) => {
                self.view.login_prompt = true;
                self.fail(e);
            }
        }
    }

    /// Forget the session and any displayed answer. No network call.
    pub async fn logout(&mut self) {
        if self.refuse_while_busy("logout") {
            return;
        }
        self.auth.logout().await;
        self.view.clear_qa_result();
        self.view.session_expired = false;
        self.publish();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.refuse_while_busy("tab switch") {
            return;
        }
        if self.view.switch_tab(tab) {
            self.publish();
        }
    }

    pub fn show_login(&mut self) {
        if self.refuse_while_busy("login prompt") {
            return;
        }
        self.view.switch_tab(Tab::Qa);
        self.view.login_prompt = true;
        self.publish();
    }

    pub fn dismiss_login(&mut self) {
        if self.refuse_while_busy("login dismissal") {
            return;
        }
        self.view.login_prompt = false;
        self.publish();
    }

    /// Returns `None` when the workflow was refused because another one is
    /// in flight; the view is untouched in that case.
    async fn execute<W: Workflow>(
        &mut self,
        workflow: &W,
        tab: Tab,
        input: W::Input,
    ) -> Option<Result<W::Output>> {
        let Some(_guard) = self.loading.try_acquire() else {
            warn!(
                "Refusing {} submission while another request is in flight",
                workflow.id()
            );
            return None;
        };

        self.view.switch_tab(tab);
        self.view.session_expired = false;

        let request = match workflow.prepare(input).await {
            Ok(request) => request,
            Err(e) => {
                warn!("{} input rejected: {}", workflow.id(), e);
                return Some(Err(e));
            }
        };

        self.set_display(DisplayState::Loading);
        info!("Started {} workflow", workflow.id());
        Some(workflow.run(request).await)
    }

    fn refuse_while_busy(&self, action: &str) -> bool {
        if self.loading.is_held() {
            warn!("Refusing {} while a request is in flight", action);
            return true;
        }
        false
    }

    fn fail(&mut self, error: ClientError) {
        self.set_display(DisplayState::Error(error.to_string()));
    }

    fn set_display(&mut self, display: DisplayState) {
        self.view.display = display;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.view.clone());
    }
}
