#![allow(dead_code)]

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::Json,
    routing::{get, post},
};
use healthqai_client::{
    InMemorySessionStorage, RequestPipeline, SessionStorage, ViewController,
    config::parse_base_url,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const ROOT: &str = "/";
pub const PREDICT: &str = "/predict";
pub const TOKEN: &str = "/token";
pub const USERS_ME: &str = "/users/me/";
pub const ASK: &str = "/ask";

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub route: &'static str,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct StubState {
    responses: Mutex<HashMap<&'static str, (StatusCode, Value)>>,
    requests: Mutex<Vec<Recorded>>,
    delay_ms: AtomicU64,
}

impl StubState {
    async fn handle(
        &self,
        route: &'static str,
        headers: &HeaderMap,
        body: String,
    ) -> (StatusCode, Json<Value>) {
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            route,
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
            body,
        });

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(route)
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, json!({ "detail": "Not Found" })));
        (status, Json(body))
    }
}

/// In-process stand-in for the HealthQAI backend.
pub struct StubBackend {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let state = Arc::new(StubState::default());
        {
            let mut responses = state.responses.lock().unwrap();
            responses.insert(
                ROOT,
                (StatusCode::OK, json!({ "message": "HealthQAI Backend is running!" })),
            );
            responses.insert(
                PREDICT,
                (StatusCode::OK, json!({ "diagnosis": "Common cold", "confidence": 0.823 })),
            );
            responses.insert(
                TOKEN,
                (StatusCode::OK, json!({ "access_token": "T", "token_type": "bearer" })),
            );
            responses.insert(
                USERS_ME,
                (StatusCode::OK, json!({ "username": "doctor", "role": "doctor" })),
            );
            responses.insert(
                ASK,
                (
                    StatusCode::OK,
                    json!({
                        "question": "What helps with a cold?",
                        "answer": "Rest, fluids and time.",
                        "sources": ["NHS: Common cold"]
                    }),
                ),
            );
        }

        let app = Router::new()
            .route(
                ROOT,
                get(|State(s): State<Arc<StubState>>, headers: HeaderMap, body: String| async move {
                    s.handle(ROOT, &headers, body).await
                }),
            )
            .route(
                PREDICT,
                post(|State(s): State<Arc<StubState>>, headers: HeaderMap, body: String| async move {
                    s.handle(PREDICT, &headers, body).await
                }),
            )
            .route(
                TOKEN,
                post(|State(s): State<Arc<StubState>>, headers: HeaderMap, body: String| async move {
                    s.handle(TOKEN, &headers, body).await
                }),
            )
            .route(
                USERS_ME,
                get(|State(s): State<Arc<StubState>>, headers: HeaderMap, body: String| async move {
                    s.handle(USERS_ME, &headers, body).await
                }),
            )
            .route(
                ASK,
                post(|State(s): State<Arc<StubState>>, headers: HeaderMap, body: String| async move {
                    s.handle(ASK, &headers, body).await
                }),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Replace the canned response for `route`.
    pub fn respond(&self, route: &'static str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(route, (status, body));
    }

    /// Hold every response back for `millis` before answering.
    pub fn delay_responses(&self, millis: u64) {
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn requests(&self, route: &'static str) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.route == route)
            .cloned()
            .collect()
    }

    pub fn hits(&self, route: &'static str) -> usize {
        self.requests(route).len()
    }

    pub fn total_hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn pipeline(&self) -> RequestPipeline {
        RequestPipeline::new(parse_base_url(&self.base_url).unwrap())
    }

    pub async fn controller(&self) -> ViewController {
        self.controller_with(Arc::new(InMemorySessionStorage::new()))
            .await
    }

    pub async fn controller_with(&self, storage: Arc<dyn SessionStorage>) -> ViewController {
        ViewController::with_storage(self.pipeline(), storage)
            .await
            .unwrap()
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
