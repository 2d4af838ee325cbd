#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use recipe_client::client::SessionStorage;
use recipe_client::{ClientConfig, RecipeController, TranscriptView};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const TEST_TOKEN: &str = "test-token-0123456789";

/// One request as the fake backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
    recipes: Vec<Value>,
    requests: Vec<RecordedRequest>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    next_id: i64,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process recipe backend bound to an ephemeral port.
///
/// Serves `/recipes` and `/logout` from an in-memory list, records every
/// request, and can be told to answer a given `"METHOD /path"` with a fixed
/// status instead.
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            next_id: 100,
            ..BackendState::default()
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");

        let app = Router::new().fallback(serve_request).with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend stopped");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Starts a backend already holding `(id, name, instructions)` records.
    pub async fn with_recipes(recipes: &[(i64, &str, &str)]) -> Self {
        let backend = Self::start().await;
        for (id, name, instructions) in recipes {
            backend.seed(json!({ "id": id, "name": name, "instructions": instructions }));
        }
        backend
    }

    pub fn seed(&self, recipe: Value) {
        self.state.lock().unwrap().recipes.push(recipe);
    }

    /// Answers `route` (e.g. `"DELETE /recipes/1"`) with `status` from now on.
    pub fn fail(&self, route: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(route.to_string(), status);
    }

    /// Holds every answer on `route` back by `delay` before serving it.
    pub fn delay(&self, route: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(route.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn recipe_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .recipes
            .iter()
            .filter_map(|r| r["name"].as_str().map(str::to_string))
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_request(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().map(str::to_string);
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    let route = format!("{} {}", method, path);
    let delay = state.lock().unwrap().delays.get(&route).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    if let Some(status) = state.failures.get(&route) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return status.into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::GET, ["recipes"]) => {
            let filter = query
                .as_deref()
                .and_then(|q| q.strip_prefix("name="))
                .map(|raw| urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_default());
            let recipes: Vec<Value> = state
                .recipes
                .iter()
                .filter(|r| match &filter {
                    Some(needle) => r["name"].as_str().is_some_and(|n| n.contains(needle.as_str())),
                    None => true,
                })
                .cloned()
                .collect();
            Json(recipes).into_response()
        }
        (Method::POST, ["recipes"]) => {
            let Some(mut recipe) = body else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            state.next_id += 1;
            recipe["id"] = json!(state.next_id);
            state.recipes.push(recipe.clone());
            (StatusCode::CREATED, Json(recipe)).into_response()
        }
        (Method::PUT, ["recipes", id]) => {
            let id = id.to_string();
            let Some(update) = body else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            match state.recipes.iter_mut().find(|r| id_matches(r, &id)) {
                Some(recipe) => {
                    recipe["name"] = update["name"].clone();
                    recipe["instructions"] = update["instructions"].clone();
                    (StatusCode::OK, Json(recipe.clone())).into_response()
                }
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        (Method::DELETE, ["recipes", id]) => {
            let before = state.recipes.len();
            state.recipes.retain(|r| !id_matches(r, id));
            if state.recipes.len() < before {
                StatusCode::OK.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        (Method::POST, ["logout"]) => StatusCode::OK.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn id_matches(recipe: &Value, id: &str) -> bool {
    match &recipe["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

/// Config pointed at `backend`, with a short logout delay.
pub fn config_for(backend: &FakeBackend) -> ClientConfig {
    let mut config = ClientConfig::new(backend.base_url.clone());
    config.logout_redirect_delay = Duration::from_millis(20);
    config.request_timeout = Duration::from_secs(5);
    config
}

pub fn controller_with(config: &ClientConfig, session: SessionStorage) -> RecipeController<TranscriptView> {
    let api = recipe_client::RecipeApi::from_config(config).expect("Failed to build API client");
    RecipeController::new(api, session, TranscriptView::new(), config)
}

/// Logged-in, non-admin controller talking to `backend`.
pub fn logged_in_controller(backend: &FakeBackend) -> RecipeController<TranscriptView> {
    controller_with(&config_for(backend), SessionStorage::logged_in(TEST_TOKEN, false))
}

/// Base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn bearer() -> Option<String> {
    Some(format!("Bearer {}", TEST_TOKEN))
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
