//! End-to-end tests for the session and positions flows against an in-process
//! fake of the REST API.

#![allow(non_snake_case)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use jrb_client::{
    ApiClient, AuthService, Confirm, ListState, MemoryTokenStore, Navigator, Outcome,
    PositionDraft, PositionsController, SessionManager, StoreError, TokenStore, DASHBOARD_PATH,
    LOGIN_PATH,
};
use jrb_types::{LoginRequest, Position, RegisterRequest};
use serde_json::json;

// {"sub":1,"exp":1700000000}
const TOKEN: &str = "e30.eyJzdWIiOjEsImV4cCI6MTcwMDAwMDAwMH0.sig";

// =========================================================================
// Fake API
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: String,
    path: String,
    auth: Option<String>,
}

#[derive(Default)]
struct Backend {
    positions: Vec<Position>,
    next_id: i64,
    seen: Vec<Seen>,
    /// Answer 401 to every authenticated call.
    revoked: bool,
    /// Answer this status to `GET /positions`.
    list_status: Option<StatusCode>,
}

type Shared = Arc<Mutex<Backend>>;

impl Backend {
    fn seeded(positions: Vec<Position>) -> Self {
        let next_id = positions.iter().filter_map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            positions,
            next_id,
            ..Self::default()
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {TOKEN}");
        !self.revoked
            && headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some(expected.as_str())
    }

    fn position_requests(&self) -> Vec<Seen> {
        self.seen
            .iter()
            .filter(|s| s.path.starts_with("/positions"))
            .cloned()
            .collect()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let seen = Seen {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        auth: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().unwrap().seen.push(seen);
    next.run(request).await
}

async fn login(Json(body): Json<LoginRequest>) -> Response {
    if body.username == "admin" && body.password == "secret" {
        Json(json!({ "accessToken": TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<RegisterRequest>) -> Response {
    if body.username.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "username is required" })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "id": 1 }))).into_response()
}

async fn list_positions(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let backend = state.lock().unwrap();
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    if let Some(status) = backend.list_status {
        return status.into_response();
    }
    Json(backend.positions.clone()).into_response()
}

async fn create_position(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Position>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    if backend.positions.iter().any(|p| p.code == body.code) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Position code already exists" })),
        )
            .into_response();
    }
    let id = backend.next_id;
    backend.next_id += 1;
    let created = Position::new(body.code, body.name).with_id(id);
    backend.positions.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_position(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Position>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    match backend.positions.iter_mut().find(|p| p.id == Some(id)) {
        Some(existing) => {
            existing.code = body.code;
            existing.name = body.name;
            Json(existing.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_position(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.positions.retain(|p| p.id != Some(id));
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_api(backend: Backend) -> (String, Shared) {
    let shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/login", post(login))
        .route("/auth/register", post(register))
        .route("/positions", get(list_positions).post(create_position))
        .route("/positions/:id", put(update_position).delete(delete_position))
        .layer(middleware::from_fn_with_state(shared.clone(), record))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), shared)
}

// =========================================================================
// Client-side fixtures
// =========================================================================

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

/// Storage that refuses every write, like a browser with storage disabled.
struct FullStore;

impl TokenStore for FullStore {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("QuotaExceededError".into()))
    }

    fn clear(&self) {}
}

struct Harness {
    backend: Shared,
    session: SessionManager,
    navigator: Arc<RecordingNavigator>,
    confirm: Arc<ScriptedConfirm>,
    controller: PositionsController,
    auth: AuthService,
}

fn harness(base: &str, backend: Shared, confirmDelete: bool) -> Harness {
    let navigator = Arc::new(RecordingNavigator::default());
    let confirm = Arc::new(ScriptedConfirm {
        answer: confirmDelete,
        prompts: Mutex::new(Vec::new()),
    });
    let session = SessionManager::new(Arc::new(MemoryTokenStore::new()), navigator.clone());
    let api = ApiClient::new(base).unwrap();
    let controller = PositionsController::new(api.clone(), session.clone(), confirm.clone());
    let auth = AuthService::new(api, session.clone());

    Harness {
        backend,
        session,
        navigator,
        confirm,
        controller,
        auth,
    }
}

async fn signed_in(backend: Backend) -> Harness {
    let (base, shared) = spawn_api(backend).await;
    let h = harness(&base, shared, true);
    h.session.save_token(TOKEN).unwrap();
    h
}

fn manager_and_clerk() -> Vec<Position> {
    vec![
        Position::new("MGR", "Manager").with_id(1),
        Position::new("CLK", "Clerk").with_id(2),
    ]
}

// =========================================================================
// Session
// =========================================================================

#[tokio::test]
async fn login_token_is_attached_to_every_authenticated_request() {
    let (base, shared) = spawn_api(Backend::seeded(manager_and_clerk())).await;
    let h = harness(&base, shared, true);

    h.auth.login("admin", "secret").await.unwrap();
    assert_eq!(h.session.get_token().as_deref(), Some(TOKEN));
    assert_eq!(h.navigator.visited(), vec![DASHBOARD_PATH.to_string()]);

    assert_eq!(h.controller.list().await, Outcome::Done);
    assert_eq!(
        h.controller.create(&Position::new("DEV", "Developer")).await,
        Outcome::Done
    );
    assert_eq!(
        h.controller.update(1, &Position::new("MGR", "Store Manager")).await,
        Outcome::Done
    );
    assert_eq!(h.controller.delete(2).await, Outcome::Done);

    let requests = h.backend.lock().unwrap().position_requests();
    let methods: Vec<&str> = requests.iter().map(|s| s.method.as_str()).collect();
    assert_eq!(
        methods,
        vec!["GET", "POST", "GET", "PUT", "GET", "DELETE", "GET"]
    );
    let expected = format!("Bearer {TOKEN}");
    assert!(requests.iter().all(|s| s.auth.as_deref() == Some(expected.as_str())));

    // The login call itself carries no credentials.
    let loginRequest = h.backend.lock().unwrap().seen[0].clone();
    assert_eq!(loginRequest.path, "/login");
    assert_eq!(loginRequest.auth, None);
}

#[tokio::test]
async fn rejected_token_signs_out_from_any_operation() {
    for op in ["list", "create", "update", "delete"] {
        let h = signed_in(Backend {
            revoked: true,
            ..Backend::seeded(manager_and_clerk())
        })
        .await;

        let outcome = match op {
            "list" => h.controller.list().await,
            "create" => h.controller.create(&Position::new("DEV", "Developer")).await,
            "update" => h.controller.update(1, &Position::new("MGR", "Boss")).await,
            _ => h.controller.delete(1).await,
        };

        assert_eq!(outcome, Outcome::SignedOut, "{op}");
        assert_eq!(h.session.get_token(), None, "{op}");
        assert_eq!(h.navigator.visited(), vec![LOGIN_PATH.to_string()], "{op}");
    }
}

#[tokio::test]
async fn missing_or_malformed_token_never_reaches_the_server() {
    for stored in [None, Some(""), Some("undefined token"), Some("line\nbreak")] {
        let (base, shared) = spawn_api(Backend::seeded(manager_and_clerk())).await;
        let h = harness(&base, shared, true);
        if let Some(token) = stored {
            h.session.save_token(token).unwrap();
        }

        assert_eq!(h.controller.list().await, Outcome::SignedOut);
        assert_eq!(h.controller.state(), ListState::Idle);
        assert_eq!(h.session.get_token(), None);
        assert_eq!(h.navigator.visited(), vec![LOGIN_PATH.to_string()]);
        assert!(h.backend.lock().unwrap().seen.is_empty());
    }
}

#[tokio::test]
async fn bad_credentials_show_server_message_without_touching_session() {
    let (base, shared) = spawn_api(Backend::default()).await;
    let h = harness(&base, shared, true);

    let err = h.auth.login("admin", "wrong").await.unwrap_err();
    assert_eq!(err, "Invalid credentials");
    assert_eq!(h.session.get_token(), None);
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn unreachable_api_reports_network_error_on_login() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = harness(&format!("http://{addr}"), Arc::new(Mutex::new(Backend::default())), true);
    let err = h.auth.login("admin", "secret").await.unwrap_err();
    assert_eq!(err, "Network error. Check API server.");

    let err = h.auth.register("new", "Cebu", "pw").await.unwrap_err();
    assert_eq!(err, "Something went wrong");
}

#[tokio::test]
async fn unstored_token_keeps_user_on_login_page() {
    let (base, _shared) = spawn_api(Backend::default()).await;
    let navigator = Arc::new(RecordingNavigator::default());
    let session = SessionManager::new(Arc::new(FullStore), navigator.clone());
    let auth = AuthService::new(ApiClient::new(&base).unwrap(), session.clone());

    let err = auth.login("admin", "secret").await.unwrap_err();
    assert_eq!(err, "Could not store session. Check browser storage settings.");
    assert_eq!(session.get_token(), None);
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn registration_returns_to_login() {
    let (base, shared) = spawn_api(Backend::default()).await;
    let h = harness(&base, shared, true);

    h.auth.register("juan", "Manila", "pw").await.unwrap();
    assert_eq!(h.navigator.visited(), vec![LOGIN_PATH.to_string()]);

    let err = h.auth.register("", "Manila", "pw").await.unwrap_err();
    assert_eq!(err, "username is required");
    assert_eq!(h.navigator.visited().len(), 1);
}

// =========================================================================
// Positions
// =========================================================================

#[tokio::test]
async fn writes_reload_the_full_server_list() {
    let h = signed_in(Backend::seeded(manager_and_clerk())).await;
    h.controller.list().await;

    // Another client adds a row behind our back.
    h.backend
        .lock()
        .unwrap()
        .positions
        .push(Position::new("SEC", "Security").with_id(40));

    let draft = PositionDraft {
        editing_id: None,
        code: "DEV".into(),
        name: "Developer".into(),
    };
    assert_eq!(h.controller.save(&draft).await, Outcome::Done);
    let server = h.backend.lock().unwrap().positions.clone();
    assert_eq!(h.controller.state(), ListState::Loaded(server.clone()));
    assert_eq!(server.len(), 4);

    let edit = PositionDraft {
        name: "Store Manager".into(),
        ..PositionDraft::edit(&server[0])
    };
    assert_eq!(h.controller.save(&edit).await, Outcome::Done);
    let server = h.backend.lock().unwrap().positions.clone();
    assert_eq!(server[0].name, "Store Manager");
    assert_eq!(h.controller.state(), ListState::Loaded(server));

    assert_eq!(h.controller.delete(40).await, Outcome::Done);
    let server = h.backend.lock().unwrap().positions.clone();
    assert!(server.iter().all(|p| p.id != Some(40)));
    assert_eq!(h.controller.state(), ListState::Loaded(server));
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let (base, shared) = spawn_api(Backend::seeded(manager_and_clerk())).await;
    let h = harness(&base, shared, false);
    h.session.save_token(TOKEN).unwrap();

    assert_eq!(h.controller.delete(1).await, Outcome::Cancelled);
    assert_eq!(
        *h.confirm.prompts.lock().unwrap(),
        vec!["Delete this position?".to_string()]
    );

    let backend = h.backend.lock().unwrap();
    assert!(backend.seen.is_empty());
    assert_eq!(backend.positions.len(), 2);
}

#[tokio::test]
async fn empty_list_is_reported_as_empty() {
    let h = signed_in(Backend::default()).await;

    assert_eq!(h.controller.list().await, Outcome::Done);
    let state = h.controller.state();
    assert_eq!(state, ListState::Loaded(Vec::new()));
    assert!(state.is_empty());
}

#[tokio::test]
async fn list_failure_shows_generic_message() {
    let h = signed_in(Backend {
        list_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Backend::seeded(manager_and_clerk())
    })
    .await;

    let expected = "Failed to fetch positions".to_string();
    assert_eq!(h.controller.list().await, Outcome::Failed(expected.clone()));
    assert_eq!(h.controller.state(), ListState::Failed(expected));
    assert_eq!(h.session.get_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn accepted_write_survives_failed_reload() {
    let h = signed_in(Backend {
        list_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Backend::seeded(manager_and_clerk())
    })
    .await;
    let expected = ListState::Failed("Failed to fetch positions".into());

    let draft = PositionDraft {
        editing_id: None,
        code: "DEV".into(),
        name: "Developer".into(),
    };
    assert_eq!(h.controller.save(&draft).await, Outcome::Done);
    assert_eq!(h.backend.lock().unwrap().positions.len(), 3);
    assert_eq!(h.controller.state(), expected);

    assert_eq!(
        h.controller.update(1, &Position::new("MGR", "Store Manager")).await,
        Outcome::Done
    );
    assert_eq!(h.backend.lock().unwrap().positions[0].name, "Store Manager");
    assert_eq!(h.controller.state(), expected);

    assert_eq!(h.controller.delete(2).await, Outcome::Done);
    assert_eq!(h.backend.lock().unwrap().positions.len(), 2);
    assert_eq!(h.controller.state(), expected);
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn network_failure_shows_the_same_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = harness(&format!("http://{addr}"), Arc::new(Mutex::new(Backend::default())), true);
    h.session.save_token(TOKEN).unwrap();

    let expected = "Failed to fetch positions".to_string();
    assert_eq!(h.controller.list().await, Outcome::Failed(expected.clone()));
    assert_eq!(h.controller.state(), ListState::Failed(expected));
    assert!(h.navigator.visited().is_empty());
}

#[tokio::test]
async fn rejected_write_keeps_list_and_shows_server_message() {
    let h = signed_in(Backend::seeded(manager_and_clerk())).await;
    h.controller.list().await;
    let before = h.controller.state();

    let outcome = h.controller.create(&Position::new("MGR", "Duplicate")).await;
    assert_eq!(outcome, Outcome::Failed("Position code already exists".into()));
    assert_eq!(h.controller.state(), before);

    let outcome = h.controller.update(99, &Position::new("X", "Missing")).await;
    assert_eq!(outcome, Outcome::Failed("Save failed".into()));
}

#[tokio::test]
async fn listener_sees_loading_before_loaded() {
    let h = signed_in(Backend::seeded(manager_and_clerk())).await;
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = transitions.clone();
    let controller = h
        .controller
        .clone()
        .on_change(move |state| sink.lock().unwrap().push(state));

    controller.list().await;

    assert_eq!(
        *transitions.lock().unwrap(),
        vec![ListState::Loading, ListState::Loaded(manager_and_clerk())]
    );
}
