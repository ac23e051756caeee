//! Remote client against an in-process stand-in backend: bearer attachment,
//! 401/403 handling, error bodies, and the login/register flows.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use curo::error::AppError;
use curo::identity::{guard, MemoryStorage, RenderDecision, Role, RouteId, SessionStore};
use curo::cli::{self, Command};
use curo::remote::{ApiClient, RegisterRequest};

const GOOD_TOKEN: &str = "good-token";

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN))
}

async fn login(State(b): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("admin@curo.io"), Some("secret")) => (StatusCode::OK, Json(json!({"token": GOOD_TOKEN, "role": "admin"}))),
        (Some("doc@curo.io"), Some("secret")) => (StatusCode::OK, Json(json!({"token": GOOD_TOKEN, "role": "doctor"}))),
        (Some("odd@curo.io"), Some("secret")) => (StatusCode::OK, Json(json!({"token": GOOD_TOKEN, "role": "janitor"}))),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"}))),
    }
}

async fn register(State(b): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if body["email"] == "taken@curo.io" {
        return (StatusCode::CONFLICT, Json(json!({"error": "Email already exists"})));
    }
    (StatusCode::CREATED, Json(json!({"message": "created"})))
}

async fn user(State(b): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "Invalid token"})));
    }
    (StatusCode::OK, Json(json!({"user": {"name": "Ada", "role": "admin"}})))
}

async fn doctors(State(b): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "jwt expired"})));
    }
    (StatusCode::OK, Json(json!([{"doctor_id": 1, "name": "Dr. Rao"}, {"doctor_id": 2, "name": "Dr. Lee"}])))
}

async fn doctor_appointments(State(b): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "jwt expired"})));
    }
    (StatusCode::OK, Json(json!([{"appointment_id": 4, "patient": "Ada"}])))
}

async fn boom(State(b): State<Backend>) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "database offline"})))
}

async fn create_medicine(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "jwt expired"})));
    }
    (StatusCode::CREATED, Json(json!({"created": body["name"]})))
}

async fn update_test(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "jwt expired"})));
    }
    (StatusCode::OK, Json(json!({"updated": body["price"]})))
}

async fn delete_doctor(State(b): State<Backend>, headers: HeaderMap) -> StatusCode {
    b.hits.fetch_add(1, Ordering::SeqCst);
    if !bearer_ok(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    StatusCode::NO_CONTENT
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/user", get(user))
        .route("/doctor/read", get(doctors))
        .route("/doctor/delete/7", delete(delete_doctor))
        .route("/medicine/create", post(create_medicine))
        .route("/test/update/3", patch(update_test))
        .route("/list/appointment/doctor", get(doctor_appointments))
        .route("/boom", get(boom))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), backend)
}

fn client_for(base: &str, sessions: SessionStore) -> ApiClient {
    ApiClient::new(base.parse().unwrap(), sessions).unwrap()
}

#[tokio::test]
async fn login_stores_session_and_picks_landing_route() {
    let (base, _b) = spawn_backend().await;
    let storage = MemoryStorage::new();
    let sessions = SessionStore::open(storage.clone());
    let client = client_for(&base, sessions.clone());

    let outcome = client.login("doc@curo.io", "secret").await.unwrap();
    assert_eq!(outcome.role, Role::Doctor);
    assert_eq!(outcome.landing, RouteId::Appointment);
    assert_eq!(sessions.current().token(), Some(GOOD_TOKEN));
    assert_eq!(storage.snapshot().unwrap().role, Role::Doctor);
}

#[tokio::test]
async fn login_with_unknown_role_stores_nothing() {
    let (base, _b) = spawn_backend().await;
    let storage = MemoryStorage::new();
    let sessions = SessionStore::open(storage.clone());
    let client = client_for(&base, sessions.clone());

    let err = client.login("odd@curo.io", "secret").await.unwrap_err();
    assert_eq!(err.message(), "Failed to login: Unknown error");
    assert!(!sessions.current().is_authenticated());
    assert_eq!(sessions.current().role(), Role::None);
    assert!(storage.snapshot().is_none());
    assert_eq!(guard(&sessions.current(), RouteId::Dashboard), RenderDecision::RedirectToLogin);
}

#[tokio::test]
async fn bad_credentials_are_a_login_failure_not_an_expiry() {
    let (base, _b) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    let client = client_for(&base, sessions.clone());

    let err = client.login("admin@curo.io", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Remote { status: Some(401), .. }));
    assert_eq!(err.message(), "Failed to login: Invalid credentials");
    assert!(!sessions.current().is_authenticated());
}

#[tokio::test]
async fn authenticated_get_attaches_bearer() {
    let (base, _b) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    let client = client_for(&base, sessions.clone());
    client.login("admin@curo.io", "secret").await.unwrap();

    let doctors: Value = client.get_json("/doctor/read").await.unwrap();
    assert_eq!(doctors.as_array().map(|a| a.len()), Some(2));
    let me = client.current_user().await.unwrap();
    assert_eq!(me["user"]["name"], "Ada");
}

#[tokio::test]
async fn no_token_means_no_request() {
    let (base, backend) = spawn_backend().await;
    let client = client_for(&base, SessionStore::in_memory());

    let err = client.get_json::<Value>("/doctor/read").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated { .. }));
    assert!(err.redirects_to_login());
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unauthorized_response_logs_out_and_reports_expiry() {
    let (base, _b) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    sessions.login("stale-token", Role::Admin);
    let client = client_for(&base, sessions.clone());

    let err = client.get_json::<Value>("/doctor/read").await.unwrap_err();
    assert!(matches!(err, AppError::AuthExpired { .. }));
    assert!(!sessions.current().is_authenticated());
    assert_eq!(guard(&sessions.current(), RouteId::Dashboard), RenderDecision::RedirectToLogin);

    // the follow-up call never reaches the backend
    let err = client.get_json::<Value>("/doctor/read").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated { .. }));
}

#[tokio::test]
async fn forbidden_response_is_also_an_expiry() {
    let (base, _b) = spawn_backend().await;
    let storage = MemoryStorage::new();
    let sessions = SessionStore::open(storage.clone());
    sessions.login("stale-token", Role::Patient);
    let client = client_for(&base, sessions.clone());

    let err = client.current_user().await.unwrap_err();
    assert!(matches!(err, AppError::AuthExpired { .. }));
    assert!(storage.snapshot().is_none());
}

#[tokio::test]
async fn other_failures_surface_backend_message_and_keep_session() {
    let (base, _b) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    sessions.login(GOOD_TOKEN, Role::Admin);
    let client = client_for(&base, sessions.clone());

    let err = client.get_json::<Value>("/boom").await.unwrap_err();
    assert!(matches!(err, AppError::Remote { status: Some(500), .. }));
    assert_eq!(err.message(), "database offline");
    assert!(!err.is_auth());
    assert_eq!(sessions.current().role(), Role::Admin);
}

#[tokio::test]
async fn write_verbs() {
    let (base, _b) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    sessions.login(GOOD_TOKEN, Role::Admin);
    let client = client_for(&base, sessions);

    let created: Value = client.post_json("/medicine/create", &json!({"name": "Amoxicillin"})).await.unwrap();
    assert_eq!(created["created"], "Amoxicillin");
    let updated: Value = client.patch_json("/test/update/3", &json!({"price": 40})).await.unwrap();
    assert_eq!(updated["updated"], 40);
    let deleted = client.delete("/doctor/delete/7").await.unwrap();
    assert_eq!(deleted, Value::Null);
}

#[tokio::test]
async fn transport_failure_is_remote_without_status() {
    // nothing listens on port 9 of localhost in the test environment
    let sessions = SessionStore::in_memory();
    sessions.login(GOOD_TOKEN, Role::Admin);
    let client = client_for("http://127.0.0.1:9", sessions.clone());

    let err = client.get_json::<Value>("/doctor/read").await.unwrap_err();
    assert!(matches!(err, AppError::Remote { status: None, .. }));
    assert!(sessions.current().is_authenticated());

    let err = client.login("admin@curo.io", "secret").await.unwrap_err();
    assert_eq!(err.message(), "Failed to login due to network error.");
}

#[tokio::test]
async fn register_flow() {
    let (base, backend) = spawn_backend().await;
    let client = client_for(&base, SessionStore::in_memory());

    let mut req = RegisterRequest { name: "Ada".into(), email: "ada@curo.io".into(), password: "pw".into(), role: Role::Patient };
    client.register(&req).await.unwrap();

    req.email = "taken@curo.io".into();
    let err = client.register(&req).await.unwrap_err();
    assert_eq!(err.message(), "Failed to register: Email already exists");

    let before = backend.hits.load(Ordering::SeqCst);
    req.name = String::new();
    let err = client.register(&req).await.unwrap_err();
    assert_eq!(err.message(), "Please fill in all required fields.");
    assert_eq!(backend.hits.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn open_loads_the_role_scoped_page_data() {
    let (base, backend) = spawn_backend().await;
    let sessions = SessionStore::in_memory();
    let client = client_for(&base, sessions);
    client.login("doc@curo.io", "secret").await.unwrap();

    let before = backend.hits.load(Ordering::SeqCst);
    cli::execute(&client, Command::Open { route: "appointment".into() }).await.unwrap();
    assert_eq!(backend.hits.load(Ordering::SeqCst), before + 1);

    // doctors may not open departments: no request leaves the client
    let err = cli::execute(&client, Command::Open { route: "/department".into() }).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
    assert_eq!(backend.hits.load(Ordering::SeqCst), before + 1);
}
