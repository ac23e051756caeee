//! Authenticated access to the Curo REST backend.
//!
//! `ApiClient` is the only place the crate touches the network. It attaches the current
//! bearer token to every call and owns the one recovery path the client has: a 401/403
//! from the backend clears the session store and surfaces as `AppError::AuthExpired`.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{landing_route, Role, RouteId, SessionStore};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
    #[serde(default)]
    role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub landing: RouteId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    fn is_complete(&self) -> bool {
        ![&self.name, &self.email, &self.password].iter().any(|f| f.trim().is_empty()) && self.role.is_signed_in()
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
    sessions: SessionStore,
}

impl ApiClient {
    pub fn new(base: Url, sessions: SessionStore) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::internal("http_client".to_string(), e.to_string()))?;
        Ok(Self { base, client, sessions })
    }

    pub fn from_config(cfg: &ClientConfig, sessions: SessionStore) -> AppResult<Self> {
        Self::new(cfg.api_url.clone(), sessions)
    }

    pub fn base(&self) -> &Url { &self.base }

    pub fn sessions(&self) -> &SessionStore { &self.sessions }

    /// Join onto the base without dropping any path prefix the base carries.
    fn url(&self, path: &str) -> AppResult<Url> {
        let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| AppError::user("invalid_path".to_string(), format!("{}: {}", path, e)))
    }

    /// POST /auth/login, then store token and role together.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let url = self.url("/auth/login")?;
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let resp = self.client.post(url).json(&body).send().await.map_err(|e| {
            warn!(target: "curo", "login transport error: {}", e);
            AppError::remote(None, "Failed to login due to network error.")
        })?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AppError::remote(Some(status.as_u16()), format!("Failed to login: {}", backend_error(&text))));
        }
        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|_| AppError::remote(Some(status.as_u16()), "Failed to login: Unknown error"))?;
        if parsed.token.is_empty() {
            return Err(AppError::remote(Some(status.as_u16()), "Failed to login: Unknown error"));
        }
        let role = Role::parse(&parsed.role);
        if !role.is_signed_in() {
            warn!(target: "curo", "login response carried unrecognized role '{}'", parsed.role);
            return Err(AppError::remote(Some(status.as_u16()), "Failed to login: Unknown error"));
        }
        self.sessions.login(parsed.token, role);
        Ok(LoginOutcome { role, landing: landing_route(role) })
    }

    /// POST /auth/register. Incomplete forms are rejected before any request is made.
    pub async fn register(&self, req: &RegisterRequest) -> AppResult<()> {
        if !req.is_complete() {
            return Err(AppError::user("incomplete_form", "Please fill in all required fields."));
        }
        let url = self.url("/auth/register")?;
        let resp = self.client.post(url).json(req).send().await.map_err(|e| {
            warn!(target: "curo", "register transport error: {}", e);
            AppError::remote(None, "Failed to register due to network error.")
        })?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::remote(Some(status.as_u16()), format!("Failed to register: {}", backend_error(&text))));
        }
        Ok(())
    }

    /// GET /user: the signed-in user's profile.
    pub async fn current_user(&self) -> AppResult<Value> { self.get_json("/user").await }

    pub fn logout(&self) { self.sessions.logout(); }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let resp = self.send_authenticated(Method::GET, path, None).await?;
        decode(resp).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send_authenticated(Method::POST, path, Some(to_body(body)?)).await?;
        decode(resp).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send_authenticated(Method::PATCH, path, Some(to_body(body)?)).await?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<Value> {
        let resp = self.send_authenticated(Method::DELETE, path, None).await?;
        decode(resp).await
    }

    async fn send_authenticated(&self, method: Method, path: &str, body: Option<Value>) -> AppResult<reqwest::Response> {
        let session = self.sessions.current();
        let Some(token) = session.token() else {
            return Err(AppError::unauthenticated());
        };
        let url = self.url(path)?;
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal("bad_token".to_string(), "session token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        debug!(target: "curo", "{} {} role={}", method, url, session.role());
        let mut req = self.client.request(method, url).headers(headers);
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| AppError::remote(None, format!("request to {} failed: {}", path, e)))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(target: "curo", "backend rejected session with HTTP {}; logging out", status.as_u16());
            self.sessions.logout();
            return Err(AppError::auth_expired());
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::remote(Some(status.as_u16()), backend_error(&text)));
        }
        Ok(resp)
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> AppResult<Value> {
    serde_json::to_value(body).map_err(|e| AppError::user("invalid_body".to_string(), e.to_string()))
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> AppResult<T> {
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| AppError::remote(Some(status), format!("failed to read response: {}", e)))?;
    // empty bodies (typical for deletes) decode as JSON null
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(text).map_err(|e| AppError::remote(Some(status), format!("invalid response body: {}", e)))
}

/// The backend reports failures as `{"error": "..."}`; anything else is "Unknown error".
fn backend_error(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}
