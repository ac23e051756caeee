//! Unified application error model.
//! Every failure the access core reports is normalized into one `AppError` so that each
//! screen reacts the same way: the three auth kinds drive redirects and notices, the rest
//! are shown to the user as plain messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::identity::{StorageError, FORBIDDEN_NOTICE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// No session at all; the caller redirects to login.
    Unauthenticated { code: String, message: String },
    /// Valid session, insufficient role; the caller shows the fixed notice.
    Forbidden { code: String, message: String },
    /// The backend rejected a previously valid token; the session is already cleared.
    AuthExpired { code: String, message: String },
    /// Backend or transport failure unrelated to auth. `status` is absent for transport errors.
    Remote { code: String, message: String, status: Option<u16> },
    UserInput { code: String, message: String },
    Config { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Unauthenticated { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::AuthExpired { code, .. }
            | AppError::Remote { code, .. }
            | AppError::UserInput { code, .. }
            | AppError::Config { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthenticated { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::AuthExpired { message, .. }
            | AppError::Remote { message, .. }
            | AppError::UserInput { message, .. }
            | AppError::Config { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn unauthenticated() -> Self {
        AppError::Unauthenticated { code: "unauthenticated".into(), message: "login required".into() }
    }
    pub fn forbidden() -> Self {
        AppError::Forbidden { code: "forbidden".into(), message: FORBIDDEN_NOTICE.into() }
    }
    pub fn auth_expired() -> Self {
        AppError::AuthExpired { code: "auth_expired".into(), message: "session expired, please log in again".into() }
    }
    pub fn remote<S: Into<String>>(status: Option<u16>, msg: S) -> Self {
        AppError::Remote { code: "remote_error".into(), message: msg.into(), status }
    }
    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn config<S: Into<String>>(code: S, msg: S) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn io<S: Into<String>>(code: S, msg: S) -> Self { AppError::Io { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// True for the three authorization kinds the access core owns.
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Unauthenticated { .. } | AppError::Forbidden { .. } | AppError::AuthExpired { .. })
    }

    /// Unauthenticated and AuthExpired both end on the login screen; Forbidden never redirects.
    pub fn redirects_to_login(&self) -> bool {
        matches!(self, AppError::Unauthenticated { .. } | AppError::AuthExpired { .. })
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Unauthenticated { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::AuthExpired { .. } => 401,
            AppError::Remote { status, .. } => status.unwrap_or(502),
            AppError::UserInput { .. } => 400,
            AppError::Config { .. } => 500,
            AppError::Io { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self { AppError::io("session_storage".to_string(), err.to_string()) }
}
