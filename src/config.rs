//! Client configuration resolved from the environment.
//!
//! `CURO_API_URL`      backend base URL (default `http://localhost:8081`)
//! `CURO_SESSION_FILE` where the session record lives (default `.curo/session.json`)

use std::path::PathBuf;

use reqwest::Url;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8081";
pub const DEFAULT_SESSION_FILE: &str = ".curo/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Resolve from an arbitrary lookup; empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let raw_url = get("CURO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| AppError::config("invalid_api_url".to_string(), format!("CURO_API_URL '{}': {}", raw_url, e)))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(AppError::config(
                "invalid_api_url".to_string(),
                format!("CURO_API_URL must be http or https, got '{}'", api_url.scheme()),
            ));
        }
        let session_file = get("CURO_SESSION_FILE").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
        Ok(Self { api_url, session_file })
    }
}
