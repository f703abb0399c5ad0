//! Client configuration loaded from the environment.
//!
//! The variable names are the ones the deployed web application has always
//! used, so existing `.env` files keep working.

use log::{debug, info};

pub const API_BASE_URL_VAR: &str = "NEXT_PUBLIC_MAIN_BASE_URL";
pub const MEDIA_BASE_URL_VAR: &str = "NEXT_PUBLIC_MEDIA_BASE_URL";
pub const STORAGE_BASE_URL_VAR: &str = "NEXT_PUBLIC_MAIN_STORAGE_URL";
pub const PAYMENT_PATH_VAR: &str = "BRAIN_BRIDGE_PAYMENT_PATH";

pub const DEFAULT_PAYMENT_PATH: &str = "/payment";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Where the client talks to and where it sends students to pay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API root, without trailing slash
    pub api_base_url: String,
    /// Root for videos, avatars and thumbnails, without trailing slash
    pub media_base_url: String,
    /// Path of the payment page the booking flow redirects to
    pub payment_path: String,
}

impl ClientConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. The browser build feeds values
    /// baked in at compile time through this.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url =
            non_empty(API_BASE_URL_VAR).ok_or(ConfigError::Missing(API_BASE_URL_VAR))?;
        let api_base_url = validate_url(API_BASE_URL_VAR, &api_base_url)?;

        let media_base_url = match non_empty(MEDIA_BASE_URL_VAR) {
            Some(url) => validate_url(MEDIA_BASE_URL_VAR, &url)?,
            None => match non_empty(STORAGE_BASE_URL_VAR) {
                Some(url) => validate_url(STORAGE_BASE_URL_VAR, &url)?,
                None => api_base_url.clone(),
            },
        };

        let payment_path = non_empty(PAYMENT_PATH_VAR)
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|| DEFAULT_PAYMENT_PATH.to_string());

        info!("Client configured for API at {}", api_base_url);

        Ok(Self {
            api_base_url,
            media_base_url,
            payment_path,
        })
    }

    /// Absolute URL for an API path such as `/slots/4`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn validate_url(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidUrl {
            var,
            value: value.to_string(),
        }),
    }
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim().trim_matches('/'))
}
