//! Client configuration: where the backend lives and which bootstrap routes
//! to probe.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding `base_url`.
pub const ENV_BASE_URL: &str = "BLOG_ADMIN_API_URL";

/// Environment variable overriding `bootstrap_paths` (comma-separated).
pub const ENV_BOOTSTRAP_PATHS: &str = "BLOG_ADMIN_BOOTSTRAP_PATHS";

const DEFAULT_BOOTSTRAP_PATHS: [&str; 4] = [
    "/auth/reset-admin",
    "/auth/create-admin",
    "/admin/create",
    "/auth/register",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    #[error("at least one bootstrap path is required")]
    NoBootstrapPaths,
}

/// Backend location and bootstrap candidates.
///
/// Bootstrap paths are relative to `base_url` and probed in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub bootstrap_paths: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bootstrap_paths: DEFAULT_BOOTSTRAP_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `BLOG_ADMIN_API_URL` and
    /// `BLOG_ADMIN_BOOTSTRAP_PATHS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(paths) = lookup(ENV_BOOTSTRAP_PATHS) {
            config.bootstrap_paths = paths
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.bootstrap_paths.is_empty() {
            return Err(ConfigError::NoBootstrapPaths);
        }
        Ok(())
    }
}
