use std::fmt::{Debug, Formatter};

use thiserror::Error;

pub const IEX_TOKEN_VAR: &str = "FOLIO_IEX_TOKEN";
pub const IEX_BASE_URL_VAR: &str = "FOLIO_IEX_BASE_URL";
pub const DEFAULT_IEX_BASE_URL: &str = "https://api.iex.cloud/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Missing or unusable runtime configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} is not set")]
    MissingVar { name: &'static str },
    #[error("environment variable {name} is empty")]
    EmptyVar { name: &'static str },
    #[error("base url '{value}' must start with http:// or https://")]
    InvalidBaseUrl { value: String },
}

impl ConfigError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingVar { .. } => "config.missing_var",
            Self::EmptyVar { .. } => "config.empty_var",
            Self::InvalidBaseUrl { .. } => "config.invalid_base_url",
        }
    }
}

/// Connection settings for IEX Cloud.
#[derive(Clone, PartialEq, Eq)]
pub struct IexConfig {
    token: String,
    base_url: String,
    timeout_ms: u64,
}

impl IexConfig {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(ConfigError::EmptyVar {
                name: IEX_TOKEN_VAR,
            });
        }

        let base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl { value: base_url });
        }

        Ok(Self {
            token,
            base_url,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// Reads `FOLIO_IEX_TOKEN` and, optionally, `FOLIO_IEX_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] against an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(IEX_TOKEN_VAR).ok_or(ConfigError::MissingVar {
            name: IEX_TOKEN_VAR,
        })?;
        let base_url = lookup(IEX_BASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IEX_BASE_URL.to_owned());
        Self::new(token, base_url)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

impl Debug for IexConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IexConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
