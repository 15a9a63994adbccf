//! Server configuration layered over Leptos' `[package.metadata.leptos]`.
//!
//! Optional:
//! - `PORT`: listen port; keeps the configured host address
//! - `SITE_ROOT`: directory holding the built `pkg/` bundle

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::SocketAddr;

use leptos::prelude::LeptosOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT value {value:?}")]
    InvalidPort { value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub site_root: Option<String>,
}

impl ServerConfig {
    /// Read overrides from the process environment (after `.env` is loaded).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is not a port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort { value: raw.clone() })?,
            ),
            None => None,
        };
        let site_root = non_empty(lookup("SITE_ROOT"));
        Ok(Self { port, site_root })
    }

    /// Apply the overrides on top of the Leptos options.
    pub fn apply(&self, options: &mut LeptosOptions) {
        if let Some(port) = self.port {
            options.site_addr = SocketAddr::new(options.site_addr.ip(), port);
        }
        if let Some(root) = &self.site_root {
            options.site_root = root.as_str().into();
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
