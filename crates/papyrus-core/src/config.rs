// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PapyrusError, Result};

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding [`AppConfig::server_url`].
pub const SERVER_URL_ENV: &str = "PAPYRUS_SERVER_URL";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the retrieval backend (scheme, host, port).
    pub server_url: String,
    /// Widest the rendered image may be, in display pixels.
    pub max_display_width: f64,
    /// Tallest the rendered image may be, in display pixels.
    pub max_display_height: f64,
    /// Vertical space above the image reserved for UI chrome.
    pub display_padding: f64,
    /// Delay between the end of one status request and the start of the next.
    pub poll_interval_ms: u64,
    /// Per-request timeout for backend calls.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            max_display_width: 600.0,
            max_display_height: 400.0,
            display_padding: 50.0,
            poll_interval_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(PapyrusError::InvalidConfig(format!(
                "server URL must start with http:// or https://, got '{}'",
                self.server_url
            )));
        }
        for (name, value) in [
            ("max_display_width", self.max_display_width),
            ("max_display_height", self.max_display_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PapyrusError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.display_padding.is_finite() || self.display_padding < 0.0 {
            return Err(PapyrusError::InvalidConfig(format!(
                "display_padding must not be negative, got {}",
                self.display_padding
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(PapyrusError::InvalidConfig(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(PapyrusError::InvalidConfig(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SERVER_URL_ENV)
            && !url.trim().is_empty()
        {
            self.server_url = url.trim().to_string();
        }
        self
    }

    /// Load the config stored in `dir`, if present and valid.
    pub fn load_from(dir: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(dir.join(CONFIG_FILE)).ok()?;
        let config: Self = serde_json::from_str(&data).ok()?;
        config.validate().ok()?;
        Some(config)
    }

    /// Persist the config as pretty JSON inside `dir`.
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }

    /// Server URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}
