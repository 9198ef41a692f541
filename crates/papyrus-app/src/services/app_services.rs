// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the persisted configuration and the backend
// client, and hands both to the Dioxus pages.
//
// The HTTP client is rebuilt whenever the configuration is saved, so a new
// server URL takes effect on the next submission.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use papyrus_client::HttpApi;
use papyrus_core::AppConfig;
use papyrus_core::error::{PapyrusError, Result};
use papyrus_document::SourceImage;
use tracing::{error, info, warn};

use super::data_dir;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
    api: Arc<Mutex<Option<HttpApi>>>,
}

impl AppServices {
    /// Initialise from the platform data directory. Call once at app startup.
    pub fn init() -> Self {
        Self::init_in(data_dir::data_dir())
    }

    /// Initialise with `dir` as the data directory.
    ///
    /// A missing or invalid config file falls back to defaults; the
    /// `PAPYRUS_SERVER_URL` environment variable overrides the stored URL.
    pub fn init_in(dir: PathBuf) -> Self {
        info!(path = %dir.display(), "initialising app services");

        let stored = AppConfig::load_from(&dir).unwrap_or_else(|| {
            info!("no usable stored config, using defaults");
            AppConfig::default()
        });
        let config = match stored.clone().with_env_overrides() {
            overridden if overridden.validate().is_ok() => overridden,
            overridden => {
                warn!(server_url = %overridden.server_url, "ignoring invalid server URL override");
                stored
            }
        };

        let api = build_api(&config);
        info!(server_url = %config.server_url, "app services initialised");

        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
            api: Arc::new(Mutex::new(api)),
        }
    }

    // -- Configuration -------------------------------------------------------

    /// Get a snapshot of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate, persist, and apply a new config.
    ///
    /// Nothing changes when validation or the write fails.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        config.save_to(&self.data_dir)?;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        *self.api.lock().unwrap_or_else(PoisonError::into_inner) = build_api(config);
        info!(server_url = %config.server_url, "config saved");
        Ok(())
    }

    // -- Backend -------------------------------------------------------------

    /// The backend client for the current server URL.
    pub fn api(&self) -> Result<HttpApi> {
        self.api
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| PapyrusError::Http("backend client could not be created".into()))
    }

    // -- Images --------------------------------------------------------------

    /// Read and inspect an image picked by the user.
    pub fn open_image(&self, path: &Path) -> Result<SourceImage> {
        SourceImage::open(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "failed to open image");
        })
    }
}

fn build_api(config: &AppConfig) -> Option<HttpApi> {
    match HttpApi::new(config) {
        Ok(api) => Some(api),
        Err(e) => {
            error!(error = %e, "backend client unavailable");
            None
        }
    }
}
