// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Papyrus.

use thiserror::Error;

/// Top-level error type for all Papyrus operations.
#[derive(Debug, Error)]
pub enum PapyrusError {
    // -- Input errors --
    #[error("no image selected")]
    NoImageSelected,

    #[error("selection incomplete: {count} of 4 corners marked")]
    IncompleteSelection { count: usize },

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid display transform: {0}")]
    InvalidTransform(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Transport errors --
    #[error("submission failed: {0}")]
    Submission(String),

    #[error("status request failed: {0}")]
    Poll(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // -- Backend-reported --
    #[error("task failed: {0}")]
    TaskFailed(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PapyrusError>;
