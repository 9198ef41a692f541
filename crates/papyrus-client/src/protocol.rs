// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire format of the retrieval backend.
//
//   POST /papyrus/submit/          multipart: image (file), coordinates (JSON text)
//                                  -> {"status": "...", "task_id": "..."}
//   GET  /papyrus/result/{task_id} -> {"query_status": "...", "query_result": [...]}

use serde::{Deserialize, Serialize};

use papyrus_core::error::{PapyrusError, Result};
use papyrus_core::types::PointSet;

/// Path of the task creation endpoint.
pub const SUBMIT_PATH: &str = "/papyrus/submit/";

/// Multipart field carrying the encoded image.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the JSON-encoded corner list.
pub const COORDINATES_FIELD: &str = "coordinates";

/// Path segments of the status endpoint; the task id is appended as one
/// more segment.
pub const RESULT_SEGMENTS: [&str; 2] = ["papyrus", "result"];

/// Body returned by the creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Initial human-readable status, e.g. "Papyrus Retrieval has started!".
    pub status: String,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Body returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub query_status: String,
    /// Result URLs; empty until the task succeeds.
    #[serde(default)]
    pub query_result: Vec<String>,
}

/// Encode a complete selection as `[[x, y], [x, y], [x, y], [x, y]]`, in the
/// order the set already holds.
pub fn encode_coordinates(points: &PointSet) -> Result<String> {
    if !points.is_complete() {
        return Err(PapyrusError::IncompleteSelection {
            count: points.len(),
        });
    }
    let pairs = points.coordinate_pairs();
    if pairs.iter().flatten().any(|v| !v.is_finite()) {
        return Err(PapyrusError::InvalidCoordinates(format!(
            "non-finite coordinate in {pairs:?}"
        )));
    }
    Ok(serde_json::to_string(&pairs)?)
}
