// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Submission: validates the selection, uploads image + corners once, and
// extracts the task id. Never retries: a failed submission needs the user to
// press submit again.

use tracing::{info, instrument, warn};

use papyrus_core::error::{PapyrusError, Result};
use papyrus_core::types::{PointSet, TaskId};
use papyrus_document::SourceImage;

use crate::api::PapyrusApi;
use crate::protocol::encode_coordinates;

/// A task the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub task_id: TaskId,
    /// Initial status text from the backend.
    pub status: String,
}

/// Issues the creation request for one selection.
pub struct SubmissionController<'a, A> {
    api: &'a A,
}

impl<'a, A: PapyrusApi> SubmissionController<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Submit the image with its four corners, in the order the set holds.
    ///
    /// Input problems are reported before any request is sent.
    #[instrument(skip_all, fields(points = points.len()))]
    pub async fn submit(&self, image: Option<&SourceImage>, points: &PointSet) -> Result<Submitted> {
        let image = image.ok_or(PapyrusError::NoImageSelected)?;
        let coordinates = encode_coordinates(points)?;

        info!(file = %image.file_name(), coordinates = %coordinates, "submitting selection");
        let response = self.api.submit(image, coordinates).await?;

        let task_id = response
            .task_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                warn!(status = %response.status, "response carried no task id");
                PapyrusError::Submission("response did not include a task id".into())
            })?;

        info!(task_id = %task_id, status = %response.status, "task created");
        Ok(Submitted {
            task_id: TaskId(task_id),
            status: response.status,
        })
    }
}
