// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The two backend calls the client depends on.

use std::future::Future;

use papyrus_core::error::Result;
use papyrus_core::types::TaskId;
use papyrus_document::SourceImage;

use crate::protocol::{ResultResponse, SubmitResponse};

/// Access to the retrieval backend.
///
/// [`HttpApi`](crate::http::HttpApi) is the production implementation; tests
/// substitute scripted fakes.
pub trait PapyrusApi {
    /// Upload an image with its JSON-encoded corners. Exactly one request.
    fn submit(
        &self,
        image: &SourceImage,
        coordinates: String,
    ) -> impl Future<Output = Result<SubmitResponse>> + Send;

    /// Query the current status of a task.
    fn task_result(&self, task_id: &TaskId) -> impl Future<Output = Result<ResultResponse>> + Send;
}
