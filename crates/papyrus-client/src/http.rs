// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP implementation of the backend calls, on top of reqwest.

use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, instrument};

use papyrus_core::AppConfig;
use papyrus_core::error::{PapyrusError, Result};
use papyrus_core::types::TaskId;
use papyrus_document::SourceImage;

use crate::api::PapyrusApi;
use crate::protocol::{
    COORDINATES_FIELD, IMAGE_FIELD, ResultResponse, RESULT_SEGMENTS, SUBMIT_PATH,
    SubmitResponse,
};

/// Backend client bound to one server base URL.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client from the configured server URL and timeout.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PapyrusError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Status URL for `task_id`, which always lands in a single path segment.
    fn result_url(&self, task_id: &TaskId) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| PapyrusError::Poll(format!("invalid server URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| PapyrusError::Poll(format!("server URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(RESULT_SEGMENTS.iter().copied().chain([task_id.as_str()]));
        Ok(url)
    }
}

impl PapyrusApi for HttpApi {
    #[instrument(skip(self, image, coordinates), fields(file = %image.file_name(), bytes = image.bytes().len()))]
    async fn submit(&self, image: &SourceImage, coordinates: String) -> Result<SubmitResponse> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| PapyrusError::Submission(format!("invalid image MIME type: {e}")))?;
        let form = Form::new()
            .text(COORDINATES_FIELD, coordinates)
            .part(IMAGE_FIELD, part);

        let url = self.url(SUBMIT_PATH);
        info!(url = %url, "submitting image");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PapyrusError::Submission(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "submission rejected");
            return Err(PapyrusError::Submission(format!(
                "server responded with HTTP {status}"
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| PapyrusError::Submission(format!("malformed response body: {e}")))?;
        debug!(status = %body.status, task_id = ?body.task_id, "submission accepted");
        Ok(body)
    }

    #[instrument(skip(self), fields(task_id = %task_id))]
    async fn task_result(&self, task_id: &TaskId) -> Result<ResultResponse> {
        let url = self.result_url(task_id)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PapyrusError::Poll(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "status request rejected");
            return Err(PapyrusError::Poll(format!(
                "server responded with HTTP {status}"
            )));
        }

        let body: ResultResponse = response
            .json()
            .await
            .map_err(|e| PapyrusError::Poll(format!("malformed response body: {e}")))?;
        debug!(query_status = %body.query_status, results = body.query_result.len(), "status received");
        Ok(body)
    }
}
