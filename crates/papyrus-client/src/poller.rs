// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Task status polling.
//
// Status requests are chained: wait one interval, send one status request, await its
// answer, then wait again. At most one request is ever outstanding, so answers
// cannot be applied out of order. Cancellation stops the loop at the next
// suspension point and any answer that arrives afterwards is dropped.
//
//   Polling --SUCCESS--> Success
//   Polling --FAILURE--> Failure
//   Polling --transport error / bad body--> Error
//   Polling --anything else--> Polling

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use papyrus_core::types::{SubmissionJob, TaskStatus};

use crate::api::PapyrusApi;
use crate::cancel::CancelToken;

/// Where a tracked task stands, from the poller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Not finished; carries the raw status keyword for display.
    Polling(String),
    /// Finished with these result URLs.
    Success(Vec<String>),
    /// The backend reported the task as failed.
    Failure(String),
    /// The status request itself failed.
    Error(String),
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Polling(_))
    }
}

/// Follows one task until it reaches a terminal state.
pub struct TaskStatusPoller<'a, A> {
    api: &'a A,
    interval: Duration,
}

impl<'a, A: PapyrusApi> TaskStatusPoller<'a, A> {
    pub fn new(api: &'a A, interval: Duration) -> Self {
        Self { api, interval }
    }

    /// Poll until the task terminates or `cancel` fires.
    ///
    /// The job is updated from every report before `on_state` sees it.
    /// Returns the terminal state, or `None` when cancelled.
    #[instrument(skip_all, fields(task_id = %job.task_id))]
    pub async fn run(
        &self,
        job: &mut SubmissionJob,
        cancel: &CancelToken,
        mut on_state: impl FnMut(&SubmissionJob, &PollState),
    ) -> Option<PollState> {
        let mut requests = 0u32;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(requests, "polling cancelled while waiting");
                    return None;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            requests += 1;
            let response = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(requests, "polling cancelled with a request outstanding");
                    return None;
                }
                response = self.api.task_result(&job.task_id) => response,
            };
            if cancel.is_cancelled() {
                debug!(requests, "late status response discarded");
                return None;
            }

            let state = match response {
                Err(e) => {
                    warn!(requests, error = %e, "status request failed, polling stopped");
                    PollState::Error(e.to_string())
                }
                Ok(body) => match TaskStatus::from_wire(&body.query_status) {
                    TaskStatus::Success => {
                        job.record(TaskStatus::Success, Some(body.query_result.clone()));
                        info!(requests, results = body.query_result.len(), "task succeeded");
                        PollState::Success(body.query_result)
                    }
                    TaskStatus::Failure => {
                        job.record(TaskStatus::Failure, None);
                        warn!(requests, "task reported failure");
                        PollState::Failure(format!("task {} reported FAILURE", job.task_id))
                    }
                    other => {
                        debug!(requests, status = %other, "task still running");
                        job.record(other, None);
                        PollState::Polling(body.query_status)
                    }
                },
            };

            on_state(job, &state);
            if state.is_terminal() {
                return Some(state);
            }
        }
    }
}
