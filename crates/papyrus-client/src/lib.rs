// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Papyrus Client talks to the retrieval backend. It submits an image with its
// four corners, then follows the resulting task until it terminates. The
// `Session` type ties the selection core and the backend calls to a UI.

pub mod api;
pub mod cancel;
pub mod http;
pub mod poller;
pub mod protocol;
pub mod session;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use api::PapyrusApi;
pub use cancel::CancelToken;
pub use http::HttpApi;
pub use poller::{PollState, TaskStatusPoller};
pub use session::{Session, SessionEvent, SubmissionTicket, UiAdapter, run_submission};
pub use submit::{Submitted, SubmissionController};
