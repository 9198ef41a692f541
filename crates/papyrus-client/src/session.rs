// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session state: the one loaded image, its corner selection, and the task
// being tracked, plus the UI capabilities the core drives.
//
// All mutation goes through `&mut Session`, so events (clicks, pointer moves,
// network answers) are applied one at a time. Every submission gets a fresh
// generation number; reset, go-back and resubmission bump it, and events
// tagged with an older generation are dropped unapplied.

use std::time::Duration;

use tracing::{debug, info, warn};

use papyrus_core::AppConfig;
use papyrus_core::error::{PapyrusError, Result};
use papyrus_core::human_errors::status_line;
use papyrus_core::types::{PointSet, ScaleTransform, SubmissionJob};
use papyrus_document::{CoordinateMapper, PointCollector, SourceImage};

use crate::api::PapyrusApi;
use crate::cancel::CancelToken;
use crate::poller::{PollState, TaskStatusPoller};
use crate::submit::{SubmissionController, Submitted};

/// What the core needs from the UI. Coordinates are display-space pixels.
pub trait UiAdapter {
    /// Show the display surface with the image drawn through `transform`.
    fn render_image(&mut self, image: &SourceImage, transform: &ScaleTransform);
    /// Hide the display surface and forget the drawn image.
    fn clear_surface(&mut self);
    /// Redraw the image with these point markers (may be empty).
    fn draw_points(&mut self, points: &[(f64, f64)]);
    /// Redraw the image with this closed outline.
    fn draw_polygon(&mut self, vertices: &[(f64, f64)]);
    fn set_upload_visible(&mut self, visible: bool);
    fn set_submit_visible(&mut self, visible: bool);
    fn set_redo_visible(&mut self, visible: bool);
    fn show_tooltip(&mut self, text: &str, display_x: f64, display_y: f64);
    fn hide_tooltip(&mut self);
    /// Replace the status line (empty clears it).
    fn set_status(&mut self, text: &str);
    /// Show result links; an empty list hides the result area.
    fn show_results(&mut self, urls: &[String]);
}

/// Progress of a submission, reported back into the session.
#[derive(Debug)]
pub enum SessionEvent {
    /// The backend accepted the upload.
    Submitted(Submitted),
    /// The upload was refused or never left the client.
    Rejected(PapyrusError),
    /// A status report for the tracked task.
    Progress { job: SubmissionJob, state: PollState },
    /// The driving task went away before the submission settled.
    Interrupted,
}

/// Everything a submission needs, detached from the session so it can run
/// while the session keeps handling UI events.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub generation: u64,
    pub image: Option<SourceImage>,
    pub points: PointSet,
    pub cancel: CancelToken,
}

/// The single UI session: at most one image, one selection, one task.
pub struct Session<U> {
    ui: U,
    config: AppConfig,
    image: Option<SourceImage>,
    mapper: Option<CoordinateMapper>,
    collector: Option<PointCollector>,
    job: Option<SubmissionJob>,
    in_flight: Option<CancelToken>,
    generation: u64,
}

impl<U: UiAdapter> Session<U> {
    pub fn new(config: AppConfig, ui: U) -> Self {
        Self {
            ui,
            config,
            image: None,
            mapper: None,
            collector: None,
            job: None,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Display bounds apply to the next loaded image.
    pub fn set_config(&mut self, config: AppConfig) {
        self.config = config;
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn mapper(&self) -> Option<&CoordinateMapper> {
        self.mapper.as_ref()
    }

    pub fn points(&self) -> Option<&PointSet> {
        self.collector.as_ref().map(|c| c.points())
    }

    pub fn job(&self) -> Option<&SubmissionJob> {
        self.job.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Image ---------------------------------------------------------------

    /// Show a newly loaded image and start a fresh selection on it.
    pub fn load_image(&mut self, image: SourceImage) -> Result<()> {
        let mapper = CoordinateMapper::fit(
            image.width(),
            image.height(),
            self.config.max_display_width,
            self.config.max_display_height,
            self.config.display_padding,
        )?;
        self.abandon_job();
        info!(
            file = %image.file_name(),
            width = image.width(),
            height = image.height(),
            scale = mapper.transform().scale_x,
            "image shown"
        );

        self.collector = Some(PointCollector::new(image.width(), image.height()));
        self.ui.render_image(&image, mapper.transform());
        self.mapper = Some(mapper);
        self.image = Some(image);

        self.ui.draw_points(&[]);
        self.ui.set_upload_visible(false);
        self.ui.set_submit_visible(false);
        self.ui.set_redo_visible(true);
        self.ui.set_status("");
        self.ui.show_results(&[]);
        Ok(())
    }

    // -- Pointer -------------------------------------------------------------

    /// Handle a click at display coordinates. Returns whether a corner was added.
    pub fn pointer_click(&mut self, display_x: f64, display_y: f64) -> bool {
        let (Some(mapper), Some(collector)) = (self.mapper.as_ref(), self.collector.as_mut()) else {
            return false;
        };
        let point = mapper.to_image_space(display_x, display_y);
        if !collector.add(point) {
            return false;
        }
        self.redraw_selection();
        true
    }

    /// Show the image-space position under the pointer.
    pub fn pointer_move(&mut self, display_x: f64, display_y: f64) {
        let Some(mapper) = self.mapper.as_ref() else {
            return;
        };
        let p = mapper.to_image_space(display_x, display_y);
        let text = format!("x: {}, y: {}", p.x.round(), p.y.round());
        self.ui.show_tooltip(&text, display_x, display_y);
    }

    pub fn pointer_leave(&mut self) {
        self.ui.hide_tooltip();
    }

    fn redraw_selection(&mut self) {
        let (Some(mapper), Some(collector)) = (self.mapper.as_ref(), self.collector.as_ref()) else {
            return;
        };
        let display: Vec<(f64, f64)> = collector
            .points()
            .as_slice()
            .iter()
            .map(|p| mapper.to_display_space(*p))
            .collect();
        if collector.is_complete() {
            self.ui.draw_polygon(&display);
            self.ui.set_submit_visible(self.in_flight.is_none());
        } else {
            self.ui.draw_points(&display);
        }
    }

    // -- Reset ---------------------------------------------------------------

    /// Discard the selection and any tracked task, keep the image.
    pub fn redo(&mut self) {
        self.abandon_job();
        if let Some(collector) = self.collector.as_mut() {
            collector.reset();
        }
        debug!(generation = self.generation, "selection cleared");
        self.ui.draw_points(&[]);
        self.ui.set_submit_visible(false);
        self.ui.set_status("");
        self.ui.show_results(&[]);
    }

    /// Discard everything and return to image selection.
    pub fn go_back(&mut self) {
        self.redo();
        self.image = None;
        self.mapper = None;
        self.collector = None;
        self.ui.clear_surface();
        self.ui.hide_tooltip();
        self.ui.set_redo_visible(false);
        self.ui.set_upload_visible(true);
        debug!("returned to image selection");
    }

    /// Stop tracking the current task; later events for it are ignored.
    fn abandon_job(&mut self) {
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
            info!(generation = self.generation, "in-flight submission cancelled");
        }
        self.job = None;
        self.generation += 1;
    }

    // -- Submission ----------------------------------------------------------

    /// Start a submission: stop any previous one, hide the submit control,
    /// and hand out a ticket for [`run_submission`].
    pub fn begin_submission(&mut self) -> SubmissionTicket {
        self.abandon_job();
        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());

        self.ui.set_submit_visible(false);
        self.ui.set_status("");
        self.ui.show_results(&[]);

        SubmissionTicket {
            generation: self.generation,
            image: self.image.clone(),
            points: self.points().cloned().unwrap_or_default(),
            cancel,
        }
    }

    /// Apply a submission event. Events from an abandoned generation are
    /// dropped; returns whether the event was applied.
    pub fn apply(&mut self, generation: u64, event: SessionEvent) -> bool {
        if generation != self.generation || self.in_flight.is_none() {
            debug!(generation, current = self.generation, "stale event dropped");
            return false;
        }
        match event {
            SessionEvent::Submitted(submitted) => {
                self.ui
                    .set_status(&format!("Task Status: {}", submitted.status));
                self.job = Some(SubmissionJob::new(submitted.task_id));
            }
            SessionEvent::Rejected(err) => {
                warn!(error = %err, "submission rejected");
                self.ui.set_status(&status_line(&err));
                self.finish_submission(true);
            }
            SessionEvent::Progress { job, state } => {
                self.job = Some(job);
                match &state {
                    PollState::Polling(status) => {
                        self.ui.set_status(&format!("Task Status: {status}"));
                    }
                    PollState::Success(urls) => {
                        self.ui.set_status("Task completed successfully!");
                        self.ui.show_results(urls);
                    }
                    PollState::Failure(detail) => {
                        self.ui
                            .set_status(&status_line(&PapyrusError::TaskFailed(detail.clone())));
                    }
                    PollState::Error(detail) => {
                        self.ui.set_status(&format!("Error: {detail}"));
                    }
                }
                if state.is_terminal() {
                    self.finish_submission(!matches!(state, PollState::Success(_)));
                }
            }
            SessionEvent::Interrupted => {
                warn!(generation, "submission stopped before the task finished");
                let err = PapyrusError::Poll("tracking stopped before the task finished".into());
                self.ui.set_status(&status_line(&err));
                self.finish_submission(true);
            }
        }
        true
    }

    fn finish_submission(&mut self, allow_resubmit: bool) {
        self.in_flight = None;
        let complete = self.collector.as_ref().is_some_and(|c| c.is_complete());
        self.ui
            .set_submit_visible(allow_resubmit && complete && self.image.is_some());
    }

    /// Submit and track the task to completion, applying every event to this
    /// session as it happens.
    #[cfg(test)]
    pub(crate) async fn submit_and_track<A: PapyrusApi>(&mut self, api: &A) -> Option<PollState> {
        let ticket = self.begin_submission();
        let interval = self.config.poll_interval();
        run_submission(api, ticket, interval, |generation, event| {
            self.apply(generation, event);
        })
        .await
    }
}

/// Drive one submission: upload, then poll until the task terminates.
///
/// Every step is reported through `emit`, tagged with the ticket's
/// generation. Returns the terminal poll state, or `None` if the upload
/// failed or the ticket was cancelled. If the future is dropped before the
/// submission settles, a final [`SessionEvent::Interrupted`] is emitted.
pub async fn run_submission<A: PapyrusApi>(
    api: &A,
    ticket: SubmissionTicket,
    interval: Duration,
    emit: impl FnMut(u64, SessionEvent),
) -> Option<PollState> {
    let SubmissionTicket {
        generation,
        image,
        points,
        cancel,
    } = ticket;
    let mut reporter = Reporter {
        generation,
        emit,
        settled: false,
    };

    let controller = SubmissionController::new(api);
    let submitted = tokio::select! {
        _ = cancel.cancelled() => return reporter.settle(None),
        result = controller.submit(image.as_ref(), &points) => result,
    };
    if cancel.is_cancelled() {
        return reporter.settle(None);
    }
    let submitted = match submitted {
        Ok(submitted) => submitted,
        Err(err) => {
            reporter.send(SessionEvent::Rejected(err));
            return reporter.settle(None);
        }
    };

    let mut job = SubmissionJob::new(submitted.task_id.clone());
    reporter.send(SessionEvent::Submitted(submitted));

    let end = TaskStatusPoller::new(api, interval)
        .run(&mut job, &cancel, |job, state| {
            reporter.send(SessionEvent::Progress {
                job: job.clone(),
                state: state.clone(),
            });
        })
        .await;
    reporter.settle(end)
}

/// Tags events with their generation; reports an interruption when dropped
/// unsettled.
struct Reporter<F: FnMut(u64, SessionEvent)> {
    generation: u64,
    emit: F,
    settled: bool,
}

impl<F: FnMut(u64, SessionEvent)> Reporter<F> {
    fn send(&mut self, event: SessionEvent) {
        (self.emit)(self.generation, event);
    }

    fn settle<T>(&mut self, value: T) -> T {
        self.settled = true;
        value
    }
}

impl<F: FnMut(u64, SessionEvent)> Drop for Reporter<F> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(generation = self.generation, "submission dropped unsettled");
            (self.emit)(self.generation, SessionEvent::Interrupted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, accepted, sample_image, status, success};
    use papyrus_core::types::{TaskId, TaskStatus};

    /// Records every UI call for assertions.
    #[derive(Debug, Default)]
    struct RecordingUi {
        surface: bool,
        points: Vec<(f64, f64)>,
        polygon: Vec<(f64, f64)>,
        upload: bool,
        submit: bool,
        redo: bool,
        tooltip: Option<String>,
        status: String,
        statuses: Vec<String>,
        results: Vec<String>,
    }

    impl UiAdapter for RecordingUi {
        fn render_image(&mut self, _image: &SourceImage, _transform: &ScaleTransform) {
            self.surface = true;
        }
        fn clear_surface(&mut self) {
            self.surface = false;
            self.points.clear();
            self.polygon.clear();
        }
        fn draw_points(&mut self, points: &[(f64, f64)]) {
            self.points = points.to_vec();
            self.polygon.clear();
        }
        fn draw_polygon(&mut self, vertices: &[(f64, f64)]) {
            self.polygon = vertices.to_vec();
            self.points.clear();
        }
        fn set_upload_visible(&mut self, visible: bool) {
            self.upload = visible;
        }
        fn set_submit_visible(&mut self, visible: bool) {
            self.submit = visible;
        }
        fn set_redo_visible(&mut self, visible: bool) {
            self.redo = visible;
        }
        fn show_tooltip(&mut self, text: &str, _x: f64, _y: f64) {
            self.tooltip = Some(text.to_string());
        }
        fn hide_tooltip(&mut self) {
            self.tooltip = None;
        }
        fn set_status(&mut self, text: &str) {
            self.status = text.to_string();
            if !text.is_empty() {
                self.statuses.push(text.to_string());
            }
        }
        fn show_results(&mut self, urls: &[String]) {
            self.results = urls.to_vec();
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            max_display_width: 400.0,
            max_display_height: 300.0,
            poll_interval_ms: 1,
            ..Default::default()
        }
    }

    /// Session with the 8x6 sample image loaded (scale 50, padding 50).
    fn loaded() -> Session<RecordingUi> {
        let mut session = Session::new(config(), RecordingUi::default());
        session.load_image(sample_image()).unwrap();
        session
    }

    /// Click the four image corners in bow-tie order.
    fn mark_corners(session: &mut Session<RecordingUi>) {
        for (x, y) in [(0.0, 50.0), (400.0, 350.0), (400.0, 50.0), (0.0, 350.0)] {
            assert!(session.pointer_click(x, y), "click ({x}, {y}) rejected");
        }
    }

    #[test]
    fn load_shows_surface_and_hides_upload() {
        let session = loaded();
        let ui = session.ui();
        assert!(ui.surface);
        assert!(!ui.upload);
        assert!(ui.redo);
        assert!(!ui.submit);
        let t = session.mapper().unwrap().transform();
        assert_eq!((t.scale_x, t.offset_y), (50.0, 50.0));
    }

    #[test]
    fn clicks_before_load_are_ignored() {
        let mut session = Session::new(config(), RecordingUi::default());
        assert!(!session.pointer_click(10.0, 10.0));
    }

    #[test]
    fn clicks_outside_the_image_are_rejected() {
        let mut session = loaded();
        assert!(!session.pointer_click(10.0, 20.0));
        assert!(!session.pointer_click(401.0, 100.0));
        assert_eq!(session.points().unwrap().len(), 0);
    }

    #[test]
    fn fourth_click_draws_sorted_polygon_and_shows_submit() {
        let mut session = loaded();
        session.pointer_click(0.0, 50.0);
        assert_eq!(session.ui().points, vec![(0.0, 50.0)]);
        assert!(!session.ui().submit);

        session.pointer_click(400.0, 350.0);
        session.pointer_click(400.0, 50.0);
        session.pointer_click(0.0, 350.0);
        assert!(session.ui().submit);
        assert_eq!(
            session.ui().polygon,
            vec![(0.0, 50.0), (400.0, 50.0), (400.0, 350.0), (0.0, 350.0)]
        );
        assert!(!session.pointer_click(200.0, 200.0));
    }

    #[test]
    fn tooltip_shows_rounded_image_coordinates() {
        let mut session = loaded();
        session.pointer_move(126.0, 174.0);
        assert_eq!(session.ui().tooltip.as_deref(), Some("x: 3, y: 2"));
        session.pointer_leave();
        assert!(session.ui().tooltip.is_none());
    }

    #[test]
    fn redo_clears_selection_and_results() {
        let mut session = loaded();
        mark_corners(&mut session);
        session.ui_mut().results = vec!["http://x/1.png".into()];
        session.ui_mut().status = "Task completed successfully!".into();

        session.redo();
        assert_eq!(session.points().unwrap().len(), 0);
        assert!(!session.ui().submit);
        assert!(session.ui().results.is_empty());
        assert!(session.ui().status.is_empty());
        assert!(session.pointer_click(0.0, 50.0));
    }

    #[test]
    fn go_back_unloads_image() {
        let mut session = loaded();
        mark_corners(&mut session);
        session.go_back();
        assert!(session.image().is_none());
        assert!(session.points().is_none());
        assert!(session.ui().upload);
        assert!(!session.ui().redo);
        assert!(!session.ui().surface);
        assert!(!session.pointer_click(0.0, 50.0));
    }

    #[tokio::test]
    async fn full_flow_reaches_success() {
        let api = FakeApi::new(
            vec![accepted("abc123")],
            vec![status("PENDING"), status("STARTED"), success(&["http://x/1.png"])],
        );
        let mut session = loaded();
        mark_corners(&mut session);

        let end = session.submit_and_track(&api).await;
        assert_eq!(end, Some(PollState::Success(vec!["http://x/1.png".into()])));

        let sent = api.submissions.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "[[0.0,0.0],[8.0,0.0],[8.0,6.0],[0.0,6.0]]");
        assert!(api.polls.lock().unwrap().iter().all(|id| id == "abc123"));

        let ui = session.ui();
        assert_eq!(
            ui.statuses,
            vec![
                "Task Status: queued",
                "Task Status: PENDING",
                "Task Status: STARTED",
                "Task completed successfully!",
            ]
        );
        assert_eq!(ui.results, vec!["http://x/1.png".to_string()]);
        assert!(!ui.submit);
        assert!(!session.is_submitting());

        let job = session.job().unwrap();
        assert_eq!(job.task_id, TaskId("abc123".into()));
        assert_eq!(job.status, TaskStatus::Success);
    }

    #[tokio::test]
    async fn missing_image_reports_inline_without_request() {
        let api = FakeApi::new(vec![accepted("abc123")], vec![]);
        let mut session = Session::new(config(), RecordingUi::default());

        let end = session.submit_and_track(&api).await;
        assert_eq!(end, None);
        assert!(api.submissions.lock().unwrap().is_empty());
        assert_eq!(session.ui().status, "Error: no image selected");
    }

    #[tokio::test]
    async fn rejected_submission_allows_resubmit() {
        let api = FakeApi::new(
            vec![Err(PapyrusError::Submission("server responded with HTTP 502".into()))],
            vec![],
        );
        let mut session = loaded();
        mark_corners(&mut session);

        assert_eq!(session.submit_and_track(&api).await, None);
        assert_eq!(
            session.ui().status,
            "Error: submission failed: server responded with HTTP 502"
        );
        assert!(session.ui().submit);
        assert_eq!(api.poll_count(), 0);
    }

    #[tokio::test]
    async fn backend_failure_is_distinct_from_transport_error() {
        let api = FakeApi::new(vec![accepted("t1")], vec![status("FAILURE")]);
        let mut session = loaded();
        mark_corners(&mut session);
        session.submit_and_track(&api).await;
        assert_eq!(session.ui().status, "Task failed.");

        let api = FakeApi::new(
            vec![accepted("t2")],
            vec![Err(PapyrusError::Poll("connection reset".into()))],
        );
        session.submit_and_track(&api).await;
        assert_eq!(session.ui().status, "Error: status request failed: connection reset");
    }

    #[tokio::test]
    async fn dropped_tracking_restores_submit() {
        let api = FakeApi::new(vec![accepted("abc123")], vec![])
            .with_poll_delay(Duration::from_millis(200));
        let mut session = loaded();
        mark_corners(&mut session);

        let outcome =
            tokio::time::timeout(Duration::from_millis(12), session.submit_and_track(&api)).await;
        assert!(outcome.is_err());

        assert!(!session.is_submitting());
        assert!(session.ui().submit);
        assert_eq!(
            session.ui().status,
            "Error: status request failed: tracking stopped before the task finished"
        );
        assert!(!session.ui().statuses.iter().any(|s| s == "Task Status: PENDING"));
    }

    #[tokio::test]
    async fn cancelled_submission_emits_nothing() {
        let api = FakeApi::new(vec![accepted("abc123")], vec![]);
        let mut session = loaded();
        mark_corners(&mut session);
        let ticket = session.begin_submission();
        ticket.cancel.cancel();

        let mut events = Vec::new();
        let end = run_submission(&api, ticket, Duration::from_millis(1), |_, event| {
            events.push(event);
        })
        .await;
        assert_eq!(end, None);
        assert!(events.is_empty());
    }

    #[test]
    fn events_from_abandoned_generation_are_dropped() {
        let mut session = loaded();
        mark_corners(&mut session);
        let ticket = session.begin_submission();
        session.redo();

        let applied = session.apply(
            ticket.generation,
            SessionEvent::Progress {
                job: SubmissionJob::new(TaskId("old".into())),
                state: PollState::Success(vec!["http://stale".into()]),
            },
        );
        assert!(!applied);
        assert!(ticket.cancel.is_cancelled());
        assert!(session.ui().results.is_empty());
        assert!(session.job().is_none());
    }

    #[test]
    fn new_submission_cancels_the_previous_one() {
        let mut session = loaded();
        mark_corners(&mut session);
        let first = session.begin_submission();
        let second = session.begin_submission();
        assert!(first.cancel.is_cancelled());
        assert!(!second.cancel.is_cancelled());
        assert_ne!(first.generation, second.generation);
    }
}
