// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Papyrus client.

use serde::{Deserialize, Serialize};

use crate::error::{PapyrusError, Result};

/// Number of corners a complete selection holds.
pub const MAX_POINTS: usize = 4;

/// A point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether the point lies inside `[0, width] x [0, height]` (edges included).
    pub fn within(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x <= width && self.y <= height
    }

    /// The `[x, y]` pair sent to the backend.
    pub fn to_pair(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Ordered selection of up to [`MAX_POINTS`] corners.
///
/// Insertion order until the fourth point arrives; after that the owner
/// replaces the contents with rotational order and stops accepting points.
///
/// Serialized as a plain list of points; a list longer than [`MAX_POINTS`]
/// does not deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct PointSet {
    points: Vec<Point>,
}

impl TryFrom<Vec<Point>> for PointSet {
    type Error = PapyrusError;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        if points.len() > MAX_POINTS {
            return Err(PapyrusError::InvalidCoordinates(format!(
                "expected at most {MAX_POINTS} points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }
}

impl From<PointSet> for Vec<Point> {
    fn from(set: PointSet) -> Self {
        set.points
    }
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == MAX_POINTS
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Append a point. Returns `false` once the set is full.
    pub fn push(&mut self, point: Point) -> bool {
        if self.is_complete() {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Replace the contents of a complete set with a reordering of itself.
    pub fn reorder(&mut self, ordered: [Point; MAX_POINTS]) {
        self.points = ordered.to_vec();
    }

    /// The four corners, if the set is complete.
    pub fn corners(&self) -> Option<[Point; MAX_POINTS]> {
        self.points.as_slice().try_into().ok()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The corners as `[x, y]` pairs, in current order.
    pub fn coordinate_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| p.to_pair()).collect()
    }
}

/// Affine mapping parameters between display space and image space.
///
/// `display = image * scale + offset` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ScaleTransform {
    /// Build a transform, rejecting zero, negative or non-finite parameters.
    pub fn new(scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) -> Result<Self> {
        for (name, scale) in [("scale_x", scale_x), ("scale_y", scale_y)] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(PapyrusError::InvalidTransform(format!(
                    "{name} must be a positive finite number, got {scale}"
                )));
            }
        }
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(PapyrusError::InvalidTransform(format!(
                "offsets must be finite, got ({offset_x}, {offset_y})"
            )));
        }
        Ok(Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        })
    }

    /// Fit an image inside `max_width x max_height`, preserving aspect ratio.
    ///
    /// Both axes get `min(max_width / width, max_height / height)`. The image
    /// is drawn flush left, `padding` pixels below the top of the surface.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        max_width: f64,
        max_height: f64,
        padding: f64,
    ) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(PapyrusError::InvalidTransform(format!(
                "image has no area ({image_width}x{image_height})"
            )));
        }
        let scale = (max_width / f64::from(image_width)).min(max_height / f64::from(image_height));
        Self::new(scale, scale, 0.0, padding)
    }

    /// Size of the display surface needed to show an image of the given size.
    pub fn surface_size(&self, image_width: u32, image_height: u32) -> (f64, f64) {
        (
            self.offset_x + f64::from(image_width) * self.scale_x,
            self.offset_y + f64::from(image_height) * self.scale_y,
        )
    }
}

/// Backend-assigned identifier of a processing task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle states of a backend task, as reported by the result endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Queued, not yet picked up by a worker.
    Pending,
    /// A worker is processing the task.
    Started,
    /// Finished; result URLs are available.
    Success,
    /// The backend gave up on the task.
    Failure,
    /// Any status string the client does not recognise.
    Other(String),
}

impl TaskStatus {
    /// Parse the backend's upper-case status keyword.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "PENDING" => Self::Pending,
            "STARTED" => Self::Started,
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            other => Self::Other(other.to_string()),
        }
    }

    /// The keyword as the backend spells it.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A submitted task being tracked until it terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionJob {
    pub task_id: TaskId,
    pub status: TaskStatus,
    /// Result artifact URLs; only set once the task succeeded.
    pub result: Option<Vec<String>>,
}

impl SubmissionJob {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record a status report. Terminal jobs are frozen; returns whether the
    /// report was applied.
    pub fn record(&mut self, status: TaskStatus, result: Option<Vec<String>>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.result = if status == TaskStatus::Success {
            Some(result.unwrap_or_default())
        } else {
            None
        };
        self.status = status;
        true
    }
}
