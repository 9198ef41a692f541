// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner collection: accepts up to four in-bounds clicks, then locks.

use papyrus_core::types::{Point, PointSet};
use tracing::{debug, info};

use super::sorter::sort_quadrilateral;

/// Accumulates the corner points of one loaded image.
///
/// The fourth accepted point puts the set into rotational order and freezes
/// it; further `add` calls are rejected until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct PointCollector {
    points: PointSet,
    image_width: f64,
    image_height: f64,
}

impl PointCollector {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            points: PointSet::new(),
            image_width: f64::from(image_width),
            image_height: f64::from(image_height),
        }
    }

    /// Try to append an image-space point.
    ///
    /// Returns `false` without touching the set when it is already complete
    /// or the point lies outside the image.
    pub fn add(&mut self, point: Point) -> bool {
        if self.points.is_complete() {
            debug!(x = point.x, y = point.y, "selection complete, click ignored");
            return false;
        }
        if !point.within(self.image_width, self.image_height) {
            debug!(x = point.x, y = point.y, "click outside image ignored");
            return false;
        }
        if !self.points.push(point) {
            return false;
        }
        debug!(x = point.x, y = point.y, count = self.points.len(), "corner accepted");

        if let Some(corners) = self.points.corners() {
            let sorted = sort_quadrilateral(corners);
            self.points.reorder(sorted);
            info!(corners = ?self.points.coordinate_pairs(), "selection complete");
        }
        true
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_complete(&self) -> bool {
        self.points.is_complete()
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Clear all points and accept clicks again.
    pub fn reset(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::sorter::is_simple_quadrilateral;

    #[test]
    fn rejects_out_of_bounds() {
        let mut c = PointCollector::new(800, 600);
        assert!(!c.add(Point::new(-1.0, 10.0)));
        assert!(!c.add(Point::new(10.0, 600.01)));
        assert!(!c.add(Point::new(801.0, 0.0)));
        assert_eq!(c.count(), 0);
        assert!(c.add(Point::new(800.0, 600.0)));
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn fifth_click_is_rejected() {
        let mut c = PointCollector::new(100, 100);
        for (x, y) in [(0.0, 0.0), (100.0, 100.0), (100.0, 0.0), (0.0, 100.0)] {
            assert!(c.add(Point::new(x, y)));
        }
        assert!(c.is_complete());
        assert!(!c.add(Point::new(50.0, 50.0)));
        assert!(!c.add(Point::new(-50.0, 50.0)));
        assert_eq!(c.count(), 4);
    }

    #[test]
    fn fourth_point_sorts_the_set() {
        let mut c = PointCollector::new(10, 10);
        for (x, y) in [(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)] {
            c.add(Point::new(x, y));
        }
        let corners = c.points().corners().unwrap();
        assert!(is_simple_quadrilateral(&corners));
        assert_eq!(
            c.points().coordinate_pairs(),
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
        );
    }

    #[test]
    fn partial_set_keeps_insertion_order() {
        let mut c = PointCollector::new(10, 10);
        c.add(Point::new(9.0, 9.0));
        c.add(Point::new(1.0, 1.0));
        assert_eq!(c.points().coordinate_pairs(), vec![[9.0, 9.0], [1.0, 1.0]]);
    }

    #[test]
    fn reset_reenables_acceptance() {
        let mut c = PointCollector::new(10, 10);
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            c.add(Point::new(x, y));
        }
        c.reset();
        assert_eq!(c.count(), 0);
        assert!(!c.is_complete());
        assert!(c.add(Point::new(5.0, 5.0)));
    }
}
