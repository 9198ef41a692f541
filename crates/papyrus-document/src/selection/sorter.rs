// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotational ordering of four corner points.
//
// Corners clicked in arbitrary order can produce a bow-tie when joined in
// click order. Sorting by angle around the centroid yields a simple polygon
// for points in general position.

use papyrus_core::types::{MAX_POINTS, Point};

/// Arithmetic mean of the points.
pub fn centroid(points: &[Point; MAX_POINTS]) -> Point {
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = MAX_POINTS as f64;
    Point::new(sx / n, sy / n)
}

/// Reorder four points by ascending `atan2` angle around their centroid.
///
/// Pure reordering: the same four values come back. The sort is stable, so
/// points at equal angles keep their relative order, and sorting an already
/// sorted set is a no-op.
pub fn sort_quadrilateral(points: [Point; MAX_POINTS]) -> [Point; MAX_POINTS] {
    let c = centroid(&points);
    let angle = |p: &Point| (p.y - c.y).atan2(p.x - c.x);
    let mut sorted = points;
    sorted.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
    sorted
}

/// Whether the closed polygon `p0 p1 p2 p3` has no crossing edges.
///
/// Only the two pairs of opposite edges can cross in a quadrilateral.
pub fn is_simple_quadrilateral(points: &[Point; MAX_POINTS]) -> bool {
    let [a, b, c, d] = *points;
    !segments_cross(a, b, c, d) && !segments_cross(b, c, d, a)
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper crossing test: the interiors of `pq` and `rs` intersect.
fn segments_cross(p: Point, q: Point, r: Point, s: Point) -> bool {
    let d1 = orientation(p, q, r);
    let d2 = orientation(p, q, s);
    let d3 = orientation(r, s, p);
    let d4 = orientation(r, s, q);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
