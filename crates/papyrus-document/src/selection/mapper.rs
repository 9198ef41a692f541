// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Display <-> image coordinate mapping for one loaded image.

use papyrus_core::error::Result;
use papyrus_core::types::{Point, ScaleTransform};

/// Bidirectional affine mapping between display-surface pixels and
/// source-image pixels. Fixed for the lifetime of one loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    transform: ScaleTransform,
}

impl CoordinateMapper {
    pub fn new(transform: ScaleTransform) -> Self {
        Self { transform }
    }

    /// Mapper for an image fitted into `max_width x max_height` with
    /// `padding` pixels of chrome above it.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        max_width: f64,
        max_height: f64,
        padding: f64,
    ) -> Result<Self> {
        ScaleTransform::fit(image_width, image_height, max_width, max_height, padding).map(Self::new)
    }

    pub fn transform(&self) -> &ScaleTransform {
        &self.transform
    }

    /// `image = (display - offset) / scale`
    pub fn to_image_space(&self, display_x: f64, display_y: f64) -> Point {
        let t = &self.transform;
        Point::new(
            (display_x - t.offset_x) / t.scale_x,
            (display_y - t.offset_y) / t.scale_y,
        )
    }

    /// `display = image * scale + offset`
    pub fn to_display_space(&self, point: Point) -> (f64, f64) {
        let t = &self.transform;
        (
            point.x * t.scale_x + t.offset_x,
            point.y * t.scale_y + t.offset_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_click_into_fitted_image() {
        let mapper = CoordinateMapper::fit(800, 600, 600.0, 400.0, 50.0).unwrap();
        let p = mapper.to_image_space(100.0, 100.0);
        assert!((p.x - 150.0).abs() < 1e-9, "x = {}", p.x);
        assert!((p.y - 75.0).abs() < 1e-9, "y = {}", p.y);
    }

    #[test]
    fn click_in_padding_maps_above_image() {
        let mapper = CoordinateMapper::fit(800, 600, 600.0, 400.0, 50.0).unwrap();
        assert!(mapper.to_image_space(10.0, 20.0).y < 0.0);
    }

    #[test]
    fn round_trips_within_tolerance() {
        let transforms = [
            ScaleTransform::new(2.0 / 3.0, 2.0 / 3.0, 0.0, 50.0).unwrap(),
            ScaleTransform::new(0.013, 0.013, 0.0, 50.0).unwrap(),
            ScaleTransform::new(7.5, 3.25, -12.0, 0.5).unwrap(),
        ];
        let mut seed = 0x2545_f491_4f6c_dd1d_u64;
        for t in transforms {
            let mapper = CoordinateMapper::new(t);
            for _ in 0..500 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let dx = (seed >> 33) as f64 / 1e4 - 200.0;
                let dy = (seed & 0xffff_ffff) as f64 / 1e7 - 100.0;
                let (rx, ry) = mapper.to_display_space(mapper.to_image_space(dx, dy));
                assert!((rx - dx).abs() < 1e-6, "{dx} -> {rx}");
                assert!((ry - dy).abs() < 1e-6, "{dy} -> {ry}");
            }
        }
    }
}
