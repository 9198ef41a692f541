// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// papyrus-document: Source image handling and corner selection.
//
// Inspects uploaded images for size and format, maps pointer positions between
// the scaled display surface and the source image, collects the four corner
// clicks, and puts them into rotational order.

pub mod image;
pub mod selection;

pub use crate::image::source::SourceImage;
pub use selection::collector::PointCollector;
pub use selection::mapper::CoordinateMapper;
pub use selection::sorter::sort_quadrilateral;
