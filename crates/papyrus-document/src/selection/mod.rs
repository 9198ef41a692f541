// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Selection module: display/image coordinate mapping, corner collection,
// and rotational ordering.

pub mod collector;
pub mod mapper;
pub mod sorter;

pub use collector::PointCollector;
pub use mapper::CoordinateMapper;
