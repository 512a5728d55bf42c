// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for the soundmap views.
//!
//! - **Scales** map data values into screen coordinates and back.
//! - **Layout** splits a view into a plot rectangle and guide margins.
//! - **Axes** generate `soundmap_core::Primitive`s for static guides.

mod axis;
mod format;
mod layout;
mod scale;
mod time;

pub use axis::{AxisOrient, AxisSpec, AxisStyle};
pub use format::format_tick_with_step;
pub use layout::{Margins, PlotLayout};
pub use scale::{
    ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleSpec, ScaleTime, ScaleTimeSpec,
    infer_domain,
};
pub use time::{format_time_seconds, nice_time_ticks_seconds};
