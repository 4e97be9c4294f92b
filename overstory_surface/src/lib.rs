// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Surface: a registry for tracked floating surfaces.
//!
//! This crate sits between the pure geometry of `overstory_placement` and a
//! host environment. It tracks every mounted floating surface (popover,
//! cursor menu, dropdown), assigns stacking order, and turns the host's
//! layout-change signals into re-placement passes.
//!
//! - [`SurfaceRegistry`]: generational storage of [`SurfaceRecord`]s,
//!   placement passes, z-index resolution, and the `on_*` fan-in methods.
//! - [`SurfaceMetrics`]: the host-implemented trait supplying live anchor
//!   rectangles, content sizes, and viewport metrics at call time.
//! - [`StackingProfile`]: the application-wide base z-index configuration,
//!   injected once at startup and read-only thereafter.
//! - [`Containment`]: where a surface lives (nested in another surface, a
//!   tooltip root, an app bar, or top level), driving its z-index.
//!
//! ## Observation model
//!
//! The host owns whatever observers its platform provides (DOM mutation and
//! resize observers, scene-graph dirty bits, a test fixture) and forwards
//! them:
//!
//! - structural change on a surface → [`SurfaceRegistry::on_structural_change`]
//! - content or anchor-container resize → [`SurfaceRegistry::on_size_change`]
//! - window scroll/resize → [`SurfaceRegistry::on_window_change`]
//!
//! Each call takes a [`SurfaceMetrics`] so geometry is read live. Passes are
//! idempotent and silently skip surfaces whose metrics are unavailable —
//! concurrent unmount during a pass is expected, not an error.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for
//!   floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod record;
mod registry;
mod stacking;

pub use host::{Containment, SizeSource, SurfaceMetrics};
pub use record::{SurfaceFlags, SurfaceId, SurfaceRecord, WidthPolicy};
pub use registry::SurfaceRegistry;
pub use stacking::StackingProfile;
