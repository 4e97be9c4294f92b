// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-side interfaces: live geometry lookup and layout-change sources.
//!
//! The registry never touches a platform API. The host implements
//! [`SurfaceMetrics`] over whatever it renders into (browser DOM, a scene
//! tree, a test fixture) and forwards its own observer callbacks to the
//! registry's `on_*` methods, passing a metrics implementation each time so
//! geometry is read live rather than cached.

use kurbo::{Rect, Size};
use overstory_placement::Viewport;

use crate::record::SurfaceId;

/// Where a surface lives in the host's containment hierarchy.
///
/// Reported once at registration; the host re-registers on reparenting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Containment {
    /// Nested inside another tracked surface.
    Surface(SurfaceId),
    /// Inside a tooltip root carrying the given explicit z-index.
    Tooltip(i32),
    /// Inside a fixed app bar carrying the given explicit z-index.
    AppBar(i32),
    /// Top level.
    Root,
}

/// Live geometry lookup, implemented by the host.
///
/// Every method is called at placement time. Returning `None` means the
/// element is not available right now, either not yet measured (first
/// layout has not happened) or concurrently unmounted, and makes the
/// placement pass a silent no-op for that surface.
pub trait SurfaceMetrics {
    /// Bounding rectangle of the surface's anchor element, in viewport
    /// coordinates.
    fn anchor_rect(&self, surface: SurfaceId) -> Option<Rect>;

    /// Measured size of the surface's content.
    fn content_size(&self, surface: SurfaceId) -> Option<Size>;

    /// Current viewport metrics, including any fixed top-bar inset.
    fn viewport(&self) -> Viewport;
}

/// What resized, for [`SurfaceRegistry::on_size_change`].
///
/// [`SurfaceRegistry::on_size_change`]: crate::SurfaceRegistry::on_size_change
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SizeSource {
    /// A surface's own content changed size (async content load and the
    /// like); only that surface is re-placed.
    Content(SurfaceId),
    /// A container holding one or more anchors resized; every surface
    /// registered with this anchor group is re-placed.
    AnchorContainer(u64),
}
