// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for tracked surfaces: identifiers, flags, and per-surface
//! configuration.

use overstory_placement::{CornerSpec, FlipPolicy, PlacementSpec};

/// Identifier for a tracked surface (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SurfaceId(pub(crate) u32, pub(crate) u32);

impl SurfaceId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Surface flags controlling positioning participation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u8 {
        /// Surface uses fixed positioning; it can go stale on window scroll
        /// or resize without any element-level mutation firing, so it is
        /// included in window-level re-placement passes.
        const FIXED = 0b0000_0001;
        /// Skip automatic positioning entirely. Placement passes no-op and
        /// no z-index is assigned; the host manages this surface itself.
        const SKIP_AUTO = 0b0000_0010;
    }
}

impl Default for SurfaceFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// How the surface's width relates to its anchor's width.
///
/// Applied before corner math, so overflow resolution sees the final size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidthPolicy {
    /// Use the measured content width as-is.
    #[default]
    Content,
    /// Force the surface to exactly the anchor's width.
    Relative,
    /// Widen the surface to at least the anchor's width; measured content
    /// wider than the anchor keeps its own width.
    Adaptive,
}

/// Configuration for one tracked floating surface.
#[derive(Clone, Debug)]
pub struct SurfaceRecord {
    /// Corner pair or explicit point override.
    pub spec: PlacementSpec,
    /// When the flip decision is recomputed.
    pub flip_policy: FlipPolicy,
    /// Grace margin below which overflow does not trigger a flip.
    pub flip_margin: f64,
    /// Width coupling to the anchor.
    pub width: WidthPolicy,
    /// Positioning participation flags.
    pub flags: SurfaceFlags,
    /// Explicit z-index pin for a top-level surface. Values below 1 are
    /// ignored and stacking assigns the base as usual.
    pub pinned_z: Option<i32>,
    /// Host key grouping surfaces whose anchors share a resizing container.
    /// A size change reported for the group re-places every member.
    pub anchor_group: Option<u64>,
}

impl Default for SurfaceRecord {
    fn default() -> Self {
        Self {
            spec: PlacementSpec::Corners(CornerSpec::default()),
            flip_policy: FlipPolicy::default(),
            flip_margin: 0.0,
            width: WidthPolicy::default(),
            flags: SurfaceFlags::default(),
            pinned_z: None,
            anchor_group: None,
        }
    }
}
