// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport metrics consumed by overflow resolution.

use kurbo::Size;

/// The visible area a floating surface must fit into.
///
/// Coordinates are viewport-relative with the origin at the top-left and y
/// growing downward, matching fixed-position layout. `top_inset` models a
/// fixed top app bar: space above an anchor is measured from the inset
/// boundary, not from zero, so surfaces prefer not to open underneath the
/// bar.
///
/// Hosts should construct this from live window metrics at call time; the
/// engine never caches a viewport across layout passes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Width and height of the visible area.
    pub size: Size,
    /// Height of a fixed bar overlaying the top of the viewport, if any.
    pub top_inset: f64,
}

impl Viewport {
    /// Create a viewport with no top inset.
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            top_inset: 0.0,
        }
    }

    /// Builder-style top inset (fixed app-bar height).
    pub const fn with_top_inset(mut self, inset: f64) -> Self {
        self.top_inset = inset;
        self
    }

    /// Viewport width.
    pub const fn width(&self) -> f64 {
        self.size.width
    }

    /// Viewport height.
    pub const fn height(&self) -> f64 {
        self.size.height
    }
}
