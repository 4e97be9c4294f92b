// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Placement: anchored floating-surface geometry.
//!
//! This crate is the pure-math layer of Overstory. Given an anchor
//! rectangle, the measured size of a floating surface, and a placement
//! request, it computes where the surface goes and how the position is
//! corrected when it would overflow the viewport.
//!
//! - [`Corner`] / [`CornerSpec`]: the 9 × 9 anchor-corner × surface-corner
//!   vocabulary, parsed from the kebab-case class names host style systems
//!   use.
//! - [`compute_placement`]: uncorrected anchor point + surface offset.
//! - [`resolve_placement`]: overflow measurement, flip via the fixed
//!   corner-replacement table, and clamping, honoring a memoized flip from a
//!   previous pass for the flip-on-open policy.
//! - [`Viewport`]: live window metrics, including the fixed top-bar inset.
//!
//! It performs no tracking and owns no state: higher layers
//! (`overstory_surface` for registries and stacking, `overstory_menu` for
//! interaction) call into it with live metrics each pass. Coordinates are
//! viewport-relative, y growing downward.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use overstory_placement::{
//!     Corner, CornerSpec, PlacementSpec, ResolveRequest, Viewport, resolve_placement,
//! };
//!
//! let resolved = resolve_placement(&ResolveRequest {
//!     anchor: Rect::new(100.0, 100.0, 140.0, 120.0),
//!     size: Size::new(150.0, 100.0),
//!     spec: PlacementSpec::Corners(CornerSpec {
//!         anchor: Corner::BottomLeft,
//!         surface: Corner::TopLeft,
//!     }),
//!     viewport: Viewport::new(Size::new(800.0, 800.0)),
//!     flip_margin: 0.0,
//!     forced: None,
//! });
//!
//! // Plenty of room: the surface hangs below the anchor, uncorrected.
//! assert!(!resolved.flipped);
//! assert_eq!(resolved.placement.origin(), kurbo::Point::new(100.0, 120.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for
//!   floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

mod corner;
mod placement;
mod viewport;

pub use corner::{Corner, HorizontalSide, ParseCornerError, VerticalSide};
pub use placement::{
    CornerSpec, FlipPolicy, Placement, PlacementSpec, ResolveRequest, Resolved,
    compute_placement, resolve_placement,
};
pub use viewport::Viewport;
