// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement math: anchor-point computation, overflow detection, flip and
//! clamp resolution.
//!
//! ## Model
//!
//! A placement request selects a corner on the anchor rectangle and a corner
//! on the surface itself; the surface is positioned so its corner touches the
//! anchor's corner. The result keeps the anchor point and the surface's own
//! offset separate: the anchor point depends only on the anchor rectangle,
//! while the offset depends only on the surface size. Overflow correction can
//! therefore adjust one without recomputing the other.
//!
//! ## Overflow handling
//!
//! [`resolve_placement`] measures the margins of the uncorrected position
//! against the viewport. If a margin is negative beyond the configured grace
//! (`flip_margin`) and the opposite side of the anchor has room for the full
//! surface extent, both corners are substituted via
//! [`Corner::flip_replacement`] and the position is recomputed. When flipping
//! cannot help, a top/left coordinate that would start off-screen is clamped
//! to `0` and its offset component zeroed so the correction is not applied
//! twice downstream.
//!
//! Callers that memoize the flip decision for an open/close cycle pass the
//! remembered corner pair back through [`ResolveRequest::forced`]; the
//! resolver then skips flip detection and only re-applies clamping.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use overstory_placement::{
//!     Corner, CornerSpec, PlacementSpec, ResolveRequest, Viewport, resolve_placement,
//! };
//!
//! // An anchor near the bottom of an 800×800 viewport: the surface flips up.
//! let resolved = resolve_placement(&ResolveRequest {
//!     anchor: Rect::new(100.0, 780.0, 140.0, 800.0),
//!     size: Size::new(150.0, 100.0),
//!     spec: PlacementSpec::Corners(CornerSpec {
//!         anchor: Corner::BottomLeft,
//!         surface: Corner::TopLeft,
//!     }),
//!     viewport: Viewport::new(Size::new(800.0, 800.0)),
//!     flip_margin: 0.0,
//!     forced: None,
//! });
//! assert!(resolved.flipped);
//! assert!(resolved.placement.origin().y < 780.0);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::corner::{Corner, HorizontalSide, VerticalSide};
use crate::viewport::Viewport;

/// A corner-pair placement request: which corner of the anchor the surface
/// attaches to, and which corner of the surface touches it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CornerSpec {
    /// Corner of the anchor rectangle.
    pub anchor: Corner,
    /// Corner of the floating surface.
    pub surface: Corner,
}

impl CornerSpec {
    /// Substitute both corners through the fixed flip-replacement table.
    pub const fn flip_replacement(self) -> Self {
        Self {
            anchor: self.anchor.flip_replacement(),
            surface: self.surface.flip_replacement(),
        }
    }
}

impl Default for CornerSpec {
    /// Surface hangs below the anchor, left edges aligned.
    fn default() -> Self {
        Self {
            anchor: Corner::BottomLeft,
            surface: Corner::TopLeft,
        }
    }
}

/// How a surface is anchored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlacementSpec {
    /// Corner-based anchoring against the anchor element's rectangle.
    Corners(CornerSpec),
    /// Explicit point override, used for cursor-anchored menus. The point is
    /// treated as a degenerate anchor rectangle so overflow flipping works
    /// the same way as for corner anchoring.
    At(Point),
}

impl PlacementSpec {
    /// The corner pair this spec resolves against.
    ///
    /// Point overrides behave as "surface top-left at the point", which the
    /// flip table can substitute to open up-and-left of the cursor.
    pub fn corners(&self) -> CornerSpec {
        match self {
            Self::Corners(c) => *c,
            Self::At(_) => CornerSpec {
                anchor: Corner::TopLeft,
                surface: Corner::TopLeft,
            },
        }
    }

    /// The effective anchor rectangle for this spec.
    pub fn anchor_rect(&self, element_anchor: Rect) -> Rect {
        match self {
            Self::Corners(_) => element_anchor,
            Self::At(p) => Rect::from_origin_size(*p, Size::ZERO),
        }
    }
}

/// How often the flip decision is recomputed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlipPolicy {
    /// Never flip; overflow only clamps.
    Never,
    /// Decide once when the surface becomes visible, reuse until it closes.
    #[default]
    OnOpen,
    /// Recompute on every layout pass (resize, scroll, mutation).
    Always,
}

/// An uncorrected placement: anchor point plus the surface's own offset.
///
/// The final surface origin (its top-left) is `anchor_point + offset`. The
/// two parts are kept separate so overflow correction can zero an offset
/// component without disturbing the anchor math.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// The point on (or relative to) the anchor the surface attaches to.
    pub anchor_point: Point,
    /// Offset from the anchor point to the surface's top-left corner.
    pub offset: Vec2,
}

impl Placement {
    /// The surface's top-left corner in viewport coordinates.
    pub fn origin(&self) -> Point {
        self.anchor_point + self.offset
    }
}

/// Inputs to [`resolve_placement`].
#[derive(Copy, Clone, Debug)]
pub struct ResolveRequest {
    /// Bounding rectangle of the anchor element, in viewport coordinates.
    pub anchor: Rect,
    /// Measured size of the surface content. Zero sizes are accepted and
    /// yield degenerate but well-defined output.
    pub size: Size,
    /// Corner pair or explicit point override.
    pub spec: PlacementSpec,
    /// Live viewport metrics.
    pub viewport: Viewport,
    /// Grace margin: overflow smaller than this does not trigger a flip.
    pub flip_margin: f64,
    /// Memoized corner pair from a previous pass (flip-on-open policy).
    /// When present, flip detection is skipped and only clamping runs.
    pub forced: Option<CornerSpec>,
}

/// A fully resolved placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolved {
    /// Anchor point and offset after any correction.
    pub placement: Placement,
    /// The corner pair actually used (post-substitution).
    pub corners: CornerSpec,
    /// Whether this pass substituted the requested corners. Callers using
    /// [`FlipPolicy::OnOpen`] memoize [`Resolved::corners`] when this is set.
    pub flipped: bool,
    /// The horizontal coordinate was clamped to the viewport edge.
    pub clamped_x: bool,
    /// The vertical coordinate was clamped to the viewport edge.
    pub clamped_y: bool,
}

/// Compute the uncorrected placement for a corner pair.
///
/// The anchor point is the selected corner of `anchor`; the offset shifts the
/// surface so its own selected corner lands on that point.
pub fn compute_placement(anchor: Rect, size: Size, corners: CornerSpec) -> Placement {
    let anchor_point = corner_point(anchor, corners.anchor);
    let offset = Vec2::new(
        match corners.surface.horizontal() {
            HorizontalSide::Left => 0.0,
            HorizontalSide::Center => -size.width / 2.0,
            HorizontalSide::Right => -size.width,
        },
        match corners.surface.vertical() {
            VerticalSide::Top => 0.0,
            VerticalSide::Center => -size.height / 2.0,
            VerticalSide::Bottom => -size.height,
        },
    );
    Placement {
        anchor_point,
        offset,
    }
}

fn corner_point(rect: Rect, corner: Corner) -> Point {
    let x = match corner.horizontal() {
        HorizontalSide::Left => rect.x0,
        HorizontalSide::Center => (rect.x0 + rect.x1) / 2.0,
        HorizontalSide::Right => rect.x1,
    };
    let y = match corner.vertical() {
        VerticalSide::Top => rect.y0,
        VerticalSide::Center => (rect.y0 + rect.y1) / 2.0,
        VerticalSide::Bottom => rect.y1,
    };
    Point::new(x, y)
}

/// Resolve a placement against the viewport, applying flip and clamp.
pub fn resolve_placement(req: &ResolveRequest) -> Resolved {
    let anchor = req.spec.anchor_rect(req.anchor);
    let requested = req.spec.corners();

    let (corners, flipped) = match req.forced {
        Some(forced) => (forced, false),
        None => {
            let base = compute_placement(anchor, req.size, requested);
            if flip_needed(anchor, req.size, base, &req.viewport, req.flip_margin) {
                (requested.flip_replacement(), true)
            } else {
                (requested, false)
            }
        }
    };

    let mut placement = compute_placement(anchor, req.size, corners);

    // Clamp pass: a surface must not start above or left of the viewport.
    // Zeroing the offset component keeps downstream consumers, which apply
    // `anchor_point + offset` themselves, from re-introducing the overflow.
    let origin = placement.origin();
    let clamped_x = origin.x < 0.0;
    if clamped_x {
        placement.anchor_point.x = 0.0;
        placement.offset.x = 0.0;
    }
    let clamped_y = origin.y < 0.0;
    if clamped_y {
        placement.anchor_point.y = 0.0;
        placement.offset.y = 0.0;
    }

    Resolved {
        placement,
        corners,
        flipped,
        clamped_x,
        clamped_y,
    }
}

/// Decide whether the uncorrected placement should flip.
///
/// A flip is taken when a margin is negative beyond the grace margin and the
/// opposite side of the anchor has room for the surface's full extent. The
/// substitution itself always goes through the corner-replacement table, so a
/// single-axis overflow may still move a compound corner on both axes.
fn flip_needed(
    anchor: Rect,
    size: Size,
    base: Placement,
    viewport: &Viewport,
    flip_margin: f64,
) -> bool {
    let origin = base.origin();

    // Vertical margins. Space above the anchor is reduced by the top inset so
    // a flipped surface does not land under a fixed app bar.
    let delta_top = origin.y - viewport.top_inset;
    let delta_bottom = viewport.height() - (origin.y + size.height);
    let space_above_anchor = anchor.y0 - viewport.top_inset;
    let space_below_anchor = viewport.height() - anchor.y1;

    if delta_bottom < -flip_margin && space_above_anchor >= size.height {
        return true;
    }
    if delta_top < -flip_margin && space_below_anchor >= size.height {
        return true;
    }

    // Horizontal margins.
    let delta_left = origin.x;
    let delta_right = viewport.width() - (origin.x + size.width);
    let space_left_of_anchor = anchor.x0;
    let space_right_of_anchor = viewport.width() - anchor.x1;

    if delta_right < -flip_margin && space_left_of_anchor >= size.width {
        return true;
    }
    if delta_left < -flip_margin && space_right_of_anchor >= size.width {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(
        anchor: Rect,
        size: Size,
        corners: CornerSpec,
        viewport: Viewport,
    ) -> Resolved {
        resolve_placement(&ResolveRequest {
            anchor,
            size,
            spec: PlacementSpec::Corners(corners),
            viewport,
            flip_margin: 0.0,
            forced: None,
        })
    }

    /// Where a given corner of the surface ends up, given its origin.
    fn surface_corner(origin: Point, size: Size, corner: Corner) -> Point {
        let x = match corner.horizontal() {
            HorizontalSide::Left => origin.x,
            HorizontalSide::Center => origin.x + size.width / 2.0,
            HorizontalSide::Right => origin.x + size.width,
        };
        let y = match corner.vertical() {
            VerticalSide::Top => origin.y,
            VerticalSide::Center => origin.y + size.height / 2.0,
            VerticalSide::Bottom => origin.y + size.height,
        };
        Point::new(x, y)
    }

    #[test]
    fn all_81_combinations_round_trip_exactly() {
        // Anchor comfortably inside a large viewport: no correction fires,
        // and the surface's selected corner lands exactly on the anchor's.
        let anchor = Rect::new(400.0, 400.0, 440.0, 420.0);
        let size = Size::new(150.0, 100.0);
        let viewport = Viewport::new(Size::new(2000.0, 2000.0));

        for anchor_corner in Corner::ALL {
            for self_corner in Corner::ALL {
                let corners = CornerSpec {
                    anchor: anchor_corner,
                    surface: self_corner,
                };
                let resolved = resolve(anchor, size, corners, viewport);
                assert!(!resolved.flipped, "{corners:?} must not flip");
                assert!(!resolved.clamped_x && !resolved.clamped_y);

                let got = surface_corner(resolved.placement.origin(), size, self_corner);
                let want = corner_point(anchor, anchor_corner);
                assert_eq!(got, want, "corner mismatch for {corners:?}");
            }
        }
    }

    #[test]
    fn bottom_overflow_flips_upward() {
        // Anchor near the bottom of an 800×800 viewport; a 100-tall surface
        // hanging below overflows by 100 and must open upward instead.
        let anchor = Rect::new(100.0, 780.0, 140.0, 800.0);
        let size = Size::new(150.0, 100.0);
        let resolved = resolve(
            anchor,
            size,
            CornerSpec {
                anchor: Corner::BottomLeft,
                surface: Corner::TopLeft,
            },
            Viewport::new(Size::new(800.0, 800.0)),
        );
        assert!(resolved.flipped);
        assert!(
            resolved.placement.origin().y < 780.0,
            "surface must open above the anchor, got {:?}",
            resolved.placement.origin()
        );
        // The replacement goes through the compound table: bottom-left
        // becomes top-right, top-left becomes bottom-right.
        assert_eq!(resolved.corners.anchor, Corner::TopRight);
        assert_eq!(resolved.corners.surface, Corner::BottomRight);
    }

    #[test]
    fn flip_requires_room_on_the_opposite_side() {
        // Overflows below, but the anchor sits near the top as well: there is
        // no room above, so no flip. The position stays (and still overflows
        // the bottom; bottom overflow is never clamped).
        let anchor = Rect::new(100.0, 40.0, 140.0, 60.0);
        let size = Size::new(150.0, 900.0);
        let resolved = resolve(
            anchor,
            size,
            CornerSpec {
                anchor: Corner::BottomLeft,
                surface: Corner::TopLeft,
            },
            Viewport::new(Size::new(800.0, 800.0)),
        );
        assert!(!resolved.flipped);
        assert_eq!(resolved.placement.origin(), Point::new(100.0, 60.0));
    }

    #[test]
    fn top_overflow_without_room_clamps_to_zero() {
        // A surface opening upward from an anchor at the very top, with no
        // room below either (tall surface): clamp to 0 and zero the offset.
        let anchor = Rect::new(100.0, 10.0, 140.0, 30.0);
        let size = Size::new(150.0, 900.0);
        let resolved = resolve(
            anchor,
            size,
            CornerSpec {
                anchor: Corner::TopLeft,
                surface: Corner::BottomLeft,
            },
            Viewport::new(Size::new(800.0, 800.0)),
        );
        assert!(!resolved.flipped);
        assert!(resolved.clamped_y);
        assert_eq!(resolved.placement.origin().y, 0.0);
        assert_eq!(resolved.placement.offset.y, 0.0);
        // Summing the parts downstream must not re-introduce the overflow.
        assert_eq!(resolved.placement.anchor_point.y, 0.0);
    }

    #[test]
    fn flip_margin_grace_suppresses_small_overflow() {
        // Overflows the bottom by 10px; a 16px grace margin tolerates it.
        let anchor = Rect::new(100.0, 690.0, 140.0, 710.0);
        let size = Size::new(150.0, 100.0);
        let resolved = resolve_placement(&ResolveRequest {
            anchor,
            size,
            spec: PlacementSpec::Corners(CornerSpec {
                anchor: Corner::BottomLeft,
                surface: Corner::TopLeft,
            }),
            viewport: Viewport::new(Size::new(800.0, 800.0)),
            flip_margin: 16.0,
            forced: None,
        });
        assert!(!resolved.flipped);
        assert_eq!(resolved.placement.origin().y, 710.0);
    }

    #[test]
    fn top_inset_consumes_room_above() {
        // Without the inset there is just enough room above to flip; a fixed
        // 64px app bar removes it, so the surface stays below.
        let anchor = Rect::new(100.0, 110.0, 140.0, 130.0);
        let size = Size::new(150.0, 700.0);
        let viewport = Viewport::new(Size::new(800.0, 800.0));

        let spec = CornerSpec {
            anchor: Corner::TopLeft,
            surface: Corner::BottomLeft,
        };
        // Opening upward overflows the top; room below (800 - 130 = 670) is
        // too small for 700, so no flip either way.
        let without = resolve(anchor, size, spec, viewport);
        assert!(!without.flipped);

        // Now a shorter surface: room below fits it, so the top overflow
        // flips it downward, but only while the inset doesn't matter.
        let size = Size::new(150.0, 300.0);
        let flipped = resolve(anchor, size, spec, viewport);
        assert!(flipped.flipped);

        // With a 64px app bar the same geometry still flips (room below is
        // unaffected), but the overflow test itself starts at the inset.
        let with_inset = resolve(anchor, size, spec, viewport.with_top_inset(64.0));
        assert!(with_inset.flipped);
    }

    #[test]
    fn forced_corners_skip_flip_detection() {
        // Memoized flip decision from a previous pass: resolution applies it
        // verbatim even though the unforced result would not flip.
        let anchor = Rect::new(400.0, 400.0, 440.0, 420.0);
        let size = Size::new(150.0, 100.0);
        let forced = CornerSpec {
            anchor: Corner::TopRight,
            surface: Corner::BottomRight,
        };
        let resolved = resolve_placement(&ResolveRequest {
            anchor,
            size,
            spec: PlacementSpec::Corners(CornerSpec::default()),
            viewport: Viewport::new(Size::new(2000.0, 2000.0)),
            flip_margin: 0.0,
            forced: Some(forced),
        });
        assert!(!resolved.flipped, "forced pass reports no fresh flip");
        assert_eq!(resolved.corners, forced);
        assert_eq!(
            resolved.placement.origin(),
            Point::new(440.0 - 150.0, 400.0 - 100.0)
        );
    }

    #[test]
    fn cursor_override_anchors_at_the_point() {
        let resolved = resolve_placement(&ResolveRequest {
            // Element anchor is ignored for point overrides.
            anchor: Rect::new(0.0, 0.0, 10.0, 10.0),
            size: Size::new(200.0, 150.0),
            spec: PlacementSpec::At(Point::new(300.0, 200.0)),
            viewport: Viewport::new(Size::new(800.0, 800.0)),
            flip_margin: 0.0,
            forced: None,
        });
        assert!(!resolved.flipped);
        assert_eq!(resolved.placement.origin(), Point::new(300.0, 200.0));
    }

    #[test]
    fn cursor_override_flips_around_the_point() {
        // Cursor near the bottom-right corner: the degenerate anchor rect
        // makes the flip table open the menu up-and-left of the cursor.
        let resolved = resolve_placement(&ResolveRequest {
            anchor: Rect::ZERO,
            size: Size::new(200.0, 150.0),
            spec: PlacementSpec::At(Point::new(780.0, 780.0)),
            viewport: Viewport::new(Size::new(800.0, 800.0)),
            flip_margin: 0.0,
            forced: None,
        });
        assert!(resolved.flipped);
        assert_eq!(
            resolved.placement.origin(),
            Point::new(780.0 - 200.0, 780.0 - 150.0)
        );
    }

    #[test]
    fn zero_size_surface_is_degenerate_but_defined() {
        let resolved = resolve(
            Rect::new(100.0, 100.0, 140.0, 120.0),
            Size::ZERO,
            CornerSpec::default(),
            Viewport::new(Size::new(800.0, 800.0)),
        );
        assert_eq!(resolved.placement.origin(), Point::new(100.0, 120.0));
        assert_eq!(resolved.placement.offset, Vec2::ZERO);
    }

    #[test]
    fn right_overflow_flips_left() {
        let anchor = Rect::new(700.0, 100.0, 740.0, 120.0);
        let size = Size::new(150.0, 100.0);
        let resolved = resolve(
            anchor,
            size,
            CornerSpec {
                anchor: Corner::Right,
                surface: Corner::Left,
            },
            Viewport::new(Size::new(800.0, 800.0)),
        );
        assert!(resolved.flipped);
        // Plain edges swap one axis: right → left, left → right.
        assert_eq!(resolved.corners.anchor, Corner::Left);
        assert_eq!(resolved.corners.surface, Corner::Right);
        assert_eq!(
            resolved.placement.origin(),
            Point::new(700.0 - 150.0, 110.0 - 50.0)
        );
    }
}
