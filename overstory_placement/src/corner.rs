// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner vocabulary for anchored placement.
//!
//! A placement is described by a pair of corners: one on the anchor element
//! and one on the floating surface itself. Each corner combines a vertical
//! component (top/center/bottom) with a horizontal one (left/center/right),
//! giving nine positions per side and 9 × 9 combinations overall.
//!
//! Corners parse from the kebab-case class names used by host style systems
//! (`"top-left"`, `"bottom"`, `"center"`, …). An unknown class is a caller
//! bug and fails with a descriptive [`ParseCornerError`] rather than
//! defaulting silently.

use core::fmt;
use core::str::FromStr;

/// Vertical component of a [`Corner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VerticalSide {
    /// The top edge.
    Top,
    /// The vertical midpoint.
    Center,
    /// The bottom edge.
    Bottom,
}

/// Horizontal component of a [`Corner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalSide {
    /// The left edge.
    Left,
    /// The horizontal midpoint.
    Center,
    /// The right edge.
    Right,
}

/// One of the nine reference positions on a rectangle.
///
/// `Top`, `Bottom`, `Left`, and `Right` alone refer to the midpoint of that
/// edge (the other axis is centered), matching the class-name vocabulary of
/// the host style layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Midpoint of the top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Midpoint of the left edge.
    Left,
    /// Center of the rectangle.
    Center,
    /// Midpoint of the right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Midpoint of the bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl Corner {
    /// All nine corners, in reading order.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// The vertical component of this corner.
    pub const fn vertical(self) -> VerticalSide {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => VerticalSide::Top,
            Self::Left | Self::Center | Self::Right => VerticalSide::Center,
            Self::BottomLeft | Self::Bottom | Self::BottomRight => VerticalSide::Bottom,
        }
    }

    /// The horizontal component of this corner.
    pub const fn horizontal(self) -> HorizontalSide {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => HorizontalSide::Left,
            Self::Top | Self::Center | Self::Bottom => HorizontalSide::Center,
            Self::TopRight | Self::Right | Self::BottomRight => HorizontalSide::Right,
        }
    }

    /// The fixed replacement used when a placement flips on viewport overflow.
    ///
    /// Plain edge corners swap only their off-center axis (`Top` ↔ `Bottom`,
    /// `Left` ↔ `Right`), while compound corners swap both axes at once
    /// (`TopLeft` ↔ `BottomRight`, `TopRight` ↔ `BottomLeft`) even when only
    /// one axis overflowed. `Center` is never replaced. This table is
    /// intentionally not a per-axis mirror; hosts style against exactly these
    /// substitutions.
    pub const fn flip_replacement(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopLeft => Self::BottomRight,
            Self::BottomRight => Self::TopLeft,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::Center => Self::Center,
        }
    }

    /// The kebab-case class name for this corner.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Error returned when parsing an unknown corner class name.
///
/// Carries the offending class so callers can report which configuration
/// value was wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCornerError {
    kind: ParseCornerErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ParseCornerErrorKind {
    Empty,
    Unknown([u8; MAX_CLASS_LEN], usize),
}

// Longest valid class is "bottom-right" (12 bytes); anything longer is
// already unknown, so the stored prefix is enough to produce a useful
// message without allocating.
const MAX_CLASS_LEN: usize = 16;

impl ParseCornerError {
    fn unknown(s: &str) -> Self {
        let mut buf = [0_u8; MAX_CLASS_LEN];
        let len = s.len().min(MAX_CLASS_LEN);
        buf[..len].copy_from_slice(&s.as_bytes()[..len]);
        Self {
            kind: ParseCornerErrorKind::Unknown(buf, len),
        }
    }

    /// The class text that failed to parse (possibly truncated).
    pub fn class(&self) -> &str {
        match &self.kind {
            ParseCornerErrorKind::Empty => "",
            ParseCornerErrorKind::Unknown(buf, len) => {
                core::str::from_utf8(&buf[..*len]).unwrap_or("<non-utf8>")
            }
        }
    }
}

impl fmt::Display for ParseCornerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseCornerErrorKind::Empty => write!(f, "empty corner class"),
            ParseCornerErrorKind::Unknown(..) => write!(
                f,
                "unknown corner class `{}`; expected one of top-left, top, top-right, \
                 left, center, right, bottom-left, bottom, bottom-right",
                self.class()
            ),
        }
    }
}

impl core::error::Error for ParseCornerError {}

impl FromStr for Corner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseCornerError {
                kind: ParseCornerErrorKind::Empty,
            });
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.class_name() == s)
            .ok_or_else(|| ParseCornerError::unknown(s))
    }
}
