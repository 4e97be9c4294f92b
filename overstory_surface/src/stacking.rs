// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-index stacking rules.
//!
//! The original behavior this models read its base z-index values from
//! global theme state. Here they are an explicit, read-only
//! [`StackingProfile`] injected into the registry at construction — created
//! once at application startup and never mutated afterwards.
//!
//! Resolution rules, in order:
//!
//! - A surface nested inside another tracked surface stacks directly above
//!   it: `parent_z + 1`.
//! - A surface inside a tooltip root floors at both the popover base and the
//!   tooltip base, and clears the container itself.
//! - A surface inside an app bar clears the container and the popover base.
//! - A top-level surface pinned to an explicit value ≥ 1 keeps its pin;
//!   otherwise it gets `base_popover_z + 1`.

/// Base z-index constants for stacking resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StackingProfile {
    /// Base z-index for popover surfaces.
    pub base_popover_z: i32,
    /// Base z-index for tooltip roots.
    pub base_tooltip_z: i32,
    /// Z-index of the fixed top app bar.
    pub app_bar_z: i32,
}

impl Default for StackingProfile {
    fn default() -> Self {
        Self {
            base_popover_z: 1200,
            base_tooltip_z: 1500,
            app_bar_z: 1100,
        }
    }
}

/// Resolved stacking context of a surface's container, with any parent
/// surface's z-index already looked up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StackBase {
    Nested { parent_z: i32 },
    Tooltip { container_z: i32 },
    AppBar { container_z: i32 },
    Root { pinned: Option<i32> },
}

pub(crate) fn stack_z(profile: &StackingProfile, base: StackBase) -> i32 {
    match base {
        StackBase::Nested { parent_z } => parent_z + 1,
        StackBase::Tooltip { container_z } => (profile.base_popover_z + 1)
            .max(container_z + 1)
            .max(profile.base_tooltip_z + 1),
        StackBase::AppBar { container_z } => (profile.base_popover_z + 1).max(container_z + 1),
        StackBase::Root { pinned } => match pinned {
            Some(z) if z >= 1 => z,
            _ => profile.base_popover_z + 1,
        },
    }
}
