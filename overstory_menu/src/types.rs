// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the menu tree: identifiers, activation configuration,
//! triggers, and emitted events.

use kurbo::Point;
use overstory_placement::CornerSpec;

/// Identifier for a node in a [`MenuTree`] (generational).
///
/// [`MenuTree`]: crate::MenuTree
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MenuId(pub(crate) u32, pub(crate) u32);

impl MenuId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Default hover/leave intent delay, in milliseconds.
pub const DEFAULT_HOVER_DELAY_MS: u64 = 300;

/// Which user gesture opens a menu persistently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActivationMode {
    /// Primary-button click.
    #[default]
    LeftClick,
    /// Secondary-button click or the synthetic context-menu gesture.
    RightClick,
    /// Hovering the activator; clicks with the primary button also work.
    MouseOver,
}

/// A pointer button, as reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// The primary (usually left) button.
    Primary,
    /// The secondary (usually right) button.
    Secondary,
    /// The synthetic context-menu gesture (keyboard menu key, long-press).
    Context,
}

impl ActivationMode {
    /// Whether a click with `button` matches this activation mode.
    pub const fn accepts(self, button: PointerButton) -> bool {
        match self {
            Self::LeftClick | Self::MouseOver => matches!(button, PointerButton::Primary),
            Self::RightClick => {
                matches!(button, PointerButton::Secondary | PointerButton::Context)
            }
        }
    }
}

/// Keys the menu layer responds to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuKey {
    /// Activates a focused activator.
    Enter,
    /// Activates a focused activator.
    Space,
    /// Dismisses the top-most open menu.
    Escape,
}

/// What initiated an open or toggle request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Trigger {
    /// A pointer click. `position` carries the cursor's page coordinates
    /// when the host has them; cursor-anchored menus record it as their
    /// open position.
    Click {
        /// Button that was pressed.
        button: PointerButton,
        /// Cursor position at click time, if known.
        position: Option<Point>,
    },
    /// Keyboard activation on a focused activator.
    Key(MenuKey),
    /// Programmatic request from the host.
    Programmatic,
}

bitflags::bitflags! {
    /// Per-menu behavior flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MenuFlags: u8 {
        /// Every interactive operation on this menu is a silent no-op.
        const DISABLED = 0b0000_0001;
        /// Anchor the surface at the triggering cursor position instead of
        /// the activator's corner.
        const POSITION_AT_CURSOR = 0b0000_0010;
    }
}

impl Default for MenuFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Configuration for one menu node.
#[derive(Clone, Debug)]
pub struct MenuConfig {
    /// Which gesture opens this menu persistently.
    pub activation: ActivationMode,
    /// Hover/leave intent delay in milliseconds.
    pub hover_delay_ms: u64,
    /// Anchor and transform origin corners for the menu's surface.
    pub corners: CornerSpec,
    /// Behavior flags.
    pub flags: MenuFlags,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            activation: ActivationMode::default(),
            hover_delay_ms: DEFAULT_HOVER_DELAY_MS,
            corners: CornerSpec::default(),
            flags: MenuFlags::default(),
        }
    }
}

/// An observable open-state transition.
///
/// Operations return these in the order the transitions occurred; no event
/// is ever emitted for a node already in the target state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    /// A menu opened.
    Opened {
        /// The menu that opened.
        id: MenuId,
        /// Whether it opened transiently (hover) rather than persistently.
        transient: bool,
    },
    /// A menu closed.
    Closed {
        /// The menu that closed.
        id: MenuId,
    },
}
