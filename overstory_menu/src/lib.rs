// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Menu: a host-agnostic interaction state machine for nested
//! menus.
//!
//! ## Overview
//!
//! This crate decides *when* menus open and close; where their surfaces go
//! is `overstory_placement`'s job, and tracking those surfaces is
//! `overstory_surface`'s. A [`MenuTree`] owns one node per mounted menu with
//! an explicit parent pointer, and every interaction (clicks, hover intent,
//! keyboard, item selection) is an operation on the tree that returns the
//! [`MenuEvent`]s it caused, in order.
//!
//! - Transient opens (hover) auto-close on sustained pointer-leave;
//!   persistent opens (click, keyboard, programmatic) wait for explicit
//!   dismissal.
//! - Closing cascades depth-first through open descendants.
//! - Opening a submenu evicts transiently open sibling subtrees immediately,
//!   without waiting out their leave delay.
//! - Cursor-anchored menus record the click position and expose it as an
//!   explicit placement override via [`MenuTree::placement_spec_for`].
//!
//! ## Time and cancellation
//!
//! Hover and leave debouncing are the only suspension points. They are
//! deadline entries, not sleeps: the host reads
//! [`MenuTree::next_deadline`], waits however it likes, and calls
//! [`MenuTree::advance`] with the current time in milliseconds. Everything
//! that invalidates an intent (re-entry, sibling eviction, explicit close,
//! unmount) cancels the entry synchronously, so a stale intent can never
//! fire against changed state or a freed node.
//!
//! ## Keyboard contract
//!
//! While [`MenuTree::any_open`] is true the host should intercept
//! Enter/Space/Escape before its own defaults. Escape goes to
//! [`MenuTree::escape`], which dismisses only the top-most open menu
//! ([`MenuTree::topmost_open`]) — an underlying dialog must not see the
//! event.
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

mod timers;
mod tree;
mod types;

pub use tree::MenuTree;
pub use types::{
    ActivationMode, DEFAULT_HOVER_DELAY_MS, MenuConfig, MenuEvent, MenuFlags, MenuId, MenuKey,
    PointerButton, Trigger,
};
