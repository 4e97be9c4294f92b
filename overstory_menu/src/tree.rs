// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The menu tree and its interaction state machine.
//!
//! ## States and transitions
//!
//! Each node is `Closed` or `Open { transient }`. Transient opens come from
//! hover intent (a submenu, or a root with [`ActivationMode::MouseOver`]);
//! persistent opens come from a matching click, keyboard activation, or a
//! programmatic call. Closing cascades depth-first: descendants close before
//! the node itself, and a close event is only emitted for nodes that were
//! actually open.
//!
//! ## Time
//!
//! The tree never sleeps. Hover and leave intents become deadline entries;
//! the host asks [`MenuTree::next_deadline`] when to wake up and calls
//! [`MenuTree::advance`] with the current time. Any event that invalidates a
//! pending intent (re-entry, eviction by a sibling, unmount) cancels the
//! entry synchronously, so a cancelled intent can never fire.
//!
//! ## Mutation discipline
//!
//! A node only ever mutates its own open state; interactions with relatives
//! go through operations (`notify_child_opening`, cascading close), never by
//! reaching into their private state. All operations take `&mut self` on the
//! tree, which makes that discipline structural.
//!
//! ## Minimal example
//!
//! ```
//! use overstory_menu::{MenuConfig, MenuEvent, MenuTree};
//!
//! let mut tree = MenuTree::new();
//! let root = tree.insert(None, MenuConfig::default());
//! let sub = tree.insert(Some(root), MenuConfig::default());
//!
//! // Open the root by program, then hover the submenu's activator.
//! tree.open(root, overstory_menu::Trigger::Programmatic, false, 0);
//! tree.pointer_enter(sub, 1_000);
//!
//! // The hover intent fires after the delay and opens the submenu.
//! assert_eq!(tree.next_deadline(), Some(1_300));
//! let events = tree.advance(1_300);
//! assert_eq!(events, vec![MenuEvent::Opened { id: sub, transient: true }]);
//!
//! // Closing the root cascades through the submenu first.
//! let events = tree.close(root);
//! assert_eq!(
//!     events,
//!     vec![MenuEvent::Closed { id: sub }, MenuEvent::Closed { id: root }]
//! );
//! ```

use alloc::vec::Vec;
use kurbo::Point;
use smallvec::SmallVec;

use overstory_placement::PlacementSpec;

use crate::timers::{IntentKind, IntentTimers};
use crate::types::{
    ActivationMode, MenuConfig, MenuEvent, MenuFlags, MenuId, MenuKey, Trigger,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Closed,
    Open { transient: bool },
}

#[derive(Debug)]
struct Node {
    parent: Option<MenuId>,
    children: SmallVec<[MenuId; 4]>,
    config: MenuConfig,
    state: State,
    open_position: Option<Point>,
    hovered: bool,
    /// Monotone stamp of the most recent open, for top-most resolution.
    opened_at: u64,
}

/// A tree of menus and their interaction state.
///
/// Storage is generational: stale [`MenuId`]s are silent no-ops everywhere,
/// including for intent timers scheduled before a slot was freed and reused.
#[derive(Debug, Default)]
pub struct MenuTree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    timers: IntentTimers,
    open_stamp: u64,
}

impl MenuTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a menu, registering it with its parent if any.
    ///
    /// A stale `parent` id degrades to mounting at the root; that indicates
    /// a host bug (mounting under an unmounted menu) and asserts in debug
    /// builds.
    pub fn insert(&mut self, parent: Option<MenuId>, config: MenuConfig) -> MenuId {
        debug_assert!(
            parent.is_none_or(|p| self.is_alive(p)),
            "insert under a dead parent"
        );
        let parent = parent.filter(|p| self.is_alive(*p));
        let node = Node {
            parent,
            children: SmallVec::new(),
            config,
            state: State::Closed,
            open_position: None,
            hovered: false,
            opened_at: 0,
        };
        let id = match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                MenuId::new(idx as u32, self.generations[idx])
            }
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Some(node));
                self.generations.push(0);
                MenuId::new(idx as u32, 0)
            }
        };
        if let Some(p) = parent {
            if let Some(pnode) = self.node_mut(p) {
                pnode.children.push(id);
            }
        }
        id
    }

    /// Unmount a menu and its subtree.
    ///
    /// Pending intent timers for every removed node are cancelled
    /// synchronously, so no delayed action can fire against a freed slot.
    /// Close events for the nodes that were open are returned, descendants
    /// first.
    pub fn remove(&mut self, id: MenuId) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        let Some(node) = self.node(id) else {
            return events;
        };
        let parent = node.parent;
        self.close_cascade(id, &mut events);
        if let Some(p) = parent {
            if let Some(pnode) = self.node_mut(p) {
                pnode.children.retain(|c| *c != id);
            }
        }
        self.free_subtree(id);
        events
    }

    /// Whether the id refers to a mounted menu.
    pub fn is_alive(&self, id: MenuId) -> bool {
        self.node(id).is_some()
    }

    /// Parent of a mounted menu.
    pub fn parent_of(&self, id: MenuId) -> Option<MenuId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a mounted menu, in mount order.
    pub fn children_of(&self, id: MenuId) -> &[MenuId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Behavior flags of a mounted menu.
    pub fn flags(&self, id: MenuId) -> Option<MenuFlags> {
        self.node(id).map(|n| n.config.flags)
    }

    /// Replace a menu's behavior flags (for example to disable it).
    pub fn set_flags(&mut self, id: MenuId, flags: MenuFlags) {
        if let Some(node) = self.node_mut(id) {
            node.config.flags = flags;
        }
    }

    /// Whether a menu is open (transiently or persistently).
    pub fn is_open(&self, id: MenuId) -> bool {
        matches!(self.state(id), Some(State::Open { .. }))
    }

    /// Whether a menu is open transiently (hover-opened, auto-closing).
    pub fn is_transient(&self, id: MenuId) -> bool {
        matches!(self.state(id), Some(State::Open { transient: true }))
    }

    /// Whether a menu is active. Equivalent to [`MenuTree::is_open`]; kept
    /// as the name hosts bind UI state to.
    pub fn is_active(&self, id: MenuId) -> bool {
        self.is_open(id)
    }

    /// The recorded cursor-anchor position of an open menu, if any.
    pub fn open_position(&self, id: MenuId) -> Option<Point> {
        self.node(id).and_then(|n| n.open_position)
    }

    /// The placement request for a menu's surface: the recorded cursor
    /// position when one was captured at open time, otherwise the configured
    /// corner pair.
    pub fn placement_spec_for(&self, id: MenuId) -> Option<PlacementSpec> {
        let node = self.node(id)?;
        Some(match node.open_position {
            Some(p) => PlacementSpec::At(p),
            None => PlacementSpec::Corners(node.config.corners),
        })
    }

    /// Whether any menu in the tree is open.
    pub fn any_open(&self) -> bool {
        self.live_nodes().any(|(_, n)| matches!(n.state, State::Open { .. }))
    }

    /// The most recently opened menu that is still open — the one Escape
    /// targets.
    pub fn topmost_open(&self) -> Option<MenuId> {
        self.live_nodes()
            .filter(|(_, n)| matches!(n.state, State::Open { .. }))
            .max_by_key(|(_, n)| n.opened_at)
            .map(|(id, _)| id)
    }

    /// Earliest pending intent deadline, for host scheduling.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Open a menu.
    ///
    /// Silent no-ops: stale id, disabled menu, or a click whose button does
    /// not match the configured activation mode. A persistent open of an
    /// already transiently-open menu promotes it in place without emitting
    /// an event.
    pub fn open(&mut self, id: MenuId, trigger: Trigger, transient: bool, now: u64) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        let Some(node) = self.node(id) else {
            return events;
        };
        if node.config.flags.contains(MenuFlags::DISABLED) {
            return events;
        }
        let position = match trigger {
            Trigger::Click { button, position } => {
                if !node.config.activation.accepts(button) {
                    return events;
                }
                position.filter(|_| node.config.flags.contains(MenuFlags::POSITION_AT_CURSOR))
            }
            Trigger::Key(MenuKey::Enter | MenuKey::Space) => None,
            // Escape never opens anything.
            Trigger::Key(MenuKey::Escape) => return events,
            Trigger::Programmatic => None,
        };
        self.do_open(id, transient, position, now, &mut events);
        events
    }

    /// Close a menu and, depth-first, every open descendant.
    pub fn close(&mut self, id: MenuId) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        self.close_cascade(id, &mut events);
        events
    }

    /// Close every open menu in the tree.
    pub fn close_all(&mut self) -> Vec<MenuEvent> {
        let roots: Vec<MenuId> = self
            .live_nodes()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
            .collect();
        let mut events = Vec::new();
        for root in roots {
            self.close_cascade(root, &mut events);
        }
        events
    }

    /// Toggle a menu.
    ///
    /// When open, always closes, regardless of which button triggered the
    /// toggle. When closed, opens subject to the same matching rules as
    /// [`MenuTree::open`].
    pub fn toggle(&mut self, id: MenuId, trigger: Trigger, now: u64) -> Vec<MenuEvent> {
        if self.is_open(id) {
            self.close(id)
        } else {
            self.open(id, trigger, false, now)
        }
    }

    /// An item of this menu was selected.
    ///
    /// With `auto_close` (the per-item default in hosts), the whole open
    /// chain containing the menu closes, topmost open ancestor first in
    /// cascade order. Selecting from a disabled or closed menu is a silent
    /// no-op.
    pub fn select_item(&mut self, id: MenuId, auto_close: bool) -> Vec<MenuEvent> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        if node.config.flags.contains(MenuFlags::DISABLED) || !self.is_open(id) || !auto_close {
            return Vec::new();
        }
        // Walk up to the highest open ancestor; closing it cascades back
        // down through this menu.
        let mut top = id;
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            if self.is_open(p) {
                top = p;
            }
            cur = self.parent_of(p);
        }
        self.close(top)
    }

    /// Close the top-most open menu (Escape).
    ///
    /// Only the most recently opened menu is dismissed; menus beneath it
    /// stay open so a second Escape peels the next layer.
    pub fn escape(&mut self) -> Vec<MenuEvent> {
        match self.topmost_open() {
            Some(id) => self.close(id),
            None => Vec::new(),
        }
    }

    /// The pointer entered a menu's hover region (activator or item list).
    ///
    /// Cancels pending leave intents for the menu and its ancestors (the
    /// pointer is inside their subtrees again) and starts a hover-open
    /// intent when this menu can open on hover: it is a submenu, or its
    /// activation mode is [`ActivationMode::MouseOver`].
    pub fn pointer_enter(&mut self, id: MenuId, now: u64) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.hovered = true;

        let mut cur = Some(id);
        while let Some(n) = cur {
            self.timers.cancel(n, IntentKind::Close);
            cur = self.parent_of(n);
        }

        let Some(node) = self.node(id) else {
            return;
        };
        let hover_opens = node.parent.is_some()
            || node.config.activation == ActivationMode::MouseOver;
        if node.state == State::Closed
            && hover_opens
            && !node.config.flags.contains(MenuFlags::DISABLED)
        {
            let deadline = now + node.config.hover_delay_ms;
            self.timers.schedule(id, IntentKind::Open, deadline);
        }
    }

    /// The pointer left a menu's hover region.
    ///
    /// Cancels this menu's pending hover-open intent, and starts leave
    /// intents for every transiently open menu (this one and its ancestors)
    /// whose subtree no longer reports pointer-over.
    pub fn pointer_leave(&mut self, id: MenuId, now: u64) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.hovered = false;
        self.timers.cancel(id, IntentKind::Open);

        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.node(n) else { break };
            let parent = node.parent;
            let delay = node.config.hover_delay_ms;
            if node.state == (State::Open { transient: true }) && !self.subtree_hovered(n) {
                self.timers.schedule(n, IntentKind::Close, now + delay);
            }
            cur = parent;
        }
    }

    /// Fire every intent due at `now`.
    ///
    /// Due hover intents open their menu transiently; due leave intents
    /// close it, re-checking that the menu is still transiently open and
    /// its subtree is not hovered — an intent that survived only because the
    /// host advanced late must still observe the current state.
    pub fn advance(&mut self, now: u64) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        for (id, kind) in self.timers.advance(now) {
            match kind {
                IntentKind::Open => {
                    let Some(node) = self.node(id) else { continue };
                    if node.state != State::Closed
                        || node.config.flags.contains(MenuFlags::DISABLED)
                    {
                        continue;
                    }
                    self.do_open(id, true, None, now, &mut events);
                }
                IntentKind::Close => {
                    let Some(node) = self.node(id) else { continue };
                    if node.state == (State::Open { transient: true })
                        && !self.subtree_hovered(id)
                    {
                        self.close_cascade(id, &mut events);
                    }
                }
            }
        }
        events
    }

    /// A child of `parent` is about to open: evict its competing siblings.
    ///
    /// Transiently open sibling subtrees close immediately, without waiting
    /// out their leave delay, and every sibling's pending intents are
    /// cancelled so none can fire afterwards. Called automatically on open;
    /// public for hosts that manage surface mounting themselves.
    pub fn notify_child_opening(&mut self, parent: MenuId, child: MenuId) -> Vec<MenuEvent> {
        let mut events = Vec::new();
        self.evict_siblings(parent, child, &mut events);
        events
    }

    fn evict_siblings(&mut self, parent: MenuId, child: MenuId, events: &mut Vec<MenuEvent>) {
        let Some(pnode) = self.node(parent) else {
            return;
        };
        let siblings: SmallVec<[MenuId; 4]> = pnode
            .children
            .iter()
            .copied()
            .filter(|c| *c != child)
            .collect();
        for sibling in siblings {
            self.timers.cancel_all(sibling);
            if self.is_transient(sibling) {
                self.close_cascade(sibling, events);
            }
        }
    }

    fn do_open(
        &mut self,
        id: MenuId,
        transient: bool,
        position: Option<Point>,
        _now: u64,
        events: &mut Vec<MenuEvent>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        match node.state {
            State::Open { transient: was_transient } => {
                // Promote a hover-open to persistent in place; no event, but
                // any pending leave intent stops mattering.
                if was_transient && !transient {
                    self.timers.cancel_all(id);
                    if let Some(node) = self.node_mut(id) {
                        node.state = State::Open { transient: false };
                    }
                }
            }
            State::Closed => {
                if let Some(parent) = node.parent {
                    self.evict_siblings(parent, id, events);
                }
                self.timers.cancel_all(id);
                self.open_stamp += 1;
                let stamp = self.open_stamp;
                if let Some(node) = self.node_mut(id) {
                    node.state = State::Open { transient };
                    node.open_position = position;
                    node.opened_at = stamp;
                }
                events.push(MenuEvent::Opened { id, transient });
            }
        }
    }

    fn close_cascade(&mut self, id: MenuId, events: &mut Vec<MenuEvent>) {
        let Some(node) = self.node(id) else {
            return;
        };
        // Children may in principle be open under a closed parent, so the
        // cascade walks the whole subtree, not just open chains.
        let children: SmallVec<[MenuId; 4]> = node.children.clone();
        for child in children {
            self.close_cascade(child, events);
        }
        self.timers.cancel_all(id);
        if let Some(node) = self.node_mut(id) {
            if let State::Open { .. } = node.state {
                node.state = State::Closed;
                node.open_position = None;
                events.push(MenuEvent::Closed { id });
            }
        }
    }

    fn free_subtree(&mut self, id: MenuId) {
        let idx = id.idx();
        let Some(node) = self.nodes[idx].take() else {
            return;
        };
        self.timers.cancel_all(id);
        for child in node.children {
            self.free_subtree(child);
        }
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(idx);
    }

    fn subtree_hovered(&self, id: MenuId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        node.hovered || node.children.iter().any(|c| self.subtree_hovered(*c))
    }

    fn state(&self, id: MenuId) -> Option<State> {
        self.node(id).map(|n| n.state)
    }

    fn live_nodes(&self) -> impl Iterator<Item = (MenuId, &Node)> {
        self.nodes.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|n| (MenuId::new(idx as u32, self.generations[idx]), n))
        })
    }

    fn node(&self, id: MenuId) -> Option<&Node> {
        let idx = id.idx();
        if idx >= self.nodes.len() || self.generations[idx] != id.1 {
            return None;
        }
        self.nodes[idx].as_ref()
    }

    fn node_mut(&mut self, id: MenuId) -> Option<&mut Node> {
        let idx = id.idx();
        if idx >= self.nodes.len() || self.generations[idx] != id.1 {
            return None;
        }
        self.nodes[idx].as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointerButton;
    use alloc::vec;

    const DELAY: u64 = 300;

    fn click() -> Trigger {
        Trigger::Click {
            button: PointerButton::Primary,
            position: None,
        }
    }

    fn right_click() -> Trigger {
        Trigger::Click {
            button: PointerButton::Secondary,
            position: None,
        }
    }

    /// root → child → grandchild, all default config.
    fn chain() -> (MenuTree, MenuId, MenuId, MenuId) {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let child = tree.insert(Some(root), MenuConfig::default());
        let grandchild = tree.insert(Some(child), MenuConfig::default());
        (tree, root, child, grandchild)
    }

    #[test]
    fn cascading_close_reports_descendants_first() {
        let (mut tree, root, child, grandchild) = chain();
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.open(child, Trigger::Programmatic, false, 1);
        tree.open(grandchild, Trigger::Programmatic, false, 2);

        let events = tree.close(root);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: grandchild },
                MenuEvent::Closed { id: child },
                MenuEvent::Closed { id: root },
            ]
        );

        // Closing again emits nothing: no signal for already-closed nodes.
        assert!(tree.close(root).is_empty());
    }

    #[test]
    fn close_skips_already_closed_descendants() {
        let (mut tree, root, child, grandchild) = chain();
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.open(grandchild, Trigger::Programmatic, false, 1);
        // `child` stays closed; the cascade still reaches the grandchild
        // through it but emits no event for it.
        let events = tree.close(root);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: grandchild },
                MenuEvent::Closed { id: root },
            ]
        );
    }

    #[test]
    fn sibling_eviction_closes_before_the_new_open() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let a = tree.insert(Some(root), MenuConfig::default());
        let b = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);

        // Hover-open submenu A.
        tree.pointer_enter(a, 1_000);
        let events = tree.advance(1_000 + DELAY);
        assert_eq!(events, vec![MenuEvent::Opened { id: a, transient: true }]);

        // Hover-open submenu B: A must close before B's open completes.
        tree.pointer_leave(a, 2_000);
        tree.pointer_enter(b, 2_010);
        let events = tree.advance(2_010 + DELAY);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: a },
                MenuEvent::Opened { id: b, transient: true },
            ]
        );
        assert!(!tree.is_open(a));
        assert!(tree.is_transient(b));
    }

    #[test]
    fn sibling_eviction_bypasses_the_leave_delay() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let a = tree.insert(Some(root), MenuConfig::default());
        let b = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.pointer_enter(a, 1_000);
        tree.advance(1_000 + DELAY);
        assert!(tree.is_transient(a));

        // Pointer leaves A; its leave intent is pending, not yet due.
        tree.pointer_leave(a, 2_000);
        assert_eq!(tree.next_deadline(), Some(2_000 + DELAY));

        // A persistent open of B evicts A immediately.
        let events = tree.open(b, click(), false, 2_050);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: a },
                MenuEvent::Opened { id: b, transient: false },
            ]
        );
        // And A's stale leave intent is gone.
        assert_eq!(tree.next_deadline(), None);
    }

    #[test]
    fn persistent_siblings_are_not_evicted() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let a = tree.insert(Some(root), MenuConfig::default());
        let b = tree.insert(Some(root), MenuConfig::default());
        tree.open(a, Trigger::Programmatic, false, 0);
        let events = tree.open(b, Trigger::Programmatic, false, 1);
        assert_eq!(events, vec![MenuEvent::Opened { id: b, transient: false }]);
        assert!(tree.is_open(a), "persistent sibling stays open");
    }

    #[test]
    fn hover_cancelled_by_early_leave_never_opens() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);

        tree.pointer_enter(sub, 1_000);
        tree.pointer_leave(sub, 1_000 + DELAY - 1);
        assert!(tree.advance(10_000).is_empty());
        assert!(!tree.is_open(sub));
    }

    #[test]
    fn hover_reentry_restarts_the_delay() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);

        tree.pointer_enter(sub, 1_000);
        tree.pointer_leave(sub, 1_100);
        tree.pointer_enter(sub, 1_200);
        // The original deadline has passed, but the restarted one has not.
        assert!(tree.advance(1_350).is_empty());
        let events = tree.advance(1_200 + DELAY);
        assert_eq!(events, vec![MenuEvent::Opened { id: sub, transient: true }]);
    }

    #[test]
    fn root_menus_hover_open_only_in_mouse_over_mode() {
        let mut tree = MenuTree::new();
        let clicky = tree.insert(None, MenuConfig::default());
        let hovery = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::MouseOver,
                ..MenuConfig::default()
            },
        );

        tree.pointer_enter(clicky, 0);
        tree.pointer_enter(hovery, 0);
        let events = tree.advance(DELAY);
        assert_eq!(events, vec![MenuEvent::Opened { id: hovery, transient: true }]);
        assert!(!tree.is_open(clicky));
    }

    #[test]
    fn transient_menu_closes_after_sustained_leave() {
        let mut tree = MenuTree::new();
        let root = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::MouseOver,
                ..MenuConfig::default()
            },
        );
        tree.pointer_enter(root, 0);
        tree.advance(DELAY);
        assert!(tree.is_transient(root));

        tree.pointer_leave(root, 1_000);
        assert!(tree.advance(1_000 + DELAY - 1).is_empty());
        let events = tree.advance(1_000 + DELAY);
        assert_eq!(events, vec![MenuEvent::Closed { id: root }]);
    }

    #[test]
    fn descendant_hover_blocks_the_parent_leave_intent() {
        let mut tree = MenuTree::new();
        let root = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::MouseOver,
                ..MenuConfig::default()
            },
        );
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.pointer_enter(root, 0);
        tree.advance(DELAY);
        tree.pointer_enter(sub, 400);
        tree.advance(400 + DELAY);
        assert!(tree.is_transient(root) && tree.is_transient(sub));

        // Pointer moves from the root's list onto the submenu: the root's
        // subtree is still hovered, so no leave intent is scheduled for it.
        tree.pointer_leave(root, 1_000);
        assert!(tree.advance(1_000 + DELAY).is_empty());
        assert!(tree.is_open(root));

        // Leaving the submenu too schedules both; they close descendants
        // first once due.
        tree.pointer_leave(sub, 2_000);
        let events = tree.advance(2_000 + DELAY);
        assert_eq!(
            events,
            vec![MenuEvent::Closed { id: sub }, MenuEvent::Closed { id: root }]
        );
    }

    #[test]
    fn reentering_a_descendant_cancels_the_ancestor_leave() {
        let mut tree = MenuTree::new();
        let root = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::MouseOver,
                ..MenuConfig::default()
            },
        );
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.pointer_enter(root, 0);
        tree.advance(DELAY);

        tree.pointer_leave(root, 1_000);
        assert_eq!(tree.next_deadline(), Some(1_000 + DELAY));

        // The pointer lands on the submenu activator before the deadline:
        // the root's leave intent must not fire.
        tree.pointer_enter(sub, 1_100);
        let events = tree.advance(1_000 + DELAY);
        assert!(events.is_empty());
        assert!(tree.is_open(root));
    }

    #[test]
    fn toggle_with_mismatched_button_is_a_no_op() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        let events = tree.toggle(menu, right_click(), 0);
        assert!(events.is_empty());
        assert!(!tree.is_open(menu));
    }

    #[test]
    fn toggle_closes_regardless_of_button() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        tree.toggle(menu, click(), 0);
        assert!(tree.is_open(menu));

        // Mismatched button still closes an open menu.
        let events = tree.toggle(menu, right_click(), 1);
        assert_eq!(events, vec![MenuEvent::Closed { id: menu }]);
    }

    #[test]
    fn right_click_mode_accepts_secondary_and_context() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::RightClick,
                ..MenuConfig::default()
            },
        );
        assert!(tree.open(menu, click(), false, 0).is_empty());
        assert!(!tree.open(menu, right_click(), false, 1).is_empty());
        tree.close(menu);
        let context = Trigger::Click {
            button: PointerButton::Context,
            position: None,
        };
        assert!(!tree.open(menu, context, false, 2).is_empty());
    }

    #[test]
    fn disabled_menu_ignores_everything() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(
            None,
            MenuConfig {
                flags: MenuFlags::DISABLED,
                ..MenuConfig::default()
            },
        );
        assert!(tree.open(menu, click(), false, 0).is_empty());
        assert!(tree.toggle(menu, click(), 0).is_empty());
        tree.pointer_enter(menu, 0);
        assert!(tree.advance(DELAY).is_empty());
        assert!(tree.select_item(menu, true).is_empty());
    }

    #[test]
    fn keyboard_activation_opens_persistently() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        let events = tree.open(menu, Trigger::Key(MenuKey::Enter), false, 0);
        assert_eq!(events, vec![MenuEvent::Opened { id: menu, transient: false }]);
        // Escape is not an activation key.
        tree.close(menu);
        assert!(tree.open(menu, Trigger::Key(MenuKey::Escape), false, 1).is_empty());
    }

    #[test]
    fn cursor_anchored_open_records_the_position() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(
            None,
            MenuConfig {
                activation: ActivationMode::RightClick,
                flags: MenuFlags::POSITION_AT_CURSOR,
                ..MenuConfig::default()
            },
        );
        let at = Point::new(420.0, 330.0);
        tree.open(
            menu,
            Trigger::Click {
                button: PointerButton::Secondary,
                position: Some(at),
            },
            false,
            0,
        );
        assert_eq!(tree.open_position(menu), Some(at));
        assert_eq!(tree.placement_spec_for(menu), Some(PlacementSpec::At(at)));

        // The position is per open cycle.
        tree.close(menu);
        assert_eq!(tree.open_position(menu), None);
        assert!(matches!(
            tree.placement_spec_for(menu),
            Some(PlacementSpec::Corners(_))
        ));
    }

    #[test]
    fn without_cursor_flag_the_position_is_ignored() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        tree.open(
            menu,
            Trigger::Click {
                button: PointerButton::Primary,
                position: Some(Point::new(10.0, 10.0)),
            },
            false,
            0,
        );
        assert_eq!(tree.open_position(menu), None);
    }

    #[test]
    fn click_promotes_a_transient_open_without_an_event() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.pointer_enter(sub, 0);
        tree.advance(DELAY);
        assert!(tree.is_transient(sub));

        // Leave first so a close intent is pending, then click to pin.
        tree.pointer_leave(sub, 500);
        let events = tree.open(sub, click(), false, 510);
        assert!(events.is_empty(), "promotion is not a state signal");
        assert!(tree.is_open(sub) && !tree.is_transient(sub));
        // The pinned menu no longer auto-closes.
        assert!(tree.advance(500 + DELAY).is_empty());
        assert!(tree.is_open(sub));
    }

    #[test]
    fn select_item_closes_the_open_chain() {
        let (mut tree, root, child, grandchild) = chain();
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.open(child, Trigger::Programmatic, false, 1);
        tree.open(grandchild, Trigger::Programmatic, false, 2);

        let events = tree.select_item(grandchild, true);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: grandchild },
                MenuEvent::Closed { id: child },
                MenuEvent::Closed { id: root },
            ]
        );
    }

    #[test]
    fn select_item_without_auto_close_keeps_the_menu_open() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        tree.open(menu, Trigger::Programmatic, false, 0);
        assert!(tree.select_item(menu, false).is_empty());
        assert!(tree.is_open(menu));
    }

    #[test]
    fn escape_peels_one_layer_at_a_time() {
        let (mut tree, root, child, _) = chain();
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.open(child, Trigger::Programmatic, false, 1);

        let events = tree.escape();
        assert_eq!(events, vec![MenuEvent::Closed { id: child }]);
        assert!(tree.is_open(root));

        let events = tree.escape();
        assert_eq!(events, vec![MenuEvent::Closed { id: root }]);
        assert!(tree.escape().is_empty());
    }

    #[test]
    fn close_all_closes_every_root_subtree() {
        let mut tree = MenuTree::new();
        let a = tree.insert(None, MenuConfig::default());
        let b = tree.insert(None, MenuConfig::default());
        let b_sub = tree.insert(Some(b), MenuConfig::default());
        tree.open(a, Trigger::Programmatic, false, 0);
        tree.open(b, Trigger::Programmatic, false, 1);
        tree.open(b_sub, Trigger::Programmatic, false, 2);

        let events = tree.close_all();
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: a },
                MenuEvent::Closed { id: b_sub },
                MenuEvent::Closed { id: b },
            ]
        );
    }

    #[test]
    fn unmount_cancels_pending_intents() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.pointer_enter(sub, 100);
        assert_eq!(tree.next_deadline(), Some(100 + DELAY));

        let events = tree.remove(sub);
        assert!(events.is_empty(), "closed node unmounts without events");
        assert_eq!(tree.next_deadline(), None);
        assert!(tree.advance(10_000).is_empty());
        assert_eq!(tree.children_of(root), &[]);
    }

    #[test]
    fn unmount_closes_open_subtrees_descendants_first() {
        let (mut tree, root, child, grandchild) = chain();
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.open(child, Trigger::Programmatic, false, 1);
        tree.open(grandchild, Trigger::Programmatic, false, 2);

        let events = tree.remove(child);
        assert_eq!(
            events,
            vec![
                MenuEvent::Closed { id: grandchild },
                MenuEvent::Closed { id: child },
            ]
        );
        assert!(!tree.is_alive(child) && !tree.is_alive(grandchild));
        assert!(tree.is_open(root));
    }

    #[test]
    fn reused_slot_does_not_see_the_old_nodes_intents() {
        let mut tree = MenuTree::new();
        let root = tree.insert(None, MenuConfig::default());
        let sub = tree.insert(Some(root), MenuConfig::default());
        tree.open(root, Trigger::Programmatic, false, 0);
        tree.pointer_enter(sub, 100);

        tree.remove(sub);
        // The replacement reuses the slot under a fresh generation.
        let replacement = tree.insert(Some(root), MenuConfig::default());
        assert_eq!(replacement.idx(), sub.idx());

        assert!(tree.advance(10_000).is_empty());
        assert!(!tree.is_open(replacement));
        // And operations against the stale id stay no-ops.
        assert!(tree.open(sub, Trigger::Programmatic, false, 0).is_empty());
    }

    #[test]
    fn open_is_idempotent() {
        let mut tree = MenuTree::new();
        let menu = tree.insert(None, MenuConfig::default());
        assert_eq!(tree.open(menu, Trigger::Programmatic, false, 0).len(), 1);
        assert!(tree.open(menu, Trigger::Programmatic, false, 1).is_empty());
    }
}
