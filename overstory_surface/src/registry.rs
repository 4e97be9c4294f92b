// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface registry: tracking, placement passes, and layout-change fan-in.
//!
//! The registry owns one [`Slot`] per mounted floating surface and turns
//! host layout signals into re-placement work:
//!
//! - [`SurfaceRegistry::on_structural_change`] — an open/visibility class or
//!   position attribute changed on one surface; re-place it.
//! - [`SurfaceRegistry::on_size_change`] — a surface's own content or a
//!   shared anchor container resized; re-place the affected surfaces.
//! - [`SurfaceRegistry::on_window_change`] — the window scrolled or resized;
//!   re-place every open surface whose placement can go stale without an
//!   element-level signal (flip-always policy or fixed positioning).
//!
//! Placement passes are idempotent: re-placing a surface twice with the same
//! metrics is wasted work, never a behavior change. A pass over a surface
//! whose metrics are unavailable (unmounted concurrently, or not yet
//! measured) silently no-ops.
//!
//! Storage uses generational slots: a stale [`SurfaceId`] reads as dead and
//! every operation on it is a silent no-op.

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use overstory_placement::{CornerSpec, FlipPolicy, ResolveRequest, Resolved, resolve_placement};

use crate::host::{Containment, SizeSource, SurfaceMetrics};
use crate::record::{SurfaceFlags, SurfaceId, SurfaceRecord, WidthPolicy};
use crate::stacking::{StackBase, StackingProfile, stack_z};

// Containment chains come from host element nesting and are acyclic in any
// well-formed host; bottom out instead of recursing forever if one is not.
const MAX_NESTING: u8 = 64;

#[derive(Debug)]
struct Slot {
    record: SurfaceRecord,
    containment: Containment,
    open: bool,
    /// Memoized corner substitution for the flip-on-open policy. Lives for
    /// one open/close cycle.
    forced_corners: Option<CornerSpec>,
    last: Option<Resolved>,
    resolved_z: Option<i32>,
}

/// Registry of tracked floating surfaces.
///
/// ## Example
///
/// ```
/// use kurbo::{Rect, Size};
/// use overstory_placement::Viewport;
/// use overstory_surface::{
///     Containment, StackingProfile, SurfaceId, SurfaceMetrics, SurfaceRecord, SurfaceRegistry,
/// };
///
/// struct Host;
/// impl SurfaceMetrics for Host {
///     fn anchor_rect(&self, _: SurfaceId) -> Option<Rect> {
///         Some(Rect::new(100.0, 100.0, 140.0, 120.0))
///     }
///     fn content_size(&self, _: SurfaceId) -> Option<Size> {
///         Some(Size::new(150.0, 100.0))
///     }
///     fn viewport(&self) -> Viewport {
///         Viewport::new(Size::new(800.0, 800.0))
///     }
/// }
///
/// let mut registry = SurfaceRegistry::new(StackingProfile::default());
/// let id = registry.register(SurfaceRecord::default(), Containment::Root);
/// registry.set_open(id, true);
///
/// let resolved = registry.place(id, &Host).expect("metrics available");
/// assert_eq!(resolved.placement.origin(), kurbo::Point::new(100.0, 120.0));
/// assert_eq!(registry.z_index(id), Some(1201));
/// ```
#[derive(Debug)]
pub struct SurfaceRegistry {
    slots: Vec<Option<Slot>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    groups: HashMap<u64, SmallVec<[SurfaceId; 2]>>,
    profile: StackingProfile,
}

impl SurfaceRegistry {
    /// Create a registry with the given stacking profile.
    ///
    /// The profile is the application-wide stacking configuration; it is
    /// read-only for the registry's lifetime.
    pub fn new(profile: StackingProfile) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            groups: HashMap::new(),
            profile,
        }
    }

    /// The injected stacking profile.
    pub fn profile(&self) -> &StackingProfile {
        &self.profile
    }

    /// Track a newly mounted surface.
    pub fn register(&mut self, record: SurfaceRecord, containment: Containment) -> SurfaceId {
        let group = record.anchor_group;
        let slot = Slot {
            record,
            containment,
            open: false,
            forced_corners: None,
            last: None,
            resolved_z: None,
        };
        let id = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                SurfaceId::new(idx as u32, self.generations[idx])
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(Some(slot));
                self.generations.push(0);
                SurfaceId::new(idx as u32, 0)
            }
        };
        if let Some(group) = group {
            let members = self.groups.entry(group).or_default();
            // Re-registering with the same group twice is a no-op.
            if !members.contains(&id) {
                members.push(id);
            }
        }
        id
    }

    /// Stop tracking a surface. Stale ids are a silent no-op.
    pub fn unregister(&mut self, id: SurfaceId) {
        if !self.is_alive(id) {
            return;
        }
        let idx = id.idx();
        if let Some(slot) = self.slots[idx].take() {
            if let Some(group) = slot.record.anchor_group {
                if let Some(members) = self.groups.get_mut(&group) {
                    members.retain(|m| *m != id);
                    if members.is_empty() {
                        self.groups.remove(&group);
                    }
                }
            }
        }
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(idx);
    }

    /// Whether the id refers to a currently tracked surface.
    pub fn is_alive(&self, id: SurfaceId) -> bool {
        self.slot(id).is_some()
    }

    /// The record a surface was registered with.
    pub fn record(&self, id: SurfaceId) -> Option<&SurfaceRecord> {
        self.slot(id).map(|s| &s.record)
    }

    /// Mark a surface visible or hidden.
    ///
    /// Hiding clears per-cycle placement state: the memoized flip decision,
    /// the last resolved placement, and the assigned z-index. The next open
    /// cycle starts fresh.
    pub fn set_open(&mut self, id: SurfaceId, open: bool) {
        if let Some(slot) = self.slot_mut(id) {
            if slot.open == open {
                return;
            }
            slot.open = open;
            if !open {
                slot.forced_corners = None;
                slot.last = None;
                slot.resolved_z = None;
            }
        }
    }

    /// Whether a surface is currently marked open.
    pub fn is_open(&self, id: SurfaceId) -> bool {
        self.slot(id).is_some_and(|s| s.open)
    }

    /// Run one placement pass for a surface.
    ///
    /// Reads live geometry from `metrics`, applies the width policy, resolves
    /// flip/clamp, and assigns a z-index (including the app-bar overlap
    /// bump). Returns `None`, without touching any state, when the surface
    /// is dead, closed, opted out via [`SurfaceFlags::SKIP_AUTO`], or its
    /// metrics are unavailable.
    pub fn place(&mut self, id: SurfaceId, metrics: &impl SurfaceMetrics) -> Option<Resolved> {
        let slot = self.slot(id)?;
        if !slot.open || slot.record.flags.contains(SurfaceFlags::SKIP_AUTO) {
            return None;
        }
        let anchor = metrics.anchor_rect(id)?;
        let mut size = metrics.content_size(id)?;
        match slot.record.width {
            WidthPolicy::Content => {}
            WidthPolicy::Relative => size.width = anchor.width(),
            WidthPolicy::Adaptive => size.width = size.width.max(anchor.width()),
        }
        let viewport = metrics.viewport();
        let flip_policy = slot.record.flip_policy;
        let forced = match flip_policy {
            // Never flipping is "the requested corners are always forced".
            FlipPolicy::Never => Some(slot.record.spec.corners()),
            FlipPolicy::OnOpen => slot.forced_corners,
            FlipPolicy::Always => None,
        };
        let resolved = resolve_placement(&ResolveRequest {
            anchor,
            size,
            spec: slot.record.spec,
            viewport,
            flip_margin: slot.record.flip_margin,
            forced,
        });

        let mut z = self.compute_z(slot, MAX_NESTING);
        // A surface that ends up under the fixed top bar must paint above it.
        if viewport.top_inset > 0.0 && resolved.placement.origin().y < viewport.top_inset {
            z = z.max(self.profile.app_bar_z + 1);
        }

        let slot = self.slot_mut(id)?;
        if flip_policy == FlipPolicy::OnOpen && resolved.flipped {
            slot.forced_corners = Some(resolved.corners);
        }
        slot.last = Some(resolved);
        slot.resolved_z = Some(z);
        Some(resolved)
    }

    /// The last resolved placement for a surface, if any pass succeeded this
    /// open cycle.
    pub fn resolved(&self, id: SurfaceId) -> Option<Resolved> {
        self.slot(id).and_then(|s| s.last)
    }

    /// The z-index assigned by the last placement pass.
    pub fn z_index(&self, id: SurfaceId) -> Option<i32> {
        self.slot(id).and_then(|s| s.resolved_z)
    }

    /// The z-index a backdrop/overlay associated with this surface inherits.
    ///
    /// Backdrops stack at the same level as their surface, not above it.
    /// Returns `None` for surfaces opted out of automatic positioning.
    pub fn backdrop_z(&self, id: SurfaceId) -> Option<i32> {
        let slot = self.slot(id)?;
        if slot.record.flags.contains(SurfaceFlags::SKIP_AUTO) {
            return None;
        }
        slot.resolved_z
    }

    /// A structural attribute changed on one surface (visibility class,
    /// position data); re-place it.
    pub fn on_structural_change(
        &mut self,
        id: SurfaceId,
        metrics: &impl SurfaceMetrics,
    ) -> Option<Resolved> {
        self.place(id, metrics)
    }

    /// A size change was observed; re-place the affected surfaces.
    ///
    /// Returns the surfaces that were actually re-placed with their new
    /// placements, in registration order for container-group sources.
    pub fn on_size_change(
        &mut self,
        source: SizeSource,
        metrics: &impl SurfaceMetrics,
    ) -> Vec<(SurfaceId, Resolved)> {
        let targets: Vec<SurfaceId> = match source {
            SizeSource::Content(id) => alloc::vec![id],
            SizeSource::AnchorContainer(group) => self
                .groups
                .get(&group)
                .map(|members| members.iter().copied().collect())
                .unwrap_or_default(),
        };
        self.place_each(targets, metrics)
    }

    /// The window scrolled or resized; re-place every open surface whose
    /// placement can go stale without an element-level signal.
    pub fn on_window_change(&mut self, metrics: &impl SurfaceMetrics) -> Vec<(SurfaceId, Resolved)> {
        let targets: Vec<SurfaceId> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let slot = slot.as_ref()?;
                let stale_prone = slot.record.flip_policy == FlipPolicy::Always
                    || slot.record.flags.contains(SurfaceFlags::FIXED);
                (slot.open && stale_prone)
                    .then(|| SurfaceId::new(idx as u32, self.generations[idx]))
            })
            .collect();
        self.place_each(targets, metrics)
    }

    fn place_each(
        &mut self,
        targets: Vec<SurfaceId>,
        metrics: &impl SurfaceMetrics,
    ) -> Vec<(SurfaceId, Resolved)> {
        let mut placed = Vec::new();
        for id in targets {
            if let Some(resolved) = self.place(id, metrics) {
                placed.push((id, resolved));
            }
        }
        placed
    }

    fn slot(&self, id: SurfaceId) -> Option<&Slot> {
        let idx = id.idx();
        if idx >= self.slots.len() || self.generations[idx] != id.1 {
            return None;
        }
        self.slots[idx].as_ref()
    }

    fn slot_mut(&mut self, id: SurfaceId) -> Option<&mut Slot> {
        let idx = id.idx();
        if idx >= self.slots.len() || self.generations[idx] != id.1 {
            return None;
        }
        self.slots[idx].as_mut()
    }

    fn compute_z(&self, slot: &Slot, depth: u8) -> i32 {
        let base = match slot.containment {
            Containment::Surface(parent) => match (depth > 0, self.slot(parent)) {
                (true, Some(parent_slot)) => StackBase::Nested {
                    parent_z: parent_slot
                        .resolved_z
                        .unwrap_or_else(|| self.compute_z(parent_slot, depth - 1)),
                },
                // Dead parent or runaway chain: treat as top-level.
                _ => StackBase::Root {
                    pinned: slot.record.pinned_z,
                },
            },
            Containment::Tooltip(container_z) => StackBase::Tooltip { container_z },
            Containment::AppBar(container_z) => StackBase::AppBar { container_z },
            Containment::Root => StackBase::Root {
                pinned: slot.record.pinned_z,
            },
        };
        stack_z(&self.profile, base)
    }
}
