// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthrough: menu tree + surface registry + placement.
//!
//! This example wires the three crates together the way a host would:
//! - `overstory_menu` decides when menus open and close,
//! - `overstory_surface` tracks their floating surfaces and stacking,
//! - `overstory_placement` turns anchors into screen positions.
//!
//! The "host" here is a hash map of fake element geometry and a hand-driven
//! millisecond clock.
//!
//! Run:
//! - `cargo run -p overstory_demos --example menu_walkthrough`

use std::collections::HashMap;

use kurbo::{Rect, Size};
use overstory_menu::{MenuConfig, MenuEvent, MenuTree, PointerButton, Trigger};
use overstory_placement::Viewport;
use overstory_surface::{
    Containment, StackingProfile, SurfaceId, SurfaceMetrics, SurfaceRecord, SurfaceRegistry,
};

/// Fake element geometry, keyed by surface.
struct Host {
    anchors: HashMap<SurfaceId, Rect>,
    sizes: HashMap<SurfaceId, Size>,
}

impl SurfaceMetrics for Host {
    fn anchor_rect(&self, surface: SurfaceId) -> Option<Rect> {
        self.anchors.get(&surface).copied()
    }
    fn content_size(&self, surface: SurfaceId) -> Option<Size> {
        self.sizes.get(&surface).copied()
    }
    fn viewport(&self) -> Viewport {
        Viewport::new(Size::new(800.0, 800.0)).with_top_inset(64.0)
    }
}

fn main() {
    let mut tree = MenuTree::new();
    let mut registry = SurfaceRegistry::new(StackingProfile::default());

    // A menu bar entry with one submenu. The submenu's surface is nested in
    // the root menu's surface, so it stacks directly above it.
    let root_menu = tree.insert(None, MenuConfig::default());
    let sub_menu = tree.insert(Some(root_menu), MenuConfig::default());

    let root_surface = registry.register(SurfaceRecord::default(), Containment::Root);
    let sub_surface = registry.register(SurfaceRecord::default(), Containment::Surface(root_surface));

    // Menu → surface wiring the host would keep next to its views.
    let surfaces = HashMap::from([(root_menu, root_surface), (sub_menu, sub_surface)]);

    let host = Host {
        anchors: HashMap::from([
            // The menu-bar button, near the bottom so the root menu flips.
            (root_surface, Rect::new(100.0, 760.0, 180.0, 790.0)),
            // The submenu's activator row inside the root menu.
            (sub_surface, Rect::new(110.0, 640.0, 240.0, 660.0)),
        ]),
        sizes: HashMap::from([
            (root_surface, Size::new(160.0, 240.0)),
            (sub_surface, Size::new(140.0, 120.0)),
        ]),
    };

    let mut now = 0_u64;

    // Click the menu-bar button.
    println!("== click the root activator ==");
    let events = tree.open(
        root_menu,
        Trigger::Click {
            button: PointerButton::Primary,
            position: None,
        },
        false,
        now,
    );
    apply(&events, &surfaces, &mut registry, &host);

    // Hover the submenu's activator row and let the hover intent elapse.
    println!("\n== hover the submenu row ==");
    now += 1_000;
    tree.pointer_enter(sub_menu, now);
    let deadline = tree.next_deadline().expect("hover intent pending");
    println!("hover intent due at {deadline}ms");
    let events = tree.advance(deadline);
    apply(&events, &surfaces, &mut registry, &host);

    // Escape peels only the submenu, then the root.
    println!("\n== escape, twice ==");
    for _ in 0..2 {
        let events = tree.escape();
        apply(&events, &surfaces, &mut registry, &host);
    }
}

/// Mirror menu transitions into the surface registry, the way a host's
/// render layer would, and narrate the result.
fn apply(
    events: &[MenuEvent],
    surfaces: &HashMap<overstory_menu::MenuId, SurfaceId>,
    registry: &mut SurfaceRegistry,
    host: &Host,
) {
    for event in events {
        match *event {
            MenuEvent::Opened { id, transient } => {
                let surface = surfaces[&id];
                registry.set_open(surface, true);
                let resolved = registry.place(surface, host).expect("metrics available");
                let origin = resolved.placement.origin();
                println!(
                    "opened {id:?} ({}) at ({:.0}, {:.0}) z={} flipped={}",
                    if transient { "transient" } else { "persistent" },
                    origin.x,
                    origin.y,
                    registry.z_index(surface).unwrap(),
                    resolved.flipped,
                );
            }
            MenuEvent::Closed { id } => {
                registry.set_open(surfaces[&id], false);
                println!("closed {id:?}");
            }
        }
    }
}
