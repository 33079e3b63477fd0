#![forbid(unsafe_code)]

//! The committed-layout no-overlap invariant, driven by random gesture
//! sequences: with collision enforcement on, no pair of visible,
//! non-collapsed items ever overlaps after a pointer-up, no matter where
//! the pointer went.

use proptest::prelude::*;
use quilt_core::breakpoint::Responsive;
use quilt_core::event::{PointerButton, PointerEvent};
use quilt_core::geometry::{CellRect, PxPoint};
use quilt_core::item::{GridConfig, ItemId, LayoutConfig, LayoutItem};
use quilt_core::registry::WidgetRegistry;
use quilt_core::widget::{RenderHandle, Widget};
use quilt_engine::{Engine, EngineOptions};

const ITEMS: [(&str, u16, u16); 4] = [
    ("item-0", 0, 0),
    ("item-1", 3, 0),
    ("item-2", 0, 3),
    ("item-3", 3, 3),
];

fn engine() -> Engine {
    let mut registry = WidgetRegistry::new();
    let mut layout = LayoutConfig::new("prop", "Property");
    layout.grid = Responsive::uniform(GridConfig {
        cols: 8,
        rows: 8,
        cell_size_px: 100.0,
        gap_px: 0.0,
    });
    for (i, (item, x, y)) in ITEMS.iter().enumerate() {
        let widget = format!("w{i}");
        registry.register(Widget::new(widget.clone(), widget.clone(), RenderHandle::new(i as u64)));
        layout.push_item(LayoutItem::new(*item, widget, CellRect::new(*x, *y, 2, 2)));
    }
    Engine::new(registry, layout, EngineOptions::default())
}

fn assert_no_overlap(engine: &Engine) {
    let bp = engine.active_breakpoint();
    let rects: Vec<(ItemId, CellRect)> = engine
        .active_items()
        .map(|item| (item.id.clone(), item.rect_at(bp).unwrap()))
        .collect();
    for (i, (id_a, a)) in rects.iter().enumerate() {
        for (id_b, b) in &rects[i + 1..] {
            assert!(
                !a.overlaps(b),
                "{id_a} at {a:?} overlaps {id_b} at {b:?}"
            );
        }
    }
}

proptest! {
    #[test]
    fn random_drags_never_commit_an_overlap(
        gestures in prop::collection::vec((0usize..4, 0.0f32..900.0, 0.0f32..900.0), 1..20)
    ) {
        let mut engine = engine();
        for (index, x, y) in gestures {
            let id: ItemId = ITEMS[index].0.into();
            let bp = engine.active_breakpoint();
            let rect = engine.layout().item(&id).unwrap().rect_at(bp).unwrap();
            // Grip the item near its top-left corner.
            let grip = PxPoint::new(f32::from(rect.x) * 100.0 + 10.0, f32::from(rect.y) * 100.0 + 10.0);

            engine.begin_drag(&id, grip);
            engine.pointer(PointerEvent::Move { position: PxPoint::new(x, y) });
            engine.pointer(PointerEvent::Up { position: PxPoint::new(x, y) });

            assert_no_overlap(&engine);
        }
    }

    #[test]
    fn random_drags_with_intermediate_moves_stay_consistent(
        moves in prop::collection::vec((0.0f32..900.0, 0.0f32..900.0), 1..12)
    ) {
        let mut engine = engine();
        let id: ItemId = "item-0".into();
        engine.pointer(PointerEvent::Down {
            position: PxPoint::new(10.0, 10.0),
            button: PointerButton::Primary,
        });
        for (x, y) in moves {
            engine.pointer(PointerEvent::Move { position: PxPoint::new(x, y) });
        }
        engine.pointer(PointerEvent::Up { position: PxPoint::new(0.0, 0.0) });

        // Wherever the drag ended, the committed layout is collision-free
        // and the dragged item is inside horizontal bounds.
        assert_no_overlap(&engine);
        let bp = engine.active_breakpoint();
        let rect = engine.layout().item(&id).unwrap().rect_at(bp).unwrap();
        prop_assert!(rect.right() <= 8);
    }
}
