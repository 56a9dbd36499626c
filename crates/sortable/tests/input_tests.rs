//! Press filtering, start thresholds and free dragging.

mod common;

use std::time::Duration;

use common::{Harness, names};
use sortable::{
    ClientRect, DomHost, DragAxis, DragConfig, DragDropEvent, DragPhase, MouseButton, PointerEvent, Vec2,
};
use sortable_core::math::Affine2;

fn phase(h: &Harness, item: sortable::DragId) -> DragPhase {
    h.system.item(item).unwrap().phase()
}

fn moved_positions(events: &[DragDropEvent]) -> Vec<Vec2> {
    events
        .iter()
        .filter_map(|event| match event {
            DragDropEvent::Moved { pointer_position, .. } => Some(*pointer_position),
            _ => None,
        })
        .collect()
}

#[test]
fn test_press_below_threshold_does_not_start() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), DragConfig::default());

    h.press(item, node, 20.0, 20.0, 0);
    assert_eq!(phase(&h, item), DragPhase::Armed);
    h.move_to(22.0, 22.0, 16);
    assert_eq!(phase(&h, item), DragPhase::Armed);
    h.release(22.0, 22.0, 32);

    assert_eq!(phase(&h, item), DragPhase::Idle);
    assert_eq!(names(&h.events()), ["before_started"]);
    assert!(!h.system.is_dragging());
}

#[test]
fn test_handles_restrict_presses() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(0.0, 0.0, 100.0, 50.0), DragConfig::default());
    let handle = h.dom.append(node, ClientRect::new(0.0, 0.0, 20.0, 20.0));
    let grip = h.dom.append(handle, ClientRect::new(5.0, 5.0, 10.0, 10.0));
    h.system.with_handles(item, vec![handle]).unwrap();

    h.press(item, node, 50.0, 30.0, 0);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    // Presses on descendants of a handle count.
    h.press(item, grip, 10.0, 10.0, 0);
    assert_eq!(phase(&h, item), DragPhase::Armed);
    h.release(10.0, 10.0, 16);

    h.system.disable_handle(item, handle).unwrap();
    h.press(item, handle, 10.0, 10.0, 32);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    h.system.enable_handle(item, handle).unwrap();
    h.press(item, handle, 10.0, 10.0, 48);
    assert_eq!(phase(&h, item), DragPhase::Armed);
}

#[test]
fn test_rejected_presses() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(0.0, 0.0, 100.0, 50.0), DragConfig::default());
    let at = Vec2::new(10.0, 10.0);

    let right = PointerEvent::mouse(at, Some(node), h.at(0)).with_button(MouseButton::Right);
    h.system.pointer_down(item, &right);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    let screen_reader = PointerEvent::mouse(at, Some(node), h.at(0)).with_buttons(0);
    h.system.pointer_down(item, &screen_reader);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    h.system.item_config_mut(item).unwrap().disabled = true;
    h.press(item, node, 10.0, 10.0, 0);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    // Every press is announced, even the rejected ones.
    assert_eq!(names(&h.events()), ["before_started"; 3]);
}

#[test]
fn test_disabled_list_rejects_presses() {
    let mut h = Harness::new();
    let (list, nodes, items) = h.vertical_list(ClientRect::new(0.0, 0.0, 100.0, 300.0), 2, 30.0);
    h.system.list_config_mut(list).unwrap().disabled = true;

    h.press(items[0], nodes[0], 50.0, 10.0, 0);
    assert_eq!(phase(&h, items[0]), DragPhase::Idle);
}

#[test]
fn test_moving_before_delay_cancels_press() {
    let mut h = Harness::new();
    let config = DragConfig::default().drag_start_delay(Duration::from_millis(500));
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), config);

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(40.0, 20.0, 100);
    assert_eq!(phase(&h, item), DragPhase::Idle);
    assert!(!h.system.is_dragging());

    h.press(item, node, 20.0, 20.0, 200);
    h.move_to(40.0, 20.0, 800);
    assert_eq!(phase(&h, item), DragPhase::Dragging);
    assert_eq!(names(&h.events()), ["before_started", "before_started", "started"]);
}

#[test]
fn test_emulated_mouse_after_touch_is_ignored() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), DragConfig::default());

    let touch = PointerEvent::touch(Vec2::new(20.0, 20.0), Some(node), h.at(0));
    h.system.pointer_down(item, &touch);
    h.system.pointer_move(&PointerEvent::touch(Vec2::new(20.0, 40.0), None, h.at(16)));
    assert!(h.system.coordinator().is_touch_sequence());
    h.system.pointer_up(&PointerEvent::touch_end_without_points(h.at(32)));
    assert_eq!(phase(&h, item), DragPhase::Idle);

    h.press(item, node, 20.0, 20.0, 100);
    assert_eq!(phase(&h, item), DragPhase::Idle);

    h.press(item, node, 20.0, 20.0, 1000);
    assert_eq!(phase(&h, item), DragPhase::Armed);
}

#[test]
fn test_touch_sequence_ignores_mouse_input() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), DragConfig::default());

    let touch = PointerEvent::touch(Vec2::new(20.0, 20.0), Some(node), h.at(0));
    h.system.pointer_down(item, &touch);
    h.move_to(20.0, 60.0, 16);
    assert_eq!(phase(&h, item), DragPhase::Armed);

    h.system.pointer_move(&PointerEvent::touch(Vec2::new(20.0, 40.0), None, h.at(32)));
    assert_eq!(phase(&h, item), DragPhase::Dragging);

    h.release(20.0, 40.0, 48);
    assert_eq!(phase(&h, item), DragPhase::Dragging);

    h.system.pointer_up(&PointerEvent::touch(Vec2::new(20.0, 40.0), None, h.at(64)));
    assert_eq!(phase(&h, item), DragPhase::Idle);
    assert_eq!(names(&h.events()), ["before_started", "started", "released", "ended"]);
}

#[test]
fn test_free_drag_follows_pointer_and_persists() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), DragConfig::default());

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(20.0, 30.0, 16);
    h.move_to(50.0, 80.0, 32);
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(30px, 60px, 0)");
    assert_eq!(h.system.free_drag_position(item).unwrap(), Vec2::new(30.0, 60.0));
    h.release(50.0, 80.0, 48);

    let events = h.events();
    assert_eq!(names(&events), ["before_started", "started", "moved", "released", "ended"]);
    assert_eq!(
        events[4],
        DragDropEvent::Ended {
            item,
            distance: Vec2::new(30.0, 60.0),
            drop_point: Vec2::new(50.0, 80.0),
        }
    );
    assert_eq!(h.system.free_drag_position(item).unwrap(), Vec2::new(30.0, 60.0));

    // A second drag continues from the committed offset.
    h.press(item, node, 50.0, 80.0, 100);
    h.move_to(50.0, 90.0, 116);
    h.move_to(60.0, 100.0, 132);
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(40px, 80px, 0)");
}

#[test]
fn test_axis_lock_pins_other_axis() {
    let mut h = Harness::new();
    let config = DragConfig::default().lock_axis(DragAxis::Y);
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), config);

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(20.0, 30.0, 16);
    h.move_to(60.0, 80.0, 32);
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(0px, 60px, 0)");
}

#[test]
fn test_boundary_clamps_position() {
    let mut h = Harness::new();
    let boundary = h.dom.append(h.dom.body(), ClientRect::new(0.0, 0.0, 200.0, 200.0));
    let config = DragConfig::default().boundary(boundary);
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), config);

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(30.0, 30.0, 16);
    h.move_to(500.0, 500.0, 32);

    let moved = h
        .events()
        .into_iter()
        .find_map(|event| match event {
            DragDropEvent::Moved { pointer_position, .. } => Some(pointer_position),
            _ => None,
        })
        .unwrap();
    // The element's far edge stops at the boundary's far edge.
    assert_eq!(moved, Vec2::new(160.0, 160.0));
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(140px, 140px, 0)");
}

#[test]
fn test_boundary_smaller_than_element_pins_position() {
    let mut h = Harness::new();
    let boundary = h.dom.append(h.dom.body(), ClientRect::new(0.0, 0.0, 300.0, 40.0));
    let config = DragConfig::default().boundary(boundary);
    let (item, node) = h.free_item(ClientRect::new(10.0, 10.0, 50.0, 50.0), config);

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(20.0, 30.0, 16);
    h.move_to(100.0, 200.0, 32);
    h.move_to(150.0, -100.0, 48);

    // Too tall to fit, so the top edge stays on the boundary's top edge.
    assert_eq!(
        moved_positions(&h.events()),
        [Vec2::new(100.0, 10.0), Vec2::new(150.0, 10.0)]
    );
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(130px, -10px, 0)");
}

#[test]
fn test_svg_item_moves_in_user_units() {
    let mut h = Harness::new();
    let svg = h.dom.append(h.dom.body(), ClientRect::new(0.0, 0.0, 400.0, 400.0));
    let node = h.dom.append(svg, ClientRect::new(10.0, 10.0, 50.0, 50.0));
    // One user unit is two screen pixels.
    h.dom.set_svg(node, svg, Affine2::from_scale(Vec2::splat(2.0)));
    let item = h.system.create_item(node);

    h.press(item, node, 20.0, 20.0, 0);
    h.move_to(20.0, 40.0, 16);
    assert_eq!(phase(&h, item), DragPhase::Dragging);
    h.move_to(60.0, 100.0, 32);

    assert_eq!(moved_positions(&h.events()), [Vec2::new(30.0, 50.0)]);
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(20px, 40px, 0)");
    assert_eq!(h.dom.attribute(node, "transform").as_deref(), Some("translate(20 40)"));
}

#[test]
fn test_constrain_callback_positions_element_corner() {
    let mut h = Harness::new();
    let config = DragConfig::default().constrain_position(|point, _, _, pickup| {
        // Snap the element corner to a 50px grid.
        let corner = point - pickup;
        (corner / 50.0).round() * 50.0
    });
    let (item, node) = h.free_item(ClientRect::new(0.0, 0.0, 50.0, 50.0), config);

    h.press(item, node, 10.0, 10.0, 0);
    h.move_to(10.0, 20.0, 16);
    h.move_to(70.0, 115.0, 32);
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(50px, 100px, 0)");
}

#[test]
fn test_set_and_reset_free_drag_position() {
    let mut h = Harness::new();
    let (item, node) = h.free_item(ClientRect::new(0.0, 0.0, 50.0, 50.0), DragConfig::default());

    h.system.set_free_drag_position(item, Vec2::new(10.0, 15.0)).unwrap();
    assert_eq!(h.dom.style_property(node, "transform"), "translate3d(10px, 15px, 0)");

    h.system.reset_item(item).unwrap();
    assert_eq!(h.dom.style_property(node, "transform"), "");
    assert_eq!(h.system.free_drag_position(item).unwrap(), Vec2::ZERO);
}
