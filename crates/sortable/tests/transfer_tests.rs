//! Moving items between connected lists.

mod common;

use common::{Harness, names};
use sortable::{ClientRect, DomHost, DragDropEvent, DragId, DropListId, NodeId, Vec2};

struct TwoLists {
    h: Harness,
    source: DropListId,
    target: DropListId,
    nodes: Vec<NodeId>,
    items: Vec<DragId>,
}

/// A three item list at x 200..300 and an empty list at x 0..100,
/// connected both ways.
fn two_lists() -> TwoLists {
    let mut h = Harness::new();
    let (source, nodes, items) = h.vertical_list(ClientRect::new(200.0, 0.0, 100.0, 300.0), 3, 30.0);
    let (target, _, _) = h.vertical_list(ClientRect::new(0.0, 0.0, 100.0, 300.0), 0, 30.0);
    h.system.connect_lists(source, vec![target]).unwrap();
    h.system.connect_lists(target, vec![source]).unwrap();
    TwoLists {
        h,
        source,
        target,
        nodes,
        items,
    }
}

#[test]
fn test_transfer_into_connected_list() {
    let TwoLists {
        mut h,
        source,
        target,
        nodes,
        items,
    } = two_lists();
    let a = items[0];

    h.start_drag(a, 250.0, 10.0);
    assert!(h.system.list(target).unwrap().is_receiving());

    h.move_to(50.0, 10.0, 32);
    let placeholder = h.system.item(a).unwrap().placeholder().unwrap();
    assert_eq!(h.dom.parent(placeholder), Some(h.element(target)));
    assert_eq!(h.system.item(a).unwrap().drop_container(), Some(target));
    assert!(!h.system.list(source).unwrap().is_dragging());

    h.release(50.0, 10.0, 48);
    let events = h.events();
    assert_eq!(
        names(&events),
        [
            "before_started",
            "started",
            "exited",
            "entered",
            "moved",
            "released",
            "ended",
            "dropped"
        ]
    );
    assert_eq!(events[2], DragDropEvent::Exited { item: a, container: source });
    assert_eq!(
        events[3],
        DragDropEvent::Entered {
            item: a,
            container: target,
            current_index: 0,
        }
    );
    match &events[7] {
        DragDropEvent::Dropped {
            container,
            previous_container,
            previous_index,
            current_index,
            is_pointer_over_container,
            distance,
            ..
        } => {
            assert_eq!(*container, target);
            assert_eq!(*previous_container, source);
            assert_eq!(*previous_index, 0);
            assert_eq!(*current_index, 0);
            assert!(is_pointer_over_container);
            assert_eq!(*distance, Vec2::new(-200.0, 0.0));
        }
        other => panic!("expected Dropped, got {other:?}"),
    }

    // The root goes back to its original slot until the application re-renders.
    assert_eq!(h.dom.children(h.element(source)), nodes);
    assert!(h.dom.children(h.element(target)).is_empty());
    assert_eq!(h.system.item(a).unwrap().drop_container(), Some(source));
    assert!(!h.system.list(target).unwrap().is_dragging());
    assert!(!h.system.list(source).unwrap().is_receiving());

    h.system.set_list_items(source, items[1..].to_vec()).unwrap();
    h.system.set_list_items(target, vec![a]).unwrap();
    assert_eq!(h.system.item(a).unwrap().drop_container(), Some(target));
    assert_eq!(h.system.get_item_index(target, a).unwrap(), Some(0));
}

#[test]
fn test_enter_predicate_blocks_transfer() {
    let TwoLists {
        mut h,
        source,
        target,
        items,
        ..
    } = two_lists();
    let blocked = items[0];
    let config = h.system.list_config_mut(target).unwrap();
    *config = config.clone().enter_predicate(move |item, _| item != blocked);

    h.start_drag(blocked, 250.0, 10.0);
    assert!(!h.system.list(target).unwrap().is_receiving());

    h.move_to(50.0, 10.0, 32);
    assert_eq!(names(&h.events()), ["before_started", "started", "moved"]);
    assert_eq!(h.system.item(blocked).unwrap().drop_container(), Some(source));
}

#[test]
fn test_covered_list_does_not_receive() {
    let TwoLists { mut h, source, items, .. } = two_lists();
    h.dom.append(h.dom.body(), ClientRect::new(0.0, 0.0, 150.0, 300.0));

    h.start_drag(items[0], 250.0, 10.0);
    h.move_to(50.0, 10.0, 32);

    assert!(!names(&h.events()).contains(&"entered"));
    assert_eq!(h.system.item(items[0]).unwrap().drop_container(), Some(source));
}

#[test]
fn test_return_to_source_without_reverse_connection() {
    let mut h = Harness::new();
    let (source, nodes, items) = h.vertical_list(ClientRect::new(200.0, 0.0, 100.0, 300.0), 3, 30.0);
    let (target, _, _) = h.vertical_list(ClientRect::new(0.0, 0.0, 100.0, 300.0), 0, 30.0);
    h.system.connect_lists(source, vec![target]).unwrap();
    let a = items[0];

    h.start_drag(a, 250.0, 10.0);
    h.move_to(50.0, 10.0, 32);
    h.move_to(250.0, 10.0, 48);
    assert_eq!(h.system.item(a).unwrap().drop_container(), Some(source));

    h.release(250.0, 10.0, 64);
    let events = h.events();
    assert_eq!(
        names(&events),
        [
            "before_started",
            "started",
            "exited",
            "entered",
            "moved",
            "exited",
            "entered",
            "moved",
            "released",
            "ended",
            "dropped"
        ]
    );
    assert_eq!(events[5], DragDropEvent::Exited { item: a, container: target });
    assert!(matches!(
        events.last(),
        Some(DragDropEvent::Dropped {
            container,
            previous_container,
            previous_index: 0,
            current_index: 0,
            ..
        }) if *container == source && *previous_container == source
    ));
    assert_eq!(h.dom.children(h.element(source)), nodes);
}

#[test]
fn test_connect_lists_ignores_self() {
    let TwoLists {
        mut h, source, target, ..
    } = two_lists();
    h.system.connect_lists(source, vec![source, target]).unwrap();
    assert_eq!(h.system.list(source).unwrap().siblings(), [target]);
}

#[test]
fn test_set_list_items_keeps_item_entered_from_sibling() {
    let mut h = Harness::new();
    let (source, _, items) = h.vertical_list(ClientRect::new(200.0, 200.0, 100.0, 300.0), 3, 30.0);
    let (target, target_nodes, target_items) =
        h.vertical_list(ClientRect::new(0.0, 0.0, 100.0, 300.0), 2, 30.0);
    h.system.connect_lists(source, vec![target]).unwrap();
    h.system.connect_lists(target, vec![source]).unwrap();
    let a = items[0];

    h.start_drag(a, 250.0, 210.0);
    h.move_to(50.0, 45.0, 32);
    assert_eq!(h.system.item(a).unwrap().drop_container(), Some(target));
    assert_eq!(h.system.get_item_index(target, a).unwrap(), Some(1));

    // Lay the placeholder out between the two target items.
    let placeholder = h.system.item(a).unwrap().placeholder().unwrap();
    h.dom.set_rect(placeholder, ClientRect::new(0.0, 30.0, 100.0, 30.0));
    h.dom.set_rect(target_nodes[1], ClientRect::new(0.0, 60.0, 100.0, 30.0));

    h.system.set_list_items(target, target_items.clone()).unwrap();
    let list = h.system.list(target).unwrap();
    assert!(list.is_dragging());
    assert_eq!(list.draggables(), target_items.as_slice());
    assert_eq!(h.system.get_item_index(target, a).unwrap(), Some(1));

    h.release(50.0, 45.0, 48);
    assert!(matches!(
        h.events().last(),
        Some(DragDropEvent::Dropped {
            container,
            previous_container,
            previous_index: 0,
            current_index: 1,
            ..
        }) if *container == target && *previous_container == source
    ));
}
