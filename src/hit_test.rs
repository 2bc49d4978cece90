use super::*;
use crate::doc::ItemContent;

fn text(body: &str) -> ItemContent {
    ItemContent::Text { text: body.to_owned() }
}

#[test]
fn empty_store_hits_background() {
    let store = ItemStore::new();
    assert_eq!(hit_test(Point::new(1.0, 1.0), &store), None);
    assert_eq!(target_at(Point::new(1.0, 1.0), &store), Target::Background);
}

#[test]
fn point_inside_card_hits_body() {
    let mut store = ItemStore::new();
    let id = store.add(text("a"), Point::new(10.0, 10.0)).id;
    let hit = hit_test(Point::new(50.0, 30.0), &store).unwrap();
    assert_eq!(hit, Hit { item_id: id, part: HitPart::Body });
}

#[test]
fn bottom_right_corner_hits_resize_handle() {
    let mut store = ItemStore::new();
    // text default size is 200x80, so the card spans (10,10)-(210,90)
    let id = store.add(text("a"), Point::new(10.0, 10.0)).id;
    let hit = hit_test(Point::new(205.0, 85.0), &store).unwrap();
    assert_eq!(hit, Hit { item_id: id, part: HitPart::ResizeHandle });
}

#[test]
fn just_outside_handle_square_is_body() {
    let mut store = ItemStore::new();
    store.add(text("a"), Point::new(0.0, 0.0));
    let hit = hit_test(Point::new(200.0 - RESIZE_HANDLE_SIZE - 0.5, 79.0), &store).unwrap();
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn point_outside_all_cards_misses() {
    let mut store = ItemStore::new();
    store.add(text("a"), Point::new(10.0, 10.0));
    assert_eq!(hit_test(Point::new(500.0, 500.0), &store), None);
}

#[test]
fn topmost_card_wins_on_overlap() {
    let mut store = ItemStore::new();
    store.add(text("below"), Point::new(0.0, 0.0));
    let above = store.add(text("above"), Point::new(50.0, 20.0)).id;
    let hit = hit_test(Point::new(60.0, 30.0), &store).unwrap();
    assert_eq!(hit.item_id, above);
}

#[test]
fn target_at_wraps_hit() {
    let mut store = ItemStore::new();
    let id = store.add(text("a"), Point::new(0.0, 0.0)).id;
    assert_eq!(
        target_at(Point::new(5.0, 5.0), &store),
        Target::Item(Hit { item_id: id, part: HitPart::Body })
    );
}
