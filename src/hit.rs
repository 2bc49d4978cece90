#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::RESIZE_HANDLE_SIZE;
use crate::doc::{CanvasItem, ItemId, ItemStore};

/// Which part of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The frame, the content layer or the raster surface itself.
    Background,
    Item(Hit),
}

/// Find the topmost card under `world_pt`. The resize handle wins over the body.
#[must_use]
pub fn hit_test(world_pt: Point, items: &ItemStore) -> Option<Hit> {
    items.sorted_items().into_iter().rev().find_map(|item| hit_item(world_pt, item))
}

/// Resolve a press into a dispatch target.
#[must_use]
pub fn target_at(world_pt: Point, items: &ItemStore) -> Target {
    hit_test(world_pt, items).map_or(Target::Background, Target::Item)
}

fn hit_item(pt: Point, item: &CanvasItem) -> Option<Hit> {
    if !item.contains(pt) {
        return None;
    }
    let handle_x = item.x + item.width - RESIZE_HANDLE_SIZE;
    let handle_y = item.y + item.height - RESIZE_HANDLE_SIZE;
    let part = if pt.x >= handle_x && pt.y >= handle_y { HitPart::ResizeHandle } else { HitPart::Body };
    Some(Hit { item_id: item.id, part })
}
