//! Item model: floating cards layered above the raster surface, and their store.
//!
//! This module defines what a card is (`CanvasItem`, `ItemContent`), the
//! sparse geometry update emitted during drags and resizes (`ItemGeometry`),
//! and the runtime store that owns every live card (`ItemStore`).
//!
//! Cards live in content space alongside the strokes, so the layer transform
//! applies to both uniformly. Stacking follows creation order: every new card,
//! including duplicates, lands on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{
    DUPLICATE_OFFSET, FILM_SCREEN_INSET, IMAGE_SCREEN_INSET, MUSIC_SCREEN_INSET, TEXT_PLACEHOLDER,
    TEXT_SCREEN_INSET,
};

/// Unique identifier for a card.
pub type ItemId = Uuid;

/// The kind of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A picture referenced by URL or data URL.
    Image,
    /// Free text, edited in place by the host.
    Text,
    /// Title/description pair describing a song or a film.
    Media,
}

impl ItemKind {
    /// Size a freshly created card of this kind starts with.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Image => (220.0, 140.0),
            Self::Text => (200.0, 80.0),
            Self::Media => (240.0, 120.0),
        }
    }
}

/// What a media card describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Music,
    Film,
}

impl MediaKind {
    /// Glyph shown before the title.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Music => "🎵",
            Self::Film => "🎬",
        }
    }

    /// Title used when the user leaves it blank.
    #[must_use]
    pub fn fallback_title(self) -> &'static str {
        match self {
            Self::Music => "Música",
            Self::Film => "Filme",
        }
    }
}

/// What a card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemContent {
    Image { src: String },
    Text { text: String },
    Media { media: MediaKind, title: String, description: String },
}

impl ItemContent {
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image { src: src.into() }
    }

    /// Text card; a blank body becomes [`TEXT_PLACEHOLDER`].
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        let body = body.into();
        let text = if body.trim().is_empty() { TEXT_PLACEHOLDER.to_owned() } else { body };
        Self::Text { text }
    }

    /// Media card with trimmed fields; a blank title becomes the kind's fallback.
    #[must_use]
    pub fn media(media: MediaKind, title: &str, description: &str) -> Self {
        let title = match title.trim() {
            "" => media.fallback_title(),
            trimmed => trimmed,
        };
        Self::Media { media, title: title.to_owned(), description: description.trim().to_owned() }
    }

    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Image { .. } => ItemKind::Image,
            Self::Text { .. } => ItemKind::Text,
            Self::Media { .. } => ItemKind::Media,
        }
    }

    /// Frame-relative point where a toolbar-created card of this content lands.
    #[must_use]
    pub fn screen_inset(&self) -> Point {
        let (x, y) = match self {
            Self::Image { .. } => IMAGE_SCREEN_INSET,
            Self::Text { .. } => TEXT_SCREEN_INSET,
            Self::Media { media: MediaKind::Music, .. } => MUSIC_SCREEN_INSET,
            Self::Media { media: MediaKind::Film, .. } => FILM_SCREEN_INSET,
        };
        Point::new(x, y)
    }
}

/// A card as stored in the content layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    pub id: ItemId,
    /// Left edge in content coordinates.
    pub x: f64,
    /// Top edge in content coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Stacking order; higher values are drawn above lower ones.
    pub z_index: i64,
    pub content: ItemContent,
}

impl CanvasItem {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }

    /// Whether `pt` (content space) lies inside the card's box, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// The card's current box as a geometry update.
    #[must_use]
    pub fn geometry(&self) -> ItemGeometry {
        ItemGeometry {
            x: Some(self.x),
            y: Some(self.y),
            width: Some(self.width),
            height: Some(self.height),
        }
    }
}

/// Sparse geometry update for a card. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemGeometry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ItemGeometry {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }
}

/// In-memory store of the cards on the content layer.
pub struct ItemStore {
    items: HashMap<ItemId, CanvasItem>,
    next_z: i64,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: HashMap::new(), next_z: 0 }
    }

    /// Create a card with its kind's default size and put it on top.
    pub fn add(&mut self, content: ItemContent, position: Point) -> &CanvasItem {
        let (width, height) = content.kind().default_size();
        let item = CanvasItem {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            width,
            height,
            z_index: 0,
            content,
        };
        self.push_on_top(item)
    }

    /// Clone a card's content and size `DUPLICATE_OFFSET` down and right of it,
    /// on top of the stack. Returns `None` if `id` is unknown.
    pub fn duplicate(&mut self, id: &ItemId) -> Option<&CanvasItem> {
        let source = self.items.get(id)?;
        let copy = CanvasItem {
            id: Uuid::new_v4(),
            x: source.x + DUPLICATE_OFFSET,
            y: source.y + DUPLICATE_OFFSET,
            width: source.width,
            height: source.height,
            z_index: 0,
            content: source.content.clone(),
        };
        Some(self.push_on_top(copy))
    }

    fn push_on_top(&mut self, mut item: CanvasItem) -> &CanvasItem {
        item.z_index = self.next_z;
        self.next_z += 1;
        let id = item.id;
        self.items.entry(id).or_insert(item)
    }

    /// Remove a card by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<CanvasItem> {
        self.items.remove(id)
    }

    /// Return a reference to a card by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.get(id)
    }

    /// Apply a geometry update. Returns false if the card doesn't exist.
    pub fn apply_geometry(&mut self, id: &ItemId, geometry: &ItemGeometry) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        if let Some(x) = geometry.x {
            item.x = x;
        }
        if let Some(y) = geometry.y {
            item.y = y;
        }
        if let Some(w) = geometry.width {
            item.width = w;
        }
        if let Some(h) = geometry.height {
            item.height = h;
        }
        true
    }

    /// Replace the body of a text card. Returns false for unknown ids and other kinds.
    pub fn set_text(&mut self, id: &ItemId, text: String) -> bool {
        match self.items.get_mut(id) {
            Some(CanvasItem { content: ItemContent::Text { text: body }, .. }) => {
                *body = text;
                true
            }
            _ => false,
        }
    }

    /// Return all cards bottom-first.
    #[must_use]
    pub fn sorted_items(&self) -> Vec<&CanvasItem> {
        let mut items: Vec<&CanvasItem> = self.items.values().collect();
        items.sort_by_key(|item| item.z_index);
        items
    }

    /// Number of cards currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}
