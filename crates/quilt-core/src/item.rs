#![forbid(unsafe_code)]

//! Placement records and the layout aggregate.
//!
//! [`LayoutItem`] ties a registered widget to per-breakpoint grid
//! placements. [`LayoutConfig`] is the unit of persistence and of
//! undo/redo: an ordered set of items plus a grid table per breakpoint.
//!
//! Serde representations use camelCase field names; this is the wire format
//! of the persisted document.

use serde::{Deserialize, Serialize};

use crate::breakpoint::{Breakpoint, Responsive};
use crate::geometry::{CellPoint, CellRect, CellSize};
use crate::widget::WidgetId;

/// Unique layout-item identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Grid geometry for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Column count; horizontal overflow past it is disallowed.
    pub cols: u16,
    /// Soft row minimum; the container grows past it vertically.
    pub rows: u16,
    /// Edge length of a square cell, in pixels.
    pub cell_size_px: f32,
    /// Gutter between cells and around the grid edge, in pixels.
    pub gap_px: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 12,
            rows: 8,
            cell_size_px: 80.0,
            gap_px: 8.0,
        }
    }
}

/// A placement record for one widget in one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: ItemId,
    /// Must reference a registered widget; a dangling reference excludes
    /// the item from placement and rendering but it stays in the document.
    pub widget_id: WidgetId,
    /// Per-breakpoint top-left corner, in cells.
    pub position: Responsive<CellPoint>,
    /// Per-breakpoint size, in cells.
    pub size: Responsive<CellSize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z_index: i16,
    /// Per-breakpoint hidden flags.
    #[serde(default, skip_serializing_if = "Responsive::is_empty")]
    pub hidden: Responsive<bool>,
}

fn is_zero(z: &i16) -> bool {
    *z == 0
}

impl LayoutItem {
    /// Create an item with a uniform placement across breakpoints.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, widget_id: impl Into<WidgetId>, rect: CellRect) -> Self {
        Self {
            id: id.into(),
            widget_id: widget_id.into(),
            position: Responsive::uniform(rect.position()),
            size: Responsive::uniform(rect.size()),
            collapsed: false,
            z_index: 0,
            hidden: Responsive::new(),
        }
    }

    /// Resolved placement rectangle at a breakpoint.
    #[must_use]
    pub fn rect_at(&self, bp: Breakpoint) -> Option<CellRect> {
        let pos = self.position.get(bp)?;
        let size = self.size.get(bp)?;
        Some(CellRect::from_parts(*pos, *size))
    }

    /// Write a placement for exactly one breakpoint.
    pub fn set_rect_at(&mut self, bp: Breakpoint, rect: CellRect) {
        self.position.set(bp, rect.position());
        self.size.set(bp, rect.size());
    }

    /// Hidden flag at a breakpoint (inherited; defaults to visible).
    #[must_use]
    pub fn hidden_at(&self, bp: Breakpoint) -> bool {
        self.hidden.get(bp).copied().unwrap_or(false)
    }

    /// Whether the item takes part in collision and rendering at a
    /// breakpoint.
    #[must_use]
    pub fn participates_at(&self, bp: Breakpoint) -> bool {
        !self.collapsed && !self.hidden_at(bp)
    }
}

/// The layout aggregate: ordered items plus grid geometry per breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub id: String,
    pub name: String,
    pub items: Vec<LayoutItem>,
    pub grid: Responsive<GridConfig>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Millis since the Unix epoch.
    pub created: u64,
    /// Millis since the Unix epoch; bumped on every committed mutation.
    pub modified: u64,
}

impl LayoutConfig {
    /// Create an empty layout with a default grid table.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
            grid: Responsive::uniform(GridConfig::default()),
            locked: false,
            created: 0,
            modified: 0,
        }
    }

    /// Grid geometry at a breakpoint, via responsive inheritance.
    #[must_use]
    pub fn grid_at(&self, bp: Breakpoint) -> GridConfig {
        self.grid.get(bp).copied().unwrap_or_default()
    }

    /// Find an item.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Find an item mutably.
    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut LayoutItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Find the item placing a given widget.
    #[must_use]
    pub fn item_for_widget(&self, widget_id: &WidgetId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| &item.widget_id == widget_id)
    }

    /// Append an item.
    pub fn push_item(&mut self, item: LayoutItem) {
        self.items.push(item);
    }

    /// Remove an item, returning it when present.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<LayoutItem> {
        let idx = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Remove every item referencing a widget; returns how many were
    /// removed.
    pub fn remove_widget_items(&mut self, widget_id: &WidgetId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| &item.widget_id != widget_id);
        before - self.items.len()
    }

    /// Stamp creation and modification times.
    pub fn stamp_created(&mut self, now_ms: u64) {
        self.created = now_ms;
        self.modified = now_ms;
    }

    /// Bump the modification time.
    pub fn touch(&mut self, now_ms: u64) {
        self.modified = now_ms;
    }
}
