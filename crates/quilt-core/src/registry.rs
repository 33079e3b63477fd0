#![forbid(unsafe_code)]

//! The widget registry.
//!
//! An explicit, host-owned object handed to the engine at construction.
//! There is no module-level singleton: hosts that need several independent
//! engines simply construct several registries.

use std::collections::HashMap;

use crate::widget::{Widget, WidgetId};

/// Registered widgets, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<WidgetId, Widget>,
}

impl WidgetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget, replacing any previous registration under the
    /// same id. Returns the replaced widget when there was one.
    pub fn register(&mut self, widget: Widget) -> Option<Widget> {
        self.widgets.insert(widget.id().clone(), widget)
    }

    /// Remove a registration.
    pub fn unregister(&mut self, id: &WidgetId) -> Option<Widget> {
        self.widgets.remove(id)
    }

    /// Look up a widget.
    #[must_use]
    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    /// Look up a widget mutably (for capability toggles).
    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    /// Whether an id is registered.
    #[must_use]
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Iterate over registered widgets in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }
}
