#![forbid(unsafe_code)]

//! The engine facade: owns the live layout and wires the grid model,
//! interaction machine, scheduler, history, and persistence together.
//!
//! The engine is a single-writer state machine driven from the host's
//! cooperative event loop: pointer and resize events are processed fully
//! and synchronously in arrival order, scheduler callbacks only read, and
//! auto-save is debounced and fire-and-forget. Committed mutations (drag
//! end, resize end, algorithm switch, widget add/remove, undo/redo) push
//! a history snapshot and fire `on_layout_change`.

use std::collections::HashSet;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use quilt_core::breakpoint::{Breakpoint, Breakpoints};
use quilt_core::error::EngineWarning;
use quilt_core::event::{PointerButton, PointerEvent, ResizeInput};
use quilt_core::geometry::{CellRect, CellSize, PxPoint, PxRect};
use quilt_core::item::{GridConfig, ItemId, LayoutConfig, LayoutItem};
use quilt_core::registry::WidgetRegistry;
use quilt_core::widget::{Capabilities, Widget, WidgetId};
use quilt_layout::algorithms::{Algorithm, PlacementSpec};
use quilt_layout::collision::first_free_position;
use quilt_layout::grid::{self, GridModel};

use crate::history::{DEFAULT_CAPACITY, LayoutHistory};
use crate::interaction::{Interaction, InteractionConfig, InteractionState, ResizeEdge};
use crate::persistence::{AutoSave, DEFAULT_DEBOUNCE, StorageBackend, load_or_default};
use crate::scheduler::{RenderEntry, RenderScheduler, SchedulerConfig};

type ChangeCallback = Box<dyn FnMut(&LayoutConfig)>;
type WarningCallback = Box<dyn FnMut(&EngineWarning)>;

/// Engine construction options.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub breakpoints: Breakpoints,
    pub interaction: InteractionConfig,
    pub scheduler: SchedulerConfig,
    /// History snapshot bound.
    pub history_capacity: usize,
    /// Auto-save debounce window.
    pub autosave_debounce: std::time::Duration,
    /// Gate drag/resize candidates on collision freedom.
    pub enforce_collisions: bool,
    /// Cell gap handed to placement algorithms.
    pub algorithm_spacing: u16,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            interaction: InteractionConfig::default(),
            scheduler: SchedulerConfig::default(),
            history_capacity: DEFAULT_CAPACITY,
            autosave_debounce: DEFAULT_DEBOUNCE,
            enforce_collisions: true,
            algorithm_spacing: 0,
        }
    }
}

/// The adaptive widget layout engine.
pub struct Engine {
    registry: WidgetRegistry,
    grid_model: GridModel,
    grid_cfg: GridConfig,
    layout: LayoutConfig,
    history: LayoutHistory,
    interaction: Interaction,
    scheduler: RenderScheduler,
    autosave: Option<AutoSave>,
    /// Items whose widget is not registered; excluded from placement and
    /// rendering, retained in the document.
    dangling: HashSet<ItemId>,
    /// Participating items snapshotted at gesture start, for collision
    /// checks during pointer moves.
    gesture_items: Vec<LayoutItem>,
    options: EngineOptions,
    on_change: Option<ChangeCallback>,
    on_warning: Option<WarningCallback>,
}

impl Engine {
    /// Create an engine over a host-owned registry and an initial layout.
    #[must_use]
    pub fn new(registry: WidgetRegistry, mut layout: LayoutConfig, options: EngineOptions) -> Self {
        if layout.created == 0 {
            layout.stamp_created(now_millis());
        }
        let grid_model = GridModel::new(options.breakpoints);
        let grid_cfg = layout.grid_at(grid_model.active());
        let mut engine = Self {
            registry,
            grid_model,
            grid_cfg,
            history: LayoutHistory::with_capacity(layout.clone(), options.history_capacity),
            layout,
            interaction: Interaction::new(options.interaction),
            scheduler: RenderScheduler::new(options.scheduler),
            autosave: None,
            dangling: HashSet::new(),
            gesture_items: Vec::new(),
            options,
            on_change: None,
            on_warning: None,
        };
        engine.revalidate();
        engine
    }

    /// Receive every committed layout.
    pub fn set_on_layout_change(&mut self, callback: impl FnMut(&LayoutConfig) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Receive every surfaced warning.
    pub fn set_on_warning(&mut self, callback: impl FnMut(&EngineWarning) + 'static) {
        self.on_warning = Some(Box::new(callback));
    }

    /// Attach persistent storage: load the stored layout (falling back to
    /// the current one on corruption) and enable debounced auto-save.
    pub fn attach_storage(&mut self, backend: Box<dyn StorageBackend>) {
        let (loaded, warning) = load_or_default(backend.as_ref(), &self.layout);
        if let Some(warning) = warning {
            self.emit_warning(warning);
        }
        self.autosave = Some(AutoSave::with_debounce(
            backend,
            self.options.autosave_debounce,
        ));
        self.layout = loaded;
        self.history.reset(self.layout.clone());
        self.grid_cfg = self.layout.grid_at(self.grid_model.active());
        self.revalidate();
    }

    // --- Accessors -------------------------------------------------------

    #[must_use]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    #[must_use]
    pub fn active_breakpoint(&self) -> Breakpoint {
        self.grid_model.active()
    }

    #[must_use]
    pub fn grid_config(&self) -> &GridConfig {
        &self.grid_cfg
    }

    #[must_use]
    pub fn interaction_state(&self) -> &InteractionState {
        self.interaction.state()
    }

    /// Items currently excluded for referencing unregistered widgets.
    #[must_use]
    pub fn dangling_items(&self) -> &HashSet<ItemId> {
        &self.dangling
    }

    /// Items participating in placement and rendering at the active
    /// breakpoint.
    pub fn active_items(&self) -> impl Iterator<Item = &LayoutItem> {
        let bp = self.active_breakpoint();
        self.layout
            .items
            .iter()
            .filter(move |item| !self.dangling.contains(&item.id) && item.participates_at(bp))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Registration ----------------------------------------------------

    /// Register a widget. Dangling items referencing it come back to life.
    pub fn register_widget(&mut self, widget: Widget) {
        self.registry.register(widget);
        self.revalidate();
    }

    /// Unregister a widget and remove its items from the layout.
    ///
    /// Removal of placed items is a committed mutation.
    pub fn unregister_widget(&mut self, id: &WidgetId) -> Option<Widget> {
        let widget = self.registry.unregister(id)?;
        self.scheduler.forget(id);
        if self.layout.remove_widget_items(id) > 0 {
            self.commit();
        }
        self.revalidate();
        Some(widget)
    }

    /// Toggle a capability flag on a registered widget.
    pub fn set_widget_capability(&mut self, id: &WidgetId, flag: Capabilities, on: bool) -> bool {
        match self.registry.get_mut(id) {
            Some(widget) => {
                widget.set_capability(flag, on);
                true
            }
            None => false,
        }
    }

    // --- Layout membership -----------------------------------------------

    /// Place a registered widget into the layout at the first free slot.
    ///
    /// A committed mutation. Returns the new item id, or `None` when the
    /// widget is unknown or the layout is locked.
    pub fn add_widget(&mut self, widget_id: &WidgetId) -> Option<ItemId> {
        if self.layout.locked {
            return None;
        }
        let bp = self.active_breakpoint();
        let size = self.registry.get(widget_id)?.default_size_at(bp);
        let participating = self.participating_items();
        let pos = first_free_position(size, &participating, &self.grid_cfg, bp, None);

        let id = self.fresh_item_id(widget_id);
        let item = LayoutItem::new(
            id.clone(),
            widget_id.clone(),
            CellRect::from_parts(pos, size),
        );
        self.layout.push_item(item);
        info!(widget = %widget_id, item = %id, "widget added to layout");
        self.commit();
        Some(id)
    }

    /// Remove an item from the layout.
    ///
    /// A committed mutation. Respects the widget's removable capability
    /// and the layout lock.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        if self.layout.locked {
            return false;
        }
        let Some(item) = self.layout.item(id) else {
            return false;
        };
        if let Some(widget) = self.registry.get(&item.widget_id)
            && !widget.capabilities().contains(Capabilities::REMOVABLE)
        {
            return false;
        }
        if self.layout.remove_item(id).is_some() {
            self.dangling.remove(id);
            self.commit();
            true
        } else {
            false
        }
    }

    /// Toggle an item's collapsed flag. A committed mutation.
    pub fn set_collapsed(&mut self, id: &ItemId, collapsed: bool) -> bool {
        let Some(item) = self.layout.item_mut(id) else {
            return false;
        };
        if item.collapsed == collapsed {
            return false;
        }
        item.collapsed = collapsed;
        self.commit();
        true
    }

    /// Hide or show an item at one breakpoint. A committed mutation.
    pub fn set_hidden(&mut self, id: &ItemId, bp: Breakpoint, hidden: bool) -> bool {
        let Some(item) = self.layout.item_mut(id) else {
            return false;
        };
        if item.hidden_at(bp) == hidden {
            return false;
        }
        item.hidden.set(bp, hidden);
        self.commit();
        true
    }

    /// Lock or unlock the whole layout. A committed mutation; a locked
    /// layout rejects gestures and membership changes.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        if self.layout.locked == locked {
            return false;
        }
        self.layout.locked = locked;
        self.commit();
        true
    }

    // --- Container measurement -------------------------------------------

    /// Feed one container-width measurement from the host's resize
    /// observer. Recomputes the active grid; returns the new breakpoint
    /// when a threshold was crossed.
    pub fn measure(&mut self, input: ResizeInput) -> Option<Breakpoint> {
        let crossed = self.grid_model.measure(input.width_px);
        let bp = self.grid_model.active();
        let template = self.layout.grid_at(bp);
        self.grid_cfg = self.grid_model.recompute(&template);
        self.layout.grid.set(bp, self.grid_cfg);
        crossed
    }

    // --- Pointer input ----------------------------------------------------

    /// Feed one pointer event.
    ///
    /// Pointer down over a movable item starts a drag; moves update the
    /// active gesture; up commits it (no-op gestures are not recorded);
    /// cancel reverts it. Resize gestures start through
    /// [`begin_resize`](Self::begin_resize) since the host owns the grips.
    pub fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                if button == PointerButton::Primary {
                    self.pointer_down(position);
                }
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Cancel => self.cancel_gesture(),
        }
    }

    /// Start a resize gesture on an item's grip.
    pub fn begin_resize(&mut self, id: &ItemId, edge: ResizeEdge, position: PxPoint) -> bool {
        if self.dangling.contains(id) {
            return false;
        }
        let bp = self.active_breakpoint();
        let Some(item) = self.layout.item(id) else {
            return false;
        };
        let Some(widget) = self.registry.get(&item.widget_id) else {
            return false;
        };
        let started =
            self.interaction
                .begin_resize(item, widget, self.layout.locked, edge, position, bp);
        if started {
            self.gesture_items = self.participating_items();
        }
        started
    }

    /// Start a drag gesture on an item directly (bypassing hit testing).
    pub fn begin_drag(&mut self, id: &ItemId, position: PxPoint) -> bool {
        if self.dangling.contains(id) {
            return false;
        }
        let bp = self.active_breakpoint();
        let Some(item) = self.layout.item(id) else {
            return false;
        };
        let Some(widget) = self.registry.get(&item.widget_id) else {
            return false;
        };
        let started = self.interaction.begin_drag(
            item,
            widget,
            self.layout.locked,
            position,
            &self.grid_cfg,
            bp,
        );
        if started {
            self.gesture_items = self.participating_items();
        }
        started
    }

    fn pointer_down(&mut self, position: PxPoint) {
        let Some(id) = self.hit_test(position) else {
            return;
        };
        self.begin_drag(&id, position);
    }

    fn pointer_move(&mut self, position: PxPoint) {
        let bp = self.grid_model.active();
        let enforce = self.options.enforce_collisions;
        let dragging = matches!(self.interaction.state(), InteractionState::Dragging { .. });
        let resizing = matches!(self.interaction.state(), InteractionState::Resizing { .. });
        let accepted = if dragging {
            self.interaction
                .update_drag(position, &self.gesture_items, &self.grid_cfg, bp, enforce)
        } else if resizing {
            self.interaction
                .update_resize(position, &self.gesture_items, &self.grid_cfg, bp, enforce)
        } else {
            None
        };

        if let (Some(rect), Some(id)) = (accepted, self.interaction.active_item().cloned())
            && let Some(item) = self.layout.item_mut(&id)
        {
            item.set_rect_at(bp, rect);
        }
    }

    fn pointer_up(&mut self) {
        let bp = self.grid_model.active();
        self.gesture_items.clear();
        let Some(end) = self.interaction.finish() else {
            return;
        };
        if !end.changed {
            return;
        }
        if let Some(item) = self.layout.item_mut(&end.item) {
            item.set_rect_at(bp, end.rect);
        }
        self.commit();
    }

    /// Cancel any in-progress gesture and restore the pre-gesture
    /// placement. No history entry is created.
    pub fn cancel_gesture(&mut self) {
        let bp = self.grid_model.active();
        self.gesture_items.clear();
        if let Some(end) = self.interaction.cancel()
            && end.changed
            && let Some(item) = self.layout.item_mut(&end.item)
        {
            item.set_rect_at(bp, end.origin);
        }
    }

    // --- Algorithms -------------------------------------------------------

    /// Re-place the current widget set with a placement strategy and
    /// replace the layout atomically. A committed mutation.
    pub fn apply_algorithm(&mut self, algorithm: Algorithm) -> bool {
        if self.layout.locked {
            return false;
        }
        let bp = self.active_breakpoint();
        let container = CellSize::new(self.grid_cfg.cols, self.grid_cfg.rows);

        let mut specs = Vec::new();
        for item in &self.layout.items {
            if self.dangling.contains(&item.id) {
                continue;
            }
            let Some(widget) = self.registry.get(&item.widget_id) else {
                continue;
            };
            let mut spec = PlacementSpec::from_widget(widget, bp);
            if let Some(rect) = item.rect_at(bp) {
                spec = spec.with_seed(rect.position());
            }
            specs.push((item.id.clone(), spec));
        }
        if specs.is_empty() {
            return false;
        }

        let flat: Vec<PlacementSpec> = specs.iter().map(|(_, s)| s.clone()).collect();
        let outcome = algorithm.apply(&flat, container, self.options.algorithm_spacing);

        for (item_id, spec) in &specs {
            let Some(mut rect) = outcome.rect_for(&spec.widget) else {
                continue;
            };
            // Partition strategies may hand out sizes outside the widget's
            // bounds; clamp before materializing.
            if let Some(widget) = self.registry.get(&spec.widget) {
                let clamped = widget.constraints_at(bp).clamp(rect.size());
                rect = CellRect::new(rect.x, rect.y, clamped.w, clamped.h);
            }
            if let Some(item) = self.layout.item_mut(item_id) {
                item.set_rect_at(bp, rect);
            }
        }
        for widget in outcome.overflowed {
            self.emit_warning(EngineWarning::AlgorithmOverflow { widget });
        }

        info!(algorithm = algorithm.name(), "algorithm applied");
        self.commit();
        true
    }

    // --- History ----------------------------------------------------------

    /// Step the layout back one snapshot. A committed mutation when it
    /// moves.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.layout = snapshot.clone();
        self.after_history_move();
        true
    }

    /// Step the layout forward one snapshot.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.layout = snapshot.clone();
        self.after_history_move();
        true
    }

    /// Replace the layout and clear history down to it.
    pub fn reset(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.history.reset(self.layout.clone());
        self.grid_cfg = self.layout.grid_at(self.grid_model.active());
        self.revalidate();
        self.schedule_autosave();
        self.fire_change();
    }

    // --- Scheduling --------------------------------------------------------

    /// Update the host viewport for visibility tracking.
    pub fn set_viewport(&mut self, viewport: PxRect) {
        self.scheduler.set_viewport(viewport);
    }

    /// Recompute the render queue for the current layout.
    pub fn render_queue(&mut self) -> Vec<RenderEntry> {
        let bp = self.grid_model.active();
        self.scheduler
            .refresh(&self.layout, &self.registry, &self.grid_cfg, bp)
    }

    /// Record a render-duration sample for a widget.
    pub fn record_render_sample(&mut self, widget: &WidgetId, duration: std::time::Duration) {
        self.scheduler.record_render_sample(widget, duration);
    }

    /// Whether a widget's renders exceed the frame budget on average.
    #[must_use]
    pub fn is_widget_slow(&self, widget: &WidgetId) -> bool {
        self.scheduler.is_slow(widget)
    }

    // --- Persistence --------------------------------------------------------

    /// Drive the auto-saver from the host loop. Write errors are logged
    /// and retried on the next tick; they never reach the host as
    /// failures.
    pub fn tick(&mut self, now: Instant) {
        if let Some(autosave) = self.autosave.as_mut()
            && let Err(e) = autosave.poll_at(now)
        {
            warn!(%e, "auto-save failed, keeping snapshot pending");
        }
    }

    /// Flush any pending auto-save immediately.
    pub fn save_now(&mut self) -> quilt_core::error::Result<bool> {
        match self.autosave.as_mut() {
            Some(autosave) => autosave.flush(),
            None => Ok(false),
        }
    }

    // --- Internals ----------------------------------------------------------

    /// Items that participate at the active breakpoint, dangling excluded.
    fn participating_items(&self) -> Vec<LayoutItem> {
        self.active_items().cloned().collect()
    }

    /// Top-most participating item under a pointer position.
    fn hit_test(&self, position: PxPoint) -> Option<ItemId> {
        let bp = self.active_breakpoint();
        self.layout
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                !self.dangling.contains(&item.id) && item.participates_at(bp)
            })
            .filter(|(_, item)| {
                item.rect_at(bp).is_some_and(|rect| {
                    let px = grid::rect_to_px(&self.grid_cfg, rect);
                    position.x >= px.x
                        && position.x < px.right()
                        && position.y >= px.y
                        && position.y < px.bottom()
                })
            })
            .max_by_key(|(index, item)| (item.z_index, *index))
            .map(|(_, item)| item.id.clone())
    }

    /// Allocate an item id that is not yet taken.
    fn fresh_item_id(&self, widget_id: &WidgetId) -> ItemId {
        let base = format!("item-{widget_id}");
        if self.layout.item(&ItemId::new(base.clone())).is_none() {
            return ItemId::new(base);
        }
        let mut n = 2;
        loop {
            let candidate = ItemId::new(format!("{base}-{n}"));
            if self.layout.item(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Recompute the dangling set, surfacing a warning for each newly
    /// dangling item.
    fn revalidate(&mut self) {
        let mut newly = Vec::new();
        let mut dangling = HashSet::new();
        for item in &self.layout.items {
            if !self.registry.contains(&item.widget_id) {
                if !self.dangling.contains(&item.id) {
                    newly.push(EngineWarning::DanglingReference {
                        item: item.id.clone(),
                        widget: item.widget_id.clone(),
                    });
                }
                dangling.insert(item.id.clone());
            }
        }
        self.dangling = dangling;
        for warning in newly {
            self.emit_warning(warning);
        }
    }

    /// Commit the current layout: stamp, snapshot, schedule auto-save,
    /// notify.
    fn commit(&mut self) {
        self.layout.touch(now_millis());
        self.history.commit(self.layout.clone());
        self.schedule_autosave();
        self.fire_change();
    }

    fn after_history_move(&mut self) {
        self.grid_cfg = self.layout.grid_at(self.grid_model.active());
        self.revalidate();
        self.schedule_autosave();
        self.fire_change();
    }

    fn schedule_autosave(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.schedule(&self.layout, Instant::now());
        }
    }

    fn fire_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.layout);
        }
    }

    fn emit_warning(&mut self, warning: EngineWarning) {
        warn!(%warning, "engine warning");
        if let Some(callback) = self.on_warning.as_mut() {
            callback(&warning);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("layout", &self.layout.id)
            .field("items", &self.layout.items.len())
            .field("breakpoint", &self.active_breakpoint())
            .field("history_len", &self.history.len())
            .field("dangling", &self.dangling.len())
            .finish()
    }
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
