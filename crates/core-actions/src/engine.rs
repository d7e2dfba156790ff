//! Engine facade: one explicit instance instead of ambient globals.
//!
//! The engine owns the navigator, the text value store, the canvas size
//! and the geometry of the last full draw. Pointer hits are resolved
//! against that geometry, so a click between a layout change and the next
//! draw still lands on what the user saw.

use crate::{Action, ActionObserver, DispatchResult, dispatch, hit_test};
use core_assets::IconResolver;
use core_model::{LayoutDocument, LayoutSet};
use core_render::{
    DrawCommand, Frame, FrameStyle, PlacedCell, Point, compose_cells, compose_fields, project,
};
use core_state::{KioskState, StateError, TextValueStore};
use core_text::Measure;
use tracing::{debug, info, warn};

pub struct KioskEngine {
    state: KioskState,
    width: f32,
    height: f32,
    placed: Vec<PlacedCell>,
    observers: Vec<Box<dyn ActionObserver>>,
}

impl std::fmt::Debug for KioskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskEngine")
            .field("layout", &self.state.navigator.current_name())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("placed", &self.placed.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl KioskEngine {
    /// Fails with `EmptyLayoutSet` when `layouts` is empty.
    pub fn new(layouts: LayoutSet, width: f32, height: f32) -> Result<Self, StateError> {
        let state = KioskState::new(layouts)?;
        info!(
            target: "actions.dispatch",
            layouts = state.navigator.len(),
            initial = state.navigator.current_name(),
            width,
            height,
            "engine_ready"
        );
        Ok(Self {
            state,
            width,
            height,
            placed: Vec::new(),
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn ActionObserver>) {
        self.observers.push(observer);
    }

    /// New canvas size. Takes effect on the next `draw`.
    pub fn resize(&mut self, width: f32, height: f32) {
        debug!(target: "actions.dispatch", width, height, "resize");
        self.width = width;
        self.height = height;
    }

    /// Project the current layout, seed unseen text fields from their
    /// labels and compose the full command list.
    pub fn draw<H, M: Measure>(
        &mut self,
        icons: &IconResolver<H>,
        measure: &M,
        style: &FrameStyle,
    ) -> Frame {
        let layout = self.state.navigator.current();
        self.placed = project(layout, self.width, self.height);
        let layout_name = layout.name().to_string();

        for cell in &self.placed {
            if let Some(id) = cell.spec.field_id() {
                self.state.store.ensure_seeded(id, cell.spec.label_text());
            }
        }

        let commands = compose_cells(&self.placed, &self.state.store, icons, measure, style);
        Frame {
            layout: layout_name,
            cells: self.placed.clone(),
            commands,
        }
    }

    /// Text field cells only, from the last drawn geometry. Read-only, so
    /// repeated calls with unchanged state give identical output.
    pub fn redraw_fields<M: Measure>(&self, measure: &M, style: &FrameStyle) -> Vec<DrawCommand> {
        compose_fields(&self.placed, &self.state.store, measure, style)
    }

    /// Hit-test `point` and dispatch the hit button's action.
    ///
    /// Misses, text fields and buttons without an action are clean. An
    /// unknown goto target is logged and reported clean as well.
    pub fn click(&mut self, point: Point) -> DispatchResult {
        let Some(action) = hit_test(point, &self.placed).and_then(|c| c.spec.action.clone())
        else {
            return DispatchResult::clean();
        };
        match self.dispatch(&action) {
            Ok(result) => result,
            Err(err) => {
                warn!(target: "actions.dispatch", %action, %err, "action_failed");
                DispatchResult::clean()
            }
        }
    }

    pub fn dispatch(&mut self, action: &Action) -> Result<DispatchResult, StateError> {
        dispatch(action, &mut self.state, &self.observers)
    }

    pub fn state(&self) -> &KioskState {
        &self.state
    }

    pub fn store(&self) -> &TextValueStore {
        &self.state.store
    }

    pub fn current_layout(&self) -> &LayoutDocument {
        self.state.navigator.current()
    }

    /// Geometry of the last `draw`; empty before the first one.
    pub fn placed(&self) -> &[PlacedCell] {
        &self.placed
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
