//! The interactive canvas: viewport, working node set, drag session and
//! selection, driven by one ordered stream of [`InputEvent`]s.
//!
//! The viewport is written only by wheel, background drags and the reset
//! actions. Node positions are written only by a node drag and by reset
//! layout. Because every pointer-down yields at most one session, the two
//! writers can never run from the same gesture.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, NodeSet};
use crate::drag::{self, DragSession};
use crate::frame::Frame;
use crate::gesture::{route_pointer_down, InputEvent, PointerTarget, Route};
use crate::viewport::{ScaleLimits, TransformOrder, Viewport};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CanvasMode {
    /// Draggable node cards over a pannable, zoomable background.
    #[default]
    Diagram,
    /// A single static image: the whole surface pans, nothing else moves.
    Image,
}

impl CanvasMode {
    pub fn scale_limits(self) -> ScaleLimits {
        match self {
            CanvasMode::Diagram => ScaleLimits::DIAGRAM,
            CanvasMode::Image => ScaleLimits::IMAGE,
        }
    }

    pub fn transform_order(self) -> TransformOrder {
        match self {
            CanvasMode::Diagram => TransformOrder::TranslateThenScale,
            CanvasMode::Image => TransformOrder::ScaleThenTranslate,
        }
    }
}

/// Everything that changes while the user interacts. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub mode: CanvasMode,
    pub viewport: Viewport,
    pub nodes: NodeSet,
    pub session: DragSession,
    pub selected: Option<String>,
}

impl CanvasState {
    pub fn new(mode: CanvasMode, dataset: &Dataset) -> Self {
        Self {
            mode,
            viewport: Viewport::identity(),
            nodes: NodeSet::from_dataset(dataset),
            session: DragSession::Inactive,
            selected: None,
        }
    }

    /// Apply one event in place. Returns whether anything observable changed.
    pub fn apply(&mut self, dataset: &Dataset, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, target } => self.pointer_down(*x, *y, target),
            InputEvent::PointerMove { x, y } => self.pointer_move(*x, *y),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.end_session(),
            InputEvent::Wheel { delta_y } => self.wheel(*delta_y),
            InputEvent::Click { target } => self.click(target),
            InputEvent::ResetView => self.reset_view(),
            InputEvent::ResetLayout => self.reset_layout(dataset),
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64, target: &PointerTarget) -> bool {
        let pan_anywhere = self.mode == CanvasMode::Image;
        let session = match route_pointer_down(target, pan_anywhere) {
            Route::Pan => Some(self.viewport.on_pan_start(x, y)),
            Route::NodeDrag(id) => drag::on_node_drag_start(id, x, y, &self.nodes),
        };
        match session {
            Some(session) => {
                tracing::debug!(?session, "drag session started");
                self.session = session;
                true
            }
            None => {
                tracing::debug!(?target, "pointer-down on unknown node ignored");
                false
            }
        }
    }

    fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        match &self.session {
            DragSession::Inactive => false,
            DragSession::PanningCanvas { .. } => {
                match self.viewport.on_pan_move(x, y, &self.session) {
                    Some(next) => {
                        let changed = next != self.viewport;
                        self.viewport = next;
                        changed
                    }
                    None => false,
                }
            }
            DragSession::DraggingNode { .. } => {
                drag::apply_node_drag(&mut self.nodes, x, y, &self.session, self.viewport.scale)
            }
        }
    }

    fn end_session(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        tracing::debug!(session = ?self.session, "drag session ended");
        self.session = DragSession::Inactive;
        true
    }

    fn wheel(&mut self, delta_y: f64) -> bool {
        let next = self.viewport.on_wheel(delta_y, self.mode.scale_limits());
        let changed = next != self.viewport;
        self.viewport = next;
        changed
    }

    fn click(&mut self, target: &PointerTarget) -> bool {
        let PointerTarget::Node { id } = target else {
            return false;
        };
        if self.session.dragged_node().is_some() || !self.nodes.contains(id) {
            return false;
        }
        if self.selected.as_deref() == Some(id.as_str()) {
            self.selected = None;
        } else {
            self.selected = Some(id.clone());
        }
        true
    }

    fn reset_view(&mut self) -> bool {
        self.end_session();
        self.viewport = Viewport::identity();
        self.selected = None;
        true
    }

    fn reset_layout(&mut self, dataset: &Dataset) -> bool {
        self.reset_view();
        self.nodes.restore(dataset);
        true
    }
}

/// Pure transition: `(state, event) -> state`.
pub fn reduce(dataset: &Dataset, state: &CanvasState, event: &InputEvent) -> CanvasState {
    let mut next = state.clone();
    next.apply(dataset, event);
    next
}

/// A canvas bound to its seed dataset.
#[derive(Debug, Clone)]
pub struct Canvas {
    dataset: Dataset,
    state: CanvasState,
}

impl Canvas {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_mode(dataset, CanvasMode::Diagram)
    }

    /// The single-image viewer: no nodes, wider minimum zoom.
    pub fn image() -> Self {
        Self::with_mode(Dataset::empty(), CanvasMode::Image)
    }

    pub fn with_mode(dataset: Dataset, mode: CanvasMode) -> Self {
        let state = CanvasState::new(mode, &dataset);
        Self { dataset, state }
    }

    pub fn handle(&mut self, event: InputEvent) -> bool {
        self.state.apply(&self.dataset, &event)
    }

    pub fn handle_all<I: IntoIterator<Item = InputEvent>>(&mut self, events: I) {
        for event in events {
            self.handle(event);
        }
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.state.nodes
    }

    pub fn session(&self) -> &DragSession {
        &self.state.session
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    pub fn frame(&self) -> Frame {
        Frame::build(&self.dataset, &self.state)
    }
}
