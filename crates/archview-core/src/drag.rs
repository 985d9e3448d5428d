use serde::Serialize;

use crate::dataset::NodeSet;
use crate::Position;

/// The in-progress gesture. At most one variant is live at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragSession {
    #[default]
    Inactive,
    PanningCanvas {
        anchor_screen_x: f64,
        anchor_screen_y: f64,
        origin_translate_x: f64,
        origin_translate_y: f64,
    },
    DraggingNode {
        node_id: String,
        anchor_screen_x: f64,
        anchor_screen_y: f64,
        origin_node_x: f64,
        origin_node_y: f64,
    },
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragSession::Inactive)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, DragSession::PanningCanvas { .. })
    }

    /// Id of the node being dragged, if this is a node drag.
    pub fn dragged_node(&self) -> Option<&str> {
        match self {
            DragSession::DraggingNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}

/// Start dragging `node_id`. Unknown ids yield `None`.
pub fn on_node_drag_start(
    node_id: &str,
    screen_x: f64,
    screen_y: f64,
    nodes: &NodeSet,
) -> Option<DragSession> {
    let origin = nodes.position(node_id)?;
    Some(DragSession::DraggingNode {
        node_id: node_id.to_string(),
        anchor_screen_x: screen_x,
        anchor_screen_y: screen_y,
        origin_node_x: origin.x,
        origin_node_y: origin.y,
    })
}

/// New canvas-space position for the dragged node.
///
/// The screen delta is divided by `viewport_scale` because node coordinates live
/// inside the scaled canvas; without it the card would outrun or trail the
/// pointer at any zoom other than 1.
pub fn on_node_drag_move(
    screen_x: f64,
    screen_y: f64,
    session: &DragSession,
    viewport_scale: f64,
) -> Option<(&str, Position)> {
    match session {
        DragSession::DraggingNode {
            node_id,
            anchor_screen_x,
            anchor_screen_y,
            origin_node_x,
            origin_node_y,
        } => Some((
            node_id.as_str(),
            Position {
                x: origin_node_x + (screen_x - anchor_screen_x) / viewport_scale,
                y: origin_node_y + (screen_y - anchor_screen_y) / viewport_scale,
            },
        )),
        _ => None,
    }
}

/// Apply a drag move to the working set. Only the session's node changes.
pub fn apply_node_drag(
    nodes: &mut NodeSet,
    screen_x: f64,
    screen_y: f64,
    session: &DragSession,
    viewport_scale: f64,
) -> bool {
    match on_node_drag_move(screen_x, screen_y, session, viewport_scale) {
        Some((id, position)) => nodes.set_position(id, position),
        None => false,
    }
}
