//! Geometry for the connection overlay.

use serde::Serialize;

use crate::{ArchitectureNode, Connection};

pub const CARD_WIDTH: f64 = 320.0;
pub const CARD_HEIGHT: f64 = 150.0;
pub const BOUNDS_PADDING: f64 = 500.0;

/// Canvas-space rectangle that the connection overlay covers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CanvasBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A connection whose endpoints both resolved, in overlay-local coordinates.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutedConnection {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub label_x: f64,
    pub label_y: f64,
}

/// Padded bounding box around every card, or `None` for an empty canvas.
pub fn canvas_bounds(nodes: &[ArchitectureNode]) -> Option<CanvasBounds> {
    let first = nodes.first()?.position;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for node in &nodes[1..] {
        let p = node.position;
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let min_x = min_x - BOUNDS_PADDING;
    let max_x = max_x + CARD_WIDTH + BOUNDS_PADDING;
    let min_y = min_y - BOUNDS_PADDING;
    let max_y = max_y + CARD_HEIGHT + BOUNDS_PADDING;

    Some(CanvasBounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Resolve connections against the current node positions. Connections naming
/// an unknown node are dropped.
pub fn route_connections(
    nodes: &[ArchitectureNode],
    connections: &[Connection],
    bounds: CanvasBounds,
) -> Vec<RoutedConnection> {
    let find = |id: &str| nodes.iter().find(|n| n.id == id);

    connections
        .iter()
        .filter_map(|conn| {
            let (Some(from), Some(to)) = (find(conn.from.as_str()), find(conn.to.as_str())) else {
                tracing::debug!(from = %conn.from, to = %conn.to, "skipping dangling connection");
                return None;
            };

            let x1 = from.position.x - bounds.x + CARD_WIDTH / 2.0;
            let y1 = from.position.y - bounds.y + CARD_HEIGHT / 2.0;
            let x2 = to.position.x - bounds.x + CARD_WIDTH / 2.0;
            let y2 = to.position.y - bounds.y + CARD_HEIGHT / 2.0;

            Some(RoutedConnection {
                from: conn.from.clone(),
                to: conn.to.clone(),
                label: conn.label.clone(),
                x1,
                y1,
                x2,
                y2,
                label_x: (x1 + x2) / 2.0,
                label_y: (y1 + y2) / 2.0,
            })
        })
        .collect()
}
