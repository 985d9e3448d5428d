use serde::Serialize;

use crate::canvas::{CanvasMode, CanvasState};
use crate::dataset::Dataset;
use crate::layout::{canvas_bounds, route_connections, CanvasBounds, RoutedConnection};
use crate::viewport::{TransformOrder, Viewport};
use crate::{legend, ArchitectureNode, LegendEntry};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub components: usize,
    pub connections: usize,
    pub scale_percent: i64,
}

/// What the renderer needs for one tick.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub mode: CanvasMode,
    pub viewport: Viewport,
    pub transform: String,
    pub transform_order: TransformOrder,
    /// Eased transitions are only wanted when no pan is tracking the pointer.
    pub animate: bool,
    pub nodes: Vec<ArchitectureNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<CanvasBounds>,
    pub connections: Vec<RoutedConnection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging_node: Option<String>,
    pub panning: bool,
    pub stats: Stats,
    pub legend: Vec<LegendEntry>,
}

impl Frame {
    pub fn build(dataset: &Dataset, state: &CanvasState) -> Self {
        let nodes = state.nodes.as_slice();
        let bounds = canvas_bounds(nodes);
        let connections = bounds
            .map(|b| route_connections(nodes, &dataset.connections, b))
            .unwrap_or_default();
        let order = state.mode.transform_order();

        Frame {
            mode: state.mode,
            viewport: state.viewport,
            transform: state.viewport.css_transform(order),
            transform_order: order,
            animate: !state.session.is_panning(),
            nodes: nodes.to_vec(),
            bounds,
            connections,
            selected: state.selected.clone(),
            dragging_node: state.session.dragged_node().map(str::to_string),
            panning: state.session.is_panning(),
            stats: Stats {
                components: nodes.len(),
                connections: dataset.connections.len(),
                scale_percent: state.viewport.scale_percent(),
            },
            legend: legend(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&ArchitectureNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
