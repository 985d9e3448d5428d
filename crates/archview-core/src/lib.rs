pub mod canvas;
pub mod dataset;
pub mod drag;
pub mod frame;
pub mod gesture;
pub mod layout;
pub mod viewport;

use serde::{Deserialize, Serialize};

pub use canvas::{reduce, Canvas, CanvasMode, CanvasState};
pub use dataset::{load_dataset, Dataset, DatasetError, NodeSet};
pub use drag::DragSession;
pub use frame::{Frame, Stats};
pub use gesture::{InputEvent, PointerTarget};
pub use layout::{canvas_bounds, route_connections, CanvasBounds, RoutedConnection};
pub use viewport::{ScaleLimits, TransformOrder, Viewport};

// --- Types ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Core,
    Agents,
    Storage,
    Api,
    Ui,
    Integration,
    Security,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Core,
        Category::Agents,
        Category::Storage,
        Category::Api,
        Category::Ui,
        Category::Integration,
        Category::Security,
    ];

    /// Human-readable layer name shown in the legend.
    pub fn label(self) -> &'static str {
        match self {
            Category::Core => "Core Infrastructure",
            Category::Agents => "AI Agents",
            Category::Storage => "Data Storage",
            Category::Api => "API Layer",
            Category::Ui => "User Interface",
            Category::Integration => "Integrations",
            Category::Security => "Security",
        }
    }

    /// Legend swatch colour class.
    pub fn swatch(self) -> &'static str {
        match self {
            Category::Core => "bg-blue-500",
            Category::Agents => "bg-orange-500",
            Category::Storage => "bg-green-500",
            Category::Api => "bg-red-500",
            Category::Ui => "bg-purple-500",
            Category::Integration => "bg-teal-500",
            Category::Security => "bg-slate-500",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A component card on the canvas. `position` is in canvas-space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub position: Position,
    /// Ids this node relates to. Informational only; edges are drawn from `Connection`s.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
}

/// The category legend in display order.
pub fn legend() -> Vec<LegendEntry> {
    Category::ALL
        .iter()
        .map(|&category| LegendEntry {
            category,
            label: category.label(),
            color: category.swatch(),
        })
        .collect()
}
