//! Input vocabulary and pointer-down disambiguation.

use serde::{Deserialize, Serialize};

/// What a pointer-down struck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerTarget {
    /// The canvas background itself.
    Background,
    /// A node card.
    Node { id: String },
}

impl PointerTarget {
    pub fn node(id: impl Into<String>) -> Self {
        PointerTarget::Node { id: id.into() }
    }
}

/// One input from the host, in delivery order. Coordinates are screen-space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, target: PointerTarget },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Pointer left the interactive surface; ends any drag like a pointer-up.
    PointerLeave,
    Wheel {
        #[serde(rename = "deltaY")]
        delta_y: f64,
    },
    Click { target: PointerTarget },
    ResetView,
    ResetLayout,
}

/// Which controller a pointer-down belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Pan,
    NodeDrag(&'a str),
}

/// Route a pointer-down. When `pan_anywhere` is set (image variant) every
/// target pans; otherwise a node target never reaches the pan controller.
pub fn route_pointer_down(target: &PointerTarget, pan_anywhere: bool) -> Route<'_> {
    match target {
        _ if pan_anywhere => Route::Pan,
        PointerTarget::Background => Route::Pan,
        PointerTarget::Node { id } => Route::NodeDrag(id),
    }
}
