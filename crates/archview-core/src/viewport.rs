//! Viewport transform: uniform scale plus translation over the whole canvas.
//!
//! Wheel input zooms by a fixed 10% step and never moves the translation; the
//! zoom is anchored at the transformed element's centre by the renderer, not at
//! the pointer. Background drags pan 1:1 in screen pixels regardless of scale.

use serde::{Deserialize, Serialize};

use crate::drag::DragSession;

/// Scale factor applied per wheel tick when scrolling down (zoom out).
pub const ZOOM_OUT_STEP: f64 = 0.9;
/// Scale factor applied per wheel tick when scrolling up (zoom in).
pub const ZOOM_IN_STEP: f64 = 1.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl ScaleLimits {
    pub const DIAGRAM: ScaleLimits = ScaleLimits { min: 0.1, max: 3.0 };
    pub const IMAGE: ScaleLimits = ScaleLimits { min: 0.5, max: 3.0 };

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self::DIAGRAM
    }
}

/// Order in which the renderer composes the two transform parts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransformOrder {
    TranslateThenScale,
    ScaleThenTranslate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    pub const fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Zoom one wheel tick. Positive `delta_y` (scroll down) zooms out.
    pub fn on_wheel(&self, delta_y: f64, limits: ScaleLimits) -> Viewport {
        Viewport {
            scale: limits.clamp(self.scale * zoom_factor(delta_y)),
            ..*self
        }
    }

    /// Capture a pan anchor at the pointer and the current translation.
    pub fn on_pan_start(&self, screen_x: f64, screen_y: f64) -> DragSession {
        DragSession::PanningCanvas {
            anchor_screen_x: screen_x,
            anchor_screen_y: screen_y,
            origin_translate_x: self.translate_x,
            origin_translate_y: self.translate_y,
        }
    }

    /// Apply a pan move. Returns `None` unless `session` is a pan.
    pub fn on_pan_move(&self, screen_x: f64, screen_y: f64, session: &DragSession) -> Option<Viewport> {
        match *session {
            DragSession::PanningCanvas {
                anchor_screen_x,
                anchor_screen_y,
                origin_translate_x,
                origin_translate_y,
            } => Some(Viewport {
                translate_x: screen_x - anchor_screen_x + origin_translate_x,
                translate_y: screen_y - anchor_screen_y + origin_translate_y,
                scale: self.scale,
            }),
            _ => None,
        }
    }

    pub fn scale_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// CSS transform string for the given composition order.
    pub fn css_transform(&self, order: TransformOrder) -> String {
        let translate = format!("translate({}px, {}px)", self.translate_x, self.translate_y);
        let scale = format!("scale({})", self.scale);
        match order {
            TransformOrder::TranslateThenScale => format!("{translate} {scale}"),
            TransformOrder::ScaleThenTranslate => format!("{scale} {translate}"),
        }
    }
}

pub fn zoom_factor(delta_y: f64) -> f64 {
    if delta_y > 0.0 {
        ZOOM_OUT_STEP
    } else {
        ZOOM_IN_STEP
    }
}
