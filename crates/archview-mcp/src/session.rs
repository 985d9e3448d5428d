//! One viewer canvas shared by every tool call, plus the analytics side channel.

use std::sync::{Arc, Mutex, MutexGuard};

use archview_analytics::{AnalyticsEvent, AnalyticsSink};
use archview_core::{ArchitectureNode, Canvas, Frame, InputEvent, PointerTarget};

pub struct ViewerSession {
    canvas: Mutex<Canvas>,
    sink: Arc<dyn AnalyticsSink>,
}

impl ViewerSession {
    pub fn new(canvas: Canvas, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            canvas: Mutex::new(canvas),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Canvas> {
        self.canvas.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn frame(&self) -> Frame {
        self.lock().frame()
    }

    pub fn node(&self, id: &str) -> Option<ArchitectureNode> {
        self.lock().nodes().get(id).cloned()
    }

    /// Apply events in order and return the resulting frame.
    pub fn apply<I: IntoIterator<Item = InputEvent>>(&self, events: I) -> Frame {
        let mut canvas = self.lock();
        for event in events {
            let report = interaction_event(&event);
            let changed = canvas.handle(event);
            if let (true, Some(report)) = (changed, report) {
                let report = match canvas.selected() {
                    Some(id) => report.property("selected", id),
                    None => report,
                };
                self.sink.report(report);
            }
        }
        canvas.frame()
    }
}

/// Coarse user actions worth reporting. Pointer motion and zoom are not.
fn interaction_event(event: &InputEvent) -> Option<AnalyticsEvent> {
    let action = match event {
        InputEvent::ResetView => "reset_view",
        InputEvent::ResetLayout => "reset_layout",
        InputEvent::Click {
            target: PointerTarget::Node { .. },
        } => "toggle_selection",
        _ => return None,
    };
    Some(
        AnalyticsEvent::new("diagram_interaction")
            .property("action", action)
            .property("category", "architecture"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use archview_analytics::MemorySink;
    use archview_core::{Dataset, Position};
    use pretty_assertions::assert_eq;

    fn session() -> (ViewerSession, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let session = ViewerSession::new(Canvas::new(Dataset::builtin()), sink.clone());
        (session, sink)
    }

    #[test]
    fn drag_through_session() {
        let (session, _) = session();
        let frame = session.apply([
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                target: PointerTarget::node("tavily"),
            },
            InputEvent::PointerMove { x: 30.0, y: 40.0 },
        ]);
        assert_eq!(frame.dragging_node.as_deref(), Some("tavily"));
        assert_eq!(
            frame.node("tavily").map(|n| n.position),
            Some(Position::new(-270.0, -60.0))
        );
    }

    #[test]
    fn only_effective_actions_are_reported() {
        let (session, sink) = session();
        session.apply([
            InputEvent::Wheel { delta_y: 1.0 },
            InputEvent::Click {
                target: PointerTarget::node("ghost"),
            },
            InputEvent::Click {
                target: PointerTarget::node("mem0"),
            },
            InputEvent::ResetLayout,
        ]);
        let events = sink.events();
        let actions: Vec<_> = events
            .iter()
            .map(|e| e.properties["action"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(actions, vec!["toggle_selection", "reset_layout"]);
        assert_eq!(events[0].properties["selected"], "mem0");
        assert!(events[1].properties.get("selected").is_none());
    }

    #[test]
    fn node_lookup_reflects_moves() {
        let (session, _) = session();
        session.apply([
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                target: PointerTarget::node("mem0"),
            },
            InputEvent::PointerMove { x: 1.0, y: 1.0 },
            InputEvent::PointerUp,
        ]);
        assert_eq!(session.node("mem0").unwrap().position, Position::new(301.0, -99.0));
        assert!(session.node("ghost").is_none());
    }
}
