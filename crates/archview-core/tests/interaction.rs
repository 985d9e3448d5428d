use archview_core::{
    Canvas, Connection, Dataset, DragSession, InputEvent, PointerTarget, Position, ScaleLimits,
    Viewport,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn down(x: f64, y: f64, target: PointerTarget) -> InputEvent {
    InputEvent::PointerDown { x, y, target }
}

fn mv(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove { x, y }
}

fn one_node_at(x: f64, y: f64) -> Dataset {
    Dataset::from_json(&format!(
        r#"{{"nodes": [{{"id": "n", "title": "N", "category": "core", "position": {{"x": {x}, "y": {y}}}}}]}}"#
    ))
    .unwrap()
}

#[test]
fn node_drag_at_unit_scale() {
    let mut canvas = Canvas::new(one_node_at(100.0, 100.0));
    canvas.handle_all([down(50.0, 50.0, PointerTarget::node("n")), mv(150.0, 80.0)]);
    assert_eq!(canvas.nodes().position("n"), Some(Position::new(200.0, 130.0)));
}

#[test]
fn node_drag_at_double_scale() {
    let mut canvas = Canvas::new(one_node_at(100.0, 100.0));
    // 1.1^8 overshoots 2, so walk there and check against the real scale
    while canvas.viewport().scale < 2.0 {
        canvas.handle(InputEvent::Wheel { delta_y: -1.0 });
    }
    let scale = canvas.viewport().scale;
    canvas.handle_all([down(50.0, 50.0, PointerTarget::node("n")), mv(150.0, 80.0)]);
    let pos = canvas.nodes().position("n").unwrap();
    assert!((pos.x - (100.0 + 100.0 / scale)).abs() < 1e-9);
    assert!((pos.y - (100.0 + 30.0 / scale)).abs() < 1e-9);
}

#[test]
fn reset_layout_restores_everything() {
    let dataset = Dataset::builtin();
    let mut canvas = Canvas::new(dataset.clone());
    canvas.handle_all([
        InputEvent::Wheel { delta_y: -1.0 },
        down(0.0, 0.0, PointerTarget::Background),
        mv(80.0, 40.0),
        InputEvent::PointerUp,
        down(10.0, 10.0, PointerTarget::node("supabase")),
        mv(300.0, -50.0),
        InputEvent::PointerUp,
        InputEvent::Click {
            target: PointerTarget::node("tavily"),
        },
        down(10.0, 10.0, PointerTarget::node("security")),
        mv(11.0, 12.0),
        InputEvent::ResetLayout,
    ]);

    assert_eq!(canvas.viewport(), Viewport::identity());
    assert_eq!(canvas.selected(), None);
    assert_eq!(canvas.session(), &DragSession::Inactive);
    for node in &dataset.nodes {
        assert_eq!(canvas.nodes().position(&node.id), Some(node.position));
    }
}

#[test]
fn dangling_connections_are_dropped_from_frame() {
    let mut dataset = Dataset::builtin();
    dataset.connections.push(Connection {
        from: "keywords-ai".into(),
        to: "nowhere".into(),
        label: Some("Lost".into()),
    });
    let frame = Canvas::new(dataset).frame();
    assert_eq!(frame.stats.connections, 10);
    assert_eq!(frame.connections.len(), 9);
    assert!(frame.connections.iter().all(|c| c.to != "nowhere"));
}

#[test]
fn frame_serializes_with_camel_case() {
    let frame = Canvas::new(Dataset::builtin()).frame();
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["stats"]["scalePercent"], 100);
    assert_eq!(json["viewport"]["translateX"], 0.0);
    assert_eq!(json["transformOrder"], "translateThenScale");
    assert!(json.get("selected").is_none());
}

fn arb_target() -> impl Strategy<Value = PointerTarget> {
    prop_oneof![
        Just(PointerTarget::Background),
        Just(PointerTarget::node("keywords-ai")),
        Just(PointerTarget::node("mem0")),
        Just(PointerTarget::node("ghost")),
    ]
}

fn arb_event() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        (-2000.0..2000.0f64, -2000.0..2000.0f64, arb_target())
            .prop_map(|(x, y, target)| InputEvent::PointerDown { x, y, target }),
        (-2000.0..2000.0f64, -2000.0..2000.0f64).prop_map(|(x, y)| InputEvent::PointerMove { x, y }),
        Just(InputEvent::PointerUp),
        Just(InputEvent::PointerLeave),
        (-500.0..500.0f64).prop_map(|delta_y| InputEvent::Wheel { delta_y }),
        arb_target().prop_map(|target| InputEvent::Click { target }),
        Just(InputEvent::ResetView),
    ]
}

proptest! {
    #[test]
    fn prop_scale_stays_in_bounds(deltas in prop::collection::vec(-500.0..500.0f64, 0..200)) {
        let mut canvas = Canvas::new(Dataset::builtin());
        for delta_y in deltas {
            canvas.handle(InputEvent::Wheel { delta_y });
            prop_assert!(ScaleLimits::DIAGRAM.contains(canvas.viewport().scale));
        }
    }

    #[test]
    fn prop_image_scale_stays_in_bounds(deltas in prop::collection::vec(-500.0..500.0f64, 0..200)) {
        let mut canvas = Canvas::image();
        for delta_y in deltas {
            canvas.handle(InputEvent::Wheel { delta_y });
            prop_assert!(ScaleLimits::IMAGE.contains(canvas.viewport().scale));
        }
    }

    #[test]
    fn prop_pan_without_motion_is_identity(
        events in prop::collection::vec(arb_event(), 0..40),
        x in -1000.0..1000.0f64,
        y in -1000.0..1000.0f64,
    ) {
        let mut canvas = Canvas::new(Dataset::builtin());
        canvas.handle_all(events);
        canvas.handle(InputEvent::PointerUp);
        let before = canvas.viewport();
        canvas.handle_all([down(x, y, PointerTarget::Background), mv(x, y)]);
        prop_assert_eq!(canvas.viewport(), before);
    }

    #[test]
    fn prop_one_writer_per_gesture(
        events in prop::collection::vec(arb_event(), 0..60),
    ) {
        let mut canvas = Canvas::new(Dataset::builtin());
        for event in events {
            let viewport = canvas.viewport();
            let nodes = canvas.nodes().clone();
            let is_move = matches!(event, InputEvent::PointerMove { .. });
            let session = canvas.session().clone();
            canvas.handle(event);
            if is_move {
                match session {
                    DragSession::PanningCanvas { .. } => prop_assert_eq!(canvas.nodes(), &nodes),
                    DragSession::DraggingNode { .. } => prop_assert_eq!(canvas.viewport(), viewport),
                    DragSession::Inactive => {
                        prop_assert_eq!(canvas.nodes(), &nodes);
                        prop_assert_eq!(canvas.viewport(), viewport);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_node_pointer_down_never_pans(
        x in -1000.0..1000.0f64,
        y in -1000.0..1000.0f64,
        target in arb_target(),
    ) {
        let mut canvas = Canvas::new(Dataset::builtin());
        canvas.handle(down(x, y, target.clone()));
        match target {
            PointerTarget::Background => prop_assert!(canvas.session().is_panning()),
            PointerTarget::Node { .. } => prop_assert!(!canvas.session().is_panning()),
        }
    }
}
