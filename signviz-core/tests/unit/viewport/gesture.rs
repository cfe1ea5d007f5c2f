use super::*;
use crate::state::sign::{MAX_SCALE, MIN_SCALE, SignStateMachine};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn pinch(d: f64) -> Vec<Point> {
    vec![Point::new(0.0, 0.0), Point::new(d, 0.0)]
}

fn drive(machine: &mut SignStateMachine, mapper: &mut ViewportMapper, events: &[GestureEvent]) {
    for e in events {
        if let Some(u) = mapper.handle(e, machine.state()) {
            machine.apply_update(u);
        }
    }
}

#[test]
fn pinch_sequence_matches_expected_scales() {
    let mut m = SignStateMachine::default();
    let mut mapper = ViewportMapper::new();
    drive(
        &mut m,
        &mut mapper,
        &[
            GestureEvent::TouchStart { touches: pinch(100.0) },
            GestureEvent::TouchMove { touches: pinch(150.0) },
        ],
    );
    assert!(approx(m.state().scale, 1.5));

    drive(&mut m, &mut mapper, &[GestureEvent::TouchMove { touches: pinch(30.0) }]);
    assert!(approx(m.state().scale, 0.3));
    assert_eq!(mapper.session().last_distance(), Some(30.0));
}

#[test]
fn pinch_without_start_is_noop() {
    let sign = SignState::default();
    let mut mapper = ViewportMapper::new();
    assert_eq!(mapper.touch_move(&pinch(80.0), &sign), None);
}

#[test]
fn extreme_pinch_stays_in_bounds() {
    let sign = SignState::default();
    let mut mapper = ViewportMapper::new();
    mapper.touch_start(&pinch(1.0));
    let up = mapper.touch_move(&pinch(1e6), &sign).unwrap();
    assert_eq!(up.scale, Some(MAX_SCALE));

    mapper.touch_start(&pinch(1e6));
    let down = mapper.touch_move(&pinch(1e-6), &sign).unwrap();
    assert_eq!(down.scale, Some(MIN_SCALE));
}

#[test]
fn single_touch_pans_one_to_one() {
    let mut m = SignStateMachine::default();
    let mut mapper = ViewportMapper::new();
    drive(
        &mut m,
        &mut mapper,
        &[
            GestureEvent::TouchStart { touches: vec![Point::new(10.0, 10.0)] },
            GestureEvent::TouchMove { touches: vec![Point::new(30.0, 5.0)] },
            GestureEvent::TouchMove { touches: vec![Point::new(31.0, 6.0)] },
            GestureEvent::TouchEnd,
        ],
    );
    assert_eq!(m.state().position, Vec2::new(21.0, -4.0));
    assert!(mapper.session().is_idle());
}

#[test]
fn mouse_drag_requires_primary_button() {
    let mut m = SignStateMachine::default();
    let mut mapper = ViewportMapper::new();
    drive(
        &mut m,
        &mut mapper,
        &[
            GestureEvent::MouseDown { at: Point::new(0.0, 0.0) },
            GestureEvent::MouseMove { at: Point::new(50.0, 50.0), buttons: 0 },
            GestureEvent::MouseMove { at: Point::new(8.0, 2.0), buttons: 1 },
            GestureEvent::MouseUp,
            GestureEvent::MouseMove { at: Point::new(100.0, 100.0), buttons: 1 },
        ],
    );
    assert_eq!(m.state().position, Vec2::new(8.0, 2.0));
}

#[test]
fn wheel_mapping_and_bounds() {
    assert!(approx(wheel_scale(-500.0, 1.0), 1.5));
    assert!(approx(wheel_scale(100.0, 1.0), 0.9));
    assert_eq!(wheel_scale(-1e9, 1.0), MAX_SCALE);
    assert_eq!(wheel_scale(1e9, 1.0), MIN_SCALE);
}

#[test]
fn gesture_script_deserializes() {
    let json = r#"[
        { "type": "touch_start", "touches": [{ "x": 0, "y": 0 }] },
        { "type": "mouse_move", "at": { "x": 1, "y": 2 } },
        { "type": "wheel", "delta_y": -120 },
        { "type": "touch_end" }
    ]"#;
    let events: Vec<GestureEvent> = serde_json::from_str(json).unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[1],
        GestureEvent::MouseMove { at: Point::new(1.0, 2.0), buttons: 0 }
    );
}

#[test]
fn mouse_drag_ignores_chorded_buttons() {
    let mut m = SignStateMachine::default();
    let mut mapper = ViewportMapper::new();
    drive(
        &mut m,
        &mut mapper,
        &[
            GestureEvent::MouseDown { at: Point::new(0.0, 0.0) },
            GestureEvent::MouseMove { at: Point::new(30.0, 30.0), buttons: 3 },
            GestureEvent::MouseMove { at: Point::new(40.0, 40.0), buttons: 2 },
        ],
    );
    assert_eq!(m.state().position, Vec2::ZERO);
}
