use super::*;

fn moved_machine() -> SignStateMachine {
    let mut m = SignStateMachine::default();
    m.apply_update(SignUpdate {
        position: Some(Vec2::new(40.0, -12.0)),
        scale: Some(2.5),
        rotation: Some(45.0),
        ..SignUpdate::default()
    });
    m
}

#[test]
fn default_sign_uses_placeholder() {
    let m = SignStateMachine::default();
    assert_eq!(m.state().id, DEFAULT_SIGN_ID);
    assert_eq!(m.state().image_src, DEFAULT_SIGN_SRC);
    assert_eq!(m.state().scale, 1.0);
}

#[test]
fn scale_is_clamped_on_every_path() {
    let mut m = SignStateMachine::default();
    assert_eq!(m.set_scale(1e9).scale, MAX_SCALE);
    assert_eq!(m.set_scale(-3.0).scale, MIN_SCALE);
    assert_eq!(m.nudge_scale(-0.5).scale, MIN_SCALE);
    m.set_scale(4.9);
    assert_eq!(m.nudge_scale(0.5).scale, MAX_SCALE);
    assert_eq!(m.apply_update(SignUpdate::scale(0.0)).scale, MIN_SCALE);
}

#[test]
fn non_finite_fields_are_ignored() {
    let mut m = moved_machine();
    let before = m.state().clone();
    m.apply_update(SignUpdate {
        position: Some(Vec2::new(f64::NAN, 1.0)),
        scale: Some(f64::INFINITY),
        rotation: Some(f64::NAN),
        ..SignUpdate::default()
    });
    assert_eq!(m.state(), &before);
}

#[test]
fn rotation_wraps_into_one_turn() {
    let mut m = SignStateMachine::default();
    assert_eq!(m.set_rotation(370.0).rotation, 10.0);
    assert_eq!(m.set_rotation(-90.0).rotation, 270.0);
    assert_eq!(m.set_rotation(360.0).rotation, 0.0);
    assert_eq!(wrap_rotation(-1e-20), 0.0);
}

#[test]
fn replacing_image_resets_geometry() {
    let mut m = moved_machine();
    let s = m.replace_image("data:image/png;base64,AAAA").clone();
    assert_eq!(s.image_src, "data:image/png;base64,AAAA");
    assert_eq!(s.position, Vec2::ZERO);
    assert_eq!(s.scale, 1.0);
    assert_eq!(s.rotation, 0.0);
    assert_eq!(s.id, DEFAULT_SIGN_ID);
}

#[test]
fn image_change_in_partial_update_is_wholesale() {
    let mut m = moved_machine();
    let s = m.apply_update(SignUpdate {
        image_src: Some("other.png".to_string()),
        scale: Some(3.0),
        ..SignUpdate::default()
    });
    assert_eq!(s.image_src, "other.png");
    assert_eq!(s.scale, 1.0);
    assert_eq!(s.position, Vec2::ZERO);
}

#[test]
fn unchanged_image_src_merges_geometry() {
    let mut m = moved_machine();
    let src = m.state().image_src.clone();
    let s = m.apply_update(SignUpdate {
        image_src: Some(src),
        rotation: Some(90.0),
        ..SignUpdate::default()
    });
    assert_eq!(s.rotation, 90.0);
    assert_eq!(s.scale, 2.5);
}

#[test]
fn translate_accumulates_without_bounds() {
    let mut m = SignStateMachine::default();
    m.translate(Vec2::new(5000.0, 0.0));
    let s = m.translate(Vec2::new(1.0, -2.0));
    assert_eq!(s.position, Vec2::new(5001.0, -2.0));
}

#[test]
fn new_normalizes_deserialized_state() {
    let json = r#"{ "id": "x", "imageSrc": "a.png", "scale": 12, "rotation": -30 }"#;
    let raw: SignState = serde_json::from_str(json).unwrap();
    let m = SignStateMachine::new(raw);
    assert_eq!(m.state().scale, MAX_SCALE);
    assert_eq!(m.state().rotation, 330.0);
    assert_eq!(m.state().position, Vec2::ZERO);
}
