use super::*;

#[test]
fn empty_object_gives_defaults() {
    let scene = Scene::from_json("{}").unwrap();
    assert_eq!(scene, Scene::default());
    assert_eq!(scene.viewport, DEFAULT_VIEWPORT);
}

#[test]
fn parses_full_scene() {
    let json = r#"{
        "sign": { "id": "shop", "imageSrc": "sign.png", "position": { "x": 50.0, "y": 0.0 } },
        "lighting": "NIGHT",
        "viewport": { "width": 360.0, "height": 640.0 },
        "cameraZoom": 2.5,
        "gestures": [ { "type": "wheel", "delta_y": -500.0 } ]
    }"#;
    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.sign.id, "shop");
    assert_eq!(scene.sign.scale, 1.0);
    assert_eq!(scene.lighting, LightingMode::Night);
    assert_eq!(scene.camera_zoom.level(), 2.5);
    assert_eq!(scene.gestures.len(), 1);
}

#[test]
fn rejects_bad_viewport_and_garbage() {
    let err = Scene::from_json(r#"{ "viewport": { "width": 0.0, "height": 10.0 } }"#).unwrap_err();
    assert!(matches!(err, SignVizError::Validation(_)));
    assert!(Scene::from_json("not json").is_err());
    assert!(Scene::from_json(r#"{ "compositor": { "night_overlay_opacity": 2.0 } }"#).is_err());
}

#[test]
fn out_of_range_camera_zoom_is_clamped() {
    let scene =
        Scene::from_json(r#"{ "sign": { "id": "a", "imageSrc": "x.png" }, "cameraZoom": 100 }"#)
            .unwrap();
    assert_eq!(scene.camera_zoom.level(), 5.0);
}
