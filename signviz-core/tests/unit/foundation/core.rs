use super::*;

#[test]
fn viewport_rejects_degenerate_sizes() {
    assert!(ViewportSize::new(0.0, 10.0).is_err());
    assert!(ViewportSize::new(10.0, -1.0).is_err());
    assert!(ViewportSize::new(f64::NAN, 10.0).is_err());
    assert!(ViewportSize::new(360.0, 640.0).is_ok());
}

#[test]
fn pixel_size_center_and_aspect() {
    let s = PixelSize::new(1920, 1080).unwrap();
    assert_eq!(s.center(), Point::new(960.0, 540.0));
    assert!((s.aspect() - 16.0 / 9.0).abs() < 1e-12);
    assert_eq!(s.rgba8_len().unwrap(), 1920 * 1080 * 4);
    assert!(PixelSize::new(0, 4).is_err());
}

#[test]
fn premul_from_straight_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);
    assert_eq!(c.to_array(), [128, 0, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}

#[test]
fn viewport_deserialization_validates() {
    let v: ViewportSize = serde_json::from_str(r#"{ "width": 360.0, "height": 640.0 }"#).unwrap();
    assert_eq!((v.width(), v.height()), (360.0, 640.0));
    assert_eq!(v, DEFAULT_VIEWPORT);
    assert!(serde_json::from_str::<ViewportSize>(r#"{ "width": 0.0, "height": 0.0 }"#).is_err());
    assert!(serde_json::from_str::<ViewportSize>(r#"{ "width": -1.0, "height": 5.0 }"#).is_err());
}
