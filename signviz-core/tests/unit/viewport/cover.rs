use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn portrait_phone_over_landscape_source_fits_by_height() {
    let vp = ViewportSize::new(360.0, 640.0).unwrap();
    let src = PixelSize::new(1920, 1080).unwrap();
    assert!(approx(cover_multiplier(vp, src), 1.6875));

    let m = CoverMapping::new(vp, src);
    let anchor = m.anchor(Vec2::new(50.0, 0.0));
    assert!(approx(anchor.x, 1044.375));
    assert!(approx(anchor.y, 540.0));
}

#[test]
fn wide_viewport_fits_by_width() {
    let vp = ViewportSize::new(1000.0, 200.0).unwrap();
    let src = PixelSize::new(500, 500).unwrap();
    assert!(approx(cover_multiplier(vp, src), 0.5));
}

#[test]
fn equal_aspect_is_plain_width_ratio() {
    for (vw, sw) in [(480.0, 1920u32), (1280.0, 1280), (960.0, 640)] {
        let vp = ViewportSize::new(vw, vw * 9.0 / 16.0).unwrap();
        let src = PixelSize::new(sw, sw * 9 / 16).unwrap();
        assert!(approx(cover_multiplier(vp, src), f64::from(sw) / vw));
    }
}

#[test]
fn viewport_center_maps_to_source_center() {
    let vp = ViewportSize::new(390.0, 844.0).unwrap();
    let src = PixelSize::new(1280, 720).unwrap();
    let m = CoverMapping::new(vp, src);
    assert_eq!(m.screen_to_source(Point::new(195.0, 422.0)), src.center());
}

#[test]
fn visible_rect_crops_overflow_axis_only() {
    let vp = ViewportSize::new(360.0, 640.0).unwrap();
    let src = PixelSize::new(1920, 1080).unwrap();
    let r = CoverMapping::new(vp, src).visible_source_rect();
    assert!(approx(r.height(), 1080.0));
    assert!(approx(r.width(), 607.5));
    assert!(approx(r.center().x, 960.0));
}
