use super::*;

#[test]
fn viewport_rejects_empty_and_nan() {
    assert!(Viewport::new(0.0, 10.0).is_err());
    assert!(Viewport::new(10.0, -1.0).is_err());
    assert!(Viewport::new(f64::NAN, 10.0).is_err());
    let vp = Viewport::new(800.0, 600.0).unwrap();
    assert_eq!(vp.half_extent(), Vec2::new(400.0, 300.0));
    assert_eq!(vp.size(), Size::new(800.0, 600.0));
}
