use super::*;

fn cam() -> Camera {
    Camera::new(Viewport::new(800.0, 600.0).unwrap())
}

#[test]
fn center_on_moves_scroll_by_half_viewport() {
    let mut c = cam();
    c.center_on(Point::new(1000.0, 500.0));
    assert_eq!(c.scroll(), Point::new(600.0, 200.0));
    assert_eq!(c.center(), Point::new(1000.0, 500.0));
}

#[test]
fn visible_rect_shrinks_with_zoom() {
    let mut c = cam();
    c.center_on(Point::new(0.0, 0.0));
    c.set_zoom(2.0);
    assert_eq!(
        c.visible_world_rect(),
        Rect::new(-200.0, -150.0, 200.0, 150.0)
    );
}

#[test]
fn resize_keeps_center() {
    let mut c = cam();
    c.center_on(Point::new(50.0, 60.0));
    c.set_viewport(Viewport::new(1920.0, 1080.0).unwrap());
    assert_eq!(c.center(), Point::new(50.0, 60.0));
}
