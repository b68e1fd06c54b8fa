use super::*;

#[test]
fn linear_tween_reports_midpoint_then_completes_once() {
    let mut tw = Tween::new(0.0, 1.0, 500.0, Ease::Linear);
    assert_eq!(tw.advance(250.0), TweenStep::Running(0.5));
    assert_eq!(tw.advance(250.0), TweenStep::Completed(1.0));
    assert_eq!(tw.advance(16.0), TweenStep::Idle);
}

#[test]
fn zero_length_tween_completes_on_first_advance() {
    let mut tw = Tween::new(0.8, 0.0, 0.0, Ease::OutCubic);
    assert_eq!(tw.advance(0.0), TweenStep::Completed(0.0));
}

#[test]
fn point_tween_follows_ease() {
    let mut tw = Tween::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 50.0),
        100.0,
        Ease::OutCubic,
    );
    let TweenStep::Running(p) = tw.advance(50.0) else {
        panic!("tween finished early");
    };
    assert!((p.x - 87.5).abs() < 1e-9);
    assert!((p.y - 43.75).abs() < 1e-9);
}

#[test]
fn barrier_fires_once_after_both_arrivals() {
    let mut join = JoinBarrier::new(2);
    assert!(!join.arrive());
    assert!(join.arrive());
    assert!(!join.arrive());
}
