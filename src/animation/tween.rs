use crate::animation::ease::Ease;
use crate::foundation::core::Point;

/// Values a [`Tween`] can interpolate.
pub(crate) trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::lerp(self, to, t)
    }
}

/// Outcome of advancing a tween by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TweenStep<T> {
    /// Still running; carries the eased value for this frame.
    Running(T),
    /// Reached 100% progress on this frame. Reported exactly once.
    Completed(T),
    /// Already completed on an earlier frame.
    Idle,
}

/// Time-based interpolation between two values.
///
/// Time only moves through [`Tween::advance`]; a zero-length tween completes on its first advance.
#[derive(Clone, Debug)]
pub(crate) struct Tween<T> {
    from: T,
    to: T,
    duration_ms: f64,
    elapsed_ms: f64,
    ease: Ease,
    done: bool,
}

impl<T: Lerp> Tween<T> {
    pub(crate) fn new(from: T, to: T, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            ease,
            done: false,
        }
    }

    pub(crate) fn advance(&mut self, delta_ms: f64) -> TweenStep<T> {
        if self.done {
            return TweenStep::Idle;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            self.done = true;
            return TweenStep::Completed(self.to);
        }
        let t = self.ease.apply(self.elapsed_ms / self.duration_ms);
        TweenStep::Running(self.from.lerp(self.to, t))
    }
}

/// Completion barrier over a fixed number of contributors.
///
/// [`JoinBarrier::arrive`] returns `true` exactly once: on the arrival that brings the count to
/// zero. Extra arrivals are ignored.
#[derive(Clone, Copy, Debug)]
pub(crate) struct JoinBarrier {
    remaining: u8,
}

impl JoinBarrier {
    pub(crate) fn new(count: u8) -> Self {
        Self { remaining: count }
    }

    pub(crate) fn arrive(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
