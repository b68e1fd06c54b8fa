use crate::animation::ease::Ease;
use crate::animation::tween::{JoinBarrier, Tween, TweenStep};
use crate::camera::camera::{Camera, OverlayMask};
use crate::foundation::core::{Point, Rect, Viewport};
use crate::foundation::error::{PanelflowError, PanelflowResult};

/// Zoom at which `bounds` fits entirely inside `viewport` (the smaller of the two axis ratios).
pub fn fit_zoom(viewport: Viewport, bounds: Rect) -> PanelflowResult<f64> {
    let (w, h) = (bounds.width(), bounds.height());
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
        return Err(PanelflowError::content(format!(
            "cannot fit camera to degenerate bounds {w}x{h}"
        )));
    }
    let zoom_x = viewport.width / w;
    let zoom_y = viewport.height / h;
    Ok(zoom_x.min(zoom_y))
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FocusRequest {
    pub(crate) bounds: Rect,
    pub(crate) center: Point,
    pub(crate) animate: bool,
    pub(crate) hide_overlay_after: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CameraFramer {
    pub(crate) focus_ms: f64,
    pub(crate) overlay_fade_ms: f64,
    pub(crate) camera_ease: Ease,
    pub(crate) overlay_ease: Ease,
}

pub(crate) enum FocusOutcome {
    /// The camera already sits on the target.
    Done,
    InFlight(FocusTransition),
}

impl CameraFramer {
    /// Start framing `req`. Non-animated requests complete before returning.
    pub(crate) fn focus(
        &self,
        camera: &mut Camera,
        overlay: &mut OverlayMask,
        req: FocusRequest,
    ) -> PanelflowResult<FocusOutcome> {
        let zoom = fit_zoom(camera.viewport(), req.bounds)?;

        if !req.animate {
            camera.center_on(req.center);
            camera.set_zoom(zoom);
            if req.hide_overlay_after {
                overlay.hide();
            }
            return Ok(FocusOutcome::Done);
        }

        Ok(FocusOutcome::InFlight(FocusTransition {
            phase: Phase::Moving {
                pan: Tween::new(camera.center(), req.center, self.focus_ms, self.camera_ease),
                zoom: Tween::new(camera.zoom(), zoom, self.focus_ms, self.camera_ease),
                join: JoinBarrier::new(2),
            },
            hide_overlay_after: req.hide_overlay_after,
            overlay_fade_ms: self.overlay_fade_ms,
            overlay_ease: self.overlay_ease,
        }))
    }
}

enum Phase {
    Moving {
        pan: Tween<Point>,
        zoom: Tween<f64>,
        join: JoinBarrier,
    },
    FadingOverlay(Tween<f64>),
    Finished,
}

/// An animated focus in progress: pan and zoom joined, then an optional overlay fade.
pub(crate) struct FocusTransition {
    phase: Phase,
    hide_overlay_after: bool,
    overlay_fade_ms: f64,
    overlay_ease: Ease,
}

impl FocusTransition {
    /// Advance by one frame. Returns `true` on the frame the whole transition completes.
    pub(crate) fn advance(
        &mut self,
        camera: &mut Camera,
        overlay: &mut OverlayMask,
        delta_ms: f64,
    ) -> bool {
        match &mut self.phase {
            Phase::Moving { pan, zoom, join } => {
                let mut joined = false;
                match pan.advance(delta_ms) {
                    TweenStep::Running(p) => camera.center_on(p),
                    TweenStep::Completed(p) => {
                        camera.center_on(p);
                        joined |= join.arrive();
                    }
                    TweenStep::Idle => {}
                }
                match zoom.advance(delta_ms) {
                    TweenStep::Running(z) => camera.set_zoom(z),
                    TweenStep::Completed(z) => {
                        camera.set_zoom(z);
                        joined |= join.arrive();
                    }
                    TweenStep::Idle => {}
                }
                if !joined {
                    return false;
                }
                if self.hide_overlay_after && overlay.visible {
                    self.phase = Phase::FadingOverlay(Tween::new(
                        overlay.alpha,
                        0.0,
                        self.overlay_fade_ms,
                        self.overlay_ease,
                    ));
                    false
                } else {
                    self.phase = Phase::Finished;
                    true
                }
            }
            Phase::FadingOverlay(fade) => match fade.advance(delta_ms) {
                TweenStep::Running(a) => {
                    overlay.alpha = a;
                    false
                }
                TweenStep::Completed(_) => {
                    overlay.hide();
                    self.phase = Phase::Finished;
                    true
                }
                TweenStep::Idle => false,
            },
            Phase::Finished => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/framer.rs"]
mod tests;
