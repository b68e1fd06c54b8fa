use crate::animation::ease::Ease;
use crate::audio::mixer::{FadeDefaults, FadeSpec};
use crate::camera::drift::DriftOpts;
use crate::foundation::error::{PanelflowError, PanelflowResult};

/// Reader session options. Every field is optional in JSON and defaults to the reader's stock
/// timings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReaderOpts {
    /// Duration of the pan and zoom that frame a panel, in milliseconds.
    pub focus_ms: f64,
    /// Duration of the overlay fade that follows a focus, in milliseconds.
    pub overlay_fade_ms: f64,
    /// Easing of camera pan and zoom.
    pub camera_ease: Ease,
    /// Easing of the overlay fade.
    pub overlay_ease: Ease,
    /// Idle camera drift.
    pub drift: DriftOpts,
    /// Per-layer audio fade defaults.
    pub fades: FadeDefaults,
}

impl Default for ReaderOpts {
    fn default() -> Self {
        Self {
            focus_ms: 250.0,
            overlay_fade_ms: 250.0,
            camera_ease: Ease::OutCubic,
            overlay_ease: Ease::OutCubic,
            drift: DriftOpts::default(),
            fades: FadeDefaults::default(),
        }
    }
}

fn duration(name: &str, ms: f64) -> PanelflowResult<()> {
    if ms.is_finite() && ms >= 0.0 {
        Ok(())
    } else {
        Err(PanelflowError::validation(format!(
            "{name} must be a finite, non-negative duration, got {ms}"
        )))
    }
}

fn fades(name: &str, spec: FadeSpec) -> PanelflowResult<()> {
    duration(&format!("fades.{name}.fade_in"), spec.fade_in)?;
    duration(&format!("fades.{name}.fade_out"), spec.fade_out)
}

impl ReaderOpts {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> PanelflowResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| PanelflowError::serde(format!("parse reader options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject negative or non-finite timings.
    pub fn validate(&self) -> PanelflowResult<()> {
        duration("focus_ms", self.focus_ms)?;
        duration("overlay_fade_ms", self.overlay_fade_ms)?;
        fades("bgm", self.fades.bgm)?;
        fades("sfx", self.fades.sfx)?;
        fades("tts", self.fades.tts)?;
        let d = &self.drift;
        for (name, v) in [
            ("drift.speed", d.speed),
            ("drift.amplitude_x", d.amplitude_x),
            ("drift.amplitude_y", d.amplitude_y),
            ("drift.zoom_amplitude", d.zoom_amplitude),
            ("drift.zoom_phase", d.zoom_phase),
        ] {
            if !v.is_finite() {
                return Err(PanelflowError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/opts.rs"]
mod tests;
