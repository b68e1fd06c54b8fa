use crate::animation::noise::{DEFAULT_NOISE_SIZE, ValueNoise};
use crate::camera::camera::Camera;
use crate::foundation::core::{Point, Vec2};

/// Idle camera "breathing" applied between navigations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriftOpts {
    /// Turn drift on or off.
    pub enabled: bool,
    /// Phase advanced per elapsed millisecond.
    pub speed: f64,
    /// Peak-to-peak horizontal scroll offset in world units.
    pub amplitude_x: f64,
    /// Peak-to-peak vertical scroll offset in world units.
    pub amplitude_y: f64,
    /// Peak-to-peak zoom oscillation.
    pub zoom_amplitude: f64,
    /// Phase offset of the zoom sample on the horizontal noise track.
    pub zoom_phase: f64,
    /// Seed of both noise tracks.
    pub seed: u64,
}

impl Default for DriftOpts {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.00001,
            amplitude_x: 3.25,
            amplitude_y: 2.5,
            zoom_amplitude: 0.001,
            zoom_phase: 1000.0,
            seed: 0x5eed,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrift {
    base_scroll: Point,
    base_zoom: f64,
    phase: f64,
}

/// Per-frame camera offset built on two value-noise tracks.
///
/// At most one drift runs at a time; `start` replaces the running one.
#[derive(Clone, Debug)]
pub(crate) struct DriftController {
    opts: DriftOpts,
    noise_x: ValueNoise,
    noise_y: ValueNoise,
    active: Option<ActiveDrift>,
}

impl DriftController {
    pub(crate) fn new(opts: DriftOpts) -> Self {
        Self {
            opts,
            noise_x: ValueNoise::new(opts.seed, DEFAULT_NOISE_SIZE),
            noise_y: ValueNoise::new(opts.seed ^ 0xA5A5_A5A5_A5A5_A5A5, DEFAULT_NOISE_SIZE),
            active: None,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub(crate) fn start(&mut self, base_scroll: Point, base_zoom: f64) {
        if !self.opts.enabled {
            self.active = None;
            return;
        }
        self.active = Some(ActiveDrift {
            base_scroll,
            base_zoom,
            phase: 0.0,
        });
    }

    pub(crate) fn stop(&mut self) {
        self.active = None;
    }

    pub(crate) fn update(&mut self, camera: &mut Camera, delta_ms: f64) {
        let Some(drift) = &mut self.active else {
            return;
        };
        drift.phase += delta_ms.max(0.0) * self.opts.speed;
        let t = drift.phase;

        let offset = Vec2::new(
            (self.noise_x.sample(t) - 0.5) * self.opts.amplitude_x,
            (self.noise_y.sample(t) - 0.5) * self.opts.amplitude_y,
        );
        let zoom_osc =
            (self.noise_x.sample(t + self.opts.zoom_phase) - 0.5) * self.opts.zoom_amplitude;

        camera.set_scroll(drift.base_scroll + offset);
        camera.set_zoom(drift.base_zoom + zoom_osc);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/drift.rs"]
mod tests;
