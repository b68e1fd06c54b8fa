use crate::audio::backend::SoundBackend;
use crate::audio::mixer::LayerMixer;
use crate::camera::camera::{Camera, OverlayMask};
use crate::camera::drift::DriftController;
use crate::camera::framer::{CameraFramer, FocusOutcome, FocusRequest, FocusTransition};
use crate::chapter::model::Chapter;
use crate::foundation::core::{Size, Viewport};
use crate::foundation::error::PanelflowResult;
use crate::layout::chapter_layout::ChapterLayout;
use crate::navigation::observer::{NavCommand, NavigationObserver, SubscriptionId};
use crate::navigation::opts::ReaderOpts;

enum NavState {
    Idle,
    Focusing {
        target: usize,
        transition: FocusTransition,
        play_audio: bool,
        notify: bool,
    },
}

/// Panel-by-panel reader session.
///
/// Owns the laid-out chapter, the camera, one overlay mask per panel, idle drift and the audio
/// engine. At most one focus is in flight; commands arriving meanwhile are dropped, never queued.
/// All progress happens in [`Navigator::tick`].
pub struct Navigator<B: SoundBackend> {
    layout: ChapterLayout,
    camera: Camera,
    overlays: Vec<OverlayMask>,
    framer: CameraFramer,
    drift: DriftController,
    mixer: LayerMixer<B>,
    observers: Vec<(SubscriptionId, Box<dyn NavigationObserver>)>,
    next_subscription: u64,
    state: NavState,
    current: Option<usize>,
    alive: bool,
}

impl<B: SoundBackend> Navigator<B> {
    /// Lay out `chapter` over the given page extents and build a session on `backend`.
    ///
    /// Fails on invalid options or content that cannot be laid out.
    #[tracing::instrument(skip_all, fields(pages = chapter.pages.len()))]
    pub fn new(
        chapter: &Chapter,
        extents: &[Size],
        viewport: Viewport,
        backend: B,
        opts: ReaderOpts,
    ) -> PanelflowResult<Self> {
        opts.validate()?;
        let layout = ChapterLayout::build(chapter, extents)?;
        Ok(Self {
            overlays: vec![OverlayMask::default(); layout.len()],
            layout,
            camera: Camera::new(viewport),
            framer: CameraFramer {
                focus_ms: opts.focus_ms,
                overlay_fade_ms: opts.overlay_fade_ms,
                camera_ease: opts.camera_ease,
                overlay_ease: opts.overlay_ease,
            },
            drift: DriftController::new(opts.drift),
            mixer: LayerMixer::new(backend, opts.fades),
            observers: Vec::new(),
            next_subscription: 0,
            state: NavState::Idle,
            current: None,
            alive: true,
        })
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl NavigationObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Frame panel 0 silently, leave the current panel unset, then emit `loaded` and `ready`.
    pub fn start(&mut self) {
        if !self.alive {
            return;
        }
        self.begin_focus(0, false, false, false, false);
        self.current = None;
        let count = self.layout.len();
        self.emit(|o| o.loaded(count));
        self.emit(|o| o.ready());
    }

    /// Focus panel `index`. Returns `false` when the request was dropped (out of range, a focus
    /// already in flight, or the reader disposed).
    pub fn goto_panel(
        &mut self,
        index: usize,
        animate: bool,
        hide_overlay_after: bool,
        play_audio: bool,
    ) -> bool {
        self.begin_focus(index, animate, hide_overlay_after, play_audio, true)
    }

    /// Go to panel 0.
    pub fn first(&mut self) -> bool {
        self.goto_panel(0, true, true, true)
    }

    /// Go to the last panel.
    pub fn last(&mut self) -> bool {
        match self.layout.len().checked_sub(1) {
            Some(i) => self.goto_panel(i, true, true, true),
            None => false,
        }
    }

    /// Go one panel back. No-op on the first panel and while no panel is current.
    pub fn previous(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => self.goto_panel(i - 1, true, true, true),
            _ => {
                tracing::trace!(current = ?self.current, "previous dropped");
                false
            }
        }
    }

    /// Go one panel forward; from the unset state this is panel 0. No-op on the last panel.
    pub fn next(&mut self) -> bool {
        let target = self.current.map_or(0, |i| i + 1);
        self.goto_panel(target, true, true, true)
    }

    /// Snap back onto the current panel without animation or audio changes.
    pub fn refocus_current(&mut self) -> bool {
        match self.current {
            Some(i) => self.goto_panel(i, false, false, false),
            None => false,
        }
    }

    /// Change the viewport, then refocus the current panel.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !self.alive {
            return false;
        }
        self.camera.set_viewport(viewport);
        self.refocus_current()
    }

    /// Dispatch a host command.
    pub fn handle(&mut self, command: NavCommand) -> bool {
        match command {
            NavCommand::First => self.first(),
            NavCommand::Previous => self.previous(),
            NavCommand::Next => self.next(),
            NavCommand::Last => self.last(),
            NavCommand::RefocusCurrent => self.refocus_current(),
        }
    }

    /// Advance audio, the in-flight focus, and otherwise idle drift, by `delta_ms`.
    pub fn tick(&mut self, delta_ms: f64) {
        if !self.alive {
            return;
        }
        self.mixer.tick(delta_ms);
        self.report_faults();

        let finished = match &mut self.state {
            NavState::Focusing {
                target, transition, ..
            } => transition.advance(&mut self.camera, &mut self.overlays[*target], delta_ms),
            NavState::Idle => {
                self.drift.update(&mut self.camera, delta_ms);
                false
            }
        };
        if !finished {
            return;
        }
        if let NavState::Focusing {
            target,
            play_audio,
            notify,
            ..
        } = std::mem::replace(&mut self.state, NavState::Idle)
        {
            self.complete(target, play_audio, notify);
        }
    }

    /// Stop drift, drop any in-flight focus and tear down audio. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.drift.stop();
        self.state = NavState::Idle;
        self.mixer.dispose();
        self.observers.clear();
        tracing::debug!("navigator disposed");
    }

    /// Current panel, unset until the first navigation completes.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Whether a focus transition is in flight.
    pub fn is_focusing(&self) -> bool {
        matches!(self.state, NavState::Focusing { .. })
    }

    /// Whether idle drift is moving the camera.
    pub fn is_drifting(&self) -> bool {
        self.drift.is_active()
    }

    /// `false` once [`Navigator::dispose`] has run.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of navigable panels.
    pub fn panel_count(&self) -> usize {
        self.layout.len()
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Overlay mask of panel `index`.
    pub fn overlay(&self, index: usize) -> Option<&OverlayMask> {
        self.overlays.get(index)
    }

    /// The laid-out chapter.
    pub fn layout(&self) -> &ChapterLayout {
        &self.layout
    }

    /// The audio engine.
    pub fn mixer(&self) -> &LayerMixer<B> {
        &self.mixer
    }

    fn begin_focus(
        &mut self,
        index: usize,
        animate: bool,
        hide_overlay_after: bool,
        play_audio: bool,
        notify: bool,
    ) -> bool {
        if !self.alive {
            return false;
        }
        if self.is_focusing() {
            tracing::trace!(index, "navigation dropped: focus in flight");
            return false;
        }
        let Some(panel) = self.layout.panel(index) else {
            tracing::trace!(index, count = self.layout.len(), "navigation dropped: out of range");
            return false;
        };
        let req = FocusRequest {
            bounds: panel.geometry.bounds,
            center: panel.geometry.center,
            animate,
            hide_overlay_after,
        };

        self.drift.stop();
        tracing::debug!(index, animate, hide_overlay_after, play_audio, "focusing panel");
        let outcome = self
            .framer
            .focus(&mut self.camera, &mut self.overlays[index], req);
        match outcome {
            Ok(FocusOutcome::Done) => self.complete(index, play_audio, notify),
            Ok(FocusOutcome::InFlight(transition)) => {
                self.state = NavState::Focusing {
                    target: index,
                    transition,
                    play_audio,
                    notify,
                };
            }
            Err(error) => {
                tracing::warn!(index, %error, "cannot frame panel");
                return false;
            }
        }
        true
    }

    fn complete(&mut self, index: usize, play_audio: bool, notify: bool) {
        if play_audio && let Some(panel) = self.layout.panel(index) {
            self.mixer.apply_panel(index, &panel.events);
            self.report_faults();
        }
        self.current = Some(index);
        if notify {
            self.emit(|o| o.panel_changed(index));
        }
        self.drift.start(self.camera.scroll(), self.camera.zoom());
        tracing::debug!(index, "panel current");
    }

    fn report_faults(&mut self) {
        for fault in self.mixer.take_faults() {
            self.emit(|o| o.sound_failed(&fault.key, &fault.error));
        }
    }

    fn emit(&mut self, mut f: impl FnMut(&mut dyn NavigationObserver)) {
        for (_, observer) in &mut self.observers {
            f(observer.as_mut());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/controller.rs"]
mod tests;
