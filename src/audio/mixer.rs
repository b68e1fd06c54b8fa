use std::collections::{BTreeMap, HashMap};

use crate::animation::ease::Ease;
use crate::animation::tween::{Tween, TweenStep};
use crate::audio::backend::{Playable, SoundBackend, SoundConfig};
use crate::audio::timers::{TimerId, TimerPool};
use crate::chapter::model::{EventSet, LayerKind, SoundEvent, SoundKey};
use crate::foundation::error::PanelflowError;

/// Fade-in and fade-out durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FadeSpec {
    /// Fade-in duration.
    pub fade_in: f64,
    /// Fade-out duration.
    pub fade_out: f64,
}

impl FadeSpec {
    /// Symmetric fade of `ms` in both directions.
    pub const fn both(ms: f64) -> Self {
        Self {
            fade_in: ms,
            fade_out: ms,
        }
    }
}

/// Per-layer fade defaults, used when an event does not override them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FadeDefaults {
    /// Background music.
    pub bgm: FadeSpec,
    /// Sound effects.
    pub sfx: FadeSpec,
    /// Speech.
    pub tts: FadeSpec,
}

impl Default for FadeDefaults {
    fn default() -> Self {
        Self {
            bgm: FadeSpec::both(500.0),
            sfx: FadeSpec::both(200.0),
            tts: FadeSpec::both(100.0),
        }
    }
}

impl FadeDefaults {
    /// Defaults for `layer`.
    pub fn for_layer(&self, layer: LayerKind) -> FadeSpec {
        match layer {
            LayerKind::Background => self.bgm,
            LayerKind::Effect => self.sfx,
            LayerKind::Speech => self.tts,
        }
    }

    /// Fades of `event` on `layer`, with event overrides winning over the layer default.
    pub fn resolve(&self, layer: LayerKind, event: &SoundEvent) -> FadeSpec {
        let d = self.for_layer(layer);
        FadeSpec {
            fade_in: event.fade_in.unwrap_or(d.fade_in).max(0.0),
            fade_out: event.fade_out.unwrap_or(d.fade_out).max(0.0),
        }
    }
}

/// A sound event with every default filled in.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedCue {
    pub(crate) key: SoundKey,
    pub(crate) volume: f64,
    pub(crate) delay_ms: f64,
    pub(crate) duration_ms: Option<f64>,
    pub(crate) looped: bool,
    pub(crate) restart: bool,
    pub(crate) fades: FadeSpec,
}

impl ResolvedCue {
    pub(crate) fn new(layer: LayerKind, event: &SoundEvent, fades: &FadeDefaults) -> Self {
        Self {
            key: SoundKey::new(layer, &event.src),
            volume: event.volume.unwrap_or(1.0).clamp(0.0, 1.0),
            delay_ms: event.delay.unwrap_or(0.0).max(0.0),
            duration_ms: event.duration.filter(|d| d.is_finite() && *d > 0.0),
            looped: event.looped.unwrap_or(layer.loops_by_default()),
            restart: event.restart.unwrap_or(false),
            fades: fades.resolve(layer, event),
        }
    }
}

/// Playback failure reported for one sound key.
#[derive(Debug)]
pub struct SoundFault {
    /// Key whose instance failed.
    pub key: SoundKey,
    /// Backend error.
    pub error: PanelflowError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct VoiceId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VoiceState {
    Scheduled,
    Playing,
}

struct Voice<S> {
    id: VoiceId,
    sound: S,
    state: VoiceState,
    cue: ResolvedCue,
    fade: Option<Tween<f64>>,
    stop_timer: Option<TimerId>,
}

struct Releasing<S> {
    key: SoundKey,
    sound: S,
    fade: Tween<f64>,
}

#[derive(Clone, Debug)]
enum TimerAction {
    Start { layer: LayerKind, key: SoundKey, voice: VoiceId },
    Stop { layer: LayerKind, key: SoundKey, voice: VoiceId },
}

/// Layered audio engine: background, effect and speech sounds keyed by `{layer}-{src}`.
///
/// Every layer owns a key to instance map; the keys of that map are the layer's active set. One
/// timer pool holds delayed starts and duration stops for all layers and is cleared whenever a
/// panel is applied.
pub struct LayerMixer<B: SoundBackend> {
    backend: B,
    fades: FadeDefaults,
    layers: [BTreeMap<SoundKey, Voice<B::Sound>>; 3],
    releasing: Vec<Releasing<B::Sound>>,
    timers: TimerPool<TimerAction>,
    background_by_panel: HashMap<usize, Vec<SoundEvent>>,
    last_panel: Option<usize>,
    last_background: Vec<SoundEvent>,
    faults: Vec<SoundFault>,
    next_voice: u64,
    alive: bool,
}

fn slot(layer: LayerKind) -> usize {
    match layer {
        LayerKind::Background => 0,
        LayerKind::Effect => 1,
        LayerKind::Speech => 2,
    }
}

impl<B: SoundBackend> LayerMixer<B> {
    /// Engine over `backend` with the given per-layer fade defaults.
    pub fn new(backend: B, fades: FadeDefaults) -> Self {
        Self {
            backend,
            fades,
            layers: Default::default(),
            releasing: Vec::new(),
            timers: TimerPool::default(),
            background_by_panel: HashMap::new(),
            last_panel: None,
            last_background: Vec::new(),
            faults: Vec::new(),
            next_voice: 0,
            alive: true,
        }
    }

    /// The backend this engine drives.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `false` once [`LayerMixer::dispose`] has run.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Active keys of `layer`, sorted.
    pub fn active_keys(&self, layer: LayerKind) -> Vec<SoundKey> {
        self.layers[slot(layer)].keys().cloned().collect()
    }

    /// Whether `key` (for example `"bgm-theme.mp3"`) is in the active set of `layer`.
    pub fn is_active(&self, layer: LayerKind, key: &str) -> bool {
        self.layers[slot(layer)].keys().any(|k| k.as_str() == key)
    }

    /// Number of pending delayed starts and stops.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Released instances still fading out.
    pub fn releasing_count(&self) -> usize {
        self.releasing.len()
    }

    /// Background events recorded for `panel` by an earlier [`LayerMixer::apply_panel`].
    pub fn recorded_background(&self, panel: usize) -> Option<&[SoundEvent]> {
        self.background_by_panel.get(&panel).map(Vec::as_slice)
    }

    /// Drain the playback failures collected since the last call.
    pub fn take_faults(&mut self) -> Vec<SoundFault> {
        std::mem::take(&mut self.faults)
    }

    /// Make `events` the sound state of panel `index`.
    ///
    /// Pending timers are cancelled first. Background music carries over from the previous panel
    /// when moving forward onto a panel that declares none, and is recorded per panel so revisits
    /// replay what was heard there.
    #[tracing::instrument(level = "debug", skip(self, events))]
    pub fn apply_panel(&mut self, index: usize, events: &EventSet) {
        if !self.alive {
            return;
        }
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled pending sound timers");
        }
        for layer in &mut self.layers {
            layer.retain(|_, v| v.state == VoiceState::Playing);
            for v in layer.values_mut() {
                v.stop_timer = None;
            }
        }

        let background = self.effective_background(index, &events.bgm);
        for layer in LayerKind::ALL {
            let declared = match layer {
                LayerKind::Background => background.as_slice(),
                _ => events.layer(layer),
            };
            let mut cues: Vec<ResolvedCue> = Vec::with_capacity(declared.len());
            for ev in declared {
                let cue = ResolvedCue::new(layer, ev, &self.fades);
                if !cues.iter().any(|c| c.key == cue.key) {
                    cues.push(cue);
                }
            }
            self.apply_layer(layer, cues);
        }
    }

    fn effective_background(&mut self, index: usize, declared: &[SoundEvent]) -> Vec<SoundEvent> {
        let forward = self.last_panel.is_none_or(|last| index > last);
        let effective = if !declared.is_empty() {
            declared.to_vec()
        } else if let Some(saved) = self.background_by_panel.get(&index) {
            saved.clone()
        } else if forward {
            self.last_background.clone()
        } else {
            Vec::new()
        };
        self.background_by_panel.insert(index, effective.clone());
        self.last_panel = Some(index);
        self.last_background = effective.clone();
        effective
    }

    fn apply_layer(&mut self, layer: LayerKind, cues: Vec<ResolvedCue>) {
        let stale: Vec<SoundKey> = self.layers[slot(layer)]
            .keys()
            .filter(|k| !cues.iter().any(|c| &c.key == *k))
            .cloned()
            .collect();
        for key in stale {
            self.release(layer, &key);
        }

        for cue in cues {
            if !self.layers[slot(layer)].contains_key(&cue.key) {
                self.create(layer, cue);
                continue;
            }
            if layer == LayerKind::Background {
                if let Some(voice) = self.layers[slot(layer)].get_mut(&cue.key) {
                    if (voice.cue.volume - cue.volume).abs() > f64::EPSILON {
                        let from = voice.sound.volume();
                        voice.fade = Some(Tween::new(
                            from,
                            cue.volume,
                            cue.fades.fade_in,
                            Ease::Linear,
                        ));
                    }
                    voice.cue = cue;
                }
            } else if cue.restart {
                self.release(layer, &cue.key);
                self.create(layer, cue);
            }
        }
    }

    fn create(&mut self, layer: LayerKind, cue: ResolvedCue) {
        let config = SoundConfig {
            looped: cue.looped,
            volume: 0.0,
        };
        let sound = match self.backend.create(&cue.key, config) {
            Ok(s) => s,
            Err(error) => {
                self.fault(cue.key, error);
                return;
            }
        };
        let id = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.timers.schedule(
            cue.delay_ms,
            TimerAction::Start {
                layer,
                key: cue.key.clone(),
                voice: id,
            },
        );
        tracing::debug!(key = %cue.key, delay_ms = cue.delay_ms, "scheduled sound");
        self.layers[slot(layer)].insert(
            cue.key.clone(),
            Voice {
                id,
                sound,
                state: VoiceState::Scheduled,
                cue,
                fade: None,
                stop_timer: None,
            },
        );
    }

    fn release(&mut self, layer: LayerKind, key: &SoundKey) {
        let Some(mut voice) = self.layers[slot(layer)].remove(key) else {
            return;
        };
        if let Some(id) = voice.stop_timer.take() {
            self.timers.cancel(id);
        }
        if voice.state == VoiceState::Scheduled {
            return;
        }
        let fade_out = voice.cue.fades.fade_out;
        if fade_out <= 0.0 {
            voice.sound.stop();
            tracing::debug!(%key, "stopped sound");
            return;
        }
        let from = voice.sound.volume();
        tracing::debug!(%key, fade_out, "releasing sound");
        self.releasing.push(Releasing {
            key: key.clone(),
            sound: voice.sound,
            fade: Tween::new(from, 0.0, fade_out, Ease::Linear),
        });
    }

    fn fault(&mut self, key: SoundKey, error: PanelflowError) {
        tracing::warn!(%key, %error, "sound playback failed");
        self.faults.push(SoundFault { key, error });
    }

    /// Advance volume fades, then fire due timers.
    pub fn tick(&mut self, delta_ms: f64) {
        if !self.alive {
            return;
        }
        for layer in &mut self.layers {
            for voice in layer.values_mut() {
                let Some(fade) = voice.fade.as_mut() else {
                    continue;
                };
                match fade.advance(delta_ms) {
                    TweenStep::Running(v) => voice.sound.set_volume(v),
                    TweenStep::Completed(v) => {
                        voice.sound.set_volume(v);
                        voice.fade = None;
                    }
                    TweenStep::Idle => voice.fade = None,
                }
            }
        }
        self.releasing.retain_mut(|r| match r.fade.advance(delta_ms) {
            TweenStep::Running(v) => {
                r.sound.set_volume(v);
                true
            }
            TweenStep::Completed(_) | TweenStep::Idle => {
                r.sound.set_volume(0.0);
                r.sound.stop();
                tracing::debug!(key = %r.key, "stopped sound");
                false
            }
        });

        self.timers.advance(delta_ms);
        while let Some((_, due_ms, action)) = self.timers.pop_due() {
            match action {
                TimerAction::Start { layer, key, voice } => self.fire_start(layer, key, voice, due_ms),
                TimerAction::Stop { layer, key, voice } => {
                    let current = self.layers[slot(layer)].get_mut(&key);
                    if let Some(v) = current.filter(|v| v.id == voice) {
                        v.stop_timer = None;
                        self.release(layer, &key);
                    }
                }
            }
        }
    }

    fn fire_start(&mut self, layer: LayerKind, key: SoundKey, id: VoiceId, due_ms: f64) {
        let Some(voice) = self.layers[slot(layer)].get_mut(&key) else {
            return;
        };
        if voice.id != id || voice.state != VoiceState::Scheduled {
            return;
        }
        if let Err(error) = voice.sound.play() {
            self.layers[slot(layer)].remove(&key);
            self.fault(key, error);
            return;
        }
        voice.state = VoiceState::Playing;
        let target = voice.cue.volume;
        let fade_in = voice.cue.fades.fade_in;
        if fade_in <= 0.0 {
            voice.sound.set_volume(target);
        } else {
            voice.fade = Some(Tween::new(0.0, target, fade_in, Ease::Linear));
        }
        if let Some(duration) = voice.cue.duration_ms {
            voice.stop_timer = Some(self.timers.schedule_at(
                due_ms + duration,
                TimerAction::Stop {
                    layer,
                    key: key.clone(),
                    voice: id,
                },
            ));
        }
        tracing::debug!(%key, "started sound");
    }

    /// Cancel timers and stop every owned or fading instance. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.timers.cancel_all();
        for layer in &mut self.layers {
            for (_, mut voice) in std::mem::take(layer) {
                voice.sound.stop();
            }
        }
        for mut r in self.releasing.drain(..) {
            r.sound.stop();
        }
        tracing::debug!("audio engine disposed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mixer.rs"]
mod tests;
