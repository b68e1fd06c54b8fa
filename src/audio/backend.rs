use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::chapter::model::SoundKey;
use crate::foundation::error::{PanelflowError, PanelflowResult};

/// Creation options for a sound instance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SoundConfig {
    /// Restart from the beginning when playback reaches the end.
    pub looped: bool,
    /// Initial volume.
    pub volume: f64,
}

/// A live sound instance owned by the audio engine.
pub trait Playable {
    /// Begin playback. Fails when the backend cannot resolve the asset.
    fn play(&mut self) -> PanelflowResult<()>;
    /// Stop playback. Stopping a stopped sound is a no-op.
    fn stop(&mut self);
    /// Set the instance volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f64);
    /// Current instance volume.
    fn volume(&self) -> f64;
}

/// Audio subsystem that turns preloaded asset keys into [`Playable`] instances.
pub trait SoundBackend {
    /// Instance type produced by this backend.
    type Sound: Playable;

    /// Create an instance for `key`. The instance does not play until [`Playable::play`].
    fn create(&mut self, key: &SoundKey, config: SoundConfig) -> PanelflowResult<Self::Sound>;
}

/// Operation recorded by [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BackendOp {
    /// An instance was created.
    Create {
        /// Instance number, unique per backend.
        instance: usize,
        /// Asset key.
        key: SoundKey,
        /// Loop flag.
        looped: bool,
    },
    /// Playback started.
    Play {
        /// Instance number.
        instance: usize,
        /// Asset key.
        key: SoundKey,
    },
    /// Playback was refused because the asset is unknown.
    PlayFailed {
        /// Instance number.
        instance: usize,
        /// Asset key.
        key: SoundKey,
    },
    /// Playback stopped.
    Stop {
        /// Instance number.
        instance: usize,
        /// Asset key.
        key: SoundKey,
        /// Volume at the moment of stopping.
        volume: f64,
    },
}

/// Snapshot of one instance created by a [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InstanceState {
    /// Asset key.
    pub key: SoundKey,
    /// Loop flag given at creation.
    pub looped: bool,
    /// Whether the instance is currently playing.
    pub playing: bool,
    /// Whether [`Playable::stop`] was called after playback started.
    pub stopped: bool,
    /// Current volume.
    pub volume: f64,
}

#[derive(Debug, Default)]
struct MemoryState {
    missing: BTreeSet<SoundKey>,
    instances: Vec<InstanceState>,
    log: Vec<BackendOp>,
}

/// In-memory backend recording every operation; used by the headless CLI and by tests.
///
/// Clones share state, so a caller can keep a handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    /// Backend where every key resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend where `missing` keys fail to play, as an unresolved asset would.
    pub fn with_missing(missing: impl IntoIterator<Item = SoundKey>) -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().missing = missing.into_iter().collect();
        backend
    }

    /// All operations recorded so far.
    pub fn log(&self) -> Vec<BackendOp> {
        self.state.borrow().log.clone()
    }

    /// Drain the operation log.
    pub fn take_log(&self) -> Vec<BackendOp> {
        std::mem::take(&mut self.state.borrow_mut().log)
    }

    /// Every instance ever created, in creation order.
    pub fn instances(&self) -> Vec<InstanceState> {
        self.state.borrow().instances.clone()
    }

    /// Instances of `key` that are currently playing.
    pub fn playing(&self, key: &str) -> Vec<InstanceState> {
        self.state
            .borrow()
            .instances
            .iter()
            .filter(|i| i.playing && i.key.as_str() == key)
            .cloned()
            .collect()
    }
}

impl SoundBackend for MemoryBackend {
    type Sound = MemorySound;

    fn create(&mut self, key: &SoundKey, config: SoundConfig) -> PanelflowResult<MemorySound> {
        let mut st = self.state.borrow_mut();
        let instance = st.instances.len();
        st.instances.push(InstanceState {
            key: key.clone(),
            looped: config.looped,
            playing: false,
            stopped: false,
            volume: config.volume,
        });
        st.log.push(BackendOp::Create {
            instance,
            key: key.clone(),
            looped: config.looped,
        });
        Ok(MemorySound {
            instance,
            state: Rc::clone(&self.state),
        })
    }
}

/// Sound instance handed out by [`MemoryBackend`].
#[derive(Debug)]
pub struct MemorySound {
    instance: usize,
    state: Rc<RefCell<MemoryState>>,
}

impl Playable for MemorySound {
    fn play(&mut self) -> PanelflowResult<()> {
        let mut st = self.state.borrow_mut();
        let key = st.instances[self.instance].key.clone();
        if st.missing.contains(&key) {
            st.log.push(BackendOp::PlayFailed {
                instance: self.instance,
                key: key.clone(),
            });
            return Err(PanelflowError::audio(format!("audio asset '{key}' not found")));
        }
        st.instances[self.instance].playing = true;
        st.log.push(BackendOp::Play {
            instance: self.instance,
            key,
        });
        Ok(())
    }

    fn stop(&mut self) {
        let mut st = self.state.borrow_mut();
        let inst = &mut st.instances[self.instance];
        if !inst.playing {
            return;
        }
        inst.playing = false;
        inst.stopped = true;
        let op = BackendOp::Stop {
            instance: self.instance,
            key: inst.key.clone(),
            volume: inst.volume,
        };
        st.log.push(op);
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().instances[self.instance].volume = volume;
    }

    fn volume(&self) -> f64 {
        self.state.borrow().instances[self.instance].volume
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/backend.rs"]
mod tests;
