use std::cell::RefCell;
use std::rc::Rc;

use crate::chapter::model::SoundKey;
use crate::foundation::error::PanelflowError;

/// Receiver of reader notifications. Every method defaults to a no-op.
pub trait NavigationObserver {
    /// The chapter is laid out; `panel_count` panels are navigable.
    fn loaded(&mut self, _panel_count: usize) {}

    /// The reader accepts commands.
    fn ready(&mut self) {}

    /// Panel `index` (0-based) became current.
    fn panel_changed(&mut self, _index: usize) {}

    /// A sound could not be created or played; its key was released.
    fn sound_failed(&mut self, _key: &SoundKey, _error: &PanelflowError) {}
}

/// Handle returned by [`crate::Navigator::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Host command forwarded to [`crate::Navigator::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavCommand {
    /// Go to the first panel.
    First,
    /// Go to the previous panel.
    Previous,
    /// Go to the next panel.
    Next,
    /// Go to the last panel.
    Last,
    /// Re-frame the current panel without touching audio.
    RefocusCurrent,
}

impl std::str::FromStr for NavCommand {
    type Err = PanelflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "prev" | "previous" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            "last" => Ok(Self::Last),
            "refocus" | "refocus_current" => Ok(Self::RefocusCurrent),
            other => Err(PanelflowError::validation(format!(
                "unknown navigation command '{other}'"
            ))),
        }
    }
}

/// A notification as recorded by [`EventLog`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavEvent {
    /// See [`NavigationObserver::loaded`].
    Loaded {
        /// Number of navigable panels.
        panel_count: usize,
    },
    /// See [`NavigationObserver::ready`].
    Ready,
    /// See [`NavigationObserver::panel_changed`].
    PanelChanged {
        /// New current panel.
        index: usize,
    },
    /// See [`NavigationObserver::sound_failed`].
    SoundFailed {
        /// Key of the failed sound.
        key: SoundKey,
        /// Error message.
        error: String,
    },
}

/// Observer that records every notification. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<NavEvent>>>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded notifications, oldest first.
    pub fn events(&self) -> Vec<NavEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded notifications.
    pub fn take(&self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events.borrow_mut())
    }
}

impl NavigationObserver for EventLog {
    fn loaded(&mut self, panel_count: usize) {
        self.events.borrow_mut().push(NavEvent::Loaded { panel_count });
    }

    fn ready(&mut self) {
        self.events.borrow_mut().push(NavEvent::Ready);
    }

    fn panel_changed(&mut self, index: usize) {
        self.events.borrow_mut().push(NavEvent::PanelChanged { index });
    }

    fn sound_failed(&mut self, key: &SoundKey, error: &PanelflowError) {
        self.events.borrow_mut().push(NavEvent::SoundFailed {
            key: key.clone(),
            error: error.to_string(),
        });
    }
}
