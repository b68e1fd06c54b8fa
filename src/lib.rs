//! Panelflow is a guided, panel-by-panel reader core for paginated comics.
//!
//! The public API is session-oriented:
//!
//! - Load a [`Chapter`] and the pixel extents of its page images
//! - Create a [`Navigator`] over a [`SoundBackend`]
//! - Forward host commands ([`NavCommand`]) and drive everything with [`Navigator::tick`]
//!
//! Each focused panel is framed by an animated pan and zoom, its overlay mask fades out, and the
//! panel's background, effect and speech sounds are cross-faded in. Between navigations the camera
//! drifts slightly on a value-noise path.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod audio;
pub(crate) mod camera;
pub(crate) mod chapter;
pub(crate) mod layout;
pub(crate) mod navigation;

pub use crate::foundation::core::{Point, Rect, Size, Vec2, Viewport};
pub use crate::foundation::error::{PanelflowError, PanelflowResult};

pub use crate::animation::ease::Ease;
pub use crate::audio::backend::{
    BackendOp, InstanceState, MemoryBackend, MemorySound, Playable, SoundBackend, SoundConfig,
};
pub use crate::audio::mixer::{FadeDefaults, FadeSpec, LayerMixer, SoundFault};
pub use crate::camera::camera::{Camera, OverlayMask};
pub use crate::camera::drift::DriftOpts;
pub use crate::camera::framer::fit_zoom;
pub use crate::chapter::loader::{PreloadEntry, preload_manifest, probe_page_extents};
pub use crate::chapter::model::{Chapter, EventSet, LayerKind, Page, Panel, SoundEvent, SoundKey};
pub use crate::layout::chapter_layout::{ChapterLayout, LaidOutPanel};
pub use crate::layout::geometry::{PagePlacement, PanelGeometry, place_pages, resolve};
pub use crate::navigation::controller::Navigator;
pub use crate::navigation::observer::{
    EventLog, NavCommand, NavEvent, NavigationObserver, SubscriptionId,
};
pub use crate::navigation::opts::ReaderOpts;
