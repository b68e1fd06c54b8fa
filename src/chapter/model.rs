use std::fmt;

use crate::foundation::core::Point;

/// A chapter as delivered by the content layer.
///
/// The model is a pure serde boundary (camelCase JSON). It is assumed schema-valid; geometry is
/// checked once when a [`crate::ChapterLayout`] is built from it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter number as shown to readers.
    #[serde(default)]
    pub number: u32,
    /// Optional chapter title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional cover image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Pages in reading order.
    pub pages: Vec<Page>,
}

impl Chapter {
    /// Number of navigable panels: every page contributes `max(1, panels.len())`.
    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|p| p.panels.len().max(1)).sum()
    }
}

/// One page image and the panels drawn over it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page number as shown to readers.
    #[serde(default)]
    pub page_number: u32,
    /// Image path; also the asset key of the page image.
    pub image_path: String,
    /// Panels in reading order. An empty list makes the whole page a single panel.
    #[serde(default, alias = "overlays", deserialize_with = "null_as_default")]
    pub panels: Vec<Panel>,
}

/// A focusable region of a page.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Closed polygon in page-local coordinates (origin top-left). `None` covers the whole page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<[f64; 2]>>,
    /// Optional precomputed center in page-local coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    /// Sound events played when this panel becomes current.
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: EventSet,
}

impl Panel {
    pub(crate) fn polygon(&self) -> Option<Vec<Point>> {
        self.coordinates
            .as_ref()
            .map(|pts| pts.iter().map(|&[x, y]| Point::new(x, y)).collect())
    }

    pub(crate) fn declared_center(&self) -> Option<Point> {
        self.center.map(|[x, y]| Point::new(x, y))
    }
}

/// Audio layer a sound event belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum LayerKind {
    /// Background music (`bgm`).
    #[serde(rename = "bgm")]
    Background,
    /// Sound effects (`sfx`).
    #[serde(rename = "sfx")]
    Effect,
    /// Speech or narration (`tts`).
    #[serde(rename = "tts")]
    Speech,
}

impl LayerKind {
    /// Layers in application order.
    pub const ALL: [LayerKind; 3] = [Self::Background, Self::Effect, Self::Speech];

    /// Key prefix used for asset keys of this layer.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Background => "bgm",
            Self::Effect => "sfx",
            Self::Speech => "tts",
        }
    }

    pub(crate) fn loops_by_default(self) -> bool {
        matches!(self, Self::Background)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Sound events of a panel, grouped by layer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventSet {
    /// Background music events.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bgm: Vec<SoundEvent>,
    /// Sound effect events.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sfx: Vec<SoundEvent>,
    /// Speech events.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tts: Vec<SoundEvent>,
}

impl EventSet {
    /// Events declared for `layer`.
    pub fn layer(&self, layer: LayerKind) -> &[SoundEvent] {
        match layer {
            LayerKind::Background => &self.bgm,
            LayerKind::Effect => &self.sfx,
            LayerKind::Speech => &self.tts,
        }
    }

    /// `true` when no layer declares any event.
    pub fn is_empty(&self) -> bool {
        LayerKind::ALL.iter().all(|&l| self.layer(l).is_empty())
    }
}

/// One sound cue. Every optional field falls back to a layer default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundEvent {
    /// Audio source path.
    pub src: String,
    /// Target volume in `[0, 1]` (default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Start delay in milliseconds (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Active duration in milliseconds; the sound fades out once it elapses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Loop flag (default: on for background music only).
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looped: Option<bool>,
    /// Restart an effect/speech sound that is already active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<bool>,
    /// Fade-in duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    /// Fade-out duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
}

impl SoundEvent {
    /// Event for `src` with every option left at its layer default.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }
}

/// Identity of a sound within its layer: `{layer prefix}-{src}`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SoundKey(String);

impl SoundKey {
    /// Build the key of `src` on `layer`.
    pub fn new(layer: LayerKind, src: &str) -> Self {
        Self(format!("{}-{src}", layer.prefix()))
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SoundKey {
    type Err = crate::foundation::error::PanelflowError;

    /// Parse `bgm-…`, `sfx-…` or `tts-…`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layer = LayerKind::ALL
            .into_iter()
            .find(|l| {
                s.strip_prefix(l.prefix())
                    .is_some_and(|rest| rest.len() > 1 && rest.starts_with('-'))
            });
        match layer {
            Some(layer) => Ok(Self::new(layer, &s[layer.prefix().len() + 1..])),
            None => Err(crate::foundation::error::PanelflowError::validation(format!(
                "sound key '{s}' must look like bgm-<src>, sfx-<src> or tts-<src>"
            ))),
        }
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize as _;
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "../../tests/unit/chapter/model.rs"]
mod tests;
