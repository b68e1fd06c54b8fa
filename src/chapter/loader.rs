use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::chapter::model::{Chapter, LayerKind, SoundKey};
use crate::foundation::core::Size;
use crate::foundation::error::{PanelflowError, PanelflowResult};

impl Chapter {
    /// Parse a chapter from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PanelflowResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PanelflowError::serde(format!("parse chapter JSON: {e}")))
    }

    /// Parse a chapter from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PanelflowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PanelflowError::validation(format!("open chapter JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// One audio asset that must be resolvable before playback starts.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PreloadEntry {
    /// Key under which the asset is registered with the sound backend.
    pub key: SoundKey,
    /// Layer the key belongs to.
    pub layer: LayerKind,
    /// Source path of the audio file.
    pub src: String,
}

/// Every distinct sound key referenced by any panel, sorted by key.
pub fn preload_manifest(chapter: &Chapter) -> Vec<PreloadEntry> {
    let mut out = BTreeMap::<SoundKey, PreloadEntry>::new();
    for panel in chapter.pages.iter().flat_map(|p| p.panels.iter()) {
        for layer in LayerKind::ALL {
            for ev in panel.events.layer(layer) {
                let key = SoundKey::new(layer, &ev.src);
                out.entry(key.clone()).or_insert_with(|| PreloadEntry {
                    key,
                    layer,
                    src: ev.src.clone(),
                });
            }
        }
    }
    out.into_values().collect()
}

/// Read the pixel dimensions of every page image, resolving `imagePath` against `root`.
#[tracing::instrument(skip(chapter), fields(pages = chapter.pages.len()))]
pub fn probe_page_extents(chapter: &Chapter, root: &Path) -> PanelflowResult<Vec<Size>> {
    chapter
        .pages
        .iter()
        .map(|page| {
            let path = root.join(&page.image_path);
            let (w, h) = image::image_dimensions(&path).map_err(|e| {
                PanelflowError::content(format!(
                    "read page image dimensions '{}': {e}",
                    path.display()
                ))
            })?;
            Ok(Size::new(f64::from(w), f64::from(h)))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/chapter/loader.rs"]
mod tests;
