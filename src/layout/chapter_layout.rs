use crate::chapter::model::{Chapter, EventSet, Panel};
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{PanelflowError, PanelflowResult};
use crate::layout::geometry::{PagePlacement, PanelGeometry, place_pages, resolve};

/// A panel at its position in the flattened panel index.
#[derive(Clone, Debug, serde::Serialize)]
pub struct LaidOutPanel {
    /// Flattened panel index.
    pub index: usize,
    /// Index of the owning page.
    pub page: usize,
    /// Position within the page's panel list; `None` for the synthetic whole-page panel.
    pub panel_in_page: Option<usize>,
    /// Resolved world geometry.
    pub geometry: PanelGeometry,
    /// Sound events declared by the panel.
    pub events: EventSet,
}

/// Flattened, geometry-resolved panel list of one chapter.
///
/// Built once when assets are ready; never mutated afterwards.
#[derive(Clone, Debug)]
pub struct ChapterLayout {
    pages: Vec<PagePlacement>,
    panels: Vec<LaidOutPanel>,
}

impl ChapterLayout {
    /// Lay out `chapter` using page extents supplied by the asset preloader.
    #[tracing::instrument(skip_all, fields(pages = chapter.pages.len()))]
    pub fn build(chapter: &Chapter, extents: &[Size]) -> PanelflowResult<Self> {
        if chapter.pages.is_empty() {
            return Err(PanelflowError::content("chapter has no pages"));
        }
        if extents.len() != chapter.pages.len() {
            return Err(PanelflowError::validation(format!(
                "expected {} page extents, got {}",
                chapter.pages.len(),
                extents.len()
            )));
        }

        let pages = place_pages(extents)?;
        let whole_page = Panel::default();
        let mut panels = Vec::with_capacity(chapter.panel_count());
        for (page_idx, (page, placement)) in chapter.pages.iter().zip(&pages).enumerate() {
            if page.panels.is_empty() {
                let geometry = resolve(placement, &whole_page)
                    .map_err(|e| e.within(format_args!("page {page_idx}")))?;
                panels.push(LaidOutPanel {
                    index: panels.len(),
                    page: page_idx,
                    panel_in_page: None,
                    geometry,
                    events: EventSet::default(),
                });
                continue;
            }
            for (panel_idx, panel) in page.panels.iter().enumerate() {
                let geometry = resolve(placement, panel)
                    .map_err(|e| e.within(format_args!("page {page_idx} panel {panel_idx}")))?;
                panels.push(LaidOutPanel {
                    index: panels.len(),
                    page: page_idx,
                    panel_in_page: Some(panel_idx),
                    geometry,
                    events: panel.events.clone(),
                });
            }
        }

        tracing::debug!(panels = panels.len(), "chapter laid out");
        Ok(Self { pages, panels })
    }

    /// Number of panels in the flattened index.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// `true` when there is nothing to navigate.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel at flattened `index`.
    pub fn panel(&self, index: usize) -> Option<&LaidOutPanel> {
        self.panels.get(index)
    }

    /// All panels in reading order.
    pub fn panels(&self) -> &[LaidOutPanel] {
        &self.panels
    }

    /// Page placements in reading order.
    pub fn pages(&self) -> &[PagePlacement] {
        &self.pages
    }

    /// Union of all page rectangles.
    pub fn world_bounds(&self) -> Rect {
        self.pages
            .iter()
            .map(PagePlacement::rect)
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/chapter_layout.rs"]
mod tests;
