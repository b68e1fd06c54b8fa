use crate::foundation::core::{Point, Rect, Viewport};

/// 2D camera over the chapter canvas.
///
/// `scroll` is the world position of the viewport's top-left corner at zoom 1; zoom scales about
/// the viewport center, so the visible midpoint is always `scroll + viewport / 2`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Camera {
    viewport: Viewport,
    scroll: Point,
    zoom: f64,
}

impl Camera {
    /// Camera at the world origin with zoom 1.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll: Point::ZERO,
            zoom: 1.0,
        }
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current scroll position.
    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// World point at the middle of the viewport.
    pub fn center(&self) -> Point {
        self.scroll + self.viewport.half_extent()
    }

    /// World rectangle currently visible through the viewport.
    pub fn visible_world_rect(&self) -> Rect {
        let half = self.viewport.half_extent() / self.zoom;
        let c = self.center();
        Rect::from_points(c - half, c + half)
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        let center = self.center();
        self.viewport = viewport;
        self.center_on(center);
    }

    pub(crate) fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub(crate) fn center_on(&mut self, p: Point) {
        self.scroll = p - self.viewport.half_extent();
    }
}

/// Translucent mask drawn over a panel until the reader has focused it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OverlayMask {
    /// Whether the mask is drawn at all.
    pub visible: bool,
    /// Mask opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Default for OverlayMask {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 0.8,
        }
    }
}

impl OverlayMask {
    pub(crate) fn hide(&mut self) {
        self.alpha = 0.0;
        self.visible = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/camera.rs"]
mod tests;
