use crate::foundation::error::{PanelflowError, PanelflowResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Camera viewport in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Build a viewport, rejecting empty or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> PanelflowResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(PanelflowError::validation(format!(
                "viewport must have positive finite size, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Viewport dimensions as a [`Size`].
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub(crate) fn half_extent(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

pub(crate) fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
