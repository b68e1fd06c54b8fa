use crate::chapter::model::Panel;
use crate::foundation::core::{Point, Rect, Size, is_finite_point};
use crate::foundation::error::{PanelflowError, PanelflowResult};

/// World-space placement of one page image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PagePlacement {
    /// World position of the page's top-left corner.
    pub origin: Point,
    /// Page image extent.
    pub size: Size,
}

impl PagePlacement {
    /// World rectangle covered by the page.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    fn to_world(&self, p: Point) -> Point {
        p + self.origin.to_vec2()
    }
}

/// Stack pages vertically, each centered horizontally on the widest page.
pub fn place_pages(extents: &[Size]) -> PanelflowResult<Vec<PagePlacement>> {
    for (i, s) in extents.iter().enumerate() {
        if !(s.width.is_finite() && s.height.is_finite()) || s.width <= 0.0 || s.height <= 0.0 {
            return Err(PanelflowError::content(format!(
                "page {i} image has no extent ({}x{})",
                s.width, s.height
            )));
        }
    }

    let max_width = extents.iter().map(|s| s.width).fold(0.0, f64::max);
    let mut y = 0.0;
    Ok(extents
        .iter()
        .map(|&size| {
            let origin = Point::new((max_width - size.width) / 2.0, y);
            y += size.height;
            PagePlacement { origin, size }
        })
        .collect())
}

/// A panel's geometry in world space.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PanelGeometry {
    /// Panel polygon translated into world space.
    pub world_polygon: Vec<Point>,
    /// Axis-aligned bounds of `world_polygon`; always has positive width and height.
    pub bounds: Rect,
    /// Point the camera centers on.
    pub center: Point,
}

/// Resolve a panel's world geometry from its page placement.
///
/// A panel without a polygon covers the whole page. A polygon without a declared center is
/// centered on its bounding box, so a fitted zoom always shows the whole panel.
pub fn resolve(page: &PagePlacement, panel: &Panel) -> PanelflowResult<PanelGeometry> {
    let local = panel.polygon().unwrap_or_else(|| whole_page(page.size));
    if local.len() < 3 {
        return Err(PanelflowError::content(format!(
            "panel polygon needs at least 3 points, got {}",
            local.len()
        )));
    }
    if !local.iter().copied().all(is_finite_point) {
        return Err(PanelflowError::content(
            "panel polygon has non-finite coordinates",
        ));
    }

    let world_polygon: Vec<Point> = local.iter().map(|&p| page.to_world(p)).collect();
    let bounds = bounding_box(&world_polygon);
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(PanelflowError::content(format!(
            "panel bounds are degenerate ({}x{})",
            bounds.width(),
            bounds.height()
        )));
    }

    let center = match panel.declared_center() {
        Some(c) if is_finite_point(c) => page.to_world(c),
        Some(_) => {
            return Err(PanelflowError::content("panel center is non-finite"));
        }
        None => bounds.center(),
    };

    Ok(PanelGeometry {
        world_polygon,
        bounds,
        center,
    })
}

fn whole_page(size: Size) -> Vec<Point> {
    vec![
        Point::ZERO,
        Point::new(size.width, 0.0),
        Point::new(size.width, size.height),
        Point::new(0.0, size.height),
    ]
}

fn bounding_box(points: &[Point]) -> Rect {
    let first = Rect::from_points(points[0], points[0]);
    points[1..].iter().fold(first, |r, &p| r.union_pt(p))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
