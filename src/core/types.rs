use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle of the viewport reserved for series lines.
///
/// `origin` is the top-left corner in viewport pixels. Scales map into the
/// plot-local space `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Insets the viewport by `padding_px` on every side.
    pub fn from_viewport(viewport: Viewport, padding_px: f64) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !padding_px.is_finite() || padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "plot padding must be finite and >= 0".to_owned(),
            ));
        }

        let width = f64::from(viewport.width) - 2.0 * padding_px;
        let height = f64::from(viewport.height) - 2.0 * padding_px;
        if width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            origin: Point::new(padding_px, padding_px),
            width,
            height,
        })
    }

    #[must_use]
    pub fn size(self) -> Point {
        Point::new(self.width, self.height)
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.origin.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.origin.y + self.height
    }

    /// Converts a viewport position to plot-local pixels.
    #[must_use]
    pub fn to_local(self, point: Point) -> Point {
        Point::new(point.x - self.origin.x, point.y - self.origin.y)
    }

    /// Converts a plot-local position back to viewport pixels.
    #[must_use]
    pub fn to_viewport(self, point: Point) -> Point {
        Point::new(point.x + self.origin.x, point.y + self.origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotArea, Point, Viewport};
    use crate::error::ChartError;

    #[test]
    fn plot_area_insets_viewport_by_padding() {
        let plot = PlotArea::from_viewport(Viewport::new(800, 500), 40.0).expect("plot area");
        assert_eq!(plot.origin, Point::new(40.0, 40.0));
        assert_eq!(plot.width, 720.0);
        assert_eq!(plot.height, 420.0);
        assert_eq!(plot.right(), 760.0);
        assert_eq!(plot.bottom(), 460.0);
    }

    #[test]
    fn plot_area_rejects_viewport_smaller_than_padding() {
        let err = PlotArea::from_viewport(Viewport::new(80, 500), 40.0).expect_err("too narrow");
        assert!(matches!(err, ChartError::InvalidViewport { width: 80, .. }));
    }

    #[test]
    fn local_and_viewport_conversions_are_inverse() {
        let plot = PlotArea::from_viewport(Viewport::new(300, 200), 10.0).expect("plot area");
        let local = plot.to_local(Point::new(55.0, 12.5));
        assert_eq!(local, Point::new(45.0, 2.5));
        assert_eq!(plot.to_viewport(local), Point::new(55.0, 12.5));
    }
}
