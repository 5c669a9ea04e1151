use serde::{Deserialize, Serialize};

use crate::core::{PlotArea, Point, is_inside_bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrosshairMode {
    /// Vertical cursor line snaps to the resolved row.
    #[default]
    Magnet,
    /// Vertical cursor line follows the raw pointer x.
    Normal,
    /// Cursor overlay stays hidden; hover labels are still resolved.
    Hidden,
}

/// Pointer position inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Plot-local pixels.
    pub local: Point,
    /// Fraction of the plot size, both axes in `[0, 1]`.
    pub normalized: Point,
}

impl Cursor {
    /// Returns `None` when `pointer` (viewport pixels) is outside `plot`.
    #[must_use]
    pub fn from_pointer(pointer: Point, plot: PlotArea) -> Option<Self> {
        if !is_inside_bounds(pointer, plot.origin, plot.size()) {
            return None;
        }

        let local = plot.to_local(pointer);
        Some(Self {
            local,
            normalized: Point::new(local.x / plot.width, local.y / plot.height),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    crosshair_mode: CrosshairMode,
    cursor: Option<Cursor>,
}

impl InteractionState {
    #[must_use]
    pub fn crosshair_mode(self) -> CrosshairMode {
        self.crosshair_mode
    }

    pub fn set_crosshair_mode(&mut self, mode: CrosshairMode) {
        self.crosshair_mode = mode;
    }

    #[must_use]
    pub fn cursor(self) -> Option<Cursor> {
        self.cursor
    }

    /// Updates the cursor from a viewport pointer position.
    ///
    /// Returns `true` when the cursor changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, plot: PlotArea) -> bool {
        let next = if x.is_finite() && y.is_finite() {
            Cursor::from_pointer(Point::new(x, y), plot)
        } else {
            None
        };
        let changed = next != self.cursor;
        self.cursor = next;
        changed
    }

    /// Returns `true` when a cursor was present.
    pub fn on_pointer_leave(&mut self) -> bool {
        self.cursor.take().is_some()
    }

    /// Re-derives the cursor after the plot area changed size.
    pub fn on_plot_resized(&mut self, plot: PlotArea) {
        if let Some(cursor) = self.cursor {
            let local = Point::new(
                cursor.normalized.x * plot.width,
                cursor.normalized.y * plot.height,
            );
            self.cursor = Cursor::from_pointer(plot.to_viewport(local), plot);
        }
    }
}
