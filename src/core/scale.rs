use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Affine mapping from a domain interval to a pixel range.
///
/// A zero-width domain is accepted and yields a degenerate scale: every value
/// maps to the midpoint of the range and `invert` returns the domain start.
/// A zero-width range likewise inverts to the domain start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.domain_start == self.domain_end
    }

    /// Maps a domain value to the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let half_domain = half_span(self.domain_start, self.domain_end);
        if half_domain == 0.0 {
            return self.range_start / 2.0 + self.range_end / 2.0;
        }

        let normalized = (value / 2.0 - self.domain_start / 2.0) / half_domain;
        lerp(
            self.range_start,
            half_span(self.range_start, self.range_end),
            normalized,
        )
    }

    /// Maps a range value back to the domain.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let half_range = half_span(self.range_start, self.range_end);
        if half_range == 0.0 || self.is_degenerate() {
            return self.domain_start;
        }

        let normalized = (pixel / 2.0 - self.range_start / 2.0) / half_range;
        lerp(
            self.domain_start,
            half_span(self.domain_start, self.domain_end),
            normalized,
        )
    }
}

// Spans are halved so that `end - start` stays finite for bounds near
// `f64::MAX` of opposite sign.
fn half_span(start: f64, end: f64) -> f64 {
    end / 2.0 - start / 2.0
}

fn lerp(start: f64, half_span: f64, t: f64) -> f64 {
    let step = t * half_span;
    (start + step) + step
}
