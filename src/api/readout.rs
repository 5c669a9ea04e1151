use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{PlotArea, Point, ResolvedRow, Table};
use crate::error::{ChartError, ChartResult};

use super::layout_helpers::format_value_label;

/// Hovered value of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReadout {
    pub key: String,
    pub value: f64,
    /// `value` formatted with the configured decimals.
    pub label: String,
    /// Highlight position in viewport pixels.
    pub x: f64,
    pub y: f64,
}

/// Everything a host needs to show the hovered row outside the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorReadout {
    /// Raw index text, e.g. `2020-01-15`.
    pub index_label: String,
    pub index_value: f64,
    pub position: usize,
    pub series: Vec<SeriesReadout>,
}

impl CursorReadout {
    /// `highlights` are plot-local, as returned by `highlight_points`.
    pub(super) fn from_resolved(
        table: &Table,
        resolved: &ResolvedRow<'_>,
        highlights: &IndexMap<String, Point>,
        plot: PlotArea,
        decimals: usize,
    ) -> ChartResult<Self> {
        let series = table
            .series_columns()
            .iter()
            .zip(resolved.row.values())
            .map(|(column, field)| -> ChartResult<SeriesReadout> {
                let local = highlights
                    .get(&column.key)
                    .ok_or_else(|| ChartError::UnknownSeries(column.key.clone()))?;
                let point = plot.to_viewport(*local);
                Ok(SeriesReadout {
                    key: column.key.clone(),
                    value: field.value(),
                    label: format_value_label(field.value(), decimals),
                    x: point.x,
                    y: point.y,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        Ok(Self {
            index_label: resolved.row.index().raw().to_owned(),
            index_value: resolved.row.index().value(),
            position: resolved.position,
            series,
        })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize cursor readout: {e}"))
        })
    }
}
