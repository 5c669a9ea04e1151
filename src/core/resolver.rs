//! Chart cursor resolver.
//!
//! Pure functions that turn a pointer position into the table row under it
//! and into per-series highlight coordinates. Nothing here draws or keeps
//! state; the caller owns the cursor and the redraw loop.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, Point, Row, Table};
use crate::error::{ChartError, ChartResult};

/// Series key -> y scale, in series column order.
pub type YScales = IndexMap<String, LinearScale>;

/// How y scales are fitted to the series of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum YScaleMode {
    /// Each series is fitted to its own min/max.
    #[default]
    PerSeries,
    /// All series share one axis fitted to the merged min/max.
    Shared,
}

/// Row located under a pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRow<'a> {
    /// Position of `row` in the table.
    pub position: usize,
    pub row: &'a Row,
    /// Pointer x inverted through the x scale.
    pub domain_x: f64,
}

/// Fits the index extent of `table` onto `[0, range_width]`.
pub fn build_x_scale(table: &Table, range_width: f64) -> ChartResult<LinearScale> {
    validate_extent(range_width, "x range width")?;
    LinearScale::new(table.index_extent(), (0.0, range_width))
}

/// Fits one series onto `[range_height, 0]` so values grow upward.
pub fn build_y_scale(
    table: &Table,
    series_key: &str,
    range_height: f64,
) -> ChartResult<LinearScale> {
    validate_extent(range_height, "y range height")?;
    LinearScale::new(table.series_extent(series_key)?, (range_height, 0.0))
}

/// Fits every series of `table` onto one shared `[range_height, 0]` axis.
pub fn build_shared_y_scale(table: &Table, range_height: f64) -> ChartResult<LinearScale> {
    validate_extent(range_height, "y range height")?;
    LinearScale::new(table.values_extent(), (range_height, 0.0))
}

pub fn build_y_scales(table: &Table, range_height: f64, mode: YScaleMode) -> ChartResult<YScales> {
    match mode {
        YScaleMode::PerSeries => table
            .series_keys()
            .map(|key| -> ChartResult<(String, LinearScale)> {
                Ok((key.to_owned(), build_y_scale(table, key, range_height)?))
            })
            .collect(),
        YScaleMode::Shared => {
            let shared = build_shared_y_scale(table, range_height)?;
            Ok(table
                .series_keys()
                .map(|key| (key.to_owned(), shared))
                .collect())
        }
    }
}

/// Finds the row under `pointer_x` (plot-local pixels).
///
/// The pointer is inverted through `x_scale` and located with lower-bound
/// semantics: the first row whose index is `>= domain_x`, clamped to the
/// last row. A pointer strictly between two rows therefore resolves to the
/// later one.
pub fn resolve_row<'a>(
    table: &'a Table,
    x_scale: LinearScale,
    pointer_x: f64,
) -> ChartResult<ResolvedRow<'a>> {
    if !pointer_x.is_finite() {
        return Err(ChartError::InvalidData(
            "pointer x must be finite".to_owned(),
        ));
    }

    let domain_x = x_scale.invert(pointer_x);
    let index_values = table.index_values();
    let lower_bound = index_values.partition_point(|value| *value < domain_x);
    let position = lower_bound.min(index_values.len() - 1);

    Ok(ResolvedRow {
        position,
        row: &table.rows()[position],
        domain_x,
    })
}

/// Pixel position of every series value of `row`, keyed by series.
pub fn highlight_points(
    table: &Table,
    row: &Row,
    x_scale: LinearScale,
    y_scales: &YScales,
) -> ChartResult<IndexMap<String, Point>> {
    let x = x_scale.map(row.index().value());
    table
        .series_columns()
        .iter()
        .enumerate()
        .map(|(position, column)| -> ChartResult<(String, Point)> {
            let y_scale = y_scales
                .get(&column.key)
                .ok_or_else(|| ChartError::UnknownSeries(column.key.clone()))?;
            let field = row.value(position).ok_or_else(|| {
                ChartError::InvalidData(format!(
                    "row has no value for series `{}`",
                    column.key
                ))
            })?;
            Ok((column.key.clone(), Point::new(x, y_scale.map(field.value()))))
        })
        .collect()
}

/// Whether `pointer` lies in the plot rectangle, edges included.
#[must_use]
pub fn is_inside_bounds(pointer: Point, plot_origin: Point, plot_size: Point) -> bool {
    let in_x = pointer.x >= plot_origin.x && pointer.x <= plot_origin.x + plot_size.x;
    let in_y = pointer.y >= plot_origin.y && pointer.y <= plot_origin.y + plot_size.y;
    in_x && in_y
}

fn validate_extent(value: f64, name: &str) -> ChartResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ChartError::InvalidData(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        YScaleMode, build_shared_y_scale, build_x_scale, build_y_scale, build_y_scales,
        highlight_points, is_inside_bounds, resolve_row,
    };
    use crate::core::{Column, Field, Point, Row, Table};
    use crate::error::ChartError;
    use approx::assert_abs_diff_eq;

    const DAY: f64 = 86_400.0;

    fn three_day_table() -> Table {
        let rows = (1..=3)
            .map(|day| {
                let value = f64::from(day) * 10.0;
                Row::new(
                    Field::new(format!("2020-01-0{day}"), f64::from(day) * DAY),
                    vec![Field::number(value), Field::number(100.0 - value)],
                )
            })
            .collect();
        Table::new(
            Column::date("date"),
            vec![Column::number("aapl"), Column::number("amzn")],
            rows,
        )
        .expect("table")
    }

    #[test]
    fn x_scale_spans_index_extent() {
        let table = three_day_table();
        let scale = build_x_scale(&table, 100.0).expect("x scale");
        assert_eq!(scale.domain(), (DAY, 3.0 * DAY));
        assert_eq!(scale.range(), (0.0, 100.0));
    }

    #[test]
    fn x_scale_rejects_negative_width() {
        let table = three_day_table();
        assert!(build_x_scale(&table, -1.0).is_err());
    }

    #[test]
    fn y_scale_is_inverted() {
        let table = three_day_table();
        let scale = build_y_scale(&table, "aapl", 200.0).expect("y scale");
        assert_abs_diff_eq!(scale.map(10.0), 200.0);
        assert_abs_diff_eq!(scale.map(30.0), 0.0);
    }

    #[test]
    fn y_scale_for_unknown_series_fails() {
        let table = three_day_table();
        let err = build_y_scale(&table, "msft", 200.0).expect_err("unknown");
        assert!(matches!(err, ChartError::UnknownSeries(_)));
    }

    #[test]
    fn shared_y_scale_covers_all_series() {
        let table = three_day_table();
        let shared = build_shared_y_scale(&table, 100.0).expect("shared");
        assert_eq!(shared.domain(), (10.0, 90.0));

        let scales = build_y_scales(&table, 100.0, YScaleMode::Shared).expect("scales");
        assert_eq!(scales.keys().collect::<Vec<_>>(), vec!["aapl", "amzn"]);
        assert_eq!(scales["aapl"], scales["amzn"]);
    }

    #[test]
    fn pointer_on_exact_index_resolves_that_row() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        let resolved = resolve_row(&table, x_scale, 50.0).expect("resolve");
        assert_eq!(resolved.position, 1);
        assert_eq!(resolved.row.index().raw(), "2020-01-02");
        assert_abs_diff_eq!(resolved.domain_x, 2.0 * DAY);
    }

    #[test]
    fn pointer_between_rows_resolves_the_later_row() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        // Closer to day 1 than day 2.
        let resolved = resolve_row(&table, x_scale, 10.0).expect("resolve");
        assert_eq!(resolved.row.index().raw(), "2020-01-02");
        assert_eq!(resolved.row.value(0).expect("aapl").value(), 20.0);
    }

    #[test]
    fn pointer_outside_range_is_clamped() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        assert_eq!(resolve_row(&table, x_scale, -30.0).expect("left").position, 0);
        assert_eq!(resolve_row(&table, x_scale, 130.0).expect("right").position, 2);
    }

    #[test]
    fn non_finite_pointer_is_rejected() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        assert!(resolve_row(&table, x_scale, f64::NAN).is_err());
    }

    #[test]
    fn single_row_table_always_resolves_its_row() {
        let table = Table::new(
            Column::number("ix"),
            vec![Column::number("v")],
            vec![Row::new(Field::number(7.0), vec![Field::number(3.0)])],
        )
        .expect("table");
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        for pointer in [0.0, 50.0, 100.0] {
            assert_eq!(resolve_row(&table, x_scale, pointer).expect("resolve").position, 0);
        }
    }

    #[test]
    fn extreme_finite_index_extent_resolves_the_middle_row() {
        let rows = [-1e308, 0.0, 1e308]
            .into_iter()
            .map(|index| Row::new(Field::number(index), vec![Field::number(1.0)]))
            .collect();
        let table =
            Table::new(Column::number("ix"), vec![Column::number("v")], rows).expect("table");
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");

        let resolved = resolve_row(&table, x_scale, 50.0).expect("resolve");
        assert_eq!(resolved.position, 1);
        assert_abs_diff_eq!(resolved.domain_x, 0.0);
        assert_abs_diff_eq!(x_scale.map(1e308), 100.0);
        assert_abs_diff_eq!(x_scale.map(0.0), 50.0);
    }

    #[test]
    fn highlight_points_follow_column_order() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        let y_scales = build_y_scales(&table, 200.0, YScaleMode::PerSeries).expect("y scales");
        let row = table.row(2).expect("row");

        let points = highlight_points(&table, row, x_scale, &y_scales).expect("points");
        assert_eq!(points.keys().collect::<Vec<_>>(), vec!["aapl", "amzn"]);
        assert_eq!(points["aapl"], Point::new(100.0, 0.0));
        assert_eq!(points["amzn"], Point::new(100.0, 200.0));
    }

    #[test]
    fn highlight_points_require_every_y_scale() {
        let table = three_day_table();
        let x_scale = build_x_scale(&table, 100.0).expect("x scale");
        let mut y_scales = build_y_scales(&table, 200.0, YScaleMode::PerSeries).expect("y scales");
        y_scales.shift_remove("amzn");

        let err = highlight_points(&table, table.first_row(), x_scale, &y_scales)
            .expect_err("missing scale");
        assert!(matches!(err, ChartError::UnknownSeries(key) if key == "amzn"));
    }

    #[test]
    fn bounds_are_inclusive_at_padding_edges() {
        let origin = Point::new(40.0, 40.0);
        let size = Point::new(720.0, 420.0);

        assert!(is_inside_bounds(Point::new(40.0, 40.0), origin, size));
        assert!(is_inside_bounds(Point::new(760.0, 460.0), origin, size));
        assert!(!is_inside_bounds(Point::new(39.999, 100.0), origin, size));
        assert!(!is_inside_bounds(Point::new(100.0, 460.001), origin, size));
        assert!(!is_inside_bounds(Point::new(-5.0, 100.0), origin, size));
    }
}
