use smallvec::SmallVec;

use crate::core::{
    LinearScale, PlotArea, Point, ResolvedRow, Row, Table, Viewport, YScales, highlight_points,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CrosshairMode, Cursor};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

use super::ChartConfig;
use super::layout_helpers::{estimate_label_text_width_px, format_value_label};

/// Snapshot of everything one draw pass depends on.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub table: &'a Table,
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub x_scale: LinearScale,
    pub y_scales: &'a YScales,
    pub cursor: Option<Cursor>,
    pub resolved: Option<ResolvedRow<'a>>,
    pub crosshair_mode: CrosshairMode,
    pub config: &'a ChartConfig,
}

struct ValueLabel {
    text: String,
    center_y: f64,
    color: Color,
}

/// Builds the primitives for one draw pass, in viewport pixels.
///
/// Series lines are always drawn. Crosshairs, the cursor overlay and hover
/// labels only appear when a row is resolved; static last-value labels
/// follow `ChartConfig::show_last_value_labels`.
pub fn build_frame(input: &FrameInput<'_>) -> ChartResult<RenderFrame> {
    let FrameInput {
        table,
        viewport,
        plot,
        x_scale,
        y_scales,
        cursor,
        resolved,
        crosshair_mode,
        config,
    } = *input;
    config.validate()?;

    let mut frame = RenderFrame::new(viewport);
    let mut labels: SmallVec<[ValueLabel; 4]> = SmallVec::new();

    for (position, column) in table.series_columns().iter().enumerate() {
        let y_scale = y_scales
            .get(&column.key)
            .ok_or_else(|| ChartError::UnknownSeries(column.key.clone()))?;
        let points = table
            .rows()
            .iter()
            .map(|row| {
                plot.to_viewport(Point::new(
                    x_scale.map(row.index().value()),
                    y_scale.map(row.values()[position].value()),
                ))
            })
            .collect();
        frame = frame.with_polyline(PolylinePrimitive::new(
            points,
            config.series_line_width_px,
            config.series_color(position),
        ));
    }

    if let (Some(resolved), Some(cursor)) = (resolved, cursor) {
        let highlights = highlight_points(table, resolved.row, x_scale, y_scales)?;
        for (position, point) in highlights.values().enumerate() {
            let start = plot.to_viewport(*point);
            frame = frame.with_line(
                LinePrimitive::new(
                    start.x,
                    start.y,
                    plot.right(),
                    start.y,
                    config.crosshair_line_width_px,
                    config.series_color(position),
                )
                .with_stroke_style(config.dashed_stroke()),
            );
        }

        if crosshair_mode != CrosshairMode::Hidden {
            let marker_x = match crosshair_mode {
                CrosshairMode::Normal => cursor.local.x,
                _ => x_scale.map(resolved.row.index().value()),
            };
            frame = push_cursor_overlay(
                frame,
                plot.to_viewport(Point::new(marker_x, cursor.local.y)),
                plot,
                config,
            );
        }

        collect_row_labels(&mut labels, table, resolved.row, y_scales, plot, config)?;
    }

    if config.show_last_value_labels {
        collect_row_labels(&mut labels, table, table.last_row(), y_scales, plot, config)?;
    }

    let right_edge = f64::from(viewport.width);
    for label in labels {
        let text_width = estimate_label_text_width_px(&label.text, config.label_font_size_px);
        let box_width = text_width + 2.0 * config.label_padding_px;
        frame = frame
            .with_rect(RectPrimitive::new(
                right_edge - box_width,
                label.center_y - config.label_box_height_px / 2.0,
                box_width,
                config.label_box_height_px,
                label.color,
            ))
            .with_text(TextPrimitive::new(
                label.text,
                right_edge - config.label_padding_px,
                label.center_y,
                config.label_font_size_px,
                config.label_text_color,
                TextHAlign::Right,
            ));
    }

    Ok(frame)
}

fn push_cursor_overlay(
    frame: RenderFrame,
    marker: Point,
    plot: PlotArea,
    config: &ChartConfig,
) -> RenderFrame {
    let dashed = config.dashed_stroke();
    frame
        .with_line(
            LinePrimitive::new(
                marker.x,
                plot.origin.y,
                marker.x,
                plot.bottom(),
                config.cursor_line_width_px,
                config.cursor_color,
            )
            .with_stroke_style(dashed),
        )
        .with_line(
            LinePrimitive::new(
                marker.x,
                marker.y,
                plot.right(),
                marker.y,
                config.cursor_line_width_px,
                config.cursor_color,
            )
            .with_stroke_style(dashed),
        )
        .with_circle(CirclePrimitive {
            center_x: marker.x,
            center_y: marker.y,
            radius: config.cursor_point_radius_px,
            fill_color: config.cursor_fill_color,
            stroke_color: config.cursor_color,
            stroke_width: config.cursor_line_width_px,
        })
}

fn collect_row_labels(
    labels: &mut SmallVec<[ValueLabel; 4]>,
    table: &Table,
    row: &Row,
    y_scales: &YScales,
    plot: PlotArea,
    config: &ChartConfig,
) -> ChartResult<()> {
    for (position, (column, field)) in table.series_columns().iter().zip(row.values()).enumerate() {
        let y_scale = y_scales
            .get(&column.key)
            .ok_or_else(|| ChartError::UnknownSeries(column.key.clone()))?;
        labels.push(ValueLabel {
            text: format_value_label(field.value(), config.label_decimals),
            center_y: plot.origin.y + y_scale.map(field.value()),
            color: config.series_color(position),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FrameInput, build_frame};
    use crate::api::ChartConfig;
    use crate::core::{
        Column, Field, PlotArea, Point, Row, Table, Viewport, YScaleMode, build_x_scale,
        build_y_scales, resolve_row,
    };
    use crate::interaction::{CrosshairMode, Cursor};

    fn table() -> Table {
        Table::new(
            Column::number("ix"),
            vec![Column::number("a"), Column::number("b")],
            vec![
                Row::new(Field::number(0.0), vec![Field::number(1.0), Field::number(5.0)]),
                Row::new(Field::number(1.0), vec![Field::number(2.0), Field::number(5.0)]),
                Row::new(Field::number(2.0), vec![Field::number(3.0), Field::number(5.0)]),
            ],
        )
        .expect("table")
    }

    #[test]
    fn frame_without_cursor_has_lines_and_last_labels_only() {
        let table = table();
        let config = ChartConfig::default();
        let viewport = Viewport::new(280, 180);
        let plot = PlotArea::from_viewport(viewport, config.padding_px).expect("plot");
        let x_scale = build_x_scale(&table, plot.width).expect("x");
        let y_scales = build_y_scales(&table, plot.height, YScaleMode::PerSeries).expect("y");

        let frame = build_frame(&FrameInput {
            table: &table,
            viewport,
            plot,
            x_scale,
            y_scales: &y_scales,
            cursor: None,
            resolved: None,
            crosshair_mode: CrosshairMode::Magnet,
            config: &config,
        })
        .expect("frame");

        assert!(frame.validate().is_ok());
        assert_eq!(frame.polylines.len(), 2);
        assert!(frame.lines.is_empty());
        assert!(frame.circles.is_empty());
        let texts: Vec<_> = frame.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["3.00", "5.00"]);
        // Constant series sits on the vertical middle of the plot.
        assert_eq!(frame.polylines[1].points[0].y, 90.0);
    }

    #[test]
    fn frame_with_cursor_draws_crosshairs_overlay_and_hover_labels() {
        let table = table();
        let config = ChartConfig::default().with_last_value_labels(false);
        let viewport = Viewport::new(280, 180);
        let plot = PlotArea::from_viewport(viewport, config.padding_px).expect("plot");
        let x_scale = build_x_scale(&table, plot.width).expect("x");
        let y_scales = build_y_scales(&table, plot.height, YScaleMode::PerSeries).expect("y");
        let cursor = Cursor::from_pointer(Point::new(100.0, 60.0), plot).expect("cursor");
        let resolved = resolve_row(&table, x_scale, cursor.local.x).expect("resolve");

        let input = FrameInput {
            table: &table,
            viewport,
            plot,
            x_scale,
            y_scales: &y_scales,
            cursor: Some(cursor),
            resolved: Some(resolved),
            crosshair_mode: CrosshairMode::Magnet,
            config: &config,
        };
        let frame = build_frame(&input).expect("frame");

        assert!(frame.validate().is_ok());
        // Two series crosshairs plus vertical and horizontal cursor lines.
        assert_eq!(frame.lines.len(), 4);
        assert_eq!(frame.circles.len(), 1);
        // Local x 60 of 200 resolves to the row at index 1 (x = 100 local).
        assert_eq!(resolved.position, 1);
        assert_eq!(frame.circles[0].center_x, 140.0);
        assert_eq!(frame.circles[0].center_y, 60.0);
        let texts: Vec<_> = frame.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["2.00", "5.00"]);

        let normal = build_frame(&FrameInput {
            crosshair_mode: CrosshairMode::Normal,
            ..input
        })
        .expect("normal frame");
        assert_eq!(normal.circles[0].center_x, 100.0);

        let hidden = build_frame(&FrameInput {
            crosshair_mode: CrosshairMode::Hidden,
            ..input
        })
        .expect("hidden frame");
        assert!(hidden.circles.is_empty());
        assert_eq!(hidden.lines.len(), 2);
    }
}
