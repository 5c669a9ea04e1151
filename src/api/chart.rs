use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::{
    LinearScale, PlotArea, Point, ResolvedRow, Table, Viewport, YScaleMode, YScales,
    build_x_scale, build_y_scales, highlight_points, resolve_row,
};
use crate::error::ChartResult;
use crate::interaction::{CrosshairMode, Cursor, InteractionState};
use crate::render::{RenderFrame, Renderer};

use super::frame_builder::{FrameInput, build_frame};
use super::{ChartConfig, CursorReadout, RedrawScheduler};

/// Table plus the scales fitted to it for the current plot size.
#[derive(Debug, Clone)]
struct PlottedTable {
    table: Table,
    x_scale: LinearScale,
    y_scales: YScales,
}

impl PlottedTable {
    fn fit(table: Table, plot: PlotArea, y_scale_mode: YScaleMode) -> ChartResult<Self> {
        let (x_scale, y_scales) = fit_scales(&table, plot, y_scale_mode)?;
        Ok(Self {
            table,
            x_scale,
            y_scales,
        })
    }
}

fn fit_scales(
    table: &Table,
    plot: PlotArea,
    y_scale_mode: YScaleMode,
) -> ChartResult<(LinearScale, YScales)> {
    Ok((
        build_x_scale(table, plot.width)?,
        build_y_scales(table, plot.height, y_scale_mode)?,
    ))
}

/// Stateful driver around the pure resolver.
///
/// Owns the table, the scales fitted to the current plot area, the pointer
/// cursor and the redraw scheduler. Every mutation that affects geometry
/// refits the scales before returning, so a resolve never mixes a table with
/// scales from another size or dataset.
pub struct LineChart<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    viewport: Viewport,
    plot: PlotArea,
    plotted: Option<PlottedTable>,
    interaction: InteractionState,
    scheduler: RedrawScheduler,
}

impl<R: Renderer> LineChart<R> {
    pub fn new(renderer: R, config: ChartConfig, viewport: Viewport) -> ChartResult<Self> {
        config.validate()?;
        let plot = PlotArea::from_viewport(viewport, config.padding_px)?;

        let mut interaction = InteractionState::default();
        interaction.set_crosshair_mode(config.crosshair_mode);
        let mut scheduler = RedrawScheduler::default();
        scheduler.request_redraw();

        debug!(
            width = viewport.width,
            height = viewport.height,
            padding_px = config.padding_px,
            "line chart created"
        );
        Ok(Self {
            renderer,
            config,
            viewport,
            plot,
            plotted: None,
            interaction,
            scheduler,
        })
    }

    /// Replaces the plotted table and refits the scales.
    pub fn set_table(&mut self, table: Table) -> ChartResult<()> {
        debug!(
            rows = table.len(),
            series = table.series_columns().len(),
            "set table"
        );
        self.plotted = Some(PlottedTable::fit(
            table,
            self.plot,
            self.config.y_scale_mode,
        )?);
        self.scheduler.request_redraw();
        Ok(())
    }

    pub fn clear_table(&mut self) -> Option<Table> {
        let previous = self.plotted.take().map(|plotted| plotted.table);
        if previous.is_some() {
            debug!("clear table");
            self.scheduler.request_redraw();
        }
        previous
    }

    /// Applies a new viewport size; the cursor keeps its relative position.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        let plot = PlotArea::from_viewport(viewport, self.config.padding_px).inspect_err(|err| {
            warn!(width = viewport.width, height = viewport.height, %err, "rejected resize");
        })?;
        self.refit(plot, self.config.y_scale_mode)?;

        debug!(width = viewport.width, height = viewport.height, "resize");
        self.viewport = viewport;
        self.interaction.on_plot_resized(plot);
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Replaces styling/behavior; padding and y-scale mode changes refit.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        let plot = PlotArea::from_viewport(self.viewport, config.padding_px)?;
        self.refit(plot, config.y_scale_mode)?;

        self.interaction.set_crosshair_mode(config.crosshair_mode);
        self.interaction.on_plot_resized(plot);
        self.config = config;
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Computes new scales first and commits plot + scales together.
    fn refit(&mut self, plot: PlotArea, y_scale_mode: YScaleMode) -> ChartResult<()> {
        let scales = match &self.plotted {
            Some(plotted) => Some(fit_scales(&plotted.table, plot, y_scale_mode)?),
            None => None,
        };
        self.plot = plot;
        if let (Some(plotted), Some((x_scale, y_scales))) = (self.plotted.as_mut(), scales) {
            plotted.x_scale = x_scale;
            plotted.y_scales = y_scales;
        }
        Ok(())
    }

    /// Pointer position in viewport pixels.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.interaction.on_pointer_move(x, y, self.plot) {
            trace!(x, y, cursor = self.interaction.cursor().is_some(), "pointer move");
            self.scheduler.request_redraw();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.interaction.on_pointer_leave() {
            trace!("pointer leave");
            self.scheduler.request_redraw();
        }
    }

    pub fn set_crosshair_mode(&mut self, mode: CrosshairMode) {
        if self.interaction.crosshair_mode() != mode {
            self.interaction.set_crosshair_mode(mode);
            self.scheduler.request_redraw();
        }
    }

    #[must_use]
    pub fn crosshair_mode(&self) -> CrosshairMode {
        self.interaction.crosshair_mode()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        self.interaction.cursor()
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        self.plotted.as_ref().map(|plotted| &plotted.table)
    }

    #[must_use]
    pub fn x_scale(&self) -> Option<LinearScale> {
        self.plotted.as_ref().map(|plotted| plotted.x_scale)
    }

    #[must_use]
    pub fn y_scales(&self) -> Option<&YScales> {
        self.plotted.as_ref().map(|plotted| &plotted.y_scales)
    }

    /// Row under the cursor; `None` without a cursor or a table.
    pub fn resolved_row(&self) -> ChartResult<Option<ResolvedRow<'_>>> {
        match (&self.plotted, self.interaction.cursor()) {
            (Some(plotted), Some(cursor)) => {
                resolve_row(&plotted.table, plotted.x_scale, cursor.local.x).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Plot-local highlight position of every series for the hovered row.
    pub fn highlight_points(&self) -> ChartResult<Option<IndexMap<String, Point>>> {
        let (Some(plotted), Some(resolved)) = (&self.plotted, self.resolved_row()?) else {
            return Ok(None);
        };
        highlight_points(
            &plotted.table,
            resolved.row,
            plotted.x_scale,
            &plotted.y_scales,
        )
        .map(Some)
    }

    pub fn readout(&self) -> ChartResult<Option<CursorReadout>> {
        let (Some(plotted), Some(resolved)) = (&self.plotted, self.resolved_row()?) else {
            return Ok(None);
        };
        let highlights = highlight_points(
            &plotted.table,
            resolved.row,
            plotted.x_scale,
            &plotted.y_scales,
        )?;
        CursorReadout::from_resolved(
            &plotted.table,
            &resolved,
            &highlights,
            self.plot,
            self.config.label_decimals,
        )
        .map(Some)
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let Some(plotted) = &self.plotted else {
            return Ok(RenderFrame::new(self.viewport));
        };
        build_frame(&FrameInput {
            table: &plotted.table,
            viewport: self.viewport,
            plot: self.plot,
            x_scale: plotted.x_scale,
            y_scales: &plotted.y_scales,
            cursor: self.interaction.cursor(),
            resolved: self.resolved_row()?,
            crosshair_mode: self.interaction.crosshair_mode(),
            config: &self.config,
        })
    }

    /// Returns `true` when this call scheduled a new draw.
    pub fn request_redraw(&mut self) -> bool {
        self.scheduler.request_redraw()
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.scheduler.is_pending()
    }

    #[must_use]
    pub fn scheduler(&self) -> RedrawScheduler {
        self.scheduler
    }

    /// Display-refresh hook: draws once if any redraw was requested.
    ///
    /// Returns whether a frame was rendered.
    pub fn on_animation_frame(&mut self) -> ChartResult<bool> {
        if !self.scheduler.take_pending() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Draws immediately, bypassing the scheduler.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        trace!(
            polylines = frame.polylines.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "render frame"
        );
        self.renderer.render(&frame).inspect_err(|err| {
            warn!(%err, "renderer rejected frame");
        })
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
