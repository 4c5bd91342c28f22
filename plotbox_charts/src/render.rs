// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render entry point.
//!
//! [`render`] validates the canvas, builds the per-render environment and measurement cache,
//! hands the request to the chart family's driver and returns the marks in paint order.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::{Dimension, LayoutBox, Unit, UnitFactors};
use plotbox_text::{FontFamily, MeasureCache, TextMeasurer, TextStyle};

use crate::axis::{self, AxisStyle};
use crate::bar::BarLayout;
use crate::config::{self, ChartConfig, ChartRequest, DimensionSpec};
use crate::error::RenderError;
use crate::format::{BasicNumberFormatter, NumberFormatter};
use crate::layout::{self, ChartRegions};
use crate::mark::{Mark, Painter, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::pie::PieLayout;
use crate::scatter::ScatterLayout;
use crate::time::{CalendarTicks, TimeTickGenerator};
use crate::timeline::TimelineLayout;
use crate::title::Title;
use crate::{bar, pie, scatter, timeline, z_order};

/// Canvas width used when a request doesn't set one.
pub const DEFAULT_WIDTH: f64 = 1920.0;
/// Canvas height used when a request doesn't set one.
pub const DEFAULT_HEIGHT: f64 = 1080.0;

/// Default series and slice colors.
pub(crate) const PALETTE: [Color; 6] = [
    Color::from_rgb8(0x55, 0x77, 0x99),
    Color::from_rgb8(0x55, 0x99, 0x77),
    Color::from_rgb8(0x77, 0x55, 0x99),
    Color::from_rgb8(0x77, 0x99, 0x55),
    Color::from_rgb8(0x99, 0x77, 0x55),
    Color::from_rgb8(0x99, 0x55, 0x77),
];

/// A chart family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Grouped bars.
    Bar,
    /// Pie or donut.
    Pie,
    /// Scatter plot with symbol markers.
    Scatter,
    /// Lines over time.
    Timeline,
}

impl ChartKind {
    /// Parses a family name as used in request routes (`bar`, `pie`, `scatter`, `timeline`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bar" | "barchart" => Some(Self::Bar),
            "pie" | "piechart" => Some(Self::Pie),
            "scatter" => Some(Self::Scatter),
            "timeline" => Some(Self::Timeline),
            _ => None,
        }
    }
}

/// Request-independent limits and decorations.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Largest accepted canvas area in square pixels.
    pub max_canvas_area: f64,
    /// Text stamped into the bottom-right corner of every chart.
    pub watermark: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_canvas_area: 4096.0 * 4096.0,
            watermark: None,
        }
    }
}

/// The collaborators a render needs.
#[derive(Clone)]
pub struct RenderContext<'a> {
    measurer: &'a dyn TextMeasurer,
    formatter: &'a dyn NumberFormatter,
    time_ticks: &'a dyn TimeTickGenerator,
    options: RenderOptions,
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> RenderContext<'a> {
    /// Uses `measurer` with the bundled number formatter and calendar ticks.
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            measurer,
            formatter: &BasicNumberFormatter,
            time_ticks: &CalendarTicks,
            options: RenderOptions::default(),
        }
    }

    /// Replaces the number formatter.
    pub fn with_formatter(mut self, formatter: &'a dyn NumberFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the time tick generator.
    pub fn with_time_ticks(mut self, time_ticks: &'a dyn TimeTickGenerator) -> Self {
        self.time_ticks = time_ticks;
        self
    }

    /// Replaces the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

/// Family-specific layout results.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartDetails {
    /// See [`BarLayout`].
    Bar(BarLayout),
    /// See [`PieLayout`].
    Pie(PieLayout),
    /// See [`ScatterLayout`].
    Scatter(ScatterLayout),
    /// See [`TimelineLayout`].
    Timeline(TimelineLayout),
}

/// A laid-out chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOutput {
    /// Canvas size in pixels.
    pub size: Size,
    /// Resolved regions.
    pub regions: ChartRegions,
    /// Marks in paint order.
    pub marks: Vec<Mark>,
    /// Family-specific results (scales, slices, legend).
    pub details: ChartDetails,
}

impl ChartOutput {
    /// Replays every mark, in order.
    pub fn paint(&self, painter: &mut dyn Painter) {
        for mark in &self.marks {
            painter.paint(mark);
        }
    }
}

/// What a driver hands back to [`render`].
pub(crate) struct Drawn {
    pub(crate) regions: ChartRegions,
    pub(crate) marks: Vec<Mark>,
    pub(crate) details: ChartDetails,
}

/// Per-render state shared by the drivers.
pub(crate) struct Frame<'a> {
    pub(crate) request: &'a ChartRequest,
    pub(crate) env: UnitFactors,
    pub(crate) canvas: LayoutBox,
    pub(crate) measurer: MeasureCache<'a>,
    pub(crate) formatter: &'a dyn NumberFormatter,
    pub(crate) time_ticks: &'a dyn TimeTickGenerator,
}

pub(crate) fn vmin(n: f64) -> Dimension {
    Dimension::new(n, Unit::Vmin)
}

impl<'a> Frame<'a> {
    pub(crate) fn config(&self) -> &'a ChartConfig {
        &self.request.chart
    }

    /// Resolves a configured dimension, or `default` when unset.
    pub(crate) fn dim(
        &self,
        field: &'static str,
        spec: Option<&DimensionSpec>,
        default: Dimension,
    ) -> Result<Dimension, RenderError> {
        match spec {
            None => Ok(default),
            Some(spec) => spec
                .to_dimension()
                .map_err(|source| RenderError::Dimension { field, source }),
        }
    }

    /// Like [`Frame::dim`], evaluated against the base environment.
    pub(crate) fn px(
        &self,
        field: &'static str,
        spec: Option<&DimensionSpec>,
        default: Dimension,
    ) -> Result<f64, RenderError> {
        Ok(self.dim(field, spec, default)?.value(&self.env))
    }

    /// The canvas inset by the padding, resolved against `env`.
    pub(crate) fn chart_box(
        &self,
        pad_x: &Dimension,
        pad_y: &Dimension,
        env: &UnitFactors,
    ) -> LayoutBox {
        self.canvas.inside_box(pad_x, pad_y).resolve(env)
    }

    /// Label text style at `size`, in the configured family.
    pub(crate) fn label_style(&self, size: f64, default_family: &str) -> TextStyle {
        let family = self
            .config()
            .label_font_family
            .as_deref()
            .unwrap_or(default_family);
        TextStyle::new(size).with_family(FontFamily::from_css_list(family))
    }

    /// Axis styling from `chart.axis`.
    pub(crate) fn axis_style(
        &self,
        label_style: TextStyle,
        tick_length: f64,
    ) -> Result<AxisStyle, RenderError> {
        let axis = &self.config().axis;
        let width = self.px("axis.lineWidth", axis.line_width.as_ref(), Dimension::px(1.0))?;
        let stroke = config::color_or(axis.stroke.as_deref(), axis::RULE_COLOR);
        let label = config::color_or(axis.text_color.as_deref(), axis::LABEL_COLOR);
        Ok(AxisStyle::new(label_style, tick_length)
            .with_rule(StrokeStyle::solid(stroke, width))
            .with_label_fill(label))
    }

    /// Reserves the title strip (if the request has a title) at the top of `chart`.
    ///
    /// Returns the title marks, the strip and the remaining chart box.
    pub(crate) fn title(
        &self,
        chart: &LayoutBox,
        label_style: &TextStyle,
    ) -> (Vec<Mark>, Option<LayoutBox>, LayoutBox) {
        let cfg = self.config();
        let Some(text) = cfg.title.as_deref().filter(|t| !t.is_empty()) else {
            return (Vec::new(), None, chart.clone());
        };
        let fill = config::color_or(cfg.label_color.as_deref(), axis::LABEL_COLOR);
        let style = label_style
            .clone()
            .with_font_size(label_style.font_size * 1.25);
        let mut title = Title::new(text, style, fill);
        if let Some(sub) = cfg.subtitle.as_deref().filter(|s| !s.is_empty()) {
            title = title.with_subtitle(sub);
        }
        let (strip, rest) = layout::split_top(chart, title.height(&self.measurer));
        let marks = strip
            .as_ref()
            .map(|s| title.marks(&self.measurer, s.to_rect()))
            .unwrap_or_default();
        (marks, strip, rest)
    }

    /// Legend and row colors: `stroke` first, then `colors`, then the default palette.
    pub(crate) fn series_colors(&self, palette: &[Color]) -> Vec<Color> {
        let cfg = self.config();
        let list = cfg
            .stroke
            .as_ref()
            .map(config::OneOrMany::to_vec)
            .or_else(|| cfg.colors.clone());
        config::palette_or(list.as_deref(), palette)
    }

    pub(crate) fn debug(&self) -> bool {
        self.request.debug_boxes()
    }
}

fn validate_canvas(width: f64, height: f64, options: &RenderOptions) -> Result<(), RenderError> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(RenderError::InvalidCanvas { width, height });
    }
    let area = width * height;
    if area > options.max_canvas_area {
        return Err(RenderError::CanvasTooLarge {
            area,
            max: options.max_canvas_area,
        });
    }
    Ok(())
}

fn watermark(text: &str, canvas: Rect, env: &UnitFactors) -> Mark {
    let size = vmin(1.5).value(env).max(10.0);
    let inset = 0.5 * size;
    Mark::text(
        TextMark::new(
            Point::new(canvas.x1 - inset, canvas.y1 - inset),
            text,
            TextStyle::new(size),
        )
        .with_fill(css::GRAY.with_alpha(0.6))
        .with_align(TextAnchor::End, TextBaseline::Bottom),
    )
    .with_z_index(z_order::WATERMARK)
}

/// Lays out one chart.
///
/// Fails only on an unusable canvas or a malformed dimension string; everything else falls
/// back to defaults.
pub fn render(
    kind: ChartKind,
    request: &ChartRequest,
    ctx: &RenderContext<'_>,
) -> Result<ChartOutput, RenderError> {
    let width = request.chart.width.unwrap_or(DEFAULT_WIDTH);
    let height = request.chart.height.unwrap_or(DEFAULT_HEIGHT);
    validate_canvas(width, height, &ctx.options)?;

    let env = UnitFactors::for_canvas(width, height);
    let canvas = LayoutBox::from_rect(Rect::new(0.0, 0.0, width, height)).resolve(&env);
    let frame = Frame {
        request,
        env,
        canvas,
        measurer: MeasureCache::new(ctx.measurer),
        formatter: ctx.formatter,
        time_ticks: ctx.time_ticks,
    };

    let Drawn {
        regions,
        mut marks,
        details,
    } = match kind {
        ChartKind::Bar => bar::layout(&frame)?,
        ChartKind::Pie => pie::layout(&frame)?,
        ChartKind::Scatter => scatter::layout(&frame)?,
        ChartKind::Timeline => timeline::layout(&frame)?,
    };

    if let Some(bg) = request.chart.background.as_deref() {
        let fill = config::color_or(Some(bg), css::WHITE);
        marks.push(
            Mark::filled_rect(frame.canvas.to_rect(), fill).with_z_index(z_order::BACKGROUND),
        );
    }
    if frame.debug() {
        marks.extend(regions.debug_marks());
    }
    if let Some(text) = ctx.options.watermark.as_deref() {
        marks.push(watermark(text, frame.canvas.to_rect(), &frame.env));
    }
    marks.sort_by_key(|m| m.z_index);

    log::debug!(
        "{kind:?}: {} marks, plot {:?}, text cache {} hits / {} misses",
        marks.len(),
        regions.plot.to_rect(),
        frame.measurer.hits(),
        frame.measurer.misses()
    );

    Ok(ChartOutput {
        size: Size::new(width, height),
        regions,
        marks,
        details,
    })
}
