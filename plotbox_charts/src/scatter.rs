// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter plots.
//!
//! Points are placed on two linear scales whose domains are the data extents widened by
//! `extra` on both ends. Each series draws with its own symbol and color; rows without a
//! `series` field form one series each.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::{Dimension, LayoutBox};

use crate::axis::{self, AxisSide, AxisTick};
use crate::config::{self, AxisOptions};
use crate::data::{Accessor, Ordinal};
use crate::error::RenderError;
use crate::legend::{
    Legend, LegendAlign, LegendEntry, LegendLayout, LegendMarker, LegendMetrics, LegendPosition,
};
use crate::layout::ChartRegions;
use crate::mark::{Mark, StrokeStyle};
use crate::render::{ChartDetails, Drawn, Frame, vmin};
use crate::scale::{self, ScaleLinear};
use crate::symbol::Symbol;
use crate::z_order;

const DEFAULT_FONT_FAMILY: &str = "Helvetica,\"sans-serif\"";
const DEFAULT_COLORS: [Color; 3] = [css::RED, css::GREEN, css::BLUE];
const MARKER_STROKE: Color = Color::from_rgb8(0x66, 0x66, 0x66);

/// Scatter chart layout results.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterLayout {
    /// Series names, in first-seen order.
    pub series: Vec<String>,
    /// Horizontal axis ticks (x in pixels).
    pub x_ticks: Vec<AxisTick>,
    /// Vertical axis ticks (y in pixels).
    pub y_ticks: Vec<AxisTick>,
    /// Marker centers, one per plotted row.
    pub points: Vec<Point>,
    /// The legend.
    pub legend: Legend,
}

/// Symbols named in `shapes`, or the default cycle.
fn series_symbols(shapes: Option<&[String]>) -> Vec<Symbol> {
    let parsed: Vec<Symbol> = shapes
        .unwrap_or_default()
        .iter()
        .filter_map(|name| {
            let symbol = Symbol::from_name(name);
            if symbol.is_none() {
                log::warn!("unknown scatter shape {name:?}");
            }
            symbol
        })
        .collect();
    if parsed.is_empty() {
        Symbol::SERIES_CYCLE.to_vec()
    } else {
        parsed
    }
}

struct ScatterPoint {
    x: f64,
    y: f64,
    series: usize,
}

pub(crate) fn layout(frame: &Frame<'_>) -> Result<Drawn, RenderError> {
    let cfg = frame.config();
    let req = frame.request;

    let pad_x = frame.dim("padX", cfg.pad_x.as_ref(), vmin(2.0))?;
    let pad_y = frame.dim("padY", cfg.pad_y.as_ref(), pad_x.clone())?;
    let font_size = frame.px("labelFontSize", cfg.label_font_size.as_ref(), vmin(2.5))?;
    let tick = frame.px("tickLength", cfg.tick_length.as_ref(), vmin(1.5))?;
    let line_width = frame.px("lineWidth", cfg.line_width.as_ref(), Dimension::px(2.0))?;
    let shape_size = frame.px(
        "shapeSize",
        cfg.shape_size.as_ref(),
        Dimension::px(font_size),
    )?;
    let env = frame.env.clone().with_em(font_size);
    let extra = cfg.extra.unwrap_or(0.05);

    let x_value = Accessor::new("xValue", &req.meta);
    let y_value = Accessor::new("yValue", &req.meta);
    let series_field = Accessor::new("series", &req.meta);
    let label = Accessor::new("label", &req.meta);

    let by_field = req.data.iter().any(|row| series_field.text(row).is_some());
    let mut series = Ordinal::default();
    let mut points = Vec::with_capacity(req.data.len());
    for (i, row) in req.data.iter().enumerate() {
        let name = if by_field {
            series_field.text(row).unwrap_or_default()
        } else {
            label.text(row).unwrap_or_else(|| format!("Series {}", i + 1))
        };
        let s = series.insert(name);
        let (Some(x), Some(y)) = (x_value.number(row), y_value.number(row)) else {
            continue;
        };
        points.push(ScatterPoint { x, y, series: s });
    }

    let x_options = cfg.x_axis.as_ref().or(cfg.main_axis.as_ref());
    let y_options = cfg.y_axis.as_ref().or(cfg.value_axis.as_ref());
    let x_count = AxisOptions::tick_count_or(x_options, 6);
    let y_count = AxisOptions::tick_count_or(y_options, 4);
    let x_format = cfg.number_format(x_options);
    let y_format = cfg.number_format(y_options);

    let x_extent = scale::padded_extent(points.iter().map(|p| p.x), extra);
    let y_extent = scale::padded_extent(points.iter().map(|p| p.y), extra);
    let mut x_scale = ScaleLinear::new(x_extent, (0.0, 1.0));
    let mut y_scale = ScaleLinear::new(y_extent, (0.0, 1.0));
    if x_options.and_then(|o| o.nice).unwrap_or(false) {
        x_scale = x_scale.nice(x_count);
    }
    if y_options.and_then(|o| o.nice).unwrap_or(false) {
        y_scale = y_scale.nice(y_count);
    }
    let x_tick_values = x_scale.ticks(x_count);
    let y_tick_values = y_scale.ticks(y_count);

    let label_style = frame.label_style(font_size, DEFAULT_FONT_FAMILY);
    let axis_style = frame.axis_style(label_style.clone(), tick)?;
    let x_sizing = AxisTick::formatted(&x_tick_values, |v| v, frame.formatter, &x_format);
    let y_sizing = AxisTick::formatted(&y_tick_values, |v| v, frame.formatter, &y_format);
    let x_axis_height = axis::horizontal_axis_height(&x_sizing, &axis_style, &frame.measurer);
    let y_axis_width = axis::value_axis_width(&y_sizing, &axis_style, &frame.measurer);

    let chart = frame.chart_box(&pad_x, &pad_y, &env);
    let (mut marks, title_box, chart) = frame.title(&chart, &label_style);
    let inside = chart.inside_box(&pad_x, &pad_y);

    let colors = config::palette_or(cfg.colors.as_deref(), &DEFAULT_COLORS);
    let symbols = series_symbols(cfg.shapes.as_deref());
    let color_of = |s: usize| colors[s % colors.len()];
    let symbol_of = |s: usize| symbols[s % symbols.len()];

    let legend_position = match cfg
        .legend_position
        .as_deref()
        .and_then(LegendPosition::from_name)
    {
        Some(LegendPosition::Top) => LegendPosition::Top,
        _ => LegendPosition::Bottom,
    };
    let legend = if cfg.show_legend.unwrap_or(false) {
        let metrics = LegendMetrics {
            sample: cfg.legend_sample.unwrap_or(LegendMetrics::default().sample),
            ..LegendMetrics::default()
        };
        LegendLayout::new(inside.width().abs(), label_style.clone())
            .with_entries(series.names.iter().enumerate().map(|(i, name)| {
                LegendEntry::new(LegendMarker::Shape(symbol_of(i)), color_of(i), name.clone())
                    .with_stroke(MARKER_STROKE)
            }))
            .with_text_fill(config::color_or(cfg.axis.text_color.as_deref(), css::BLACK))
            .with_align(
                cfg.legend_align
                    .as_deref()
                    .and_then(LegendAlign::from_name)
                    .unwrap_or_default(),
            )
            .with_position(legend_position)
            .with_one_item_per_row(cfg.legend_item_per_row.unwrap_or(false))
            .with_metrics(metrics)
            .layout(&frame.measurer)
    } else {
        Legend::empty()
    };

    let side = x_options
        .and_then(|o| o.position.as_deref())
        .and_then(AxisSide::from_name)
        .unwrap_or_default();
    // Legend band against the inside edge, then the x axis band next to it, then the plot.
    let (legend_box, area) = if legend.is_empty() {
        (None, inside.clone())
    } else if legend_position == LegendPosition::Top {
        let band = LayoutBox::new(
            &inside.top_left(),
            &inside.top_right().below_by(legend.height),
        );
        let rest = LayoutBox::new(&band.bottom_left().below_by(&pad_y), &inside.bottom_right());
        (Some(band), rest)
    } else {
        let band = LayoutBox::new(
            &inside.bottom_left().above_by(legend.height),
            &inside.bottom_right(),
        );
        let rest = LayoutBox::new(&inside.top_left(), &band.top_right().above_by(&pad_y));
        (Some(band), rest)
    };
    let (x_label_box, plot) = match side {
        AxisSide::Top => {
            let band = LayoutBox::new(
                &area.top_left().right_by(y_axis_width),
                &area.top_right().below_by(x_axis_height),
            );
            let plot = LayoutBox::new(&band.bottom_left(), &area.bottom_right());
            (band, plot)
        }
        AxisSide::Bottom => {
            let band = LayoutBox::new(
                &area.bottom_left().right_by(y_axis_width).above_by(x_axis_height),
                &area.bottom_right(),
            );
            let plot = LayoutBox::new(&area.top_left().right_by(y_axis_width), &band.top_right());
            (band, plot)
        }
    };
    let y_label_box = LayoutBox::new(&plot.top_left().left_by(y_axis_width), &plot.bottom_left());

    let x_scale = ScaleLinear::new(x_scale.domain(), (plot.left(), plot.right()));
    let y_scale = ScaleLinear::new(y_scale.domain(), (plot.bottom(), plot.top()));
    let x_ticks = AxisTick::formatted(
        &x_tick_values,
        |v| x_scale.map(v),
        frame.formatter,
        &x_format,
    );
    let y_ticks = AxisTick::formatted(
        &y_tick_values,
        |v| y_scale.map(v),
        frame.formatter,
        &y_format,
    );

    let marker_stroke = StrokeStyle::solid(MARKER_STROKE, line_width * shape_size / 32.0);
    let mut centers = Vec::with_capacity(points.len());
    for p in &points {
        let center = Point::new(x_scale.map(p.x), y_scale.map(p.y));
        centers.push(center);
        marks.push(
            Mark::path(symbol_of(p.series).path(center.x, center.y, shape_size))
                .with_fill(color_of(p.series))
                .with_stroke(marker_stroke.clone())
                .with_z_index(z_order::SERIES_POINTS),
        );
    }

    marks.extend(axis::horizontal_axis_marks(
        &x_ticks,
        plot.to_rect(),
        side,
        &axis_style,
    ));
    marks.extend(axis::value_axis_marks(
        &y_ticks,
        y_label_box.right(),
        plot.right(),
        &axis_style,
        None,
    ));

    if let Some(lb) = &legend_box {
        let origin = lb.top_left().to_point();
        marks.extend(legend.marks(origin));
        if frame.debug() {
            marks.extend(legend.debug_marks(origin));
        }
    }

    log::debug!(
        "scatter: {} points in {} series, x {:?}, y {:?}",
        centers.len(),
        series.len(),
        x_scale.domain(),
        y_scale.domain()
    );

    Ok(Drawn {
        regions: ChartRegions {
            canvas: frame.canvas.clone(),
            chart,
            plot,
            legend: legend_box,
            x_axis: Some(x_label_box),
            y_axis: Some(y_label_box),
            title: title_box,
        },
        marks,
        details: ChartDetails::Scatter(ScatterLayout {
            series: series.names,
            x_ticks,
            y_ticks,
            points: centers,
            legend,
        }),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn unknown_shapes_fall_back_to_the_cycle() {
        assert_eq!(series_symbols(None), Symbol::SERIES_CYCLE.to_vec());
        let names = ["circle".to_string(), "blob".to_string()];
        assert_eq!(series_symbols(Some(&names[..])), [Symbol::Circle]);
        let junk = ["blob".to_string()];
        assert_eq!(series_symbols(Some(&junk[..])), Symbol::SERIES_CYCLE.to_vec());
    }
}
