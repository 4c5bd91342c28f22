// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bar charts.
//!
//! Rows are grouped by their `label` field along x; within a group there is one bar per
//! `category` (series). Values go up a linear scale starting at zero. Group labels are wrapped
//! to their band and, if they still collide, the whole row of labels is tilted.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::{Dimension, LayoutBox};
use plotbox_text::TextMeasurer;

use crate::axis::{self, AxisTick};
use crate::config::{self, AxisOptions};
use crate::data::{Accessor, Ordinal};
use crate::error::RenderError;
use crate::labels::{self, LabelBlock};
use crate::layout::{self, ChartRegions};
use crate::legend::{
    Legend, LegendAlign, LegendEntry, LegendLayout, LegendMarker, LegendMetrics, LegendPosition,
};
use crate::mark::{Mark, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::render::{ChartDetails, Drawn, Frame, PALETTE, vmin};
use crate::scale::{ScaleBand, ScaleLinear};
use crate::z_order;

const DEFAULT_FONT_FAMILY: &str = "Helvetica,\"sans-serif\"";

/// Bar chart layout results.
#[derive(Clone, Debug, PartialEq)]
pub struct BarLayout {
    /// Group labels, in first-seen order.
    pub groups: Vec<String>,
    /// Series names, in first-seen order.
    pub series: Vec<String>,
    /// Value axis ticks (y in pixels).
    pub value_ticks: Vec<AxisTick>,
    /// Shared group label rotation, whole degrees counter-clockwise.
    pub label_rotation: u32,
    /// Font size of the value labels above the bars.
    pub value_font_size: f64,
    /// One rectangle per drawn row, in row order.
    pub bars: Vec<Rect>,
    /// The legend.
    pub legend: Legend,
}

/// Extra offset of the last group so that it stands apart by `extra` inner paddings.
///
/// `width` is the span of the group scale, `n` the number of groups and `padding` the inner
/// padding ratio.
pub fn last_group_correction(width: f64, n: usize, padding: f64, extra: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let denom = n + padding * (n - 1.0 + extra);
    if denom <= 0.0 {
        return 0.0;
    }
    width / denom * padding * extra
}

struct BarRow {
    value: f64,
    group: usize,
    series: usize,
}

pub(crate) fn layout(frame: &Frame<'_>) -> Result<Drawn, RenderError> {
    let cfg = frame.config();
    let req = frame.request;

    let pad_x = frame.dim("padX", cfg.pad_x.as_ref(), vmin(2.0))?;
    let pad_y = frame.dim("padY", cfg.pad_y.as_ref(), pad_x.clone())?;
    let font_size = frame.px("labelFontSize", cfg.label_font_size.as_ref(), vmin(2.5))?;
    let tick = frame.px("tickLength", cfg.tick_length.as_ref(), vmin(1.5))?;
    let env = frame.env.clone().with_em(font_size);

    let label_padding = cfg.label_padding.unwrap_or(0.4);
    let label_outer_padding = cfg.label_outer_padding.unwrap_or(0.0);
    let extra_factor = cfg.last_label_extra_padding_factor.unwrap_or(0.0);
    let category_padding = cfg.category_padding.unwrap_or(0.1);

    let value = Accessor::new("value", &req.meta);
    let category = Accessor::new("category", &req.meta);
    let label = Accessor::new("label", &req.meta);

    let mut groups = Ordinal::default();
    let mut series = Ordinal::default();
    let mut rows = Vec::with_capacity(req.data.len());
    for row in &req.data {
        let Some(v) = value.number(row) else {
            continue;
        };
        let g = groups.insert(label.text(row).unwrap_or_default());
        let s = series.insert(category.text(row).unwrap_or_default());
        rows.push(BarRow {
            value: v,
            group: g,
            series: s,
        });
    }
    // An all-zero chart still needs a unit domain, otherwise zero maps mid-plot.
    let max_value = rows.iter().map(|r| r.value).fold(0.0, f64::max);
    let max_value = if max_value > 0.0 { max_value } else { 1.0 };

    let label_style = frame.label_style(font_size, DEFAULT_FONT_FAMILY);
    let axis_style = frame.axis_style(label_style.clone(), tick)?;
    let format = cfg.number_format(cfg.value_axis.as_ref());
    let tick_count = AxisOptions::tick_count_or(cfg.value_axis.as_ref(), 3);
    let nice = cfg.value_axis.as_ref().and_then(|a| a.nice).unwrap_or(true);

    let mut value_scale = ScaleLinear::new((0.0, max_value), (0.0, 1.0));
    if nice {
        value_scale = value_scale.nice(tick_count);
    }
    let tick_values = value_scale.ticks(tick_count);
    let sizing_ticks = AxisTick::formatted(&tick_values, |v| v, frame.formatter, &format);
    let value_axis_width = axis::value_axis_width(&sizing_ticks, &axis_style, &frame.measurer);

    let chart = frame.chart_box(&pad_x, &pad_y, &env);
    let (title_marks, title_box, chart) = frame.title(&chart, &label_style);

    let colors: Vec<Color> = frame.series_colors(&PALETTE);
    let legend_position = cfg
        .legend_position
        .as_deref()
        .and_then(LegendPosition::from_name)
        .unwrap_or(LegendPosition::Bottom);
    let legend_min_width = frame.px("legendWidth", cfg.legend_width.as_ref(), Dimension::px(0.0))?;
    let anchor_bottom = cfg.legend_anchor.as_deref() == Some("bottom");
    let legend = if cfg.show_legend.unwrap_or(true) {
        let metrics = LegendMetrics {
            sample: cfg.legend_sample.unwrap_or(LegendMetrics::default().sample),
            ..LegendMetrics::default()
        };
        LegendLayout::new(chart.width(), label_style.clone())
            .with_entries(series.names.iter().enumerate().map(|(i, name)| {
                LegendEntry::new(LegendMarker::Box, colors[i % colors.len()], name.clone())
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
            .with_fixed_cross_size(Some(legend_min_width))
            .with_anchor_bottom(anchor_bottom)
            .with_metrics(metrics)
            .layout(&frame.measurer)
    } else {
        Legend::empty()
    };

    // The legend takes a band off one side of the chart box; the rest is `area`.
    let (legend_band, area) = if legend.is_empty() {
        (None, chart.clone())
    } else {
        let (w, h) = (legend.width, legend.height);
        let (band, rest) = match legend_position {
            LegendPosition::Top => {
                let band = LayoutBox::new(&chart.top_left(), &chart.top_right().below_by(h));
                let rest = LayoutBox::new(&band.bottom_left(), &chart.bottom_right());
                (band, rest)
            }
            LegendPosition::Bottom => {
                let band = LayoutBox::new(&chart.bottom_left().above_by(h), &chart.bottom_right());
                let rest = LayoutBox::new(&chart.top_left(), &band.top_right());
                (band, rest)
            }
            LegendPosition::Left => {
                let band = LayoutBox::new(&chart.top_left(), &chart.bottom_left().right_by(w));
                let rest =
                    LayoutBox::new(&band.top_right().right_by(&pad_x), &chart.bottom_right());
                (band, rest)
            }
            LegendPosition::Right => {
                let band = LayoutBox::new(&chart.top_right().left_by(w), &chart.bottom_right());
                let rest = LayoutBox::new(&chart.top_left(), &band.bottom_left().left_by(&pad_x));
                (band, rest)
            }
        };
        (Some(band), rest)
    };

    let label_text_height = frame.measurer.measure("X", label_style.clone()).height();

    let plot_left = area.left() + value_axis_width;
    let n_groups = groups.len();
    let last_corr =
        last_group_correction(area.right() - plot_left, n_groups, label_padding, extra_factor);
    let label_scale = ScaleBand::new((plot_left, area.right() - last_corr), n_groups)
        .with_padding_inner(label_padding)
        .with_padding_outer(label_outer_padding);
    let category_scale = ScaleBand::new((0.0, label_scale.bandwidth()), series.len())
        .with_padding_inner(category_padding);

    let step = label_scale.step();
    let blocks: Vec<LabelBlock> = groups
        .names
        .iter()
        .map(|g| LabelBlock::layout(g, &label_style, step, &frame.measurer))
        .collect();
    let sizes: Vec<(f64, f64)> = blocks.iter().map(|b| (b.width, b.height)).collect();
    let angled = value_axis_width + step * label_outer_padding + 0.5 * label_scale.bandwidth();
    let rotation = labels::resolve_axis_rotation(&sizes, step, angled);
    let angle = f64::from(rotation).to_radians();
    let max_group_label_height = blocks
        .iter()
        .map(|b| b.rotated_extent(angle).1)
        .fold(0.0, f64::max);

    let corner = area
        .bottom_left()
        .right_by(value_axis_width)
        .above_by(max_group_label_height + 2.0 * label_text_height);
    let y_label_box = LayoutBox::new(&area.top_left(), &corner);
    let plot = LayoutBox::new(&corner, &area.top_right().below_by(label_text_height));
    let x_label_box = LayoutBox::new(&plot.bottom_left(), &area.bottom_right());

    // Side legends line up with the top or the bottom of the plot.
    let legend_box = legend_band.map(|band| {
        if !legend_position.is_vertical() {
            return band;
        }
        let top_left = if anchor_bottom {
            band.top_left().below_by(plot.bottom() - band.top() - legend.height)
        } else {
            band.top_left().below_by(plot.top() - band.top())
        };
        LayoutBox::new(
            &top_left,
            &top_left.right_by(legend.width).below_by(legend.height),
        )
    });

    let value_scale = ScaleLinear::new(value_scale.domain(), (plot.bottom(), plot.top()));
    let value_ticks = AxisTick::formatted(
        &tick_values,
        |v| value_scale.map(v),
        frame.formatter,
        &format,
    );

    let mut marks = title_marks;
    if let Some(legend_box) = &legend_box {
        let origin = legend_box.top_left().to_point();
        marks.extend(legend.marks(origin));
        if frame.debug() {
            marks.extend(legend.debug_marks(origin));
        }
    }
    marks.extend(axis::value_axis_marks(
        &value_ticks,
        y_label_box.right(),
        plot.right(),
        &axis_style,
        None,
    ));

    let group_x = |g: usize| {
        let corr = if g + 1 == n_groups { last_corr } else { 0.0 };
        label_scale.x(g) + corr
    };

    let value_labels: Vec<String> = rows
        .iter()
        .map(|r| frame.formatter.format(r.value, &format))
        .collect();
    let value_font_size = labels::fit_font_size(
        &value_labels,
        &label_style,
        category_scale.bandwidth() * (1.0 + category_padding),
        &frame.measurer,
    );
    let value_style = label_style.clone().with_font_size(value_font_size);

    let axis_y = plot.bottom();
    let mut bars = Vec::with_capacity(rows.len());
    for (row, text) in rows.iter().zip(value_labels) {
        let x = group_x(row.group) + category_scale.x(row.series);
        let top = value_scale.map(row.value);
        let width = category_scale.bandwidth();
        let rect = Rect::new(x, top, x + width, axis_y);
        bars.push(rect);
        marks.push(
            Mark::filled_rect(rect, colors[row.series % colors.len()])
                .with_z_index(z_order::SERIES_FILL),
        );
        marks.push(
            Mark::text(
                TextMark::new(Point::new(x + 0.5 * width, top), text, value_style.clone())
                    .with_fill(axis_style.label_fill.clone())
                    .with_align(TextAnchor::Middle, TextBaseline::Bottom),
            )
            .with_z_index(z_order::DATA_LABELS),
        );
    }

    let label_top = axis_y + label_text_height;
    for (g, block) in blocks.iter().enumerate() {
        let anchor = Point::new(group_x(g) + 0.5 * label_scale.bandwidth(), label_top);
        let center = labels::rotated_label_center(anchor, block.width, block.height, angle);
        marks.extend(
            block
                .text_marks(center, angle, &label_style, &axis_style.label_fill)
                .into_iter()
                .map(|t| Mark::text(t).with_z_index(z_order::AXIS_LABELS)),
        );
        if frame.debug() {
            marks.push(
                Mark::path(labels::label_outline(center, block.width, block.height, angle))
                    .with_stroke(StrokeStyle::solid(css::LIME, 1.0))
                    .with_z_index(z_order::DEBUG),
            );
        }
    }
    if frame.debug() {
        let marker = Rect::new(
            area.left(),
            corner.y(),
            area.left() + angled,
            corner.y() + 10.0,
        );
        marks.push(layout::outline(marker, css::RED));
    }

    log::debug!(
        "bar: {} groups x {} series, value axis {value_axis_width}px, labels at {rotation}°",
        n_groups,
        series.len()
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
        details: ChartDetails::Bar(BarLayout {
            groups: groups.names,
            series: series.names,
            value_ticks,
            label_rotation: rotation,
            value_font_size,
            bars,
            legend,
        }),
    })
}
