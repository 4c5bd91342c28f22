// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line charts over time.
//!
//! One line per value field (the `value` entry of `meta` may list several), drawn against the
//! `timestamp` field. The legend sits on the opposite side of the time axis and is carved out
//! of the value range rather than the plot box, so lines never run under it.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::{Dimension, LayoutBox};
use plotbox_text::TextMeasurer;
use smallvec::SmallVec;

use crate::axis::{self, AxisSide, AxisTick};
use crate::config::{self, AxisOptions};
use crate::data::{Accessor, Row};
use crate::error::RenderError;
use crate::layout::{self, ChartRegions};
use crate::legend::{
    Legend, LegendAlign, LegendEntry, LegendLayout, LegendMarker, LegendMetrics, LegendPosition,
};
use crate::mark::{Mark, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::render::{ChartDetails, Drawn, Frame, PALETTE, vmin};
use crate::scale::{self, ScaleLinear};
use crate::time::{self, TimeInterval, TimeTicks};
use crate::z_order;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const DEFAULT_FONT_FAMILY: &str = "Helvetica,\"sans-serif\"";

/// Timeline layout results.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineLayout {
    /// Time axis ticks (x in pixels).
    pub time_ticks: Vec<AxisTick>,
    /// Value axis ticks (y in pixels); ticks inside the reference box are not drawn.
    pub value_ticks: Vec<AxisTick>,
    /// Reference value rule and label footprint, if configured.
    pub reference_box: Option<Rect>,
    /// Number of lines.
    pub series: usize,
    /// The legend.
    pub legend: Legend,
}

/// A polyline through `points`, broken wherever a point is missing.
pub fn broken_line(points: impl IntoIterator<Item = Option<Point>>) -> BezPath {
    let mut path = BezPath::new();
    let mut pen_down = false;
    for p in points {
        match p {
            Some(p) if pen_down => path.line_to(p),
            Some(p) => {
                path.move_to(p);
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path
}

/// The time tick request for the main axis options.
fn time_tick_request(options: Option<&AxisOptions>) -> TimeTicks {
    if let Some(name) = options.and_then(|o| o.tick_interval.as_deref()) {
        match TimeInterval::from_name(name) {
            Some(interval) => return TimeTicks::Every(interval),
            None => log::warn!("unknown tick interval {name:?}, using a tick count"),
        }
    }
    TimeTicks::Count(AxisOptions::tick_count_or(options, 5))
}

pub(crate) fn layout(frame: &Frame<'_>) -> Result<Drawn, RenderError> {
    let cfg = frame.config();
    let req = frame.request;

    let pad_x = frame.dim("padX", cfg.pad_x.as_ref(), vmin(2.0))?;
    let pad_y = frame.dim("padY", cfg.pad_y.as_ref(), pad_x.clone())?;
    let font_size = frame.px("labelFontSize", cfg.label_font_size.as_ref(), vmin(2.5))?;
    let tick = frame.px("tickLength", cfg.tick_length.as_ref(), vmin(1.5))?;
    let line_width = frame.px("lineWidth", cfg.line_width.as_ref(), Dimension::px(2.0))?;
    let env = frame.env.clone().with_em(font_size);

    let timestamp = Accessor::new("timestamp", &req.meta);
    let series: SmallVec<[Accessor; 4]> =
        Accessor::many("value", &req.meta).into_iter().collect();
    let rows: Vec<(f64, &Row)> = req
        .data
        .iter()
        .filter_map(|row| Some((timestamp.timestamp(row)?, row)))
        .collect();

    let reference = cfg.axis.reference_value.filter(|v| v.is_finite());
    let time_domain = scale::padded_extent(rows.iter().map(|(t, _)| *t), 0.0);
    let value_domain = scale::padded_extent(
        rows.iter()
            .flat_map(|&(_, row)| series.iter().filter_map(move |s| s.number(row)))
            .chain(reference),
        0.0,
    );

    let value_options = cfg.value_axis.as_ref();
    let value_count = AxisOptions::tick_count_or(value_options, 3);
    let format = cfg.number_format(value_options);
    let mut value_scale = ScaleLinear::new(value_domain, (0.0, 1.0));
    if value_options.and_then(|o| o.nice).unwrap_or(false) {
        value_scale = value_scale.nice(value_count);
    }
    let value_tick_values = value_scale.ticks(value_count);
    let time_tick_values = frame.time_ticks.ticks(
        time_domain.0,
        time_domain.1,
        time_tick_request(cfg.main_axis.as_ref()),
    );
    let months: &[String] = cfg.months.as_deref().unwrap_or_default();
    let time_labels: Vec<String> = time_tick_values
        .iter()
        .map(|&t| time::date_label(t, months))
        .collect();

    let label_style = frame.label_style(font_size, DEFAULT_FONT_FAMILY);
    let axis_style = frame.axis_style(label_style.clone(), tick)?;
    let value_sizing = AxisTick::formatted(&value_tick_values, |v| v, frame.formatter, &format);
    let value_axis_width = axis::value_axis_width(&value_sizing, &axis_style, &frame.measurer);
    let time_axis_height = axis::max_label_height(&time_labels, &label_style, &frame.measurer)
        + 2.0 * tick;

    let chart = frame.chart_box(&pad_x, &pad_y, &env);
    let (mut marks, title_box, chart) = frame.title(&chart, &label_style);

    let side = cfg
        .time_axis
        .as_ref()
        .and_then(|o| o.position.as_deref())
        .and_then(AxisSide::from_name)
        .unwrap_or_default();
    let (x_label_box, y_label_box, plot, legend_position) = match side {
        AxisSide::Top => {
            let corner = chart
                .top_left()
                .right_by(value_axis_width)
                .below_by(time_axis_height);
            (
                LayoutBox::new(&corner, &chart.top_right()),
                LayoutBox::new(&chart.bottom_left(), &corner),
                LayoutBox::new(&corner, &chart.bottom_right()),
                LegendPosition::Bottom,
            )
        }
        AxisSide::Bottom => {
            let corner = chart
                .bottom_left()
                .right_by(value_axis_width)
                .above_by(time_axis_height);
            (
                LayoutBox::new(&corner, &chart.bottom_right()),
                LayoutBox::new(&chart.top_left(), &corner),
                LayoutBox::new(&corner, &chart.top_right()),
                LegendPosition::Top,
            )
        }
    };

    let colors = frame.series_colors(&PALETTE);
    let color_of = |i: usize| -> Color { colors[i % colors.len()] };
    let series_labels: Vec<String> = cfg
        .series_label
        .as_ref()
        .map(config::OneOrMany::to_vec)
        .unwrap_or_default();
    let legend = if cfg.show_legend.unwrap_or(false) && !series_labels.is_empty() {
        let metrics = LegendMetrics {
            sample: cfg.legend_sample.unwrap_or(LegendMetrics::default().sample),
            ..LegendMetrics::default()
        };
        LegendLayout::new(plot.width().abs(), label_style.clone())
            .with_entries(series.iter().enumerate().map(|(i, s)| {
                let text = series_labels
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| s.field().to_string());
                LegendEntry::new(LegendMarker::Line, color_of(i), text)
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

    let value_range = match legend_position {
        LegendPosition::Bottom => (plot.bottom() - legend.height, plot.top()),
        _ => (plot.bottom(), plot.top() + legend.height),
    };
    let value_scale = ScaleLinear::new(value_scale.domain(), value_range);
    let time_scale = ScaleLinear::new(time_domain, (plot.left(), plot.right()));

    for (i, s) in series.iter().enumerate() {
        let path = broken_line(rows.iter().map(|(t, row)| {
            s.number(row)
                .map(|v| Point::new(time_scale.map(*t), value_scale.map(v)))
        }));
        marks.push(
            Mark::path(path)
                .with_stroke(StrokeStyle::solid(color_of(i), line_width))
                .with_z_index(z_order::SERIES_STROKE),
        );
    }

    let time_ticks: Vec<AxisTick> = time_tick_values
        .iter()
        .zip(time_labels)
        .map(|(&t, label)| AxisTick {
            pos: time_scale.map(t),
            label,
        })
        .collect();
    marks.extend(axis::horizontal_axis_marks(
        &time_ticks,
        plot.to_rect(),
        side,
        &axis_style,
    ));

    let label_right = y_label_box.right();
    let reference_box = reference.map(|r| {
        let y = value_scale.map(r);
        let text = frame.formatter.format(r, &format);
        let metrics = frame.measurer.measure(&text, label_style.clone());
        let rounded = y.round();
        let stroke = config::color_or(cfg.axis.reference_stroke.as_deref(), axis::RULE_COLOR);
        marks.push(
            Mark::line(
                Point::new(label_right - tick, rounded),
                Point::new(plot.right(), rounded),
                StrokeStyle::solid(stroke, axis_style.rule.stroke_width),
            )
            .with_z_index(z_order::AXIS_RULES),
        );
        marks.push(
            Mark::text(
                TextMark::new(
                    Point::new(label_right - 2.0 * tick, y),
                    text,
                    label_style.clone(),
                )
                .with_fill(axis_style.label_fill.clone())
                .with_align(TextAnchor::End, TextBaseline::Middle),
            )
            .with_z_index(z_order::AXIS_LABELS),
        );
        Rect::new(
            y_label_box.left(),
            rounded - metrics.ascent,
            plot.right(),
            rounded + metrics.descent,
        )
    });
    let value_ticks = AxisTick::formatted(
        &value_tick_values,
        |v| value_scale.map(v),
        frame.formatter,
        &format,
    );
    marks.extend(axis::value_axis_marks(
        &value_ticks,
        label_right,
        plot.right(),
        &axis_style,
        reference_box.map(|b| (b.y0, b.y1)),
    ));
    if let Some(b) = reference_box.filter(|_| frame.debug()) {
        marks.push(layout::outline(b, css::RED));
    }

    let legend_box = (!legend.is_empty()).then(|| {
        let top_left = match legend_position {
            LegendPosition::Bottom => plot.bottom_left().above_by(legend.height),
            _ => plot.top_left(),
        };
        let bottom_right = top_left.right_by(legend.width).below_by(legend.height);
        LayoutBox::new(&top_left, &bottom_right)
    });
    if let Some(lb) = &legend_box {
        let origin = lb.top_left().to_point();
        marks.extend(legend.marks(origin));
        if frame.debug() {
            marks.extend(legend.debug_marks(origin));
        }
    }

    log::debug!(
        "timeline: {} series over {} rows, {} time ticks, values {:?}",
        series.len(),
        rows.len(),
        time_ticks.len(),
        value_scale.domain()
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
        details: ChartDetails::Timeline(TimelineLayout {
            time_ticks,
            value_ticks,
            reference_box,
            series: series.len(),
            legend,
        }),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::PathEl;

    use super::*;

    #[test]
    fn missing_values_break_the_line() {
        let path = broken_line([
            Some(Point::new(0.0, 0.0)),
            Some(Point::new(1.0, 1.0)),
            None,
            Some(Point::new(3.0, 3.0)),
            Some(Point::new(4.0, 4.0)),
        ]);
        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
        assert_eq!(path.elements().len(), 4);
    }

    #[test]
    fn tick_interval_wins_over_count() {
        let options = AxisOptions {
            tick_interval: Some("quarter".into()),
            tick_count: Some(9),
            ..AxisOptions::default()
        };
        assert_eq!(
            time_tick_request(Some(&options)),
            TimeTicks::Every(TimeInterval::Quarter)
        );
        let unknown = AxisOptions {
            tick_interval: Some("fortnight".into()),
            ..AxisOptions::default()
        };
        assert_eq!(time_tick_request(Some(&unknown)), TimeTicks::Count(5));
        assert_eq!(time_tick_request(None), TimeTicks::Count(5));
    }
}
