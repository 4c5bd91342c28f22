// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts.
//!
//! Angles are measured clockwise from 12 o'clock, in radians. The legend is laid out first;
//! the pie then gets the rest of the chart box and the viewport units are re-scoped to it, so
//! radii like `33vmin` are relative to the pie's own box.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Arc, BezPath, Point, Vec2};
use peniko::Color;
use peniko::color::palette::css;
use plotbox_core::{Dimension, LayoutBox, Position};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::config;
use crate::data::Accessor;
use crate::error::RenderError;
use crate::layout::{self, ChartRegions};
use crate::legend::{
    Legend, LegendAlign, LegendEntry, LegendLayout, LegendMarker, LegendMetrics, LegendPosition,
};
use crate::mark::{Mark, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use crate::render::{ChartDetails, Drawn, Frame, PALETTE, vmin};
use crate::z_order;

const DEFAULT_FONT_FAMILY: &str = "sans-serif";
const EPSILON: f64 = 1e-12;

/// One slice's angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Index of the datum in input order.
    pub index: usize,
    /// The datum's value.
    pub value: f64,
    /// Start angle, radians clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
    /// Padding angle shared with the neighbors.
    pub pad_angle: f64,
}

impl PieSlice {
    /// Angle of the slice's middle.
    pub fn mid_angle(&self) -> f64 {
        0.5 * (self.start_angle + self.end_angle)
    }
}

/// Assigns angles to `values`, in input order.
///
/// Larger values are laid out first (ties keep input order), starting at `start_angle` and
/// sweeping at most one full turn to `end_angle`. Negative and non-finite values get an
/// empty slice. Each slice is followed by `pad_angle`, limited so the padding cannot exceed
/// the available sweep.
pub fn pie_slices(
    values: &[f64],
    start_angle: f64,
    end_angle: f64,
    pad_angle: f64,
) -> Vec<PieSlice> {
    let n = values.len();
    let sweep = (end_angle - start_angle).clamp(-TAU, TAU);
    let pad = if n == 0 {
        0.0
    } else {
        (sweep.abs() / n as f64).min(pad_angle.max(0.0))
    };
    let signed_pad = if sweep < 0.0 { -pad } else { pad };
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let sum: f64 = values.iter().map(|&v| clean(v)).sum();
    let k = if sum > 0.0 {
        (sweep - n as f64 * signed_pad) / sum
    } else {
        0.0
    };

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| clean(values[b]).total_cmp(&clean(values[a])));

    let mut slices: Vec<PieSlice> = values
        .iter()
        .enumerate()
        .map(|(index, &value)| PieSlice {
            index,
            value,
            start_angle: 0.0,
            end_angle: 0.0,
            pad_angle: pad,
        })
        .collect();
    let mut a = start_angle;
    for i in order {
        let end = a + clean(values[i]) * k + signed_pad;
        slices[i].start_angle = a;
        slices[i].end_angle = end;
        a = end;
    }
    slices
}

/// Converts a clockwise-from-12 angle to a screen offset of length `r`.
fn polar(center: Point, r: f64, angle: f64) -> Point {
    let t = angle - FRAC_PI_2;
    center + Vec2::new(r * t.cos(), r * t.sin())
}

/// Shrinks `[a0, a1]` symmetrically by the linear gap `pad` leaves at radius `r`.
fn padded_span(a0: f64, a1: f64, r: f64, pad: f64, pad_radius: f64) -> (f64, f64) {
    if pad <= 0.0 || r <= 0.0 {
        return (a0, a1);
    }
    let p = (pad_radius / r * (0.5 * pad).sin()).clamp(-1.0, 1.0).asin();
    let span = (a1 - a0).abs();
    if span - 2.0 * p > EPSILON {
        let dir = if a1 >= a0 { 1.0 } else { -1.0 };
        (a0 + dir * p, a1 - dir * p)
    } else {
        let mid = 0.5 * (a0 + a1);
        (mid, mid)
    }
}

/// Outline of an annular sector.
pub fn arc_path(center: Point, inner: f64, outer: f64, slice: &PieSlice) -> BezPath {
    let (inner, outer) = (inner.min(outer).max(0.0), inner.max(outer));
    let pad_radius = (inner * inner + outer * outer).sqrt();
    let (o0, o1) = padded_span(
        slice.start_angle,
        slice.end_angle,
        outer,
        slice.pad_angle,
        pad_radius,
    );
    let mut path = BezPath::new();
    path.move_to(polar(center, outer, o0));
    let outer_arc = Arc::new(
        center,
        Vec2::new(outer, outer),
        o0 - FRAC_PI_2,
        o1 - o0,
        0.0,
    );
    path.extend(outer_arc.append_iter(0.1));
    if inner > EPSILON {
        let (i0, i1) = padded_span(
            slice.start_angle,
            slice.end_angle,
            inner,
            slice.pad_angle,
            pad_radius,
        );
        path.line_to(polar(center, inner, i1));
        let inner_arc = Arc::new(
            center,
            Vec2::new(inner, inner),
            i1 - FRAC_PI_2,
            i0 - i1,
            0.0,
        );
        path.extend(inner_arc.append_iter(0.1));
    } else {
        path.line_to(center);
    }
    path.close_path();
    path
}

/// Where a slice's label sits relative to its anchor, by the compass octant of the
/// label's direction from the center (counter-clockwise from east, y up).
pub fn label_alignment(octant: u8) -> (TextAnchor, TextBaseline) {
    match octant {
        1 | 2 => (TextAnchor::Middle, TextBaseline::Bottom),
        3 | 4 => (TextAnchor::End, TextBaseline::Middle),
        5 | 6 => (TextAnchor::Middle, TextBaseline::Top),
        _ => (TextAnchor::Start, TextBaseline::Middle),
    }
}

/// Pie chart layout results.
#[derive(Clone, Debug, PartialEq)]
pub struct PieLayout {
    /// Slices in input order.
    pub slices: Vec<PieSlice>,
    /// Pie center.
    pub center: Point,
    /// Hole radius.
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Slice label positions, in input order (empty when labels are off).
    pub label_positions: Vec<Point>,
    /// The legend.
    pub legend: Legend,
}

pub(crate) fn layout(frame: &Frame<'_>) -> Result<Drawn, RenderError> {
    let cfg = frame.config();
    let req = frame.request;

    let label_size = frame.px("labelFontSize", cfg.label_font_size.as_ref(), vmin(5.0))?;
    let legend_size = frame.px("legendFontSize", cfg.legend_font_size.as_ref(), vmin(4.0))?;
    let pad_x = frame.dim("padX", cfg.pad_x.as_ref(), vmin(1.0))?;
    let pad_y = frame.dim("padY", cfg.pad_y.as_ref(), vmin(1.0))?;
    let mut env = frame.env.clone().with_em(label_size);

    let label_style = frame.label_style(label_size, DEFAULT_FONT_FAMILY);
    let legend_family = cfg
        .legend_font_family
        .as_deref()
        .or(cfg.label_font_family.as_deref())
        .unwrap_or(DEFAULT_FONT_FAMILY);
    let legend_style = label_style
        .clone()
        .with_font_size(legend_size)
        .with_family(plotbox_text::FontFamily::from_css_list(legend_family));
    let label_color = config::color_or(cfg.label_color.as_deref(), css::BLACK);

    let value = Accessor::new("value", &req.meta);
    let label = Accessor::new("label", &req.meta);
    let legend_field = Accessor::new("legend", &req.meta);
    let color_field = Accessor::new("color", &req.meta);
    let palette = config::palette_or(cfg.colors.as_deref(), &PALETTE);

    let values: Vec<f64> = req
        .data
        .iter()
        .map(|row| value.number(row).unwrap_or(0.0))
        .collect();
    let colors: Vec<Color> = req
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let fallback = palette[i % palette.len()];
            config::color_or(color_field.text(row).as_deref(), fallback)
        })
        .collect();

    let chart = frame.chart_box(&pad_x, &pad_y, &env);
    let (title_marks, title_box, chart) = frame.title(&chart, &label_style);
    let mut marks = title_marks;

    // Without a legend the pie gets the largest square centered in the chart box.
    let side = 0.5 * chart.width().min(chart.height());
    let middle = chart.center();
    let mut pie_box = LayoutBox::new(
        &middle.left_by(side).above_by(side),
        &middle.right_by(side).below_by(side),
    );
    let mut legend_box = None;
    let legend = if cfg.show_legend.unwrap_or(true) {
        let position = match cfg.legend_position.as_deref().and_then(LegendPosition::from_name) {
            Some(LegendPosition::Top) => LegendPosition::Top,
            Some(LegendPosition::Bottom) | None => LegendPosition::Bottom,
            Some(other) => {
                log::warn!("pie legends go on top or bottom, not {other:?}");
                LegendPosition::Bottom
            }
        };
        let metrics = LegendMetrics {
            sample: cfg.legend_sample.unwrap_or(LegendMetrics::default().sample),
            ..LegendMetrics::default()
        };
        let legend = LegendLayout::new(chart.width(), legend_style)
            .with_entries(req.data.iter().enumerate().map(|(i, row)| {
                let text = legend_field
                    .text(row)
                    .unwrap_or_else(|| format!("Legend {i}"));
                LegendEntry::new(LegendMarker::Box, colors[i], text)
            }))
            .with_text_fill(label_color)
            .with_align(
                cfg.legend_align
                    .as_deref()
                    .and_then(LegendAlign::from_name)
                    .unwrap_or_default(),
            )
            .with_position(position)
            .with_one_item_per_row(cfg.legend_item_per_row.unwrap_or(false))
            .with_metrics(metrics)
            .layout(&frame.measurer);

        let lb = if position == LegendPosition::Top {
            let lb = LayoutBox::new(&chart.top_left(), &chart.top_right().below_by(legend.height));
            pie_box = LayoutBox::new(&lb.bottom_left(), &chart.bottom_right());
            lb
        } else {
            let pie_height = chart.width().min(chart.height() - legend.height);
            pie_box = LayoutBox::new(&chart.top_left(), &chart.top_right().below_by(pie_height));
            LayoutBox::new(&pie_box.bottom_left(), &chart.bottom_right())
        };
        let origin = lb.top_left().to_point();
        marks.extend(legend.marks(origin));
        if frame.debug() {
            marks.push(layout::outline(lb.to_rect(), css::WHITE));
        }
        legend_box = Some(lb);
        legend
    } else {
        Legend::empty()
    };
    env = env.with_viewport(pie_box.width(), pie_box.height());
    let pie_box = pie_box.resolve(&env);

    let resolve = |field: &'static str, spec: Option<&config::DimensionSpec>, default: Dimension| {
        frame.dim(field, spec, default).map(|d| d.value(&env))
    };
    let inner = resolve("innerRadius", cfg.inner_radius.as_ref(), vmin(25.0))?;
    let outer = resolve("outerRadius", cfg.outer_radius.as_ref(), vmin(33.0))?;
    let corner_radius = resolve("cornerRadius", cfg.corner_radius.as_ref(), Dimension::px(0.0))?;
    let line_width = resolve("lineWidth", cfg.line_width.as_ref(), Dimension::px(0.0))?;
    let pad_angle = resolve("padAngle", cfg.pad_angle.as_ref(), Dimension::px(0.0))?;
    let start_angle = resolve("startAngle", cfg.start_angle.as_ref(), Dimension::px(0.0))?;
    if corner_radius > 0.0 {
        log::debug!("pie corner radius {corner_radius} is not drawn");
    }

    let stroke = config::color_or(
        cfg.stroke.as_ref().and_then(|s| s.first()).map(String::as_str),
        css::WHITE,
    );
    let center = pie_box.center().to_point();
    let slices = pie_slices(&values, start_angle, TAU, pad_angle);

    let show_labels = cfg.show_labels.unwrap_or(true);
    let show_label_debug = cfg.show_label_debug.unwrap_or(false);
    let mut label_positions = Vec::new();
    for slice in &slices {
        let mut mark = Mark::path(arc_path(center, inner, outer, slice))
            .with_fill(colors[slice.index])
            .with_z_index(z_order::SERIES_FILL);
        if line_width > 0.0 {
            mark = mark.with_stroke(StrokeStyle::solid(stroke, line_width));
        }
        marks.push(mark);

        if !show_labels {
            continue;
        }
        // Centroid relative to the center, with y pointing up for the octant.
        let centroid = polar(Point::ZERO, 0.5 * (inner + outer), slice.mid_angle());
        let dir = Position::new(centroid.x, -centroid.y);
        let at = |r: f64| {
            let p = dir.with_length(Dimension::px(r));
            center + Vec2::new(p.x(), -p.y())
        };
        if show_label_debug {
            marks.push(
                Mark::line(
                    center + centroid.to_vec2(),
                    at(outer * 1.1),
                    StrokeStyle::solid(Color::from_rgb8(0x44, 0x44, 0x44), 2.0),
                )
                .with_z_index(z_order::DEBUG),
            );
        }
        let pos = at(outer * 1.2);
        let (anchor, baseline) = label_alignment(dir.octant());
        let text = req
            .data
            .get(slice.index)
            .and_then(|row| label.text(row))
            .unwrap_or_else(|| format!("Label {}", slice.index));
        marks.push(
            Mark::text(
                TextMark::new(pos, text, label_style.clone())
                    .with_fill(label_color)
                    .with_align(anchor, baseline),
            )
            .with_z_index(z_order::DATA_LABELS),
        );
        label_positions.push(pos);
    }

    if cfg.show_center.unwrap_or(false) {
        let cross = StrokeStyle::solid(css::BLACK, 3.0);
        for (from, to) in [
            (Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0)),
            (Vec2::new(0.0, -20.0), Vec2::new(0.0, 20.0)),
        ] {
            marks.push(
                Mark::line(center + from, center + to, cross.clone()).with_z_index(z_order::DEBUG),
            );
        }
    }

    log::debug!(
        "pie: {} slices, center {center:?}, radii {inner}..{outer}",
        slices.len()
    );

    Ok(Drawn {
        regions: ChartRegions {
            canvas: frame.canvas.clone(),
            chart,
            plot: pie_box,
            legend: legend_box,
            x_axis: None,
            y_axis: None,
            title: title_box,
        },
        marks,
        details: ChartDetails::Pie(PieLayout {
            slices,
            center,
            inner_radius: inner,
            outer_radius: outer,
            label_positions,
            legend,
        }),
    })
}
