// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end layout checks through [`render`].

extern crate std;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::f64::consts::TAU;

use plotbox_core::DimensionParseError;
use plotbox_text::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};

use crate::{
    ChartDetails, ChartKind, ChartOutput, ChartRequest, RenderContext, RenderError,
    RenderOptions, render, z_order,
};

fn request(json: &str) -> ChartRequest {
    serde_json::from_str(json).unwrap()
}

fn render_heuristic(kind: ChartKind, json: &str) -> Result<ChartOutput, RenderError> {
    render(
        kind,
        &request(json),
        &RenderContext::new(&HeuristicTextMeasurer),
    )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn texts(output: &ChartOutput) -> Vec<&str> {
    output
        .marks
        .iter()
        .filter_map(|m| m.as_text())
        .map(|t| t.text.as_str())
        .collect()
}

const BAR: &str = r#"{
    "chart": {"width": 800, "height": 400, "padX": 20, "padY": 20},
    "data": [
        {"label": "Q1", "category": "2023", "value": 40},
        {"label": "Q1", "category": "2024", "value": 55},
        {"label": "Q2", "category": "2023", "value": 70},
        {"label": "Q2", "category": "2024", "value": 100},
        {"label": "Q3", "category": "2023", "value": 20},
        {"label": "Q3", "category": "2024", "value": 35},
        {"label": "Q4", "category": "2023", "value": 90},
        {"label": "Q4", "category": "2024", "value": 60}
    ]
}"#;

#[test]
fn bar_plot_spans_the_chart_minus_the_value_axis() {
    let out = render_heuristic(ChartKind::Bar, BAR).unwrap();
    let ChartDetails::Bar(bar) = &out.details else {
        panic!("expected bar details");
    };
    assert_eq!(bar.groups, ["Q1", "Q2", "Q3", "Q4"]);
    assert_eq!(bar.series, ["2023", "2024"]);
    assert_eq!(bar.bars.len(), 8);

    let labels: Vec<&str> = bar.value_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["0,00", "50,00", "100,00"]);

    // 10px labels (2.5vmin of 400), 6px ticks: "100,00" is 36px wide, plus two ticks.
    let value_axis_width = 36.0 + 12.0;
    assert!(close(out.regions.chart.width(), 760.0));
    assert!(close(out.regions.plot.width(), 760.0 - value_axis_width));
    assert!(close(out.regions.plot.left(), 20.0 + value_axis_width));

    // The tallest bar reaches the top of the value scale.
    assert!(close(bar.bars[3].y0, out.regions.plot.top()));
    assert!(bar.bars.iter().all(|b| close(b.y1, out.regions.plot.bottom())));
    assert!(out.regions.legend.is_some());
}

#[test]
fn pie_thirds_start_at_twelve_o_clock() {
    let out = render_heuristic(
        ChartKind::Pie,
        r#"{
            "chart": {"width": 600, "height": 600},
            "data": [
                {"value": 1, "label": "a"},
                {"value": 1, "label": "b"},
                {"value": 1, "label": "c"}
            ]
        }"#,
    )
    .unwrap();
    let ChartDetails::Pie(pie) = &out.details else {
        panic!("expected pie details");
    };
    let starts: Vec<f64> = pie.slices.iter().map(|s| s.start_angle).collect();
    assert!(close(starts[0], 0.0));
    assert!(close(starts[1], TAU / 3.0));
    assert!(close(starts[2], 2.0 * TAU / 3.0));
    assert!(pie
        .slices
        .iter()
        .all(|s| close(s.end_angle - s.start_angle, TAU / 3.0)));
    assert!(pie.inner_radius < pie.outer_radius);
    assert_eq!(pie.label_positions.len(), 3);
    assert_eq!(pie.legend.entries.len(), 3);
    assert!(texts(&out).contains(&"b"));

    let plot = out.regions.plot.to_rect();
    assert!(plot.contains(pie.center));
}

#[test]
fn pie_reads_aliased_fields_and_lenient_flags() {
    let out = render_heuristic(
        ChartKind::Pie,
        r#"{
            "chart": {"width": 400, "height": 400, "showLegend": "false", "showLabels": 0},
            "meta": {"value": "amount"},
            "data": [{"amount": "3"}, {"amount": 1}]
        }"#,
    )
    .unwrap();
    let ChartDetails::Pie(pie) = &out.details else {
        panic!("expected pie details");
    };
    assert_eq!(pie.slices[0].value, 3.0);
    assert!(close(pie.slices[0].end_angle, TAU * 0.75));
    assert!(pie.legend.is_empty());
    assert!(out.regions.legend.is_none());
    assert!(pie.label_positions.is_empty());
}

#[test]
fn scatter_legend_puts_one_series_per_row() {
    let out = render_heuristic(
        ChartKind::Scatter,
        r#"{
            "chart": {
                "width": 800, "height": 600,
                "showLegend": true, "legendItemPerRow": true
            },
            "data": [
                {"xValue": 1, "yValue": 2, "label": "north"},
                {"xValue": 2, "yValue": 4, "label": "south"},
                {"xValue": 3, "yValue": 1, "label": "east"}
            ]
        }"#,
    )
    .unwrap();
    let ChartDetails::Scatter(scatter) = &out.details else {
        panic!("expected scatter details");
    };
    assert_eq!(scatter.series, ["north", "south", "east"]);
    assert_eq!(scatter.legend.rows, 3);
    assert_eq!(scatter.points.len(), 3);
    let plot = out.regions.plot.to_rect();
    assert!(scatter.points.iter().all(|p| plot.contains(*p)));
    assert!(!scatter.x_ticks.is_empty());
    assert!(!scatter.y_ticks.is_empty());
}

#[test]
fn scatter_groups_rows_by_series_field() {
    let out = render_heuristic(
        ChartKind::Scatter,
        r#"{
            "chart": {"width": 400, "height": 300},
            "data": [
                {"xValue": 1, "yValue": 2, "series": "a"},
                {"xValue": 2, "yValue": 4, "series": "b"},
                {"xValue": 3, "yValue": 1, "series": "a"}
            ]
        }"#,
    )
    .unwrap();
    let ChartDetails::Scatter(scatter) = &out.details else {
        panic!("expected scatter details");
    };
    assert_eq!(scatter.series, ["a", "b"]);
    assert!(scatter.legend.is_empty());
}

const TIMELINE: &str = r#"{
    "chart": {
        "width": 800, "height": 400,
        "showLegend": true, "seriesLabel": ["Alpha", "Beta"],
        "axis": {"referenceValue": 50}
    },
    "meta": {"value": ["a", "b"]},
    "data": [
        {"timestamp": "2021-01-01T00:00:00Z", "a": 0, "b": 10},
        {"timestamp": "2021-04-01T00:00:00Z", "a": 40, "b": 30},
        {"timestamp": "2021-07-01T00:00:00Z", "a": 100},
        {"timestamp": "2021-10-01T00:00:00Z", "a": 80, "b": 60}
    ]
}"#;

#[test]
fn timeline_reference_value_hides_colliding_ticks() {
    let out = render_heuristic(ChartKind::Timeline, TIMELINE).unwrap();
    let ChartDetails::Timeline(timeline) = &out.details else {
        panic!("expected timeline details");
    };
    assert_eq!(timeline.series, 2);
    let labels: Vec<&str> = timeline.value_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["0,00", "50,00", "100,00"]);

    // The reference label replaces the tick label at the same height.
    let fifty = texts(&out).iter().filter(|t| **t == "50,00").count();
    assert_eq!(fifty, 1);
    assert!(timeline.reference_box.is_some());

    // Time axis at the bottom, legend at the top of the plot.
    let legend = out.regions.legend.as_ref().unwrap();
    assert!(close(legend.top(), out.regions.plot.top()));
    assert_eq!(timeline.legend.entries.len(), 2);
    assert!(texts(&out).contains(&"Alpha"));
    assert!(timeline.time_ticks.iter().any(|t| t.label == "Jan 21"));
}

#[test]
fn timeline_tick_interval_uses_calendar_boundaries() {
    let out = render_heuristic(
        ChartKind::Timeline,
        r#"{
            "chart": {"mainAxis": {"tickInterval": "quarter"}, "months": ["Jän"]},
            "data": [
                {"timestamp": 1609459200000, "value": 1},
                {"timestamp": 1640995200000, "value": 2}
            ]
        }"#,
    )
    .unwrap();
    let ChartDetails::Timeline(timeline) = &out.details else {
        panic!("expected timeline details");
    };
    let labels: Vec<&str> = timeline.time_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["Jän 21", "Apr 21", "Jul 21", "Oct 21", "Jän 22"]);
}

#[test]
fn unusable_canvases_are_rejected() {
    let err = render_heuristic(ChartKind::Bar, r#"{"chart": {"width": -5, "height": 100}}"#)
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::InvalidCanvas {
            width: -5.0,
            height: 100.0
        }
    );

    let err = render_heuristic(ChartKind::Pie, r#"{"chart": {"width": 5000, "height": 5000}}"#)
        .unwrap_err();
    assert!(matches!(err, RenderError::CanvasTooLarge { .. }));

    let small = RenderOptions {
        max_canvas_area: 100.0 * 100.0,
        ..RenderOptions::default()
    };
    let ctx = RenderContext::new(&HeuristicTextMeasurer).with_options(small);
    let req = request(r#"{"chart": {"width": 200, "height": 100}}"#);
    assert!(render(ChartKind::Scatter, &req, &ctx).is_err());
}

#[test]
fn malformed_dimensions_name_their_field() {
    let err = render_heuristic(
        ChartKind::Scatter,
        r#"{"chart": {"width": 400, "height": 300, "labelFontSize": "20"}}"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RenderError::Dimension {
            field: "labelFontSize",
            source: DimensionParseError::MissingUnit(_)
        }
    ));
}

#[test]
fn marks_come_out_in_paint_order() {
    let out = render_heuristic(
        ChartKind::Bar,
        r##"{
            "chart": {"width": 400, "height": 300, "background": "#fafafa", "showDebug": true},
            "data": [{"label": "a", "value": 1}]
        }"##,
    )
    .unwrap();
    assert_eq!(out.marks[0].z_index, z_order::BACKGROUND);
    assert!(out.marks.windows(2).all(|w| w[0].z_index <= w[1].z_index));
    assert!(out.marks.iter().any(|m| m.z_index == z_order::DEBUG));
}

#[test]
fn watermark_is_painted_last() {
    let options = RenderOptions {
        watermark: Some(String::from("draft")),
        ..RenderOptions::default()
    };
    let ctx = RenderContext::new(&HeuristicTextMeasurer).with_options(options);
    let out = render(ChartKind::Pie, &request(r#"{"data": [{"value": 1}]}"#), &ctx).unwrap();
    let last = out.marks.last().unwrap();
    assert_eq!(last.z_index, z_order::WATERMARK);
    assert_eq!(last.as_text().unwrap().text, "draft");
    assert!(close(out.size.width, crate::DEFAULT_WIDTH));
}

/// Records every measurement that reaches the underlying measurer.
#[derive(Default)]
struct Recording {
    seen: RefCell<Vec<(String, String)>>,
}

impl TextMeasurer for Recording {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        self.seen
            .borrow_mut()
            .push((String::from(text), std::format!("{style:?}")));
        HeuristicTextMeasurer.measure(text, style)
    }
}

#[test]
fn each_text_is_measured_once_per_render() {
    for (kind, json) in [(ChartKind::Bar, BAR), (ChartKind::Timeline, TIMELINE)] {
        let recording = Recording::default();
        render(kind, &request(json), &RenderContext::new(&recording)).unwrap();
        let seen = recording.seen.borrow();
        assert!(!seen.is_empty());
        for (i, entry) in seen.iter().enumerate() {
            assert!(!seen[..i].contains(entry), "{kind:?} measured {entry:?} twice");
        }
    }
}

fn overlap(a: &plotbox_core::LayoutBox, b: &plotbox_core::LayoutBox) -> f64 {
    a.to_rect().intersect(b.to_rect()).area()
}

#[test]
fn all_zero_bars_sit_on_the_axis() {
    for (width, height) in [(800, 400), (300, 600), (1200, 200)] {
        let json = std::format!(
            r#"{{
                "chart": {{"width": {width}, "height": {height}}},
                "data": [
                    {{"label": "a", "value": 0}},
                    {{"label": "b", "value": 0}},
                    {{"label": "c", "value": 0}}
                ]
            }}"#
        );
        let out = render_heuristic(ChartKind::Bar, &json).unwrap();
        let ChartDetails::Bar(bar) = &out.details else {
            panic!("expected bar details");
        };
        let bottom = out.regions.plot.bottom();
        assert_eq!(bar.bars.len(), 3);
        for b in &bar.bars {
            assert!(close(b.y0, bottom), "{width}x{height}: {b:?} above {bottom}");
            assert!(close(b.height(), 0.0));
        }
        assert!(close(bar.value_ticks[0].pos, bottom));
    }
}

#[test]
fn side_legends_leave_the_plot_alone() {
    for (position, anchor) in [("left", "top"), ("right", "top"), ("right", "bottom")] {
        let json = BAR.replacen(
            r#""padY": 20"#,
            &std::format!(
                r#""padY": 20, "legendPosition": "{position}",
                "legendWidth": 120, "legendAnchor": "{anchor}""#
            ),
            1,
        );
        let out = render_heuristic(ChartKind::Bar, &json).unwrap();
        let legend = out.regions.legend.as_ref().unwrap();
        let plot = &out.regions.plot;
        assert!(close(legend.width(), 120.0), "{position}");
        assert!(close(overlap(legend, plot), 0.0), "{position}");
        for axis in [&out.regions.x_axis, &out.regions.y_axis].into_iter().flatten() {
            assert!(close(overlap(legend, axis), 0.0), "{position}");
        }
        if position == "left" {
            assert!(legend.right() < out.regions.y_axis.as_ref().unwrap().left());
        } else {
            assert!(legend.left() > plot.right());
        }
        if anchor == "bottom" {
            assert!(close(legend.bottom(), plot.bottom()));
        } else {
            assert!(close(legend.top(), plot.top()));
        }
    }

    let top = BAR.replacen(r#""padY": 20"#, r#""padY": 20, "legendPosition": "top""#, 1);
    let out = render_heuristic(ChartKind::Bar, &top).unwrap();
    let legend = out.regions.legend.as_ref().unwrap();
    assert!(close(legend.top(), out.regions.chart.top()));
    assert!(legend.bottom() <= out.regions.plot.top());
}

#[test]
fn scatter_legend_and_axis_bands_are_disjoint() {
    for (width, height) in [(800, 600), (400, 300), (1000, 250)] {
        for legend_position in ["top", "bottom"] {
            for side in ["top", "bottom"] {
                let json = std::format!(
                    r#"{{
                        "chart": {{
                            "width": {width}, "height": {height}, "padX": 4,
                            "showLegend": true, "legendPosition": "{legend_position}",
                            "xAxis": {{"position": "{side}"}}
                        }},
                        "data": [
                            {{"xValue": 1, "yValue": 2, "series": "north"}},
                            {{"xValue": 2, "yValue": 4, "series": "south"}},
                            {{"xValue": 3, "yValue": 1, "series": "east"}}
                        ]
                    }}"#
                );
                let out = render_heuristic(ChartKind::Scatter, &json).unwrap();
                let legend = out.regions.legend.as_ref().unwrap();
                let x_axis = out.regions.x_axis.as_ref().unwrap();
                let case = std::format!("{width}x{height} legend {legend_position} axis {side}");
                assert!(close(overlap(legend, x_axis), 0.0), "{case}");
                assert!(close(overlap(legend, &out.regions.plot), 0.0), "{case}");
                assert!(out.regions.chart.to_rect().contains_rect(legend.to_rect()), "{case}");
            }
        }
    }
}

#[test]
fn timeline_legend_stays_off_the_time_axis() {
    for side in ["top", "bottom"] {
        let json = TIMELINE.replacen(
            r#""axis""#,
            &std::format!(r#""timeAxis": {{"position": "{side}"}}, "axis""#),
            1,
        );
        let out = render_heuristic(ChartKind::Timeline, &json).unwrap();
        let legend = out.regions.legend.as_ref().unwrap();
        let x_axis = out.regions.x_axis.as_ref().unwrap();
        assert!(close(overlap(legend, x_axis), 0.0), "axis {side}");
        if side == "top" {
            assert!(close(legend.bottom(), out.regions.plot.bottom()));
        } else {
            assert!(close(legend.top(), out.regions.plot.top()));
        }
    }
}

#[test]
fn pie_without_legend_fits_any_canvas() {
    for (width, height) in [(800, 400), (400, 800), (600, 600), (1000, 120)] {
        let json = std::format!(
            r#"{{
                "chart": {{"width": {width}, "height": {height}, "showLegend": false}},
                "data": [{{"value": 2}}, {{"value": 1}}, {{"value": 1}}]
            }}"#
        );
        let out = render_heuristic(ChartKind::Pie, &json).unwrap();
        let ChartDetails::Pie(pie) = &out.details else {
            panic!("expected pie details");
        };
        let canvas = out.regions.canvas.to_rect();
        let plot = out.regions.plot.to_rect();
        let case = std::format!("{width}x{height}");
        assert!(canvas.contains_rect(plot), "{case}: {plot:?}");
        assert!(close(plot.width(), plot.height()), "{case}");
        assert!(close(plot.center().x, out.regions.chart.center().x()), "{case}");
        assert!(close(plot.center().y, out.regions.chart.center().y()), "{case}");
        assert!(pie.center.y + pie.outer_radius <= canvas.y1, "{case}");
        assert!(pie.center.x + pie.outer_radius <= canvas.x1, "{case}");
        assert!(pie.center.y - pie.outer_radius >= canvas.y0, "{case}");
    }
}

#[test]
fn pie_sweep_ends_at_a_full_turn() {
    let out = render_heuristic(
        ChartKind::Pie,
        r#"{
            "chart": {"width": 400, "height": 400, "startAngle": 1},
            "data": [{"value": 1}, {"value": 1}]
        }"#,
    )
    .unwrap();
    let ChartDetails::Pie(pie) = &out.details else {
        panic!("expected pie details");
    };
    assert!(close(pie.slices[0].start_angle, 1.0));
    let last = pie.slices.iter().map(|s| s.end_angle).fold(0.0, f64::max);
    assert!(close(last, TAU));
    assert!(close(pie.slices[0].end_angle, 0.5 * (1.0 + TAU)));
}

#[test]
fn unlabeled_pie_slices_are_numbered() {
    let out = render_heuristic(
        ChartKind::Pie,
        r#"{"chart": {"width": 400, "height": 400}, "data": [{"value": 2}, {"value": 1}]}"#,
    )
    .unwrap();
    let labels = texts(&out);
    assert!(labels.contains(&"Label 0"));
    assert!(labels.contains(&"Label 1"));
}
