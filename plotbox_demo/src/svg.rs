// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal SVG backend for chart marks.

use std::fmt::Write as _;

use kurbo::Size;
use peniko::Brush;
use plotbox_charts::{Mark, Painter, Shape, StrokeStyle, TextAnchor, TextBaseline, TextMark};
use plotbox_text::FontStyle;

/// Collects marks as SVG elements, in the order they are painted.
#[derive(Debug, Default)]
pub(crate) struct SvgPainter {
    body: String,
}

impl SvgPainter {
    /// Wraps the painted elements in an `<svg>` document of the given size.
    pub(crate) fn finish(self, size: Size) -> String {
        let mut out = String::with_capacity(self.body.len() + 160);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = writeln!(
            out,
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = size.width,
            h = size.height,
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn text(&mut self, t: &TextMark) {
        let out = &mut self.body;
        let baseline = match t.baseline {
            TextBaseline::Top => "text-before-edge",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Bottom => "text-after-edge",
        };
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" font-family="{}" dominant-baseline="{}""#,
            t.pos.x,
            t.pos.y,
            t.style.font_size,
            escape_xml(t.style.font_family.css_name()),
            baseline,
        );
        if t.style.font_weight.0 != 400 {
            let _ = write!(out, r#" font-weight="{}""#, t.style.font_weight.0);
        }
        match t.style.font_style {
            FontStyle::Normal => {}
            FontStyle::Italic => out.push_str(r#" font-style="italic""#),
            FontStyle::Oblique => out.push_str(r#" font-style="oblique""#),
        }
        if t.angle != 0.0 {
            let _ = write!(
                out,
                r#" transform="rotate({} {} {})""#,
                t.angle, t.pos.x, t.pos.y
            );
        }
        out.push_str(match t.anchor {
            TextAnchor::Start => r#" text-anchor="start""#,
            TextAnchor::Middle => r#" text-anchor="middle""#,
            TextAnchor::End => r#" text-anchor="end""#,
        });
        write_paint_attr(out, "fill", Some(&t.fill));
        out.push('>');
        out.push_str(&escape_xml(&t.text));
        out.push_str("</text>\n");
    }
}

impl Painter for SvgPainter {
    fn paint(&mut self, mark: &Mark) {
        match &mark.shape {
            Shape::Rect { rect, fill, stroke } => {
                let _ = write!(
                    self.body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height(),
                );
                write_paint_attr(&mut self.body, "fill", fill.as_ref());
                write_stroke(&mut self.body, stroke.as_ref());
                self.body.push_str("/>\n");
            }
            Shape::Path { path, fill, stroke } => {
                let _ = write!(self.body, r#"<path d="{}""#, path.to_svg());
                write_paint_attr(&mut self.body, "fill", fill.as_ref());
                write_stroke(&mut self.body, stroke.as_ref());
                self.body.push_str("/>\n");
            }
            Shape::Text(t) => self.text(t),
        }
    }
}

fn write_stroke(out: &mut String, stroke: Option<&StrokeStyle>) {
    if let Some(s) = stroke.filter(|s| s.stroke_width > 0.0) {
        write_paint_attr(out, "stroke", Some(&s.brush));
        let _ = write!(out, r#" stroke-width="{}""#, s.stroke_width);
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: Option<&Brush>) {
    let Some(brush) = brush else {
        let _ = write!(out, r#" {name}="none""#);
        return;
    };
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};
    use peniko::Color;
    use peniko::color::palette::css;
    use plotbox_text::TextStyle;

    use super::*;

    #[test]
    fn translucent_fills_get_an_opacity() {
        let (fill, opacity) = svg_paint(&Brush::Solid(Color::from_rgba8(255, 0, 0, 51)));
        assert_eq!(fill, "#ff0000");
        assert_eq!(opacity, Some(0.2));
    }

    #[test]
    fn marks_become_elements() {
        let mut svg = SvgPainter::default();
        svg.paint(&Mark::filled_rect(Rect::new(0.0, 0.0, 10.0, 5.0), css::BLUE));
        svg.paint(&Mark::text(TextMark::new(
            Point::new(1.0, 2.0),
            "a<b",
            TextStyle::new(12.0),
        )));
        let doc = svg.finish(Size::new(10.0, 5.0));
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r##"<rect x="0" y="0" width="10" height="5" fill="#0000ff""##));
        assert!(doc.contains(">a&lt;b</text>"));
        assert!(doc.trim_end().ends_with("</svg>"));
    }
}
