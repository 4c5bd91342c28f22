// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders chart requests to SVG.
//!
//! `plotbox_demo samples` (the default) writes one sample of every chart family to a
//! directory. `plotbox_demo render <FAMILY> <INPUT> [-o OUTPUT]` renders a single request; the
//! SVG goes to stdout when no output path is given.

mod svg;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use plotbox_charts::{ChartKind, ChartOutput, ChartRequest, RenderContext, render};
use plotbox_text::HeuristicTextMeasurer;

use crate::svg::SvgPainter;

const SAMPLES: &[(&str, ChartKind, &str)] = &[
    ("bar", ChartKind::Bar, BAR),
    ("pie", ChartKind::Pie, PIE),
    ("scatter", ChartKind::Scatter, SCATTER),
    ("timeline", ChartKind::Timeline, TIMELINE),
];

const BAR: &str = r#"{
    "chart": {"width": 800, "height": 400, "padX": 20, "padY": 20, "title": "Revenue"},
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

const PIE: &str = r#"{
    "chart": {"width": 600, "height": 600, "innerRadius": "15vmin", "padAngle": 0.02},
    "data": [
        {"label": "Rent", "legend": "Rent", "value": 1200},
        {"label": "Food", "legend": "Food", "value": 450},
        {"label": "Travel", "legend": "Travel", "value": 300},
        {"label": "Other", "legend": "Other", "value": 150}
    ]
}"#;

const SCATTER: &str = r#"{
    "chart": {"width": 800, "height": 500, "showLegend": true},
    "data": [
        {"series": "north", "xValue": 1.0, "yValue": 3.5},
        {"series": "north", "xValue": 2.5, "yValue": 4.1},
        {"series": "south", "xValue": 1.8, "yValue": 1.2},
        {"series": "south", "xValue": 3.3, "yValue": 2.0},
        {"series": "east", "xValue": 4.0, "yValue": 5.2}
    ]
}"#;

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

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one sample chart per family.
    Samples {
        /// Output directory.
        #[arg(short, long, default_value = "plotbox_demo_out")]
        out_dir: PathBuf,
    },
    /// Render a JSON chart request.
    Render {
        /// Chart family.
        #[arg(value_enum)]
        family: Family,
        /// Request file.
        input: PathBuf,
        /// Output SVG file; stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Family {
    Bar,
    Pie,
    Scatter,
    Timeline,
}

impl From<Family> for ChartKind {
    fn from(family: Family) -> Self {
        match family {
            Family::Bar => Self::Bar,
            Family::Pie => Self::Pie,
            Family::Scatter => Self::Scatter,
            Family::Timeline => Self::Timeline,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let command = Cli::parse().command.unwrap_or(Commands::Samples {
        out_dir: PathBuf::from("plotbox_demo_out"),
    });
    match command {
        Commands::Samples { out_dir } => render_samples(&out_dir),
        Commands::Render {
            family,
            input,
            output,
        } => {
            let svg = render_svg(family.into(), &fs::read_to_string(input)?)?;
            match output {
                Some(path) => fs::write(path, svg)?,
                None => print!("{svg}"),
            }
            Ok(())
        }
    }
}

fn render_samples(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    for (name, kind, json) in SAMPLES {
        let path = dir.join(format!("{name}.svg"));
        fs::write(&path, render_svg(*kind, json)?)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn render_svg(kind: ChartKind, json: &str) -> Result<String, Box<dyn Error>> {
    let request: ChartRequest = serde_json::from_str(json)?;
    let output = render(kind, &request, &RenderContext::new(&HeuristicTextMeasurer))?;
    Ok(to_svg(&output))
}

fn to_svg(output: &ChartOutput) -> String {
    let mut painter = SvgPainter::default();
    output.paint(&mut painter);
    painter.finish(output.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_renders() {
        for (name, kind, json) in SAMPLES {
            let svg = render_svg(*kind, json).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(svg.contains("<path") || svg.contains("<rect"), "{name}");
        }
    }

    #[test]
    fn render_command_parses_family_and_output() {
        let args = ["plotbox_demo", "render", "timeline", "in.json", "-o", "x.svg"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Commands::Render {
            family,
            input,
            output,
        }) = cli.command
        else {
            panic!("expected the render command");
        };
        assert_eq!(ChartKind::from(family), ChartKind::Timeline);
        assert_eq!(input, PathBuf::from("in.json"));
        assert_eq!(output, Some(PathBuf::from("x.svg")));

        assert!(Cli::try_parse_from(["plotbox_demo", "render", "donut", "in.json"]).is_err());
        assert!(Cli::try_parse_from(["plotbox_demo"]).unwrap().command.is_none());
    }
}
