use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dial_core::{
    Color, DialConfiguration, DialResolver, DialShape, Diagnostic, Paint, RecordingSink,
    RenderContext,
};

#[derive(Parser, Debug)]
#[command(name = "dialctl", version, about = "Dial widget definition CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse and resolve a dial definition file
    Resolve {
        file: PathBuf,
        /// Value shown by the needle
        #[arg(long, default_value_t = 0.0)]
        value: f64,
        #[arg(long, default_value_t = 200)]
        width: i32,
        #[arg(long, default_value_t = 200)]
        height: i32,
        /// Root directory for texture image references
        #[arg(long)]
        solution_root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .init();

    match cmd {
        Cmd::Resolve {
            file,
            value,
            width,
            height,
            solution_root,
        } => run_resolve(file, value, width, height, solution_root, json),
    }
}

fn run_resolve(
    file: PathBuf,
    value: f64,
    width: i32,
    height: i32,
    solution_root: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let xml = fs::read_to_string(&file).with_context(|| format!("read {}", file.display()))?;
    let context = RenderContext { solution_root };
    let mut sink = RecordingSink::default();
    let config = DialResolver::new(width, height, &context, &mut sink)
        .resolve_str(&xml, value)
        .with_context(|| format!("resolve dial definition {}", file.display()))?;

    if json {
        let report = Report::new(&config, &sink.diagnostics);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&config, &sink.diagnostics);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Report {
    value: f64,
    minimum: f64,
    maximum: f64,
    range_limited: bool,
    units: Option<String>,
    dial_shape: &'static str,
    tick_size: i32,
    intervals: Vec<IntervalReport>,
    subtitles: Vec<String>,
    diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IntervalReport {
    label: String,
    minimum: f64,
    maximum: f64,
    outline: String,
    outline_width: f32,
    fill: Option<String>,
}

impl Report {
    fn new(config: &DialConfiguration, diagnostics: &[Diagnostic]) -> Self {
        Report {
            value: config.range.value(),
            minimum: config.range.minimum(),
            maximum: config.range.maximum(),
            range_limited: config.range.range_limited(),
            units: config.units.clone(),
            dial_shape: shape_name(config.dial_shape),
            tick_size: config.tick_size,
            intervals: config
                .range
                .intervals()
                .iter()
                .map(|interval| IntervalReport {
                    label: interval.label.clone(),
                    minimum: interval.range.lower,
                    maximum: interval.range.upper,
                    outline: color_hex(interval.outline),
                    outline_width: interval.outline_width,
                    fill: interval.fill.as_ref().map(paint_text),
                })
                .collect(),
            subtitles: config.subtitles.clone(),
            diagnostics: diagnostics.iter().map(diagnostic_text).collect(),
        }
    }
}

fn print_summary(config: &DialConfiguration, diagnostics: &[Diagnostic]) {
    println!(
        "value {} in [{}, {}] ({})",
        config.range.value(),
        config.range.minimum(),
        config.range.maximum(),
        if config.range.range_limited() {
            "clamped"
        } else {
            "auto-expand"
        },
    );
    if let Some(units) = &config.units {
        println!("units: {units}");
    }
    println!(
        "shape {}, tick size {}",
        shape_name(config.dial_shape),
        config.tick_size
    );
    for interval in config.range.intervals() {
        println!(
            "interval '{}' [{}, {}] outline {}",
            interval.label,
            interval.range.lower,
            interval.range.upper,
            color_hex(interval.outline),
        );
    }
    for subtitle in &config.subtitles {
        println!("subtitle: {subtitle}");
    }
    for diagnostic in diagnostics {
        println!("warning: {}", diagnostic_text(diagnostic));
    }
}

fn shape_name(shape: DialShape) -> &'static str {
    match shape {
        DialShape::Circle => "circle",
        DialShape::Chord => "chord",
        DialShape::Pie => "pie",
    }
}

fn color_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

fn paint_text(paint: &Paint) -> String {
    match paint {
        Paint::Solid(color) => color_hex(*color),
        Paint::Texture(texture) => format!("texture({})", texture.image.display()),
        Paint::Gradient(gradient) => format!(
            "gradient({}..{})",
            color_hex(gradient.start),
            color_hex(gradient.end)
        ),
    }
}

fn diagnostic_text(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::DeprecatedProperty {
            deprecated,
            replacement,
        } => format!("property '{deprecated}' is deprecated, use '{replacement}' instead"),
        Diagnostic::DeprecatedChild {
            deprecated,
            container,
        } => format!("child '{deprecated}' is deprecated, nest it under '{container}' instead"),
        Diagnostic::NoData => "no data available to seed the dial value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolve_defaults() {
        let cli = Cli::parse_from(["dialctl", "resolve", "speed.dial.xml"]);
        match cli.cmd {
            Cmd::Resolve {
                file,
                value,
                width,
                height,
                ..
            } => {
                assert_eq!(file, PathBuf::from("speed.dial.xml"));
                assert_eq!(value, 0.0);
                assert_eq!((width, height), (200, 200));
            }
        }
        assert!(!cli.json);
    }

    #[test]
    fn parse_resolve_flags() {
        let cli = Cli::parse_from([
            "dialctl",
            "--json",
            "-vv",
            "resolve",
            "speed.dial.xml",
            "--value",
            "37.5",
            "--solution-root",
            "/srv/solutions",
        ]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Cmd::Resolve {
                value,
                solution_root,
                ..
            } => {
                assert_eq!(value, 37.5);
                assert_eq!(solution_root, Some(PathBuf::from("/srv/solutions")));
            }
        }
    }

    #[test]
    fn report_from_resolved_definition() {
        let xml = r#"
            <dial>
                <units>rpm</units>
                <background-color>white</background-color>
                <intervals>
                    <interval>
                        <label>redline</label>
                        <minimum>6000</minimum>
                        <maximum>8000</maximum>
                        <text-color>red</text-color>
                    </interval>
                </intervals>
            </dial>
        "#;
        let context = RenderContext::default();
        let mut sink = RecordingSink::default();
        let config = DialResolver::new(200, 200, &context, &mut sink)
            .resolve_str(xml, 7000.0)
            .expect("resolve");
        let report = Report::new(&config, &sink.diagnostics);
        assert_eq!(report.units.as_deref(), Some("rpm"));
        assert_eq!(report.intervals.len(), 1);
        assert_eq!(report.intervals[0].outline, "#FF0000");
        assert_eq!(report.diagnostics.len(), 1);
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("redline"));
    }
}
