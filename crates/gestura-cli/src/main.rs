//! Gestura CLI - replay input traces and inspect gesture options.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

use clap::{Parser, Subcommand, ValueEnum};
use gestura_core::{ConfigError, GestureEvent, GestureOptions, Trace, TraceError};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "gestura")]
#[command(about = "Pointer gesture recognition toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input trace and print the gestures it produces
    Replay {
        /// Trace file (.json, .yaml or .yml)
        trace: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = EventFormat::Text)]
        format: EventFormat,

        /// Skip start/move/end lifecycle events
        #[arg(short, long)]
        gestures_only: bool,

        /// Fire every pending timer after the last input
        #[arg(long)]
        flush: bool,
    },

    /// Validate an options file and print the resolved options
    Check {
        /// Options file (.toml, .yaml, .yml or .json)
        options: PathBuf,
    },

    /// Print the default options
    Defaults {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OptionsFormat::Toml)]
        format: OptionsFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EventFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OptionsFormat {
    Toml,
    Json,
    Yaml,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load trace: {0}")]
    Trace(#[from] TraceError),

    #[error("failed to load options: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to encode TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            trace,
            format,
            gestures_only,
            flush,
        } => replay(&trace, format, gestures_only, flush),
        Commands::Check { options } => check(&options),
        Commands::Defaults { format } => render_options(&GestureOptions::default(), format),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn replay(
    path: &Path,
    format: EventFormat,
    gestures_only: bool,
    flush: bool,
) -> Result<String, CliError> {
    let mut trace = Trace::load(path)?;
    if flush {
        trace.until = Some(f64::INFINITY);
    }
    let events: Vec<GestureEvent> = trace
        .replay()
        .into_iter()
        .filter(|e| !gestures_only || !e.kind().is_lifecycle())
        .collect();
    log::info!("{} produced {} events", path.display(), events.len());
    render_events(&events, format)
}

fn check(path: &Path) -> Result<String, CliError> {
    let options = GestureOptions::load(path)?;
    let mut output = format!("{}: ok\n", path.display());
    output.push_str(&render_options(&options, OptionsFormat::Toml)?);
    Ok(output)
}

fn render_events(events: &[GestureEvent], format: EventFormat) -> Result<String, CliError> {
    match format {
        EventFormat::Json => {
            let mut output = serde_json::to_string_pretty(events)?;
            output.push('\n');
            Ok(output)
        }
        EventFormat::Text => Ok(events.iter().fold(String::new(), |mut output, event| {
            let _ = writeln!(output, "{}", describe(event));
            output
        })),
    }
}

fn render_options(options: &GestureOptions, format: OptionsFormat) -> Result<String, CliError> {
    Ok(match format {
        OptionsFormat::Toml => toml::to_string(options)?,
        OptionsFormat::Json => serde_json::to_string_pretty(options)? + "\n",
        OptionsFormat::Yaml => serde_yaml_ng::to_string(options)?,
    })
}

/// One line per event: name, then the fields worth eyeballing.
fn describe(event: &GestureEvent) -> String {
    let name = event.kind().event_name();
    match event {
        GestureEvent::Swipe(swipe) => format!(
            "{name} {} angle={:.1} velocity={:.3} at ({}, {}) t={}",
            swipe.direction,
            swipe.angle,
            swipe.velocity,
            swipe.pointer.position.x,
            swipe.pointer.position.y,
            swipe.pointer.timestamp
        ),
        GestureEvent::Tap(p) | GestureEvent::DoubleTap(p) | GestureEvent::LongPress(p) => format!(
            "{name} pointer={} at ({}, {}) t={} duration={}",
            p.identifier, p.position.x, p.position.y, p.timestamp, p.duration
        ),
        GestureEvent::Start(active) | GestureEvent::Move(active) | GestureEvent::End(active) => {
            format!("{name} active={}", active.len())
        }
    }
}
