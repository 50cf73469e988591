#![deny(unsafe_code)]
//! CLI binary for the rdk motion engine.
//!
//! Subcommands:
//! - `run <config>` — run a trial for N ticks and report dot density
//! - `replay <spec>` — re-run a recorded run spec
//! - `render <config>` — run a trial and write the final frame as PNG
//! - `template` — print an example trial configuration

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use rdk_core::config::{
    TrialConfig, PERTURB_MAGNITUDE_NARROW, PERTURB_PERIOD_LONG, RECYCLE_MARGIN_EIGHTH,
};
use rdk_core::{DensityTracker, DotField, MotionStepper, RunSpec};
use rdk_render::{Style, Viewport};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rdk", about = "Random dot kinematogram motion engine")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a trial and report how many dots stayed visible.
    Run {
        /// Trial configuration JSON file.
        config: PathBuf,

        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write a replayable run spec to this path.
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Re-run a recorded run spec.
    Replay {
        /// Run spec JSON file written by `run --record`.
        spec: PathBuf,
    },
    /// Run a trial and write the final frame as a PNG.
    Render {
        /// Trial configuration JSON file.
        config: PathBuf,

        /// Number of ticks to simulate before capturing.
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Image width and height in pixels.
        #[arg(long, default_value_t = 512)]
        size: u32,

        /// Draw the aperture rim.
        #[arg(long)]
        outline: bool,
    },
    /// Print an example trial configuration.
    Template,
}

fn parse_level(name: &str) -> Result<Level, CliError> {
    match name.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CliError::Input(format!("unknown log level '{other}'"))),
    }
}

fn init_logging(level: Level) -> Result<(), CliError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::Io(format!("failed to install log subscriber: {e}")))
}

/// Reads a JSON document from disk.
fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid JSON in {}: {e}", path.display())))
}

fn example_config() -> TrialConfig {
    TrialConfig {
        coherence: 0.5,
        direction: 0.0,
        velocity: 0.1,
        aperture_radius: 10.0,
        dot_radius: 0.15,
        dot_count: 100,
        perturb_period: PERTURB_PERIOD_LONG,
        perturb_magnitude: PERTURB_MAGNITUDE_NARROW,
        recycle_margin: RECYCLE_MARGIN_EIGHTH,
        noise_heading: None,
    }
}

/// Runs a spec to completion, tracking density after every tick.
fn execute(spec: &RunSpec) -> Result<Value, CliError> {
    let mut stepper = spec.stepper()?;
    let mut tracker = DensityTracker::new(stepper.field().dots().len());
    stepper.run_tracked(spec.ticks, &mut tracker);
    let field = stepper.field();
    info!(
        ticks = spec.ticks,
        seed = spec.seed,
        recycles = field.total_recycles(),
        "run complete"
    );
    Ok(json!({
        "ticks": spec.ticks,
        "seed": spec.seed,
        "dots": field.dots().len(),
        "signal": field.signal_count(),
        "recycles": field.total_recycles(),
        "density": tracker.summary(),
    }))
}

fn report(summary: &Value, json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        let d = &summary["density"];
        println!(
            "{} ticks, {} dots ({} signal), {} recycles",
            summary["ticks"], summary["dots"], summary["signal"], summary["recycles"]
        );
        println!(
            "visible: min {} max {} mean {:.2} ({:.1}%)",
            d["min_visible"],
            d["max_visible"],
            d["mean_visible"].as_f64().unwrap_or(0.0),
            d["mean_fraction"].as_f64().unwrap_or(0.0) * 100.0
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(parse_level(&cli.log_level)?)?;

    match cli.command {
        Command::Template => {
            println!("{}", serde_json::to_string_pretty(&example_config().params())?);
        }
        Command::Run {
            config,
            ticks,
            seed,
            record,
        } => {
            let spec = RunSpec::new(read_json(&config)?, seed, ticks);
            spec.validate()?;
            if let Some(path) = record {
                fs::write(&path, serde_json::to_string_pretty(&spec)?)?;
                debug!(path = %path.display(), "run spec recorded");
            }
            report(&execute(&spec)?, cli.json)?;
        }
        Command::Replay { spec } => {
            let spec: RunSpec = serde_json::from_value(read_json(&spec)?)
                .map_err(|e| CliError::Input(format!("invalid run spec: {e}")))?;
            report(&execute(&spec)?, cli.json)?;
        }
        Command::Render {
            config,
            ticks,
            seed,
            output,
            size,
            outline,
        } => {
            let trial = TrialConfig::from_json(&read_json(&config)?)?;
            let mut stepper = MotionStepper::new(DotField::new(trial, seed)?);
            stepper.run(ticks);

            let viewport = Viewport::fit(size, trial.aperture_radius)?;
            let style = Style {
                outline: outline.then_some([96, 96, 96]),
                ..Style::default()
            };
            rdk_render::frame::write_png(
                &stepper.snapshot(),
                trial.dot_radius,
                trial.aperture_radius,
                &viewport,
                &style,
                &output,
            )?;

            if cli.json {
                let info = json!({
                    "ticks": ticks,
                    "seed": seed,
                    "size": size,
                    "visible": stepper.field().visible_count(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} dots after {ticks} ticks (seed {seed}) -> {}",
                    stepper.field().dots().len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::try_parse_from(["rdk", "run", "trial.json", "--ticks", "10", "--json"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Run { config, ticks, seed, record } => {
                assert_eq!(config, PathBuf::from("trial.json"));
                assert_eq!(ticks, 10);
                assert_eq!(seed, 42);
                assert!(record.is_none());
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn parse_level_accepts_known_names() {
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("warn").unwrap(), Level::WARN);
        assert_eq!(parse_level("loud").unwrap_err().exit_code(), 12);
    }

    #[test]
    fn template_is_a_valid_config() {
        let params = example_config().params();
        assert!(TrialConfig::from_json(&params).is_ok());
    }

    #[test]
    fn read_json_distinguishes_io_and_input_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(read_json(&missing).unwrap_err().exit_code(), 11);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert_eq!(read_json(&bad).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn execute_reports_density() {
        let spec = RunSpec::new(example_config().params(), 7, 50);
        let out = execute(&spec).unwrap();
        assert_eq!(out["ticks"], 50);
        assert_eq!(out["dots"], 100);
        assert_eq!(out["signal"], 50);
        assert_eq!(out["density"]["samples"], 50);
    }

    #[test]
    fn execute_rejects_bad_config() {
        let spec = RunSpec::new(json!({"coherence": 2.0}), 7, 50);
        assert_eq!(execute(&spec).unwrap_err().exit_code(), 10);
    }
}
