//! Sniff Bout CLI
//!
//! Scores social-interaction bouts from a directory of tracking tables.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sniff_bout::{
    audit::create_shared_log,
    batch::{run_batch, BatchOptions},
    config::{AnalysisConfig, CoordPair, OutputFormat},
    core::InteractionZone,
    report::{write_json, write_jsonl, write_table, AnalysisReport, CohortStats},
    VERSION,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser)]
#[command(name = "sniff-bout")]
#[command(version = VERSION)]
#[command(about = "Score social-interaction bouts from tracked arena recordings", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every trial table in a directory
    Analyze {
        /// Directory containing one CSV file per trial
        dir: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format (csv, json or jsonl)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Number of worker threads
        #[arg(long, short, default_value = "1")]
        jobs: usize,
    },

    /// Show the zones and thresholds derived from the configuration
    Criteria {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Show configuration
    Config,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Configuration source plus per-field overrides.
#[derive(Args)]
struct SettingsArgs {
    /// Configuration file (defaults to the stored configuration)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Object radius in pixels
    #[arg(long)]
    object_pixel_radius: Option<u32>,

    /// Object radius in cm
    #[arg(long)]
    object_cm_radius: Option<f64>,

    /// Interaction distance in cm
    #[arg(long)]
    interaction_distance_cm: Option<f64>,

    /// Left object top coordinates as (x,y)
    #[arg(long)]
    left_top: Option<CoordPair>,

    /// Left object left coordinates as (x,y)
    #[arg(long)]
    left_left: Option<CoordPair>,

    /// Right object top coordinates as (x,y)
    #[arg(long)]
    right_top: Option<CoordPair>,

    /// Right object left coordinates as (x,y)
    #[arg(long)]
    right_left: Option<CoordPair>,

    /// Interaction time in ms
    #[arg(long)]
    interaction_time_ms: Option<u32>,

    /// Video frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Trial duration in seconds
    #[arg(long)]
    trial_runtime: Option<u32>,
}

impl SettingsArgs {
    /// Load the base configuration and apply overrides.
    fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {path:?}"))?,
            None => AnalysisConfig::load().context("Failed to load stored config")?,
        };

        if let Some(v) = self.object_pixel_radius {
            config.object_pixel_radius = v;
        }
        if let Some(v) = self.object_cm_radius {
            config.object_cm_radius = v;
        }
        if let Some(v) = self.interaction_distance_cm {
            config.interaction_distance_cm = v;
        }
        if let Some(v) = self.left_top {
            config.left_object.top = v;
        }
        if let Some(v) = self.left_left {
            config.left_object.left = v;
        }
        if let Some(v) = self.right_top {
            config.right_object.top = v;
        }
        if let Some(v) = self.right_left {
            config.right_object.left = v;
        }
        if let Some(v) = self.interaction_time_ms {
            config.interaction_time_ms = v;
        }
        if let Some(v) = self.fps {
            config.video_fps = v;
        }
        if let Some(v) = self.trial_runtime {
            config.trial_runtime_secs = v;
        }

        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            dir,
            settings,
            output,
            format,
            jobs,
        } => cmd_analyze(&dir, &settings, output, format, jobs),
        Commands::Criteria { settings } => cmd_criteria(&settings),
        Commands::Config => cmd_config(),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays free for tables.
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn cmd_analyze(
    dir: &Path,
    settings: &SettingsArgs,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    jobs: usize,
) -> Result<()> {
    let config = settings.resolve()?;
    let criteria = config.criteria()?;
    let format = format.unwrap_or(config.output_format);

    let log = create_shared_log();
    let batch = run_batch(dir, &criteria, &config.columns, BatchOptions { jobs }, &log)
        .with_context(|| format!("Failed to analyze {dir:?}"))?;

    if batch.files_discovered == 0 {
        eprintln!("No trial files (*.csv) found in {dir:?}");
    }
    for skipped in &batch.skipped {
        eprintln!(
            "Skipped trial {} ({:?}): {}",
            skipped.trial, skipped.path, skipped.reason
        );
    }

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {parent:?}"))?;
            }
            let file =
                File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let written = match format {
        OutputFormat::Csv => write_table(&mut writer, &batch.summaries),
        OutputFormat::Json => {
            let report = AnalysisReport::build(&batch, &criteria, Some(log.stats()));
            write_json(&mut writer, &report)
        }
        OutputFormat::Jsonl => write_jsonl(&mut writer, &batch.summaries),
    };
    written.context("Failed to write results")?;
    drop(writer);

    if let Some(path) = &output {
        println!(
            "Wrote {} rows for {} trial(s) to {:?}",
            batch.summaries.len(),
            batch.summaries.len() / 2,
            path
        );
    }

    if !batch.is_empty() {
        eprintln!();
        eprint!("{}", CohortStats::compute(&batch.summaries).render());
    }
    eprintln!();
    eprintln!("{}", log.summary());

    Ok(())
}

fn cmd_criteria(settings: &SettingsArgs) -> Result<()> {
    let config = settings.resolve()?;
    let criteria = config.criteria()?;

    println!("Interaction Criteria");
    println!("====================");
    println!();
    println!("  Pixels per cm: {:.4}", criteria.pixels_per_cm);
    println!("  Interaction margin: {:.2} px", criteria.distance_in_pixels);
    print_zone("Left zone", &criteria.left_zone);
    print_zone("Right zone", &criteria.right_zone);
    println!(
        "  Required run length: {} frame(s) at {} fps",
        criteria.required_run_length, criteria.fps
    );
    println!("  Trial runtime: {} s", criteria.trial_runtime_secs);
    if criteria.required_run_length == 0 {
        eprintln!(
            "Warning: interaction time is shorter than one frame; bout counts will be degenerate"
        );
    }

    Ok(())
}

fn print_zone(label: &str, zone: &InteractionZone) {
    println!(
        "  {label}: center ({}, {}), radius {:.2} px",
        zone.center_x, zone.center_y, zone.radius
    );
}

fn cmd_config() -> Result<()> {
    let config = AnalysisConfig::load().context("Failed to load stored config")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", AnalysisConfig::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = AnalysisConfig::config_path();
    if path.exists() && !force {
        bail!("{path:?} already exists (use --force to overwrite)");
    }

    AnalysisConfig::default()
        .save()
        .context("Failed to save config")?;
    println!("Wrote default configuration to {path:?}");
    println!("Edit the object calibration and coordinates before running 'sniff-bout analyze'.");

    Ok(())
}
