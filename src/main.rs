//! Command line entry point for glicko-period
//!
//! Reads one rating period from a JSON file, rates it with the configured
//! Glicko-2 engine, and prints the resulting changes as JSON.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use glicko_period::config::AppConfig;
use glicko_period::rating::matches::FULL_WEIGHT;
use glicko_period::{PeriodAccumulator, PlayerRating, RatingEngine, Roster};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Glicko-2 rating period calculator
#[derive(Parser)]
#[command(
    name = "glicko-period",
    version,
    about = "Rate one period of match results with the Glicko-2 system",
    long_about = "Reads players and match results for a single rating period from a JSON file, \
                 computes new ratings, deviations and volatilities with the Glicko-2 system, \
                 and prints the changes as JSON."
)]
struct Args {
    /// Period file (JSON)
    #[arg(value_name = "PERIOD", help = "Path to the rating period file (JSON)")]
    period: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Tau override
    #[arg(long, value_name = "TAU", help = "Override the volatility constraint tau")]
    tau: Option<f64>,

    /// Only stage results
    #[arg(long, help = "Compute a preview without committing results")]
    preview: bool,

    /// Dry run mode (validate config and input, then exit)
    #[arg(long, help = "Validate configuration and period file, then exit")]
    dry_run: bool,
}

/// Player entry of a period file; missing values take the configured defaults
#[derive(Debug, Deserialize)]
struct PlayerEntry {
    name: String,
    rating: Option<f64>,
    deviation: Option<f64>,
    volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    winner: String,
    loser: String,
    #[serde(default = "full_weight")]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct DrawEntry {
    first: String,
    second: String,
}

fn full_weight() -> f64 {
    FULL_WEIGHT
}

/// Input format of the command line tool
#[derive(Debug, Deserialize)]
struct PeriodFile {
    players: Vec<PlayerEntry>,
    #[serde(default)]
    results: Vec<ResultEntry>,
    #[serde(default)]
    draws: Vec<DrawEntry>,
    /// Players rated without games (decay only)
    #[serde(default)]
    declared: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NamedChange {
    name: String,
    games: u32,
    old: PlayerRating,
    new: PlayerRating,
}

#[derive(Debug, Serialize)]
struct NamedFailure {
    name: String,
    kind: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct Output {
    period_id: String,
    preview: bool,
    changes: Vec<NamedChange>,
    failures: Vec<NamedFailure>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if let Some(tau) = args.tau {
        config.rating.tau = tau;
    }

    glicko_period::config::validate_config(&config)?;
    Ok(config)
}

fn read_period_file(path: &Path) -> Result<PeriodFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read period file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse period file {}", path.display()))
}

/// Register the file's players and record its results
fn build_period(file: &PeriodFile, config: &AppConfig) -> Result<(Roster, PeriodAccumulator)> {
    let defaults = &config.rating;
    let mut roster = Roster::new();

    for player in &file.players {
        if roster.find(&player.name).is_some() {
            return Err(anyhow!("Duplicate player: {}", player.name));
        }
        let initial = PlayerRating {
            rating: player.rating.unwrap_or(defaults.default_rating),
            deviation: player.deviation.unwrap_or(defaults.default_deviation),
            volatility: player.volatility.unwrap_or(defaults.default_volatility),
        };
        roster
            .register_rated(player.name.clone(), initial, defaults)
            .with_context(|| format!("Invalid initial values for {}", player.name))?;
    }

    let lookup = |name: &str| {
        roster
            .find(name)
            .ok_or_else(|| anyhow!("Unknown player in period file: {}", name))
    };

    let period = PeriodAccumulator::new();
    for result in &file.results {
        period.add_result(lookup(&result.winner)?, lookup(&result.loser)?, result.weight)?;
    }
    for draw in &file.draws {
        period.add_draw(lookup(&draw.first)?, lookup(&draw.second)?)?;
    }
    for name in &file.declared {
        period.add_participant(lookup(name)?)?;
    }

    Ok((roster, period))
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    if config.service.worker_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.service.worker_threads)
            .build_global()
            .map_err(|e| anyhow!("Failed to configure worker threads: {}", e))?;
    }

    let file = read_period_file(&args.period)?;
    let (mut roster, period) = build_period(&file, config)?;
    info!(
        "Loaded {} players and {} results from {}",
        roster.len(),
        period.result_count()?,
        args.period.display()
    );

    if args.dry_run {
        info!("Dry run completed - configuration and period file are valid");
        return Ok(());
    }

    let engine = RatingEngine::new(config.rating)?;
    let report = if args.preview {
        engine.preview_period(&mut roster, &period)?
    } else {
        engine.rate_period(&mut roster, &period)?
    };

    let name_of = |id| roster.name(id).unwrap_or("?").to_string();
    let output = Output {
        period_id: report.period_id.to_string(),
        preview: report.temporary,
        changes: report
            .changes
            .iter()
            .map(|change| NamedChange {
                name: name_of(change.player_id),
                games: change.games,
                old: change.old_rating,
                new: change.new_rating,
            })
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|failure| NamedFailure {
                name: name_of(failure.player_id),
                kind: failure.kind.clone(),
                message: failure.message.clone(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if report.is_complete() {
        Ok(())
    } else {
        Err(anyhow!("{} participants could not be rated", report.failures.len()))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
