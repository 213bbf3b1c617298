//! Tactix CLI - Command-line interface for Tactix
//!
//! Commands:
//! - generate: Write a synthetic match snapshot
//! - analyze: Run every tactical report over a snapshot
//! - run: Generate a snapshot, then analyze it
//! - validate: Check a snapshot's structural invariants
//! - config: Print the effective analysis configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use tactix::config::{AnalysisConfig, GeneratorConfig, DEFAULT_SNAPSHOT_PATH, MATCH_MINUTES};
use tactix::encoder::{ReportEncoder, ReportFormat};
use tactix::pipeline::{generate_snapshot, MatchAnalyzer};
use tactix::store::MatchTable;
use tactix::types::Team;
use tactix::{AnalysisError, TACTIX_VERSION};

/// Tactix - Tactical metrics for synthetic football match data
#[derive(Parser)]
#[command(name = "tactix")]
#[command(version = TACTIX_VERSION)]
#[command(about = "Compute tactical reports from synthetic match tracking data", long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic match snapshot
    Generate {
        /// Snapshot output path
        #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
        output: PathBuf,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Run every tactical report over a snapshot
    Analyze {
        /// Snapshot input path
        #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
        input: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Generate a snapshot, then analyze it
    Run {
        /// Snapshot path written and then read back
        #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
        snapshot: PathBuf,

        #[command(flatten)]
        generator: GeneratorArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Check a snapshot's structural invariants
    Validate {
        /// Snapshot input path
        #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
        input: PathBuf,

        /// Players per team used to check roster slots
        #[arg(long, default_value = "11")]
        players_per_team: usize,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective analysis configuration as JSON
    Config {
        /// Configuration file to merge over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct GeneratorArgs {
    /// Seed for synthetic data generation
    #[arg(long = "data-seed", default_value = "42")]
    data_seed: u64,

    /// Match length in minutes
    #[arg(long, default_value_t = MATCH_MINUTES)]
    minutes: u8,

    /// Players per team
    #[arg(long, default_value = "11")]
    players_per_team: usize,
}

#[derive(clap::Args)]
struct AnalysisArgs {
    /// JSON configuration file with thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of shape clusters
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Seed for clustering and proxy xG
    #[arg(long)]
    seed: Option<u64>,

    /// Team whose shape is analysed
    #[arg(long)]
    focus: Option<FocusTeam>,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Output file path (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum FocusTeam {
    A,
    B,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Console report
    Text,
    /// Single-line JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), TactixCliError> {
    match cli.command {
        Commands::Generate { output, generator } => cmd_generate(&output, &generator),

        Commands::Analyze { input, analysis } => cmd_analyze(&input, &analysis),

        Commands::Run {
            snapshot,
            generator,
            analysis,
        } => {
            cmd_generate(&snapshot, &generator)?;
            cmd_analyze(&snapshot, &analysis)
        }

        Commands::Validate {
            input,
            players_per_team,
            json,
        } => cmd_validate(&input, players_per_team, json),

        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn cmd_generate(output: &Path, args: &GeneratorArgs) -> Result<(), TactixCliError> {
    let config = GeneratorConfig {
        seed: args.data_seed,
        minutes: args.minutes,
        players_per_team: args.players_per_team,
        ..Default::default()
    };
    let table = generate_snapshot(output, &config)?;
    eprintln!(
        "Generated {} records into {}",
        table.len(),
        output.display()
    );
    Ok(())
}

fn cmd_analyze(input: &Path, args: &AnalysisArgs) -> Result<(), TactixCliError> {
    let mut config = load_config(args.config.as_deref())?;

    // Flags override the configuration file
    if let Some(clusters) = args.clusters {
        config.clusters = clusters;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(focus) = &args.focus {
        config.focus_team = match focus {
            FocusTeam::A => Team::A,
            FocusTeam::B => Team::B,
        };
    }

    if !input.exists() {
        return Err(TactixCliError::MissingSnapshot(input.to_path_buf()));
    }
    let table = MatchTable::read_csv(input)?;
    let report = MatchAnalyzer::new(config)?.analyze(&table)?;

    let format = match args.format {
        OutputFormat::Text => ReportFormat::Text,
        OutputFormat::Json => ReportFormat::Json,
        OutputFormat::JsonPretty => ReportFormat::JsonPretty,
    };
    let output_data = ReportEncoder::encode(&report, format)?;

    if args.output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(&args.output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, players_per_team: usize, json: bool) -> Result<(), TactixCliError> {
    if !input.exists() {
        return Err(TactixCliError::MissingSnapshot(input.to_path_buf()));
    }
    let table = MatchTable::read_csv(input)?;
    let report = table.check_integrity(players_per_team);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Snapshot Validation Report");
        println!("==========================");
        println!("Records:              {}", report.records);
        println!("Minutes:              {}", report.minutes);
        println!("Players:              {}", report.players);
        println!("Duplicate keys:       {}", report.duplicate_keys.len());
        println!("Roster mismatches:    {}", report.roster_mismatches.len());
        println!("Missing observations: {}", report.missing_observations);

        for key in &report.duplicate_keys {
            println!("  - duplicate: minute {} player {}", key.minute, key.player);
        }
        for key in &report.roster_mismatches {
            println!("  - roster mismatch: minute {} player {}", key.minute, key.player);
        }
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(TactixCliError::ValidationFailed(report.violations()))
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, TactixCliError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(AnalysisConfig::from_json(&json)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

// Error handling

#[derive(Debug)]
enum TactixCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    MissingSnapshot(PathBuf),
    ValidationFailed(usize),
}

impl From<io::Error> for TactixCliError {
    fn from(e: io::Error) -> Self {
        TactixCliError::Io(e)
    }
}

impl From<AnalysisError> for TactixCliError {
    fn from(e: AnalysisError) -> Self {
        TactixCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for TactixCliError {
    fn from(e: serde_json::Error) -> Self {
        TactixCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TactixCliError> for CliError {
    fn from(e: TactixCliError) -> Self {
        match e {
            TactixCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TactixCliError::Analysis(e) => {
                let (code, hint) = match &e {
                    AnalysisError::Configuration(_) => (
                        "CONFIGURATION_ERROR",
                        "Check --clusters and the configuration file",
                    ),
                    AnalysisError::OutOfRange { .. } => (
                        "OUT_OF_RANGE",
                        "Coordinates must lie in [0, 100] and speed in [0, 8]",
                    ),
                    AnalysisError::EmptyInput(_) => (
                        "EMPTY_INPUT",
                        "Ensure the snapshot contains records for both teams",
                    ),
                    AnalysisError::Csv(_) => (
                        "SNAPSHOT_ERROR",
                        "Ensure the snapshot has columns minute,player,team,x,y,speed,event",
                    ),
                    AnalysisError::Io(_) => ("IO_ERROR", "Check file paths and permissions"),
                    AnalysisError::Json(_) => ("JSON_ERROR", "Check JSON syntax"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            TactixCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TactixCliError::MissingSnapshot(path) => CliError {
                code: "MISSING_SNAPSHOT".to_string(),
                message: format!("Snapshot not found: {}", path.display()),
                hint: Some("Run 'tactix generate' first".to_string()),
            },
            TactixCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} integrity violations found", count),
                hint: Some("Regenerate the snapshot with 'tactix generate'".to_string()),
            },
        }
    }
}
