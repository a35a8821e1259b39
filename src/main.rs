use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use perfsci::models::{InsightStatus, ScientificInsight, User};
use perfsci::snapshot::{parse_timestamp, Snapshot};
use perfsci::{logging, AppConfig, InsightEngine, InsightReport, TrainingInput};

/// perfsci - training load and readiness insights
///
/// Computes the Acute:Chronic Workload Ratio, a recovery readiness score and
/// the calibration window from a snapshot of training logs.
#[derive(Parser)]
#[command(name = "perfsci")]
#[command(version)]
#[command(about = "Training load and readiness insights", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute insights from a training log snapshot
    Insights {
        /// Snapshot file (JSON array of logs, or {"user": ..., "logs": [...]})
        #[arg(short, long)]
        logs: PathBuf,

        /// Account creation time (RFC 3339), required if the snapshot has no user
        #[arg(short, long)]
        joined_at: Option<String>,

        /// Evaluate as of this time (RFC 3339) instead of the current time
        #[arg(short, long)]
        now: Option<String>,

        /// Only use logs belonging to this athlete
        #[arg(short, long)]
        athlete: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check training log fields against accepted ranges
    Validate {
        /// Duration in minutes
        #[arg(short, long)]
        duration: Option<Decimal>,

        /// Intensity (RPE 1-10)
        #[arg(short, long)]
        intensity: Option<Decimal>,

        /// Hours slept
        #[arg(short, long)]
        sleep: Option<Decimal>,

        /// Resting heart rate in bpm
        #[arg(short, long)]
        rhr: Option<Decimal>,
    },

    /// Show or create the configuration file
    Config {
        /// List all configuration values
        #[arg(short, long)]
        list: bool,

        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct InsightRow {
    #[tabled(rename = "Metric")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Guidance")]
    description: String,
}

impl From<&ScientificInsight> for InsightRow {
    fn from(insight: &ScientificInsight) -> Self {
        InsightRow {
            label: insight.label.clone(),
            value: insight.value.clone(),
            status: insight.status.to_string(),
            description: insight.description.clone(),
        }
    }
}

fn colored_status(status: InsightStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        InsightStatus::Optimal => text.green(),
        InsightStatus::Warning => text.yellow(),
        InsightStatus::Danger => text.red(),
        InsightStatus::Calibration => text.blue(),
        InsightStatus::Neutral => text.dimmed(),
    }
}

fn print_report(report: &InsightReport) {
    println!(
        "{}",
        format!("Insights for {}", report.athlete_id).cyan().bold()
    );

    if report.calibration.is_calibrating {
        println!(
            "  {} {} day(s) of calibration remaining",
            "⏳".blue(),
            report.calibration.days_remaining
        );
    }

    let rows = vec![
        InsightRow::from(&report.acwr),
        InsightRow::from(&report.recovery),
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));

    for insight in [&report.acwr, &report.recovery] {
        println!(
            "  {} [{}] {}",
            insight.label.bold(),
            colored_status(insight.status),
            insight.calculation_logic.dimmed()
        );
    }

    println!();
    println!(
        "  Level: {} ({}% to next) | Streak: {} day(s) - {}",
        report.level.level.to_string().yellow().bold(),
        report.level.xp_percent,
        report.streak,
        report.streak_message.italic()
    );
    println!(
        "  Momentum: {} | Injury risk: {} | Readiness: {}",
        report.momentum.momentum.to_string().bold(),
        report.momentum.injury_risk,
        report.momentum.readiness
    );
    println!("  {}", report.momentum.momentum.description().dimmed());
    println!("  Suggestion: {}", report.momentum.suggestion.cyan());
    println!("  {}", report.volume_story);
    println!("  Summary: {}", report.summary);

    if !report.sport_distribution.is_empty() {
        let mix: Vec<String> = report
            .sport_distribution
            .iter()
            .map(|share| format!("{:?} {}", share.sport, share.sessions))
            .collect();
        println!("  Sports: {}", mix.join(", "));
    }

    let unlocked: Vec<&str> = report.badges.unlocked().map(|b| b.name.as_str()).collect();
    if !unlocked.is_empty() {
        println!(
            "  Badges: {} ({} pts)",
            unlocked.join(", ").green(),
            report.achievement_points
        );
    }
}

fn run_insights(
    config: &AppConfig,
    logs: PathBuf,
    joined_at: Option<String>,
    now: Option<String>,
    athlete: Option<String>,
    json: bool,
) -> Result<()> {
    let snapshot = Snapshot::from_json_file(&logs)
        .with_context(|| format!("Failed to load snapshot {}", logs.display()))?;

    let now = match now {
        Some(value) => parse_timestamp("--now", &value)?,
        None => Utc::now(),
    };

    let user = match (snapshot.user.clone(), joined_at) {
        (Some(mut user), Some(joined)) => {
            user.joined_at = parse_timestamp("--joined-at", &joined)?;
            user
        }
        (Some(user), None) => user,
        (None, Some(joined)) => User {
            id: athlete.clone().unwrap_or_else(|| "athlete".to_string()),
            name: String::new(),
            email: String::new(),
            role: Default::default(),
            subscription_status: Default::default(),
            sport_preference: None,
            joined_at: parse_timestamp("--joined-at", &joined)?,
        },
        (None, None) => bail!("Snapshot has no user; pass --joined-at"),
    };

    let athlete_logs = match athlete.as_deref().or(snapshot.user.as_ref().map(|u| u.id.as_str())) {
        Some(id) => snapshot.logs_for_athlete(id),
        None => snapshot.logs.clone(),
    };
    tracing::info!(
        total = snapshot.logs.len(),
        used = athlete_logs.len(),
        %now,
        "Computing insights"
    );

    let engine = InsightEngine::from_config(config)?;
    let report = engine.report(&user, &athlete_logs, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_validate(
    duration: Option<Decimal>,
    intensity: Option<Decimal>,
    sleep: Option<Decimal>,
    rhr: Option<Decimal>,
) -> Result<()> {
    let input = TrainingInput {
        duration,
        intensity,
        sleep_hours: sleep,
        resting_heart_rate: rhr,
        ..Default::default()
    };

    match input.validate() {
        Ok(()) => {
            println!("{}", "✓ Training input accepted".green());
            Ok(())
        }
        Err(reason) => {
            println!("{} {}", "✗".red().bold(), reason);
            std::process::exit(1);
        }
    }
}

fn run_config(config_path: &Path, config: &mut AppConfig, list: bool, init: bool) -> Result<()> {
    if init {
        *config = AppConfig::default();
        config.save_to_file(config_path)?;
        println!(
            "{}",
            format!("✓ Wrote default configuration to {}", config_path.display()).green()
        );
    }

    if list || !init {
        println!("{}", format!("Configuration ({})", config_path.display()).bold());
        for (key, value) in config.entries() {
            println!("  {} = {}", key, value);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = if cli.config.is_some() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::load_or_default()?
    };

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    logging::init_logging(&log_config)?;

    match cli.command {
        Commands::Insights {
            logs,
            joined_at,
            now,
            athlete,
            json,
        } => run_insights(&config, logs, joined_at, now, athlete, json),

        Commands::Validate {
            duration,
            intensity,
            sleep,
            rhr,
        } => run_validate(duration, intensity, sleep, rhr),

        Commands::Config { list, init } => run_config(&config_path, &mut config, list, init),
    }
}
