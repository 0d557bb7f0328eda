//! vc - view coordinator scenario runner
//!
//! CLI entry point for replaying and checking scenario files.

use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use viewcoord::cli::{Cli, Command, OutputFormat};
use viewcoord::config::Config;
use viewcoord::coordinator::Outcome;
use viewcoord::events::{CoordEvent, read_journal, spawn_event_journal};
use viewcoord::scenario::{Replay, ReplayReport, Scenario};

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    match level_str.map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install tracing subscriber: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let config_log_level = config.effective_log_level();
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Replay {
            scenario,
            journal,
            format,
        } => cmd_replay(config, &scenario, journal.as_deref(), format).await,
        Command::Check { scenario } => cmd_check(&scenario),
        Command::Journal { path } => cmd_journal(&path),
    }
}

async fn cmd_replay(config: Config, scenario_path: &Path, journal: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(?scenario_path, ?journal, %format, "cmd_replay: called");
    let scenario = Scenario::load(scenario_path)?;
    let replay = Replay::new(scenario, config);

    let journal_task = match journal {
        Some(path) => Some(spawn_event_journal(replay.coordinator().bus(), path)?),
        None => None,
    };

    // Consumes the coordinator, which closes the bus and lets the journal finish
    let report = replay.run();

    let journaled = match journal_task {
        Some(task) => Some(task.await.context("Journal task failed")?),
        None => None,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    if let (Some(count), Some(path)) = (journaled, journal) {
        info!(count, path = %path.display(), "Journal written");
        if format == OutputFormat::Text {
            println!("{} {} events journaled to {}", "✓".green(), count, path.display());
        }
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for event in &report.startup {
        println!("  {} {}", "»".dimmed(), describe_event(event));
    }
    for step in &report.steps {
        let outcome = match &step.outcome {
            Some(Outcome::Skipped(reason)) => format!("skipped: {}", reason).yellow().to_string(),
            Some(outcome) => describe_outcome(outcome).green().to_string(),
            None => String::new(),
        };
        println!("{:>3}. {} {}", step.step, step.description.bold(), outcome);
        for event in &step.events {
            println!("     {} {}", "»".dimmed(), describe_event(event));
        }
    }

    println!();
    println!("Widgets");
    println!("-------");
    for widget in &report.widgets {
        println!(
            "{:<16} {:?}: {} reloads, {} redraws",
            widget.view_id.as_str().cyan(),
            widget.kind,
            widget.reloads,
            widget.redraws
        );
    }

    println!();
    println!("Filters");
    println!("-------");
    for (view_id, filters) in &report.filters {
        println!("{:<16} {}", view_id.as_str().cyan(), filters);
    }
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Applied { refreshed, .. } => match refreshed {
            Some(mode) => format!("applied, {}", mode),
            None => "applied, no widget".to_string(),
        },
        Outcome::Reset { refreshed, .. } => match refreshed {
            Some(mode) => format!("reset, {}", mode),
            None => "reset, no widget".to_string(),
        },
        Outcome::Refreshed { mode, .. } => mode.to_string(),
        Outcome::Edited => "edited".to_string(),
        Outcome::Skipped(reason) => format!("skipped: {}", reason),
    }
}

fn describe_event(event: &CoordEvent) -> String {
    match event {
        CoordEvent::CoordinatorReady => "CoordinatorReady".to_string(),
        CoordEvent::FiltersApplied { view_id, filters } => format!("FiltersApplied {} {}", view_id, filters),
        CoordEvent::FiltersReset { view_id } => format!("FiltersReset {}", view_id),
        CoordEvent::RefreshComplete { view_id, mode } => format!("RefreshComplete {} ({})", view_id, mode),
    }
}

fn cmd_check(scenario_path: &Path) -> Result<()> {
    debug!(?scenario_path, "cmd_check: called");
    let scenario = Scenario::load(scenario_path)?;
    let errors = scenario.validate();

    if errors.is_empty() {
        println!("{} {} is clean", "✓".green(), scenario_path.display());
        return Ok(());
    }

    for error in &errors {
        println!("{} {}", "✗".red(), error);
    }
    Err(eyre::eyre!("{} configuration defect(s) found", errors.len()))
}

fn cmd_journal(path: &Path) -> Result<()> {
    debug!(?path, "cmd_journal: called");
    let entries = read_journal(path)?;
    if entries.is_empty() {
        println!("No events found");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{} {}",
            entry.timestamp.format("%H:%M:%S%.3f").to_string().dimmed(),
            describe_event(&entry.event)
        );
    }
    Ok(())
}
