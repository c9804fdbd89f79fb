// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schediora - command-line client for the Schediora study planner.
//!
//! This is the binary entry point.

mod auth;
mod context;
mod status;
mod study;
mod watch;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use schediora_core::{ChartRange, SchedioraError, TaskStatus};

/// Schediora - plan your study week from the terminal.
#[derive(Parser, Debug)]
#[command(name = "schediora", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show session, onboarding, and backend status.
    Status {
        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Sign in with email and password.
    Login(auth::CredentialArgs),
    /// Create an account and sign in.
    Register(auth::CredentialArgs),
    /// Sign out and forget stored tokens.
    Logout,
    /// Record onboarding preferences.
    Onboard(auth::OnboardArgs),
    /// Today's progress, streak, and charts.
    Dashboard {
        /// Chart range: 7d or 30d.
        #[arg(long, default_value = "7d")]
        range: ChartRange,
    },
    /// This week's tasks, stats, and timeline.
    Tasks,
    /// Add a manual study task.
    AddTask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        topic: String,
        /// Duration in minutes (at least 15).
        #[arg(long, default_value = "45")]
        duration: String,
    },
    /// Change a task's status (pending, in_progress, done).
    SetStatus {
        task_id: String,
        #[arg(value_parser = parse_task_status)]
        status: TaskStatus,
    },
    /// Generate this week's plan with the AI planner.
    GeneratePlan(study::GenerateArgs),
    /// Keep tasks, dashboard, and AI status fresh until interrupted.
    Watch {
        #[arg(long, default_value = "7d")]
        range: ChartRange,
    },
}

/// Strict status parsing for user input; only backend values are coerced.
fn parse_task_status(raw: &str) -> Result<TaskStatus, String> {
    raw.parse::<TaskStatus>()
        .map_err(|_| format!("unknown status `{raw}` (expected pending, in_progress, or done)"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => schediora_config::load_and_validate_path(path),
        None => schediora_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            schediora_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    if cli.plain || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    init_tracing(&config.app.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: schediora_config::SchedioraConfig,
) -> Result<(), SchedioraError> {
    let ctx = context::AppContext::open(config).await?;

    let result = match command {
        Commands::Status { json } => status::run_status(&ctx, json).await,
        Commands::Login(args) => auth::run_login(&ctx, &args, false).await,
        Commands::Register(args) => auth::run_login(&ctx, &args, true).await,
        Commands::Logout => auth::run_logout(&ctx).await,
        Commands::Onboard(args) => auth::run_onboard(&ctx, &args).await,
        Commands::Dashboard { range } => study::run_dashboard(&ctx, range).await,
        Commands::Tasks => study::run_tasks(&ctx).await,
        Commands::AddTask {
            title,
            topic,
            duration,
        } => study::run_add_task(&ctx, &title, &topic, &duration).await,
        Commands::SetStatus { task_id, status } => {
            study::run_set_status(&ctx, &task_id, status).await
        }
        Commands::GeneratePlan(args) => study::run_generate_plan(&ctx, &args).await,
        Commands::Watch { range } => watch::run_watch(&ctx, range).await,
    };

    ctx.close().await;
    result
}

/// Installs the `tracing` subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schediora={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
