use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grade_stats::api::state::AppState;
use grade_stats::config::AppConfig;
use grade_stats::models::{AcademicYear, Semester};
use grade_stats::statistics::StatisticsEngine;
use grade_stats::storage::{JsonlStore, StorageConfig};

#[derive(Parser)]
#[command(name = "grade-stats")]
#[command(about = "Student ranking and grade statistics engine")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for one student and period
    Stats {
        /// Student identifier
        #[arg(long)]
        user: String,

        /// Semester (e.g., "S5")
        #[arg(long)]
        semester: String,

        /// Academic year (e.g., "2025-2026"), defaults to the current one
        #[arg(long)]
        year: Option<String>,
    },

    /// List the periods a student has records for
    Periods {
        /// Student identifier
        #[arg(long)]
        user: String,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting grade-stats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let engine = StatisticsEngine::new(
        Arc::new(JsonlStore::new(storage)),
        config.statistics.clone(),
    );

    match cli.command {
        Commands::Stats {
            user,
            semester,
            year,
        } => {
            let semester: Semester = semester.parse()?;
            let academic_year = match year {
                Some(year) => year.parse()?,
                None => AcademicYear::containing(chrono::Local::now().date_naive()),
            };

            let result = engine
                .compute_statistics(&user, semester, academic_year)
                .await?;
            for failure in &result.failures {
                eprintln!("warning: {} level failed: {}", failure.level, failure.message);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Periods { user } => {
            let periods = engine.student_periods(&user).await?;
            if periods.is_empty() {
                eprintln!("No records for {}", user);
            }
            for period in periods {
                println!("{}", period);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(engine).with_cors_origin(config.server.cors_origin.clone());
            let app = grade_stats::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(
                "Serving statistics from {:?} on http://{}",
                config.data_dir,
                addr
            );
            axum::serve(listener, app).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
