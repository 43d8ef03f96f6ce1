//! # Reconciler Main Entry Point
//!
//! Command line entry point: applies migrations and runs reconciliation
//! subtasks against one scope.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use reconciler::{
    config::ConfigLoader,
    db,
    pipeline::{SubtaskContext, SubtaskRegistry},
    scope::ScopeKey,
    telemetry,
};

#[derive(Debug, Parser)]
#[command(name = "reconciler", about = "Staged data reconciliation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Run reconciliation subtasks for one scope
    Run {
        #[arg(long)]
        connection_id: i64,
        #[arg(long)]
        scope_id: String,
        /// Subtask to run; repeat to select several. Defaults to all.
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// List available subtasks
    Subtasks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;
    telemetry::init_tracing(&config).context("failed to initialize tracing")?;

    info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let registry = SubtaskRegistry::builtin();

    match cli.command {
        Command::Subtasks => {
            for subtask in registry.list() {
                println!("{:<20} {}", subtask.name(), subtask.description());
            }
        }
        Command::Migrate => {
            let db = db::init_pool(&config).await?;
            db::run_migrations(&db).await?;
            info!("Migrations applied");
        }
        Command::Run {
            connection_id,
            scope_id,
            subtasks,
        } => {
            let db = db::init_pool(&config).await?;
            db::health_check(&db).await?;
            db::run_migrations(&db).await?;

            let ctx = SubtaskContext {
                db: &db,
                scope: ScopeKey::new(connection_id, scope_id),
            };
            let outcomes = registry
                .run(&ctx, &subtasks)
                .await
                .with_context(|| format!("reconciliation failed for scope {}", ctx.scope))?;
            for (name, outcome) in outcomes {
                println!("{name}: {outcome:?}");
            }
        }
    }

    Ok(())
}
