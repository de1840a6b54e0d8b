use anyhow::Result;
use clap::{ArgGroup, Parser};
use colored::Colorize;

use snowenv_catalog::SnowflakeSession;
use snowenv_core::{ConnectionConfig, SOURCE_DATABASE};
use snowenv_engine::{create_environment, drop_environment};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// snowenv - clone-based Snowflake development environments
#[derive(Parser)]
#[command(name = "snowenv")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("action").args(["create", "drop"])))]
struct Cli {
    /// Create the environment as a clone of the source database
    #[arg(long)]
    create: bool,

    /// Drop the environment
    #[arg(long)]
    drop: bool,

    /// Environment (database) name; hyphens become underscores
    #[arg(long)]
    database: String,

    /// Role that receives ownership of everything in the new environment
    #[arg(long, required_if_eq("create", "true"))]
    target_role: Option<String>,

    /// Database new environments are cloned from
    #[arg(long, default_value = SOURCE_DATABASE)]
    source_database: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // The connection settings are required up front, whatever the action;
    // a broken CI environment should fail before any warehouse call.
    let config = ConnectionConfig::from_env().map_err(|e| {
        anyhow::anyhow!("{e}. Set the SNOWFLAKE_* variables or add them to a .env file")
    })?;
    tracing::debug!(?config, "configuration loaded");

    if !cli.create && !cli.drop {
        // No action requested; nothing to execute.
        return Ok(());
    }

    let session = SnowflakeSession::connect(&config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to open Snowflake session: {e}"))?;

    if cli.create {
        let target_role = cli.target_role.as_deref().unwrap_or_default();
        let summary = create_environment(
            &session,
            &cli.database,
            target_role,
            &cli.source_database,
        )
        .await?;

        println!(
            "{} {} ({} tables/views, {} functions, {} masking policies transferred to {})",
            "Created".green().bold(),
            cli.database,
            summary.tables,
            summary.functions,
            summary.masking_policies,
            target_role,
        );
    } else {
        drop_environment(&session, &cli.database).await?;
        println!("{} {}", "Dropped".green().bold(), cli.database);
    }

    Ok(())
}
