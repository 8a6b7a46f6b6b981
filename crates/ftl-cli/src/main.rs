use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ftl_cli::commands::util::evaluation_instant;
use ftl_cli::commands::{
    add, aircraft, delete, duty, export, fleet, import, pilot, recompute, rest, status,
};
use ftl_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(ftl_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = ftl_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let rules = config.rules();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Add(args) => {
            add::run(&mut out, &mut db, args, Utc::now())?;
        }
        Commands::Import { path } => {
            import::run(&mut out, &mut db, &path, Utc::now())?;
        }
        Commands::Export => {
            export::run(&mut out, &db)?;
        }
        Commands::Pilot(args) => {
            let now = evaluation_instant(args.at);
            pilot::run(&mut out, &db, &args.name, now, &rules, args.json)?;
        }
        Commands::Duty { name, json } => duty::run(&mut out, &db, &name, &rules, json)?,
        Commands::Rest(args) => {
            let now = evaluation_instant(args.at);
            rest::run(&mut out, &db, &args.name, now, &rules, args.json)?;
        }
        Commands::Aircraft { registration, json } => {
            aircraft::run(&mut out, &db, &registration, json)?;
        }
        Commands::Fleet { at, json } => {
            fleet::run(&mut out, &db, evaluation_instant(at), &rules, json)?;
        }
        Commands::Delete { id } => delete::run(&mut out, &mut db, &id, Utc::now())?,
        Commands::Recompute => recompute::run(&mut out, &mut db, Utc::now())?,
        Commands::Status => status::run(&mut out, &db, &config)?,
    }

    out.flush()?;
    Ok(())
}
