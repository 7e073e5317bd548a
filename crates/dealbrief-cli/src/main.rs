mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{ingest, report, users, Context};
use crate::error::{exit_code_for, report_error};
use dealbrief_config as config;
use dealbrief_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "dealbrief", version, about = "dealbrief CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "add-user")]
    AddUser(users::AddUserArgs),
    #[command(name = "list-users")]
    ListUsers(users::ListUsersArgs),
    /// Process one canonical inbound email payload (JSON)
    Ingest(ingest::IngestArgs),
    #[command(name = "list-contacts")]
    ListContacts(users::ListContactsArgs),
    #[command(name = "list-meetings")]
    ListMeetings(users::ListMeetingsArgs),
    /// Weekly brief for one user
    Report(report::ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store = Store::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::AddUser(args) => users::add_user(&ctx, args),
        Command::ListUsers(args) => users::list_users(&ctx, args),
        Command::Ingest(args) => ingest::ingest(&ctx, args),
        Command::ListContacts(args) => users::list_contacts(&ctx, args),
        Command::ListMeetings(args) => users::list_meetings(&ctx, args),
        Command::Report(args) => report::report(&ctx, args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
