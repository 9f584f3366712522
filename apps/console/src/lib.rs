//! # Storefront Console Library
//!
//! The `storefront` command: a shopper view of the product catalog with a
//! persisted session and cart, plus the admin dashboard.
//!
//! ## Module Organization
//! ```text
//! storefront_console/
//! ├── lib.rs          ◄─── You are here (logging, bootstrap, dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── shell.rs        ◄─── Interactive loop over the same commands
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState + Services
//! │   ├── session.rs  ◄─── Persisted identity and cart
//! │   ├── catalog.rs  ◄─── Fetched products + current query
//! │   ├── admin.rs    ◄─── Dashboard tables
//! │   └── config.rs   ◄─── Loaded configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch + rendering
//! │   ├── products.rs ◄─── Browse and categories
//! │   ├── auth.rs     ◄─── Login, register, logout, whoami
//! │   ├── cart.rs     ◄─── Cart add/show
//! │   ├── admin.rs    ◄─── Stats, tables, bulk actions, export
//! │   └── config.rs   ◄─── Config show/init/path
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use storefront_db::{Database, DbConfig, MemoryStore};
use storefront_remote::{MockAdminData, MockAuthService, RemoteCatalog};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::Flags;
use error::ApiError;
use state::{AppState, ConfigState, Services, SessionState, SharedStore};

/// Runs one invocation of the `storefront` binary.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Parse arguments (clap) ───────────────────────────────────────────► │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • stderr, default WARN; -v or RUST_LOG for more                     │
/// │                                                                         │
/// │  3. `config ...` runs here, before anything can fail to load           │
/// │                                                                         │
/// │  4. Bootstrap ────────────────────────────────────────────────────────► │
/// │     • Load config (file, then STOREFRONT_* env)                         │
/// │     • Open SQLite session store (or memory with --ephemeral)            │
/// │     • Build catalog, auth and admin data services                       │
/// │                                                                         │
/// │  5. Execute the command (or the shell loop), print the response        │
/// │                                                                         │
/// │  6. Close the database                                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Errors print as `error: <message>` (or a JSON [`ApiError`] with
/// `--json`) on stderr and exit with status 1.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, json);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), ApiError> {
    let flags = Flags {
        yes: cli.yes,
        json: cli.json,
    };

    if let Commands::Config { action } = &cli.command {
        println!("{}", commands::config::execute(cli.config, action, flags.json)?);
        return Ok(());
    }

    let (app, db) = bootstrap(cli.config, cli.ephemeral).await?;

    let result = match cli.command {
        Commands::Shell => shell::run(&app, flags).await.map_err(ApiError::from),
        command => commands::execute(&app, command, flags)
            .await
            .map(|output| println!("{}", output)),
    };

    if let Some(db) = db {
        db.close().await;
    }
    result
}

/// Builds the application state.
///
/// Returns the database alongside so the caller can close it; `None` when
/// the session lives in memory.
pub async fn bootstrap(
    config_path: Option<PathBuf>,
    ephemeral: bool,
) -> Result<(AppState, Option<Database>), ApiError> {
    let config = ConfigState::load(config_path)?;
    debug!(path = ?config.path, exists = config.file_exists(), "Configuration loaded");

    let (store, db): (SharedStore, Option<Database>) = if ephemeral {
        info!("Using in-memory session store");
        (Box::new(MemoryStore::new()), None)
    } else {
        let db_path = config.config.database_path();
        info!(?db_path, "Database path determined");
        let db = Database::new(DbConfig::new(db_path)).await?;
        (Box::new(db.local_storage()), Some(db))
    };
    let session = SessionState::open(store).await?;

    let settings = &config.config;
    let services = Services {
        catalog: Box::new(RemoteCatalog::dummy_json(
            &settings.api,
            settings.catalog.clone(),
        )?),
        auth: Box::new(MockAuthService::new(settings.auth.clone())),
        admin_data: Box::new(MockAdminData),
    };

    Ok((AppState::new(config, session, services), db))
}

fn report(err: &ApiError, json: bool) {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("error: {}", err),
        }
    } else {
        eprintln!("error: {}", err);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: WARN, so command output stays clean
/// - `-v`: INFO, DEBUG for the storefront crates
/// - `RUST_LOG=storefront_remote=trace` overrides both
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,storefront=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
