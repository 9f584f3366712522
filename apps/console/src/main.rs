//! # Storefront Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       `storefront` binary                               │
//! │                                                                         │
//! │  main.rs ────► hands off to storefront_console::run()                   │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, database, state, dispatch               │
//! │                                                                         │
//! │  commands/ ──► products, login, cart add, admin users deactivate, ...   │
//! │                                                                         │
//! │  state/ ─────► SessionState, CatalogState, AdminState, ConfigState      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    storefront_console::run().await
}
