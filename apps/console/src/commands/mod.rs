//! # Commands Module
//!
//! One function per console command, grouped by area.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console Commands                                     │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐                       │
//! │  │  products.rs        │  │  auth.rs            │                       │
//! │  │  • browse           │  │  • login            │                       │
//! │  │  • categories       │  │  • register         │                       │
//! │  └─────────────────────┘  │  • logout / whoami  │                       │
//! │                           └─────────────────────┘                       │
//! │  ┌─────────────────────┐  ┌─────────────────────────────────────────┐   │
//! │  │  cart.rs            │  │  admin.rs (admin role required)         │   │
//! │  │  • add              │  │  • stats                                │   │
//! │  │  • show             │  │  • products list/add/edit/delete        │   │
//! │  └─────────────────────┘  │  • orders list/status/delete            │   │
//! │                           │  • users list/activate/deactivate/delete│   │
//! │  ┌─────────────────────┐  │  • export users/products/orders         │   │
//! │  │  config.rs          │  └─────────────────────────────────────────┘   │
//! │  │  • show/init/path   │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Responses
//! Every command returns a value that is both `Serialize` (for `--json`)
//! and `Display` (for the terminal); [`render`] picks one.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod config;
pub mod products;

use std::fmt;

use serde::Serialize;
use storefront_core::validation::RegistrationForm;

use crate::cli::{CartAction, Commands};
use crate::error::ApiError;
use crate::state::AppState;

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    /// Confirms destructive actions.
    pub yes: bool,
    pub json: bool,
}

/// Runs one parsed command against `app` and returns its rendered output.
pub async fn execute(app: &AppState, command: Commands, flags: Flags) -> Result<String, ApiError> {
    let json = flags.json;
    match command {
        Commands::Products(args) if args.categories => {
            render(&products::categories(app).await, json)
        }
        Commands::Products(args) => render(&products::browse(app, &args).await?, json),
        Commands::Login { email, password } => {
            render(&auth::login(app, &email, &password).await?, json)
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm {
                name,
                email,
                password,
                confirm_password,
            };
            render(&auth::register(app, &form).await?, json)
        }
        Commands::Logout => render(&auth::logout(app).await?, json),
        Commands::Whoami => render(&auth::whoami(app).await, json),
        Commands::Cart { action } => match action {
            CartAction::Add { id } => render(&cart::add(app, id).await?, json),
            CartAction::Show => render(&cart::show(app).await, json),
        },
        Commands::Admin { action } => admin::execute(app, action, flags).await,
        Commands::Config { action } => config::execute(app.config.path.clone(), &action, json),
        Commands::Shell => Err(ApiError::validation("Already in the shell")),
    }
}

/// Pretty JSON, or the value's terminal rendering.
pub fn render<T: Serialize + fmt::Display>(value: &T, json: bool) -> Result<String, ApiError> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(value.to_string())
    }
}

/// Plain message response.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Cuts `text` to `width` characters, marking the cut with `…`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}
