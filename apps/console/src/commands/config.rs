//! `config show | init | path`.
//!
//! These work without opening the database, so `config init` can repair a
//! machine whose configuration does not load.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use storefront_remote::config::StorefrontConfig;

use super::{render, Message};
use crate::cli::ConfigAction;
use crate::error::ApiError;

const MASK: &str = "********";

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub path: Option<PathBuf>,
    pub exists: bool,
    pub config: StorefrontConfig,
}

impl fmt::Display for ConfigResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) if self.exists => writeln!(f, "# {}", path.display())?,
            Some(path) => writeln!(f, "# {} (not found, defaults shown)", path.display())?,
            None => writeln!(f, "# no config directory, defaults shown")?,
        }
        let body = toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?;
        write!(f, "{}", body.trim_end())
    }
}

pub fn execute(
    path: Option<PathBuf>,
    action: &ConfigAction,
    json: bool,
) -> Result<String, ApiError> {
    let path = path.or_else(StorefrontConfig::default_config_path);
    match action {
        ConfigAction::Show => render(&show(path)?, json),
        ConfigAction::Init { force } => render(&init(path, *force)?, json),
        ConfigAction::Path => {
            let path = path.ok_or_else(|| ApiError::internal("No config directory available"))?;
            render(&Message::new(path.display().to_string()), json)
        }
    }
}

/// Effective configuration, admin password masked.
pub fn show(path: Option<PathBuf>) -> Result<ConfigResponse, ApiError> {
    let mut config = StorefrontConfig::load(path.clone())?;
    if config.auth.admin_password.is_some() {
        config.auth.admin_password = Some(MASK.to_string());
    }
    Ok(ConfigResponse {
        exists: path.as_ref().is_some_and(|p| p.exists()),
        path,
        config,
    })
}

/// Writes the default configuration. An existing file needs `force`.
pub fn init(path: Option<PathBuf>, force: bool) -> Result<Message, ApiError> {
    let path = path.ok_or_else(|| ApiError::internal("No config directory available"))?;
    if path.exists() && !force {
        return Err(ApiError::validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    StorefrontConfig::default().save(Some(path.clone()))?;
    Ok(Message::new(format!("Wrote {}", path.display())))
}
