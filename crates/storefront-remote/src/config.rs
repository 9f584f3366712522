//! # Storefront Configuration
//!
//! Configuration for the feed client, the mocked auth boundary, local storage
//! and catalog defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_BASE_URL=http://localhost:4000                      │
//! │     STOREFRONT_ADMIN_EMAIL=owner@shop.test                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, otherwise                                         │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.console/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     DummyJSON feed, no admin account, 8 products per page              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "https://dummyjson.com"
//! request_timeout_secs = 30
//!
//! [auth]
//! admin_email = "owner@shop.test"
//! admin_password = "change-me"
//! latency_ms = 1000
//!
//! [storage]
//! database_path = "/var/lib/storefront/storefront.db"
//!
//! [catalog]
//! page_size = 8
//! general_limit = 30
//! seeded_categories = ["smartphones", "laptops", "home-decoration", "skincare"]
//! max_products = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{RemoteError, RemoteResult};

// =============================================================================
// API Settings
// =============================================================================

/// Product feed endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the DummyJSON-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

/// Mocked authentication settings.
///
/// There is no built-in admin account: without `admin_email` and
/// `admin_password` every successful sign-in is a regular user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    /// Display name of the admin identity.
    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    /// Simulated round-trip before every auth response (milliseconds).
    #[serde(default = "default_latency")]
    pub latency_ms: u64,
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

fn default_latency() -> u64 {
    1000
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            admin_email: None,
            admin_password: None,
            admin_name: default_admin_name(),
            latency_ms: default_latency(),
        }
    }
}

impl AuthSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// `true` when `email`/`password` is exactly the configured admin pair.
    pub fn is_admin_pair(&self, email: &str, password: &str) -> bool {
        match (&self.admin_email, &self.admin_password) {
            (Some(admin_email), Some(admin_password)) => {
                !admin_email.is_empty() && email == admin_email && password == admin_password
            }
            _ => false,
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file holding the session. Defaults to the platform data dir.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// How the catalog is assembled and shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Initial products per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// `limit` of the general (uncategorized) feed request.
    #[serde(default = "default_general_limit")]
    pub general_limit: usize,

    /// Categories fetched one request each.
    #[serde(default = "default_seeded_categories")]
    pub seeded_categories: Vec<String>,

    /// Upper bound on the assembled catalog.
    #[serde(default = "default_max_products")]
    pub max_products: usize,
}

fn default_page_size() -> usize {
    storefront_core::DEFAULT_PAGE_SIZE
}

fn default_general_limit() -> usize {
    30
}

fn default_seeded_categories() -> Vec<String> {
    ["smartphones", "laptops", "home-decoration", "skincare"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_products() -> usize {
    100
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            page_size: default_page_size(),
            general_limit: default_general_limit(),
            seeded_categories: default_seeded_categories(),
            max_products: default_max_products(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, then applies environment overrides.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (if exists)
    /// 3. Apply environment variable overrides
    /// 4. Validate final configuration
    pub fn load(config_path: Option<PathBuf>) -> RemoteResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RemoteResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RemoteError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RemoteResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.catalog.page_size == 0 {
            return Err(RemoteError::InvalidConfig(
                "page_size must be greater than 0".into(),
            ));
        }

        if self.catalog.general_limit == 0 {
            return Err(RemoteError::InvalidConfig(
                "general_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOREFRONT_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Some(path) = lookup("STOREFRONT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(email) = lookup("STOREFRONT_ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }

        if let Some(password) = lookup("STOREFRONT_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }

        if let Some(size) = lookup("STOREFRONT_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(n) => self.catalog.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring non-numeric STOREFRONT_PAGE_SIZE"),
            }
        }

        if let Some(latency) = lookup("STOREFRONT_AUTH_LATENCY_MS") {
            if let Ok(ms) = latency.parse::<u64>() {
                debug!(latency_ms = ms, "Overriding auth latency from environment");
                self.auth.latency_ms = ms;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "console")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved session database file.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "storefront", "console")
                    .map(|dirs| dirs.data_dir().join("storefront.db"))
            })
            .unwrap_or_else(|| PathBuf::from("storefront.db"))
    }
}
