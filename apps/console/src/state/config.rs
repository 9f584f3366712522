//! Loaded configuration plus the file it came from.

use std::path::PathBuf;

use storefront_remote::config::StorefrontConfig;
use storefront_remote::RemoteResult;

/// Read-only after startup.
#[derive(Debug, Clone)]
pub struct ConfigState {
    pub config: StorefrontConfig,

    /// `--config` path, or the platform default. `None` when the platform
    /// has no config directory.
    pub path: Option<PathBuf>,
}

impl ConfigState {
    /// Defaults, then the TOML file (if present), then environment overrides.
    pub fn load(explicit: Option<PathBuf>) -> RemoteResult<Self> {
        let path = explicit.or_else(StorefrontConfig::default_config_path);
        let config = StorefrontConfig::load(path.clone())?;
        Ok(ConfigState { config, path })
    }

    pub fn file_exists(&self) -> bool {
        self.path.as_ref().is_some_and(|p| p.exists())
    }
}

impl From<StorefrontConfig> for ConfigState {
    fn from(config: StorefrontConfig) -> Self {
        ConfigState { config, path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[catalog]\npage_size = 12\n").unwrap();

        let state = ConfigState::load(Some(path.clone())).unwrap();
        assert!(state.file_exists());
        assert_eq!(state.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = ConfigState::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert!(!state.file_exists());
        assert_eq!(state.config.auth.admin_name, "Admin");
    }
}
