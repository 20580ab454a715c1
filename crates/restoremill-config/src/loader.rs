//! Layered settings loading

use crate::error::{ConfigError, ConfigResult};
use crate::settings::RestoreSettings;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "restoremill.toml";
pub const ENV_PREFIX: &str = "RESTOREMILL__";

/// Loads `RestoreSettings` for a solution directory
///
/// Sources are layered in the following priority order (highest to lowest):
/// 1. Environment variables (`RESTOREMILL__*`, `__` separates nested keys)
/// 2. `restoremill.toml` files from the solution directory up to the
///    filesystem root (closer files win)
/// 3. The user-level file (`$RESTOREMILL_HOME/restoremill.toml`, or
///    `~/.restoremill/restoremill.toml`)
/// 4. Default values
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    solution_dir: PathBuf,
    user_config: Option<PathBuf>,
    read_env: bool,
}

impl SettingsLoader {
    pub fn new(solution_dir: impl Into<PathBuf>) -> Self {
        Self {
            solution_dir: solution_dir.into(),
            user_config: Self::default_user_config(),
            read_env: true,
        }
    }

    /// Use a specific user-level file instead of the default location
    pub fn with_user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = path;
        self
    }

    /// Skip `RESTOREMILL__*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    fn default_user_config() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("RESTOREMILL_HOME").filter(|h| !h.is_empty()) {
            return Some(PathBuf::from(home).join(CONFIG_FILE_NAME));
        }
        dirs::home_dir().map(|home| home.join(".restoremill").join(CONFIG_FILE_NAME))
    }

    /// Config files applying to the solution directory, most specific first
    pub fn config_file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .solution_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
            .collect();

        if let Some(user_config) = &self.user_config {
            if user_config.is_file() && !paths.contains(user_config) {
                paths.push(user_config.clone());
            }
        }
        paths
    }

    pub fn load(&self) -> ConfigResult<RestoreSettings> {
        let config_files = self.config_file_paths();

        let mut figment = Figment::from(Serialized::defaults(RestoreSettings::default()));

        // Least specific first so closer files override
        for path in config_files.iter().rev() {
            tracing::debug!(path = %path.display(), "Merging restore settings file");
            figment = figment.merge(Toml::file(path));
        }

        if self.read_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let mut settings: RestoreSettings = figment
            .extract()
            .map_err(|e| ConfigError::load(e.to_string()))?;
        settings.config_file_paths = config_files;

        settings.validate()?;

        tracing::info!(
            solution_dir = %self.solution_dir.display(),
            config_files = settings.config_file_paths.len(),
            sources = settings.sources.len(),
            "Restore settings loaded"
        );

        Ok(settings)
    }
}

/// Load settings for `solution_dir` with the default layering
pub fn load_settings(solution_dir: &Path) -> ConfigResult<RestoreSettings> {
    SettingsLoader::new(solution_dir).load()
}
