//! The settings boundary consumed by the graph overlay

use crate::error::{ConfigError, ConfigResult};
use crate::logging::LoggingConfig;
use restoremill_foundation::PackageSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Live restore configuration as seen by the overlay
pub trait Settings: Send + Sync + fmt::Debug {
    /// Folder packages are extracted to when a project does not declare one
    fn global_packages_folder(&self) -> Option<PathBuf>;

    /// Enabled package sources, in declaration order
    fn enabled_sources(&self) -> Vec<PackageSource>;

    /// Read-only folders consulted before downloading a package
    fn fallback_folders(&self) -> Vec<String>;

    /// Config files that contributed to these settings, most specific first
    fn config_file_paths(&self) -> Vec<PathBuf>;
}

/// Settings used when a caller supplies none: every question has an empty answer
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSettings;

impl Settings for NullSettings {
    fn global_packages_folder(&self) -> Option<PathBuf> {
        None
    }

    fn enabled_sources(&self) -> Vec<PackageSource> {
        Vec::new()
    }

    fn fallback_folders(&self) -> Vec<String> {
        Vec::new()
    }

    fn config_file_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

pub const DEFAULT_SOURCE_NAME: &str = "nuget.org";
pub const DEFAULT_SOURCE_URL: &str = "https://api.nuget.org/v3/index.json";

/// Restore settings loaded from `restoremill.toml` files and the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_packages_folder: Option<PathBuf>,
    #[serde(default)]
    pub fallback_folders: Vec<String>,
    #[serde(default)]
    pub sources: Vec<PackageSource>,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Files the settings were read from; filled in by the loader
    #[serde(skip)]
    pub config_file_paths: Vec<PathBuf>,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            global_packages_folder: None,
            fallback_folders: Vec::new(),
            sources: vec![PackageSource::named(DEFAULT_SOURCE_NAME, DEFAULT_SOURCE_URL)],
            logging: LoggingConfig::default(),
            config_file_paths: Vec::new(),
        }
    }
}

impl RestoreSettings {
    /// `~/.nuget/packages`, or `NUGET_PACKAGES` when set
    pub fn default_global_packages_folder() -> Option<PathBuf> {
        if let Ok(folder) = std::env::var("NUGET_PACKAGES") {
            if !folder.trim().is_empty() {
                return Some(PathBuf::from(folder));
            }
        }
        dirs::home_dir().map(|home| home.join(".nuget").join("packages"))
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the settings
    pub fn validate(&self) -> ConfigResult<()> {
        for source in &self.sources {
            if source.source.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "Package source '{}' has an empty location",
                    source.name
                )));
            }
            if source.name.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "Package source '{}' has an empty name",
                    source.source
                )));
            }
        }

        if self
            .fallback_folders
            .iter()
            .any(|folder| folder.trim().is_empty())
        {
            return Err(ConfigError::invalid("Fallback folders cannot be empty"));
        }

        self.logging.validate()
    }
}

impl Settings for RestoreSettings {
    fn global_packages_folder(&self) -> Option<PathBuf> {
        self.global_packages_folder
            .clone()
            .or_else(Self::default_global_packages_folder)
    }

    fn enabled_sources(&self) -> Vec<PackageSource> {
        self.sources.iter().filter(|s| s.is_enabled).cloned().collect()
    }

    fn fallback_folders(&self) -> Vec<String> {
        self.fallback_folders.clone()
    }

    fn config_file_paths(&self) -> Vec<PathBuf> {
        self.config_file_paths.clone()
    }
}
