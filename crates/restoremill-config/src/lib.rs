//! Restore settings and logging configuration
//!
//! Settings answer the questions the graph overlay asks: where the global
//! packages folder lives, which package sources and fallback folders apply,
//! and which config files those answers came from.

pub mod error;
pub mod loader;
pub mod logging;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use loader::{SettingsLoader, CONFIG_FILE_NAME};
pub use logging::{LogFormat, LoggingConfig};
pub use settings::{NullSettings, RestoreSettings, Settings};
