//! Environment-driven configuration.
//!
//! Blank environment values are treated as unset.

use crate::logging::default_log_level;
use crate::richtext::highlight::resolve_highlight_color;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ORACULO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ORACULO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ORACULO_LOG_DIR";
pub const ENV_HIGHLIGHT_COLOR: &str = "ORACULO_HIGHLIGHT_COLOR";

const DEFAULT_DB_FILE_NAME: &str = "oraculo_notes.sqlite3";

/// Resolved runtime settings shared by the adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraculoConfig {
    /// SQLite file backing local storage.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Already validated; falls back to the default color.
    pub highlight_color: String,
}

impl OraculoConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            highlight_color: resolve_highlight_color(read(ENV_HIGHLIGHT_COLOR).as_deref()),
        }
    }
}
