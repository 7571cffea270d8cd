//! Local persistence: TOML config and the SQLite pour store.
//!
//! The analytics modules never touch this layer. Callers load records through
//! [`PourSource`] and hand plain slices to the core.

mod config;
pub mod database;
mod source;

pub use config::{Config, DisplayConfig, LeadersConfig, SessionsConfig};
pub use database::{Database, NewKeg};
pub use source::PourSource;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the kegstats data directory, creating it if needed.
///
/// `KEGSTATS_HOME` overrides the location entirely. Otherwise the directory is
/// `~/.config/kegstats`, or `~/.config/kegstats-dev` when `KEGSTATS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("KEGSTATS_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("KEGSTATS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("kegstats-dev")
            } else {
                base_dir.join("kegstats")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
