mod config;
pub mod settings_store;

pub use config::{ActivityConfig, Config, HolidaysConfig, NotificationsConfig, TickerConfig};
pub use settings_store::{FileSettingsStore, MemorySettingsStore, SettingsStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory holding `settings.toml` and `config.toml`.
///
/// `CLOCKOUT_DATA_DIR` wins when set. Otherwise `~/.config/clockout[-dev]/`
/// based on CLOCKOUT_ENV; set CLOCKOUT_ENV=dev to use the development
/// directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CLOCKOUT_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CLOCKOUT_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("clockout-dev")
            } else {
                base_dir.join("clockout")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
