use clap::Subcommand;
use clockout_core::error::Result;
use clockout_core::{ConfigError, FileSettingsStore, Settings, SettingsStore};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting value
    Get {
        /// Setting key (e.g. "intervalMinutes", "days")
        key: String,
    },
    /// Set a setting value
    Set {
        /// Setting key
        key: String,
        /// New value; days accept "[1,2,3]" or "1,2,3"
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction) -> Result<()> {
    let store = FileSettingsStore::open()?;
    match action {
        SettingsAction::Get { key } => {
            let settings = store.load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        SettingsAction::Set { key, value } => {
            let mut settings = store.load()?;
            settings.set(&key, &value)?;
            store.replace(&settings.normalized())?;
            println!("ok");
        }
        SettingsAction::List => {
            let settings = store.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            store.replace(&Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
