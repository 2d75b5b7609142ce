use chrono::Local;
use clockout_core::error::Result;
use clockout_core::suppression::{clear_skip_patch, skip_today_patch};
use clockout_core::window::date_string;
use clockout_core::{Config, FileSettingsStore, Notification, SettingsStore};

use super::wiring;

pub fn run(undo: bool) -> Result<()> {
    let config = Config::load()?;
    let store = FileSettingsStore::open()?;
    let today = Local::now();

    if undo {
        store.update(&clear_skip_patch())?;
        println!("reminders resumed");
    } else {
        let settings = store.update(&skip_today_patch(&today))?;
        println!("reminders skipped for {}", settings.last_skip_date);
    }
    wiring::notifier(&config).notify(&Notification::skip_toggled(!undo));
    tracing::debug!(date = %date_string(&today), undo, "skip updated");
    Ok(())
}
