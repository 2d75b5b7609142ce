use clockout_core::error::Result;
use clockout_core::{Config, FileSettingsStore, Trigger};

use super::wiring;

pub async fn run(immediate: bool) -> Result<()> {
    let config = Config::load()?;
    let store = FileSettingsStore::open()?;
    let mut engine = wiring::build_engine(&config, store)?;

    let trigger = if immediate {
        Trigger::Startup
    } else {
        Trigger::Tick
    };
    let decision = engine.decide(trigger).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
