//! Tick driver: startup/install trigger, periodic ticks, return-from-idle.

use clockout_core::error::Result;
use clockout_core::{ActivityWatcher, Config, Decision, FileSettingsStore, SettingsStore, Trigger};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::wiring;

fn report(trigger: Trigger, decision: &Decision) {
    match decision {
        Decision::Notify { at, .. } => info!(?trigger, at, "reminder delivered"),
        Decision::Skip { reason } => debug!(?trigger, ?reason, "no reminder"),
    }
}

/// `Install` when no settings have ever been written, `Startup` otherwise.
fn first_trigger(store: &dyn SettingsStore) -> Trigger {
    if store.is_initialized() {
        Trigger::Startup
    } else {
        Trigger::Install
    }
}

pub async fn run() -> Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let config = Config::load()?;
    let store = FileSettingsStore::open()?;
    let first = first_trigger(&store);
    let mut engine = wiring::build_engine(&config, store)?;
    let mut watcher = ActivityWatcher::new();

    info!(
        period_secs = config.ticker.period().as_secs(),
        "clockout running, press Ctrl-C to stop"
    );

    let mut ticker = tokio::time::interval(config.ticker.period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately and is covered by the startup trigger
    ticker.tick().await;

    tokio::select! {
        decision = engine.decide(first) => report(first, &decision),
        _ = &mut shutdown => {
            info!("stopping");
            return Ok(());
        }
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = engine.activity_state().await;
                let trigger = if watcher.observe(state) {
                    Trigger::BecameActive
                } else {
                    Trigger::Tick
                };
                report(trigger, &engine.decide_observed(trigger, state).await);
            }
            _ = &mut shutdown => {
                info!("stopping");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockout_core::{MemorySettingsStore, Settings};

    #[test]
    fn first_run_installs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.toml"));
        assert_eq!(first_trigger(&store), Trigger::Install);

        store.replace(&Settings::default()).unwrap();
        assert_eq!(first_trigger(&store), Trigger::Startup);
    }

    #[test]
    fn memory_store_always_starts_up() {
        assert_eq!(first_trigger(&MemorySettingsStore::default()), Trigger::Startup);
    }
}
