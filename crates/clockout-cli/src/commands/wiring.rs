//! Builds the decision engine from the on-disk configuration.

use clockout_core::activity::{ActivityProbe, AssumeActive, CommandProbe};
use clockout_core::error::Result;
use clockout_core::holiday::{HolidayOracle, HttpHolidaySource};
use clockout_core::notify::{CommandNotifier, ConsoleNotifier, Notifier};
use clockout_core::{Config, DecisionEngine, FileSettingsStore};

pub fn activity_probe(config: &Config) -> Box<dyn ActivityProbe> {
    match CommandProbe::from_command_line(&config.activity.idle_command) {
        Some(probe) => Box::new(probe),
        None => Box::new(AssumeActive),
    }
}

pub fn notifier(config: &Config) -> Box<dyn Notifier> {
    match CommandNotifier::from_command_line(&config.notifications.command) {
        Some(notifier) => Box::new(notifier),
        None => Box::new(ConsoleNotifier),
    }
}

pub fn build_engine(
    config: &Config,
    store: FileSettingsStore,
) -> Result<DecisionEngine> {
    let source = HttpHolidaySource::new(&config.holidays.base_url)?;
    let holidays = HolidayOracle::new(Box::new(source));
    let engine = DecisionEngine::new(
        Box::new(store),
        holidays,
        activity_probe(config),
        notifier(config),
    )
    .with_idle_threshold(config.activity.idle_threshold());
    Ok(engine)
}
