//! # Clockout Core Library
//!
//! Decides, once per tick, whether it is time to remind the user to leave
//! work. The decision is a chain of small pure policies; the platform pieces
//! around it (settings storage, holiday feed, idle detection, notification
//! rendering) are traits so hosts can plug in their own.
//!
//! ## Architecture
//!
//! - **Policies**: time window and weekday ([`window`]), skip-today and
//!   holiday suppression ([`suppression`]), repeat throttle ([`throttle`])
//! - **Holiday Oracle**: year-keyed cache over a [`HolidaySource`], failing
//!   open to "no holidays"
//! - **Decision Engine**: composes the policies per [`Trigger`] and records
//!   `lastNotifiedAt` after notifying
//! - **Storage**: TOML settings record and runtime configuration
//!
//! ## Key Components
//!
//! - [`DecisionEngine`]: per-trigger skip-or-notify evaluation
//! - [`Settings`]: canonical persisted reminder settings
//! - [`HolidayOracle`]: holiday lookups with lazy yearly refresh
//! - [`Config`]: collaborator configuration

pub mod activity;
pub mod engine;
pub mod error;
pub mod holiday;
pub mod notify;
pub mod settings;
pub mod storage;
pub mod suppression;
pub mod throttle;
pub mod window;

pub use activity::{ActivityProbe, ActivityWatcher, AssumeActive, CommandProbe, IdleState};
pub use engine::{Clock, Decision, DecisionEngine, SkipReason, SystemClock, Trigger};
pub use error::{ConfigError, CoreError, HolidayError};
pub use holiday::{HolidayOracle, HolidayRecord, HolidaySource, HttpHolidaySource};
pub use notify::{CommandNotifier, ConsoleNotifier, Notification, Notifier};
pub use settings::{Settings, SettingsPatch};
pub use storage::{Config, FileSettingsStore, MemorySettingsStore, SettingsStore};
