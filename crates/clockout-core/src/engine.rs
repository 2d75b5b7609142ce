//! Notification decision engine.
//!
//! One call to [`DecisionEngine::decide`] per trigger. The gates run in a
//! fixed order and the first one that fails ends the evaluation with a
//! [`Decision::Skip`]:
//!
//! 1. reminders disabled
//! 2. weekday not selected
//! 3. user skipped today
//! 4. today is a holiday (only when holiday skipping is on)
//! 5. outside the daily window
//! 6. user not active
//! 7. interval since the last notification not elapsed
//!
//! Only when all pass is the notifier called and `lastNotifiedAt` written.
//! Gates 1-3 and 5 are pure functions of the settings and the local time, so
//! they can be tested without any collaborator.
//!
//! A settings record that cannot be read withholds the reminder: the stored
//! `enabled` flag and `lastNotifiedAt` are unknown, so neither the on/off
//! switch nor the throttle could be honored.

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::activity::{ActivityProbe, IdleState};
use crate::holiday::HolidayOracle;
use crate::notify::{Notification, Notifier};
use crate::settings::{Settings, SettingsPatch};
use crate::storage::SettingsStore;
use crate::suppression::{is_holiday_suppressed, is_suppressed_today};
use crate::throttle::{is_notification_due, next_due_at};
use crate::window::{is_allowed_weekday, is_within_window};

/// What caused an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Periodic alarm, nominally once a minute.
    Tick,
    /// Process start.
    Startup,
    /// First start with no stored settings.
    Install,
    /// User came back from idle or lock.
    BecameActive,
}

impl Trigger {
    /// Immediate triggers bypass the interval throttle.
    pub fn is_immediate(self) -> bool {
        !matches!(self, Trigger::Tick)
    }
}

/// Why a tick ended without a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SettingsUnavailable,
    Disabled,
    NotAllowedWeekday,
    SkippedToday,
    Holiday,
    OutsideWindow,
    UserInactive,
    Throttled,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Skip {
        reason: SkipReason,
    },
    Notify {
        notification: Notification,
        /// Epoch milliseconds written to `lastNotifiedAt`.
        at: i64,
    },
}

impl Decision {
    pub fn is_notify(&self) -> bool {
        matches!(self, Decision::Notify { .. })
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Decision::Skip { reason } => Some(*reason),
            Decision::Notify { .. } => None,
        }
    }
}

/// Gates 1-3: enabled, weekday, manual skip.
pub fn day_gate<T: Datelike>(settings: &Settings, now: &T) -> Option<SkipReason> {
    if !settings.enabled {
        return Some(SkipReason::Disabled);
    }
    if !is_allowed_weekday(&settings.days, now) {
        return Some(SkipReason::NotAllowedWeekday);
    }
    if is_suppressed_today(settings, now) {
        return Some(SkipReason::SkippedToday);
    }
    None
}

/// Gate 5: daily window.
pub fn window_gate<T: Timelike>(settings: &Settings, now: &T) -> Option<SkipReason> {
    let inside = is_within_window(
        now,
        settings.start_hour,
        settings.start_minute,
        settings.latest_hour,
        settings.latest_minute,
    );
    (!inside).then_some(SkipReason::OutsideWindow)
}

/// Gates 1-5 with the holiday answer supplied by the caller.
pub fn calendar_gate<T: Datelike + Timelike>(
    settings: &Settings,
    now: &T,
    is_holiday: bool,
) -> Option<SkipReason> {
    day_gate(settings, now)
        .or_else(|| (settings.skip_taiwan_holidays && is_holiday).then_some(SkipReason::Holiday))
        .or_else(|| window_gate(settings, now))
}

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the host's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Default idle threshold handed to the activity probe.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(60);

/// Composes the policies with the settings store and the platform
/// collaborators.
pub struct DecisionEngine {
    store: Box<dyn SettingsStore>,
    holidays: HolidayOracle,
    activity: Box<dyn ActivityProbe>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    idle_threshold: Duration,
    /// Last delivery by this engine, in case the store write was lost.
    last_delivered: i64,
}

impl DecisionEngine {
    pub fn new(
        store: Box<dyn SettingsStore>,
        holidays: HolidayOracle,
        activity: Box<dyn ActivityProbe>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            holidays,
            activity,
            notifier,
            clock: Box::new(SystemClock),
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            last_delivered: 0,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_idle_threshold(mut self, threshold: Duration) -> Self {
        self.idle_threshold = threshold;
        self
    }

    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    pub fn holidays(&self) -> &HolidayOracle {
        &self.holidays
    }

    /// Current idle state as seen by the engine's probe.
    pub async fn activity_state(&self) -> IdleState {
        self.activity.query_state(self.idle_threshold).await
    }

    /// Evaluate one trigger. Never fails: collaborator errors are logged and
    /// resolved to a skip or a best-effort notify.
    pub async fn decide(&mut self, trigger: Trigger) -> Decision {
        self.decide_with(trigger, None).await
    }

    /// Like [`decide`](Self::decide), reusing an idle state the caller has
    /// already queried this tick instead of asking the probe again.
    pub async fn decide_observed(&mut self, trigger: Trigger, state: IdleState) -> Decision {
        self.decide_with(trigger, Some(state)).await
    }

    async fn decide_with(&mut self, trigger: Trigger, observed: Option<IdleState>) -> Decision {
        if trigger == Trigger::Install {
            if let Err(e) = self.store.ensure_defaults() {
                warn!(error = %e, "failed to write default settings");
            }
        }

        let now = self.clock.now();
        let decision = match self.store.load() {
            Ok(settings) => self.evaluate(&settings, now, trigger.is_immediate(), observed).await,
            Err(e) => {
                warn!(error = %e, "settings unreadable, reminder withheld");
                Decision::Skip {
                    reason: SkipReason::SettingsUnavailable,
                }
            }
        };

        if let Decision::Skip { reason } = &decision {
            debug!(?trigger, ?reason, "reminder skipped");
        }
        decision
    }

    async fn evaluate(
        &mut self,
        settings: &Settings,
        now: DateTime<FixedOffset>,
        immediate: bool,
        observed: Option<IdleState>,
    ) -> Decision {
        let skip = |reason| Decision::Skip { reason };

        // weekday and manual skip first so those days never hit the holiday feed
        if let Some(reason) = day_gate(settings, &now) {
            return skip(reason);
        }
        let holiday = is_holiday_suppressed(settings, &mut self.holidays, &now).await;
        if let Some(reason) = calendar_gate(settings, &now, holiday) {
            return skip(reason);
        }

        let state = match observed {
            Some(state) => state,
            None => self.activity_state().await,
        };
        if state != IdleState::Active {
            return skip(SkipReason::UserInactive);
        }

        let now_ms = now.timestamp_millis();
        let last = settings.last_notified_at.max(self.last_delivered);
        if !is_notification_due(last, settings.interval_minutes, now_ms, immediate) {
            debug!(
                next_due_at = next_due_at(last, settings.interval_minutes),
                "interval not elapsed"
            );
            return skip(SkipReason::Throttled);
        }

        self.deliver(now, now_ms)
    }

    fn deliver(&mut self, now: DateTime<FixedOffset>, now_ms: i64) -> Decision {
        let time = now.format("%H:%M").to_string();
        let notification = Notification::clock_out(&time);
        self.notifier.notify(&notification);
        self.last_delivered = now_ms;
        info!(%time, "time to clock out, reminder sent");

        if let Err(e) = self.store.update(&SettingsPatch::notified_at(now_ms)) {
            warn!(error = %e, "failed to record notification time");
        }

        Decision::Notify {
            notification,
            at: now_ms,
        }
    }
}
