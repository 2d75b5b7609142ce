//! End-to-end decision scenarios with in-memory collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, TimeZone};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clockout_core::holiday::{HolidayOracle, HolidayRecord, HolidaySource};
use clockout_core::{
    ActivityProbe, Clock, ConfigError, Decision, DecisionEngine, FileSettingsStore, HolidayError,
    IdleState, MemorySettingsStore, Notification, Notifier, Settings, SettingsPatch,
    SettingsStore, SkipReason, Trigger,
};

// ============================================================================
// Test Collaborators
// ============================================================================

#[derive(Clone)]
struct ManualClock(Arc<Mutex<DateTime<FixedOffset>>>);

impl ManualClock {
    fn at(now: DateTime<FixedOffset>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    fn set(&self, now: DateTime<FixedOffset>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.0.lock().unwrap()
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier(Arc<Mutex<Vec<Notification>>>);

impl RecordingNotifier {
    fn sent(&self) -> Vec<Notification> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.0.lock().unwrap().push(notification.clone());
    }
}

#[derive(Clone)]
struct FixedProbe(Arc<Mutex<IdleState>>);

impl FixedProbe {
    fn new(state: IdleState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    fn set(&self, state: IdleState) {
        *self.0.lock().unwrap() = state;
    }
}

#[async_trait]
impl ActivityProbe for FixedProbe {
    async fn query_state(&self, _threshold: Duration) -> IdleState {
        *self.0.lock().unwrap()
    }
}

struct StubHolidays {
    records: Option<Vec<HolidayRecord>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl HolidaySource for StubHolidays {
    async fn fetch_year(&self, _year: i32) -> Result<Vec<HolidayRecord>, HolidayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .clone()
            .ok_or_else(|| HolidayError::Unavailable("offline".into()))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Local time in Taipei (UTC+8). 2024-01-01 is a Monday.
fn taipei(d: u32, hh: u32, mm: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, d, hh, mm, 0)
        .unwrap()
}

struct Harness {
    engine: DecisionEngine,
    clock: ManualClock,
    notifier: RecordingNotifier,
    probe: FixedProbe,
    holiday_calls: Arc<AtomicUsize>,
}

impl Harness {
    fn new(settings: Settings, now: DateTime<FixedOffset>) -> Self {
        Self::build(Box::new(MemorySettingsStore::new(settings)), now, Some(vec![]))
    }

    fn build(
        store: Box<dyn SettingsStore>,
        now: DateTime<FixedOffset>,
        holidays: Option<Vec<HolidayRecord>>,
    ) -> Self {
        let clock = ManualClock::at(now);
        let notifier = RecordingNotifier::default();
        let probe = FixedProbe::new(IdleState::Active);
        let holiday_calls = Arc::new(AtomicUsize::new(0));
        let oracle = HolidayOracle::new(Box::new(StubHolidays {
            records: holidays,
            calls: holiday_calls.clone(),
        }));

        let engine = DecisionEngine::new(
            store,
            oracle,
            Box::new(probe.clone()),
            Box::new(notifier.clone()),
        )
        .with_clock(Box::new(clock.clone()));

        Self {
            engine,
            clock,
            notifier,
            probe,
            holiday_calls,
        }
    }

    fn stored(&self) -> Settings {
        self.engine.store().load().unwrap()
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn monday_evening_notifies_and_records_time() {
    let now = taipei(1, 17, 5);
    let mut h = Harness::new(Settings::default(), now);

    let decision = h.engine.decide(Trigger::Tick).await;

    assert!(decision.is_notify());
    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].message.contains("17:05"));
    assert_eq!(h.stored().last_notified_at, now.timestamp_millis());
    match decision {
        Decision::Notify { at, notification } => {
            assert_eq!(at, now.timestamp_millis());
            assert_eq!(notification, sent[0]);
        }
        other => panic!("expected notify, got {other:?}"),
    }
}

#[tokio::test]
async fn skip_today_suppresses_until_midnight() {
    let settings = Settings {
        skip_today: true,
        last_skip_date: "2024-01-01".into(),
        ..Settings::default()
    };
    let mut h = Harness::new(settings, taipei(1, 17, 5));

    assert_eq!(
        h.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::SkippedToday)
    );
    assert!(h.notifier.sent().is_empty());

    h.clock.set(taipei(2, 17, 5));
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());
}

#[tokio::test]
async fn after_latest_time_is_skipped() {
    let mut h = Harness::new(Settings::default(), taipei(1, 23, 1));
    assert_eq!(
        h.engine.decide(Trigger::Startup).await.skip_reason(),
        Some(SkipReason::OutsideWindow)
    );
    assert_eq!(h.stored().last_notified_at, 0);
}

#[tokio::test]
async fn ticks_are_throttled_but_immediate_triggers_are_not() {
    let mut h = Harness::new(Settings::default(), taipei(1, 17, 5));
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());

    h.clock.set(taipei(1, 17, 19));
    assert_eq!(
        h.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::Throttled)
    );

    h.clock.set(taipei(1, 17, 20));
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());

    h.clock.set(taipei(1, 17, 21));
    assert!(h.engine.decide(Trigger::BecameActive).await.is_notify());
    assert_eq!(h.notifier.sent().len(), 3);
    assert_eq!(
        h.stored().last_notified_at,
        (taipei(1, 17, 5) + ChronoDuration::minutes(16)).timestamp_millis()
    );
}

#[tokio::test]
async fn inactive_user_is_deferred_without_writes() {
    let mut h = Harness::new(Settings::default(), taipei(1, 18, 0));
    h.probe.set(IdleState::Locked);

    assert_eq!(
        h.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::UserInactive)
    );
    assert_eq!(h.stored().last_notified_at, 0);

    h.probe.set(IdleState::Active);
    assert!(h.engine.decide(Trigger::BecameActive).await.is_notify());
}

#[tokio::test]
async fn disabled_and_weekend_skip_before_holiday_lookup() {
    let disabled = Settings {
        enabled: false,
        ..Settings::default()
    };
    let mut h = Harness::new(disabled, taipei(1, 17, 5));
    assert_eq!(
        h.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::Disabled)
    );

    // 2024-01-06 is a Saturday
    let mut h2 = Harness::new(Settings::default(), taipei(6, 17, 5));
    assert_eq!(
        h2.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::NotAllowedWeekday)
    );

    assert_eq!(h.holiday_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h2.holiday_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn holiday_suppresses_when_enabled() {
    let holidays = Some(vec![HolidayRecord::new("20240101", true)]);
    let mut h = Harness::build(
        Box::new(MemorySettingsStore::default()),
        taipei(1, 17, 5),
        holidays.clone(),
    );
    assert_eq!(
        h.engine.decide(Trigger::Tick).await.skip_reason(),
        Some(SkipReason::Holiday)
    );

    let off = Settings {
        skip_taiwan_holidays: false,
        ..Settings::default()
    };
    let mut h2 = Harness::build(
        Box::new(MemorySettingsStore::new(off)),
        taipei(1, 17, 5),
        holidays,
    );
    assert!(h2.engine.decide(Trigger::Tick).await.is_notify());
    assert_eq!(h2.holiday_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn holiday_outage_never_blocks_reminder() {
    let mut h = Harness::build(
        Box::new(MemorySettingsStore::default()),
        taipei(1, 17, 5),
        None,
    );
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());
    assert_eq!(h.holiday_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn install_writes_defaults_to_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let store = FileSettingsStore::with_path(&path);
    assert!(!store.is_initialized());

    let mut h = Harness::build(Box::new(store), taipei(1, 17, 5), Some(vec![]));
    assert!(h.engine.decide(Trigger::Install).await.is_notify());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("intervalMinutes = 15"));
    assert!(content.contains("skipTaiwanHolidays = true"));
    assert_eq!(
        h.stored().last_notified_at,
        taipei(1, 17, 5).timestamp_millis()
    );
}

#[tokio::test]
async fn unreadable_settings_withhold_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    // user turned reminders off, then mistyped the interval
    std::fs::write(&path, "enabled = false\nintervalMinutes = -5\n").unwrap();

    let start = taipei(1, 17, 5);
    let mut h = Harness::build(
        Box::new(FileSettingsStore::with_path(&path)),
        start,
        Some(vec![]),
    );
    for minute in 0..10 {
        h.clock.set(start + ChronoDuration::minutes(minute));
        assert_eq!(
            h.engine.decide(Trigger::Tick).await.skip_reason(),
            Some(SkipReason::SettingsUnavailable)
        );
    }
    assert_eq!(
        h.engine.decide(Trigger::Startup).await.skip_reason(),
        Some(SkipReason::SettingsUnavailable)
    );
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.holiday_calls.load(Ordering::SeqCst), 0);
}

/// Loads fine but never persists a patch.
struct WriteFailingStore(Settings);

impl SettingsStore for WriteFailingStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        Ok(self.0.clone())
    }

    fn update(&self, _patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        Err(ConfigError::SaveFailed {
            path: "settings.toml".into(),
            message: "read-only file system".into(),
        })
    }

    fn replace(&self, _settings: &Settings) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[tokio::test]
async fn lost_write_still_throttles() {
    let start = taipei(1, 17, 5);
    let mut h = Harness::build(
        Box::new(WriteFailingStore(Settings::default())),
        start,
        Some(vec![]),
    );
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());

    for minute in 1..15 {
        h.clock.set(start + ChronoDuration::minutes(minute));
        assert_eq!(
            h.engine.decide(Trigger::Tick).await.skip_reason(),
            Some(SkipReason::Throttled)
        );
    }
    h.clock.set(start + ChronoDuration::minutes(15));
    assert!(h.engine.decide(Trigger::Tick).await.is_notify());
    assert_eq!(h.notifier.sent().len(), 2);
}

#[tokio::test]
async fn observed_state_overrides_idle_query() {
    let mut h = Harness::new(Settings::default(), taipei(1, 18, 0));
    h.probe.set(IdleState::Active);

    assert_eq!(
        h.engine
            .decide_observed(Trigger::Tick, IdleState::Idle)
            .await
            .skip_reason(),
        Some(SkipReason::UserInactive)
    );
    assert!(h
        .engine
        .decide_observed(Trigger::BecameActive, IdleState::Active)
        .await
        .is_notify());
}

#[tokio::test]
async fn empty_window_never_fires() {
    let inverted = Settings {
        start_hour: 23,
        latest_hour: 17,
        ..Settings::default()
    };
    let mut h = Harness::new(inverted, taipei(1, 17, 0));
    for hour in 0..24 {
        h.clock.set(taipei(1, hour, 0));
        assert!(!h.engine.decide(Trigger::Startup).await.is_notify());
    }
    assert!(h.notifier.sent().is_empty());
}
