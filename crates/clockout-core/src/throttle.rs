//! Repeat-notification throttle.

/// Milliseconds per minute.
const MINUTE_MS: i64 = 60 * 1000;

/// True iff a notification may be sent at `now_ms`.
///
/// `immediate` triggers (startup, install, return from idle) always pass.
/// Otherwise at least `interval_minutes` must have elapsed since
/// `last_notified_at`; a `last_notified_at` of `0` means "never notified",
/// which any real clock is already far past.
pub fn is_notification_due(
    last_notified_at: i64,
    interval_minutes: u32,
    now_ms: i64,
    immediate: bool,
) -> bool {
    if immediate {
        return true;
    }
    now_ms >= next_due_at(last_notified_at, interval_minutes)
}

/// Epoch milliseconds at which the next non-immediate notification is due.
pub fn next_due_at(last_notified_at: i64, interval_minutes: u32) -> i64 {
    last_notified_at.saturating_add(i64::from(interval_minutes) * MINUTE_MS)
}
