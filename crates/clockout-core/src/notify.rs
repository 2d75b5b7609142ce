//! Notification payload and delivery collaborators.
//!
//! Delivery is fire-and-forget: a [`Notifier`] never reports back whether
//! the user saw anything.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Title of the clock-out reminder.
pub const REMINDER_TITLE: &str = "差不多要下班囉！🤩";

/// Titles confirming a manual skip toggle.
pub const SKIPPED_TITLE: &str = "您的下班好朋友已下線 🫥";
pub const RESUMED_TITLE: &str = "您的下班好朋友已上線 😎";

/// Rendering style of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Basic,
}

/// Button shown on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub title: String,
}

/// A platform notification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    fn basic(title: &str, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            message,
            kind: NotificationKind::Basic,
            actions: Vec::new(),
        }
    }

    /// The clock-out reminder for local time `time` (`HH:MM`).
    pub fn clock_out(time: &str) -> Self {
        Self::basic(
            REMINDER_TITLE,
            format!("現在 {time}，記得收尾、收書包、備份、打卡、去尿尿或關機～"),
        )
    }

    /// Confirms that today's reminders were turned off (`skipped`) or back on.
    pub fn skip_toggled(skipped: bool) -> Self {
        if skipped {
            Self::basic(SKIPPED_TITLE, "今日不再提醒".to_string())
        } else {
            Self::basic(RESUMED_TITLE, "今日提醒已恢復".to_string())
        }
    }
}

/// Renders notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the terminal (stderr).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("🔔 {}\n   {}", notification.title, notification.message);
    }
}

/// Spawns `<program> [args..] <title> <message>`, e.g. `notify-send`.
///
/// Must be called from within a Tokio runtime; the child is not awaited.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Build from a whitespace-separated command line. Returns `None` for an
    /// empty line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, notification: &Notification) {
        let spawned = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(&notification.title)
            .arg(&notification.message)
            .spawn();
        if let Err(e) = spawned {
            warn!(program = %self.program, error = %e, "notification command failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_out_template() {
        let n = Notification::clock_out("17:05");
        assert_eq!(n.title, REMINDER_TITLE);
        assert_eq!(n.message, "現在 17:05，記得收尾、收書包、備份、打卡、去尿尿或關機～");
        assert_eq!(n.kind, NotificationKind::Basic);
        assert!(n.actions.is_empty());
        assert!(Uuid::parse_str(&n.id).is_ok());
    }

    #[test]
    fn skip_toggle_confirmations() {
        let off = Notification::skip_toggled(true);
        assert_eq!(off.title, SKIPPED_TITLE);
        assert_eq!(off.message, "今日不再提醒");

        let on = Notification::skip_toggled(false);
        assert_eq!(on.title, RESUMED_TITLE);
        assert_eq!(on.message, "今日提醒已恢復");
        assert_eq!(on.kind, NotificationKind::Basic);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(
            Notification::clock_out("17:05").id,
            Notification::clock_out("17:05").id
        );
    }

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(Notification::clock_out("18:00")).unwrap();
        assert_eq!(json["type"], "basic");
        assert!(json["actions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn command_notifier_swallows_spawn_errors() {
        let notifier = CommandNotifier::from_command_line("clockout-no-such-notifier").unwrap();
        notifier.notify(&Notification::clock_out("18:00"));
        assert!(CommandNotifier::from_command_line("").is_none());
    }
}
