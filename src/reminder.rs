use std::fmt;

use chrono::{NaiveTime, Timelike};

pub type ReminderId = i64;

/// Telegram user id of the reminder owner. For private chats it doubles as the chat id.
pub type OwnerId = i64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReminderStatus {
    Pending,
    Sent,
}

/// Target time of a reminder, kept exactly as the user's time expression resolved it.
///
/// Keyword defaults are always `HH:MM`, but numeric overrides are stored verbatim,
/// so the value is not guaranteed to be a valid clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFireTime(String);

impl ReminderFireTime {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.format("%H:%M").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Clock time this expression fires at, if it names one.
    ///
    /// Accepts `H:MM`/`HH:MM` and a bare hour `H`/`HH` (meaning `HH:00`). Minutes
    /// always take two digits.
    pub fn clock_time(&self) -> Option<NaiveTime> {
        let expression = self.0.as_str();
        if let Some((_, minute)) = expression.split_once(':') {
            // chrono would take "7:5" as 07:05.
            if minute.len() != 2 {
                return None;
            }
            return NaiveTime::parse_from_str(expression, "%H:%M").ok();
        }

        if expression.is_empty() || expression.len() > 2 {
            return None;
        }

        let hour = expression.parse::<u32>().ok()?;
        NaiveTime::from_hms_opt(hour, 0, 0)
    }

    /// Whether `now` falls into the one-minute window of this fire time.
    pub fn is_due(&self, now: NaiveTime) -> bool {
        self.clock_time()
            .is_some_and(|time| time.hour() == now.hour() && time.minute() == now.minute())
    }
}

impl fmt::Display for ReminderFireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub owner: OwnerId,
    pub text: String,
    pub fire_at: ReminderFireTime,
    pub status: ReminderStatus,
}
