use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Severity of a [`LogEntry`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One line of the system log shown to the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    time: DateTime<Utc>,
    message: String,
    level: LogLevel,
}

impl LogEntry {
    /// Maximum number of entries a mission log keeps.
    pub const CAPACITY: usize = 50;

    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self { time: Utc::now(), message: message.into(), level }
    }

    pub fn message(&self) -> &str { &self.message }
    pub fn level(&self) -> LogLevel { self.level }

    /// Wall-clock stamp as displayed in the log panel.
    pub fn time_label(&self) -> String { self.time.format("%H:%M:%S").to_string() }
}

/// Prepends `entry` to the newest-first `logs`, evicting the oldest beyond [`LogEntry::CAPACITY`].
pub(crate) fn push_newest(logs: &mut Vec<LogEntry>, entry: LogEntry) {
    logs.insert(0, entry);
    logs.truncate(LogEntry::CAPACITY);
}

/// Entries of a newest-first log that are newer than `last_seen`, oldest first.
///
/// If `last_seen` is no longer part of `logs` (evicted or reset), every entry is returned.
pub fn entries_since<'a>(logs: &'a [LogEntry], last_seen: Option<&LogEntry>) -> Vec<&'a LogEntry> {
    let mut fresh: Vec<&LogEntry> =
        logs.iter().take_while(|entry| Some(*entry) != last_seen).collect();
    fresh.reverse();
    fresh
}

/// Severity of an [`Alert`] banner.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Warning,
    Error,
}

/// The single banner currently shown above the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    message: String,
    level: AlertLevel,
}

impl Alert {
    pub fn new(message: impl Into<String>, level: AlertLevel) -> Self {
        Self { message: message.into(), level }
    }
    pub fn warning(message: impl Into<String>) -> Self { Self::new(message, AlertLevel::Warning) }
    pub fn error(message: impl Into<String>) -> Self { Self::new(message, AlertLevel::Error) }

    pub fn message(&self) -> &str { &self.message }
    pub fn level(&self) -> AlertLevel { self.level }
}
