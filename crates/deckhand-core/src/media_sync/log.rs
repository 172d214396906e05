//! Append-only media sync log.

use chrono::{Local, TimeZone};

use super::backend::MediaSyncProgress;

/// What a log entry records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogPayload {
    Progress(MediaSyncProgress),
    Status(String),
}

/// A time-stamped log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLogEntry {
    /// Unix seconds
    pub timestamp: i64,
    pub payload: LogPayload,
}

impl SyncLogEntry {
    pub fn status(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            payload: LogPayload::Status(message.into()),
        }
    }

    pub const fn progress(timestamp: i64, progress: MediaSyncProgress) -> Self {
        Self {
            timestamp,
            payload: LogPayload::Progress(progress),
        }
    }

    /// Entry text without the timestamp
    pub fn text(&self) -> String {
        match &self.payload {
            LogPayload::Progress(progress) => progress.to_string(),
            LogPayload::Status(message) => message.clone(),
        }
    }

    /// Status message, if this entry is one
    pub fn status_message(&self) -> Option<&str> {
        match &self.payload {
            LogPayload::Status(message) => Some(message),
            LogPayload::Progress(_) => None,
        }
    }

    /// `"<local time>: <text>"`, the form shown in sync log views
    pub fn display_line(&self) -> String {
        let stamp = Local.timestamp_opt(self.timestamp, 0).single().map_or_else(
            || self.timestamp.to_string(),
            |time| time.format("%a %b %e %H:%M:%S %Y").to_string(),
        );
        format!("{stamp}: {}", self.text())
    }
}

/// Ordered entries for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct SyncLog {
    entries: Vec<SyncLogEntry>,
}

impl SyncLog {
    pub fn push(&mut self, entry: SyncLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SyncLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&SyncLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
