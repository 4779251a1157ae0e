//! Upload log streaming via Server-Sent Events (SSE).
//!
//! Upload handlers publish short progress entries here; every entry is also
//! emitted as a `tracing` event so the server log and the SSE stream agree.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Log level for client display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Upload the entry belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            job_id: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn for_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a log entry to all subscribers
    pub fn log(&self, entry: LogEntry) {
        let job = entry.job_id.as_deref().unwrap_or("-");
        match entry.level {
            LogLevel::Info | LogLevel::Success => tracing::info!(job, "{}", entry.message),
            LogLevel::Warning => tracing::warn!(job, "{}", entry.message),
            LogLevel::Error => tracing::error!(job, "{}", entry.message),
        }

        // No receivers is fine
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(job_id: &str, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg).for_job(job_id));
}

pub fn log_success(job_id: &str, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg).for_job(job_id));
}

pub fn log_warning(job_id: &str, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg).for_job(job_id));
}

pub fn log_error(job_id: &str, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg).for_job(job_id));
}
