/// Error taxonomy for the surge notifier.
///
/// Storage, parse and configuration errors abort a run before anything is
/// posted. Notification errors are reported back to the pipeline, which logs
/// them and still completes the run.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurgeError {
    /// Missing or invalid run settings (TOML, env, CLI, business type, URIs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object missing, access denied, or storage backend unreachable.
    #[error("Storage error reading {location}: {reason}")]
    Storage { location: String, reason: String },

    /// Document fetched but its content is malformed.
    #[error("Parse error in {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// One or both webhook posts failed.
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl SurgeError {
    pub fn parse(source_name: &str, reason: impl Into<String>) -> Self {
        SurgeError::Parse {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn storage(location: impl fmt::Display, reason: impl Into<String>) -> Self {
        SurgeError::Storage {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

/// Composite outcome of the two webhook posts. A `None` field means that post
/// succeeded; at least one field is `Some` whenever this error exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct NotificationError {
    pub header: Option<String>,
    pub table: Option<String>,
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to send Chime message.")?;
        if let Some(reason) = &self.header {
            write!(f, " Header post: {}.", reason)?;
        }
        if let Some(reason) = &self.table {
            write!(f, " Table post: {}.", reason)?;
        }
        Ok(())
    }
}
