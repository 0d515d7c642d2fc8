//! Core record types for feedback-relay.
//!
//! This module defines the fundamental data structures for representing
//! user-submitted feedback on its way to a storage sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column headers for the row representation of a record.
///
/// The order is part of the storage contract: both the remote sheet and the
/// local CSV file carry these five columns.
pub const COLUMNS: [&str; 5] = ["Timestamp", "Name", "Email", "Message", "Status"];

/// Lifecycle tag attached to a record.
///
/// Records are always created as `New`. The other tags exist so records read
/// back from storage parse cleanly, but no code path in this crate ever
/// assigns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    /// Freshly submitted, not yet triaged.
    #[default]
    New,
    /// Seen by an operator.
    Read,
    /// Handled and closed out.
    Resolved,
}

impl FeedbackStatus {
    /// Parse a status tag from its stored form.
    ///
    /// Unknown tags fall back to `New` so a hand-edited storage file never
    /// poisons a read path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "read" => Self::Read,
            "resolved" => Self::Resolved,
            "new" => Self::New,
            other => {
                tracing::warn!("Unknown feedback status: {}, defaulting to new", other);
                Self::New
            }
        }
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Read => write!(f, "read"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// One user-submitted feedback message.
///
/// Created exactly once per submission event, appended to exactly one sink,
/// and never updated or deleted afterwards. There is no content-based
/// deduplication: two identical submissions produce two distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// When this record was created. Assigned by the store at submission
    /// time, not by the caller.
    pub timestamp: DateTime<Utc>,

    /// Display name of the submitter.
    pub name: String,

    /// Contact address of the submitter. Loosely validated only.
    pub email: String,

    /// The feedback body.
    pub message: String,

    /// Lifecycle tag, fixed to `new` at creation.
    pub status: FeedbackStatus,
}

impl FeedbackRecord {
    /// Create a new record with the given submission fields.
    ///
    /// Sets the timestamp to now and the status to `new`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            name: name.into(),
            email: email.into(),
            message: message.into(),
            status: FeedbackStatus::New,
        }
    }

    /// The five-column row representation written to both sinks.
    ///
    /// Column order matches [`COLUMNS`].
    #[must_use]
    pub fn to_row(&self) -> [String; 5] {
        [
            self.timestamp.to_rfc3339(),
            self.name.clone(),
            self.email.clone(),
            self.message.clone(),
            self.status.to_string(),
        ]
    }
}
