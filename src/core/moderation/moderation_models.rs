// Moderation domain models - data structures for the moderation engine.
//
// These are pure domain types with no platform dependencies. The platform
// adapter converts these to and from its own message and channel objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which detector flagged a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictReason {
    /// A stemmed token matched the banned word set.
    Lexicon,
    /// A token's phonetic code collided with a banned word's code.
    Phonetic,
    /// The Bayesian posterior crossed the spam threshold.
    Statistical,
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictReason::Lexicon => write!(f, "Lexicon"),
            VerdictReason::Phonetic => write!(f, "Phonetic"),
            VerdictReason::Statistical => write!(f, "Statistical"),
        }
    }
}

/// Result of classifying one message. Ephemeral; only the infraction it may
/// produce is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Whether the message was flagged as inappropriate.
    pub is_flagged: bool,
    /// Which detector flagged it, when flagged.
    pub reason: Option<VerdictReason>,
    /// Posterior spam probability, present for statistical verdicts.
    pub score: Option<f64>,
}

impl Verdict {
    /// Create a "not flagged" verdict.
    pub fn clean() -> Self {
        Self {
            is_flagged: false,
            reason: None,
            score: None,
        }
    }

    /// Create a flagged verdict.
    pub fn flagged(reason: VerdictReason) -> Self {
        Self {
            is_flagged: true,
            reason: Some(reason),
            score: None,
        }
    }

    /// Create a flagged statistical verdict carrying its score.
    pub fn statistical(score: f64) -> Self {
        Self {
            is_flagged: true,
            reason: Some(VerdictReason::Statistical),
            score: Some(score),
        }
    }
}

/// An inbound chat message, as handed over by the platform adapter.
///
/// The adapter is expected to filter out bot-authored messages before
/// calling in.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A pending deletion obligation, owned by the scheduler's durable store
/// from creation until the deletion attempt resolves.
#[derive(Debug, Clone)]
pub struct Infraction {
    /// Store-assigned row id.
    pub id: i64,
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    /// When the offending message was created.
    pub created_at: DateTime<Utc>,
    /// When the message becomes due for deletion.
    pub deletion_time: DateTime<Utc>,
    /// Content snapshot taken at flag time.
    pub content: String,
}

/// An infraction row to insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewInfraction {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
    pub deletion_time: DateTime<Utc>,
    pub content: String,
}

/// Outcome of asking the platform to delete a message.
///
/// Expected failures are variants here, not errors: "already gone" and
/// "forbidden" are ordinary outcomes the sweeper has to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The message was removed.
    Deleted,
    /// The message or its channel no longer exists. Terminal; not an error.
    NotFound,
    /// The platform refused the deletion (permissions revoked). Terminal
    /// and non-retryable.
    Forbidden,
    /// Network or timeout class failure; the row stays pending and is
    /// retried on the next sweep.
    Transient(String),
}

/// Structured record of a flagged message, delivered to the admin-facing
/// announcement sink.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    /// Content snapshot at flag time.
    pub content: String,
    pub verdict: Verdict,
    /// Seconds until the scheduled deletion.
    pub scheduled_delay_secs: u64,
}
