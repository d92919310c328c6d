// Infraction scheduler - durable store port and the recovery-safe sweep.
//
// An infraction is PENDING from the moment the coordinator inserts it until
// a sweep resolves it: deleted, or abandoned because the message is gone or
// the platform refused. Terminal rows are removed, so the store's size is
// bounded by the outstanding obligations. Because every insert and remove
// hits stable storage, a restart resumes sweeping exactly the surviving
// pending set.

use super::moderation_models::{DeleteOutcome, Infraction, NewInfraction};
use super::moderation_service::{MessageDeleter, ModerationError};
use crate::core::config::ModerationConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for the scheduler's durable infraction store.
///
/// Following the same pattern as the lexicon source and model store ports.
/// Implementations must make inserts and removals durable before returning;
/// the sweep's "remove after action" must be atomic with respect to
/// concurrent inserts.
#[async_trait]
pub trait InfractionStore: Send + Sync {
    /// Insert a new pending infraction and return the assigned row id.
    async fn insert(&self, infraction: NewInfraction) -> Result<i64, ModerationError>;

    /// All pending rows whose deletion time is at or before `now`.
    async fn due(&self, now: DateTime<Utc>) -> Result<Vec<Infraction>, ModerationError>;

    /// Remove a row once its deletion attempt has resolved.
    async fn remove(&self, id: i64) -> Result<(), ModerationError>;

    /// Number of outstanding pending rows.
    async fn pending(&self) -> Result<u64, ModerationError>;
}

// ============================================================================
// SWEEPER
// ============================================================================

/// Counters for one sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Rows resolved by a confirmed deletion.
    pub deleted: u32,
    /// Rows abandoned (message gone, or deletion forbidden).
    pub abandoned: u32,
    /// Rows left pending for the next sweep after a transient failure.
    pub retried: u32,
}

/// Periodically executes due deletions against the platform.
pub struct InfractionSweeper<I: InfractionStore> {
    store: Arc<I>,
    deleter: Arc<dyn MessageDeleter>,
    config: ModerationConfig,
}

impl<I: InfractionStore> InfractionSweeper<I> {
    pub fn new(store: Arc<I>, deleter: Arc<dyn MessageDeleter>, config: ModerationConfig) -> Self {
        Self {
            store,
            deleter,
            config,
        }
    }

    /// Run sweeps on the configured interval until cancelled.
    ///
    /// The first pass waits for the host's ready signal. Cancellation stops
    /// scheduling new passes; a pass already underway runs to completion.
    /// A storage failure ends the loop with an error - once the store can
    /// no longer be read or updated the durability guarantee is gone, and
    /// silently continuing would hide that.
    pub async fn run(
        &self,
        ready: oneshot::Receiver<()>,
        cancel: CancellationToken,
    ) -> Result<(), ModerationError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Infraction sweeper cancelled before first sweep");
                return Ok(());
            }
            result = ready => {
                if result.is_err() {
                    tracing::warn!("Ready signal dropped without firing; starting sweeps anyway");
                }
            }
        }

        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.sweep_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Infraction sweeper stopping");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let outcome = self.sweep(Utc::now()).await?;
                    if outcome != SweepOutcome::default() {
                        tracing::info!(
                            deleted = outcome.deleted,
                            abandoned = outcome.abandoned,
                            retried = outcome.retried,
                            "Sweep completed"
                        );
                    }
                }
            }
        }
    }

    /// One pass over the due set.
    ///
    /// Each delete call is bounded by the configured timeout; exceeding it
    /// counts as a transient failure and the row stays pending. Rows are
    /// removed only after their outcome is terminal.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome, ModerationError> {
        let due = self.store.due(now).await?;
        let mut outcome = SweepOutcome::default();

        for infraction in due {
            let delete = tokio::time::timeout(
                Duration::from_secs(self.config.delete_timeout_secs),
                self.deleter
                    .delete_message(infraction.channel_id, infraction.message_id),
            );

            let result = match delete.await {
                Ok(result) => result,
                Err(_) => DeleteOutcome::Transient("delete request timed out".to_string()),
            };

            match result {
                DeleteOutcome::Deleted => {
                    self.store.remove(infraction.id).await?;
                    tracing::info!(
                        message_id = infraction.message_id,
                        channel_id = infraction.channel_id,
                        "Deleted flagged message"
                    );
                    outcome.deleted += 1;
                }
                DeleteOutcome::NotFound => {
                    self.store.remove(infraction.id).await?;
                    tracing::warn!(
                        message_id = infraction.message_id,
                        channel_id = infraction.channel_id,
                        "Message already gone; abandoning infraction"
                    );
                    outcome.abandoned += 1;
                }
                DeleteOutcome::Forbidden => {
                    self.store.remove(infraction.id).await?;
                    tracing::error!(
                        message_id = infraction.message_id,
                        channel_id = infraction.channel_id,
                        "Missing permission to delete message; abandoning infraction"
                    );
                    outcome.abandoned += 1;
                }
                DeleteOutcome::Transient(reason) => {
                    tracing::warn!(
                        message_id = infraction.message_id,
                        channel_id = infraction.channel_id,
                        reason = %reason,
                        "Transient delete failure; will retry next sweep"
                    );
                    outcome.retried += 1;
                }
            }
        }

        Ok(outcome)
    }
}

// ============================================================================
// TESTS
// ============================================================================
