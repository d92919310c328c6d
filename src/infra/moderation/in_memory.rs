// In-memory implementation of InfractionStore.
//
// Useful for tests and for running the engine without a database. It keeps
// the same contract as the SQLite store, minus durability: a process
// restart loses the pending set, so production deployments want the SQLite
// implementation.

use crate::core::moderation::{Infraction, InfractionStore, ModerationError, NewInfraction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryInfractionStore {
    rows: DashMap<i64, Infraction>,
    next_id: AtomicI64,
}

impl InMemoryInfractionStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryInfractionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InfractionStore for InMemoryInfractionStore {
    async fn insert(&self, infraction: NewInfraction) -> Result<i64, ModerationError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(
            id,
            Infraction {
                id,
                message_id: infraction.message_id,
                channel_id: infraction.channel_id,
                author_id: infraction.author_id,
                created_at: infraction.created_at,
                deletion_time: infraction.deletion_time,
                content: infraction.content,
            },
        );
        Ok(id)
    }

    async fn due(&self, now: DateTime<Utc>) -> Result<Vec<Infraction>, ModerationError> {
        let mut due: Vec<Infraction> = self
            .rows
            .iter()
            .filter(|entry| entry.deletion_time <= now)
            .map(|entry| entry.value().clone())
            .collect();
        due.sort_by_key(|i| i.deletion_time);
        Ok(due)
    }

    async fn remove(&self, id: i64) -> Result<(), ModerationError> {
        self.rows.remove(&id);
        Ok(())
    }

    async fn pending(&self) -> Result<u64, ModerationError> {
        Ok(self.rows.len() as u64)
    }
}
