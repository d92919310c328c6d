// SQLite-backed infraction store for crash-durable deferred deletions.
//
// One table, `infractions`, keyed by an auto-incrementing id. Inserts and
// removals each commit before returning, so a process crash between
// infraction creation and deletion never loses the obligation: on restart
// the sweeper resumes exactly the surviving pending set.

use crate::core::moderation::{Infraction, InfractionStore, ModerationError, NewInfraction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteInfractionStore {
    pool: Pool<Sqlite>,
}

impl SqliteInfractionStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), ModerationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS infractions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                author_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                deletion_time TEXT NOT NULL,
                content TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_infractions_deletion_time
                ON infractions(deletion_time);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ModerationError::StorageError(e.to_string()))?;

        Ok(())
    }

    fn row_to_infraction(row: &sqlx::sqlite::SqliteRow) -> Infraction {
        let created_at_str: String = row.get("created_at");
        let deletion_time_str: String = row.get("deletion_time");

        Infraction {
            id: row.get("id"),
            message_id: row.get::<i64, _>("message_id") as u64,
            channel_id: row.get::<i64, _>("channel_id") as u64,
            author_id: row.get::<i64, _>("author_id") as u64,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            deletion_time: DateTime::parse_from_rfc3339(&deletion_time_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            content: row.get("content"),
        }
    }
}

#[async_trait]
impl InfractionStore for SqliteInfractionStore {
    async fn insert(&self, infraction: NewInfraction) -> Result<i64, ModerationError> {
        let result = sqlx::query(
            r#"
            INSERT INTO infractions (message_id, channel_id, author_id, created_at, deletion_time, content)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(infraction.message_id as i64)
        .bind(infraction.channel_id as i64)
        .bind(infraction.author_id as i64)
        .bind(infraction.created_at.to_rfc3339())
        .bind(infraction.deletion_time.to_rfc3339())
        .bind(&infraction.content)
        .execute(&self.pool)
        .await
        .map_err(|e| ModerationError::StorageError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn due(&self, now: DateTime<Utc>) -> Result<Vec<Infraction>, ModerationError> {
        // RFC 3339 strings in a fixed offset compare correctly as text.
        let rows = sqlx::query(
            r#"
            SELECT id, message_id, channel_id, author_id, created_at, deletion_time, content
            FROM infractions
            WHERE deletion_time <= ?
            ORDER BY deletion_time ASC
            "#,
        )
        .bind(now.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ModerationError::StorageError(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_infraction).collect())
    }

    async fn remove(&self, id: i64) -> Result<(), ModerationError> {
        sqlx::query("DELETE FROM infractions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ModerationError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn pending(&self) -> Result<u64, ModerationError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM infractions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ModerationError::StorageError(e.to_string()))?;

        Ok(row.get::<i64, _>("count") as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::path::Path;

    async fn open_pool(path: &Path) -> Pool<Sqlite> {
        SqlitePoolOptions::new()
            .connect(&format!("sqlite://{}?mode=rwc", path.display()))
            .await
            .unwrap()
    }

    async fn open_store(path: &Path) -> SqliteInfractionStore {
        let store = SqliteInfractionStore::new(open_pool(path).await);
        store.migrate().await.unwrap();
        store
    }

    fn row(message_id: u64, deletion_time: DateTime<Utc>) -> NewInfraction {
        NewInfraction {
            message_id,
            channel_id: 77,
            author_id: 88,
            created_at: Utc::now(),
            deletion_time,
            content: "offending content".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_due() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir.path().join("infractions.db")).await;
        let now = Utc::now();

        let id = store
            .insert(row(1, now - chrono::Duration::seconds(30)))
            .await
            .unwrap();
        store
            .insert(row(2, now + chrono::Duration::seconds(3600)))
            .await
            .unwrap();

        let due = store.due(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, id);
        assert_eq!(due[0].message_id, 1);
        assert_eq!(due[0].channel_id, 77);
        assert_eq!(due[0].content, "offending content");
        assert_eq!(store.pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remove_resolves_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir.path().join("infractions.db")).await;
        let now = Utc::now();

        let id = store
            .insert(row(1, now - chrono::Duration::seconds(30)))
            .await
            .unwrap();
        store.remove(id).await.unwrap();

        assert!(store.due(now).await.unwrap().is_empty());
        assert_eq!(store.pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_timestamps_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir.path().join("infractions.db")).await;

        let created_at = Utc::now();
        let deletion_time = created_at + chrono::Duration::seconds(3600);
        let mut new_row = row(1, deletion_time);
        new_row.created_at = created_at;
        store.insert(new_row).await.unwrap();

        let due = store
            .due(deletion_time + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        // RFC 3339 keeps sub-second precision, so the values survive intact.
        assert_eq!(due[0].created_at, created_at);
        assert_eq!(due[0].deletion_time, deletion_time);
    }

    #[tokio::test]
    async fn test_pending_rows_survive_reopen() {
        // Simulates a crash between infraction creation and deletion: the
        // obligation must still be there when the store is reopened.
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("infractions.db");
        let now = Utc::now();

        {
            let store = open_store(&db_path).await;
            store
                .insert(row(42, now - chrono::Duration::seconds(5)))
                .await
                .unwrap();
            // Dropping the pool stands in for the process dying.
        }

        let store = open_store(&db_path).await;
        assert_eq!(store.pending().await.unwrap(), 1);

        let due = store.due(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].message_id, 42);
    }

    #[tokio::test]
    async fn test_sweeper_acts_on_recovered_rows() {
        use crate::core::config::ModerationConfig;
        use crate::core::moderation::{DeleteOutcome, InfractionSweeper, MessageDeleter};
        use std::sync::Arc;

        struct AlwaysDeletes;

        #[async_trait]
        impl MessageDeleter for AlwaysDeletes {
            async fn delete_message(&self, _channel_id: u64, _message_id: u64) -> DeleteOutcome {
                DeleteOutcome::Deleted
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("infractions.db");
        let now = Utc::now();

        {
            let store = open_store(&db_path).await;
            store
                .insert(row(42, now - chrono::Duration::seconds(5)))
                .await
                .unwrap();
        }

        // "Restart": fresh pool, fresh sweeper, same file.
        let store = Arc::new(open_store(&db_path).await);
        let sweeper = InfractionSweeper::new(
            Arc::clone(&store),
            Arc::new(AlwaysDeletes),
            ModerationConfig::default(),
        );

        let outcome = sweeper.sweep(now).await.unwrap();
        assert_eq!(outcome.deleted, 1);
        assert_eq!(store.pending().await.unwrap(), 0);
    }
}
