//! PostgreSQL implementation of WorkQueue
//!
//! Rows are claimed with `FOR UPDATE SKIP LOCKED` so concurrent pollers
//! never receive the same visible message. A claimed row stays hidden
//! until `visible_at`; rows that exhausted `max_receive_count` are parked
//! in the dead-letter state instead of being redelivered.

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use relay::{DomainError, QueueMessage, WorkQueue};

/// Redrive policy for the Postgres queue
#[derive(Debug, Clone)]
pub struct WorkQueueConfig {
    /// Deliveries before a message is dead-lettered
    pub max_receive_count: i32,
}

impl Default for WorkQueueConfig {
    fn default() -> Self {
        Self {
            max_receive_count: 3,
        }
    }
}

pub struct PgWorkQueue {
    pool: PgPool,
    config: WorkQueueConfig,
}

impl PgWorkQueue {
    pub fn new(pool: PgPool, config: WorkQueueConfig) -> Self {
        Self { pool, config }
    }

    /// Park visible messages that already used up their deliveries
    async fn dead_letter_exhausted(&self) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE work_items
            SET dead_lettered_at = NOW()
            WHERE dead_lettered_at IS NULL
              AND visible_at <= NOW()
              AND receive_count >= $1
            "#,
        )
        .bind(self.config.max_receive_count)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Queue(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct WorkItemRow {
    id: Uuid,
    body: String,
    receive_count: i32,
    enqueued_at: chrono::DateTime<chrono::Utc>,
}

impl From<WorkItemRow> for QueueMessage {
    fn from(row: WorkItemRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            receive_count: row.receive_count,
            enqueued_at: row.enqueued_at,
        }
    }
}

#[async_trait]
impl WorkQueue for PgWorkQueue {
    async fn send(&self, body: &str) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO work_items (id, body) VALUES ($1, $2)")
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Queue(e.to_string()))?;

        Ok(id)
    }

    async fn receive(
        &self,
        max_messages: u32,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, DomainError> {
        let parked = self.dead_letter_exhausted().await?;
        if parked > 0 {
            tracing::warn!("Dead-lettered {} work item(s) after max receives", parked);
        }

        let rows = sqlx::query_as::<_, WorkItemRow>(
            r#"
            UPDATE work_items
            SET receive_count = receive_count + 1,
                visible_at = NOW() + make_interval(secs => $2)
            WHERE id IN (
                SELECT id FROM work_items
                WHERE dead_lettered_at IS NULL AND visible_at <= NOW()
                ORDER BY enqueued_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, body, receive_count, enqueued_at
            "#,
        )
        .bind(i64::from(max_messages))
        .bind(visibility_timeout.as_secs_f64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Queue(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ack(&self, message_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM work_items WHERE id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Queue(e.to_string()))?;

        Ok(())
    }
}
