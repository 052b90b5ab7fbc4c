use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;

use kernel::model::id::QueueEntryId;
use kernel::model::queue::{JoinQueue, QueueEntry};
use kernel::repository::queue::QueueRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::queue::QueueEntryRow;
use crate::database::{set_transaction_serializable, ConnectionPool};

#[derive(new)]
pub struct QueueRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl QueueRepository for QueueRepositoryImpl {
    async fn join(&self, event: JoinQueue, now: DateTime<Utc>) -> AppResult<QueueEntry> {
        let players: Vec<String> = event
            .players
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // && is array overlap: any shared player means already queued
        let clash: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM queue_entries WHERE players && $1 LIMIT 1")
                .bind(&players)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if clash.is_some() {
            return Err(AppError::AlreadyQueued);
        }

        let entry = QueueEntry {
            id: QueueEntryId::new(),
            players: event.players,
            kind: event.kind,
            court_id: event.court_id,
            joined_at: now,
        };

        let res = sqlx::query(
            r#"
            INSERT INTO queue_entries (queue_entry_id, players, kind, court_number, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(&players)
        .bind(entry.kind.as_ref())
        .bind(entry.court_id)
        .bind(entry.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No queue entry has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(entry)
    }

    async fn find_all(&self) -> AppResult<Vec<QueueEntry>> {
        let rows: Vec<QueueEntryRow> = sqlx::query_as(
            r#"
            SELECT queue_entry_id, players, kind, court_number, joined_at
            FROM queue_entries
            ORDER BY joined_at ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(QueueEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_event(players: &[&str], kind: &str) -> JoinQueue {
        let raw: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        JoinQueue::new(&raw, kind, None).unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn entries_come_back_in_join_order(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = QueueRepositoryImpl::new(ConnectionPool::new(pool));
        let now = Utc::now();

        repo.join(join_event(&["ana", "bob"], "half"), now).await?;
        repo.join(
            join_event(&["cara", "dan", "eve", "fay"], "full"),
            now + chrono::Duration::minutes(1),
        )
        .await?;

        let entries = repo.find_all().await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].players[0].as_str(), "Ana");
        assert_eq!(entries[1].players.len(), 4);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn queued_players_cannot_join_twice(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = QueueRepositoryImpl::new(ConnectionPool::new(pool));
        let now = Utc::now();

        repo.join(join_event(&["ana", "bob"], "half"), now).await?;
        let err = repo
            .join(join_event(&["bob", "cara"], "half"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyQueued));
        Ok(())
    }
}
