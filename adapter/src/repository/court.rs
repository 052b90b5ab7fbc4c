use async_trait::async_trait;
use derive_new::new;

use kernel::model::court::Court;
use kernel::model::id::CourtId;
use kernel::repository::court::CourtRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::court::{CourtRow, CourtStateRow};
use crate::database::{set_transaction_serializable, ConnectionPool};

const LIST_COURTS_SQL: &str = r#"
    SELECT
        c.court_number,
        c.is_available,
        c.is_visible,
        r.reservation_id,
        r.players,
        r.kind,
        r.option,
        r.started_at,
        r.ends_at
    FROM courts AS c
    LEFT JOIN reservations AS r ON r.reservation_id = c.current_reservation
"#;

#[derive(new)]
pub struct CourtRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CourtRepository for CourtRepositoryImpl {
    async fn ensure_slots(&self, total: i32) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courts (court_number, is_available, is_visible)
            SELECT n, TRUE, TRUE FROM generate_series(1, $1) AS n
            ON CONFLICT (court_number) DO NOTHING
            "#,
        )
        .bind(total)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Court>> {
        self.list(false).await
    }

    async fn find_visible(&self) -> AppResult<Vec<Court>> {
        self.list(true).await
    }

    async fn set_visibility(&self, court_id: CourtId, visible: bool) -> AppResult<Court> {
        let res = sqlx::query("UPDATE courts SET is_visible = $2 WHERE court_number = $1")
            .bind(court_id)
            .bind(visible)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Court {court_id} not found"
            )));
        }

        self.find_by_id(court_id).await?.ok_or_else(|| {
            AppError::EntityNotFound(format!("Court {court_id} not found"))
        })
    }

    async fn force_release(&self, court_id: CourtId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let court: Option<CourtStateRow> = sqlx::query_as(
            r#"
            SELECT court_number, is_available, current_reservation
            FROM courts
            WHERE court_number = $1
            "#,
        )
        .bind(court_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let court = court.ok_or_else(|| {
            AppError::EntityNotFound(format!("Court {court_id} not found"))
        })?;

        // Clears regardless of expiry state; the link must go before the
        // reservation row so the foreign key holds.
        if let Some(reservation_id) = court.current_reservation {
            sqlx::query(
                r#"
                UPDATE courts
                SET is_available = TRUE, current_reservation = NULL
                WHERE court_number = $1
                "#,
            )
            .bind(court_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
                .bind(reservation_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

impl CourtRepositoryImpl {
    async fn list(&self, visible_only: bool) -> AppResult<Vec<Court>> {
        let sql = if visible_only {
            format!("{LIST_COURTS_SQL} WHERE c.is_visible ORDER BY c.court_number")
        } else {
            format!("{LIST_COURTS_SQL} ORDER BY c.court_number")
        };
        let rows: Vec<CourtRow> = sqlx::query_as(&sql)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Court::try_from).collect()
    }

    async fn find_by_id(&self, court_id: CourtId) -> AppResult<Option<Court>> {
        let sql = format!("{LIST_COURTS_SQL} WHERE c.court_number = $1");
        let row: Option<CourtRow> = sqlx::query_as(&sql)
            .bind(court_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        row.map(Court::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn ensure_slots_is_idempotent(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = CourtRepositoryImpl::new(ConnectionPool::new(pool));

        repo.ensure_slots(20).await?;
        repo.ensure_slots(20).await?;
        repo.ensure_slots(20).await?;

        let courts = repo.find_all().await?;
        assert_eq!(courts.len(), 20);
        let numbers: Vec<i32> = courts.iter().map(|c| c.id.number()).collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
        assert!(courts.iter().all(|c| c.is_available && c.is_visible));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn hidden_courts_drop_out_of_the_visible_listing(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = CourtRepositoryImpl::new(ConnectionPool::new(pool));
        repo.ensure_slots(20).await?;

        let court = repo.set_visibility(CourtId::new(7), false).await?;
        assert!(!court.is_visible);

        assert_eq!(repo.find_visible().await?.len(), 19);
        assert_eq!(repo.find_all().await?.len(), 20);

        let court = repo.set_visibility(CourtId::new(7), true).await?;
        assert!(court.is_visible);
        assert_eq!(repo.find_visible().await?.len(), 20);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn visibility_of_a_missing_court_is_not_found(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = CourtRepositoryImpl::new(ConnectionPool::new(pool));
        repo.ensure_slots(20).await?;

        let err = repo.set_visibility(CourtId::new(42), false).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
        Ok(())
    }
}
