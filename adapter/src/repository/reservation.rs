use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use derive_new::new;

use kernel::model::id::ReservationId;
use kernel::model::reservation::event::{MergeCourt, ReserveCourt};
use kernel::model::reservation::{ActivePlayer, CourtKind, Reservation};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::court::CourtStateRow;
use crate::database::model::reservation::ReservationRow;
use crate::database::{set_transaction_serializable, ConnectionPool};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    duration_minutes: i64,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn reserve(&self, event: ReserveCourt, now: DateTime<Utc>) -> AppResult<Reservation> {
        let players: Vec<String> = event
            .players
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // All preconditions are re-validated here, inside the transaction.
        // Passing the same checks outside it would leave a window where two
        // requests both see a free court.
        self.check_players_registered(&mut tx, &players, now).await?;
        self.check_players_not_busy(&mut tx, &players, now).await?;

        let court: Option<CourtStateRow> = sqlx::query_as(
            r#"
            SELECT court_number, is_available, current_reservation
            FROM courts
            WHERE court_number = $1
            "#,
        )
        .bind(event.court_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let court = court.ok_or_else(|| {
            AppError::EntityNotFound(format!("Court {} not found", event.court_id))
        })?;
        if !court.is_available {
            return Err(AppError::CourtNotAvailable);
        }

        let reservation = Reservation {
            id: ReservationId::new(),
            court_id: event.court_id,
            players: event.players,
            kind: event.kind,
            option: event.option,
            started_at: now,
            ends_at: now + Duration::minutes(self.duration_minutes),
        };

        let res = sqlx::query(
            r#"
            INSERT INTO reservations
            (reservation_id, court_number, players, kind, option, started_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.court_id)
        .bind(&players)
        .bind(reservation.kind.as_ref())
        .bind(reservation.option.map(|o| o.as_ref().to_string()))
        .bind(reservation.started_at)
        .bind(reservation.ends_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        let res = sqlx::query(
            r#"
            UPDATE courts
            SET is_available = FALSE, current_reservation = $1
            WHERE court_number = $2
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.court_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No court has been marked occupied".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation)
    }

    async fn merge(&self, event: MergeCourt, now: DateTime<Utc>) -> AppResult<Reservation> {
        let newcomers: Vec<String> = event
            .players
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let court: Option<CourtStateRow> = sqlx::query_as(
            r#"
            SELECT court_number, is_available, current_reservation
            FROM courts
            WHERE court_number = $1
            "#,
        )
        .bind(event.court_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let court = court.ok_or_else(|| {
            AppError::EntityNotFound(format!("Court {} not found", event.court_id))
        })?;
        let reservation_id = match (court.is_available, court.current_reservation) {
            (false, Some(id)) => id,
            _ => return Err(AppError::CourtNotInUse),
        };

        let current: ReservationRow = sqlx::query_as(
            r#"
            SELECT reservation_id, court_number, players, kind, option, started_at, ends_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or(AppError::CourtNotInUse)?;

        let current = Reservation::try_from(current)?;
        if current.kind != CourtKind::Half {
            return Err(AppError::NotHalfCourt);
        }

        if event.players.iter().any(|p| current.players.contains(p)) {
            return Err(AppError::DuplicatePlayers);
        }

        self.check_players_registered(&mut tx, &newcomers, now).await?;
        self.check_players_not_busy(&mut tx, &newcomers, now).await?;

        let mut players = current.players.clone();
        players.extend(event.players);
        let combined: Vec<String> = players.iter().map(|p| p.as_str().to_string()).collect();

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET players = $1, kind = 'full'
            WHERE reservation_id = $2 AND kind = 'half'
            "#,
        )
        .bind(&combined)
        .bind(current.id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation has been promoted to full".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            kind: CourtKind::Full,
            players,
            ..current
        })
    }

    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let exists: Option<ReservationId> =
            sqlx::query_scalar("SELECT reservation_id FROM reservations WHERE reservation_id = $1")
                .bind(reservation_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound("Reservation not found".into()));
        }

        sqlx::query(
            r#"
            UPDATE courts
            SET is_available = TRUE, current_reservation = NULL
            WHERE current_reservation = $1
            "#,
        )
        .bind(reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn release_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        sqlx::query(
            r#"
            UPDATE courts
            SET is_available = TRUE, current_reservation = NULL
            WHERE current_reservation IN (
                SELECT reservation_id FROM reservations WHERE ends_at <= $1
            )
            "#,
        )
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let deleted = sqlx::query("DELETE FROM reservations WHERE ends_at <= $1")
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(deleted.rows_affected())
    }

    async fn find_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, court_number, players, kind, option, started_at, ends_at
            FROM reservations
            WHERE ends_at > $1
            ORDER BY ends_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn active_players(&self, now: DateTime<Utc>) -> AppResult<Vec<ActivePlayer>> {
        let reservations = self.find_active(now).await?;
        Ok(reservations
            .into_iter()
            .flat_map(|reservation| {
                reservation
                    .players
                    .into_iter()
                    .map(move |display_name| ActivePlayer {
                        display_name,
                        court_id: reservation.court_id,
                        started_at: reservation.started_at,
                    })
            })
            .collect())
    }
}

impl ReservationRepositoryImpl {
    /// Every player must hold an active same-day identity.
    async fn check_players_registered(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        players: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let known: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT display_name FROM users
            WHERE display_name = ANY($1) AND expires_at > $2
            "#,
        )
        .bind(players)
        .bind(now)
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let unknown: Vec<String> = players
            .iter()
            .filter(|p| !known.contains(*p))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::UnknownPlayers(unknown));
        }
        Ok(())
    }

    /// No player may appear in any unexpired reservation.
    async fn check_players_not_busy(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        players: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let rosters: Vec<Vec<String>> =
            sqlx::query_scalar("SELECT players FROM reservations WHERE ends_at > $1")
                .bind(now)
                .fetch_all(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        let busy: Vec<String> = players
            .iter()
            .filter(|p| rosters.iter().any(|roster| roster.contains(*p)))
            .cloned()
            .collect();
        if !busy.is_empty() {
            return Err(AppError::PlayersBusy(busy));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::court::CourtRepositoryImpl;
    use kernel::model::id::CourtId;
    use kernel::repository::court::CourtRepository;
    use uuid::Uuid;

    async fn seed_user(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, phone_number, display_name, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind("5551234567")
        .bind(name)
        .bind(Utc::now())
        .bind(Utc::now() + Duration::hours(6))
        .execute(pool)
        .await?;
        Ok(())
    }

    fn reserve_event(court: i32, players: &[&str], kind: &str, option: Option<&str>) -> ReserveCourt {
        let raw: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        ReserveCourt::new(CourtId::new(court), &raw, kind, option).unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn reserve_occupies_a_free_court(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        seed_user(&pool, "Ana").await?;
        seed_user(&pool, "Bob").await?;

        let now = Utc::now();
        let reservation = repo
            .reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;
        assert_eq!(reservation.kind, CourtKind::Half);
        assert_eq!(reservation.ends_at, now + Duration::minutes(60));

        let listed = courts.find_all().await?;
        let court3 = listed.iter().find(|c| c.id == CourtId::new(3)).unwrap();
        assert!(!court3.is_available);
        let summary = court3.reservation.as_ref().unwrap();
        let players: Vec<_> = summary.players.iter().map(|p| p.as_str()).collect();
        assert_eq!(players, vec!["Ana", "Bob"]);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn reserve_rejects_an_occupied_court(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        for name in ["Ana", "Bob", "Cara", "Dan"] {
            seed_user(&pool, name).await?;
        }

        let now = Utc::now();
        repo.reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;
        let err = repo
            .reserve(reserve_event(3, &["cara", "dan"], "half", Some("queue")), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CourtNotAvailable));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn reserve_rejects_busy_players(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        for name in ["Ana", "Bob", "Cara"] {
            seed_user(&pool, name).await?;
        }

        let now = Utc::now();
        repo.reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;
        let err = repo
            .reserve(reserve_event(4, &["ana", "cara"], "half", Some("queue")), now)
            .await
            .unwrap_err();
        match err {
            AppError::PlayersBusy(names) => assert_eq!(names, vec!["Ana".to_string()]),
            other => panic!("expected PlayersBusy, got {other:?}"),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn reserve_rejects_unknown_players(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        seed_user(&pool, "Ana").await?;

        let err = repo
            .reserve(
                reserve_event(3, &["ana", "ghost"], "half", Some("merge")),
                Utc::now(),
            )
            .await
            .unwrap_err();
        match err {
            AppError::UnknownPlayers(names) => assert_eq!(names, vec!["Ghost".to_string()]),
            other => panic!("expected UnknownPlayers, got {other:?}"),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn merge_promotes_a_half_court_to_full(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        for name in ["Ana", "Bob", "Cara", "Dan"] {
            seed_user(&pool, name).await?;
        }

        let now = Utc::now();
        repo.reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;

        let raw: Vec<String> = vec!["cara".into(), "dan".into()];
        let merged = repo
            .merge(MergeCourt::new(CourtId::new(3), &raw)?, now)
            .await?;
        assert_eq!(merged.kind, CourtKind::Full);
        let players: Vec<_> = merged.players.iter().map(|p| p.as_str()).collect();
        assert_eq!(players, vec!["Ana", "Bob", "Cara", "Dan"]);

        // a second merge must fail: the court is no longer half
        seed_user(&pool, "Eve").await?;
        seed_user(&pool, "Fay").await?;
        let raw: Vec<String> = vec!["eve".into(), "fay".into()];
        let err = repo
            .merge(MergeCourt::new(CourtId::new(3), &raw)?, now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotHalfCourt));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn merge_requires_a_court_in_use(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        seed_user(&pool, "Cara").await?;
        seed_user(&pool, "Dan").await?;

        let raw: Vec<String> = vec!["cara".into(), "dan".into()];
        let err = repo
            .merge(MergeCourt::new(CourtId::new(5), &raw)?, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CourtNotInUse));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn sweep_releases_expired_reservations(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        seed_user(&pool, "Ana").await?;
        seed_user(&pool, "Bob").await?;

        let now = Utc::now();
        repo.reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;

        // nothing expires inside the window
        assert_eq!(repo.release_expired(now + Duration::minutes(59)).await?, 0);

        let released = repo.release_expired(now + Duration::minutes(60)).await?;
        assert_eq!(released, 1);

        let listed = courts.find_all().await?;
        let court3 = listed.iter().find(|c| c.id == CourtId::new(3)).unwrap();
        assert!(court3.is_available);
        assert!(court3.reservation.is_none());

        // the players are free to book again
        repo.reserve(
            reserve_event(4, &["ana", "bob"], "half", Some("queue")),
            now + Duration::minutes(61),
        )
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_frees_the_court(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let courts = CourtRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool.clone()), 60);
        courts.ensure_slots(20).await?;
        seed_user(&pool, "Ana").await?;
        seed_user(&pool, "Bob").await?;

        let now = Utc::now();
        let reservation = repo
            .reserve(reserve_event(3, &["ana", "bob"], "half", Some("merge")), now)
            .await?;
        repo.cancel(reservation.id).await?;

        let listed = courts.find_all().await?;
        let court3 = listed.iter().find(|c| c.id == CourtId::new(3)).unwrap();
        assert!(court3.is_available);

        let err = repo.cancel(reservation.id).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
        Ok(())
    }
}
