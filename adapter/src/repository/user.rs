use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use derive_new::new;
use rand::seq::SliceRandom;

use kernel::model::id::UserId;
use kernel::model::user::event::RegisterUser;
use kernel::model::user::names::DISPLAY_NAME_POOL;
use kernel::model::user::{DisplayName, RegisteredUser, User};
use kernel::repository::user::UserRepository;
use shared::datetime::{end_of_day, start_of_day};
use shared::error::{AppError, AppResult};

use crate::database::model::user::UserRow;
use crate::database::{set_transaction_serializable, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
    timezone: Tz,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn register(&self, event: RegisterUser, now: DateTime<Utc>) -> AppResult<RegisteredUser> {
        let day_start = start_of_day(self.timezone, now)?;
        let day_end = end_of_day(self.timezone, now)?;

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // Opportunistic purge: identities from prior days vanish the next
        // time anyone registers. There is no background sweep.
        sqlx::query("DELETE FROM users WHERE expires_at <= $1")
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let existing: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, phone_number, display_name, created_at, expires_at
            FROM users
            WHERE phone_number = $1 AND created_at >= $2
            "#,
        )
        .bind(event.phone_number.as_str())
        .bind(day_start)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(row) = existing {
            tx.commit().await.map_err(AppError::TransactionError)?;
            return Ok(RegisteredUser {
                user: row.into(),
                is_existing: true,
            });
        }

        let used: Vec<String> =
            sqlx::query_scalar("SELECT display_name FROM users WHERE created_at >= $1")
                .bind(day_start)
                .fetch_all(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        let available: Vec<&str> = DISPLAY_NAME_POOL
            .iter()
            .copied()
            .filter(|name| !used.iter().any(|u| u.as_str() == *name))
            .collect();
        let display_name = *available
            .choose(&mut rand::thread_rng())
            .ok_or(AppError::NamePoolExhausted)?;

        let user = User {
            id: UserId::new(),
            phone_number: event.phone_number,
            display_name: DisplayName::from(display_name.to_string()),
            created_at: now,
            expires_at: day_end,
        };

        let res = sqlx::query(
            r#"
            INSERT INTO users (user_id, phone_number, display_name, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(user.phone_number.as_str())
        .bind(user.display_name.as_str())
        .bind(user.created_at)
        .bind(user.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(RegisteredUser {
            user,
            is_existing: false,
        })
    }

    async fn find_active_by_names(
        &self,
        names: &[DisplayName],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        let names: Vec<String> = names.iter().map(|n| n.as_str().to_string()).collect();
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, phone_number, display_name, created_at, expires_at
            FROM users
            WHERE display_name = ANY($1) AND expires_at > $2
            "#,
        )
        .bind(&names)
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_registered_today(&self, now: DateTime<Utc>) -> AppResult<Vec<User>> {
        let day_start = start_of_day(self.timezone, now)?;
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, phone_number, display_name, created_at, expires_at
            FROM users
            WHERE created_at >= $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(day_start)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::user::PhoneNumber;

    fn repo(pool: sqlx::PgPool) -> UserRepositoryImpl {
        UserRepositoryImpl::new(
            ConnectionPool::new(pool),
            chrono_tz::America::Los_Angeles,
        )
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn registering_twice_returns_the_same_identity(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = repo(pool);
        let now = Utc::now();
        let phone = PhoneNumber::parse("5551234567", 10).unwrap();

        let first = repo.register(RegisterUser::new(phone.clone()), now).await?;
        assert!(!first.is_existing);

        let second = repo.register(RegisterUser::new(phone), now).await?;
        assert!(second.is_existing);
        assert_eq!(second.user.display_name, first.user.display_name);

        let today = repo.find_registered_today(now).await?;
        assert_eq!(today.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn distinct_phones_get_distinct_names(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = repo(pool);
        let now = Utc::now();

        let a = repo
            .register(
                RegisterUser::new(PhoneNumber::parse("5551234567", 10).unwrap()),
                now,
            )
            .await?;
        let b = repo
            .register(
                RegisterUser::new(PhoneNumber::parse("6661234567", 10).unwrap()),
                now,
            )
            .await?;
        assert_ne!(a.user.display_name, b.user.display_name);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn expired_identities_are_purged_on_registration(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = repo(pool.clone());
        let now = Utc::now();

        // a leftover identity from two days ago
        sqlx::query(
            r#"
            INSERT INTO users (user_id, phone_number, display_name, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind("5551234567")
        .bind("Panda")
        .bind(now - chrono::Duration::days(2))
        .bind(now - chrono::Duration::days(1))
        .execute(&pool)
        .await?;

        let registered = repo
            .register(
                RegisterUser::new(PhoneNumber::parse("5551234567", 10).unwrap()),
                now,
            )
            .await?;
        assert!(!registered.is_existing);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn active_lookup_ignores_expired_names(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = repo(pool.clone());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, phone_number, display_name, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind("5551234567")
        .bind("Panda")
        .bind(now - chrono::Duration::days(1))
        .bind(now - chrono::Duration::hours(1))
        .execute(&pool)
        .await?;

        let names = vec![DisplayName::normalize("panda")];
        assert!(repo.find_active_by_names(&names, now).await?.is_empty());
        Ok(())
    }
}
