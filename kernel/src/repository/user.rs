use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::user::event::RegisterUser;
use crate::model::user::{DisplayName, RegisteredUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the caller's same-day identity if one exists, otherwise
    /// assigns a random unused display name. Stale identities for the phone
    /// number are purged on the way.
    async fn register(&self, event: RegisterUser, now: DateTime<Utc>) -> AppResult<RegisteredUser>;
    /// Identities among `names` that are still active (`now < expires_at`).
    async fn find_active_by_names(
        &self,
        names: &[DisplayName],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<User>>;
    /// Everyone registered today, for the idle-user view.
    async fn find_registered_today(&self, now: DateTime<Utc>) -> AppResult<Vec<User>>;
}
