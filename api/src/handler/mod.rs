use chrono::Utc;
use registry::AppRegistry;
use shared::error::AppResult;

pub mod admin;
pub mod court;
pub mod health;
pub mod queue;
pub mod reservation;
pub mod user;

/// The lazy expiry pass. Every read of courts, the queue, or user activity
/// reconciles state first; there is no background timer.
pub(crate) async fn sweep_expired(registry: &AppRegistry) -> AppResult<()> {
    let released = registry
        .reservation_repository()
        .release_expired(Utc::now())
        .await?;
    if released > 0 {
        tracing::debug!(released, "released expired reservations");
    }
    Ok(())
}
