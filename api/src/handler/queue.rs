use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use garde::Validate;

use kernel::model::queue::JoinQueue;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::handler::sweep_expired;
use crate::model::queue::{
    ActiveGameResponse, JoinQueueRequest, QueueEntriesResponse, QueueEntryResponse, QueueResponse,
};

/// Games in progress with their remaining time, soonest to finish first —
/// the view players watch while waiting for a court.
pub async fn show_queue(State(registry): State<AppRegistry>) -> AppResult<Json<QueueResponse>> {
    sweep_expired(&registry).await?;

    let now = Utc::now();
    let items = registry
        .reservation_repository()
        .find_active(now)
        .await?
        .into_iter()
        .map(|reservation| ActiveGameResponse::from_reservation(reservation, now))
        .collect();

    Ok(Json(QueueResponse { items }))
}

pub async fn join_queue(
    State(registry): State<AppRegistry>,
    Json(req): Json<JoinQueueRequest>,
) -> AppResult<(StatusCode, Json<QueueEntryResponse>)> {
    req.validate(&())?;

    let event = JoinQueue::try_from(req)?;
    let entry = registry.queue_repository().join(event, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn show_queue_entries(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<QueueEntriesResponse>> {
    sweep_expired(&registry).await?;

    registry
        .queue_repository()
        .find_all()
        .await
        .map(QueueEntriesResponse::from)
        .map(Json)
}
