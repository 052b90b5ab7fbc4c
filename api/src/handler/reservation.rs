use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use garde::Validate;

use kernel::model::id::{CourtId, ReservationId};
use kernel::model::reservation::event::{MergeCourt, ReserveCourt};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::reservation::{
    MergeCourtRequest, MergeCourtRequestWithCourt, ReservationResponse, ReserveCourtRequest,
    ReserveCourtRequestWithCourt,
};

pub async fn reserve_court(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ReserveCourtRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let event = ReserveCourt::try_from(ReserveCourtRequestWithCourt::new(court_id, req))?;
    let reservation = registry
        .reservation_repository()
        .reserve(event, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

pub async fn merge_court(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<MergeCourtRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let event = MergeCourt::try_from(MergeCourtRequestWithCourt::new(court_id, req))?;
    registry
        .reservation_repository()
        .merge(event, Utc::now())
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .cancel(reservation_id)
        .await
        .map(|_| StatusCode::OK)
}
