use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use garde::Validate;

use kernel::model::id::CourtId;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::extractor::AdminUser;
use crate::handler::sweep_expired;
use crate::model::court::{CourtResponse, CourtsResponse, SetVisibilityRequest};
use crate::model::user::AdminUsersResponse;

/// Every court regardless of visibility, for the admin panel.
pub async fn show_all_courts(
    _admin: AdminUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CourtsResponse>> {
    sweep_expired(&registry).await?;

    registry
        .court_repository()
        .find_all()
        .await
        .map(CourtsResponse::from)
        .map(Json)
}

/// Tears down whatever reservation the court holds, expired or not.
pub async fn reset_court(
    _admin: AdminUser,
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .court_repository()
        .force_release(court_id)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn set_court_visibility(
    _admin: AdminUser,
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<SetVisibilityRequest>,
) -> AppResult<Json<CourtResponse>> {
    req.validate(&())?;

    registry
        .court_repository()
        .set_visibility(court_id, req.visible)
        .await
        .map(CourtResponse::from)
        .map(Json)
}

/// Who is on a court right now, and who registered today but is not
/// playing.
pub async fn show_admin_users(
    _admin: AdminUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AdminUsersResponse>> {
    sweep_expired(&registry).await?;

    let now = Utc::now();
    let active = registry.reservation_repository().active_players(now).await?;
    let active_names: HashSet<String> = active
        .iter()
        .map(|player| player.display_name.as_str().to_string())
        .collect();

    let idle_users = registry
        .user_repository()
        .find_registered_today(now)
        .await?
        .into_iter()
        .filter(|user| !active_names.contains(user.display_name.as_str()))
        .map(Into::into)
        .collect();

    Ok(Json(AdminUsersResponse {
        active_users: active.into_iter().map(Into::into).collect(),
        idle_users,
    }))
}
