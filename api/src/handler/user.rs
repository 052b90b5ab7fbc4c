use std::collections::HashSet;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use garde::Validate;

use kernel::model::reservation::event::normalize_roster;
use kernel::model::user::event::RegisterUser;
use kernel::model::user::PhoneNumber;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::handler::sweep_expired;
use crate::model::user::{
    ActivePlayersResponse, RegisterUserRequest, RegisterUserResponse, ValidatePlayersRequest,
    ValidatePlayersResponse,
};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterUserRequest>,
) -> AppResult<Json<RegisterUserResponse>> {
    req.validate(&())?;

    let phone_number = PhoneNumber::parse(
        &req.phone_number,
        registry.config().registration.phone_digits,
    )?;
    registry
        .user_repository()
        .register(RegisterUser::new(phone_number), Utc::now())
        .await
        .map(RegisterUserResponse::from)
        .map(Json)
}

/// Dry-run check used by the reservation form: reports unknown and busy
/// players without touching any state.
pub async fn validate_players(
    State(registry): State<AppRegistry>,
    Json(req): Json<ValidatePlayersRequest>,
) -> AppResult<Json<ValidatePlayersResponse>> {
    req.validate(&())?;

    let now = Utc::now();
    let players = normalize_roster(&req.player_names)?;

    let known: HashSet<String> = registry
        .user_repository()
        .find_active_by_names(&players, now)
        .await?
        .into_iter()
        .map(|user| user.display_name.into_string())
        .collect();
    let busy_set: HashSet<String> = registry
        .reservation_repository()
        .active_players(now)
        .await?
        .into_iter()
        .map(|player| player.display_name.into_string())
        .collect();

    let unknown_players: Vec<String> = players
        .iter()
        .filter(|p| !known.contains(p.as_str()))
        .map(|p| p.as_str().to_string())
        .collect();
    let busy_players: Vec<String> = players
        .iter()
        .filter(|p| known.contains(p.as_str()) && busy_set.contains(p.as_str()))
        .map(|p| p.as_str().to_string())
        .collect();

    let message = if !unknown_players.is_empty() {
        format!(
            "The following players are not registered or have expired: {}",
            unknown_players.join(", ")
        )
    } else if !busy_players.is_empty() {
        format!(
            "The following players are currently in active games: {}",
            busy_players.join(", ")
        )
    } else {
        "All players are valid".to_string()
    };

    Ok(Json(ValidatePlayersResponse {
        valid: unknown_players.is_empty() && busy_players.is_empty(),
        unknown_players,
        busy_players,
        message,
    }))
}

pub async fn show_active_players(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ActivePlayersResponse>> {
    sweep_expired(&registry).await?;

    registry
        .reservation_repository()
        .active_players(Utc::now())
        .await
        .map(ActivePlayersResponse::from)
        .map(Json)
}
