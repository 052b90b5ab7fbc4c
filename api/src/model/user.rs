use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::id::CourtId;
use kernel::model::reservation::ActivePlayer;
use kernel::model::user::{RegisteredUser, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[garde(length(min = 1))]
    pub phone_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    pub phone_number: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub is_existing: bool,
}

impl From<RegisteredUser> for RegisterUserResponse {
    fn from(value: RegisteredUser) -> Self {
        let RegisteredUser { user, is_existing } = value;
        Self {
            phone_number: user.phone_number.to_string(),
            display_name: user.display_name.into_string(),
            created_at: user.created_at,
            is_existing,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePlayersRequest {
    #[garde(length(min = 1))]
    pub player_names: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePlayersResponse {
    pub valid: bool,
    pub unknown_players: Vec<String>,
    pub busy_players: Vec<String>,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayersResponse {
    pub items: Vec<ActivePlayerResponse>,
}

impl From<Vec<ActivePlayer>> for ActivePlayersResponse {
    fn from(value: Vec<ActivePlayer>) -> Self {
        Self {
            items: value.into_iter().map(ActivePlayerResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayerResponse {
    pub display_name: String,
    pub court_number: CourtId,
    pub started_at: DateTime<Utc>,
}

impl From<ActivePlayer> for ActivePlayerResponse {
    fn from(value: ActivePlayer) -> Self {
        let ActivePlayer {
            display_name,
            court_id,
            started_at,
        } = value;
        Self {
            display_name: display_name.into_string(),
            court_number: court_id,
            started_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleUserResponse {
    pub display_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for IdleUserResponse {
    fn from(value: User) -> Self {
        Self {
            display_name: value.display_name.into_string(),
            phone_number: value.phone_number.to_string(),
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUsersResponse {
    pub active_users: Vec<ActivePlayerResponse>,
    pub idle_users: Vec<IdleUserResponse>,
}
