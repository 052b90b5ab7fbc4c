use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{register_user, show_active_players, validate_players};

pub fn build_user_routers() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/", post(register_user))
        .route("/validate", post(validate_players))
        .route("/active", get(show_active_players));

    Router::new().nest("/users", users_routers)
}
