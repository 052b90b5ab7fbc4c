use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::admin::{
    reset_court, set_court_visibility, show_admin_users, show_all_courts,
};

pub fn build_admin_routers() -> Router<AppRegistry> {
    let admin_routers = Router::new()
        .route("/courts", get(show_all_courts))
        .route("/courts/:court_number/reset", post(reset_court))
        .route("/courts/:court_number/visibility", put(set_court_visibility))
        .route("/users", get(show_admin_users));

    Router::new().nest("/admin", admin_routers)
}
