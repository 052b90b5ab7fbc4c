use axum::Router;
use registry::AppRegistry;

use super::{
    admin::build_admin_routers, court::build_court_routers, health::build_health_check_routers,
    queue::build_queue_routers, user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_court_routers())
        .merge(build_user_routers())
        .merge(build_queue_routers())
        .merge(build_admin_routers());

    Router::new().nest("/api/v1", router)
}
