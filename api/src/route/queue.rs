use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::queue::{join_queue, show_queue, show_queue_entries};

pub fn build_queue_routers() -> Router<AppRegistry> {
    let queue_routers = Router::new()
        .route("/", get(show_queue))
        .route("/join", post(join_queue))
        .route("/entries", get(show_queue_entries));

    Router::new().nest("/queue", queue_routers)
}
