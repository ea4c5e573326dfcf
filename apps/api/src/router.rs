use std::sync::Arc;

use axum::{routing::get, Router};

use assistant_cell::create_assistant_router;
use queue_cell::{create_queue_router, QueueState};

pub fn create_router(state: Arc<QueueState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MedQueue API is running!" }))
        .nest("/queue", create_queue_router(state.clone()))
        .nest("/assistant", create_assistant_router(state))
}
