use std::sync::Arc;

use axum::{routing::post, Router};

use queue_cell::QueueState;

use crate::handlers::ask_assistant;

pub fn create_assistant_router(state: Arc<QueueState>) -> Router {
    Router::new()
        .route("/ask", post(ask_assistant))
        .with_state(state)
}
