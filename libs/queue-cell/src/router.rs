use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    add_appointment, cancel_appointment, complete_consultation, list_queue, queue_status,
    set_paused, start_consultation,
};
use crate::state::QueueState;

pub fn create_queue_router(state: Arc<QueueState>) -> Router {
    Router::new()
        .route("/", get(list_queue).post(add_appointment))
        .route("/status", get(queue_status))
        .route("/paused", put(set_paused))
        .route("/{id}/start", post(start_consultation))
        .route("/{id}/complete", post(complete_consultation))
        .route("/{id}/cancel", post(cancel_appointment))
        .with_state(state)
}
