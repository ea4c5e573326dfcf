use std::sync::Arc;

use axum::{extract::State, response::Json};
use chrono::Utc;
use tracing::info;

use queue_cell::QueueState;

use crate::models::{AskReply, AskRequest};
use crate::services::AssistantClient;

/// Answer a patient question with the live queue snapshot as context.
///
/// This endpoint never fails: assistant trouble degrades to a canned
/// message rather than an error status.
pub async fn ask_assistant(
    State(state): State<Arc<QueueState>>,
    Json(request): Json<AskRequest>,
) -> Json<AskReply> {
    info!("assistant question received");

    let context = {
        let controller = state.controller.lock().await;
        controller.assistant_context(Utc::now())
    };

    let client = AssistantClient::new(&state.config);
    let reply = client.ask(&request.message, &context).await;
    Json(AskReply { reply })
}
