use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::AppError;

use crate::models::{
    parse_time_of_day, Appointment, AssistantContext, NewAppointment, SetPausedRequest,
};
use crate::state::QueueState;

/// List the queue with live ETAs.
pub async fn list_queue(State(state): State<Arc<QueueState>>) -> Json<Vec<Appointment>> {
    let controller = state.controller.lock().await;
    Json(controller.list(Utc::now()))
}

/// Book a new appointment.
pub async fn add_appointment(
    State(state): State<Arc<QueueState>>,
    Json(request): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    info!("booking request for patient: {}", request.patient_name);

    // Out-of-hours slots are accepted but flagged; intake staff decide.
    if let Some(time) = request.scheduled_time.as_deref().and_then(parse_time_of_day) {
        if !state.config.clinic.is_within_operating_hours(time) {
            warn!(
                "booking for {} requested outside operating hours at {}",
                request.patient_name, time
            );
        }
    }

    let mut controller = state.controller.lock().await;
    let created = controller.add(request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Call a patient into the consultation room.
pub async fn start_consultation(
    State(state): State<Arc<QueueState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    info!("start consultation request for appointment: {}", id);
    let mut controller = state.controller.lock().await;
    let updated = controller.start_consultation(id, Utc::now()).await?;
    Ok(Json(updated))
}

/// Finish the active consultation.
pub async fn complete_consultation(
    State(state): State<Arc<QueueState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    info!("complete consultation request for appointment: {}", id);
    let mut controller = state.controller.lock().await;
    let updated = controller.complete_consultation(id, Utc::now()).await?;
    Ok(Json(updated))
}

/// Cancel a waiting or active appointment.
pub async fn cancel_appointment(
    State(state): State<Arc<QueueState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    info!("cancel request for appointment: {}", id);
    let mut controller = state.controller.lock().await;
    let updated = controller.cancel(id, Utc::now()).await?;
    Ok(Json(updated))
}

/// Pause or resume intake (informational flag).
pub async fn set_paused(
    State(state): State<Arc<QueueState>>,
    Json(request): Json<SetPausedRequest>,
) -> StatusCode {
    let mut controller = state.controller.lock().await;
    controller.set_paused(request.paused);
    StatusCode::NO_CONTENT
}

/// Dashboard status card: waiting count, active patient, wait estimate,
/// persistence sync state.
pub async fn queue_status(State(state): State<Arc<QueueState>>) -> Json<AssistantContext> {
    let controller = state.controller.lock().await;
    Json(controller.assistant_context(Utc::now()))
}
