use thiserror::Error;
use uuid::Uuid;

use shared_models::AppError;

use crate::models::AppointmentStatus;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Appointment not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl From<QueueError> for AppError {
    fn from(e: QueueError) -> Self {
        match &e {
            QueueError::Validation(_) => AppError::ValidationError(e.to_string()),
            QueueError::NotFound(_) => AppError::NotFound(e.to_string()),
            QueueError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
        }
    }
}
