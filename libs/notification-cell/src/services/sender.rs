use async_trait::async_trait;
use tracing::info;

use crate::error::NotificationError;
use crate::models::NotificationEvent;
use crate::services::templates::render_message;

/// Outbound delivery boundary. Implementations are best-effort; a failed
/// send must never affect queue state.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError>;
}

/// Simulated SMS/email delivery that renders the message and writes it to
/// the log, standing in for a real gateway.
pub struct LogSender {
    clinic_name: String,
}

impl LogSender {
    pub fn new(clinic_name: impl Into<String>) -> Self {
        Self {
            clinic_name: clinic_name.into(),
        }
    }
}

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        let message = render_message(event, &self.clinic_name);
        info!(
            recipient = %event.recipient,
            channel = ?event.channel,
            kind = ?event.kind,
            "clinical notification: {}",
            message
        );
        Ok(())
    }
}
