use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Delivery failed for {recipient}: {reason}")]
    DeliveryFailed { recipient: String, reason: String },
}
