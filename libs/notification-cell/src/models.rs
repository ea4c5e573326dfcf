use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Sms,
    Email,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Booked,
    CalledIn,
    Completed,
    EtaUpdated,
}

/// A single outbound patient notification, ready for delivery.
///
/// The queue controller emits exactly one of these per observed transition;
/// delivery itself is best-effort and never feeds back into queue state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub recipient: String,
    pub patient_name: String,
    pub channel: NotificationChannel,
    pub kind: NotificationKind,
    pub date: Option<String>,
    pub time: Option<String>,
    pub eta: Option<String>,
}
