use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::SyncStatus;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date: NaiveDate,
    /// Time of day the slot was requested for, as "HH:MM". Kept as text so a
    /// snapshot with a blank value degrades to midnight instead of failing.
    pub scheduled_time: String,
    pub estimated_duration_minutes: i64,
    pub status: AppointmentStatus,
    pub priority: Priority,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Projected consultation start, recomputed on every read.
    /// Never authoritative; cleared when a snapshot is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}

impl Appointment {
    /// Scheduled time of day; a blank or malformed value degrades to 00:00.
    pub fn scheduled_time_of_day(&self) -> NaiveTime {
        parse_time_of_day(&self.scheduled_time)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is valid"))
    }

    /// The scheduled slot anchored on the given calendar date.
    pub fn scheduled_instant(&self, on: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&on.and_time(self.scheduled_time_of_day()))
    }
}

pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

pub fn format_time_of_day(instant: DateTime<Utc>) -> String {
    instant.format("%H:%M").to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    pub fn can_transition_to(&self, target: &AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, target) {
            (Waiting, InProgress) => true,
            (InProgress, Completed) => true,
            (Waiting, Cancelled) | (InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Waiting => write!(f, "WAITING"),
            AppointmentStatus::InProgress => write!(f, "IN_PROGRESS"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Normal,
    Emergency,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Intake form for a new appointment. Only name and phone are required;
/// everything else falls back to clinic defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub estimated_duration_minutes: Option<i64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPausedRequest {
    pub paused: bool,
}

/// Read-only snapshot of the queue handed to the conversational assistant
/// and to the dashboard status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantContext {
    pub current_time: String,
    pub is_clinic_paused: bool,
    pub queue_size: usize,
    pub in_progress_patient: Option<String>,
    pub next_eta: Option<String>,
    pub projected_wait_minutes: i64,
    pub sync_status: SyncStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_lifecycle() {
        use AppointmentStatus::*;
        assert!(Waiting.can_transition_to(&InProgress));
        assert!(Waiting.can_transition_to(&Cancelled));
        assert!(InProgress.can_transition_to(&Completed));
        assert!(InProgress.can_transition_to(&Cancelled));

        assert!(!Waiting.can_transition_to(&Completed));
        assert!(!Completed.can_transition_to(&InProgress));
        assert!(!Cancelled.can_transition_to(&Waiting));
        assert!(!Completed.can_transition_to(&Cancelled));
    }

    #[test]
    fn terminal_states() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(!AppointmentStatus::Waiting.is_terminal());
        assert!(!AppointmentStatus::InProgress.is_terminal());
    }

    #[test]
    fn malformed_scheduled_time_degrades_to_midnight() {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name: "John Doe".to_string(),
            phone: "555-0100".to_string(),
            email: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            scheduled_time: "not-a-time".to_string(),
            estimated_duration_minutes: 15,
            status: AppointmentStatus::Waiting,
            priority: Priority::Normal,
            reason: "Checkup".to_string(),
            actual_start_time: None,
            actual_end_time: None,
            eta: None,
        };
        assert_eq!(
            appointment.scheduled_time_of_day(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn status_round_trips_through_screaming_snake_case() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let back: AppointmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppointmentStatus::InProgress);
    }
}
