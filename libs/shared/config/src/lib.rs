use std::env;

use chrono::NaiveTime;
use tracing::warn;

/// One operating window of the clinic day, e.g. 10:00-13:00.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }
}

#[derive(Debug, Clone)]
pub struct ClinicSettings {
    pub name: String,
    pub doctor_name: String,
    pub morning_shift: ShiftWindow,
    pub evening_shift: ShiftWindow,
    pub slot_duration_minutes: i64,
}

impl ClinicSettings {
    pub fn is_within_operating_hours(&self, time: NaiveTime) -> bool {
        self.morning_shift.contains(time) || self.evening_shift.contains(time)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic: ClinicSettings,
    pub data_path: String,
    pub assistant_api_key: Option<String>,
    pub assistant_base_url: String,
    pub assistant_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let clinic = ClinicSettings {
            name: env::var("CLINIC_NAME").unwrap_or_else(|_| "Wellness Family Clinic".to_string()),
            doctor_name: env::var("CLINIC_DOCTOR_NAME")
                .unwrap_or_else(|_| "Dr. Sarah Mitchell".to_string()),
            morning_shift: ShiftWindow {
                start: time_var("CLINIC_MORNING_SHIFT_START", "10:00"),
                end: time_var("CLINIC_MORNING_SHIFT_END", "13:00"),
            },
            evening_shift: ShiftWindow {
                start: time_var("CLINIC_EVENING_SHIFT_START", "17:00"),
                end: time_var("CLINIC_EVENING_SHIFT_END", "20:00"),
            },
            slot_duration_minutes: env::var("CLINIC_SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        };

        let config = Self {
            clinic,
            data_path: env::var("QUEUE_DATA_PATH")
                .unwrap_or_else(|_| "medqueue_appointments.json".to_string()),
            assistant_api_key: env::var("ASSISTANT_API_KEY").ok().filter(|k| !k.is_empty()),
            assistant_base_url: env::var("ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            assistant_model: env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
        };

        if !config.is_assistant_configured() {
            warn!("ASSISTANT_API_KEY not set - assistant will run in offline mode");
        }

        config
    }

    pub fn is_assistant_configured(&self) -> bool {
        self.assistant_api_key.is_some()
    }
}

fn time_var(name: &str, default: &str) -> NaiveTime {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
        warn!("{} is not a valid HH:MM time, using default {}", name, default);
        NaiveTime::parse_from_str(default, "%H:%M").expect("default shift time is valid")
    })
}
