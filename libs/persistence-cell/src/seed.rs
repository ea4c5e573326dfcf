use chrono::NaiveDate;
use uuid::Uuid;

use queue_cell::{Appointment, AppointmentStatus, Priority};

/// Starter queue used whenever no usable snapshot exists, so the clinic
/// always boots into a working state.
pub fn seed_appointments(date: NaiveDate) -> Vec<Appointment> {
    vec![
        seed_entry(date, "John Doe", "555-0101", "10:00", "Routine checkup"),
        seed_entry(date, "Jane Smith", "555-0102", "10:15", "Follow-up"),
    ]
}

fn seed_entry(
    date: NaiveDate,
    patient_name: &str,
    phone: &str,
    scheduled_time: &str,
    reason: &str,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_name: patient_name.to_string(),
        phone: phone.to_string(),
        email: None,
        date,
        scheduled_time: scheduled_time.to_string(),
        estimated_duration_minutes: 15,
        status: AppointmentStatus::Waiting,
        priority: Priority::Normal,
        reason: reason.to_string(),
        actual_start_time: None,
        actual_end_time: None,
        eta: None,
    }
}
