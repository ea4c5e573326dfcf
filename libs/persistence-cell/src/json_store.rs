use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use queue_cell::{Appointment, AppointmentStatus, SnapshotError, SnapshotStore};

/// Appointment snapshot persisted as a JSON file.
///
/// Loading is all-or-nothing: typed deserialization plus per-record
/// validation, and a single bad record rejects the whole snapshot so the
/// caller falls back to the seed dataset instead of running on a partial
/// queue.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Appointment>, SnapshotError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SnapshotError::Io(e.to_string()))?;

        let mut appointments: Vec<Appointment> =
            serde_json::from_str(&raw).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        validate_snapshot(&appointments)?;

        // The eta field is derived state; whatever was on disk is stale.
        for appointment in &mut appointments {
            appointment.eta = None;
        }

        debug!(
            "loaded {} appointments from {}",
            appointments.len(),
            self.path.display()
        );
        Ok(appointments)
    }

    async fn save(&self, appointments: &[Appointment]) -> Result<(), SnapshotError> {
        let raw = serde_json::to_vec_pretty(appointments)
            .map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| SnapshotError::Io(e.to_string()))?;
        debug!(
            "saved {} appointments to {}",
            appointments.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn validate_snapshot(appointments: &[Appointment]) -> Result<(), SnapshotError> {
    let mut ids = HashSet::new();
    let mut in_progress = 0;

    for appointment in appointments {
        if appointment.patient_name.trim().is_empty() {
            return Err(SnapshotError::Invalid(format!(
                "appointment {} has no patient name",
                appointment.id
            )));
        }
        if appointment.phone.trim().is_empty() {
            return Err(SnapshotError::Invalid(format!(
                "appointment {} has no phone number",
                appointment.id
            )));
        }
        if appointment.estimated_duration_minutes <= 0 {
            return Err(SnapshotError::Invalid(format!(
                "appointment {} has a non-positive duration",
                appointment.id
            )));
        }
        if !ids.insert(appointment.id) {
            return Err(SnapshotError::Invalid(format!(
                "duplicate appointment id {}",
                appointment.id
            )));
        }
        if appointment.status == AppointmentStatus::InProgress {
            in_progress += 1;
        }
    }

    if in_progress > 1 {
        return Err(SnapshotError::Invalid(
            "more than one appointment in progress".to_string(),
        ));
    }

    Ok(())
}
