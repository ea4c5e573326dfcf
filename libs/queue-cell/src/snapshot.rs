use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Appointment;

/// Durable store for the appointment collection. Save is best-effort: a
/// failure degrades the sync status but never rolls back an in-memory
/// mutation. Load is all-or-nothing: one bad record rejects the snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Appointment>, SnapshotError>;
    async fn save(&self, appointments: &[Appointment]) -> Result<(), SnapshotError>;
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot I/O error: {0}")]
    Io(String),

    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("Snapshot failed validation: {0}")]
    Invalid(String),
}

/// Whether the last snapshot save succeeded. Surfaced to the dashboard and
/// the assistant; never blocks an operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Synced,
    Degraded,
}
