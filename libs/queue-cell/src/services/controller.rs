use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use notification_cell::{NotificationChannel, NotificationEvent, NotificationKind};

use crate::error::QueueError;
use crate::models::{
    parse_time_of_day, Appointment, AppointmentStatus, AssistantContext, NewAppointment,
};
use crate::services::projector;
use crate::services::store::AppointmentStore;
use crate::snapshot::{SnapshotStore, SyncStatus};

/// An ETA has to move at least this far from its last announced value
/// before the patient is told about it again.
pub const ETA_DRIFT_THRESHOLD_MINUTES: i64 = 10;

/// Operation surface over the appointment store.
///
/// Every mutation re-projects the queue, diffs the projection against the
/// previous one to emit notification events (at most once per transition),
/// and saves a snapshot. Failures on the notification or persistence path
/// never fail the mutation itself.
pub struct QueueController {
    store: AppointmentStore,
    snapshots: Arc<dyn SnapshotStore>,
    events: UnboundedSender<NotificationEvent>,
    is_paused: bool,
    sync_status: SyncStatus,
    last_view: Vec<Appointment>,
    announced_etas: HashMap<Uuid, i64>,
}

impl QueueController {
    pub fn new(
        store: AppointmentStore,
        snapshots: Arc<dyn SnapshotStore>,
        events: UnboundedSender<NotificationEvent>,
        now: DateTime<Utc>,
    ) -> Self {
        let last_view = projector::project(store.appointments(), now);
        let announced_etas = last_view
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .filter_map(|a| {
                a.eta
                    .as_deref()
                    .and_then(time_of_day_minutes)
                    .map(|minutes| (a.id, minutes))
            })
            .collect();

        Self {
            store,
            snapshots,
            events,
            is_paused: false,
            sync_status: SyncStatus::Synced,
            last_view,
            announced_etas,
        }
    }

    /// Current queue with live ETAs. Projection is recomputed on every
    /// call; a stored ETA is never served stale.
    pub fn list(&self, now: DateTime<Utc>) -> Vec<Appointment> {
        projector::project(self.store.appointments(), now)
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Pause or resume intake. Informational only: the flag is surfaced to
    /// the dashboard and the assistant but does not gate bookings.
    pub fn set_paused(&mut self, paused: bool) {
        if self.is_paused != paused {
            info!("clinic intake {}", if paused { "paused" } else { "resumed" });
        }
        self.is_paused = paused;
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub async fn add(
        &mut self,
        request: NewAppointment,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let created = self.store.add(request, now)?;
        self.after_mutation(now).await;
        Ok(self.projected(created))
    }

    pub async fn start_consultation(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let updated = self.store.start_consultation(id, now)?;
        self.after_mutation(now).await;
        Ok(self.projected(updated))
    }

    pub async fn complete_consultation(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let updated = self.store.complete_consultation(id, now)?;
        self.after_mutation(now).await;
        Ok(self.projected(updated))
    }

    pub async fn cancel(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let updated = self.store.cancel(id, now)?;
        self.after_mutation(now).await;
        Ok(self.projected(updated))
    }

    /// Periodic re-projection tick. Detects ETA drift as the wall clock
    /// advances; mutates nothing and persists nothing.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let view = projector::project(self.store.appointments(), now);
        let previous = std::mem::replace(&mut self.last_view, view.clone());
        self.detect_changes(&previous, &view);
    }

    /// Read-only snapshot for the conversational assistant and the status
    /// endpoint.
    pub fn assistant_context(&self, now: DateTime<Utc>) -> AssistantContext {
        let view = projector::project(self.store.appointments(), now);
        let waiting: Vec<&Appointment> = view
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .collect();

        let now_minutes =
            i64::from(chrono::Timelike::hour(&now)) * 60 + i64::from(chrono::Timelike::minute(&now));
        let projected_wait_minutes = waiting
            .last()
            .and_then(|a| {
                a.eta.as_deref().and_then(time_of_day_minutes).map(|eta| {
                    (eta + a.estimated_duration_minutes - now_minutes).max(0)
                })
            })
            .unwrap_or(0);

        AssistantContext {
            current_time: now.format("%H:%M").to_string(),
            is_clinic_paused: self.is_paused,
            queue_size: waiting.len(),
            in_progress_patient: view
                .iter()
                .find(|a| a.status == AppointmentStatus::InProgress)
                .map(|a| a.patient_name.clone()),
            next_eta: waiting.first().and_then(|a| a.eta.clone()),
            projected_wait_minutes,
            sync_status: self.sync_status,
        }
    }

    async fn after_mutation(&mut self, now: DateTime<Utc>) {
        let view = projector::project(self.store.appointments(), now);
        let previous = std::mem::replace(&mut self.last_view, view.clone());
        self.detect_changes(&previous, &view);
        self.persist().await;
    }

    /// Diff two projected views and emit one event per detected change.
    /// Nothing in here is allowed to fail the surrounding operation.
    fn detect_changes(&mut self, previous: &[Appointment], view: &[Appointment]) {
        let before: HashMap<Uuid, &Appointment> = previous.iter().map(|a| (a.id, a)).collect();

        for appointment in view {
            match before.get(&appointment.id) {
                None => {
                    self.emit(notification_for(appointment, NotificationKind::Booked));
                }
                Some(old) if old.status != appointment.status => match appointment.status {
                    AppointmentStatus::InProgress => {
                        self.emit(notification_for(appointment, NotificationKind::CalledIn));
                    }
                    AppointmentStatus::Completed => {
                        self.emit(notification_for(appointment, NotificationKind::Completed));
                    }
                    _ => {}
                },
                Some(_) => {}
            }

            if appointment.status == AppointmentStatus::Waiting {
                self.track_eta_drift(appointment);
            } else {
                self.announced_etas.remove(&appointment.id);
            }
        }
    }

    /// Tell a waiting patient about their ETA at most once per drift
    /// episode: an unchanged projection never re-fires.
    fn track_eta_drift(&mut self, appointment: &Appointment) {
        let Some(minutes) = appointment.eta.as_deref().and_then(time_of_day_minutes) else {
            return;
        };

        match self.announced_etas.get(&appointment.id) {
            None => {
                // Baseline is the ETA announced at booking time.
                self.announced_etas.insert(appointment.id, minutes);
            }
            Some(&announced) if (minutes - announced).abs() >= ETA_DRIFT_THRESHOLD_MINUTES => {
                debug!(
                    "eta for {} drifted {} minutes, notifying",
                    appointment.patient_name,
                    minutes - announced
                );
                self.emit(notification_for(appointment, NotificationKind::EtaUpdated));
                self.announced_etas.insert(appointment.id, minutes);
            }
            Some(_) => {}
        }
    }

    fn emit(&self, event: NotificationEvent) {
        if let Err(e) = self.events.send(event) {
            warn!("notification channel unavailable, event dropped: {}", e);
        }
    }

    async fn persist(&mut self) {
        match self.snapshots.save(self.store.appointments()).await {
            Ok(()) => {
                if self.sync_status == SyncStatus::Degraded {
                    info!("snapshot sync restored");
                }
                self.sync_status = SyncStatus::Synced;
            }
            Err(e) => {
                warn!("snapshot save failed, queue running from memory: {}", e);
                self.sync_status = SyncStatus::Degraded;
            }
        }
    }

    fn projected(&self, appointment: Appointment) -> Appointment {
        self.last_view
            .iter()
            .find(|a| a.id == appointment.id)
            .cloned()
            .unwrap_or(appointment)
    }
}

fn notification_for(appointment: &Appointment, kind: NotificationKind) -> NotificationEvent {
    let (channel, recipient) = match &appointment.email {
        Some(email) => (NotificationChannel::Email, email.clone()),
        None => (NotificationChannel::Sms, appointment.phone.clone()),
    };

    NotificationEvent {
        recipient,
        patient_name: appointment.patient_name.clone(),
        channel,
        kind,
        date: Some(appointment.date.to_string()),
        time: Some(appointment.scheduled_time.clone()),
        eta: appointment.eta.clone(),
    }
}

fn time_of_day_minutes(raw: &str) -> Option<i64> {
    parse_time_of_day(raw).map(|t| {
        i64::from(chrono::Timelike::hour(&t)) * 60 + i64::from(chrono::Timelike::minute(&t))
    })
}
