use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::QueueError;
use crate::models::{format_time_of_day, Appointment, AppointmentStatus, NewAppointment, Priority};

/// Canonical ordered collection of appointments.
///
/// Owns the four state-changing operations and the ordering invariants:
/// a waiting patient's position only changes through insertion or promotion,
/// and at most one appointment is in progress at any time.
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
    slot_duration_minutes: i64,
}

impl AppointmentStore {
    pub fn new(slot_duration_minutes: i64) -> Self {
        Self {
            appointments: Vec::new(),
            slot_duration_minutes,
        }
    }

    pub fn with_appointments(slot_duration_minutes: i64, appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            slot_duration_minutes,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Validate, default and insert a new appointment.
    ///
    /// Emergencies go straight to the head of the waiting line; everybody
    /// else is appended and the waiting segment re-sorted by scheduled time,
    /// so a late booking cannot jump patients already rostered earlier.
    pub fn add(
        &mut self,
        request: NewAppointment,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let patient_name = request.patient_name.trim().to_string();
        if patient_name.is_empty() {
            return Err(QueueError::Validation("patient name is required".to_string()));
        }
        let phone = request.phone.trim().to_string();
        if phone.is_empty() {
            return Err(QueueError::Validation("phone number is required".to_string()));
        }
        if let Some(duration) = request.estimated_duration_minutes {
            if duration <= 0 {
                return Err(QueueError::Validation(
                    "estimated duration must be positive".to_string(),
                ));
            }
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name,
            phone,
            email: request.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            date: now.date_naive(),
            scheduled_time: request
                .scheduled_time
                .unwrap_or_else(|| format_time_of_day(now)),
            estimated_duration_minutes: request
                .estimated_duration_minutes
                .unwrap_or(self.slot_duration_minutes),
            status: AppointmentStatus::Waiting,
            priority: request.priority.unwrap_or_default(),
            reason: request.reason.unwrap_or_else(|| "Consultation".to_string()),
            actual_start_time: None,
            actual_end_time: None,
            eta: None,
        };

        match appointment.priority {
            Priority::Emergency => {
                // Jump the waiting line, leaving history and any active
                // consultation ahead untouched.
                let position = self
                    .appointments
                    .iter()
                    .position(|a| a.status == AppointmentStatus::Waiting)
                    .unwrap_or(self.appointments.len());
                self.appointments.insert(position, appointment.clone());
                info!(
                    "emergency appointment {} for {} inserted at head of queue",
                    appointment.id, appointment.patient_name
                );
            }
            Priority::Normal => {
                self.appointments.push(appointment.clone());
                self.sort_waiting_by_schedule();
                debug!(
                    "appointment {} for {} booked at {}",
                    appointment.id, appointment.patient_name, appointment.scheduled_time
                );
            }
        }

        Ok(appointment)
    }

    /// Promote an appointment to the consultation room.
    ///
    /// The clinic has a single room: any consultation still in progress is
    /// completed implicitly before the new one starts.
    pub fn start_consultation(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let target = self.index_of(id)?;
        let from = self.appointments[target].status;
        if !from.can_transition_to(&AppointmentStatus::InProgress) {
            return Err(QueueError::InvalidTransition {
                from,
                to: AppointmentStatus::InProgress,
            });
        }

        if let Some(active) = self
            .appointments
            .iter_mut()
            .find(|a| a.status == AppointmentStatus::InProgress)
        {
            active.status = AppointmentStatus::Completed;
            active.actual_end_time = Some(now);
            info!(
                "consultation for {} auto-completed by next session",
                active.patient_name
            );
        }

        let appointment = &mut self.appointments[target];
        appointment.status = AppointmentStatus::InProgress;
        appointment.actual_start_time = Some(now);
        info!("consultation started for {}", appointment.patient_name);
        Ok(appointment.clone())
    }

    pub fn complete_consultation(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Appointment, QueueError> {
        let target = self.index_of(id)?;
        let from = self.appointments[target].status;
        if from != AppointmentStatus::InProgress {
            return Err(QueueError::InvalidTransition {
                from,
                to: AppointmentStatus::Completed,
            });
        }

        let appointment = &mut self.appointments[target];
        appointment.status = AppointmentStatus::Completed;
        appointment.actual_end_time = Some(now);
        info!("consultation completed for {}", appointment.patient_name);
        Ok(appointment.clone())
    }

    pub fn cancel(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Appointment, QueueError> {
        let target = self.index_of(id)?;
        let from = self.appointments[target].status;
        if !from.can_transition_to(&AppointmentStatus::Cancelled) {
            return Err(QueueError::InvalidTransition {
                from,
                to: AppointmentStatus::Cancelled,
            });
        }

        let appointment = &mut self.appointments[target];
        let was_in_progress = appointment.status == AppointmentStatus::InProgress;
        appointment.status = AppointmentStatus::Cancelled;
        if was_in_progress {
            appointment.actual_end_time = Some(now);
        }
        info!("appointment cancelled for {}", appointment.patient_name);
        Ok(appointment.clone())
    }

    fn index_of(&self, id: Uuid) -> Result<usize, QueueError> {
        self.appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(QueueError::NotFound(id))
    }

    /// Stable sort of the waiting entries (within their own index slots) by
    /// scheduled time; ties keep their existing relative order.
    fn sort_waiting_by_schedule(&mut self) {
        let slots: Vec<usize> = self
            .appointments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.status == AppointmentStatus::Waiting)
            .map(|(i, _)| i)
            .collect();

        let mut waiting: Vec<Appointment> =
            slots.iter().map(|&i| self.appointments[i].clone()).collect();
        waiting.sort_by_key(|a| a.scheduled_time_of_day());

        for (slot, appointment) in slots.into_iter().zip(waiting) {
            self.appointments[slot] = appointment;
        }
    }
}
