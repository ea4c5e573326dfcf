use chrono::{DateTime, Duration, Utc};

use crate::models::{format_time_of_day, Appointment, AppointmentStatus};

/// Compute a projected consultation start for every waiting appointment.
///
/// Pure function of the appointment sequence and the current instant: the
/// stored collection is never mutated, and two calls at the same instant
/// yield identical results. Stored order is the service order; projection
/// never reorders.
pub fn project(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Appointment> {
    let mut clock = availability_clock(appointments, now);
    let today = now.date_naive();

    appointments
        .iter()
        .map(|appointment| {
            if appointment.status != AppointmentStatus::Waiting {
                return appointment.clone();
            }

            // Nobody is projected before their own slot, and no two waiting
            // patients overlap: the clock only moves forward.
            let scheduled = appointment.scheduled_instant(today);
            let eta_instant = clock.max(scheduled);
            clock = eta_instant + Duration::minutes(appointment.estimated_duration_minutes);

            let mut projected = appointment.clone();
            projected.eta = Some(format_time_of_day(eta_instant));
            projected
        })
        .collect()
}

/// When the single consultation resource is next expected to be free.
///
/// An overrunning consultation clamps to `now`: once the estimate has
/// elapsed, the room is treated as free immediately rather than pushing
/// every projection into the past.
fn availability_clock(appointments: &[Appointment], now: DateTime<Utc>) -> DateTime<Utc> {
    let active = appointments
        .iter()
        .find(|a| a.status == AppointmentStatus::InProgress);

    match active.and_then(|a| {
        a.actual_start_time
            .map(|start| start + Duration::minutes(a.estimated_duration_minutes))
    }) {
        Some(projected_end) => projected_end.max(now),
        None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{NaiveDate, TimeZone};
    use uuid::Uuid;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, hour, minute, 0).unwrap()
    }

    fn waiting(name: &str, scheduled: &str, duration: i64) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_name: name.to_string(),
            phone: "555-0100".to_string(),
            email: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            scheduled_time: scheduled.to_string(),
            estimated_duration_minutes: duration,
            status: AppointmentStatus::Waiting,
            priority: Priority::Normal,
            reason: "Checkup".to_string(),
            actual_start_time: None,
            actual_end_time: None,
            eta: None,
        }
    }

    fn in_progress(name: &str, started: DateTime<Utc>, duration: i64) -> Appointment {
        let mut a = waiting(name, &format_time_of_day(started), duration);
        a.status = AppointmentStatus::InProgress;
        a.actual_start_time = Some(started);
        a
    }

    fn etas(view: &[Appointment]) -> Vec<Option<String>> {
        view.iter().map(|a| a.eta.clone()).collect()
    }

    #[test]
    fn idle_queue_projects_scheduled_times() {
        // Two waiting patients ahead of opening: each keeps their slot.
        let queue = vec![waiting("A", "09:00", 15), waiting("B", "09:15", 15)];
        let view = project(&queue, at(8, 50));
        assert_eq!(
            etas(&view),
            vec![Some("09:00".to_string()), Some("09:15".to_string())]
        );
    }

    #[test]
    fn on_schedule_consultation_leaves_next_eta_unchanged() {
        let queue = vec![
            in_progress("A", at(9, 0), 15),
            waiting("B", "09:15", 15),
        ];
        let view = project(&queue, at(9, 5));
        assert_eq!(view[0].eta, None);
        assert_eq!(view[1].eta, Some("09:15".to_string()));
    }

    #[test]
    fn busy_resource_pushes_early_arrivals_back() {
        // A runs until 09:30; B asked for 09:15 but cannot start before A ends.
        let queue = vec![
            in_progress("A", at(9, 0), 30),
            waiting("B", "09:15", 15),
            waiting("C", "09:30", 15),
        ];
        let view = project(&queue, at(9, 10));
        assert_eq!(view[1].eta, Some("09:30".to_string()));
        assert_eq!(view[2].eta, Some("09:45".to_string()));
    }

    #[test]
    fn overrunning_consultation_clamps_clock_to_now() {
        // A's 15-minute estimate ended at 09:15; at 09:20 the room counts as
        // free now, not at a past instant.
        let queue = vec![
            in_progress("A", at(9, 0), 15),
            waiting("B", "09:00", 15),
        ];
        let view = project(&queue, at(9, 20));
        assert_eq!(view[1].eta, Some("09:20".to_string()));
    }

    #[test]
    fn no_patient_is_projected_before_their_own_slot() {
        let queue = vec![waiting("A", "09:00", 15), waiting("B", "11:00", 15)];
        let view = project(&queue, at(8, 0));
        // Room is idle from 09:15, but B still waits for their 11:00 slot.
        assert_eq!(view[1].eta, Some("11:00".to_string()));
    }

    #[test]
    fn projected_consultations_never_overlap() {
        let queue = vec![
            waiting("A", "09:00", 20),
            waiting("B", "09:05", 10),
            waiting("C", "09:10", 30),
            waiting("D", "09:15", 15),
        ];
        let view = project(&queue, at(9, 0));
        let waiting_view: Vec<&Appointment> = view
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .collect();
        for pair in waiting_view.windows(2) {
            let end_minutes = minutes(pair[0].eta.as_deref().unwrap())
                + pair[0].estimated_duration_minutes;
            let next_start = minutes(pair[1].eta.as_deref().unwrap());
            assert!(
                end_minutes <= next_start,
                "{} (ends {}m) overlaps {} (starts {}m)",
                pair[0].patient_name,
                end_minutes,
                pair[1].patient_name,
                next_start
            );
        }
    }

    #[test]
    fn projection_is_idempotent_for_a_fixed_instant() {
        let queue = vec![
            in_progress("A", at(9, 0), 15),
            waiting("B", "09:15", 15),
            waiting("C", "09:30", 20),
        ];
        let now = at(9, 10);
        let first = project(&queue, now);
        let second = project(&queue, now);
        assert_eq!(etas(&first), etas(&second));
        // The stored sequence is untouched.
        assert!(queue.iter().all(|a| a.eta.is_none()));
    }

    #[test]
    fn terminal_and_active_appointments_pass_through_unchanged() {
        let mut done = waiting("A", "08:00", 15);
        done.status = AppointmentStatus::Completed;
        done.eta = Some("08:00".to_string());
        let queue = vec![done, waiting("B", "09:00", 15)];
        let view = project(&queue, at(8, 30));
        assert_eq!(view[0].eta, Some("08:00".to_string()));
        assert_eq!(view[0].status, AppointmentStatus::Completed);
    }

    #[test]
    fn blank_scheduled_time_counts_as_midnight() {
        // A blank slot never holds the queue back; it is simply "whenever
        // the room frees up".
        let queue = vec![waiting("A", "", 15)];
        let view = project(&queue, at(9, 0));
        assert_eq!(view[0].eta, Some("09:00".to_string()));
    }

    fn minutes(eta: &str) -> i64 {
        let (h, m) = eta.split_once(':').unwrap();
        h.parse::<i64>().unwrap() * 60 + m.parse::<i64>().unwrap()
    }
}
