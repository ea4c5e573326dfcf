use crate::models::{NotificationEvent, NotificationKind};

const BOOKED_TEMPLATE: &str =
    "Hello {name}, your appointment at {clinic} is confirmed for {time} on {date}. See you soon!";
const CALLED_IN_TEMPLATE: &str =
    "Hi {name}, the doctor is ready to see you now. Please proceed to the consultation room.";
const COMPLETED_TEMPLATE: &str =
    "Thank you for visiting {clinic}, {name}. We've updated your medical records. Take care!";
const ETA_UPDATED_TEMPLATE: &str =
    "Wait time update: Your estimated consultation time at {clinic} is now {eta}.";

/// Render the patient-facing message body for an event.
pub fn render_message(event: &NotificationEvent, clinic_name: &str) -> String {
    let template = match event.kind {
        NotificationKind::Booked => BOOKED_TEMPLATE,
        NotificationKind::CalledIn => CALLED_IN_TEMPLATE,
        NotificationKind::Completed => COMPLETED_TEMPLATE,
        NotificationKind::EtaUpdated => ETA_UPDATED_TEMPLATE,
    };

    template
        .replace("{name}", &event.patient_name)
        .replace("{clinic}", clinic_name)
        .replace("{date}", event.date.as_deref().unwrap_or(""))
        .replace("{time}", event.time.as_deref().unwrap_or(""))
        .replace("{eta}", event.eta.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationChannel;

    fn event(kind: NotificationKind) -> NotificationEvent {
        NotificationEvent {
            recipient: "555-0100".to_string(),
            patient_name: "John Doe".to_string(),
            channel: NotificationChannel::Sms,
            kind,
            date: Some("2026-08-07".to_string()),
            time: Some("10:00".to_string()),
            eta: Some("10:25".to_string()),
        }
    }

    #[test]
    fn booked_message_carries_time_and_date() {
        let message = render_message(&event(NotificationKind::Booked), "Wellness Family Clinic");
        assert_eq!(
            message,
            "Hello John Doe, your appointment at Wellness Family Clinic is confirmed for 10:00 on 2026-08-07. See you soon!"
        );
    }

    #[test]
    fn eta_update_message_carries_new_eta() {
        let message = render_message(&event(NotificationKind::EtaUpdated), "Wellness Family Clinic");
        assert!(message.contains("is now 10:25"));
    }

    #[test]
    fn missing_data_fields_render_as_empty() {
        let mut ev = event(NotificationKind::EtaUpdated);
        ev.eta = None;
        let message = render_message(&ev, "Wellness Family Clinic");
        assert!(message.ends_with("is now ."));
    }
}
