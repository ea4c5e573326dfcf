use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::NotificationEvent;
use crate::services::sender::NotificationSender;

/// Drain the outbound notification channel, delivering each event through
/// the configured sender. Delivery failures are logged and dropped.
pub fn spawn_dispatcher(
    mut receiver: UnboundedReceiver<NotificationEvent>,
    sender: Arc<dyn NotificationSender>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("notification dispatcher started");
        while let Some(event) = receiver.recv().await {
            debug!(kind = ?event.kind, recipient = %event.recipient, "dispatching notification");
            if let Err(e) = sender.send(&event).await {
                warn!("notification delivery failed: {}", e);
            }
        }
        info!("notification channel closed, dispatcher stopping");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use crate::models::{NotificationChannel, NotificationKind};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct RecordingSender {
        delivered: Mutex<Vec<NotificationEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::DeliveryFailed {
                    recipient: event.recipient.clone(),
                    reason: "gateway unavailable".to_string(),
                });
            }
            self.delivered.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn event(kind: NotificationKind) -> NotificationEvent {
        NotificationEvent {
            recipient: "555-0100".to_string(),
            patient_name: "John Doe".to_string(),
            channel: NotificationChannel::Sms,
            kind,
            date: None,
            time: None,
            eta: None,
        }
    }

    #[tokio::test]
    async fn dispatcher_delivers_queued_events_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = Arc::new(RecordingSender {
            delivered: Mutex::new(Vec::new()),
            fail: false,
        });

        let handle = spawn_dispatcher(rx, sender.clone());

        tx.send(event(NotificationKind::Booked)).unwrap();
        tx.send(event(NotificationKind::CalledIn)).unwrap();
        drop(tx);
        handle.await.unwrap();

        let delivered = sender.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].kind, NotificationKind::Booked);
        assert_eq!(delivered[1].kind, NotificationKind::CalledIn);
    }

    #[tokio::test]
    async fn dispatcher_survives_delivery_failures() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = Arc::new(RecordingSender {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        });

        let handle = spawn_dispatcher(rx, sender.clone());

        tx.send(event(NotificationKind::Completed)).unwrap();
        drop(tx);

        // The worker must drain the channel and exit cleanly despite the error.
        handle.await.unwrap();
        assert!(sender.delivered.lock().unwrap().is_empty());
    }
}
