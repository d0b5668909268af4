// Transient notifications
use crate::application::ports::HostEnvironment;
use crate::domain::ui_state::{Notification, NotificationKind};
use std::sync::Arc;
use std::time::Duration;

pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

pub struct Notifier {
    host: Arc<dyn HostEnvironment>,
    ttl: Duration,
    next_id: u64,
}

impl Notifier {
    pub fn new(host: Arc<dyn HostEnvironment>, ttl: Duration) -> Self {
        Self {
            host,
            ttl,
            next_id: 0,
        }
    }

    /// Show now, dismiss after the ttl
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            message: message.into(),
            kind,
        };
        self.host.show_notification(&notification);

        let host = self.host.clone();
        let ttl = self.ttl;
        let id = notification.id;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            host.dismiss_notification(id);
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingHost;

    #[tokio::test(start_paused = true)]
    async fn test_notification_dismissed_after_ttl() {
        let host = Arc::new(RecordingHost::default());
        let mut notifier = Notifier::new(host.clone(), NOTIFICATION_TTL);

        let id = notifier.notify("Exported data to export.csv", NotificationKind::Success);
        assert_eq!(host.notifications().len(), 1);
        assert_eq!(host.notifications()[0].kind, NotificationKind::Success);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(host.dismissed().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(host.dismissed(), vec![id]);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let host = Arc::new(RecordingHost::default());
        let mut notifier = Notifier::new(host, NOTIFICATION_TTL);
        let first = notifier.notify("a", NotificationKind::Info);
        let second = notifier.notify("b", NotificationKind::Error);
        assert_ne!(first, second);
    }
}
