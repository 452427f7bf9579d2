use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

/// Single-slot, self-expiring user notification.
///
/// Raising a message replaces the current one and restarts the expiry timer.
/// The timer runs as its own task, so a message expires on schedule even
/// while an operation is in flight.
pub struct NotificationChannel {
    ttl: Duration,
    last_id: u64,
    current_tx: Arc<watch::Sender<Option<Notification>>>,
    expiry: Option<JoinHandle<()>>,
}

impl NotificationChannel {
    pub fn new(ttl: Duration) -> Self {
        let (current_tx, _) = watch::channel(None);
        Self {
            ttl,
            last_id: 0,
            current_tx: Arc::new(current_tx),
            expiry: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn raise(&mut self, message: impl Into<String>) -> Notification {
        self.cancel_expiry();

        self.last_id += 1;
        let notification = Notification {
            id: self.last_id,
            message: message.into(),
        };
        debug!(id = notification.id, message = %notification.message, "Raising notification");
        self.current_tx.send_replace(Some(notification.clone()));

        let current_tx = self.current_tx.clone();
        let (id, ttl) = (notification.id, self.ttl);
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            current_tx.send_if_modified(|current| {
                // Only the message this timer was started for may be cleared
                if current.as_ref().is_some_and(|n| n.id == id) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        }));

        notification
    }

    pub fn current(&self) -> Option<Notification> {
        self.current_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current_tx.subscribe()
    }

    fn cancel_expiry(&mut self) {
        if let Some(expiry) = self.expiry.take() {
            expiry.abort();
        }
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.cancel_expiry();
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("ttl", &self.ttl)
            .field("current", &self.current())
            .finish()
    }
}
