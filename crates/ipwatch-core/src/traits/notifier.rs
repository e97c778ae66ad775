// # Notifier Trait
//
// Defines the interface for delivering push notifications.
//
// ## Implementations
//
// - ntfy: `ipwatch-notify-ntfy` crate

use async_trait::async_trait;

use crate::notification::Notification;

/// Trait for push notification delivery
///
/// Delivery failures are never fatal to a run. Callers use [`Notifier::send`],
/// which reports the failure and returns `false`; implementations only provide
/// [`Notifier::deliver`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The endpoint accepted the message (2xx)
    /// - `Err(Error)`: Transport failure or non-2xx response
    async fn deliver(&self, notification: &Notification) -> Result<(), crate::Error>;

    /// Name used in logs (e.g. "ntfy")
    fn notifier_name(&self) -> &'static str;

    /// Deliver and report, never failing
    ///
    /// Returns `true` if the notification was delivered.
    async fn send(&self, notification: &Notification) -> bool {
        match self.deliver(notification).await {
            Ok(()) => {
                tracing::info!("Notification sent: {}", notification.title);
                true
            }
            Err(e) => {
                tracing::error!(
                    "Failed to send notification via {}: {}",
                    self.notifier_name(),
                    e
                );
                false
            }
        }
    }
}
