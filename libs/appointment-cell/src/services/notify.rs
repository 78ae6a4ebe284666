use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::LocalNotification;

const RECENT_CAPACITY: usize = 50;

/// Where new-request notifications land. The default sink records them and
/// emits structured log events; a desktop or push integration would replace
/// it at composition time.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Best-effort permission request. `false` means later raises are
    /// dropped silently.
    async fn request_permission(&self) -> bool;

    async fn raise(&self, notification: LocalNotification);
}

/// Default sink: keeps the most recent notifications, newest first, for the
/// admin surface to list.
pub struct RecordingNotifier {
    recent: RwLock<VecDeque<LocalNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            recent: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn recent(&self) -> Vec<LocalNotification> {
        self.recent.read().await.iter().cloned().collect()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn request_permission(&self) -> bool {
        debug!("Notification permission granted");
        true
    }

    async fn raise(&self, notification: LocalNotification) {
        info!(
            title = %notification.title,
            body = %notification.body,
            "Local notification raised"
        );

        let mut recent = self.recent.write().await;
        recent.push_front(notification);
        recent.truncate(RECENT_CAPACITY);
    }
}
