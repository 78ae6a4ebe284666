use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use shared_models::appointment::AppointmentRecord;

use crate::client::StoreClient;

/// One event on the snapshot stream: a fresh copy of the whole collection,
/// or a delivery error. An error does not end the stream; the next interval
/// polls again.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    Snapshot(Vec<AppointmentRecord>),
    Error(String),
}

/// A live subscription to the appointments collection. Dropping it cancels
/// the underlying poll task, which is the unsubscribe.
pub struct AppointmentSubscription {
    events: mpsc::Receiver<SnapshotEvent>,
    poll_task: JoinHandle<()>,
}

impl AppointmentSubscription {
    /// Next snapshot or error. `None` means the stream has ended.
    pub async fn next_event(&mut self) -> Option<SnapshotEvent> {
        self.events.recv().await
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for AppointmentSubscription {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

/// Watch the whole collection on behalf of `auth_token`. The first snapshot
/// is fetched immediately, then every `poll_interval`.
pub fn subscribe_appointments(
    store: Arc<StoreClient>,
    auth_token: String,
    poll_interval: Duration,
) -> AppointmentSubscription {
    let (events_tx, events_rx) = mpsc::channel(8);

    let poll_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let event = match store.fetch_appointments(&auth_token).await {
                Ok(records) => SnapshotEvent::Snapshot(records),
                Err(e) => {
                    warn!("Snapshot poll failed: {}", e);
                    SnapshotEvent::Error(e.to_string())
                }
            };

            if events_tx.send(event).await.is_err() {
                debug!("Snapshot receiver dropped, ending poll loop");
                break;
            }
        }
    });

    AppointmentSubscription {
        events: events_rx,
        poll_task,
    }
}
