use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, error, info, warn};

use session_cell::SessionService;
use shared_models::appointment::{AppointmentRecord, AppointmentStatus};
use shared_models::auth::SessionSnapshot;
use shared_store::{subscribe_appointments, SnapshotEvent, StoreClient};

use crate::models::{AppointmentViews, LocalNotification};
use crate::services::notify::NotificationSink;

// ==============================================================================
// APPOINTMENT HUB
// ==============================================================================

struct MirrorState {
    records: Vec<AppointmentRecord>,
    synced_once: bool,
}

/// In-memory mirror of the appointments collection plus a broadcast feed for
/// live viewers. Only the sync driver writes here; everything the admin
/// surface reads comes out of this hub, never straight from the store.
pub struct AppointmentHub {
    mirror: RwLock<MirrorState>,
    degraded: AtomicBool,
    updates: broadcast::Sender<Vec<AppointmentRecord>>,
}

impl AppointmentHub {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(32);

        Self {
            mirror: RwLock::new(MirrorState {
                records: Vec::new(),
                synced_once: false,
            }),
            degraded: AtomicBool::new(false),
            updates,
        }
    }

    /// Replace the mirror with a fresh snapshot and fan it out to viewers.
    /// Returns the requests that are newly pending relative to the previous
    /// snapshot; the first snapshot of a subscription never reports any.
    pub async fn apply_snapshot(&self, next: Vec<AppointmentRecord>) -> Vec<AppointmentRecord> {
        let fresh = {
            let mut mirror = self.mirror.write().await;

            let fresh = if mirror.synced_once {
                newly_pending(&mirror.records, &next)
            } else {
                Vec::new()
            };

            mirror.records = next.clone();
            mirror.synced_once = true;
            fresh
        };

        self.degraded.store(false, Ordering::Relaxed);

        if self.updates.send(next).is_err() {
            debug!("No live viewers for snapshot update");
        }

        fresh
    }

    /// A delivery error leaves the last good snapshot in place.
    pub fn mark_degraded(&self, reason: &str) {
        self.degraded.store(true, Ordering::Relaxed);
        error!("Appointment feed degraded: {}", reason);
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Forget everything, for when the administrator session goes away.
    pub async fn clear(&self) {
        {
            let mut mirror = self.mirror.write().await;
            mirror.records.clear();
            mirror.synced_once = false;
        }

        self.degraded.store(false, Ordering::Relaxed);

        if self.updates.send(Vec::new()).is_err() {
            debug!("No live viewers for mirror reset");
        }
    }

    pub async fn all(&self) -> Vec<AppointmentRecord> {
        self.mirror.read().await.records.clone()
    }

    pub async fn by_status(&self, status: AppointmentStatus) -> Vec<AppointmentRecord> {
        self.mirror
            .read()
            .await
            .records
            .iter()
            .filter(|record| record.status == status)
            .cloned()
            .collect()
    }

    pub async fn views(&self) -> AppointmentViews {
        AppointmentViews::partition(&self.mirror.read().await.records)
    }

    pub async fn find(&self, appointment_id: &str) -> Option<AppointmentRecord> {
        self.mirror
            .read()
            .await
            .records
            .iter()
            .find(|record| record.id == appointment_id)
            .cloned()
    }

    /// Whether at least one snapshot has been applied since the last clear.
    pub async fn is_live(&self) -> bool {
        self.mirror.read().await.synced_once
    }

    pub fn subscribe_updates(&self) -> broadcast::Receiver<Vec<AppointmentRecord>> {
        self.updates.subscribe()
    }
}

impl Default for AppointmentHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests pending in `next` whose ids were absent from `prev`. Status
/// flips on already-known documents never count.
pub fn newly_pending(
    prev: &[AppointmentRecord],
    next: &[AppointmentRecord],
) -> Vec<AppointmentRecord> {
    let known: HashSet<&str> = prev.iter().map(|record| record.id.as_str()).collect();

    next.iter()
        .filter(|record| record.is_pending() && !known.contains(record.id.as_str()))
        .cloned()
        .collect()
}

// ==============================================================================
// LIST SYNC DRIVER
// ==============================================================================

/// Keeps the hub in sync with the store for as long as the process session
/// is the administrator. A non-admin session means no subscription and an
/// empty mirror.
pub struct ListSyncService {
    store: Arc<StoreClient>,
    session: Arc<SessionService>,
    hub: Arc<AppointmentHub>,
    notifier: Arc<dyn NotificationSink>,
    poll_interval: Duration,
}

impl ListSyncService {
    pub fn new(
        store: Arc<StoreClient>,
        session: Arc<SessionService>,
        hub: Arc<AppointmentHub>,
        notifier: Arc<dyn NotificationSink>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            session,
            hub,
            notifier,
            poll_interval,
        }
    }

    /// Drive the mirror for the lifetime of the process.
    pub async fn run(self) {
        let mut session_updates = self.session.subscribe();

        loop {
            let is_admin = session_updates.borrow_and_update().is_admin;

            if is_admin {
                self.run_subscription(&mut session_updates).await;
            } else if session_updates.changed().await.is_err() {
                break;
            }
        }

        debug!("Session service gone, list sync stopping");
    }

    /// One subscription lifetime: from administrator confirmed to the next
    /// identity change or stream end. Dropping the subscription on the way
    /// out is the unsubscribe.
    async fn run_subscription(&self, session_updates: &mut watch::Receiver<SessionSnapshot>) {
        let Some(auth_token) = self.session.auth_token().await else {
            warn!("Administrator session has no token, waiting for the next identity change");
            let _ = session_updates.changed().await;
            return;
        };

        if !self.notifier.request_permission().await {
            warn!("Notification permission denied, new-request alerts will be dropped");
        }

        info!("Administrator session active, subscribing to appointment snapshots");

        let mut subscription =
            subscribe_appointments(Arc::clone(&self.store), auth_token, self.poll_interval);

        loop {
            tokio::select! {
                event = subscription.next_event() => match event {
                    Some(SnapshotEvent::Snapshot(records)) => {
                        debug!("Applying snapshot with {} records", records.len());

                        let fresh = self.hub.apply_snapshot(records).await;
                        for record in fresh {
                            self.notifier.raise(LocalNotification::new_request(&record)).await;
                        }
                    }
                    Some(SnapshotEvent::Error(reason)) => {
                        self.hub.mark_degraded(&reason);
                    }
                    None => {
                        warn!("Snapshot stream ended unexpectedly");
                        return;
                    }
                },
                changed = session_updates.changed() => {
                    if changed.is_err() {
                        return;
                    }

                    if !session_updates.borrow().is_admin {
                        info!("Administrator session revoked, closing subscription");
                        self.hub.clear().await;
                    }

                    // Either way the token may have rotated; resubscribe or
                    // stop from the outer loop.
                    return;
                }
            }
        }
    }
}
