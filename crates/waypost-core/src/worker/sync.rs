//! Background sync scheduling and the queue drain pass.

use std::collections::BTreeSet;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::api::StorySubmitter;
use crate::store::PendingStore;
use crate::worker::clients::{ClientMessage, ClientRegistry};

/// Tag under which queued story submissions are registered for replay.
pub const SYNC_STORIES_TAG: &str = "sync-stories";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    Online,
    Offline,
}

struct SchedulerState {
    tags: BTreeSet<String>,
    network: NetworkState,
}

/// Holds sync registrations until connectivity returns. Registration is
/// idempotent; a tag fires at most once per offline-to-online
/// transition.
pub struct SyncScheduler {
    state: Mutex<SchedulerState>,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                tags: BTreeSet::new(),
                network: NetworkState::Online,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Register `tag` for replay when connectivity returns. Registering
    /// an already-pending tag is a no-op.
    pub fn register(&self, tag: &str) {
        let mut state = self.lock();
        if state.tags.insert(tag.to_string()) {
            debug!(tag, "Registered sync tag");
        }
    }

    pub fn registered(&self, tag: &str) -> bool {
        self.lock().tags.contains(tag)
    }

    /// Record a connectivity change. On an offline-to-online transition
    /// the pending tags are drained and returned for dispatch; any other
    /// transition returns nothing.
    pub fn set_state(&self, network: NetworkState) -> Vec<String> {
        let mut state = self.lock();
        let was = state.network;
        state.network = network;
        if was == NetworkState::Offline && network == NetworkState::Online {
            let tags: Vec<String> = std::mem::take(&mut state.tags).into_iter().collect();
            if !tags.is_empty() {
                info!(count = tags.len(), "Connectivity restored, firing sync tags");
            }
            tags
        } else {
            Vec::new()
        }
    }
}

/// Drain the pending queue once, oldest first, and broadcast exactly one
/// completion message to the open pages.
///
/// A record leaves the queue only after the server accepts it; a failed
/// submission stays put, byte for byte, for the next pass. If the queue
/// itself cannot be read there is nothing to report and no message is
/// sent.
pub(crate) async fn run_sync_pass(
    pending: &PendingStore,
    submitter: &dyn StorySubmitter,
    clients: &ClientRegistry,
) {
    let records = match pending.list().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Could not read pending queue, skipping sync pass");
            return;
        }
    };

    let mut success = true;
    for record in records {
        let story = record.to_new_story();
        match submitter.submit_story(&record.token, &story).await {
            Ok(()) => {
                info!(id = record.id, "Synced pending story");
                if let Err(e) = pending.remove(record.id).await {
                    warn!(id = record.id, error = %e, "Synced story could not be dequeued");
                    success = false;
                }
            }
            Err(e) => {
                warn!(id = record.id, error = %e, "Pending story failed to sync, keeping it queued");
                success = false;
            }
        }
    }

    clients
        .broadcast(&ClientMessage::SyncComplete { success })
        .await;
}
