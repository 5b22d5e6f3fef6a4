//! Story submission with offline queueing.
//!
//! The submit flow tries the network first and falls back to the durable
//! queue only for network-class failures. A server that was reached and
//! said no is a real answer; queueing it would just replay the rejection.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::api::StorySubmitter;
use crate::models::{NewPendingStory, NewStory};
use crate::store::PendingStore;
use crate::worker::{SyncScheduler, SYNC_STORIES_TAG};

/// What happened to a submitted story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The server accepted it
    Delivered,
    /// The server was unreachable; the story is queued under this id
    Queued { id: i64 },
}

pub struct StoryService {
    submitter: Arc<dyn StorySubmitter>,
    pending: PendingStore,
    scheduler: Arc<SyncScheduler>,
}

impl StoryService {
    pub fn new(
        submitter: Arc<dyn StorySubmitter>,
        pending: PendingStore,
        scheduler: Arc<SyncScheduler>,
    ) -> Self {
        Self {
            submitter,
            pending,
            scheduler,
        }
    }

    /// Submit a story, queueing it for background sync if the server is
    /// unreachable. If the queue write itself fails the submission is
    /// lost and the caller must hear about it.
    pub async fn submit(&self, token: &str, story: NewStory) -> Result<Submission> {
        match self.submitter.submit_story(token, &story).await {
            Ok(()) => Ok(Submission::Delivered),
            Err(e) if e.is_network() => {
                warn!(error = %e, "Server unreachable, queueing story for sync");
                let record = NewPendingStory::from_story(&story, token);
                let id = self.pending.enqueue(record).await?;
                self.scheduler.register(SYNC_STORIES_TAG);
                info!(id, "Story queued for background sync");
                Ok(Submission::Queued { id })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use crate::testing::ScriptedSubmitter;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> (StoryService, Arc<ScriptedSubmitter>, PendingStore) {
        let db = Database::new(dir.path().join("waypost.db"));
        let pending = PendingStore::new(db);
        let submitter = Arc::new(ScriptedSubmitter::new());
        let service = StoryService::new(
            submitter.clone(),
            pending.clone(),
            Arc::new(SyncScheduler::new()),
        );
        (service, submitter, pending)
    }

    fn story(description: &str) -> NewStory {
        NewStory {
            description: description.to_string(),
            photo: vec![0xDE, 0xAD],
            lat: None,
            lon: None,
        }
    }

    #[tokio::test]
    async fn test_online_submission_is_delivered_not_queued() {
        let dir = TempDir::new().unwrap();
        let (service, submitter, pending) = service(&dir);

        let result = service.submit("tok", story("hello")).await.unwrap();
        assert_eq!(result, Submission::Delivered);
        assert_eq!(submitter.accepted().len(), 1);
        assert!(pending.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_queues_with_payload_and_tag() {
        let dir = TempDir::new().unwrap();
        let (service, submitter, pending) = service(&dir);
        submitter.set_offline(true);

        let result = service.submit("tok", story("offline post")).await.unwrap();
        let Submission::Queued { id } = result else {
            panic!("expected a queued submission");
        };

        let records = pending.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].description, "offline post");
        assert_eq!(records[0].photo, vec![0xDE, 0xAD]);
        assert_eq!(records[0].token, "tok");
        assert!(service.scheduler.registered(SYNC_STORIES_TAG));
    }

    #[tokio::test]
    async fn test_server_rejection_propagates_without_queueing() {
        let dir = TempDir::new().unwrap();
        let (service, submitter, pending) = service(&dir);
        submitter.reject_on("too big");

        let err = service.submit("tok", story("too big")).await.unwrap_err();
        assert!(err.to_string().contains("photo too large"));
        assert!(pending.list().await.unwrap().is_empty());
        assert!(!service.scheduler.registered(SYNC_STORIES_TAG));
    }

    #[tokio::test]
    async fn test_unwritable_queue_surfaces_the_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the database file should be makes every
        // queue write fail
        std::fs::create_dir(dir.path().join("waypost.db")).unwrap();
        let pending = PendingStore::new(Database::new(dir.path().join("waypost.db")));
        let submitter = Arc::new(ScriptedSubmitter::new());
        submitter.set_offline(true);
        let service = StoryService::new(
            submitter,
            pending,
            Arc::new(SyncScheduler::new()),
        );

        assert!(service.submit("tok", story("lost")).await.is_err());
    }
}
