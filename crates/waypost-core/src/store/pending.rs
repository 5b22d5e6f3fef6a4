//! The offline mutation queue over the durable store.

use chrono::Utc;
use rusqlite::params;
use tracing::debug;

use crate::models::{NewPendingStory, PendingStory};

use super::{Database, StoreError};

/// Queue of create-story submissions made while offline. FIFO by
/// store-assigned id; records leave the queue only through `remove`.
#[derive(Debug, Clone)]
pub struct PendingStore {
    db: Database,
}

impl PendingStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a submission, assigning its identity and timestamp.
    pub async fn enqueue(&self, story: NewPendingStory) -> Result<i64, StoreError> {
        let conn = self.db.open()?;
        conn.execute(
            "INSERT INTO pending_stories (description, photo, lat, lon, token, created_at, synced)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![
                story.description,
                story.photo,
                story.lat,
                story.lon,
                story.token,
                Utc::now(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "Story queued for background sync");
        Ok(id)
    }

    /// All queued submissions, in insertion order.
    pub async fn list(&self) -> Result<Vec<PendingStory>, StoreError> {
        let conn = self.db.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, photo, lat, lon, token, created_at, synced
             FROM pending_stories ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PendingStory {
                id: row.get(0)?,
                description: row.get(1)?,
                photo: row.get(2)?,
                lat: row.get(3)?,
                lon: row.get(4)?,
                token: row.get(5)?,
                created_at: row.get(6)?,
                synced: row.get(7)?,
            })
        })?;

        let mut stories = Vec::new();
        for row in rows {
            stories.push(row?);
        }
        Ok(stories)
    }

    /// Delete one record. Removing an id that is already gone is a no-op.
    pub async fn remove(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.db.open()?;
        let deleted = conn.execute("DELETE FROM pending_stories WHERE id = ?1", params![id])?;
        if deleted == 0 {
            debug!(id, "Pending story already removed");
        }
        Ok(())
    }

    /// Empty the queue.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let conn = self.db.open()?;
        conn.execute("DELETE FROM pending_stories", [])?;
        Ok(())
    }
}
