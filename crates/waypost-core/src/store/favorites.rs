//! Favorites collection, sibling of the submission queue in the same
//! database. The favorites pages themselves live outside this crate; the
//! records share the store's schema lifecycle.

use chrono::{DateTime, Utc};
use rusqlite::params;
use tracing::debug;

use crate::models::Story;

use super::{Database, StoreError};

/// A favorited story plus when it was favorited.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteStory {
    pub story: Story,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FavoriteStore {
    db: Database,
}

impl FavoriteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save a story as a favorite, stamping `favorited_at`. Re-adding an
    /// existing favorite refreshes the stamp.
    pub async fn add(&self, story: &Story) -> Result<(), StoreError> {
        let conn = self.db.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO favorite_stories
             (id, name, description, photo_url, created_at, lat, lon, favorited_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                story.id,
                story.name,
                story.description,
                story.photo_url,
                story.created_at,
                story.lat,
                story.lon,
                Utc::now(),
            ],
        )?;
        debug!(id = %story.id, "Story added to favorites");
        Ok(())
    }

    /// Delete by story id; removing a missing id is a no-op.
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.db.open()?;
        conn.execute("DELETE FROM favorite_stories WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// All favorites, in insertion order.
    pub async fn list(&self) -> Result<Vec<FavoriteStory>, StoreError> {
        let conn = self.db.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, photo_url, created_at, lat, lon, favorited_at
             FROM favorite_stories ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(FavoriteStory {
                story: Story {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    photo_url: row.get(3)?,
                    created_at: row.get(4)?,
                    lat: row.get(5)?,
                    lon: row.get(6)?,
                },
                favorited_at: row.get(7)?,
            })
        })?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(row?);
        }
        Ok(favorites)
    }

    pub async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.db.open()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorite_stories WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        let conn = self.db.open()?;
        conn.execute("DELETE FROM favorite_stories", [])?;
        Ok(())
    }
}
