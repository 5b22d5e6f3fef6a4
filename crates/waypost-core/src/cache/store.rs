use std::path::PathBuf;

use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::net::FetchedResponse;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry unreadable: {0}")]
    Entry(#[from] serde_json::Error),
}

/// A stored response snapshot. `stored_at` is metadata only; entries are
/// never expired by age, only by generation eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn snapshot(response: &FetchedResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self) -> FetchedResponse {
        FetchedResponse {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Bodies are binary; JSON entries carry them base64-encoded.
mod body_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// Root of all cache generations on disk.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open a generation by name, creating its directory on first use.
    pub fn open_generation(&self, name: &str) -> Result<Generation, CacheError> {
        let dir = self.root.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(Generation {
            name: name.to_string(),
            dir,
        })
    }

    /// Names of every generation currently on disk.
    pub fn generation_names(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a generation and all its entries.
    pub fn delete_generation(&self, name: &str) -> Result<(), CacheError> {
        let dir = self.root.join(name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}

/// One named, versioned collection of cached entries, keyed by
/// (method, absolute URL).
pub struct Generation {
    name: String,
    dir: PathBuf,
}

impl Generation {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, method: &Method, url: &Url) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(method.as_str().as_bytes());
        hasher.update(b" ");
        hasher.update(url.as_str().as_bytes());
        self.dir.join(format!("{}.json", hex::encode(hasher.finalize())))
    }

    pub fn lookup(&self, method: &Method, url: &Url) -> Result<Option<CachedResponse>, CacheError> {
        let path = self.entry_path(method, url);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Store a snapshot for the key. A later store for the same key
    /// overwrites in one write, so concurrent writers converge on the
    /// last writer.
    pub fn store(
        &self,
        method: &Method,
        url: &Url,
        response: &FetchedResponse,
    ) -> Result<(), CacheError> {
        let snapshot = CachedResponse::snapshot(response);
        let contents = serde_json::to_string(&snapshot)?;
        std::fs::write(self.entry_path(method, url), contents)?;
        debug!(generation = %self.name, url = %url, "Cached response");
        Ok(())
    }

    pub fn contains(&self, method: &Method, url: &Url) -> bool {
        self.entry_path(method, url).exists()
    }
}
