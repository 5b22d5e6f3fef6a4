//! Registry of connected app pages and the message channel to them.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CHANNEL_BUFFER_SIZE: usize = 16;

/// Messages broadcast from the background worker to every open page.
/// Tagged so pages can dispatch on `type` without knowing every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "SYNC_COMPLETE")]
    SyncComplete { success: bool },
}

struct Page {
    url: String,
    focused: bool,
    controlled: bool,
    tx: mpsc::Sender<ClientMessage>,
}

/// Tracks every open page of the app. Pages connect with a bounded
/// channel; broadcast is fan-out to all of them, and pages whose
/// receiver has gone away are dropped on the next broadcast.
#[derive(Default)]
pub struct ClientRegistry {
    pages: tokio::sync::Mutex<Vec<Page>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing page and hand back its message receiver.
    pub async fn connect(&self, url: &str) -> mpsc::Receiver<ClientMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        self.pages.lock().await.push(Page {
            url: url.to_string(),
            focused: false,
            controlled: false,
            tx,
        });
        rx
    }

    /// Open a fresh page at `url`. The new page takes focus from any
    /// page that had it.
    pub async fn open(&self, url: &str) -> mpsc::Receiver<ClientMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let mut pages = self.pages.lock().await;
        for page in pages.iter_mut() {
            page.focused = false;
        }
        pages.push(Page {
            url: url.to_string(),
            focused: true,
            controlled: true,
            tx,
        });
        rx
    }

    /// Bring the first page at `url` to the foreground. Returns false if
    /// no such page is open.
    pub async fn focus(&self, url: &str) -> bool {
        let mut pages = self.pages.lock().await;
        if !pages.iter().any(|p| p.url == url) {
            return false;
        }
        for page in pages.iter_mut() {
            page.focused = page.url == url;
        }
        true
    }

    /// Take control of all currently open pages, including ones that
    /// predate this worker.
    pub async fn claim(&self) {
        let mut pages = self.pages.lock().await;
        for page in pages.iter_mut() {
            page.controlled = true;
        }
        debug!(pages = pages.len(), "Claimed open pages");
    }

    /// Fan a message out to every connected page, then drop pages whose
    /// receiver is gone or has stopped draining. Sends never block: a
    /// page that let its buffer fill is treated as dead, so a stuck page
    /// cannot wedge the registry for everyone else.
    pub async fn broadcast(&self, message: &ClientMessage) {
        let mut pages = self.pages.lock().await;
        let before = pages.len();
        pages.retain(|page| page.tx.try_send(message.clone()).is_ok());
        if pages.len() < before {
            warn!(
                dropped = before - pages.len(),
                "Dropped unresponsive pages during broadcast"
            );
        }
    }

    pub async fn page_count(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn focused_url(&self) -> Option<String> {
        self.pages
            .lock()
            .await
            .iter()
            .find(|p| p.focused)
            .map(|p| p.url.clone())
    }
}
