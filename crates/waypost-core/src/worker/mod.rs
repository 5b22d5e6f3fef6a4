//! The background worker: one dispatcher owning the caches, the pending
//! queue, and the page registry, with one handler per lifecycle event.

pub mod clients;
pub mod push;
pub mod sync;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use clients::{ClientMessage, ClientRegistry};
pub use push::{
    ClickAction, Notification, NotificationClick, NotificationSink, PushPayload,
};
pub use sync::{NetworkState, SyncScheduler, SYNC_STORIES_TAG};

use crate::api::StorySubmitter;
use crate::cache::{
    cache_first, evict_stale, network_first, populate_shell, CacheStore, FetchStrategy,
    ResponseSource,
};
use crate::config::Config;
use crate::net::{FetchError, FetchedResponse, Fetcher, PageRequest};
use crate::store::PendingStore;
use crate::worker::push::parse_push_payload;

/// Dispatches install, activate, fetch, sync, push, and connectivity
/// events. Each handler is independent; the worker holds no per-request
/// state.
pub struct Worker {
    config: Config,
    cache: CacheStore,
    pending: PendingStore,
    submitter: Arc<dyn StorySubmitter>,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<ClientRegistry>,
    scheduler: Arc<SyncScheduler>,
    notifications: Arc<dyn NotificationSink>,
}

impl Worker {
    pub fn new(
        config: Config,
        cache: CacheStore,
        pending: PendingStore,
        submitter: Arc<dyn StorySubmitter>,
        fetcher: Arc<dyn Fetcher>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            cache,
            pending,
            submitter,
            fetcher,
            clients: Arc::new(ClientRegistry::new()),
            scheduler: Arc::new(SyncScheduler::new()),
            notifications,
        }
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    /// Install: warm the shell cache generation for the configured
    /// version. Returns how many shell URLs were cached.
    pub async fn handle_install(&self) -> anyhow::Result<usize> {
        let generation = self.cache.open_generation(&self.config.shell_cache_name())?;
        let urls = self.config.shell_url_list()?;
        let cached = populate_shell(&generation, &urls, self.fetcher.as_ref()).await;
        info!(
            generation = generation.name(),
            cached, "Install complete, activating immediately"
        );
        Ok(cached)
    }

    /// Activate: delete every cache generation the current version does
    /// not use, then take control of the open pages. Returns the deleted
    /// generation names.
    pub async fn handle_activate(&self) -> anyhow::Result<Vec<String>> {
        let keep = [self.config.shell_cache_name(), self.config.data_cache_name()];
        let deleted = evict_stale(&self.cache, &keep)?;
        self.clients.claim().await;
        Ok(deleted)
    }

    /// Fetch: route an intercepted request through the strategy its URL
    /// selects. If the cache layer itself is unusable the request goes
    /// straight to the network rather than failing.
    pub async fn handle_fetch(
        &self,
        request: &PageRequest,
    ) -> Result<(FetchedResponse, ResponseSource), FetchError> {
        let strategy = FetchStrategy::select(request, &self.config);
        let generation_name = match strategy {
            FetchStrategy::Passthrough => {
                let response = self.fetcher.fetch(request).await?;
                return Ok((response, ResponseSource::Network));
            }
            FetchStrategy::NetworkFirst => self.config.data_cache_name(),
            FetchStrategy::CacheFirst => self.config.shell_cache_name(),
        };

        let generation = match self.cache.open_generation(&generation_name) {
            Ok(generation) => generation,
            Err(e) => {
                warn!(error = %e, "Cache unavailable, passing request through");
                let response = self.fetcher.fetch(request).await?;
                return Ok((response, ResponseSource::Network));
            }
        };

        if strategy == FetchStrategy::NetworkFirst {
            network_first(&generation, self.fetcher.as_ref(), request).await
        } else {
            cache_first(&generation, self.fetcher.as_ref(), request).await
        }
    }

    /// Sync: drain the pending queue for a recognized tag.
    pub async fn handle_sync(&self, tag: &str) {
        if tag != SYNC_STORIES_TAG {
            debug!(tag, "Ignoring unrecognized sync tag");
            return;
        }
        sync::run_sync_pass(&self.pending, self.submitter.as_ref(), &self.clients).await;
    }

    /// Connectivity change: fire whatever sync tags the transition
    /// released.
    pub async fn handle_connectivity(&self, state: NetworkState) {
        for tag in self.scheduler.set_state(state) {
            self.handle_sync(&tag).await;
        }
    }

    /// Push: parse the payload and display a notification. A sink
    /// rejection is logged and dropped; pushes are best-effort.
    pub async fn handle_push(&self, data: Option<&[u8]>) {
        let notification = Notification::from_payload(parse_push_payload(data));
        if let Err(e) = self.notifications.show(&notification).await {
            warn!(error = %e, "Notification not shown");
        }
    }

    /// Notification click: focus an open page at the target URL, or open
    /// a new one.
    pub async fn handle_notification_click(&self, click: NotificationClick) {
        if click.action == ClickAction::Dismiss {
            return;
        }
        let url = &click.notification.click_url;
        if !self.clients.focus(url).await {
            // Registry keeps its own sender; the page side of the channel
            // is the opener's concern
            drop(self.clients.open(url).await);
        }
    }
}
