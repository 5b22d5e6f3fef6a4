//! Generation lifecycle: install-time shell population and
//! activation-time eviction of superseded generations.

use reqwest::Url;
use tracing::{info, warn};

use crate::net::{Fetcher, PageRequest};

use super::{CacheError, CacheStore, Generation};

/// Fetch and store every application-shell URL into the given generation,
/// one URL at a time. A failure on a single URL is logged and skipped; it
/// never aborts the rest of the population. Returns the number of URLs
/// cached.
pub async fn populate_shell(
    generation: &Generation,
    shell_urls: &[Url],
    fetcher: &dyn Fetcher,
) -> usize {
    let mut cached = 0;
    for url in shell_urls {
        let request = PageRequest::get(url.clone());
        match fetcher.fetch(&request).await {
            Ok(response) if response.ok() => {
                match generation.store(&request.method, &request.url, &response) {
                    Ok(()) => cached += 1,
                    Err(e) => warn!(url = %url, error = %e, "Failed to store shell URL"),
                }
            }
            Ok(response) => {
                warn!(url = %url, status = response.status, "Skipping shell URL")
            }
            Err(e) => warn!(url = %url, error = %e, "Failed to fetch shell URL"),
        }
    }
    info!(
        generation = generation.name(),
        cached,
        total = shell_urls.len(),
        "Application shell populated"
    );
    cached
}

/// Delete every generation whose name matches none of the current names.
/// Returns the deleted names.
pub fn evict_stale(cache: &CacheStore, keep: &[String]) -> Result<Vec<String>, CacheError> {
    let mut deleted = Vec::new();
    for name in cache.generation_names()? {
        if !keep.contains(&name) {
            info!(generation = %name, "Deleting superseded cache generation");
            cache.delete_generation(&name)?;
            deleted.push(name);
        }
    }
    Ok(deleted)
}
