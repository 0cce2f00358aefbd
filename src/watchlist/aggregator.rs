use std::sync::{Arc, Mutex, PoisonError};

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, warn};

use super::{dto::WatchlistItem, repo_types::WatchlistEntry};
use crate::catalog::CatalogClient;

/// Enriches stored rows with catalog metadata.
///
/// One task is spawned per row, but at most `max_concurrency` lookups are in
/// flight at once. A row whose lookup fails is left out of the result; the
/// call itself never fails. Output order follows completion order, not input
/// order.
pub async fn aggregate(
    catalog: Arc<dyn CatalogClient>,
    entries: Vec<WatchlistEntry>,
    max_concurrency: usize,
) -> Vec<WatchlistItem> {
    let requested = entries.len();
    let results = Arc::new(Mutex::new(Vec::with_capacity(requested)));
    let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for entry in entries {
        let catalog = Arc::clone(&catalog);
        let results = Arc::clone(&results);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            match catalog.movie(entry.movie_id).await {
                Ok(movie) => {
                    let item = WatchlistItem {
                        movie,
                        status: entry.status,
                        user_rating: entry.user_rating,
                    };
                    results
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(item);
                }
                Err(e) => {
                    warn!(error = %e, movie_id = entry.movie_id, "catalog lookup failed; entry dropped");
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "catalog lookup task did not finish");
        }
    }

    let items = std::mem::take(&mut *results.lock().unwrap_or_else(PoisonError::into_inner));
    debug!(requested, enriched = items.len(), "watchlist aggregated");
    items
}
