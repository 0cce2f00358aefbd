use serde::{Deserialize, Serialize};

use super::repo_types::WatchlistEntry;
use crate::catalog::CatalogMovie;

#[derive(Debug, Deserialize)]
pub struct AddWatchlistRequest {
    pub movie_id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_rating: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWatchlistRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_rating: i32,
}

/// A stored entry merged with its catalog metadata. Lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistItem {
    pub movie: CatalogMovie,
    pub status: String,
    pub user_rating: i32,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<WatchlistItem>,
}

#[derive(Debug, Serialize)]
pub struct AddWatchlistResponse {
    pub watchlist_item: WatchlistEntry,
}
