use async_trait::async_trait;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::{error::CatalogError, state::AppState};

pub mod handlers;
pub mod tmdb;

pub use tmdb::TmdbClient;

/// Movie metadata as served by the catalog's lookup-by-id endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
}

/// Read-only movie catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn movie(&self, movie_id: i64) -> Result<CatalogMovie, CatalogError>;
    /// Raw popular listing, passed through to clients as-is.
    async fn popular(&self) -> Result<serde_json::Value, CatalogError>;
    async fn search(&self, query: &str) -> Result<serde_json::Value, CatalogError>;
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/discover/popular", get(handlers::popular))
        .route("/v1/discover/search", get(handlers::search))
}
