use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, instrument};

use crate::{
    error::{bad_request, Rejection},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[instrument(skip(state))]
pub async fn popular(State(state): State<AppState>) -> Result<Json<serde_json::Value>, Rejection> {
    let listing = state.catalog.popular().await.map_err(|e| {
        error!(error = %e, "popular listing failed");
        Rejection::from(e)
    })?;
    Ok(Json(listing))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, Rejection> {
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(bad_request("Query parameter is required"));
    }
    let listing = state.catalog.search(query).await.map_err(|e| {
        error!(error = %e, %query, "search failed");
        Rejection::from(e)
    })?;
    Ok(Json(listing))
}
