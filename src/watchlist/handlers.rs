use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::{
    aggregator::aggregate,
    dto::{AddWatchlistRequest, AddWatchlistResponse, UpdateWatchlistRequest, WatchlistResponse},
};
use crate::{
    auth::extractors::AuthUser,
    db::{with_deadline, READ_DEADLINE, WRITE_DEADLINE},
    error::{bad_request, Rejection},
    state::AppState,
};

fn movie_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, Rejection> {
    path.map(|Path(id)| id)
        .map_err(|_| bad_request("Invalid movie_id"))
}

fn store_failure(e: crate::error::StoreError) -> Rejection {
    error!(error = %e, "watchlist store call failed");
    e.into()
}

#[instrument(skip(state))]
pub async fn get_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WatchlistResponse>, Rejection> {
    let entries = with_deadline(READ_DEADLINE, state.store.list_entries(user_id))
        .await
        .map_err(store_failure)?;

    let watchlist = aggregate(
        Arc::clone(&state.catalog),
        entries,
        state.config.catalog.max_concurrency,
    )
    .await;
    Ok(Json(WatchlistResponse { watchlist }))
}

#[instrument(skip(state, payload))]
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AddWatchlistRequest>, JsonRejection>,
) -> Result<Json<AddWatchlistResponse>, Rejection> {
    let Json(req) = payload.map_err(|_| bad_request("Invalid JSON"))?;
    let entry = with_deadline(
        WRITE_DEADLINE,
        state
            .store
            .add_entry(user_id, req.movie_id, &req.status, req.user_rating),
    )
    .await
    .map_err(store_failure)?;

    info!(user_id, movie_id = entry.movie_id, "added to watchlist");
    Ok(Json(AddWatchlistResponse {
        watchlist_item: entry,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_watchlist_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateWatchlistRequest>, JsonRejection>,
) -> Result<StatusCode, Rejection> {
    let movie_id = movie_id(path)?;
    let Json(req) = payload.map_err(|_| bad_request("Invalid JSON"))?;
    with_deadline(
        WRITE_DEADLINE,
        state
            .store
            .update_entry(user_id, movie_id, &req.status, req.user_rating),
    )
    .await
    .map_err(store_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_watchlist_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, Rejection> {
    let movie_id = movie_id(path)?;
    with_deadline(WRITE_DEADLINE, state.store.delete_entry(user_id, movie_id))
        .await
        .map_err(store_failure)?;
    info!(user_id, movie_id, "removed from watchlist");
    Ok(StatusCode::NO_CONTENT)
}
