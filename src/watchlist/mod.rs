use axum::{middleware, routing::get, Router};

use crate::{auth::extractors::auth_gate, state::AppState};

pub mod aggregator;
mod dto;
pub mod handlers;
pub mod repo_types;

/// Watchlist routes, all behind the auth gate.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/v1/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/v1/watchlist/:movie_id",
            axum::routing::patch(handlers::update_watchlist_item)
                .delete(handlers::delete_watchlist_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_gate))
}
