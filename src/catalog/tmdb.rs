use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CatalogClient, CatalogMovie};
use crate::{config::CatalogConfig, error::CatalogError};

/// TMDB v3 client authenticated with an `api_key` query parameter.
#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build catalog http client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "catalog request");
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(%status, "catalog request failed");
        return Err(CatalogError::Status {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn movie(&self, movie_id: i64) -> Result<CatalogMovie, CatalogError> {
        self.get(&format!("/movie/{movie_id}"), &[]).await
    }

    async fn popular(&self) -> Result<serde_json::Value, CatalogError> {
        self.get(
            "/discover/movie",
            &[
                ("include_adult", "false"),
                ("include_video", "false"),
                ("language", "en-US"),
                ("page", "1"),
                ("sort_by", "popularity.desc"),
            ],
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<serde_json::Value, CatalogError> {
        self.get("/search/movie", &[("query", query)]).await
    }
}
