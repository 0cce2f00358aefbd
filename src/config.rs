use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Upper bound on in-flight catalog lookups per watchlist read.
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_DSN"))
            .context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60 * 24),
        };
        anyhow::ensure!(!jwt.secret.is_empty(), "JWT_SECRET must not be empty");

        let catalog = CatalogConfig {
            base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".into()),
            api_key: std::env::var("TMDB_KEY").context("TMDB_KEY must be set")?,
            timeout_secs: parse_or("CATALOG_TIMEOUT_SECS", 10),
            max_concurrency: parse_or("CATALOG_MAX_CONCURRENCY", 8).max(1),
        };
        Ok(Self {
            database_url,
            jwt,
            catalog,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
