use std::sync::Arc;

use crate::{
    catalog::{CatalogClient, TmdbClient},
    config::AppConfig,
    db::{CredentialStore, PgStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CredentialStore>,
    pub catalog: Arc<dyn CatalogClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = PgStore::connect(&config.database_url).await?;
        store.migrate().await;

        let catalog = Arc::new(TmdbClient::new(&config.catalog)?) as Arc<dyn CatalogClient>;

        Ok(Self::from_parts(config, Arc::new(store), catalog))
    }

    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            catalog,
        }
    }
}
