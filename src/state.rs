use std::sync::Arc;

use anyhow::Context;

use crate::auth::policy::AdminPolicy;
use crate::config::AppConfig;
use crate::providers::{Fetcher, HttpFetcher};
use crate::session::SessionStore;
use crate::store::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub fetcher: Arc<dyn Fetcher>,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
    pub policy: AdminPolicy,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }

        Ok(Self::from_parts(
            Arc::new(PgStore::new(db)),
            Arc::new(HttpFetcher::new()),
            config,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn Store>,
        fetcher: Arc<dyn Fetcher>,
        config: Arc<AppConfig>,
    ) -> Self {
        let policy = AdminPolicy::from_config(&config);
        Self {
            store,
            fetcher,
            sessions: SessionStore::new(),
            config,
            policy,
        }
    }

}
