use std::sync::Arc;

use cms_catalog::Catalog;
use cms_persistence::{EventManager, TimestampSubscriber};

use crate::app::csrf::CsrfTokens;
use crate::app::render::{JsonRenderer, Renderer};
use crate::app::response::Responder;
use crate::app::routing::RouteTable;
use crate::config::AppConfig;

/// Everything handlers need, injected as an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Catalog,
    pub csrf: CsrfTokens,
    pub responder: Responder,
    pub default_page_size: u32,
}

impl AppServices {
    pub fn new(catalog: Catalog, config: &AppConfig) -> Self {
        Self::with_renderer(catalog, config, Arc::new(JsonRenderer))
    }

    pub fn with_renderer(catalog: Catalog, config: &AppConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            catalog,
            csrf: CsrfTokens::new(config.csrf_secret.clone()),
            responder: Responder::new(renderer, RouteTable::default()),
            default_page_size: config.default_page_size,
        }
    }
}

/// Lifecycle subscribers every store gets.
pub fn default_events() -> EventManager {
    EventManager::new().with_subscriber(Arc::new(TimestampSubscriber::default()))
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.storage.use_persistent {
        #[cfg(feature = "postgres")]
        {
            return build_persistent_services(config).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    Ok(build_in_memory_services(config))
}

fn build_in_memory_services(config: &AppConfig) -> AppServices {
    tracing::info!("using in-memory product store");
    AppServices::new(Catalog::in_memory(default_events()), config)
}

#[cfg(feature = "postgres")]
async fn build_persistent_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    use anyhow::Context;
    use cms_catalog::postgres::PostgresProductStore;
    use sqlx::postgres::PgPoolOptions;

    let url = config
        .storage
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.storage.max_connections)
        .connect(url)
        .await
        .context("failed to connect to postgres")?;

    let store = PostgresProductStore::new(pool);
    store.ensure_schema().await?;
    tracing::info!("using postgres product store");

    Ok(AppServices::new(
        Catalog::new(Arc::new(store), default_events()),
        config,
    ))
}
