use std::sync::Arc;

use userhub_api::config::Config;
use userhub_store::{InMemoryUserStore, UserStore};

#[tokio::main]
async fn main() {
    userhub_observability::init();

    let config = Config::from_env();
    let store = build_store(&config).await;
    let app = userhub_api::app::build_app(&config, store);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind 0.0.0.0:{}: {e}", config.port));

    tracing::info!("server running on port {}", config.port);
    tracing::info!("environment: {}", config.environment.as_str());
    tracing::info!("api base url: http://localhost:{}/api", config.port);
    tracing::info!("health check: http://localhost:{}/api/health", config.port);

    axum::serve(listener, app).await.unwrap();
}

async fn build_store(config: &Config) -> Arc<dyn UserStore> {
    #[cfg(feature = "postgres")]
    if let Some(url) = config.database_url.as_deref() {
        let store = userhub_store::PgUserStore::connect(url)
            .await
            .expect("failed to connect to database");
        store
            .ensure_schema()
            .await
            .expect("failed to apply database schema");
        return Arc::new(store);
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL set but the postgres feature is not enabled; using the in-memory store");
    }

    Arc::new(InMemoryUserStore::new())
}
