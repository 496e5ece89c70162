use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use actioneer_common::{Config, ReactionLabel};
use actioneer_engine::{
    CachedCatalog, CatalogStore, FileCatalog, PerformerRegistry, StaticReactionPolicy,
};
use actioneer_server::{router, AppState, HttpQueue};
use webhook_client::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("actioneer=info".parse()?))
        .init();

    info!("Actioneer server starting...");

    let config = Config::from_env();
    config.log_summary();

    let catalog: Arc<dyn CatalogStore> = Arc::new(CachedCatalog::new(
        FileCatalog::new(&config.catalog_path),
        Duration::from_secs(config.catalog_ttl_secs),
    ));

    // Fail fast on a broken catalog before accepting traffic. Building the
    // registry here also catches duplicate performer names at startup.
    let snapshot = catalog.load().await?;
    let registry = PerformerRegistry::from_entries(snapshot.performers)?;
    info!(
        rules = snapshot.action_rules.len(),
        actions = snapshot.actions.len(),
        performers = registry.len(),
        "Catalog validated"
    );

    let http = WebhookClient::new(Duration::from_secs(config.webhook_timeout_secs));
    let queue = Arc::new(HttpQueue::new(
        http.clone(),
        config.actions_queue_url.clone(),
        config.reactions_queue_url.clone(),
    ));
    let policy = Arc::new(StaticReactionPolicy::new(
        config.reacting_enabled,
        ReactionLabel::new(config.reaction_label.clone()),
    ));
    if config.reacting_enabled {
        info!(
            reaction_label = config.reaction_label.as_str(),
            "Reacting enabled with static single-label policy (per-collaboration gating not implemented)"
        );
    }

    let state = Arc::new(AppState {
        catalog,
        policy,
        queue,
        http,
    });

    let app = router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    let listener =
        tokio::net::TcpListener::bind((config.bind_host.as_str(), config.bind_port)).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
