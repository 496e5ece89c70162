use std::sync::Arc;

use actioneer_engine::{CatalogStore, OutboundQueue, ReactionPolicy};
use webhook_client::WebhookClient;

/// Shared server state: catalog access, reaction gating, the outbound
/// queue, and the HTTP client used for direct action dispatch.
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub policy: Arc<dyn ReactionPolicy>,
    pub queue: Arc<dyn OutboundQueue>,
    pub http: WebhookClient,
}
