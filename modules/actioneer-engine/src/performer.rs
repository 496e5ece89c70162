//! Action performers: the closed set of configured outbound side effects,
//! and the registry that resolves them by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use actioneer_common::{ActioneerError, ActionMessage, MatchMessage};
use webhook_client::WebhookClient;

/// A named, persisted webhook configuration. The variant set is closed:
/// the `kind` discriminator in the catalog selects one of these four.
///
/// POST and PUT send the serialized [`MatchMessage`] as the request body;
/// GET and DELETE hit the URL with no body. Every variant makes exactly one
/// HTTP call per invocation — no batching and no internal retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionPerformer {
    WebhookPost { name: String, url: String },
    WebhookGet { name: String, url: String },
    WebhookPut { name: String, url: String },
    WebhookDelete { name: String, url: String },
}

impl ActionPerformer {
    pub fn name(&self) -> &str {
        match self {
            ActionPerformer::WebhookPost { name, .. }
            | ActionPerformer::WebhookGet { name, .. }
            | ActionPerformer::WebhookPut { name, .. }
            | ActionPerformer::WebhookDelete { name, .. } => name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ActionPerformer::WebhookPost { url, .. }
            | ActionPerformer::WebhookGet { url, .. }
            | ActionPerformer::WebhookPut { url, .. }
            | ActionPerformer::WebhookDelete { url, .. } => url,
        }
    }

    /// Execute the configured side effect for a match message.
    ///
    /// Transport failures and non-success statuses propagate to the caller;
    /// retry (and therefore duplicate delivery) is the transport layer's
    /// concern, so the receiving endpoint must be idempotent.
    pub async fn perform(
        &self,
        http: &WebhookClient,
        match_message: &MatchMessage,
    ) -> Result<(), ActioneerError> {
        let result = match self {
            ActionPerformer::WebhookPost { url, .. } => {
                http.post_json(url, &to_body(match_message)?).await
            }
            ActionPerformer::WebhookPut { url, .. } => {
                http.put_json(url, &to_body(match_message)?).await
            }
            ActionPerformer::WebhookGet { url, .. } => http.get(url).await,
            ActionPerformer::WebhookDelete { url, .. } => http.delete(url).await,
        };

        result.map_err(|e| ActioneerError::Dispatch(format!("performer '{}': {e}", self.name())))
    }
}

fn to_body(match_message: &MatchMessage) -> Result<serde_json::Value, ActioneerError> {
    serde_json::to_value(match_message)
        .map_err(|e| ActioneerError::Dispatch(format!("serializing match message: {e}")))
}

/// Catalog of performers keyed by name.
///
/// All variants share one flat namespace — a POST performer and a GET
/// performer cannot both be called "Notify" — because action labels
/// reference performers by bare name.
#[derive(Debug, Clone, Default)]
pub struct PerformerRegistry {
    by_name: HashMap<String, ActionPerformer>,
}

impl PerformerRegistry {
    /// Build a registry, rejecting duplicate names across all variants.
    pub fn from_entries(entries: Vec<ActionPerformer>) -> Result<Self, ActioneerError> {
        let mut by_name = HashMap::with_capacity(entries.len());
        for entry in entries {
            let name = entry.name().to_string();
            if by_name.insert(name.clone(), entry).is_some() {
                return Err(ActioneerError::Config(format!(
                    "duplicate performer name '{name}' in catalog"
                )));
            }
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Result<&ActionPerformer, ActioneerError> {
        self.by_name
            .get(name)
            .ok_or_else(|| ActioneerError::PerformerNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Look up the performer named by an action message's label and run it
/// against the originating match message.
pub async fn perform_label_action(
    registry: &PerformerRegistry,
    http: &WebhookClient,
    message: &ActionMessage,
) -> Result<(), ActioneerError> {
    let performer = registry.get(message.action_label.as_str())?;
    info!(
        action_label = %message.action_label,
        url = performer.url(),
        "Performing action"
    );
    performer.perform(http, &message.match_message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(name: &str) -> ActionPerformer {
        ActionPerformer::WebhookPost {
            name: name.to_string(),
            url: "https://example.test/hook".to_string(),
        }
    }

    fn get(name: &str) -> ActionPerformer {
        ActionPerformer::WebhookGet {
            name: name.to_string(),
            url: "https://example.test/hook".to_string(),
        }
    }

    #[test]
    fn registry_rejects_duplicate_names_across_variants() {
        let err = PerformerRegistry::from_entries(vec![post("Notify"), get("Notify")]).unwrap_err();
        assert!(matches!(err, ActioneerError::Config(_)));
        assert!(err.to_string().contains("Notify"));
    }

    #[test]
    fn registry_lookup_by_name() {
        let registry = PerformerRegistry::from_entries(vec![post("Notify"), get("Check")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Notify").unwrap().name(), "Notify");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = PerformerRegistry::from_entries(vec![post("Notify")]).unwrap();
        let err = registry.get("Missing").unwrap_err();
        assert!(matches!(err, ActioneerError::PerformerNotFound(name) if name == "Missing"));
    }

    #[test]
    fn kind_discriminator_selects_the_variant() {
        let json = r#"{"kind": "webhook_delete", "name": "Purge", "url": "https://example.test/p"}"#;
        let performer: ActionPerformer = serde_json::from_str(json).unwrap();
        assert!(matches!(performer, ActionPerformer::WebhookDelete { .. }));
        assert_eq!(performer.name(), "Purge");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"kind": "webhook_patch", "name": "X", "url": "https://example.test"}"#;
        assert!(serde_json::from_str::<ActionPerformer>(json).is_err());
    }
}
