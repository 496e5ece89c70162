//! Per-record evaluation and batch orchestration.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use actioneer_common::{
    ActionLabel, ActionMessage, ActioneerError, MatchMessage, ReactionMessage,
};

use crate::catalog::{CatalogSnapshot, CatalogStore};
use crate::matcher::actions_to_take;
use crate::queue::OutboundQueue;
use crate::reaction::ReactionPolicy;
use crate::supersede::{remove_superseded, SupersessionConflict};

/// Everything one match message produced: the messages to emit and any
/// configuration inconsistencies the resolver hit on the way.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub action_messages: Vec<ActionMessage>,
    pub reaction_messages: Vec<ReactionMessage>,
    pub conflicts: Vec<SupersessionConflict>,
}

/// Evaluate one match message against a catalog snapshot.
///
/// Pure given the snapshot and policy: the same message against the same
/// catalog always yields the same outcome, so redelivered notifications
/// re-derive identical actions.
pub fn evaluate_match(
    match_message: &MatchMessage,
    catalog: &CatalogSnapshot,
    policy: &dyn ReactionPolicy,
) -> EvaluationOutcome {
    let triggered = actions_to_take(match_message, &catalog.action_rules);
    let resolution = remove_superseded(triggered, &catalog.actions_by_label());

    let action_labels: Vec<ActionLabel> = resolution.kept.keys().cloned().collect();
    let action_messages: Vec<ActionMessage> = resolution
        .kept
        .into_iter()
        .map(|(label, rules)| ActionMessage::from_match(match_message, label, rules))
        .collect();

    let reaction_messages = if policy.reacting_enabled(match_message) {
        policy
            .reaction_labels(match_message, &action_labels)
            .into_iter()
            .map(|label| ReactionMessage::from_match(match_message, label))
            .collect()
    } else {
        Vec::new()
    };

    EvaluationOutcome {
        action_messages,
        reaction_messages,
        conflicts: resolution.conflicts,
    }
}

/// Per-record outcome reported back to the transport so it can redeliver
/// exactly the records that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordResult {
    Ok {
        actions_emitted: usize,
        reactions_emitted: usize,
        /// Configuration inconsistencies hit during supersession (mutual
        /// ties). Non-zero means the catalog needs operator attention even
        /// though the record processed.
        conflicts: usize,
    },
    Failed {
        error: String,
    },
}

/// Process a batch of raw notification bodies sequentially.
///
/// Each record is deserialized, evaluated against a fresh catalog snapshot,
/// and its messages emitted. A failing record is reported in its slot and
/// never aborts the rest of the batch.
pub async fn process_batch(
    records: &[serde_json::Value],
    catalog: &dyn CatalogStore,
    policy: &dyn ReactionPolicy,
    queue: &dyn OutboundQueue,
) -> Vec<RecordResult> {
    let mut results = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match process_record(record, catalog, policy, queue).await {
            Ok(result) => results.push(result),
            Err(error) => {
                warn!(index, %error, "Record failed, continuing with batch");
                results.push(RecordResult::Failed {
                    error: error.to_string(),
                });
            }
        }
    }

    results
}

async fn process_record(
    record: &serde_json::Value,
    catalog: &dyn CatalogStore,
    policy: &dyn ReactionPolicy,
    queue: &dyn OutboundQueue,
) -> Result<RecordResult, ActioneerError> {
    let match_message: MatchMessage = serde_json::from_value(record.clone())
        .map_err(|e| ActioneerError::MalformedRecord(e.to_string()))?;

    let snapshot = catalog.load().await?;
    let outcome = evaluate_match(&match_message, &snapshot, policy);

    info!(
        content_key = match_message.content_key.as_str(),
        actions = outcome.action_messages.len(),
        reactions = outcome.reaction_messages.len(),
        conflicts = outcome.conflicts.len(),
        "Evaluated match message"
    );

    for message in &outcome.action_messages {
        queue
            .send_action(message)
            .await
            .map_err(|e| ActioneerError::Enqueue(e.to_string()))?;
    }
    for message in &outcome.reaction_messages {
        queue
            .send_reaction(message)
            .await
            .map_err(|e| ActioneerError::Enqueue(e.to_string()))?;
    }

    Ok(RecordResult::Ok {
        actions_emitted: outcome.action_messages.len(),
        reactions_emitted: outcome.reaction_messages.len(),
        conflicts: outcome.conflicts.len(),
    })
}
