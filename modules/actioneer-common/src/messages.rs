use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::labels::{ActionLabel, Label, ReactionLabel};
use crate::rules::ActionRule;

/// A signal from a bank that the content matched, plus the classification
/// labels the match pipeline has attached to it.
///
/// The classification set is append-only and owned by the match pipeline;
/// by the time a [`MatchMessage`] reaches the engine it is read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankedSignal {
    pub signal_id: String,
    pub bank_id: String,
    pub bank_source: String,
    #[serde(default)]
    pub classifications: BTreeSet<Label>,
}

impl BankedSignal {
    pub fn new(
        signal_id: impl Into<String>,
        bank_id: impl Into<String>,
        bank_source: impl Into<String>,
    ) -> Self {
        Self {
            signal_id: signal_id.into(),
            bank_id: bank_id.into(),
            bank_source: bank_source.into(),
            classifications: BTreeSet::new(),
        }
    }

    /// Attach a classification label. Duplicates are a no-op (set semantics).
    pub fn add_classification(&mut self, label: impl Into<Label>) {
        self.classifications.insert(label.into());
    }

    /// Builder-style variant of [`add_classification`] for fixtures and
    /// pipeline code that constructs signals in one expression.
    ///
    /// [`add_classification`]: BankedSignal::add_classification
    pub fn with_classification(mut self, label: impl Into<Label>) -> Self {
        self.add_classification(label);
        self
    }
}

/// One piece of content matched one or more banked signals.
///
/// Produced once per distinct piece of content per evaluation cycle — a hash
/// matching several banks folds into a single message, never one message per
/// bank match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMessage {
    pub content_key: String,
    pub content_hash: String,
    pub matching_banked_signals: Vec<BankedSignal>,
}

impl MatchMessage {
    pub fn new(
        content_key: impl Into<String>,
        content_hash: impl Into<String>,
        matching_banked_signals: Vec<BankedSignal>,
    ) -> Self {
        Self {
            content_key: content_key.into(),
            content_hash: content_hash.into(),
            matching_banked_signals,
        }
    }
}

/// A resolved action, addressed to the actions queue. Carries the full list
/// of rules that fired so downstream consumers can explain why the action
/// ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMessage {
    pub match_message: MatchMessage,
    pub action_label: ActionLabel,
    pub action_rules: Vec<ActionRule>,
}

impl ActionMessage {
    pub fn from_match(
        match_message: &MatchMessage,
        action_label: ActionLabel,
        action_rules: Vec<ActionRule>,
    ) -> Self {
        Self {
            match_message: match_message.clone(),
            action_label,
            action_rules,
        }
    }
}

/// A reaction to report back to the signal source, addressed to the
/// reactions queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionMessage {
    pub match_message: MatchMessage,
    pub reaction_label: ReactionLabel,
}

impl ReactionMessage {
    pub fn from_match(match_message: &MatchMessage, reaction_label: ReactionLabel) -> Self {
        Self {
            match_message: match_message.clone(),
            reaction_label,
        }
    }
}
