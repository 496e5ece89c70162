use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ActioneerError;
use crate::labels::{ActionLabel, Label};

/// A boolean predicate over classification labels. When a banked signal
/// satisfies it, the rule proposes its action label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRule {
    pub name: String,
    pub action_label: ActionLabel,
    #[serde(default)]
    pub must_have_labels: BTreeSet<Label>,
    #[serde(default)]
    pub must_not_have_labels: BTreeSet<Label>,
}

impl ActionRule {
    pub fn new(
        name: impl Into<String>,
        action_label: ActionLabel,
        must_have_labels: BTreeSet<Label>,
        must_not_have_labels: BTreeSet<Label>,
    ) -> Self {
        Self {
            name: name.into(),
            action_label,
            must_have_labels,
            must_not_have_labels,
        }
    }

    /// True iff every must-have label is present and no must-not-have label
    /// is present in the classifications.
    pub fn applies_to(&self, classifications: &BTreeSet<Label>) -> bool {
        self.must_have_labels.is_subset(classifications)
            && self.must_not_have_labels.is_disjoint(classifications)
    }

    /// Catch contradictory rules at configuration time. A rule whose
    /// must-have and must-not-have sets overlap can never fire.
    pub fn validate(&self) -> Result<(), ActioneerError> {
        let overlap: Vec<&Label> = self
            .must_have_labels
            .intersection(&self.must_not_have_labels)
            .collect();
        if !overlap.is_empty() {
            let labels: Vec<&str> = overlap.iter().map(|l| l.as_str()).collect();
            return Err(ActioneerError::Config(format!(
                "rule '{}' can never fire: labels {:?} are both required and forbidden",
                self.name, labels
            )));
        }
        Ok(())
    }
}

/// Resolution metadata for an action label, independent of the rules that
/// can trigger it. Lower priority value = higher precedence (priority 1 is
/// the most important).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_label: ActionLabel,
    pub priority: u32,
    #[serde(default)]
    pub superseded_by: Vec<ActionLabel>,
}

impl Action {
    pub fn new(action_label: ActionLabel, priority: u32, superseded_by: Vec<ActionLabel>) -> Self {
        Self {
            action_label,
            priority,
            superseded_by,
        }
    }
}
