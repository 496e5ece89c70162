//! Reaction gating: whether (and which) reactions go back to the signal
//! source for a match.

use tracing::debug;

use actioneer_common::{ActionLabel, MatchMessage, ReactionLabel};

/// Decides whether reacting is enabled for a match and which reaction
/// labels to emit.
///
/// The intended end state is per-collaboration configuration looked up from
/// the banks implied by the match message; until that exists the shipped
/// implementation is [`StaticReactionPolicy`].
pub trait ReactionPolicy: Send + Sync {
    fn reacting_enabled(&self, match_message: &MatchMessage) -> bool;

    /// Reaction labels to emit for a match. Receives the resolved action
    /// labels so future policies can react differently depending on what
    /// was actually done.
    fn reaction_labels(
        &self,
        match_message: &MatchMessage,
        action_labels: &[ActionLabel],
    ) -> Vec<ReactionLabel>;
}

/// Fixed single-label policy: one global on/off switch and one configured
/// label for every match. Stands in until per-collaboration gating exists.
pub struct StaticReactionPolicy {
    enabled: bool,
    label: ReactionLabel,
}

impl StaticReactionPolicy {
    pub fn new(enabled: bool, label: ReactionLabel) -> Self {
        Self { enabled, label }
    }
}

impl ReactionPolicy for StaticReactionPolicy {
    fn reacting_enabled(&self, _match_message: &MatchMessage) -> bool {
        debug!(
            enabled = self.enabled,
            "Reaction gating is a static default, not per-collaboration config"
        );
        self.enabled
    }

    fn reaction_labels(
        &self,
        _match_message: &MatchMessage,
        _action_labels: &[ActionLabel],
    ) -> Vec<ReactionLabel> {
        vec![self.label.clone()]
    }
}
