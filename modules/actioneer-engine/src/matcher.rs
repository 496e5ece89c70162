//! Rule evaluation: which action labels does a match message trigger?

use std::collections::BTreeMap;

use actioneer_common::{ActionLabel, ActionRule, MatchMessage};

/// Evaluate every configured rule against every banked signal in the
/// message. Returns, per triggered action label, the rules that fired.
///
/// A rule that fires on several signals appears once per signal — the
/// provenance list is deliberately not deduplicated, so downstream
/// consumers can see every justification for an action.
///
/// Every (signal, rule) pair is checked independently; empty inputs yield
/// an empty map.
pub fn actions_to_take(
    match_message: &MatchMessage,
    action_rules: &[ActionRule],
) -> BTreeMap<ActionLabel, Vec<ActionRule>> {
    let mut triggered: BTreeMap<ActionLabel, Vec<ActionRule>> = BTreeMap::new();

    for signal in &match_message.matching_banked_signals {
        for rule in action_rules {
            if rule.applies_to(&signal.classifications) {
                triggered
                    .entry(rule.action_label.clone())
                    .or_default()
                    .push(rule.clone());
            }
        }
    }

    triggered
}
