//! End-to-end evaluation tests: matcher → supersession → message building
//! → outbound queue, with in-memory catalog and queue.

use std::collections::BTreeSet;
use std::sync::Arc;

use actioneer_common::{
    Action, ActionLabel, ActionRule, BankedSignal, Label, MatchMessage, ReactionLabel,
};
use actioneer_engine::{
    evaluate_match, process_batch, CatalogSnapshot, MemoryCatalog, MemoryQueue, RecordResult,
    StaticReactionPolicy,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn labels(values: &[&str]) -> BTreeSet<Label> {
    values.iter().copied().map(Label::from).collect()
}

fn review_rule() -> ActionRule {
    ActionRule::new(
        "Enqueue Mini-Castle for Review",
        ActionLabel::new("EnqueueForReview"),
        labels(&["303636684709969", "true_positive"]),
        labels(&["3364504410306721"]),
    )
}

fn matching_signal() -> BankedSignal {
    BankedSignal::new("4169895076385542", "303636684709969", "te")
        .with_classification("303636684709969")
        .with_classification("true_positive")
}

fn match_message(signals: Vec<BankedSignal>) -> MatchMessage {
    MatchMessage::new("key", "hash", signals)
}

fn policy() -> StaticReactionPolicy {
    StaticReactionPolicy::new(true, ReactionLabel::new("SAW_THIS_TOO"))
}

fn catalog(snapshot: CatalogSnapshot) -> MemoryCatalog {
    MemoryCatalog::new(snapshot).unwrap()
}

// ---------------------------------------------------------------------------
// evaluate_match
// ---------------------------------------------------------------------------

#[test]
fn one_action_message_per_resolved_label_with_provenance() {
    let snapshot = CatalogSnapshot {
        action_rules: vec![review_rule()],
        ..Default::default()
    };

    // Two signals both satisfy the rule: one message, two rule entries.
    let message = match_message(vec![matching_signal(), matching_signal()]);
    let outcome = evaluate_match(&message, &snapshot, &policy());

    assert_eq!(outcome.action_messages.len(), 1);
    let action = &outcome.action_messages[0];
    assert_eq!(action.action_label, ActionLabel::new("EnqueueForReview"));
    assert_eq!(action.action_rules.len(), 2);
    assert_eq!(action.match_message, message);
}

#[test]
fn superseded_action_is_not_emitted() {
    let delete_rule = ActionRule::new(
        "Delete Known Bad",
        ActionLabel::new("DeleteContent"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let review = ActionRule::new(
        "Review Everything",
        ActionLabel::new("EnqueueForReview"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let snapshot = CatalogSnapshot {
        action_rules: vec![delete_rule, review],
        actions: vec![
            Action::new(ActionLabel::new("DeleteContent"), 1, vec![]),
            Action::new(
                ActionLabel::new("EnqueueForReview"),
                2,
                vec![ActionLabel::new("DeleteContent")],
            ),
        ],
        ..Default::default()
    };

    let outcome = evaluate_match(
        &match_message(vec![matching_signal()]),
        &snapshot,
        &policy(),
    );

    assert_eq!(outcome.action_messages.len(), 1);
    assert_eq!(
        outcome.action_messages[0].action_label,
        ActionLabel::new("DeleteContent")
    );
    assert!(outcome.conflicts.is_empty());
}

#[test]
fn mutual_tie_keeps_both_and_reports_conflict() {
    let rule_a = ActionRule::new(
        "A rule",
        ActionLabel::new("ActionA"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let rule_b = ActionRule::new(
        "B rule",
        ActionLabel::new("ActionB"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let snapshot = CatalogSnapshot {
        action_rules: vec![rule_a, rule_b],
        actions: vec![
            Action::new(
                ActionLabel::new("ActionA"),
                5,
                vec![ActionLabel::new("ActionB")],
            ),
            Action::new(
                ActionLabel::new("ActionB"),
                5,
                vec![ActionLabel::new("ActionA")],
            ),
        ],
        ..Default::default()
    };

    let outcome = evaluate_match(
        &match_message(vec![matching_signal()]),
        &snapshot,
        &policy(),
    );

    assert_eq!(outcome.action_messages.len(), 2);
    assert_eq!(outcome.conflicts.len(), 1);
}

#[test]
fn evaluation_is_deterministic_across_runs() {
    let snapshot = CatalogSnapshot {
        action_rules: vec![review_rule()],
        actions: vec![Action::new(ActionLabel::new("EnqueueForReview"), 1, vec![])],
        ..Default::default()
    };
    let message = match_message(vec![matching_signal()]);
    let reaction_policy = policy();

    let first = evaluate_match(&message, &snapshot, &reaction_policy);
    let second = evaluate_match(&message, &snapshot, &reaction_policy);

    assert_eq!(first.action_messages, second.action_messages);
    assert_eq!(first.reaction_messages, second.reaction_messages);
}

#[test]
fn disabled_reacting_emits_no_reaction_messages() {
    let snapshot = CatalogSnapshot {
        action_rules: vec![review_rule()],
        ..Default::default()
    };
    let disabled = StaticReactionPolicy::new(false, ReactionLabel::new("SAW_THIS_TOO"));

    let outcome = evaluate_match(
        &match_message(vec![matching_signal()]),
        &snapshot,
        &disabled,
    );

    assert_eq!(outcome.action_messages.len(), 1);
    assert!(outcome.reaction_messages.is_empty());
}

// ---------------------------------------------------------------------------
// process_batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_emits_actions_and_reactions_to_the_queue() {
    let store = catalog(CatalogSnapshot {
        action_rules: vec![review_rule()],
        ..Default::default()
    });
    let queue = Arc::new(MemoryQueue::new());

    let record = serde_json::to_value(match_message(vec![matching_signal()])).unwrap();
    let results = process_batch(&[record], &store, &policy(), &queue).await;

    assert_eq!(
        results,
        vec![RecordResult::Ok {
            actions_emitted: 1,
            reactions_emitted: 1,
            conflicts: 0,
        }]
    );
    assert_eq!(queue.actions().len(), 1);
    assert_eq!(
        queue.reactions()[0].reaction_label,
        ReactionLabel::new("SAW_THIS_TOO")
    );
}

#[tokio::test]
async fn malformed_record_fails_alone() {
    let store = catalog(CatalogSnapshot {
        action_rules: vec![review_rule()],
        ..Default::default()
    });
    let queue = Arc::new(MemoryQueue::new());

    let good = serde_json::to_value(match_message(vec![matching_signal()])).unwrap();
    let malformed = serde_json::json!({"content_key": "k"});
    let records = vec![good.clone(), malformed, good];

    let results = process_batch(&records, &store, &policy(), &queue).await;

    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], RecordResult::Ok { .. }));
    assert!(matches!(results[1], RecordResult::Failed { .. }));
    assert!(matches!(results[2], RecordResult::Ok { .. }));
    // Both good records still emitted their actions.
    assert_eq!(queue.actions().len(), 2);
}

#[tokio::test]
async fn record_with_no_matching_rules_emits_no_actions() {
    let store = catalog(CatalogSnapshot {
        action_rules: vec![review_rule()],
        ..Default::default()
    });
    let queue = Arc::new(MemoryQueue::new());

    let unclassified = BankedSignal::new("s1", "other-bank", "te");
    let record = serde_json::to_value(match_message(vec![unclassified])).unwrap();
    let results = process_batch(&[record], &store, &policy(), &queue).await;

    assert!(matches!(
        results[0],
        RecordResult::Ok {
            actions_emitted: 0,
            ..
        }
    ));
    assert!(queue.actions().is_empty());
}

#[tokio::test]
async fn mutual_tie_conflicts_are_reported_per_record() {
    let rule_a = ActionRule::new(
        "A rule",
        ActionLabel::new("ActionA"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let rule_b = ActionRule::new(
        "B rule",
        ActionLabel::new("ActionB"),
        labels(&["true_positive"]),
        labels(&[]),
    );
    let store = catalog(CatalogSnapshot {
        action_rules: vec![rule_a, rule_b],
        actions: vec![
            Action::new(
                ActionLabel::new("ActionA"),
                5,
                vec![ActionLabel::new("ActionB")],
            ),
            Action::new(
                ActionLabel::new("ActionB"),
                5,
                vec![ActionLabel::new("ActionA")],
            ),
        ],
        ..Default::default()
    });
    let queue = Arc::new(MemoryQueue::new());

    let record = serde_json::to_value(match_message(vec![matching_signal()])).unwrap();
    let results = process_batch(&[record], &store, &policy(), &queue).await;

    // The record processes (both actions kept), but the inconsistency is
    // visible to the transport-level caller, not just in the logs.
    assert!(matches!(
        results[0],
        RecordResult::Ok {
            actions_emitted: 2,
            conflicts: 1,
            ..
        }
    ));
}

#[test]
fn record_result_wire_shape() {
    let ok = RecordResult::Ok {
        actions_emitted: 2,
        reactions_emitted: 1,
        conflicts: 0,
    };
    let failed = RecordResult::Failed {
        error: "Malformed record: missing field".into(),
    };

    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        serde_json::json!({
            "status": "ok",
            "actions_emitted": 2,
            "reactions_emitted": 1,
            "conflicts": 0
        })
    );
    assert_eq!(
        serde_json::to_value(&failed).unwrap()["status"],
        "failed"
    );
}
