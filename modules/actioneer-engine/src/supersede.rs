//! Supersession: collapse simultaneously-triggered actions to the ones
//! that should actually run.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use actioneer_common::{Action, ActionLabel, ActionRule};

/// Equal-priority mutual supersession between two triggered actions. The
/// resolver cannot pick a winner, so it keeps both and reports the pair as
/// a configuration inconsistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupersessionConflict {
    pub first: ActionLabel,
    pub second: ActionLabel,
    pub priority: u32,
}

/// Output of [`remove_superseded`]: the surviving subset of the triggered
/// map, plus any configuration inconsistencies found along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kept: BTreeMap<ActionLabel, Vec<ActionRule>>,
    pub conflicts: Vec<SupersessionConflict>,
}

/// Drop triggered actions that a higher-precedence triggered action
/// supersedes.
///
/// For each triggered label A whose `superseded_by` list names another
/// triggered label B, A is removed unless its priority is numerically lower
/// (more important) than B's. Equal priority with mutual supersession is a
/// configuration inconsistency: both labels are kept and the pair is
/// reported. Labels with no [`Action`] metadata are never removed, and a
/// superseder with no metadata establishes no precedence.
///
/// Deterministic: iteration follows the label ordering of the input maps,
/// never hash order.
pub fn remove_superseded(
    triggered: BTreeMap<ActionLabel, Vec<ActionRule>>,
    actions: &BTreeMap<ActionLabel, Action>,
) -> Resolution {
    let mut removed: BTreeSet<ActionLabel> = BTreeSet::new();
    let mut conflicts: Vec<SupersessionConflict> = Vec::new();

    for label in triggered.keys() {
        let Some(action) = actions.get(label) else {
            // No resolution metadata: always kept.
            continue;
        };

        for superseder in &action.superseded_by {
            if superseder == label || !triggered.contains_key(superseder) {
                continue;
            }
            let Some(superseder_action) = actions.get(superseder) else {
                debug!(
                    label = %label,
                    superseder = %superseder,
                    "Superseder has no action metadata, keeping label"
                );
                continue;
            };

            match action.priority.cmp(&superseder_action.priority) {
                // This label outranks its superseder; the symmetric check
                // on the superseder decides that label's fate.
                Ordering::Less => {}
                Ordering::Greater => {
                    removed.insert(label.clone());
                }
                Ordering::Equal => {
                    if superseder_action.superseded_by.contains(label) {
                        warn!(
                            first = %label,
                            second = %superseder,
                            priority = action.priority,
                            "Mutual supersession at equal priority, keeping both"
                        );
                        // Record each pair once.
                        if label < superseder {
                            conflicts.push(SupersessionConflict {
                                first: label.clone(),
                                second: superseder.clone(),
                                priority: action.priority,
                            });
                        }
                    } else {
                        removed.insert(label.clone());
                    }
                }
            }
        }
    }

    let kept = triggered
        .into_iter()
        .filter(|(label, _)| !removed.contains(label))
        .collect();

    Resolution { kept, conflicts }
}
