//! Prediction reconciliation.
//!
//! Merges a model's predictions into the working annotation set under one of
//! two policies:
//!
//! | policy | effect |
//! |---|---|
//! | [`ReconcilePolicy::Prefill`] | accept every well-formed prediction that is new and does not overlap an existing NER span |
//! | [`ReconcilePolicy::SuggestOnly`] | never insert; retract previously accepted predictions that match a current prediction |
//!
//! Both policies are idempotent: reconciling a result again with the same
//! predictions changes nothing. Stored annotations are never removed.

use crate::equivalence::prediction_equivalent_to_annotation;
use crate::interval::overlaps_any_ner;
use annotate_core::{Annotation, Origin, Shape};
use serde::{Deserialize, Serialize};

/// How predictions enter the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Auto-accept non-conflicting predictions.
    Prefill,
    /// Predictions are advisory and never auto-inserted.
    #[default]
    SuggestOnly,
}

impl From<bool> for ReconcilePolicy {
    /// `true` is the project's "prefill predictions" flag.
    fn from(prefill: bool) -> Self {
        if prefill {
            Self::Prefill
        } else {
            Self::SuggestOnly
        }
    }
}

impl ReconcilePolicy {
    /// Policy name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prefill => "prefill",
            Self::SuggestOnly => "suggest_only",
        }
    }
}

impl std::fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reconcile `current` against `predictions`, returning a new list.
#[must_use]
pub fn reconcile(
    current: &[Annotation],
    predictions: &[Annotation],
    policy: ReconcilePolicy,
) -> Vec<Annotation> {
    match policy {
        ReconcilePolicy::Prefill => prefill(current, predictions),
        ReconcilePolicy::SuggestOnly => retract_withdrawn(current, predictions),
    }
}

/// Append predictions that are new and, for NER spans, overlap nothing.
///
/// Checks run against the growing result, so two overlapping predictions
/// never both get in: the earlier one wins. Malformed predictions (a NER
/// span without both bounds or with `start >= end`, or any other shape
/// without a label) are skipped, since nothing could ever recognize them as
/// already present.
fn prefill(current: &[Annotation], predictions: &[Annotation]) -> Vec<Annotation> {
    let mut result = current.to_vec();
    let mut accepted = 0usize;

    for prediction in predictions {
        if !prediction.is_well_formed() {
            log::trace!(
                "skipping malformed {} prediction {:?}",
                prediction.shape.as_str(),
                prediction.value
            );
            continue;
        }
        if result
            .iter()
            .any(|a| prediction_equivalent_to_annotation(prediction, a))
        {
            continue;
        }
        if matches!(prediction.shape, Shape::Ner(_)) && overlaps_any_ner(&result, prediction) {
            log::trace!("skipping prediction {:?}: overlaps an existing span", prediction.ner_bounds());
            continue;
        }
        result.push(prediction.clone().with_origin(Origin::AcceptedPrediction));
        accepted += 1;
    }

    log::debug!(
        "prefill accepted {} of {} prediction(s)",
        accepted,
        predictions.len()
    );
    result
}

/// Drop accepted predictions that match a current prediction.
fn retract_withdrawn(current: &[Annotation], predictions: &[Annotation]) -> Vec<Annotation> {
    let result: Vec<Annotation> = current
        .iter()
        .filter(|a| {
            a.origin.is_stored()
                || !predictions
                    .iter()
                    .any(|p| prediction_equivalent_to_annotation(p, a))
        })
        .cloned()
        .collect();

    log::debug!(
        "suggest-only retracted {} accepted prediction(s)",
        current.len() - result.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate_core::{NerSpan, Point};

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(ReconcilePolicy::from(true), ReconcilePolicy::Prefill);
        assert_eq!(ReconcilePolicy::from(false), ReconcilePolicy::SuggestOnly);
    }

    #[test]
    fn test_prefill_appends_new_predictions() {
        let current = vec![Annotation::ner("PER", 0, 4)];
        let predictions = vec![
            Annotation::ner("ORG", 10, 14),
            Annotation::classification("positive"),
            Annotation::text("summary", "short"),
        ];
        let out = reconcile(&current, &predictions, ReconcilePolicy::Prefill);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].origin, Origin::Stored);
        assert!(out[1..].iter().all(|a| a.origin == Origin::AcceptedPrediction));
    }

    #[test]
    fn test_prefill_skips_existing_and_overlapping() {
        let current = vec![Annotation::ner("PER", 0, 5)];
        let predictions = vec![
            // Same span, different label: already present positionally
            Annotation::ner("ORG", 0, 5),
            // Overlaps 0..5
            Annotation::ner("LOC", 3, 8),
            // Touches but does not overlap
            Annotation::ner("LOC", 5, 8),
        ];
        let out = reconcile(&current, &predictions, ReconcilePolicy::Prefill);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].ner_bounds(), Some((5, 8)));
    }

    #[test]
    fn test_prefill_overlapping_predictions_first_wins() {
        let predictions = vec![Annotation::ner("A", 0, 6), Annotation::ner("B", 4, 9)];
        let out = reconcile(&[], &predictions, ReconcilePolicy::Prefill);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label(), Some("A"));
    }

    #[test]
    fn test_prefill_zone_matches_by_label() {
        let tri = vec![Point::new(0.1, 0.1), Point::new(0.5, 0.1), Point::new(0.3, 0.4)];
        let current = vec![Annotation::zone("car", tri.clone())];
        let mut moved = tri.clone();
        moved[0].x = 0.15;
        let predictions = vec![
            Annotation::zone("car", moved),
            Annotation::zone("truck", tri),
        ];
        let out = reconcile(&current, &predictions, ReconcilePolicy::Prefill);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].label(), Some("truck"));
    }

    #[test]
    fn test_prefill_skips_malformed_predictions() {
        let start_only = Annotation {
            value: Some("PER".into()),
            shape: Shape::Ner(NerSpan {
                start: Some(2),
                end: None,
            }),
            origin: Origin::Stored,
        };
        let unlabeled = Annotation {
            value: None,
            ..Annotation::classification("x")
        };
        let unlabeled_text = Annotation {
            value: None,
            ..Annotation::text("summary", "short")
        };
        let predictions = vec![
            start_only,
            unlabeled,
            unlabeled_text,
            Annotation::ner("EMPTY", 4, 4),
            Annotation::ner("BACKWARDS", 6, 3),
            Annotation::ner("ORG", 10, 14),
        ];

        let once = reconcile(&[], &predictions, ReconcilePolicy::Prefill);
        assert_eq!(once, vec![Annotation::ner("ORG", 10, 14).with_origin(Origin::AcceptedPrediction)]);

        let twice = reconcile(&once, &predictions, ReconcilePolicy::Prefill);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_suggest_only_never_inserts() {
        let current = vec![Annotation::ner("PER", 0, 4)];
        let predictions = vec![Annotation::ner("ORG", 10, 14)];
        assert_eq!(reconcile(&current, &predictions, ReconcilePolicy::SuggestOnly), current);
    }

    #[test]
    fn test_suggest_only_retracts_accepted_only() {
        let stored = Annotation::ner("PER", 0, 4);
        let accepted = Annotation::ner("ORG", 10, 14).with_origin(Origin::AcceptedPrediction);
        let kept_accepted = Annotation::ner("LOC", 20, 26).with_origin(Origin::AcceptedPrediction);
        let current = vec![stored.clone(), accepted, kept_accepted.clone()];
        let predictions = vec![Annotation::ner("PER", 0, 4), Annotation::ner("ORG", 10, 14)];

        let out = reconcile(&current, &predictions, ReconcilePolicy::SuggestOnly);
        assert_eq!(out, vec![stored, kept_accepted]);
    }
}
