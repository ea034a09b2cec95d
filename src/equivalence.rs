//! Annotation equivalence: when do two records denote the same mark?
//!
//! One predicate per shape plus a dispatcher for comparing predictions with
//! annotations. Every predicate is total: mismatched shapes, missing labels,
//! and partial spans all yield `false`.
//!
//! | predicate | compares |
//! |---|---|
//! | [`classification_equivalent`] | label (both present) |
//! | [`ner_equivalent`] | start and end (labels ignored) |
//! | [`text_equivalent`] | label and text (both present) |
//! | [`zone_equivalent`] | label and every vertex, in order, exactly |
//! | [`relation_equivalent`] | relation label, NER-equivalent endpoints |
//!
//! [`ner_equivalent`] deliberately ignores the label, so a prediction found
//! by a different code path still matches an annotation at the same span.
//! Callers that need label equality compare `value` themselves.
//!
//! The [`values`] submodule exposes the same predicates over raw JSON
//! payloads, returning `false` for anything that fails ingestion.

use annotate_core::{Annotation, Relation, Shape};

/// Both labels present and equal.
#[must_use]
pub fn classification_equivalent(a: &Annotation, b: &Annotation) -> bool {
    matches!((&a.value, &b.value), (Some(x), Some(y)) if x == y)
}

/// Both are valid NER spans with identical bounds.
#[must_use]
pub fn ner_equivalent(a: &Annotation, b: &Annotation) -> bool {
    match (a.ner_bounds(), b.ner_bounds()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Both are text answers with equal label and equal text.
#[must_use]
pub fn text_equivalent(a: &Annotation, b: &Annotation) -> bool {
    match (a.text_value(), b.text_value()) {
        (Some(x), Some(y)) => x == y && classification_equivalent(a, b),
        _ => false,
    }
}

/// Both are zones with equal label and identical vertex lists.
///
/// Vertex order matters and coordinates are compared exactly; a zone whose
/// vertex list is a rotation of another is a different zone.
#[must_use]
pub fn zone_equivalent(a: &Annotation, b: &Annotation) -> bool {
    match (a.zone_vertices(), b.zone_vertices()) {
        (Some(x), Some(y)) => {
            a.value == b.value
                && x.len() == y.len()
                && x.iter().zip(y).all(|(p, q)| p.x == q.x && p.y == q.y)
        }
        _ => false,
    }
}

/// Equal relation labels and NER-equivalent endpoints on both ends.
#[must_use]
pub fn relation_equivalent(a: &Relation, b: &Relation) -> bool {
    a.value == b.value && ner_equivalent(&a.src, &b.src) && ner_equivalent(&a.dest, &b.dest)
}

/// Both NER bounds are present.
#[must_use]
pub fn is_annotation_ner(annotation: &Annotation) -> bool {
    annotation.ner_bounds().is_some()
}

/// Compare a prediction with an annotation, dispatching on shape.
///
/// NER wins whenever either side is a NER span, then text when either side
/// carries text, and classification last. A NER record that also carries a
/// label is compared positionally, never as a classification. Zones fall
/// through to the label comparison: a zone prediction is "already present"
/// when any zone with its label is.
#[must_use]
pub fn prediction_equivalent_to_annotation(prediction: &Annotation, annotation: &Annotation) -> bool {
    if is_ner_shaped(prediction) || is_ner_shaped(annotation) {
        ner_equivalent(prediction, annotation)
    } else if prediction.text_value().is_some() || annotation.text_value().is_some() {
        text_equivalent(prediction, annotation)
    } else {
        classification_equivalent(prediction, annotation)
    }
}

/// Shape-aware "same mark" test used for duplicate detection on user edits.
///
/// Like [`prediction_equivalent_to_annotation`], except that zones are
/// compared vertex by vertex, so two drawn polygons with one label are two
/// marks.
#[must_use]
pub fn same_mark(a: &Annotation, b: &Annotation) -> bool {
    if is_zone_shaped(a) || is_zone_shaped(b) {
        zone_equivalent(a, b)
    } else {
        prediction_equivalent_to_annotation(a, b)
    }
}

fn is_ner_shaped(annotation: &Annotation) -> bool {
    matches!(annotation.shape, Shape::Ner(_))
}

fn is_zone_shaped(annotation: &Annotation) -> bool {
    matches!(annotation.shape, Shape::Zone(_))
}

/// Equivalence over raw JSON payloads.
///
/// Each side is ingested with [`Annotation::from_value`] /
/// [`Relation::from_value`]; any ingestion failure makes the predicate
/// `false`. Use these at boundaries where payloads have not been typed yet.
pub mod values {
    use super::*;
    use serde_json::Value;

    fn both(a: &Value, b: &Value, f: impl Fn(&Annotation, &Annotation) -> bool) -> bool {
        match (Annotation::from_value(a), Annotation::from_value(b)) {
            (Ok(x), Ok(y)) => f(&x, &y),
            _ => false,
        }
    }

    /// JSON form of [`super::classification_equivalent`].
    #[must_use]
    pub fn classification_equivalent(a: &Value, b: &Value) -> bool {
        both(a, b, super::classification_equivalent)
    }

    /// JSON form of [`super::ner_equivalent`].
    #[must_use]
    pub fn ner_equivalent(a: &Value, b: &Value) -> bool {
        both(a, b, super::ner_equivalent)
    }

    /// JSON form of [`super::text_equivalent`].
    #[must_use]
    pub fn text_equivalent(a: &Value, b: &Value) -> bool {
        both(a, b, super::text_equivalent)
    }

    /// JSON form of [`super::zone_equivalent`].
    #[must_use]
    pub fn zone_equivalent(a: &Value, b: &Value) -> bool {
        both(a, b, super::zone_equivalent)
    }

    /// JSON form of [`super::prediction_equivalent_to_annotation`].
    #[must_use]
    pub fn prediction_equivalent_to_annotation(prediction: &Value, annotation: &Value) -> bool {
        both(prediction, annotation, super::prediction_equivalent_to_annotation)
    }

    /// JSON form of [`super::is_annotation_ner`].
    #[must_use]
    pub fn is_annotation_ner(value: &Value) -> bool {
        Annotation::from_value(value).is_ok_and(|a| super::is_annotation_ner(&a))
    }

    /// JSON form of [`super::relation_equivalent`].
    #[must_use]
    pub fn relation_equivalent(a: &Value, b: &Value) -> bool {
        match (Relation::from_value(a), Relation::from_value(b)) {
            (Ok(x), Ok(y)) => super::relation_equivalent(&x, &y),
            _ => false,
        }
    }
}
