//! Relation integrity: relations never outlive their endpoints.
//!
//! Removing a NER annotation removes every relation whose `src` or `dest`
//! is NER-equivalent to it, in the same call. Callers never observe a
//! relation pointing at a missing annotation.

use crate::equivalence::{ner_equivalent, same_mark};
use crate::interval::get_annotation_index;
use annotate_core::{Annotation, Relation};

/// Whether `relation` has `annotation` as either endpoint.
#[must_use]
pub fn relation_involves(relation: &Relation, annotation: &Annotation) -> bool {
    ner_equivalent(&relation.src, annotation) || ner_equivalent(&relation.dest, annotation)
}

/// Relations with `annotation` as either endpoint.
#[must_use]
pub fn relations_involving<'a>(relations: &'a [Relation], annotation: &Annotation) -> Vec<&'a Relation> {
    relations
        .iter()
        .filter(|r| relation_involves(r, annotation))
        .collect()
}

/// Remove `target` and cascade to the relations that reference it.
///
/// Annotations are matched by shape-aware equivalence, so removing a zone or
/// classification works too (those never have relations). Survivors keep
/// their relative order. Removing something absent returns both lists
/// unchanged.
#[must_use]
pub fn remove_annotation(
    annotations: &[Annotation],
    relations: &[Relation],
    target: &Annotation,
) -> (Vec<Annotation>, Vec<Relation>) {
    let kept: Vec<Annotation> = annotations
        .iter()
        .filter(|a| !same_mark(a, target))
        .cloned()
        .collect();

    let removed = annotations.len() - kept.len();
    let kept_relations: Vec<Relation> = if removed == 0 {
        relations.to_vec()
    } else {
        relations
            .iter()
            .filter(|r| !relation_involves(r, target))
            .cloned()
            .collect()
    };

    if removed > 0 {
        log::debug!(
            "removed {} {} annotation(s), cascaded {} relation(s)",
            removed,
            target.shape.as_str(),
            relations.len() - kept_relations.len()
        );
    }

    (kept, kept_relations)
}

/// Drop relations whose endpoints do not resolve to a member of `annotations`.
#[must_use]
pub fn prune_dangling_relations(annotations: &[Annotation], relations: &[Relation]) -> Vec<Relation> {
    relations
        .iter()
        .filter(|r| {
            get_annotation_index(&r.src, annotations).is_some()
                && get_annotation_index(&r.dest, annotations).is_some()
        })
        .cloned()
        .collect()
}
