//! Removing an annotation removes the relations that reference it.

use annotate::{
    remove_annotation, split_content_to_annotation_marks, Annotation, ItemAnnotations, Relation,
};
use proptest::prelude::*;

#[test]
fn removing_source_drops_relation() {
    let a = Annotation::ner("PER", 0, 5);
    let b = Annotation::ner("ORG", 6, 11);
    let relations = vec![Relation::new("works_for", a.clone(), b.clone())];

    let (annotations, relations) = remove_annotation(&[a.clone(), b.clone()], &relations, &a);

    assert_eq!(annotations, vec![b]);
    assert!(relations.is_empty());
}

#[test]
fn removing_by_span_ignores_label() {
    let a = Annotation::ner("PER", 0, 5);
    let b = Annotation::ner("ORG", 6, 11);
    let item = ItemAnnotations::new(
        vec![a.clone(), b.clone()],
        vec![Relation::new("works_for", a, b.clone())],
    );

    // The click handler only knows the span, not the label
    let next = item.remove(&Annotation::ner("?", 6, 11));
    assert_eq!(next.annotations, vec![Annotation::ner("PER", 0, 5)]);
    assert!(next.relations.is_empty());
}

#[test]
fn relation_flag_follows_cascade() {
    let content = "Hello World";
    let a = Annotation::ner("PER", 0, 5);
    let b = Annotation::ner("ORG", 6, 11);
    let c = Annotation::ner("LOC", 6, 11);
    let item = ItemAnnotations::new(
        vec![a.clone(), b.clone()],
        vec![Relation::new("works_for", a.clone(), b.clone())],
    );

    let marks = item.marks(content, &[]);
    assert!(marks
        .iter()
        .flat_map(|m| &m.char_annotations)
        .all(|c| c.has_relation));

    let next = item.remove(&b);
    let marks = split_content_to_annotation_marks(content, &next.annotations, &[], &next.relations);
    assert!(marks
        .iter()
        .flat_map(|m| &m.char_annotations)
        .all(|c| !c.has_relation));

    // A new span where the old destination was does not revive the relation
    let readded = next.toggle(c);
    assert_eq!(readded.annotations.len(), 2);
    assert!(readded.relations.is_empty());
}

proptest! {
    #[test]
    fn no_relation_outlives_its_endpoints(
        spans in prop::collection::vec((0usize..40, 1usize..5), 1..8),
        links in prop::collection::vec((0usize..8, 0usize..8), 0..10),
        victim in 0usize..8,
    ) {
        let annotations: Vec<Annotation> = spans
            .iter()
            .enumerate()
            .map(|(i, &(s, len))| Annotation::ner(format!("L{i}"), s, s + len))
            .collect();
        let relations: Vec<Relation> = links
            .iter()
            .map(|&(i, j)| {
                Relation::new(
                    "rel",
                    annotations[i % annotations.len()].clone(),
                    annotations[j % annotations.len()].clone(),
                )
            })
            .collect();
        let target = annotations[victim % annotations.len()].clone();

        let (kept, kept_relations) = remove_annotation(&annotations, &relations, &target);

        prop_assert!(kept.iter().all(|a| a.ner_bounds() != target.ner_bounds()));
        for r in &kept_relations {
            prop_assert!(kept.iter().any(|a| a.ner_bounds() == r.src.ner_bounds()));
            prop_assert!(kept.iter().any(|a| a.ner_bounds() == r.dest.ner_bounds()));
        }
    }
}
