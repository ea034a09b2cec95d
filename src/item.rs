//! The annotation state of one worklist item.
//!
//! [`ItemAnnotations`] bundles an item's annotations with the relations
//! between them. Every operation takes `&self` and returns a new value, so a
//! renderer holding the previous state never sees a half-applied edit.

use crate::equivalence::{is_annotation_ner, relation_equivalent, same_mark};
use crate::interval::get_annotation_index;
use crate::offset::{annotation_with_converter, OffsetConverter, OffsetUnit};
use crate::partition::split_content_to_annotation_marks;
use crate::reconcile::{reconcile, ReconcilePolicy};
use crate::relations::{prune_dangling_relations, remove_annotation};
use annotate_core::{Annotation, Error, Highlight, MarkSegment, Point, Relation, Result};
use serde::{Deserialize, Serialize};

/// Annotations and relations of a single item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAnnotations {
    /// Annotation records, any shape
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Directed relations between NER annotations
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl ItemAnnotations {
    /// Create from stored lists, dropping relations whose endpoints are missing.
    #[must_use]
    pub fn new(annotations: Vec<Annotation>, relations: Vec<Relation>) -> Self {
        let relations = prune_dangling_relations(&annotations, &relations);
        Self {
            annotations,
            relations,
        }
    }

    /// Whether an equivalent annotation is already present.
    #[must_use]
    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.annotations.iter().any(|a| same_mark(a, annotation))
    }

    /// Add an annotation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a record that could never be
    /// matched again (see [`Annotation::is_well_formed`]) and
    /// [`Error::Duplicate`] if an equivalent annotation exists.
    pub fn insert(&self, annotation: Annotation) -> Result<Self> {
        if !annotation.is_well_formed() {
            return Err(Error::invalid_input(format!(
                "malformed {} annotation {:?}",
                annotation.shape.as_str(),
                annotation.value
            )));
        }
        if self.contains(&annotation) {
            return Err(Error::duplicate(format!(
                "{} annotation {:?} already exists",
                annotation.shape.as_str(),
                annotation.value
            )));
        }
        let mut next = self.clone();
        next.annotations.push(annotation);
        Ok(next)
    }

    /// Remove an annotation and every relation that references it.
    #[must_use]
    pub fn remove(&self, annotation: &Annotation) -> Self {
        let (annotations, relations) = remove_annotation(&self.annotations, &self.relations, annotation);
        Self {
            annotations,
            relations,
        }
    }

    /// Insert when absent, remove (with cascade) when present.
    ///
    /// This is the click/selection path: selecting an existing mark again
    /// clears it. Malformed records leave the item unchanged.
    #[must_use]
    pub fn toggle(&self, annotation: Annotation) -> Self {
        if !annotation.is_well_formed() {
            log::trace!(
                "ignoring toggle of malformed {} annotation {:?}",
                annotation.shape.as_str(),
                annotation.value
            );
            return self.clone();
        }
        if self.contains(&annotation) {
            self.remove(&annotation)
        } else {
            let mut next = self.clone();
            next.annotations.push(annotation);
            next
        }
    }

    /// Add a relation between two current NER annotations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedEndpoint`] if either endpoint is not a
    /// current NER annotation, and [`Error::Duplicate`] if an equivalent
    /// relation exists.
    pub fn relate(&self, relation: Relation) -> Result<Self> {
        for (name, endpoint) in [("src", &relation.src), ("dest", &relation.dest)] {
            if !is_annotation_ner(endpoint) || get_annotation_index(endpoint, &self.annotations).is_none() {
                return Err(Error::unresolved_endpoint(format!(
                    "{name} {:?} of relation '{}' is not a current NER annotation",
                    endpoint.ner_bounds(),
                    relation.value
                )));
            }
        }
        if self.relations.iter().any(|r| relation_equivalent(r, &relation)) {
            return Err(Error::duplicate(format!(
                "relation '{}' already exists",
                relation.value
            )));
        }
        let mut next = self.clone();
        next.relations.push(relation);
        Ok(next)
    }

    /// Remove relations equivalent to `relation`; annotations are untouched.
    #[must_use]
    pub fn unrelate(&self, relation: &Relation) -> Self {
        Self {
            annotations: self.annotations.clone(),
            relations: self
                .relations
                .iter()
                .filter(|r| !relation_equivalent(r, relation))
                .cloned()
                .collect(),
        }
    }

    /// Reconcile against predictions; relations to retracted spans are dropped.
    #[must_use]
    pub fn reconcile(&self, predictions: &[Annotation], policy: ReconcilePolicy) -> Self {
        let annotations = reconcile(&self.annotations, predictions, policy);
        let relations = if annotations.len() < self.annotations.len() {
            prune_dangling_relations(&annotations, &self.relations)
        } else {
            self.relations.clone()
        };
        Self {
            annotations,
            relations,
        }
    }

    /// Partition `content` using this item's annotations and relations.
    #[must_use]
    pub fn marks(&self, content: &str, highlights: &[Highlight]) -> Vec<MarkSegment> {
        split_content_to_annotation_marks(content, &self.annotations, highlights, &self.relations)
    }

    /// Index of the topmost zone containing `point` (the last one drawn).
    #[must_use]
    pub fn find_zone_at(&self, point: Point) -> Option<usize> {
        self.annotations.iter().rposition(|a| {
            a.zone_vertices()
                .is_some_and(|vertices| annotate_core::geometry::contains(vertices, point))
        })
    }

    /// Re-express all NER offsets in chars.
    #[must_use]
    pub fn to_char_offsets(&self, content: &str, unit: OffsetUnit) -> Self {
        if unit == OffsetUnit::Char {
            return self.clone();
        }
        let converter = OffsetConverter::new(content);
        Self {
            annotations: self
                .annotations
                .iter()
                .map(|a| annotation_with_converter(a, &converter, unit))
                .collect(),
            relations: self
                .relations
                .iter()
                .map(|r| Relation {
                    value: r.value.clone(),
                    src: annotation_with_converter(&r.src, &converter, unit),
                    dest: annotation_with_converter(&r.dest, &converter, unit),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate_core::Origin;

    fn people() -> ItemAnnotations {
        let a = Annotation::ner("PER", 0, 4);
        let b = Annotation::ner("ORG", 14, 18);
        ItemAnnotations::new(vec![a.clone(), b.clone()], vec![Relation::new("works_for", a, b)])
    }

    #[test]
    fn test_new_prunes_dangling() {
        let item = ItemAnnotations::new(
            vec![Annotation::ner("PER", 0, 4)],
            vec![Relation::new(
                "works_for",
                Annotation::ner("PER", 0, 4),
                Annotation::ner("ORG", 14, 18),
            )],
        );
        assert!(item.relations.is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let item = people();
        let err = item.insert(Annotation::ner("MISC", 0, 4)).unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));

        let grown = item.insert(Annotation::classification("news")).unwrap();
        assert_eq!(grown.annotations.len(), 3);
        // Original untouched
        assert_eq!(item.annotations.len(), 2);
    }

    #[test]
    fn test_toggle_cascades() {
        let item = people();
        let cleared = item.toggle(Annotation::ner("PER", 0, 4));
        assert_eq!(cleared.annotations, vec![Annotation::ner("ORG", 14, 18)]);
        assert!(cleared.relations.is_empty());

        let restored = cleared.toggle(Annotation::ner("PER", 0, 4));
        assert_eq!(restored.annotations.len(), 2);
    }

    #[test]
    fn test_malformed_records_rejected() {
        let item = people();
        let start_only = Annotation {
            value: Some("PER".into()),
            shape: annotate_core::Shape::Ner(annotate_core::NerSpan {
                start: Some(6),
                end: None,
            }),
            origin: Origin::Stored,
        };
        assert!(matches!(item.insert(start_only.clone()), Err(Error::InvalidInput(_))));
        assert_eq!(item.toggle(start_only.clone()).toggle(start_only), item);

        let unlabeled = Annotation {
            value: None,
            ..Annotation::classification("x")
        };
        assert_eq!(item.toggle(unlabeled), item);
        assert!(item.insert(Annotation::ner("PER", 9, 7)).is_err());
    }

    #[test]
    fn test_toggle_zone_by_vertices() {
        let a = Annotation::zone("car", vec![Point::new(0.1, 0.1), Point::new(0.2, 0.1), Point::new(0.1, 0.2)]);
        let b = Annotation::zone("car", vec![Point::new(0.5, 0.5), Point::new(0.6, 0.5), Point::new(0.5, 0.6)]);
        let item = ItemAnnotations::default().toggle(a.clone()).toggle(b);
        assert_eq!(item.annotations.len(), 2);
        assert_eq!(item.toggle(a).annotations.len(), 1);
    }

    #[test]
    fn test_relate_requires_resolved_endpoints() {
        let item = people();
        let dangling = Relation::new("knows", Annotation::ner("PER", 0, 4), Annotation::ner("PER", 30, 34));
        assert!(matches!(item.relate(dangling), Err(Error::UnresolvedEndpoint(_))));

        let dup = Relation::new("works_for", Annotation::ner("PER", 0, 4), Annotation::ner("ORG", 14, 18));
        assert!(matches!(item.relate(dup.clone()), Err(Error::Duplicate(_))));

        let reverse = Relation::new("employs", dup.dest.clone(), dup.src.clone());
        assert_eq!(item.relate(reverse).unwrap().relations.len(), 2);
        assert!(item.unrelate(&dup).relations.is_empty());
    }

    #[test]
    fn test_reconcile_suggest_only_cascades() {
        let accepted = Annotation::ner("ORG", 14, 18).with_origin(Origin::AcceptedPrediction);
        let person = Annotation::ner("PER", 0, 4);
        let item = ItemAnnotations::new(
            vec![person.clone(), accepted.clone()],
            vec![Relation::new("works_for", person, accepted)],
        );
        let next = item.reconcile(&[Annotation::ner("ORG", 14, 18)], ReconcilePolicy::SuggestOnly);
        assert_eq!(next.annotations.len(), 1);
        assert!(next.relations.is_empty());
    }

    #[test]
    fn test_find_zone_at() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(0.5, 0.5),
            Point::new(0.0, 0.5),
        ];
        let inner = vec![Point::new(0.1, 0.1), Point::new(0.3, 0.1), Point::new(0.2, 0.3)];
        let item = ItemAnnotations::new(
            vec![Annotation::zone("room", square), Annotation::zone("chair", inner)],
            vec![],
        );
        assert_eq!(item.find_zone_at(Point::new(0.2, 0.15)), Some(1));
        assert_eq!(item.find_zone_at(Point::new(0.45, 0.45)), Some(0));
        assert_eq!(item.find_zone_at(Point::new(0.9, 0.9)), None);
    }

    #[test]
    fn test_to_char_offsets_converts_relations() {
        let content = "🌍 Ada met Bob";
        let a = Annotation::ner("PER", 3, 6);
        let b = Annotation::ner("PER", 11, 14);
        let item = ItemAnnotations::new(vec![a.clone(), b.clone()], vec![Relation::new("met", a, b)]);
        let converted = item.to_char_offsets(content, OffsetUnit::Utf16);
        assert_eq!(converted.annotations[0].ner_bounds(), Some((2, 5)));
        assert_eq!(converted.relations[0].dest.ner_bounds(), Some((10, 13)));
        assert_eq!(converted.relations.len(), 1);
    }
}
