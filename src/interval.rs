//! Sorting, lookup, and overlap helpers for span-bearing records.
//!
//! Annotations, predictions, partition fragments, and untyped JSON payloads
//! all carry NER offsets; [`NerBearing`] lets one set of helpers serve all
//! of them.

use crate::equivalence::ner_equivalent;
use annotate_core::{Annotation, CharAnnotation};
use serde_json::Value;

/// A record that may carry NER offsets.
pub trait NerBearing {
    /// Start char offset, if present.
    fn ner_start(&self) -> Option<usize>;

    /// End char offset, if present.
    fn ner_end(&self) -> Option<usize>;

    /// Both bounds, if present.
    fn ner_range(&self) -> Option<(usize, usize)> {
        Some((self.ner_start()?, self.ner_end()?))
    }
}

impl NerBearing for Annotation {
    fn ner_start(&self) -> Option<usize> {
        self.ner_span().and_then(|s| s.start)
    }

    fn ner_end(&self) -> Option<usize> {
        self.ner_span().and_then(|s| s.end)
    }
}

impl NerBearing for CharAnnotation {
    fn ner_start(&self) -> Option<usize> {
        Some(self.start)
    }

    fn ner_end(&self) -> Option<usize> {
        Some(self.end)
    }
}

impl NerBearing for Value {
    fn ner_start(&self) -> Option<usize> {
        json_offset(self, "start")
    }

    fn ner_end(&self) -> Option<usize> {
        json_offset(self, "end")
    }
}

/// Whole, non-negative numbers only; `1.0` counts, `1.5` and `-1` do not.
fn json_offset(value: &Value, key: &str) -> Option<usize> {
    let n = value.get("ner")?.get(key)?;
    if let Some(u) = n.as_u64() {
        return usize::try_from(u).ok();
    }
    let f = n.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f < usize::MAX as f64).then_some(f as usize)
}

impl<T: NerBearing + ?Sized> NerBearing for &T {
    fn ner_start(&self) -> Option<usize> {
        (**self).ner_start()
    }

    fn ner_end(&self) -> Option<usize> {
        (**self).ner_end()
    }
}

// =============================================================================
// Sort / filter
// =============================================================================

/// Drop records without a start offset and stable-sort the rest by start.
///
/// Records with only a start are kept; duplicates are kept too (use
/// [`does_annotation_ner_already_exist`] before inserting).
#[must_use]
pub fn sort_and_filter_ner_by_start<T: NerBearing>(list: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = list.into_iter().filter(|r| r.ner_start().is_some()).collect();
    // `sort_by_key` is stable
    kept.sort_by_key(|r| r.ner_start());
    kept
}

/// [`sort_and_filter_ner_by_start`] over an untyped payload field.
///
/// Non-array values (including `null` for an absent optional field) are
/// returned unchanged.
#[must_use]
pub fn sort_and_filter_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(sort_and_filter_ner_by_start(items)),
        other => other,
    }
}

// =============================================================================
// Lookup
// =============================================================================

/// Whether some element of `list` is NER-equivalent to `candidate`.
#[must_use]
pub fn does_annotation_ner_already_exist(list: &[Annotation], candidate: &Annotation) -> bool {
    list.iter().any(|a| ner_equivalent(a, candidate))
}

/// Index of the first element NER-equivalent to `annotation`.
///
/// `None` when the list is empty or nothing matches; callers decide whether
/// a miss is fatal (drop a dangling relation) or ignorable (skip drawing).
#[must_use]
pub fn get_annotation_index(annotation: &Annotation, list: &[Annotation]) -> Option<usize> {
    list.iter().position(|a| ner_equivalent(a, annotation))
}

// =============================================================================
// Overlap
// =============================================================================

/// Half-open ranges intersect (touching ends do not count).
#[must_use]
pub const fn ranges_overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Whether `candidate`'s NER range intersects any valid NER range in `list`.
///
/// A candidate without both bounds overlaps nothing.
#[must_use]
pub fn overlaps_any_ner<T: NerBearing, C: NerBearing>(list: &[T], candidate: &C) -> bool {
    let Some(range) = candidate.ner_range() else {
        return false;
    };
    list.iter()
        .filter_map(|r| r.ner_range())
        .any(|other| ranges_overlap(range, other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_and_filter_drops_missing_start() {
        let out = sort_and_filter_value(json!([
            {"name": "bar"},
            {"name": "foo", "ner": {"start": 1}}
        ]));
        assert_eq!(out, json!([{"name": "foo", "ner": {"start": 1}}]));
    }

    #[test]
    fn test_sort_and_filter_accepts_whole_float_offsets() {
        let out = sort_and_filter_value(json!([
            {"ner": {"start": 3}},
            {"ner": {"start": 1.0}},
            {"ner": {"start": 1.5}},
            {"ner": {"start": -1.0}},
        ]));
        assert_eq!(out, json!([{"ner": {"start": 1.0}}, {"ner": {"start": 3}}]));
    }

    #[test]
    fn test_sort_and_filter_ascending() {
        let out = sort_and_filter_value(json!([{"ner": {"start": 2}}, {"ner": {"start": 1}}]));
        assert_eq!(out, json!([{"ner": {"start": 1}}, {"ner": {"start": 2}}]));
    }

    #[test]
    fn test_sort_is_stable() {
        let list = vec![
            Annotation::ner("B", 3, 9),
            Annotation::ner("A", 1, 2),
            Annotation::ner("C", 3, 4),
        ];
        let sorted = sort_and_filter_ner_by_start(list);
        let labels: Vec<_> = sorted.iter().filter_map(Annotation::label).collect();
        assert_eq!(labels, ["A", "B", "C"]);
    }

    #[test]
    fn test_sort_and_filter_passes_through_non_arrays() {
        assert_eq!(sort_and_filter_value(Value::Null), Value::Null);
        assert_eq!(sort_and_filter_value(json!({"a": 1})), json!({"a": 1}));
        assert_eq!(sort_and_filter_value(json!("x")), json!("x"));
    }

    #[test]
    fn test_negative_json_start_is_missing() {
        let out = sort_and_filter_value(json!([{"ner": {"start": -1}}]));
        assert_eq!(out, json!([]));
    }

    #[test]
    fn test_sort_drops_non_ner_annotations() {
        let list = vec![Annotation::classification("x"), Annotation::ner("A", 0, 1)];
        assert_eq!(sort_and_filter_ner_by_start(list).len(), 1);
    }

    #[test]
    fn test_lookup() {
        let list = vec![Annotation::ner("A", 0, 5), Annotation::ner("B", 6, 11)];
        assert!(does_annotation_ner_already_exist(&list, &Annotation::ner("Z", 6, 11)));
        assert!(!does_annotation_ner_already_exist(&list, &Annotation::ner("A", 0, 4)));
        assert_eq!(get_annotation_index(&Annotation::ner("B", 6, 11), &list), Some(1));
        assert_eq!(get_annotation_index(&Annotation::ner("B", 7, 11), &list), None);
        assert_eq!(get_annotation_index(&Annotation::ner("B", 6, 11), &[]), None);
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap((0, 5), (4, 8)));
        assert!(ranges_overlap((2, 3), (0, 10)));
        assert!(!ranges_overlap((0, 5), (5, 8)));
        assert!(!ranges_overlap((5, 8), (0, 5)));
    }

    #[test]
    fn test_overlaps_any_ner() {
        let list = vec![Annotation::ner("A", 0, 5), Annotation::classification("x")];
        assert!(overlaps_any_ner(&list, &Annotation::ner("B", 3, 7)));
        assert!(!overlaps_any_ner(&list, &Annotation::ner("B", 5, 7)));
        assert!(!overlaps_any_ner(&list, &Annotation::classification("A")));
    }
}
