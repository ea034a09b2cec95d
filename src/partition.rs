//! Span partitioning: overlapping annotations → flat renderable segments.
//!
//! # Algorithm
//!
//! ```text
//! content:      H e l l o   W o r l d
//! offsets:      0         5 6       10 11
//! annotation A: [=========)              0..5
//! annotation B:             [==========) 6..11
//! highlight:    [===================)    0..10
//!
//! boundaries:   0, 5, 6, 10, 11
//! segments:     "Hello" " " "Worl" "d"
//!                  A         B      B
//!               first+last  first  last
//! ```
//!
//! 1. Collect every boundary: `0`, the content length, and each clamped
//!    start/end of every non-empty annotation and highlight.
//! 2. Sort and deduplicate; each consecutive pair is one segment.
//! 3. Sweep annotations (ascending start) across the segments, tagging each
//!    segment with the annotations that cover it and whether the segment is
//!    the first or last fragment of each.
//!
//! Concatenating segment values in order always reproduces the content.

use crate::equivalence::ner_equivalent;
use crate::interval::{ranges_overlap, sort_and_filter_ner_by_start};
use crate::offset::OffsetConverter;
use annotate_core::{Annotation, CharAnnotation, Highlight, MarkSegment, Relation};

/// A NER annotation clamped to the content, ready for the sweep.
struct ClampedSpan<'a> {
    start: usize,
    end: usize,
    annotation: &'a Annotation,
    has_relation: bool,
}

/// Partition `content` into marked segments.
///
/// * `annotations`: any mix of shapes; only valid NER spans produce marks.
/// * `highlights`: advisory ranges; a segment is highlighted when it
///   intersects any of them.
/// * `relations`: used only to flag annotations that are relation endpoints.
///
/// Offsets are char offsets. Ranges are clamped to the content; ranges that
/// are empty after clamping are ignored and add no boundaries. Empty content
/// yields no segments.
#[must_use]
pub fn split_content_to_annotation_marks(
    content: &str,
    annotations: &[Annotation],
    highlights: &[Highlight],
    relations: &[Relation],
) -> Vec<MarkSegment> {
    if content.is_empty() {
        return Vec::new();
    }

    let converter = OffsetConverter::new(content);
    let len = converter.char_len();
    let clamp = |start: usize, end: usize| {
        let (start, end) = (start.min(len), end.min(len));
        (start < end).then_some((start, end))
    };

    let spans: Vec<ClampedSpan<'_>> = sort_and_filter_ner_by_start(annotations.iter().collect::<Vec<_>>())
        .into_iter()
        .filter_map(|annotation| {
            let (start, end) = annotation.ner_bounds()?;
            let (start, end) = clamp(start, end)?;
            Some(ClampedSpan {
                start,
                end,
                annotation,
                has_relation: relations
                    .iter()
                    .any(|r| ner_equivalent(&r.src, annotation) || ner_equivalent(&r.dest, annotation)),
            })
        })
        .collect();

    let lit: Vec<(usize, usize)> = highlights
        .iter()
        .filter_map(|h| clamp(h.start, h.end))
        .collect();

    let mut boundaries: Vec<usize> = vec![0, len];
    boundaries.extend(spans.iter().flat_map(|s| [s.start, s.end]));
    boundaries.extend(lit.iter().flat_map(|&(s, e)| [s, e]));
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut segments = Vec::with_capacity(boundaries.len() - 1);
    let mut next = 0;
    let mut active: Vec<&ClampedSpan<'_>> = Vec::new();

    for window in boundaries.windows(2) {
        let (seg_start, seg_end) = (window[0], window[1]);

        // Every span start is a boundary, so spans enter exactly at their start
        while next < spans.len() && spans[next].start <= seg_start {
            active.push(&spans[next]);
            next += 1;
        }
        active.retain(|s| s.end > seg_start);

        let char_annotations = active
            .iter()
            .map(|s| CharAnnotation {
                start: s.start,
                end: s.end,
                value: s.annotation.value.clone(),
                is_first_mark: seg_start == s.start,
                is_last_mark: seg_end == s.end,
                has_relation: s.has_relation,
            })
            .collect();

        segments.push(MarkSegment {
            value: converter.slice(content, seg_start, seg_end).to_string(),
            is_highlight: lit.iter().any(|&h| ranges_overlap(h, (seg_start, seg_end))),
            char_annotations,
        });
    }

    segments
}

/// Concatenate segment values; the inverse of partitioning.
#[must_use]
pub fn join_segments(segments: &[MarkSegment]) -> String {
    segments.iter().map(|s| s.value.as_str()).collect()
}
