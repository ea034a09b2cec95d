//! # annotate
//!
//! Annotation reconciliation for human labeling tools.
//!
//! - **Equivalence**: when two annotation records denote the same mark
//! - **Partitioning**: content + overlapping spans → flat renderable segments
//! - **Reconciliation**: merge model predictions under a prefill or suggest-only policy
//! - **Relation integrity**: removing an annotation removes the relations that reference it
//!
//! Core types (`Annotation`, `Relation`, `MarkSegment`, ...) live in
//! `annotate-core` and are re-exported here.
//!
//! ## Quick Start
//!
//! ```rust
//! use annotate::{split_content_to_annotation_marks, Annotation, Highlight};
//!
//! let content = "Hello World";
//! let annotations = [Annotation::ner("GREETING", 0, 5), Annotation::ner("PLACE", 6, 11)];
//! let highlights = [Highlight::new(0, 10, 0.8)];
//!
//! let segments = split_content_to_annotation_marks(content, &annotations, &highlights, &[]);
//! let values: Vec<&str> = segments.iter().map(|s| s.value.as_str()).collect();
//! assert_eq!(values, ["Hello", " ", "Worl", "d"]);
//! assert!(!segments[3].is_highlight);
//! ```
//!
//! Everything in this crate is synchronous and pure: operations take values
//! and return new values, with no I/O and no shared state.

#![warn(missing_docs)]

pub mod color;
pub mod config;
pub mod equivalence;
pub mod interval;
pub mod item;
pub mod offset;
pub mod partition;
pub mod reconcile;
pub mod relations;
pub mod workflow;

// Re-export core types
pub use annotate_core::{
    geometry, Annotation, BoundingBox, CharAnnotation, Error, Highlight, MarkSegment, NerSpan,
    Origin, Point, Relation, Result, Shape,
};

pub use color::{palette_color, task_color, task_colors};
pub use config::{ProjectConfig, TaskConfig, TaskKind};
pub use equivalence::{
    classification_equivalent, is_annotation_ner, ner_equivalent,
    prediction_equivalent_to_annotation, relation_equivalent, same_mark, text_equivalent,
    zone_equivalent,
};
pub use interval::{
    does_annotation_ner_already_exist, get_annotation_index, overlaps_any_ner, ranges_overlap,
    sort_and_filter_ner_by_start, sort_and_filter_value, NerBearing,
};
pub use item::ItemAnnotations;
pub use offset::{OffsetConverter, OffsetUnit};
pub use partition::{join_segments, split_content_to_annotation_marks};
pub use reconcile::{reconcile, ReconcilePolicy};
pub use relations::{prune_dangling_relations, relations_involving, remove_annotation};
pub use workflow::{LoadedItem, NavigationStep, NavigationTicket, Navigator};
