//! # annotate-core
//!
//! Core types for the annotate workspace: the data model shared by the
//! reconciliation engine and anything that stores or renders its output.
//!
//! This crate provides:
//! - **Annotations**: `Annotation`, `Shape`, `NerSpan`, `Origin`
//! - **Links and signals**: `Relation`, `Highlight`
//! - **Zone geometry**: `Point`, `BoundingBox`, polygon helpers
//! - **Partition output**: `MarkSegment`, `CharAnnotation`

#![warn(missing_docs)]

pub mod annotation;
pub mod error;
pub mod geometry;
pub mod mark;

pub use annotation::{Annotation, Highlight, NerSpan, Origin, Relation, Shape};
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Point};
pub use mark::{CharAnnotation, MarkSegment};
