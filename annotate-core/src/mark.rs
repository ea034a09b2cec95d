//! Renderable mark segments produced by span partitioning.

use serde::{Deserialize, Serialize};

/// One NER annotation's presence inside a [`MarkSegment`].
///
/// An annotation cut by other boundaries appears once per segment it covers;
/// `is_first_mark` / `is_last_mark` tell a renderer where its full range
/// begins and ends so adjacent fragments can be drawn as one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharAnnotation {
    /// Annotation start char offset (clamped to the content)
    pub start: usize,
    /// Annotation end char offset (clamped to the content)
    pub end: usize,
    /// Annotation label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// This segment begins at the annotation's start
    pub is_first_mark: bool,
    /// This segment ends at the annotation's end
    pub is_last_mark: bool,
    /// The annotation is an endpoint of at least one relation
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_relation: bool,
}

/// A contiguous, non-overlapping fragment of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSegment {
    /// The content slice
    pub value: String,
    /// The slice intersects at least one highlight
    pub is_highlight: bool,
    /// NER annotations covering the slice, in ascending start order
    pub char_annotations: Vec<CharAnnotation>,
}

impl MarkSegment {
    /// Whether any annotation covers this segment.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        !self.char_annotations.is_empty()
    }
}
