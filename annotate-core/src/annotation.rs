//! Annotation records, relations, and highlights.
//!
//! # Shapes
//!
//! Backend payloads distinguish annotation shapes by which keys are present:
//!
//! ```text
//! { "value": "PER", "ner": { "start": 0, "end": 5 } }      NER span
//! { "value": "car", "zone": [{ "x": 0.1, "y": 0.2 }, ..] } polygon zone
//! { "value": "summary", "text": "free-form answer" }       free text
//! { "value": "positive" }                                  classification
//! ```
//!
//! The shape is decided once, at ingestion, and carried as [`Shape`] from
//! then on. Dispatch order is `ner`, then `zone`, then `text`; a record with
//! both `ner` and `value` is a NER span, never a classification.

use crate::error::{Error, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

// ============================================================================
// Origin
// ============================================================================

/// Where an annotation in the working set came from.
///
/// Only annotations accepted from a prediction can be retracted by the
/// suggest-only reconciliation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Part of the persisted annotation set.
    #[default]
    Stored,
    /// Inserted by accepting a model prediction.
    AcceptedPrediction,
}

impl Origin {
    /// Returns true for [`Origin::Stored`].
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        matches!(self, Origin::Stored)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Origin::Stored => "stored",
            Origin::AcceptedPrediction => "accepted-prediction",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// Character offsets of a NER span, half-open `[start, end)`.
///
/// Either bound may be missing in a partially formed payload. Such a span is
/// kept (sorting only needs `start`) but is never treated as valid NER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NerSpan {
    /// Start char offset (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End char offset (exclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl NerSpan {
    /// Create a span with both bounds.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds, if present.
    #[must_use]
    pub const fn bounds(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// The shape-specific payload of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Character span over the item's text content.
    Ner(NerSpan),
    /// Ordered polygon vertices over the item's image.
    Zone(Vec<Point>),
    /// Free-form text answer.
    Text(String),
    /// Label toggle with no positional payload.
    Classification,
}

impl Shape {
    /// Shape name, for logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Shape::Ner(_) => "ner",
            Shape::Zone(_) => "zone",
            Shape::Text(_) => "text",
            Shape::Classification => "classification",
        }
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// One annotation record of a task.
///
/// `value` is the task/label identifier. Well-formed payloads always carry
/// it; it stays optional so that partial backend records can be ingested
/// and then fail to match, rather than fail to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnnotation", into = "RawAnnotation")]
pub struct Annotation {
    /// Task/label identifier
    pub value: Option<String>,
    /// Shape-specific payload
    pub shape: Shape,
    /// Provenance within the working set
    pub origin: Origin,
}

impl Annotation {
    /// Create a NER span annotation.
    #[must_use]
    pub fn ner(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value: Some(value.into()),
            shape: Shape::Ner(NerSpan::new(start, end)),
            origin: Origin::Stored,
        }
    }

    /// Create a zone annotation.
    #[must_use]
    pub fn zone(value: impl Into<String>, vertices: Vec<Point>) -> Self {
        Self {
            value: Some(value.into()),
            shape: Shape::Zone(vertices),
            origin: Origin::Stored,
        }
    }

    /// Create a free-text annotation.
    #[must_use]
    pub fn text(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            shape: Shape::Text(text.into()),
            origin: Origin::Stored,
        }
    }

    /// Create a classification annotation.
    #[must_use]
    pub fn classification(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            shape: Shape::Classification,
            origin: Origin::Stored,
        }
    }

    /// Return a copy with a different origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Ingest a backend payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for non-object input and for zone
    /// vertices with non-finite coordinates, and [`Error::Json`] when a
    /// present field has the wrong type.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_input(format!(
                "annotation must be a JSON object, got {}",
                json_kind(value)
            )));
        }
        let raw: RawAnnotation = serde_json::from_value(value.clone())?;
        Self::try_from(raw)
    }

    /// Whether this record can be identified by the equivalence rules.
    ///
    /// A NER record needs both bounds with `start < end`; every other shape
    /// needs a label. Records that fail this never match anything, not even
    /// themselves.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match &self.shape {
            Shape::Ner(span) => span.bounds().is_some_and(|(start, end)| start < end),
            _ => self.value.is_some(),
        }
    }

    /// NER span payload, if this is a NER annotation (valid or partial).
    #[must_use]
    pub fn ner_span(&self) -> Option<&NerSpan> {
        match &self.shape {
            Shape::Ner(span) => Some(span),
            _ => None,
        }
    }

    /// NER bounds, only when both are present.
    #[must_use]
    pub fn ner_bounds(&self) -> Option<(usize, usize)> {
        self.ner_span().and_then(NerSpan::bounds)
    }

    /// Zone vertices, if this is a zone annotation.
    #[must_use]
    pub fn zone_vertices(&self) -> Option<&[Point]> {
        match &self.shape {
            Shape::Zone(vertices) => Some(vertices),
            _ => None,
        }
    }

    /// Free text, if this is a text annotation.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Label, if present.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// Wire shape
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ner: Option<NerSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zone: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Origin::is_stored")]
    origin: Origin,
}

impl TryFrom<RawAnnotation> for Annotation {
    type Error = Error;

    fn try_from(raw: RawAnnotation) -> Result<Self> {
        let shape = if let Some(span) = raw.ner {
            Shape::Ner(span)
        } else if let Some(vertices) = raw.zone {
            if let Some(i) = vertices.iter().position(|p| !p.is_finite()) {
                return Err(Error::invalid_input(format!(
                    "zone vertex {i} has a non-finite coordinate"
                )));
            }
            Shape::Zone(vertices)
        } else if let Some(text) = raw.text {
            Shape::Text(text)
        } else {
            Shape::Classification
        };

        Ok(Self {
            value: raw.value,
            shape,
            origin: raw.origin,
        })
    }
}

impl From<Annotation> for RawAnnotation {
    fn from(annotation: Annotation) -> Self {
        let mut raw = RawAnnotation {
            value: annotation.value,
            origin: annotation.origin,
            ..Default::default()
        };
        match annotation.shape {
            Shape::Ner(span) => raw.ner = Some(span),
            Shape::Zone(vertices) => raw.zone = Some(vertices),
            Shape::Text(text) => raw.text = Some(text),
            Shape::Classification => {}
        }
        raw
    }
}

// ============================================================================
// Relation
// ============================================================================

/// A directed, labeled link between two NER annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation label
    pub value: String,
    /// Source annotation (tail of the arrow)
    pub src: Annotation,
    /// Destination annotation (head of the arrow)
    pub dest: Annotation,
}

impl Relation {
    /// Create a relation.
    #[must_use]
    pub fn new(value: impl Into<String>, src: Annotation, dest: Annotation) -> Self {
        Self {
            value: value.into(),
            src,
            dest,
        }
    }

    /// Ingest a backend relation payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for non-object input and
    /// [`Error::Json`] for missing or mistyped fields.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_input(format!(
                "relation must be a JSON object, got {}",
                json_kind(value)
            )));
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

// ============================================================================
// Highlight
// ============================================================================

/// An advisory scored range over the content (e.g. model attention).
///
/// Highlights only affect rendering; they never own or alter annotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Start char offset (inclusive)
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
    /// Signal strength in `[0, 1]`
    pub score: f64,
}

impl Highlight {
    /// Create a highlight; the score is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(start: usize, end: usize, score: f64) -> Self {
        Self {
            start,
            end,
            score: if score.is_nan() {
                0.0
            } else {
                score.clamp(0.0, 1.0)
            },
        }
    }
}
