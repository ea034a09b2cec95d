//! Char / UTF-16 / byte offset handling.
//!
//! # Coordinate Systems
//!
//! ```text
//! Text: "Zoë 🌍 ok"
//!
//!   char   Z  o  ë     🌍      o  k        what the engine stores
//!          0  1  2  3  4    5  6  7
//!
//!   utf16  Z  o  ë     🌍      o  k        what a browser selection reports
//!          0  1  2  3  4-5  6  7  8
//!
//!   byte   Z  o  ë     🌍      o  k        what `str` slicing needs
//!          0  1  2-3 4 5-8  9  10 11
//! ```
//!
//! Annotation and highlight offsets are char offsets. Payloads captured in a
//! browser carry UTF-16 offsets and are converted once at ingestion with
//! [`annotation_to_char_offsets`]. Slicing converts char offsets to byte
//! offsets through [`OffsetConverter`].
//!
//! Every conversion clamps out-of-range input to the text length.

use annotate_core::{Annotation, NerSpan, Relation, Shape};
use serde::{Deserialize, Serialize};

/// Unit in which a payload expresses its NER offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    /// Unicode scalar values (Rust `char`s).
    #[default]
    Char,
    /// UTF-16 code units (JavaScript string indices).
    Utf16,
}

/// Number of chars in `text`.
#[must_use]
pub fn char_count(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

/// Convert a char range to a byte range, clamping to the text.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let converter = OffsetConverter::new(text);
    (
        converter.char_to_byte(char_start),
        converter.char_to_byte(char_end),
    )
}

/// Convert a UTF-16 range to a char range.
///
/// An offset that falls between the two halves of a surrogate pair maps to
/// the char containing it.
#[must_use]
pub fn utf16_to_chars(text: &str, utf16_start: usize, utf16_end: usize) -> (usize, usize) {
    let converter = OffsetConverter::new(text);
    (
        converter.utf16_to_char(utf16_start),
        converter.utf16_to_char(utf16_end),
    )
}

/// Convert a char range to a UTF-16 range.
#[must_use]
pub fn chars_to_utf16(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let converter = OffsetConverter::new(text);
    (
        converter.char_to_utf16(char_start),
        converter.char_to_utf16(char_end),
    )
}

// =============================================================================
// Offset Converter (batch operations)
// =============================================================================

/// Converter for many offsets over the same text.
///
/// Pre-computes mapping tables so each conversion is O(1). ASCII text skips
/// the tables entirely, since all three coordinate systems coincide.
#[derive(Debug, Clone)]
pub struct OffsetConverter {
    /// `char_to_byte[i]` is the byte offset of char `i`; last entry is `text.len()`
    char_to_byte: Vec<usize>,
    /// `char_to_utf16[i]` is the UTF-16 offset of char `i`; last entry is the UTF-16 length
    char_to_utf16: Vec<usize>,
    ascii_len: Option<usize>,
}

impl OffsetConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                char_to_byte: Vec::new(),
                char_to_utf16: Vec::new(),
                ascii_len: Some(text.len()),
            };
        }

        let mut char_to_byte = Vec::with_capacity(text.len() + 1);
        let mut char_to_utf16 = Vec::with_capacity(text.len() + 1);
        let mut utf16 = 0;
        for (byte_idx, ch) in text.char_indices() {
            char_to_byte.push(byte_idx);
            char_to_utf16.push(utf16);
            utf16 += ch.len_utf16();
        }
        char_to_byte.push(text.len());
        char_to_utf16.push(utf16);

        Self {
            char_to_byte,
            char_to_utf16,
            ascii_len: None,
        }
    }

    /// Length of the text in chars.
    #[must_use]
    pub fn char_len(&self) -> usize {
        match self.ascii_len {
            Some(len) => len,
            None => self.char_to_byte.len() - 1,
        }
    }

    /// Convert a char offset to a byte offset.
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        match self.ascii_len {
            Some(len) => char_idx.min(len),
            None => self.char_to_byte[char_idx.min(self.char_len())],
        }
    }

    /// Convert a char offset to a UTF-16 offset.
    #[must_use]
    pub fn char_to_utf16(&self, char_idx: usize) -> usize {
        match self.ascii_len {
            Some(len) => char_idx.min(len),
            None => self.char_to_utf16[char_idx.min(self.char_len())],
        }
    }

    /// Convert a UTF-16 offset to a char offset.
    #[must_use]
    pub fn utf16_to_char(&self, utf16_idx: usize) -> usize {
        match self.ascii_len {
            Some(len) => utf16_idx.min(len),
            // Index of the last char starting at or before `utf16_idx`
            None => self
                .char_to_utf16
                .partition_point(|&u| u <= utf16_idx)
                .saturating_sub(1),
        }
    }

    /// Slice `text` by a char range. `text` must be the text this converter was built from.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str, char_start: usize, char_end: usize) -> &'a str {
        let start = self.char_to_byte(char_start);
        let end = self.char_to_byte(char_end).max(start);
        &text[start..end]
    }
}

// =============================================================================
// Annotation conversion
// =============================================================================

/// Re-express an annotation's NER offsets in chars.
///
/// Non-NER annotations and partial spans pass through unchanged (present
/// bounds are still converted).
#[must_use]
pub fn annotation_to_char_offsets(annotation: &Annotation, text: &str, unit: OffsetUnit) -> Annotation {
    annotation_with_converter(annotation, &OffsetConverter::new(text), unit)
}

/// Re-express both relation endpoints in chars.
#[must_use]
pub fn relation_to_char_offsets(relation: &Relation, text: &str, unit: OffsetUnit) -> Relation {
    let converter = OffsetConverter::new(text);
    Relation {
        value: relation.value.clone(),
        src: annotation_with_converter(&relation.src, &converter, unit),
        dest: annotation_with_converter(&relation.dest, &converter, unit),
    }
}

pub(crate) fn annotation_with_converter(
    annotation: &Annotation,
    converter: &OffsetConverter,
    unit: OffsetUnit,
) -> Annotation {
    match (unit, &annotation.shape) {
        (OffsetUnit::Utf16, Shape::Ner(span)) => Annotation {
            shape: Shape::Ner(NerSpan {
                start: span.start.map(|s| converter.utf16_to_char(s)),
                end: span.end.map(|e| converter.utf16_to_char(e)),
            }),
            ..annotation.clone()
        },
        _ => annotation.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
