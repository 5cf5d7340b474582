//! Parse errors
//!
//! A single error type covers every way construction can fail: malformed
//! input reported by the scanner, an unbalanced event stream reaching the
//! builder, or arena index arithmetic leaving the valid range.

use thiserror::Error;

/// Failure returned by [`crate::parse`] and the tree builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The scanner rejected the input
    #[error("malformed XML at byte {position}: {message}")]
    Malformed {
        message: &'static str,
        position: usize,
    },

    /// A closing tag (or close event) with no open element
    #[error("unmatched closing tag at byte {position}")]
    UnmatchedClose { position: usize },

    /// A close event reached the builder with only the root open
    #[error("close event with no open element")]
    UnbalancedClose,

    /// A closing tag whose name differs from the innermost open element
    #[error("closing tag `{found}` at byte {position} does not match open element `{expected}`")]
    MismatchedClose {
        expected: String,
        found: String,
        position: usize,
    },

    /// Input ended while an element was still open
    #[error("element `{name}` is never closed")]
    UnclosedElement { name: String },

    /// Record arithmetic addressed a slot outside the arena
    #[error("arena index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ParseError {
    pub(crate) fn malformed(message: &'static str, position: usize) -> Self {
        ParseError::Malformed { message, position }
    }

    /// Byte offset in the input where the failure was detected, if known
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Malformed { position, .. }
            | ParseError::UnmatchedClose { position }
            | ParseError::MismatchedClose { position, .. } => Some(*position),
            ParseError::UnbalancedClose
            | ParseError::UnclosedElement { .. }
            | ParseError::IndexOutOfRange { .. } => None,
        }
    }
}
