//! Record Encoding
//!
//! Layout of the tagged, fixed-width records stored in the word arena.
//! Every record starts with a discriminator slot:
//!
//! ```text
//! Element    [ELEMENT, name_off, name_len, children_end]         4 slots
//! Attribute  [ATTRIBUTE, key_off, key_len, value_off, value_len] 5 slots
//! Text       [TEXT, off, len]                                    3 slots
//! CData      [CDATA, off, len]                                   3 slots
//! ```
//!
//! `children_end` is the record index one past the element's last
//! descendant record.

use super::arena::WordArena;
use super::span::Span;
use crate::error::ParseError;

/// Discriminator values
pub mod tag {
    pub const ELEMENT: usize = 0;
    pub const TEXT: usize = 1;
    pub const ATTRIBUTE: usize = 2;
    pub const CDATA: usize = 3;
}

/// Slots occupied by an element header
pub const ELEMENT_WIDTH: usize = 4;
/// Slots occupied by an attribute pair
pub const ATTRIBUTE_WIDTH: usize = 5;
/// Slots occupied by a text or CDATA run
pub const TEXT_WIDTH: usize = 3;

/// Offset of the children-end slot within an element record
pub const CHILDREN_END_SLOT: usize = 3;

/// Children-end placeholder for elements that are still open
pub const UNSET: usize = 0;

/// A decoded record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Element { name: Span, children_end: usize },
    Attribute { key: Span, value: Span },
    Text(Span),
    CData(Span),
}

impl Record {
    /// Number of arena slots this record occupies
    #[inline]
    pub const fn width(&self) -> usize {
        match self {
            Record::Element { .. } => ELEMENT_WIDTH,
            Record::Attribute { .. } => ATTRIBUTE_WIDTH,
            Record::Text(_) | Record::CData(_) => TEXT_WIDTH,
        }
    }

    /// Decode the record starting at `index`
    ///
    /// Returns `None` for an unknown discriminator or a record that runs
    /// past the end of `words`.
    pub fn decode(words: &[usize], index: usize) -> Option<Record> {
        let slot = |offset: usize| words.get(index.checked_add(offset)?).copied();

        match slot(0)? {
            tag::ELEMENT => Some(Record::Element {
                name: Span::new(slot(1)?, slot(2)?),
                children_end: slot(CHILDREN_END_SLOT)?,
            }),
            tag::ATTRIBUTE => Some(Record::Attribute {
                key: Span::new(slot(1)?, slot(2)?),
                value: Span::new(slot(3)?, slot(4)?),
            }),
            tag::TEXT => Some(Record::Text(Span::new(slot(1)?, slot(2)?))),
            tag::CDATA => Some(Record::CData(Span::new(slot(1)?, slot(2)?))),
            _ => None,
        }
    }

    /// Write this record into `arena` at `index`
    ///
    /// The caller reserves `self.width()` slots first.
    pub fn encode(&self, arena: &mut WordArena, index: usize) -> Result<(), ParseError> {
        match *self {
            Record::Element { name, children_end } => arena.write(
                index,
                &[tag::ELEMENT, name.offset, name.len, children_end],
            ),
            Record::Attribute { key, value } => arena.write(
                index,
                &[tag::ATTRIBUTE, key.offset, key.len, value.offset, value.len],
            ),
            Record::Text(span) => arena.write(index, &[tag::TEXT, span.offset, span.len]),
            Record::CData(span) => arena.write(index, &[tag::CDATA, span.offset, span.len]),
        }
    }
}
