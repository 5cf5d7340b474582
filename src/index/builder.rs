//! Tree Builder
//!
//! Builds the word arena from XML parsing events.
//! Implements the EventHandler trait for use with EventScanner.
//!
//! Records are appended strictly left to right. Open elements are tracked on
//! an auxiliary stack; an element's children-end slot is patched when its
//! close event arrives.

use std::sync::Arc;

use log::debug;

use super::arena::WordArena;
use super::record::{Record, CHILDREN_END_SLOT, UNSET};
use super::span::Span;
use crate::core::event_scanner::{EventHandler, EventScanner};
use crate::error::ParseError;
use crate::ParseOptions;

/// Record index of the synthetic root element
pub const ROOT: usize = 0;

/// Builder state for constructing the word arena
///
/// The first fault poisons the builder: later events return the same error
/// and `finish` reports it, so no partially built tree escapes.
pub struct TreeBuilder<'a> {
    /// Original input bytes, used to name unclosed elements in errors
    input: &'a [u8],
    /// Arena being filled
    arena: WordArena,
    /// Next free record index
    size: usize,
    /// Record indices of open elements, innermost last
    open: Vec<usize>,
    /// First fault seen
    error: Option<ParseError>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder with the default arena capacity
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_capacity(input, ParseOptions::default().initial_capacity)
    }

    /// Create a builder whose arena starts with `capacity` slots
    pub fn with_capacity(input: &'a [u8], capacity: usize) -> Self {
        let mut builder = Self {
            input,
            arena: WordArena::with_capacity(capacity),
            size: 0,
            open: Vec::with_capacity(32),
            error: None,
        };

        let root = Record::Element {
            name: Span::empty(),
            children_end: UNSET,
        };
        match builder.push(root) {
            Ok(index) => builder.open.push(index),
            Err(err) => builder.error = Some(err),
        }
        builder
    }

    /// Next free record index
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of open elements, not counting the synthetic root
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len().saturating_sub(1)
    }

    /// Current parent element record index
    #[inline]
    fn current_parent(&self) -> Option<usize> {
        self.open.last().copied()
    }

    /// Finish building and return the frozen arena
    pub fn finish(mut self) -> Result<Arc<[usize]>, ParseError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        if self.open.len() > 1 {
            let name = self
                .current_parent()
                .and_then(|index| match Record::decode(self.arena.as_slice(), index) {
                    Some(Record::Element { name, .. }) => Some(name),
                    _ => None,
                })
                .unwrap_or_default();
            return Err(ParseError::UnclosedElement {
                name: String::from_utf8_lossy(name.slice(self.input)).into_owned(),
            });
        }

        self.arena.set(ROOT + CHILDREN_END_SLOT, self.size)?;
        debug!(
            "tree built: {} arena words for {} input bytes",
            self.size,
            self.input.len()
        );
        self.arena.freeze(self.size)
    }

    /// Reserve room for `record` at `size`, write it, and return its index
    fn push(&mut self, record: Record) -> Result<usize, ParseError> {
        let index = self.size;
        let width = record.width();
        self.arena.ensure_capacity(index, width)?;
        record.encode(&mut self.arena, index)?;
        self.size = index + width;
        Ok(index)
    }

    /// Return the stored fault, if any
    #[inline]
    fn check(&self) -> Result<(), ParseError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Remember the first fault so later calls and `finish` report it
    fn poison<T>(&mut self, result: Result<T, ParseError>) -> Result<T, ParseError> {
        if let Err(err) = &result {
            self.error.get_or_insert_with(|| err.clone());
        }
        result
    }

    fn open_element(&mut self, name: Span) -> Result<(), ParseError> {
        let index = self.push(Record::Element {
            name,
            children_end: UNSET,
        })?;
        self.open.push(index);
        Ok(())
    }

    fn close_element(&mut self) -> Result<(), ParseError> {
        if self.open.len() <= 1 {
            return Err(ParseError::UnbalancedClose);
        }
        let index = self.open.pop().ok_or(ParseError::UnbalancedClose)?;
        self.arena.set(index + CHILDREN_END_SLOT, self.size)
    }
}

// ============================================================================
// EventHandler Implementation
// ============================================================================

impl<'a> EventHandler for TreeBuilder<'a> {
    fn element_open(&mut self, name: Span) -> Result<(), ParseError> {
        self.check()?;
        let result = self.open_element(name);
        self.poison(result)
    }

    fn attribute(&mut self, key: Span, value: Span) -> Result<(), ParseError> {
        self.check()?;
        let result = self.push(Record::Attribute { key, value }).map(drop);
        self.poison(result)
    }

    fn text(&mut self, span: Span) -> Result<(), ParseError> {
        self.check()?;
        let result = self.push(Record::Text(span)).map(drop);
        self.poison(result)
    }

    fn cdata(&mut self, span: Span) -> Result<(), ParseError> {
        self.check()?;
        let result = self.push(Record::CData(span)).map(drop);
        self.poison(result)
    }

    fn element_close(&mut self) -> Result<(), ParseError> {
        self.check()?;
        let result = self.close_element();
        self.poison(result)
    }
}

// ============================================================================
// Build Functions
// ============================================================================

/// Scan `input` and build its frozen word arena
pub fn build_arena(input: &[u8], options: &ParseOptions) -> Result<Arc<[usize]>, ParseError> {
    let mut builder = TreeBuilder::with_capacity(input, options.initial_capacity);
    let mut scanner = EventScanner::new(input);
    scanner.scan(&mut builder)?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::record::{tag, ATTRIBUTE_WIDTH, ELEMENT_WIDTH, TEXT_WIDTH};

    fn build(xml: &[u8]) -> Arc<[usize]> {
        build_arena(xml, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_build_empty_document() {
        let words = build(b"");
        assert_eq!(&words[..], &[tag::ELEMENT, 0, 0, ELEMENT_WIDTH]);
    }

    #[test]
    fn test_build_simple() {
        let xml = b"<a x=\"1\">hi</a>";
        let words = build(xml);

        #[rustfmt::skip]
        let expected = [
            // root
            tag::ELEMENT, 0, 0, 16,
            // <a>
            tag::ELEMENT, 1, 1, 16,
            // x="1"
            tag::ATTRIBUTE, 3, 1, 6, 1,
            // hi
            tag::TEXT, 9, 2,
        ];
        assert_eq!(&words[..], &expected);
    }

    #[test]
    fn test_children_end_covers_subtree() {
        let words = build(b"<a><b><c/></b><d/></a>");
        // root, a, b, c, d
        assert_eq!(words.len(), 5 * ELEMENT_WIDTH);
        assert_eq!(words[CHILDREN_END_SLOT], words.len());
        // a spans everything after the root
        assert_eq!(words[ELEMENT_WIDTH + CHILDREN_END_SLOT], words.len());
        // b ends right after c
        assert_eq!(words[2 * ELEMENT_WIDTH + CHILDREN_END_SLOT], 4 * ELEMENT_WIDTH);
    }

    #[test]
    fn test_driven_directly() {
        let input = b"ab";
        let mut builder = TreeBuilder::new(input);
        builder.element_open(Span::new(0, 1)).unwrap();
        builder.attribute(Span::new(0, 1), Span::new(1, 1)).unwrap();
        builder.element_open_end().unwrap();
        builder.text(Span::new(1, 1)).unwrap();
        assert_eq!(builder.depth(), 1);
        builder.element_close().unwrap();
        assert_eq!(builder.depth(), 0);

        let size = builder.size();
        assert_eq!(size, 2 * ELEMENT_WIDTH + ATTRIBUTE_WIDTH + TEXT_WIDTH);
        let words = builder.finish().unwrap();
        assert_eq!(words.len(), size);
    }

    #[test]
    fn test_unbalanced_close_poisons() {
        let mut builder = TreeBuilder::new(b"");
        assert_eq!(builder.element_close(), Err(ParseError::UnbalancedClose));
        assert_eq!(
            builder.text(Span::new(0, 0)),
            Err(ParseError::UnbalancedClose)
        );
        assert_eq!(builder.finish(), Err(ParseError::UnbalancedClose));
    }

    #[test]
    fn test_unclosed_element() {
        let input = b"item";
        let mut builder = TreeBuilder::new(input);
        builder.element_open(Span::new(0, 4)).unwrap();
        assert_eq!(
            builder.finish(),
            Err(ParseError::UnclosedElement {
                name: "item".to_string()
            })
        );
    }

    #[test]
    fn test_growth_matches_presized() {
        let mut xml = String::from("<list>");
        for i in 0..200 {
            xml.push_str(&format!("<item id=\"{i}\">value {i}<![CDATA[raw]]></item>"));
        }
        xml.push_str("</list>");

        let grown = build_arena(xml.as_bytes(), &ParseOptions { initial_capacity: 1 }).unwrap();
        let presized = build_arena(
            xml.as_bytes(),
            &ParseOptions {
                initial_capacity: 1 << 16,
            },
        )
        .unwrap();
        assert_eq!(grown, presized);
    }
}
