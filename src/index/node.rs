//! Node Handle and Traversal
//!
//! A `Node` is a record index into a frozen word arena plus the input bytes
//! it refers to. Every traversal is a bounded scan over the element's
//! descendant run `[index + ELEMENT_WIDTH, children_end)`; sibling elements
//! are reached by jumping to each child's own children-end.

use std::fmt;
use std::sync::Arc;

use super::builder::ROOT;
use super::record::{Record, ATTRIBUTE_WIDTH, ELEMENT_WIDTH, TEXT_WIDTH};
use super::span::Span;

/// Handle to an element in a parsed document
///
/// Cloning bumps a reference count; the arena is released when the last
/// handle referencing it is dropped.
#[derive(Clone)]
pub struct Node<'a> {
    input: &'a [u8],
    index: usize,
    arena: Arc<[usize]>,
}

/// One entry of an element's mixed content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    Element(Node<'a>),
    Text(&'a [u8]),
    CData(&'a [u8]),
}

impl<'a> Content<'a> {
    /// The element, if this entry is one
    pub fn as_element(&self) -> Option<&Node<'a>> {
        match self {
            Content::Element(node) => Some(node),
            _ => None,
        }
    }
}

impl<'a> Node<'a> {
    /// Root handle over a freshly frozen arena
    pub(crate) fn root(input: &'a [u8], arena: Arc<[usize]>) -> Self {
        Self {
            input,
            index: ROOT,
            arena,
        }
    }

    /// Rebuild a handle for the element record at `index`
    ///
    /// Returns `None` unless `index` is the start of an element record
    /// reachable from the root. Slots inside text or attribute records can
    /// hold the element discriminator, so the tag alone is not enough: the
    /// walk descends from the root into whichever child's run covers
    /// `index` until it lands on it exactly.
    pub fn from_parts(input: &'a [u8], arena: Arc<[usize]>, index: usize) -> Option<Self> {
        let mut node = Self::root(input, arena);
        while node.index != index {
            let next = node
                .children()
                .find(|child| child.index <= index && index < child.children_end())?;
            node = next;
        }
        Some(node)
    }

    /// Record index of this element; stable node identity
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// True for the synthetic document root
    #[inline]
    pub fn is_root(&self) -> bool {
        self.index == ROOT
    }

    /// The frozen arena this handle reads from
    #[inline]
    pub fn arena(&self) -> &Arc<[usize]> {
        &self.arena
    }

    /// Decode this node's header as (name, bounded children-end)
    fn header(&self) -> (Span, usize) {
        match Record::decode(&self.arena, self.index) {
            Some(Record::Element { name, children_end }) => {
                (name, children_end.min(self.arena.len()))
            }
            _ => (Span::empty(), self.index),
        }
    }

    /// Record index one past this element's last descendant record
    pub fn children_end(&self) -> usize {
        self.header().1
    }

    /// Element name; empty for the synthetic root
    pub fn name(&self) -> &'a [u8] {
        self.header().0.slice(self.input)
    }

    /// Attributes as raw `(key, value)` slices, in document order
    pub fn attributes(&self) -> Attributes<'a, '_> {
        Attributes {
            input: self.input,
            words: &self.arena,
            pos: self.index + ELEMENT_WIDTH,
            end: self.children_end(),
        }
    }

    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &[u8]) -> Option<&'a [u8]> {
        self.attributes()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Record index of the first non-attribute record
    fn first_content_index(&self) -> usize {
        let end = self.children_end();
        let mut pos = self.index + ELEMENT_WIDTH;
        while pos < end {
            match Record::decode(&self.arena, pos) {
                Some(Record::Attribute { .. }) => pos += ATTRIBUTE_WIDTH,
                _ => break,
            }
        }
        pos
    }

    /// Mixed content in document order: child elements and text runs
    pub fn contents(&self) -> Contents<'a, '_> {
        Contents {
            node: self,
            pos: self.first_content_index(),
            end: self.children_end(),
        }
    }

    /// Child elements in document order
    pub fn children(&self) -> Children<'a, '_> {
        Children {
            contents: self.contents(),
        }
    }

    /// Concatenation of every descendant text and CDATA run
    pub fn text(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let end = self.children_end();
        let mut pos = self.index + ELEMENT_WIDTH;

        while pos < end {
            let Some(record) = Record::decode(&self.arena, pos) else {
                break;
            };
            if let Record::Text(span) | Record::CData(span) = record {
                out.extend_from_slice(span.slice(self.input));
            }
            pos += record.width();
        }
        out
    }

    fn child(&self, index: usize) -> Node<'a> {
        Node {
            input: self.input,
            index,
            arena: Arc::clone(&self.arena),
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && Arc::ptr_eq(&self.arena, &other.arena)
            && std::ptr::eq(self.input, other.input)
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("name", &String::from_utf8_lossy(self.name()))
            .finish()
    }
}

/// Iterator over an element's attributes
pub struct Attributes<'a, 'n> {
    input: &'a [u8],
    words: &'n [usize],
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Attributes<'a, '_> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        match Record::decode(self.words, self.pos) {
            Some(Record::Attribute { key, value }) => {
                self.pos += ATTRIBUTE_WIDTH;
                Some((key.slice(self.input), value.slice(self.input)))
            }
            _ => {
                self.pos = self.end;
                None
            }
        }
    }
}

/// Iterator over an element's mixed content
pub struct Contents<'a, 'n> {
    node: &'n Node<'a>,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Contents<'a, '_> {
    type Item = Content<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let input = self.node.input;
        match Record::decode(&self.node.arena, self.pos) {
            // A child must end past its own header, or the walk would not advance
            Some(Record::Element { children_end, .. }) if children_end > self.pos => {
                let child = self.node.child(self.pos);
                self.pos = children_end;
                Some(Content::Element(child))
            }
            Some(Record::Text(span)) => {
                self.pos += TEXT_WIDTH;
                Some(Content::Text(span.slice(input)))
            }
            Some(Record::CData(span)) => {
                self.pos += TEXT_WIDTH;
                Some(Content::CData(span.slice(input)))
            }
            _ => {
                self.pos = self.end;
                None
            }
        }
    }
}

/// Iterator over an element's child elements
pub struct Children<'a, 'n> {
    contents: Contents<'a, 'n>,
}

impl<'a> Iterator for Children<'a, '_> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.contents.find_map(|content| match content {
            Content::Element(node) => Some(node),
            _ => None,
        })
    }
}
