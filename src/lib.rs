//! RustyXML Arena - XML tree construction over a flat word arena
//!
//! Parses a byte buffer into an immutable tree whose structure lives in a
//! single `Arc<[usize]>` of tagged records, with every name, attribute and
//! text run returned as a zero-copy slice of the input.
//!
//! ```
//! use rustyxml_arena::{parse, Content};
//!
//! let root = parse(b"<a x=\"1\">hi<b/></a>").unwrap();
//! let a = root.children().next().unwrap();
//! assert_eq!(a.name(), b"a");
//! assert_eq!(a.attributes().collect::<Vec<_>>(), [(&b"x"[..], &b"1"[..])]);
//! assert_eq!(a.contents().next(), Some(Content::Text(b"hi")));
//! ```
//!
//! Layers:
//! - core: memchr scanner emitting structural events
//! - index: word arena, record encoding, tree builder and node handles
//! - nif (feature `nif`): Erlang NIF bindings

use log::debug;

pub mod core;
pub mod error;
pub mod index;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

pub use crate::core::event_scanner::{validate, EventHandler, EventScanner};
pub use error::ParseError;
pub use index::{Attributes, Children, Content, Contents, Node, OwnedDocument, Span, TreeBuilder, DEFAULT_CAPACITY};

// ============================================================================
// Allocator Configuration
// ============================================================================

// Installed only when building the NIF library
#[cfg(all(feature = "nif", feature = "mimalloc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Parse Options
// ============================================================================

/// Tunables for a parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Arena slots allocated up front; the arena doubles when exhausted
    pub initial_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse `input` into a tree and return its synthetic root
///
/// The root has an empty name; the document element is among its children.
pub fn parse(input: &[u8]) -> Result<Node<'_>, ParseError> {
    parse_with(input, &ParseOptions::default())
}

/// Parse `input` with explicit options
pub fn parse_with<'a>(input: &'a [u8], options: &ParseOptions) -> Result<Node<'a>, ParseError> {
    match index::builder::build_arena(input, options) {
        Ok(arena) => Ok(Node::root(input, arena)),
        Err(err) => {
            debug!("parse failed: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(nodes: impl Iterator<Item = Node<'a>>) -> Vec<&'a [u8]> {
        nodes.map(|node| node.name()).collect()
    }

    #[test]
    fn test_empty_element() {
        let root = parse(b"<a/>").unwrap();
        let children: Vec<_> = root.children().collect();
        assert_eq!(children.len(), 1);

        let a = &children[0];
        assert_eq!(a.name(), b"a");
        assert_eq!(a.attributes().count(), 0);
        assert_eq!(a.contents().count(), 0);
    }

    #[test]
    fn test_attribute_and_text() {
        let root = parse(b"<a x=\"1\">hi</a>").unwrap();
        let a = root.children().next().unwrap();

        assert_eq!(a.attributes().collect::<Vec<_>>(), [(&b"x"[..], &b"1"[..])]);
        assert_eq!(a.contents().collect::<Vec<_>>(), [Content::Text(b"hi")]);
    }

    #[test]
    fn test_mixed_content() {
        let root = parse(b"<a><b/>text<c/></a>").unwrap();
        let a = root.children().next().unwrap();

        assert_eq!(names(a.children()), [&b"b"[..], &b"c"[..]]);

        let contents: Vec<_> = a.contents().collect();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].as_element().map(Node::name), Some(&b"b"[..]));
        assert_eq!(contents[1], Content::Text(b"text"));
        assert_eq!(contents[2].as_element().map(Node::name), Some(&b"c"[..]));
    }

    #[test]
    fn test_nested() {
        let root = parse(b"<a><b><c/></b></a>").unwrap();
        let a = root.children().next().unwrap();
        let b = a.children().next().unwrap();
        let c = b.children().next().unwrap();
        assert_eq!(c.name(), b"c");
    }

    #[test]
    fn test_unmatched_close_fails() {
        assert!(matches!(
            parse(b"<a></a></b>"),
            Err(ParseError::UnmatchedClose { .. })
        ));
        assert!(matches!(
            parse(b"<a></b>"),
            Err(ParseError::MismatchedClose { .. })
        ));
        assert!(parse(b"</a>").is_err());
    }

    #[test]
    fn test_root_properties() {
        let xml = b"<?xml version=\"1.0\"?>\n<doc id=\"7\"><p>one</p><p>two</p></doc>\n";
        let root = parse(xml).unwrap();

        assert!(root.is_root());
        assert_eq!(root.name(), b"");
        assert_eq!(root.children_end(), root.arena().len());
        assert_eq!(root.contents().count(), 1);
    }

    #[test]
    fn test_children_are_element_contents() {
        let xml = b"<r>a<x k=\"1\">b<y/>c</x>d<![CDATA[e]]><z/></r>";
        let root = parse(xml).unwrap();

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let from_contents: Vec<_> = node
                .contents()
                .filter_map(|c| c.as_element().cloned())
                .collect();
            let children: Vec<_> = node.children().collect();
            assert_eq!(children, from_contents);
            stack.extend(children);
        }
    }

    #[test]
    fn test_traversal_is_idempotent() {
        let root = parse(b"<a k=\"v\">t<b/></a>").unwrap();
        let a = root.children().next().unwrap();

        let first = (
            a.name(),
            a.attributes().collect::<Vec<_>>(),
            a.children().collect::<Vec<_>>(),
            a.contents().collect::<Vec<_>>(),
        );
        let second = (
            a.name(),
            a.attributes().collect::<Vec<_>>(),
            a.children().collect::<Vec<_>>(),
            a.contents().collect::<Vec<_>>(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_slices_point_into_input() {
        let xml = b"<a key=\"val&amp;ue\">body</a>";
        let root = parse(xml).unwrap();
        let a = root.children().next().unwrap();
        let (key, value) = a.attributes().next().unwrap();

        assert_eq!(value, b"val&amp;ue");
        let range = xml.as_ptr_range();
        assert!(range.contains(&key.as_ptr()));
        assert!(range.contains(&value.as_ptr()));
    }

    #[test]
    fn test_cdata_and_text() {
        let root = parse(b"<a>x<![CDATA[<y>]]>z</a>").unwrap();
        let a = root.children().next().unwrap();
        assert_eq!(
            a.contents().collect::<Vec<_>>(),
            [
                Content::Text(b"x"),
                Content::CData(b"<y>"),
                Content::Text(b"z")
            ]
        );
        assert_eq!(a.text(), b"x<y>z");
    }

    #[test]
    fn test_parse_with_small_capacity() {
        let xml = b"<a><b x=\"1\" y=\"2\">t</b><c/></a>";
        let small = parse_with(xml, &ParseOptions { initial_capacity: 1 }).unwrap();
        let large = parse(xml).unwrap();
        assert_eq!(small.arena(), large.arena());
    }

    #[test]
    fn test_node_handles_shared_across_threads() {
        use rayon::prelude::*;

        let mut xml = String::from("<root>");
        for i in 0..64 {
            xml.push_str(&format!("<item n=\"{i}\">{i}</item>"));
        }
        xml.push_str("</root>");

        let root = parse(xml.as_bytes()).unwrap();
        let list = root.children().next().unwrap();
        let items: Vec<_> = list.children().collect();

        let values: Vec<String> = items
            .par_iter()
            .map(|item| String::from_utf8_lossy(item.attribute(b"n").unwrap_or(b"")).into_owned())
            .collect();
        let expected: Vec<String> = (0..64).map(|i| i.to_string()).collect();
        assert_eq!(values, expected);
    }
}
