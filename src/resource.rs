//! ResourceArc Wrappers
//!
//! Persistent state for parsed documents handed to the BEAM.

use rustler::ResourceArc;

use crate::error::ParseError;
use crate::index::{Node, OwnedDocument};

/// Wrapper for OwnedDocument that can be stored in a ResourceArc
///
/// Nodes are addressed from Elixir by record index and rebuilt on each call.
pub struct DocumentResource {
    /// Parsed once; read-only afterwards, so no lock is needed
    pub doc: OwnedDocument,
}

impl DocumentResource {
    /// Parse ONCE and keep the arena for later navigation
    pub fn parse(input: Vec<u8>) -> Result<Self, ParseError> {
        Ok(DocumentResource {
            doc: OwnedDocument::parse(input)?,
        })
    }

    /// Handle for the element record at `index`; `None` maps to `nil`
    pub fn node(&self, index: usize) -> Option<Node<'_>> {
        self.doc.node(index)
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
