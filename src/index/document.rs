//! Owned Document
//!
//! Input bytes and frozen arena held together with no borrowed lifetime,
//! so a parsed tree can outlive the call that produced it. Nodes are handed
//! out by record index.

use std::sync::Arc;

use super::builder::build_arena;
use super::node::Node;
use crate::error::ParseError;
use crate::ParseOptions;

/// A parsed document that owns its input
pub struct OwnedDocument {
    /// Original input bytes; every span in the arena points into these
    input: Vec<u8>,
    /// Frozen word arena
    arena: Arc<[usize]>,
}

impl OwnedDocument {
    /// Parse `input` and take ownership of it
    pub fn parse(input: Vec<u8>) -> Result<Self, ParseError> {
        Self::parse_with(input, &ParseOptions::default())
    }

    /// Parse `input` with explicit options
    pub fn parse_with(input: Vec<u8>, options: &ParseOptions) -> Result<Self, ParseError> {
        let arena = build_arena(&input, options)?;
        Ok(Self { input, arena })
    }

    /// Handle for the synthetic root
    pub fn root(&self) -> Node<'_> {
        Node::root(&self.input, Arc::clone(&self.arena))
    }

    /// Handle for the element record at `index`, if there is one
    pub fn node(&self, index: usize) -> Option<Node<'_>> {
        Node::from_parts(&self.input, Arc::clone(&self.arena), index)
    }
}
