//! Word Arena Tree Module
//!
//! This module stores a parsed XML document as a single flat arena of
//! machine words, with every string kept as an (offset, length) span into
//! the original input. This enables:
//!
//! - **Zero-copy strings**: element names, attribute keys/values and text
//!   runs are slices of the input buffer.
//! - **One allocation**: the whole tree structure lives in one `Arc<[usize]>`
//!   shared by every node handle.
//! - **O(1) navigation**: an element's subtree is the contiguous record run
//!   ending at its children-end slot.
//!
//! ## Architecture
//!
//! ```text
//! EventScanner ---> TreeBuilder ---> WordArena ---> Arc<[usize]>
//!                                                        |
//!                                                        v
//!                                               Node { input, index, arena }
//! ```

pub mod arena;
pub mod builder;
pub mod document;
pub mod node;
pub mod record;
pub mod span;

// Re-export what's needed externally
pub use arena::{WordArena, DEFAULT_CAPACITY};
pub use builder::TreeBuilder;
pub use document::OwnedDocument;
pub use node::{Attributes, Children, Content, Contents, Node};
pub use span::Span;
