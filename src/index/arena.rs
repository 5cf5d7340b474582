//! Growable Word Arena
//!
//! Flat buffer of machine words that holds every tree record. The arena is
//! written front to back by the builder and frozen into a shared,
//! immutable slice once construction completes.

use std::sync::Arc;

use log::trace;

use crate::error::ParseError;

/// Initial number of slots, large enough that small documents never grow
pub const DEFAULT_CAPACITY: usize = 1000;

/// Mutable word arena used during construction
///
/// Every slot below `capacity()` is addressable; growth preserves contents
/// so record indices handed out earlier stay valid.
#[derive(Debug)]
pub struct WordArena {
    words: Vec<usize>,
}

impl WordArena {
    /// Create an arena with `DEFAULT_CAPACITY` zeroed slots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an arena with `capacity` zeroed slots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.max(1)],
        }
    }

    /// Number of addressable slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// All slots, used or not
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.words
    }

    /// Make room for `extra` slots past `len`
    ///
    /// Doubles the capacity, or grows straight to the requested size when
    /// doubling is not enough.
    pub fn ensure_capacity(&mut self, len: usize, extra: usize) -> Result<(), ParseError> {
        let needed = len.checked_add(extra).ok_or(ParseError::IndexOutOfRange {
            index: len,
            len: self.words.len(),
        })?;
        let capacity = self.words.len();
        if needed <= capacity {
            return Ok(());
        }

        let grown = capacity.saturating_mul(2).max(needed);
        trace!("word arena grown from {} to {} slots", capacity, grown);
        self.words.resize(grown, 0);
        Ok(())
    }

    /// Read the slot at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Result<usize, ParseError> {
        self.words
            .get(index)
            .copied()
            .ok_or(ParseError::IndexOutOfRange {
                index,
                len: self.words.len(),
            })
    }

    /// Write `value` into the slot at `index`
    #[inline]
    pub fn set(&mut self, index: usize, value: usize) -> Result<(), ParseError> {
        let len = self.words.len();
        let slot = self
            .words
            .get_mut(index)
            .ok_or(ParseError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Write `values` into consecutive slots starting at `index`
    pub fn write(&mut self, index: usize, values: &[usize]) -> Result<(), ParseError> {
        let len = self.words.len();
        let end = index
            .checked_add(values.len())
            .filter(|&end| end <= len)
            .ok_or(ParseError::IndexOutOfRange { index, len })?;
        self.words[index..end].copy_from_slice(values);
        Ok(())
    }

    /// Slice the arena to `len` used slots and make it immutable
    pub fn freeze(mut self, len: usize) -> Result<Arc<[usize]>, ParseError> {
        if len > self.words.len() {
            return Err(ParseError::IndexOutOfRange {
                index: len,
                len: self.words.len(),
            });
        }
        self.words.truncate(len);
        Ok(Arc::from(self.words))
    }
}

impl Default for WordArena {
    fn default() -> Self {
        Self::new()
    }
}
