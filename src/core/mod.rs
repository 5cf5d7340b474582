//! Core XML scanning primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - EventScanner: EventHandler-based scanner feeding the tree builder

pub mod event_scanner;
pub mod scanner;
