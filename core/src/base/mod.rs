//! Numeric base shared by every crate in the renderer.

mod common;

// Re-export
pub use common::*;
