//! Samplers

#[macro_use]
extern crate log;

mod random;
mod stratified;

// Re-export.
pub use random::*;
pub use stratified::*;
