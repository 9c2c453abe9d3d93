//! The API

#[macro_use]
extern crate log;

mod builder;
mod error;
mod registry;

// Re-export.
pub use builder::*;
pub use error::*;
pub use registry::*;
pub use tessera_core::paramset::ParamSet;
