//! Integrators

#[macro_use]
extern crate log;

mod ao;
mod direct_lighting;
mod normals;
mod path;
mod path_mis;
mod volpath;

#[cfg(test)]
mod test_scenes;

// Re-export.
pub use ao::*;
pub use direct_lighting::*;
pub use normals::*;
pub use path::*;
pub use path_mis::*;
pub use volpath::*;
