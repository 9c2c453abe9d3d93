//! Camera

#[macro_use]
extern crate log;

mod common;
mod orthographic_camera;
mod perspective_camera;

// Re-export
pub use common::*;
pub use orthographic_camera::*;
pub use perspective_camera::*;
