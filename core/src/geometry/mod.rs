//! Geometry

mod bounds2;
mod bounds3;
mod frame;
mod point2;
mod ray;
mod vector3;

// Re-export
pub use bounds2::*;
pub use bounds3::*;
pub use frame::*;
pub use point2::*;
pub use ray::*;
pub use vector3::*;
