//! Spectrum

mod rgb;

// Re-export
pub use rgb::*;
