//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod aggregate;
pub mod app;
pub mod base;
pub mod camera;
pub mod film;
pub mod filter;
pub mod geometry;
pub mod image_io;
pub mod integrator;
pub mod interaction;
pub mod light;
pub mod medium;
pub mod microfacet;
pub mod paramset;
pub mod ray_tracer;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
