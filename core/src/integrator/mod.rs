//! Integrator

mod common;

use crate::sampler::*;
use crate::scene::Scene;
use crate::spectrum::*;
use crate::geometry::*;

// Re-export.
pub use common::*;

/// Integrator interface. Integrators are shared read-only by all render
/// workers.
pub trait Integrator: Send + Sync {
    /// Preprocess the scene. Called once from `Scene::finish_initialization`.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `ray`     - The ray.
    fn li(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum;

    /// Returns the integrator name.
    fn name(&self) -> &'static str;
}
