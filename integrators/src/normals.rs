//! Normals Integrator

use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Debug integrator that shows the shading normal of the first visible
/// surface mapped from [-1, 1] to [0, 1].
#[derive(Default)]
pub struct NormalsIntegrator {}

impl Integrator for NormalsIntegrator {
    fn li(&self, scene: &Scene, _sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        let mut ray = *ray;
        match next_scattering_surface(scene, &mut ray) {
            Some((its, _)) => {
                let n = its.sh_frame.n;
                Spectrum::rgb(n.x + 1.0, n.y + 1.0, n.z + 1.0) * 0.5
            }
            None => Spectrum::ZERO,
        }
    }

    fn name(&self) -> &'static str {
        "normals"
    }
}

impl From<&ParamSet> for NormalsIntegrator {
    fn from(_params: &ParamSet) -> Self {
        Self::default()
    }
}
