//! Common

use crate::base::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;

/// Default number of bounces before Russian roulette starts.
pub const DEFAULT_RR_DEPTH: usize = 5;

/// Default safety cap on the number of bounces.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Highest survival probability used by Russian roulette.
const MAX_SURVIVAL_PROBABILITY: Float = 0.99;

/// A point where light scatters: a surface hit with its BSDF, or a point
/// inside a participating medium with its phase function.
#[derive(Copy, Clone)]
pub enum Scatter<'a> {
    Surface {
        /// The intersection.
        its: &'a Intersection,

        /// BSDF at the intersection.
        bsdf: &'a BSDF,

        /// Outgoing direction in the local shading frame.
        wo: Vector3f,
    },
    Medium {
        /// The medium interaction.
        mi: &'a MediumInteraction,
    },
}

/// The outcome of sampling a `Scatter`.
#[derive(Copy, Clone, Debug)]
pub struct ScatterSample {
    /// `f * |cos θi| / pdf` for surfaces, `p / pdf` for media.
    pub weight: Spectrum,

    /// World space incident direction.
    pub wi: Vector3f,

    /// Density of `wi` (discrete probability for delta lobes).
    pub pdf: Float,

    /// True if a delta lobe was sampled.
    pub is_delta: bool,
}

impl<'a> Scatter<'a> {
    /// Create a surface scattering point.
    ///
    /// * `its`  - The intersection.
    /// * `bsdf` - BSDF at the intersection.
    /// * `wo`   - World space outgoing direction.
    pub fn surface(its: &'a Intersection, bsdf: &'a BSDF, wo: &Vector3f) -> Self {
        Self::Surface {
            its,
            bsdf,
            wo: its.to_local(wo),
        }
    }

    /// Returns the position.
    pub fn p(&self) -> Point3f {
        match self {
            Self::Surface { its, .. } => its.p,
            Self::Medium { mi } => mi.p,
        }
    }

    /// Returns the time.
    pub fn time(&self) -> Float {
        match self {
            Self::Surface { its, .. } => its.time,
            Self::Medium { mi } => mi.time,
        }
    }

    /// Returns true if only delta lobes are present.
    pub fn is_delta(&self) -> bool {
        match self {
            Self::Surface { bsdf, .. } => bsdf.is_delta(),
            Self::Medium { .. } => false,
        }
    }

    /// Returns the medium a ray leaving in direction `wi` starts in.
    ///
    /// * `scene` - The scene.
    /// * `wi`    - World space direction.
    pub fn medium_towards(&self, scene: &Scene, wi: &Vector3f) -> Option<MediumId> {
        match self {
            Self::Surface { its, .. } => its.medium_towards(wi, &scene.shape(its.shape).medium_interface),
            Self::Medium { mi } => mi.medium,
        }
    }

    /// Returns `f * |cos θi|` (or the phase function value) and the density
    /// with which `sample` produces `wi`.
    ///
    /// * `wi` - World space incident direction.
    pub fn eval(&self, wi: &Vector3f) -> (Spectrum, Float) {
        match self {
            Self::Surface { its, bsdf, wo } => {
                let wi = its.to_local(wi);
                (bsdf.eval(wo, &wi) * abs_cos_theta(&wi), bsdf.pdf(wo, &wi))
            }
            Self::Medium { mi } => {
                let p = mi.phase.p(&mi.wo, wi);
                (Spectrum::new(p), mi.phase.pdf(&mi.wo, wi))
            }
        }
    }

    /// Sample an incident direction.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample(&self, u: &Point2f) -> Option<ScatterSample> {
        match self {
            Self::Surface { its, bsdf, wo } => {
                let (weight, bs) = bsdf.sample(wo, u)?;
                if bs.pdf == 0.0 || weight.is_black() {
                    return None;
                }
                Some(ScatterSample {
                    weight,
                    wi: its.to_world(&bs.wi),
                    pdf: bs.pdf,
                    is_delta: bs.is_delta(),
                })
            }
            Self::Medium { mi } => {
                let ps = mi.phase.sample_p(&mi.wo, u);
                if ps.pdf == 0.0 {
                    return None;
                }
                let p = mi.phase.p(&mi.wo, &ps.wi);
                Some(ScatterSample {
                    weight: Spectrum::new(p / ps.pdf),
                    wi: ps.wi,
                    pdf: ps.pdf,
                    is_delta: false,
                })
            }
        }
    }

    /// Spawn a ray leaving the scattering point.
    ///
    /// * `scene` - The scene.
    /// * `wi`    - World space direction.
    pub fn spawn_ray(&self, scene: &Scene, wi: &Vector3f) -> Ray {
        match self {
            Self::Surface { its, .. } => its.spawn_ray(wi, self.medium_towards(scene, wi)),
            Self::Medium { mi } => mi.spawn_ray(wi),
        }
    }
}

/// Returns the MIS weight of a strategy with density `pdf_a` combined with
/// one of density `pdf_b`, using the power heuristic.
///
/// * `pdf_a` - Density of the strategy being weighted.
/// * `pdf_b` - Density of the other strategy.
#[inline(always)]
pub fn mis_weight(pdf_a: Float, pdf_b: Float) -> Float {
    power_heuristic(1, pdf_a, 1, pdf_b)
}

/// Returns the density with which the BSDF or phase function at `scatter`
/// samples `wi`, for weighting a light sample. Zero if only delta lobes are
/// present.
///
/// * `scatter` - The scattering point.
/// * `wi`      - World space incident direction.
pub fn bsdf_pdf_for_mis(scatter: &Scatter, wi: &Vector3f) -> Float {
    if scatter.is_delta() {
        0.0
    } else {
        scatter.eval(wi).1
    }
}

/// Returns the light sampling density for reaching the emitter hit at `its`
/// from `ref_p` in direction `wi`.
///
/// * `scene` - The scene.
/// * `ref_p` - Reference point.
/// * `its`   - Intersection with the emitter.
/// * `wi`    - Unit direction from `ref_p` to the emitter.
pub fn light_pdf_at(scene: &Scene, ref_p: &Point3f, its: &Intersection, wi: &Vector3f) -> Float {
    let light = scene.shape(its.shape).light;
    if light.is_none() {
        return 0.0;
    }
    let ls = LightSample {
        p: its.p,
        n: its.n(),
        wi: *wi,
        dist: ref_p.distance(&its.p),
        pdf: 0.0,
        measure: Measure::SolidAngle,
        light,
    };
    scene.pdf_light(ref_p, &ls)
}

/// Estimate direct lighting at a scattering point by sampling a light. The
/// result is weighted against BSDF sampling with the power heuristic when
/// `use_mis` is set. Delta lights are never weighted.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `scatter`      - The scattering point.
/// * `handle_media` - Attenuate by media and pass through null boundaries.
/// * `use_mis`      - Apply the MIS weight.
pub fn sample_light_direct(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    scatter: &Scatter,
    handle_media: bool,
    use_mis: bool,
) -> Spectrum {
    let p = scatter.p();
    let (li, ls) = scene.sample_light(&p, sampler);
    if ls.pdf == 0.0 || li.is_black() {
        return Spectrum::ZERO;
    }

    let (f, _) = scatter.eval(&ls.wi);
    if f.is_black() {
        return Spectrum::ZERO;
    }

    let shadow_ray = ls.shadow_ray(&p, scatter.time(), scatter.medium_towards(scene, &ls.wi));
    let tr = if handle_media {
        scene.transmittance(&shadow_ray, sampler)
    } else if scene.ray_intersect_p(&shadow_ray) {
        Spectrum::ZERO
    } else {
        Spectrum::ONE
    };
    if tr.is_black() {
        return Spectrum::ZERO;
    }

    let weight = if ls.is_delta() || !use_mis {
        1.0
    } else {
        mis_weight(ls.pdf, bsdf_pdf_for_mis(scatter, &ls.wi))
    };
    f * li * tr * weight
}

/// Estimate direct lighting at a scattering point by sampling the BSDF or
/// phase function and looking for an emitter along the sampled direction.
/// The result is weighted against light sampling with the power heuristic
/// when `use_mis` is set and the sampled lobe is not a delta lobe.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `scatter`      - The scattering point.
/// * `handle_media` - Attenuate by media and pass through null boundaries.
/// * `use_mis`      - Apply the MIS weight.
pub fn sample_bsdf_direct(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    scatter: &Scatter,
    handle_media: bool,
    use_mis: bool,
) -> Spectrum {
    let ss = match scatter.sample(&sampler.get_2d()) {
        Some(ss) => ss,
        None => return Spectrum::ZERO,
    };

    let p = scatter.p();
    let mut ray = scatter.spawn_ray(scene, &ss.wi);
    let (its, tr) = if handle_media {
        scene.intersect_tr(&mut ray, sampler)
    } else {
        (scene.ray_intersect(&ray), Spectrum::ONE)
    };

    let (le, light_pdf) = match its {
        Some(its) => {
            let le = scene.le(&its, &-ss.wi);
            if le.is_black() {
                return Spectrum::ZERO;
            }
            (le, light_pdf_at(scene, &p, &its, &ss.wi))
        }
        None => {
            let le = scene.eval_env_light(&ray);
            if le.is_black() {
                return Spectrum::ZERO;
            }
            (le, scene.pdf_env_light(&p, &ss.wi))
        }
    };

    let weight = if ss.is_delta || !use_mis {
        1.0
    } else {
        mis_weight(ss.pdf, light_pdf)
    };
    ss.weight * le * tr * weight
}

/// Direct lighting estimate combining one light sample and one BSDF sample
/// with multiple importance sampling.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `scatter`      - The scattering point.
/// * `handle_media` - Attenuate by media and pass through null boundaries.
pub fn estimate_direct(scene: &Scene, sampler: &mut dyn Sampler, scatter: &Scatter, handle_media: bool) -> Spectrum {
    let mut ld = Spectrum::ZERO;
    if !scatter.is_delta() {
        ld += sample_light_direct(scene, sampler, scatter, handle_media, true);
    }
    ld += sample_bsdf_direct(scene, sampler, scatter, handle_media, true);
    ld
}

/// Estimate direct lighting from one light picked by the scene's light
/// selection distribution. The selection probability is already folded into
/// the light sample so no further scaling is needed.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `scatter`      - The scattering point.
/// * `handle_media` - Attenuate by media and pass through null boundaries.
pub fn uniform_sample_one_light(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    scatter: &Scatter,
    handle_media: bool,
) -> Spectrum {
    if scene.lights().is_empty() {
        return Spectrum::ZERO;
    }
    estimate_direct(scene, sampler, scatter, handle_media)
}

/// Find the first surface along the ray that scatters light, stepping over
/// passthrough boundaries without regard to the media between them. `ray` is
/// left as the last segment traced.
///
/// * `scene` - The scene.
/// * `ray`   - The ray; updated in place.
pub fn next_scattering_surface<'s>(scene: &'s Scene, ray: &mut Ray) -> Option<(Intersection, &'s BSDF)> {
    for _ in 0..MAX_PASSTHROUGH_CROSSINGS {
        let its = scene.ray_intersect(ray)?;
        let bsdf = scene.shape_bsdf(its.shape)?;
        if !bsdf.is_passthrough() {
            return Some((its, bsdf));
        }
        *ray = its.spawn_ray(&ray.d, None);
    }
    None
}

/// Apply Russian roulette once `depth` reaches `rr_depth`. Survival
/// probability is `min(max channel of throughput, 0.99)`; surviving paths
/// have their throughput divided by it. Returns `false` if the path is
/// terminated.
///
/// * `depth`      - Number of bounces so far.
/// * `rr_depth`   - Bounces before roulette starts.
/// * `throughput` - Path throughput; updated in place.
/// * `sampler`    - The sampler.
pub fn russian_roulette(depth: usize, rr_depth: usize, throughput: &mut Spectrum, sampler: &mut dyn Sampler) -> bool {
    if depth < rr_depth {
        return true;
    }
    let q = min(throughput.max_component_value(), MAX_SURVIVAL_PROBABILITY);
    if q <= 0.0 || sampler.get_1d() >= q {
        return false;
    }
    *throughput /= q;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::TestSampler;

    #[test]
    fn roulette_is_skipped_during_warm_up() {
        let mut sampler = TestSampler::new(0);
        let mut t = Spectrum::new(0.01);
        for depth in 0..DEFAULT_RR_DEPTH {
            assert!(russian_roulette(depth, DEFAULT_RR_DEPTH, &mut t, &mut sampler));
        }
        assert_eq!(t, Spectrum::new(0.01));
    }

    #[test]
    fn roulette_keeps_expectation() {
        let mut sampler = TestSampler::new(3);
        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let mut t = Spectrum::rgb(0.3, 0.5, 0.1);
            if russian_roulette(10, DEFAULT_RR_DEPTH, &mut t, &mut sampler) {
                sum += t[1];
            }
        }
        let mean = sum / n as Float;
        assert!((mean - 0.5).abs() < 0.01, "mean = {}", mean);
    }

    #[test]
    fn roulette_caps_survival() {
        let mut sampler = TestSampler::new(5);
        let mut survived = 0;
        for _ in 0..10_000 {
            let mut t = Spectrum::new(10.0);
            if russian_roulette(10, DEFAULT_RR_DEPTH, &mut t, &mut sampler) {
                survived += 1;
                assert!((t[0] - 10.0 / MAX_SURVIVAL_PROBABILITY).abs() < 1e-4);
            }
        }
        assert!(survived < 10_000);
    }

    #[test]
    fn black_throughput_terminates() {
        let mut sampler = TestSampler::new(0);
        let mut t = Spectrum::ZERO;
        assert!(!russian_roulette(10, DEFAULT_RR_DEPTH, &mut t, &mut sampler));
    }
}
