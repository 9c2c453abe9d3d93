//! Small scenes shared by the integrator tests.

use samplers::RandomSampler;
use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::integrator::*;
use tessera_core::light::*;
use tessera_core::medium::*;
use tessera_core::reflection::*;
use tessera_core::scene::*;
use tessera_core::shape::*;
use tessera_core::spectrum::*;

/// An independent sampler.
pub fn sampler(seed: u64) -> RandomSampler {
    RandomSampler::new(1, seed)
}

fn diffuse_unit_sphere(scene: &mut Scene, albedo: Float) -> Option<ShapeId> {
    let bsdf = scene.add_bsdf(BSDF::Diffuse(DiffuseBSDF::new(Spectrum::new(albedo))))?;
    scene.add_shape(Shape::new(ShapeKind::Sphere(Sphere::new(Point3f::ZERO, 1.0))).with_bsdf(bsdf))
}

/// Ray from `(0, 0, 10)` straight at the top of a unit sphere.
fn ray_at_top() -> Ray {
    Ray::new(Point3f::new(0.0, 0.0, 10.0), Vector3f::new(0.0, 0.0, -1.0))
}

/// A diffuse unit sphere lit by a point light 4 units above its top.
/// Returns the scene, a ray hitting the top and the radiance it carries.
pub fn point_lit_sphere(albedo: Float, intensity: Float) -> (Scene, Ray, Float) {
    let mut scene = Scene::new();
    diffuse_unit_sphere(&mut scene, albedo);
    scene.add_light(Light::Point(PointLight::new(
        Point3f::new(0.0, 0.0, 5.0),
        Spectrum::new(intensity),
    )));
    scene.finish_initialization();
    (scene, ray_at_top(), albedo * INV_PI * intensity / 16.0)
}

/// A diffuse unit sphere inside a constant white environment.
pub fn furnace(albedo: Float) -> (Scene, Ray) {
    let mut scene = Scene::new();
    diffuse_unit_sphere(&mut scene, albedo);
    scene.add_light(Light::ConstantEnvironment(ConstantEnvironmentLight::new(Spectrum::ONE)));
    scene.finish_initialization();
    (scene, ray_at_top())
}

/// A black unit sphere that emits `radiance`.
pub fn area_lit_sphere(radiance: Float) -> (Scene, Ray, Float) {
    let mut scene = Scene::new();
    if let Some(shape) = diffuse_unit_sphere(&mut scene, 0.0) {
        scene.add_area_light(shape, Spectrum::new(radiance));
    }
    scene.finish_initialization();
    (scene, ray_at_top(), radiance)
}

/// A unit ball of homogeneous medium bounded by a passthrough surface under
/// a constant white environment.
pub fn medium_ball(sigma_a: Float, sigma_s: Float, phase: PhaseFunction) -> (Scene, Ray) {
    let mut scene = Scene::new();
    let medium = scene.add_medium(Medium::Homogeneous(HomogeneousMedium::new(
        Spectrum::new(sigma_a),
        Spectrum::new(sigma_s),
        phase,
    )));
    if let Some(null) = scene.add_bsdf(BSDF::Null) {
        scene.add_shape(
            Shape::new(ShapeKind::Sphere(Sphere::new(Point3f::ZERO, 1.0)))
                .with_bsdf(null)
                .with_medium_interface(MediumInterface::new(medium, None)),
        );
    }
    scene.add_light(Light::ConstantEnvironment(ConstantEnvironmentLight::new(Spectrum::ONE)));
    scene.finish_initialization();
    (scene, ray_at_top())
}

/// A unit ball of purely absorbing medium.
pub fn absorbing_ball(sigma_a: Float) -> (Scene, Ray) {
    medium_ball(sigma_a, 0.0, PhaseFunction::Isotropic)
}

/// The point-lit sphere of `point_lit_sphere` seen from `(0, 0, 2)`, with a
/// black ball of radius 0.5 at `(0, 0, 3.5)` between its top and the light
/// when `blocked` is set. Returns the scene, a ray hitting the top and the
/// radiance it carries without the blocker.
pub fn shadowed_sphere(albedo: Float, intensity: Float, blocked: bool) -> (Scene, Ray, Float) {
    let mut scene = Scene::new();
    diffuse_unit_sphere(&mut scene, albedo);
    if blocked {
        if let Some(black) = scene.add_bsdf(BSDF::Diffuse(DiffuseBSDF::new(Spectrum::ZERO))) {
            scene.add_shape(
                Shape::new(ShapeKind::Sphere(Sphere::new(Point3f::new(0.0, 0.0, 3.5), 0.5))).with_bsdf(black),
            );
        }
    }
    scene.add_light(Light::Point(PointLight::new(
        Point3f::new(0.0, 0.0, 5.0),
        Spectrum::new(intensity),
    )));
    scene.finish_initialization();
    let ray = Ray::new(Point3f::new(0.0, 0.0, 2.0), Vector3f::new(0.0, 0.0, -1.0));
    (scene, ray, albedo * INV_PI * intensity / 16.0)
}

/// Average of the first channel of `n` radiance estimates.
pub fn mean_radiance(integrator: &dyn Integrator, scene: &Scene, ray: &Ray, n: usize, seed: u64) -> Float {
    let mut sampler = sampler(seed);
    let sum: f64 = (0..n).map(|_| integrator.li(scene, &mut sampler, ray)[0] as f64).sum();
    (sum / n as f64) as Float
}
