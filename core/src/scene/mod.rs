//! Scene

mod id;

use crate::aggregate::*;
use crate::base::*;
use crate::camera::*;
use crate::filter::*;
use crate::geometry::*;
use crate::integrator::*;
use crate::interaction::*;
use crate::light::*;
use crate::medium::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::sampling::*;
use crate::shape::*;
use crate::spectrum::*;
use std::fmt;

// Re-export
pub use id::*;

/// Upper bound on the number of passthrough surfaces crossed by a single
/// transmittance query.
pub const MAX_PASSTHROUGH_CROSSINGS: usize = 256;

/// How `Scene::sample_light` picks a light.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LightSampleStrategy {
    /// Every light with equal probability `1 / N`.
    #[default]
    Uniform,

    /// Proportional to the luminance of each light's emitted power.
    Power,
}

/// Sole owner of every scene object. Objects are added while the scene is
/// being built; `finish_initialization()` is the single mutation barrier
/// after which the scene is read-only and can be shared by all render
/// workers.
pub struct Scene {
    /// Shape arena.
    shapes: Vec<Shape>,

    /// BSDF arena.
    bsdfs: Vec<BSDF>,

    /// Light arena.
    lights: Vec<Light>,

    /// Medium arena.
    media: Vec<Medium>,

    /// Camera.
    camera: Option<Box<dyn Camera>>,

    /// Integrator.
    integrator: Option<Box<dyn Integrator>>,

    /// Prototype sampler cloned by every render worker.
    sampler: Option<Box<dyn Sampler>>,

    /// Image reconstruction filter.
    filter: Option<Box<dyn Filter>>,

    /// Ray-intersection service.
    aggregate: Option<Box<dyn Aggregate>>,

    /// Light selection strategy.
    light_strategy: LightSampleStrategy,

    /// Light selection distribution.
    light_distribution: Distribution1D,

    /// The environment light seen by escaping rays.
    env_light: Option<LightId>,

    /// Bounds of the scene geometry.
    world_bound: Bounds3f,

    /// Set by `finish_initialization()`.
    initialized: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            shapes: vec![],
            bsdfs: vec![],
            lights: vec![],
            media: vec![],
            camera: None,
            integrator: None,
            sampler: None,
            filter: None,
            aggregate: None,
            light_strategy: LightSampleStrategy::Uniform,
            light_distribution: Distribution1D::new(vec![]),
            env_light: None,
            world_bound: Bounds3f::empty(),
            initialized: false,
        }
    }

    /// Returns `true` if the scene may still be modified; otherwise logs a
    /// warning and returns `false`.
    ///
    /// * `what` - Description of the attempted modification.
    fn check_mutable(&self, what: &str) -> bool {
        if self.initialized {
            warn!("Ignoring {} after the scene was initialized", what);
        }
        !self.initialized
    }

    /// Add a shape. Returns `None` once the scene is initialized.
    ///
    /// * `shape` - The shape.
    pub fn add_shape(&mut self, mut shape: Shape) -> Option<ShapeId> {
        if !self.check_mutable("add_shape") {
            return None;
        }
        if let Some(bsdf) = shape.bsdf {
            if bsdf.index() >= self.bsdfs.len() {
                warn!("Shape references unknown {}; using the default BSDF", bsdf);
                shape.bsdf = None;
            }
        }
        self.shapes.push(shape);
        Some(ShapeId::from(self.shapes.len() - 1))
    }

    /// Add a BSDF. Returns `None` once the scene is initialized.
    ///
    /// * `bsdf` - The BSDF.
    pub fn add_bsdf(&mut self, bsdf: BSDF) -> Option<BsdfId> {
        if !self.check_mutable("add_bsdf") {
            return None;
        }
        self.bsdfs.push(bsdf);
        Some(BsdfId::from(self.bsdfs.len() - 1))
    }

    /// Add a medium. Returns `None` once the scene is initialized.
    ///
    /// * `medium` - The medium.
    pub fn add_medium(&mut self, medium: Medium) -> Option<MediumId> {
        if !self.check_mutable("add_medium") {
            return None;
        }
        self.media.push(medium);
        Some(MediumId::from(self.media.len() - 1))
    }

    /// Add a light. Area lights are attached to their shape and environment
    /// lights become the light seen by escaping rays. Returns `None` once the
    /// scene is initialized or if an area light references an unknown shape
    /// or a shape that already emits.
    ///
    /// * `light` - The light.
    pub fn add_light(&mut self, light: Light) -> Option<LightId> {
        if !self.check_mutable("add_light") {
            return None;
        }
        let id = LightId::from(self.lights.len());

        if let Some(shape_id) = light.shape() {
            match self.shapes.get_mut(shape_id.index()) {
                Some(shape) if shape.light.is_none() => shape.light = Some(id),
                Some(_) => {
                    warn!("{} already has an emitter; ignoring area light", shape_id);
                    return None;
                }
                None => {
                    warn!("Area light references unknown {}", shape_id);
                    return None;
                }
            }
        }

        if light.is_environment() {
            if let Some(old) = self.env_light {
                warn!("Replacing environment {} with {}", old, id);
            }
            self.env_light = Some(id);
        }

        self.lights.push(light);
        Some(id)
    }

    /// Attach a uniform area emitter to a shape.
    ///
    /// * `shape`    - The shape.
    /// * `radiance` - Emitted radiance.
    pub fn add_area_light(&mut self, shape: ShapeId, radiance: Spectrum) -> Option<LightId> {
        self.add_light(Light::Area(AreaLight::new(shape, radiance)))
    }

    /// Set the camera.
    ///
    /// * `camera` - The camera.
    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        if self.check_mutable("set_camera") {
            self.camera = Some(camera);
        }
    }

    /// Set the integrator.
    ///
    /// * `integrator` - The integrator.
    pub fn set_integrator(&mut self, integrator: Box<dyn Integrator>) {
        if self.check_mutable("set_integrator") {
            self.integrator = Some(integrator);
        }
    }

    /// Set the prototype sampler.
    ///
    /// * `sampler` - The sampler.
    pub fn set_sampler(&mut self, sampler: Box<dyn Sampler>) {
        if self.check_mutable("set_sampler") {
            self.sampler = Some(sampler);
        }
    }

    /// Set the reconstruction filter.
    ///
    /// * `filter` - The filter.
    pub fn set_filter(&mut self, filter: Box<dyn Filter>) {
        if self.check_mutable("set_filter") {
            self.filter = Some(filter);
        }
    }

    /// Set the ray-intersection service. It must have been built over the
    /// shapes currently in the scene.
    ///
    /// * `aggregate` - The aggregate.
    pub fn set_aggregate(&mut self, aggregate: Box<dyn Aggregate>) {
        if self.check_mutable("set_aggregate") {
            self.aggregate = Some(aggregate);
        }
    }

    /// Set the light selection strategy.
    ///
    /// * `strategy` - The strategy.
    pub fn set_light_strategy(&mut self, strategy: LightSampleStrategy) {
        if self.check_mutable("set_light_strategy") {
            self.light_strategy = strategy;
        }
    }

    /// Freeze the scene. Assigns the default BSDF to shapes without one,
    /// builds the default aggregate if none was set, preprocesses lights,
    /// builds the light selection distribution and preprocesses the
    /// integrator. Calling it again is a no-op.
    pub fn finish_initialization(&mut self) {
        if self.initialized {
            warn!("Scene is already initialized");
            return;
        }

        if self.shapes.iter().any(|s| s.bsdf.is_none()) {
            self.bsdfs.push(BSDF::default());
            let default_bsdf = BsdfId::from(self.bsdfs.len() - 1);
            for shape in self.shapes.iter_mut().filter(|s| s.bsdf.is_none()) {
                shape.bsdf = Some(default_bsdf);
            }
        }

        let aggregate = self
            .aggregate
            .take()
            .unwrap_or_else(|| Box::new(LinearAggregate::new(&self.shapes)));
        self.world_bound = aggregate.bounds();
        self.aggregate = Some(aggregate);

        for light in self.lights.iter_mut() {
            light.preprocess(&self.world_bound);
        }

        let weights: Vec<Float> = match self.light_strategy {
            LightSampleStrategy::Uniform => vec![1.0; self.lights.len()],
            LightSampleStrategy::Power => self
                .lights
                .iter()
                .map(|l| l.power(&self.shapes).y().max(0.0))
                .collect(),
        };
        self.light_distribution = Distribution1D::new(weights);
        self.light_distribution.normalize();

        if self.lights.is_empty() {
            warn!("Scene has no lights");
        }
        if self.camera.is_none() {
            warn!("Scene has no camera");
        }

        if let Some(mut integrator) = self.integrator.take() {
            integrator.preprocess(self);
            self.integrator = Some(integrator);
        }

        self.initialized = true;
        info!("{}", self);
    }

    /// Returns true once `finish_initialization()` ran.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the shapes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Returns a shape.
    ///
    /// * `id` - The shape id.
    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.index()]
    }

    /// Returns the BSDF of a shape.
    ///
    /// * `id` - The shape id.
    pub fn shape_bsdf(&self, id: ShapeId) -> Option<&BSDF> {
        self.shapes[id.index()].bsdf.map(|b| &self.bsdfs[b.index()])
    }

    /// Returns the lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Returns a light.
    ///
    /// * `id` - The light id.
    pub fn light(&self, id: LightId) -> &Light {
        &self.lights[id.index()]
    }

    /// Returns a medium.
    ///
    /// * `id` - The medium id.
    pub fn medium(&self, id: MediumId) -> &Medium {
        &self.media[id.index()]
    }

    /// Returns the number of media.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Returns the camera.
    pub fn camera(&self) -> Option<&dyn Camera> {
        self.camera.as_deref()
    }

    /// Returns the camera for changing the image size.
    pub fn camera_mut(&mut self) -> Option<&mut (dyn Camera + 'static)> {
        self.camera.as_deref_mut()
    }

    /// Returns the integrator.
    pub fn integrator(&self) -> Option<&dyn Integrator> {
        self.integrator.as_deref()
    }

    /// Returns the prototype sampler.
    pub fn sampler(&self) -> Option<&dyn Sampler> {
        self.sampler.as_deref()
    }

    /// Returns the reconstruction filter.
    pub fn filter(&self) -> Option<&dyn Filter> {
        self.filter.as_deref()
    }

    /// Returns the bounds of the scene geometry.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }

    /// Returns the environment light, if any.
    pub fn env_light(&self) -> Option<&Light> {
        self.env_light.map(|id| &self.lights[id.index()])
    }

    /// Builds the intersection record for a hit.
    ///
    /// * `shape` - The shape that was hit.
    /// * `hit`   - Geometric hit data.
    /// * `ray`   - The ray.
    fn make_intersection(shape: ShapeId, hit: &ShapeHit, ray: &Ray) -> Intersection {
        Intersection {
            t: hit.t,
            p: hit.p,
            uv: hit.uv,
            sh_frame: Frame::from_normal_tangent(&hit.ns, &hit.dpdu),
            geo_frame: Frame::from_normal_tangent(&hit.n, &hit.dpdu),
            shape,
            time: ray.time,
        }
    }

    /// Returns the nearest surface hit along the ray.
    ///
    /// * `ray` - The ray.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Intersection> {
        let aggregate = self.aggregate.as_ref()?;
        aggregate
            .intersect(&self.shapes, ray)
            .map(|(id, hit)| Self::make_intersection(id, &hit, ray))
    }

    /// Returns true if anything blocks the ray. Used for shadow tests.
    ///
    /// * `ray` - The ray.
    pub fn ray_intersect_p(&self, ray: &Ray) -> bool {
        match self.aggregate.as_ref() {
            Some(aggregate) => aggregate.intersect_p(&self.shapes, ray),
            None => false,
        }
    }

    /// Returns the radiance emitted from the surface at `its` towards `w`.
    ///
    /// * `its` - The intersection.
    /// * `w`   - Outgoing direction.
    pub fn le(&self, its: &Intersection, w: &Vector3f) -> Spectrum {
        match self.shapes[its.shape.index()].light {
            Some(id) => self.lights[id.index()].le(&its.n(), w),
            None => Spectrum::ZERO,
        }
    }

    /// Pick a light and sample it. The contribution is pre-divided by the
    /// selection probability and the sample pdf includes it. Returns a zero
    /// contribution with pdf 0 if there are no lights or the light sample
    /// failed.
    ///
    /// * `ref_p`   - Reference point.
    /// * `sampler` - The sampler.
    pub fn sample_light(&self, ref_p: &Point3f, sampler: &mut dyn Sampler) -> (Spectrum, LightSample) {
        if self.lights.is_empty() || self.light_distribution.is_empty() {
            return (Spectrum::ZERO, LightSample::default());
        }

        let (index, select_pdf) = self.light_distribution.sample_discrete(sampler.get_1d());
        let u = sampler.get_2d();
        if select_pdf == 0.0 {
            return (Spectrum::ZERO, LightSample::default());
        }

        let (contribution, mut ls) = self.lights[index].sample_li(&self.shapes, ref_p, &u);
        if ls.pdf == 0.0 || contribution.is_black() {
            return (Spectrum::ZERO, LightSample::default());
        }
        ls.pdf *= select_pdf;
        ls.light = Some(LightId::from(index));
        (contribution / select_pdf, ls)
    }

    /// Returns the combined selection and solid angle density of sampling
    /// `ls` from `ref_p`. Zero for delta lights.
    ///
    /// * `ref_p` - Reference point.
    /// * `ls`    - The light sample; `ls.light` identifies the light.
    pub fn pdf_light(&self, ref_p: &Point3f, ls: &LightSample) -> Float {
        match ls.light {
            Some(id) if id.index() < self.lights.len() => {
                let light = &self.lights[id.index()];
                self.light_distribution.discrete_pdf(id.index()) * light.pdf_li(&self.shapes, ref_p, ls)
            }
            _ => 0.0,
        }
    }

    /// Returns the radiance carried by a ray that escapes the scene.
    ///
    /// * `ray` - The escaping ray.
    pub fn eval_env_light(&self, ray: &Ray) -> Spectrum {
        match self.env_light() {
            Some(light) => light.eval_environment(&ray.d),
            None => Spectrum::ZERO,
        }
    }

    /// Returns the combined selection and solid angle density of the
    /// environment light producing direction `d`.
    ///
    /// * `ref_p` - Reference point.
    /// * `d`     - Direction.
    pub fn pdf_env_light(&self, ref_p: &Point3f, d: &Vector3f) -> Float {
        match self.env_light {
            Some(id) => {
                let ls = LightSample {
                    wi: d.normalize(),
                    dist: INFINITY,
                    light: Some(id),
                    ..LightSample::default()
                };
                self.pdf_light(ref_p, &ls)
            }
            None => 0.0,
        }
    }

    /// Returns the transmittance of a medium along a ray segment.
    ///
    /// * `ray`     - The segment; `ray.medium` selects the medium.
    /// * `sampler` - The sampler.
    fn medium_tr(&self, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
        match ray.medium {
            Some(id) => self.media[id.index()].tr(ray, sampler),
            None => Spectrum::ONE,
        }
    }

    /// Trace a ray through passthrough boundaries and return the first hit
    /// with a scattering surface together with the beam transmittance up to
    /// it. `ray` is left as the last segment traced, so its medium is the
    /// one on the incoming side of the hit.
    ///
    /// * `ray`     - The ray; updated in place.
    /// * `sampler` - The sampler.
    pub fn intersect_tr(&self, ray: &mut Ray, sampler: &mut dyn Sampler) -> (Option<Intersection>, Spectrum) {
        let mut tr = Spectrum::ONE;
        for _ in 0..MAX_PASSTHROUGH_CROSSINGS {
            let its = self.ray_intersect(ray);
            if let Some(its) = its.as_ref() {
                ray.t_max = its.t;
            }
            tr *= self.medium_tr(ray, sampler);

            match its {
                Some(its) => {
                    let shape = &self.shapes[its.shape.index()];
                    let passthrough = self.shape_bsdf(its.shape).map_or(false, |b| b.is_passthrough());
                    if !passthrough {
                        return (Some(its), tr);
                    }
                    let medium = its.medium_towards(&ray.d, &shape.medium_interface);
                    *ray = its.spawn_ray(&ray.d, medium);
                }
                None => return (None, tr),
            }
        }
        (None, Spectrum::ZERO)
    }

    /// Returns the transmittance along a shadow ray, passing through
    /// passthrough boundaries and attenuating by the media in between. Zero
    /// if an opaque surface blocks the ray.
    ///
    /// * `ray`     - The shadow ray.
    /// * `sampler` - The sampler.
    pub fn transmittance(&self, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum {
        let mut ray = *ray;
        let target = ray.t_max.is_finite().then(|| ray.at(ray.t_max));
        let mut tr = Spectrum::ONE;

        for _ in 0..MAX_PASSTHROUGH_CROSSINGS {
            let its = self.ray_intersect(&ray);
            match its {
                Some(its) => {
                    let passthrough = self.shape_bsdf(its.shape).map_or(false, |b| b.is_passthrough());
                    if !passthrough {
                        return Spectrum::ZERO;
                    }
                    let mut segment = ray;
                    segment.t_max = its.t;
                    tr *= self.medium_tr(&segment, sampler);
                    if tr.is_black() {
                        return tr;
                    }

                    let shape = &self.shapes[its.shape.index()];
                    let medium = its.medium_towards(&ray.d, &shape.medium_interface);
                    ray = match target {
                        Some(target) => its.spawn_ray_to(&target, medium),
                        None => its.spawn_ray(&ray.d, medium),
                    };
                }
                None => return tr * self.medium_tr(&ray, sampler),
            }
        }
        Spectrum::ZERO
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scene[shapes = {}, bsdfs = {}, lights = {}, media = {}, integrator = {}, camera = {}, aggregate = {}]",
            self.shapes.len(),
            self.bsdfs.len(),
            self.lights.len(),
            self.media.len(),
            self.integrator.as_ref().map_or("none", |i| i.name()),
            self.camera.as_ref().map_or("none", |c| c.name()),
            self.aggregate.as_ref().map_or("none", |a| a.name()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::TestSampler;
    use float_cmp::*;

    fn sphere(center: Point3f, radius: Float) -> Shape {
        Shape::new(ShapeKind::Sphere(Sphere::new(center, radius)))
    }

    #[test]
    fn ids_are_sequential_and_frozen_after_init() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_shape(sphere(Point3f::ZERO, 1.0)), Some(ShapeId(0)));
        assert_eq!(scene.add_shape(sphere(Point3f::new(3.0, 0.0, 0.0), 1.0)), Some(ShapeId(1)));
        scene.finish_initialization();
        assert!(scene.is_initialized());
        assert_eq!(scene.add_shape(sphere(Point3f::ZERO, 1.0)), None);
        assert_eq!(scene.add_bsdf(BSDF::Null), None);
    }

    #[test]
    fn shapes_get_default_bsdf() {
        let mut scene = Scene::new();
        let id = scene.add_shape(sphere(Point3f::ZERO, 1.0)).unwrap();
        scene.finish_initialization();
        assert!(matches!(scene.shape_bsdf(id), Some(BSDF::Diffuse(_))));
    }

    #[test]
    fn nearest_and_any_hit() {
        let mut scene = Scene::new();
        scene.add_shape(sphere(Point3f::new(0.0, 0.0, 5.0), 1.0));
        let near = scene.add_shape(sphere(Point3f::new(0.0, 0.0, 2.0), 0.5)).unwrap();
        scene.finish_initialization();

        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0));
        let its = scene.ray_intersect(&ray).unwrap();
        assert_eq!(its.shape, near);
        assert!(approx_eq!(Float, its.t, 1.5, epsilon = 1e-4));
        assert!(scene.ray_intersect_p(&ray));

        let miss = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 1.0, 0.0));
        assert!(scene.ray_intersect(&miss).is_none());
        assert!(!scene.ray_intersect_p(&miss));
    }

    #[test]
    fn uniform_light_selection_folds_in_probability() {
        let mut scene = Scene::new();
        scene.add_light(Light::Point(PointLight::new(Point3f::new(0.0, 0.0, 1.0), Spectrum::ONE)));
        scene.add_light(Light::Point(PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::ONE)));
        scene.finish_initialization();

        let mut sampler = TestSampler::new(0);
        for _ in 0..16 {
            let (l, ls) = scene.sample_light(&Point3f::ZERO, &mut sampler);
            assert!(approx_eq!(Float, ls.pdf, 0.5, epsilon = 1e-6));
            let expected = 2.0 / (ls.dist * ls.dist);
            assert!(approx_eq!(Float, l[0], expected, epsilon = 1e-5));
        }
    }

    #[test]
    fn no_lights_gives_zero() {
        let mut scene = Scene::new();
        scene.finish_initialization();
        let mut sampler = TestSampler::new(0);
        let (l, ls) = scene.sample_light(&Point3f::ZERO, &mut sampler);
        assert!(l.is_black());
        assert_eq!(ls.pdf, 0.0);
    }

    #[test]
    fn area_light_attaches_to_shape() {
        let mut scene = Scene::new();
        let id = scene.add_shape(sphere(Point3f::new(0.0, 0.0, 3.0), 1.0)).unwrap();
        let light = scene.add_area_light(id, Spectrum::new(2.0)).unwrap();
        assert_eq!(scene.add_area_light(id, Spectrum::ONE), None);
        assert_eq!(scene.add_area_light(ShapeId(9), Spectrum::ONE), None);
        scene.finish_initialization();
        assert_eq!(scene.shape(id).light, Some(light));

        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0));
        let its = scene.ray_intersect(&ray).unwrap();
        assert_eq!(scene.le(&its, &-ray.d), Spectrum::new(2.0));

        let mut sampler = TestSampler::new(1);
        let (l, ls) = scene.sample_light(&Point3f::ZERO, &mut sampler);
        assert!(!l.is_black());
        let pdf = scene.pdf_light(&Point3f::ZERO, &ls);
        assert!(approx_eq!(Float, pdf, ls.pdf, epsilon = 1e-3 * pdf));
    }

    #[test]
    fn environment_light_on_escape() {
        let mut scene = Scene::new();
        scene.add_light(Light::ConstantEnvironment(ConstantEnvironmentLight::new(Spectrum::new(0.7))));
        scene.finish_initialization();
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(scene.eval_env_light(&ray), Spectrum::new(0.7));
        assert!(approx_eq!(
            Float,
            scene.pdf_env_light(&Point3f::ZERO, &ray.d),
            INV_FOUR_PI,
            epsilon = 1e-6
        ));
    }

    #[test]
    fn transmittance_through_null_boundary() {
        let mut scene = Scene::new();
        let fog = scene
            .add_medium(Medium::Homogeneous(HomogeneousMedium::new(
                Spectrum::new(0.5),
                Spectrum::ZERO,
                PhaseFunction::Isotropic,
            )))
            .unwrap();
        let null = scene.add_bsdf(BSDF::Null).unwrap();
        scene.add_shape(
            sphere(Point3f::ZERO, 1.0)
                .with_bsdf(null)
                .with_medium_interface(MediumInterface::new(Some(fog), None)),
        );
        scene.finish_initialization();

        // A segment crossing the whole sphere travels 2 units through fog.
        let from = Point3f::new(0.0, 0.0, -3.0);
        let to = Point3f::new(0.0, 0.0, 3.0);
        let ray = spawn_segment(&from, &to, 0.0, None);
        let mut sampler = TestSampler::new(0);
        let tr = scene.transmittance(&ray, &mut sampler);
        assert!(approx_eq!(Float, tr[0], (-1.0 as Float).exp(), epsilon = 1e-3));

        // Escaping rays pick up the same attenuation.
        let mut ray = Ray::new(from, Vector3f::new(0.0, 0.0, 1.0));
        let (its, tr) = scene.intersect_tr(&mut ray, &mut sampler);
        assert!(its.is_none());
        assert!(approx_eq!(Float, tr[0], (-1.0 as Float).exp(), epsilon = 1e-3));
    }

    #[test]
    fn opaque_surface_blocks_transmittance() {
        let mut scene = Scene::new();
        scene.add_shape(sphere(Point3f::ZERO, 1.0));
        scene.finish_initialization();
        let ray = spawn_segment(&Point3f::new(0.0, 0.0, -3.0), &Point3f::new(0.0, 0.0, 3.0), 0.0, None);
        let mut sampler = TestSampler::new(0);
        assert!(scene.transmittance(&ray, &mut sampler).is_black());
    }
}
