//! Scene builder used by scene loaders.

use crate::error::*;
use crate::registry::*;
use accelerators::*;
use std::collections::HashMap;
use tessera_core::medium::*;
use tessera_core::paramset::*;
use tessera_core::scene::*;
use tessera_core::shape::*;
use tessera_core::spectrum::*;

/// Assembles a `Scene` from type tags and parameter sets. BSDFs and media are
/// declared by name and referenced by shapes through the `bsdf`, `interior`
/// and `exterior` string parameters; a shape with an `emission` spectrum
/// becomes an area light.
pub struct SceneBuilder {
    /// Object constructors.
    registry: Registry,

    /// The scene being built.
    scene: Scene,

    /// Declared BSDFs.
    named_bsdfs: HashMap<String, BsdfId>,

    /// Declared media.
    named_media: HashMap<String, MediumId>,

    /// BVH parameters.
    accelerator_params: ParamSet,

    /// Set once a camera, integrator, sampler and filter were given.
    has_camera: bool,
    has_integrator: bool,
    has_sampler: bool,
    has_filter: bool,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl SceneBuilder {
    /// Create a new builder.
    ///
    /// * `registry` - Object constructors.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            scene: Scene::new(),
            named_bsdfs: HashMap::new(),
            named_media: HashMap::new(),
            accelerator_params: ParamSet::new(),
            has_camera: false,
            has_integrator: false,
            has_sampler: false,
            has_filter: false,
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Declare a named BSDF.
    ///
    /// * `name`   - Name used by shapes to refer to it.
    /// * `tag`    - BSDF type tag.
    /// * `params` - BSDF parameters.
    pub fn named_bsdf(&mut self, name: &str, tag: &str, params: &ParamSet) -> Result<BsdfId, ApiError> {
        if self.named_bsdfs.contains_key(name) {
            return Err(ApiError::DuplicateName {
                kind: "BSDF",
                name: name.to_owned(),
            });
        }
        let bsdf = self.registry.bsdfs.make(tag, params)?;
        let id = self.scene.add_bsdf(bsdf).ok_or(ApiError::Rejected("BSDF"))?;
        self.named_bsdfs.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Declare a named medium.
    ///
    /// * `name`   - Name used by shapes and cameras to refer to it.
    /// * `tag`    - Medium type tag.
    /// * `params` - Medium parameters.
    pub fn named_medium(&mut self, name: &str, tag: &str, params: &ParamSet) -> Result<MediumId, ApiError> {
        if self.named_media.contains_key(name) {
            return Err(ApiError::DuplicateName {
                kind: "Medium",
                name: name.to_owned(),
            });
        }
        let medium = self.registry.media.make(tag, params)?;
        let id = self.scene.add_medium(medium).ok_or(ApiError::Rejected("medium"))?;
        self.named_media.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Look up a declared medium from a string parameter. An empty or
    /// missing parameter means vacuum.
    ///
    /// * `params` - Parameters.
    /// * `param`  - Parameter holding the medium name.
    fn medium_param(&self, params: &ParamSet, param: &str) -> Result<Option<MediumId>, ApiError> {
        let name = params.find_one_string(param, String::new());
        if name.is_empty() {
            return Ok(None);
        }
        self.named_media
            .get(&name)
            .copied()
            .map(Some)
            .ok_or(ApiError::UnknownReference { kind: "Medium", name })
    }

    /// Add a shape.
    ///
    /// * `tag`    - Shape type tag.
    /// * `params` - Shape parameters plus the optional references `bsdf`,
    ///              `interior`, `exterior` and the area emitter radiance
    ///              `emission`.
    pub fn shape(&mut self, tag: &str, params: &ParamSet) -> Result<ShapeId, ApiError> {
        let kind = self.registry.shapes.make(tag, params)?;
        let mut shape = Shape::new(kind);

        let bsdf_name = params.find_one_string("bsdf", String::new());
        if !bsdf_name.is_empty() {
            let id = self
                .named_bsdfs
                .get(&bsdf_name)
                .copied()
                .ok_or(ApiError::UnknownReference {
                    kind: "BSDF",
                    name: bsdf_name,
                })?;
            shape = shape.with_bsdf(id);
        }

        let inside = self.medium_param(params, "interior")?;
        let outside = self.medium_param(params, "exterior")?;
        shape = shape.with_medium_interface(MediumInterface::new(inside, outside));

        let emission = params.find_one_spectrum("emission", Spectrum::ZERO);
        if !emission.is_valid() {
            return Err(ApiError::invalid("emission", format!("{emission} is not a valid radiance")));
        }

        let id = self.scene.add_shape(shape).ok_or(ApiError::Rejected("shape"))?;
        if !emission.is_black() {
            self.scene
                .add_area_light(id, emission)
                .ok_or(ApiError::Rejected("area light"))?;
        }
        Ok(id)
    }

    /// Add a light that is not attached to a shape.
    ///
    /// * `tag`    - Light type tag.
    /// * `params` - Light parameters.
    pub fn light(&mut self, tag: &str, params: &ParamSet) -> Result<LightId, ApiError> {
        let light = self.registry.lights.make(tag, params)?;
        self.scene.add_light(light).ok_or(ApiError::Rejected("light"))
    }

    /// Set the camera. A `medium` string parameter names the medium the
    /// camera sits in.
    ///
    /// * `tag`    - Camera type tag.
    /// * `params` - Camera parameters.
    pub fn camera(&mut self, tag: &str, params: &ParamSet) -> Result<(), ApiError> {
        let mut params = params.clone();
        if let Some(medium) = self.medium_param(&params, "medium")? {
            params.add_int("medium", medium.0 as i32);
        }
        params.strings.remove("medium");

        let camera = self.registry.cameras.make(tag, &params)?;
        self.scene.set_camera(camera);
        self.has_camera = true;
        Ok(())
    }

    /// Set the integrator.
    ///
    /// * `tag`    - Integrator type tag.
    /// * `params` - Integrator parameters.
    pub fn integrator(&mut self, tag: &str, params: &ParamSet) -> Result<(), ApiError> {
        let integrator = self.registry.integrators.make(tag, params)?;
        self.scene.set_integrator(integrator);
        self.has_integrator = true;
        Ok(())
    }

    /// Set the sampler.
    ///
    /// * `tag`    - Sampler type tag.
    /// * `params` - Sampler parameters.
    pub fn sampler(&mut self, tag: &str, params: &ParamSet) -> Result<(), ApiError> {
        let sampler = self.registry.samplers.make(tag, params)?;
        self.scene.set_sampler(sampler);
        self.has_sampler = true;
        Ok(())
    }

    /// Set the reconstruction filter.
    ///
    /// * `tag`    - Filter type tag.
    /// * `params` - Filter parameters.
    pub fn filter(&mut self, tag: &str, params: &ParamSet) -> Result<(), ApiError> {
        let filter = self.registry.filters.make(tag, params)?;
        self.scene.set_filter(filter);
        self.has_filter = true;
        Ok(())
    }

    /// Set the BVH parameters (`splitmethod`, `maxnodeprims`).
    ///
    /// * `params` - Accelerator parameters.
    pub fn accelerator(&mut self, params: &ParamSet) {
        self.accelerator_params = params.clone();
    }

    /// Set how lights are picked for next event estimation.
    ///
    /// * `strategy` - Light selection strategy.
    pub fn light_strategy(&mut self, strategy: LightSampleStrategy) {
        self.scene.set_light_strategy(strategy);
    }

    /// Finish the scene. Missing camera, integrator, sampler and filter are
    /// filled in from the registry defaults. Builds the BVH and freezes the
    /// scene.
    pub fn build(mut self) -> Result<Scene, ApiError> {
        if self.scene.shapes().is_empty() {
            return Err(ApiError::EmptyScene);
        }

        let defaults = ParamSet::new();
        if !self.has_camera {
            warn!("No camera given. Using '{}'.", self.registry.cameras.default_tag());
            let tag = self.registry.cameras.default_tag();
            self.camera(tag, &defaults)?;
        }
        if !self.has_integrator {
            warn!("No integrator given. Using '{}'.", self.registry.integrators.default_tag());
            let tag = self.registry.integrators.default_tag();
            self.integrator(tag, &defaults)?;
        }
        if !self.has_sampler {
            warn!("No sampler given. Using '{}'.", self.registry.samplers.default_tag());
            let tag = self.registry.samplers.default_tag();
            self.sampler(tag, &defaults)?;
        }
        if !self.has_filter {
            warn!("No filter given. Using '{}'.", self.registry.filters.default_tag());
            let tag = self.registry.filters.default_tag();
            self.filter(tag, &defaults)?;
        }

        let bvh = BVHAccel::from((&self.accelerator_params, self.scene.shapes()));
        self.scene.set_aggregate(Box::new(bvh));
        self.scene.finish_initialization();
        Ok(self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::geometry::*;

    fn sphere_params(bsdf: &str) -> ParamSet {
        ParamSet::new()
            .with_float("radius", 1.0)
            .with_string("bsdf", bsdf.to_owned())
    }

    #[test]
    fn empty_scene_is_an_error() {
        assert_eq!(SceneBuilder::default().build().err(), Some(ApiError::EmptyScene));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut b = SceneBuilder::default();
        assert!(b.named_bsdf("white", "diffuse", &ParamSet::new()).is_ok());
        assert_eq!(
            b.named_bsdf("white", "mirror", &ParamSet::new()),
            Err(ApiError::DuplicateName {
                kind: "BSDF",
                name: String::from("white")
            })
        );
        assert!(b.named_medium("fog", "homogeneous", &ParamSet::new()).is_ok());
        assert!(b.named_medium("fog", "homogeneous", &ParamSet::new()).is_err());
    }

    #[test]
    fn unknown_references_are_rejected() {
        let mut b = SceneBuilder::default();
        assert_eq!(
            b.shape("sphere", &sphere_params("gold")),
            Err(ApiError::UnknownReference {
                kind: "BSDF",
                name: String::from("gold")
            })
        );

        let params = ParamSet::new().with_string("interior", String::from("smoke"));
        assert!(matches!(b.shape("sphere", &params), Err(ApiError::UnknownReference { .. })));
        assert!(matches!(
            b.camera("perspective", &ParamSet::new().with_string("medium", String::from("smoke"))),
            Err(ApiError::UnknownReference { .. })
        ));
    }

    #[test]
    fn build_fills_in_defaults() {
        let mut b = SceneBuilder::default();
        b.named_bsdf("white", "diffuse", &ParamSet::new()).unwrap();
        b.shape("sphere", &sphere_params("white")).unwrap();
        b.light("point", &ParamSet::new().with_point3f("position", Point3f::new(0.0, 0.0, 5.0)))
            .unwrap();

        let scene = b.build().unwrap();
        assert!(scene.is_initialized());
        assert_eq!(scene.camera().map(|c| c.name()), Some("perspective"));
        assert_eq!(scene.integrator().map(|i| i.name()), Some("path_mis"));
        assert_eq!(scene.filter().map(|f| f.name()), Some("gaussian"));
        assert!(scene.sampler().is_some());
        assert_eq!(scene.lights().len(), 1);

        let ray = Ray::new(Point3f::new(0.0, 0.0, 10.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(scene.ray_intersect(&ray).is_some());
    }

    #[test]
    fn emission_creates_area_light() {
        let mut b = SceneBuilder::default();
        let params = ParamSet::new().with_spectrum("emission", Spectrum::new(4.0));
        let id = b.shape("rectangle", &params).unwrap();
        let scene = b.build().unwrap();
        assert!(scene.shape(id).is_emitter());
        assert_eq!(scene.lights().len(), 1);
    }

    #[test]
    fn media_are_attached() {
        let mut b = SceneBuilder::default();
        let fog = b.named_medium("fog", "homogeneous", &ParamSet::new()).unwrap();
        b.named_bsdf("boundary", "null", &ParamSet::new()).unwrap();
        let params = sphere_params("boundary").with_string("interior", String::from("fog"));
        let id = b.shape("sphere", &params).unwrap();
        b.camera("perspective", &ParamSet::new().with_string("medium", String::from("fog")))
            .unwrap();

        let scene = b.build().unwrap();
        assert_eq!(scene.shape(id).medium_interface, MediumInterface::new(Some(fog), None));
        assert_eq!(scene.camera().and_then(|c| c.medium()), Some(fog));
        assert_eq!(scene.media_count(), 1);
    }
}
