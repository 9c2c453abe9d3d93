//! Registry of object constructors keyed by type tag.

use crate::error::*;
use cameras::*;
use filters::*;
use integrators::*;
use samplers::*;
use std::collections::HashMap;
use tessera_core::base::*;
use tessera_core::camera::*;
use tessera_core::filter::*;
use tessera_core::geometry::*;
use tessera_core::image_io::*;
use tessera_core::integrator::*;
use tessera_core::light::*;
use tessera_core::medium::*;
use tessera_core::microfacet::*;
use tessera_core::paramset::*;
use tessera_core::reflection::*;
use tessera_core::sampler::*;
use tessera_core::shape::*;
use tessera_core::spectrum::*;

/// Builds an object from its parameters.
pub type Constructor<T> = fn(&ParamSet) -> Result<T, ApiError>;

/// Constructors for one category of objects together with the tag used when
/// a requested tag is unknown.
pub struct Category<T> {
    /// Category name for diagnostics.
    name: &'static str,

    /// Tag used for unknown tags.
    default: &'static str,

    /// Constructors by tag.
    constructors: HashMap<&'static str, Constructor<T>>,
}

impl<T> Category<T> {
    /// Create an empty category.
    ///
    /// * `name`    - Category name for diagnostics.
    /// * `default` - Tag used for unknown tags.
    pub fn new(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            constructors: HashMap::new(),
        }
    }

    /// Register or replace a constructor.
    ///
    /// * `tag`         - Type tag.
    /// * `constructor` - The constructor.
    pub fn register(&mut self, tag: &'static str, constructor: Constructor<T>) {
        if self.constructors.insert(tag, constructor).is_some() {
            debug!("Replacing {} constructor '{}'", self.name, tag);
        }
    }

    /// Builds the object for `tag`. Unknown tags fall back to the default
    /// tag with a warning.
    ///
    /// * `tag`    - Type tag.
    /// * `params` - Parameters.
    pub fn make(&self, tag: &str, params: &ParamSet) -> Result<T, ApiError> {
        match self.constructors.get(tag) {
            Some(constructor) => constructor(params),
            None => {
                warn!("{} '{}' unknown. Using '{}'.", self.name, tag, self.default);
                match self.constructors.get(self.default) {
                    Some(constructor) => constructor(params),
                    None => Err(ApiError::UnknownReference {
                        kind: self.name,
                        name: tag.to_owned(),
                    }),
                }
            }
        }
    }

    /// Returns the default tag.
    pub fn default_tag(&self) -> &'static str {
        self.default
    }

    /// Returns true if a constructor is registered for `tag`.
    ///
    /// * `tag` - Type tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Returns the registered tags in sorted order.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.constructors.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

/// Maps type tags to constructors for every category of scene object.
pub struct Registry {
    pub bsdfs: Category<BSDF>,
    pub shapes: Category<ShapeKind>,
    pub lights: Category<Light>,
    pub media: Category<Medium>,
    pub integrators: Category<Box<dyn Integrator>>,
    pub samplers: Category<Box<dyn Sampler>>,
    pub filters: Category<Box<dyn Filter>>,
    pub cameras: Category<Box<dyn Camera>>,
}

impl Registry {
    /// Returns a registry without any constructors.
    pub fn empty() -> Self {
        Self {
            bsdfs: Category::new("BSDF", "diffuse"),
            shapes: Category::new("Shape", "sphere"),
            lights: Category::new("Light", "point"),
            media: Category::new("Medium", "homogeneous"),
            integrators: Category::new("Integrator", "path_mis"),
            samplers: Category::new("Sampler", "independent"),
            filters: Category::new("Filter", "gaussian"),
            cameras: Category::new("Camera", "perspective"),
        }
    }
}

impl Default for Registry {
    /// Returns a registry holding every built-in type.
    fn default() -> Self {
        let mut r = Self::empty();

        r.bsdfs.register("diffuse", make_diffuse);
        r.bsdfs.register("mirror", make_mirror);
        r.bsdfs.register("dielectric", make_dielectric);
        r.bsdfs.register("roughconductor", make_rough_conductor);
        r.bsdfs.register("plastic", make_plastic);
        r.bsdfs.register("null", |_| Ok(BSDF::Null));

        r.shapes.register("sphere", make_sphere);
        r.shapes.register("rectangle", make_rectangle);
        r.shapes.register("triangle", make_triangle);

        r.lights.register("point", make_point_light);
        r.lights.register("directional", make_directional_light);
        r.lights.register("constant", make_constant_environment);
        r.lights.register("sky", make_sky);
        r.lights.register("envmap", make_environment_map);

        r.media.register("homogeneous", make_homogeneous);

        r.integrators.register("direct", |p| Ok(Box::new(DirectLightingIntegrator::from(p))));
        r.integrators.register("path", |p| Ok(Box::new(PathIntegrator::from(p))));
        r.integrators.register("path_mis", |p| Ok(Box::new(PathMisIntegrator::from(p))));
        r.integrators.register("volpath", |p| Ok(Box::new(VolPathIntegrator::from(p))));
        r.integrators.register("ao", |p| Ok(Box::new(AmbientOcclusionIntegrator::from(p))));
        r.integrators.register("normals", |p| Ok(Box::new(NormalsIntegrator::from(p))));

        r.samplers.register("independent", |p| Ok(Box::new(RandomSampler::from(p))));
        r.samplers.register("stratified", |p| Ok(Box::new(StratifiedSampler::from(p))));

        r.filters.register("box", |p| Ok(Box::new(BoxFilter::from(p))));
        r.filters.register("tent", |p| Ok(Box::new(TentFilter::from(p))));
        r.filters.register("gaussian", |p| Ok(Box::new(GaussianFilter::from(p))));
        r.filters.register("mitchell", |p| Ok(Box::new(MitchellFilter::from(p))));

        r.cameras.register("perspective", |p| Ok(Box::new(PerspectiveCamera::from(p))));
        r.cameras.register("orthographic", |p| Ok(Box::new(OrthographicCamera::from(p))));

        r
    }
}

/// Create a diffuse BSDF.
///
/// * `params` - Parameters: `albedo`.
fn make_diffuse(params: &ParamSet) -> Result<BSDF, ApiError> {
    let albedo = params.find_one_valid_spectrum("albedo", Spectrum::new(0.5));
    Ok(BSDF::Diffuse(DiffuseBSDF::new(albedo)))
}

fn make_mirror(params: &ParamSet) -> Result<BSDF, ApiError> {
    let reflectance = params.find_one_valid_spectrum("reflectance", Spectrum::ONE);
    Ok(BSDF::Mirror(MirrorBSDF::new(reflectance)))
}

/// Create a smooth dielectric BSDF.
///
/// * `params` - Parameters: `intior`, `extior`.
fn make_dielectric(params: &ParamSet) -> Result<BSDF, ApiError> {
    let int_ior = params.find_one_positive_float("intior", 1.5);
    let ext_ior = params.find_one_positive_float("extior", 1.0);
    Ok(BSDF::Dielectric(DielectricBSDF::new(int_ior, ext_ior)))
}

/// Create a rough conductor BSDF.
///
/// * `params` - Parameters: `reflectance` and either `alpha` or a perceptual
///              `roughness` in [0, 1].
fn make_rough_conductor(params: &ParamSet) -> Result<BSDF, ApiError> {
    let reflectance = params.find_one_valid_spectrum("reflectance", Spectrum::new(0.9));
    let alpha = match params.floats.get("roughness") {
        Some(&roughness) => TrowbridgeReitzDistribution::roughness_to_alpha(roughness),
        None => params.find_one_positive_float("alpha", 0.1),
    };
    Ok(BSDF::RoughConductor(RoughConductorBSDF::new(reflectance, alpha)))
}

/// Create a plastic BSDF.
///
/// * `params` - Parameters: `diffuse`, `specular`, `intior`.
fn make_plastic(params: &ParamSet) -> Result<BSDF, ApiError> {
    let diffuse = params.find_one_valid_spectrum("diffuse", Spectrum::new(0.5));
    let specular = params.find_one_valid_spectrum("specular", Spectrum::ONE);
    let int_ior = params.find_one_positive_float("intior", 1.5);
    Ok(BSDF::Plastic(PlasticBSDF::new(diffuse, specular, int_ior)))
}

fn make_sphere(params: &ParamSet) -> Result<ShapeKind, ApiError> {
    let center = params.find_one_point3f("center", Point3f::ZERO);
    let radius = params.find_one_positive_float("radius", 1.0);
    Ok(ShapeKind::Sphere(Sphere::new(center, radius)))
}

/// Create a parallelogram spanned by two edges from a corner.
///
/// * `params` - Parameters: `origin`, `u`, `v`.
fn make_rectangle(params: &ParamSet) -> Result<ShapeKind, ApiError> {
    let origin = params.find_one_point3f("origin", Point3f::ZERO);
    let edge_u = params.find_one_vector3f("u", Vector3f::new(1.0, 0.0, 0.0));
    let edge_v = params.find_one_vector3f("v", Vector3f::new(0.0, 1.0, 0.0));
    if edge_u.cross(&edge_v).length_squared() == 0.0 {
        return Err(ApiError::invalid("u", format!("edges {edge_u} and {edge_v} are parallel")));
    }
    Ok(ShapeKind::Rectangle(Rectangle::new(origin, edge_u, edge_v)))
}

/// Create a triangle.
///
/// * `params` - Parameters: `p0`, `p1`, `p2` and optionally `n0`, `n1`, `n2`.
fn make_triangle(params: &ParamSet) -> Result<ShapeKind, ApiError> {
    let p = [
        params.find_one_point3f("p0", Point3f::ZERO),
        params.find_one_point3f("p1", Point3f::new(1.0, 0.0, 0.0)),
        params.find_one_point3f("p2", Point3f::new(0.0, 1.0, 0.0)),
    ];
    if (p[1] - p[0]).cross(&(p[2] - p[0])).length_squared() == 0.0 {
        return Err(ApiError::invalid("p0", "triangle is degenerate"));
    }

    let normals: Vec<Option<Normal3f>> = ["n0", "n1", "n2"]
        .iter()
        .map(|name| params.vector3fs.get(*name).map(|n| n.normalize()))
        .collect();
    let n = match normals[..] {
        [Some(n0), Some(n1), Some(n2)] => Some([n0, n1, n2]),
        [None, None, None] => None,
        _ => {
            warn!("Triangle needs all three shading normals. Ignoring them.");
            None
        }
    };
    Ok(ShapeKind::Triangle(Triangle::new(p, n)))
}

fn make_point_light(params: &ParamSet) -> Result<Light, ApiError> {
    let position = params.find_one_point3f("position", Point3f::ZERO);
    let intensity = params.find_one_valid_spectrum("intensity", Spectrum::ONE);
    Ok(Light::Point(PointLight::new(position, intensity)))
}

/// Create a directional light.
///
/// * `params` - Parameters: `direction` (the way light travels), `irradiance`.
fn make_directional_light(params: &ParamSet) -> Result<Light, ApiError> {
    let direction = params.find_one_vector3f("direction", Vector3f::new(0.0, 0.0, -1.0));
    if direction.length_squared() == 0.0 {
        return Err(ApiError::invalid("direction", "zero vector"));
    }
    let irradiance = params.find_one_valid_spectrum("irradiance", Spectrum::ONE);
    Ok(Light::Directional(DirectionalLight::new(direction, irradiance)))
}

fn make_constant_environment(params: &ParamSet) -> Result<Light, ApiError> {
    let radiance = params.find_one_valid_spectrum("radiance", Spectrum::ONE);
    Ok(Light::ConstantEnvironment(ConstantEnvironmentLight::new(radiance)))
}

/// Orientation of an environment map; its normal is the zenith.
///
/// * `params` - Parameters: `up`.
fn environment_frame(params: &ParamSet) -> Frame {
    let up = params.find_one_vector3f("up", Vector3f::new(0.0, 1.0, 0.0));
    if up.length_squared() == 0.0 {
        warn!("Environment 'up' is a zero vector. Using +y.");
        return Frame::from_normal(&Vector3f::new(0.0, 1.0, 0.0));
    }
    Frame::from_normal(&up.normalize())
}

/// Create a procedural sky.
///
/// * `params` - Parameters: `up`, `zenith`, `horizon`, `sundir`, `sun`,
///              `width`, `height`.
fn make_sky(params: &ParamSet) -> Result<Light, ApiError> {
    let zenith = params.find_one_valid_spectrum("zenith", Spectrum::rgb(0.3, 0.5, 1.0));
    let horizon = params.find_one_valid_spectrum("horizon", Spectrum::rgb(1.0, 0.95, 0.9));
    let sun_dir = params.find_one_vector3f("sundir", Vector3f::new(0.3, 0.3, 1.0));
    let sun = params.find_one_valid_spectrum("sun", Spectrum::new(500.0));
    let width = params.find_one_count("width", 256);
    let height = params.find_one_count("height", 128);
    EnvironmentMapLight::sky(environment_frame(params), width, height, zenith, horizon, sun_dir, sun)
        .map(Light::EnvironmentMap)
        .ok_or_else(|| ApiError::invalid("width", format!("{width} x {height} is not a valid sky resolution")))
}

/// Create an environment map from a lat-long image.
///
/// * `params` - Parameters: `filename`, `scale`, `up`.
fn make_environment_map(params: &ParamSet) -> Result<Light, ApiError> {
    let filename = params.find_one_string("filename", String::new());
    if filename.is_empty() {
        return Err(ApiError::invalid("filename", "missing environment map file"));
    }
    let image = read_image(&filename).map_err(|e| ApiError::invalid("filename", e))?;
    let scale = params.find_one_valid_spectrum("scale", Spectrum::ONE);

    let texels: Vec<Spectrum> = image
        .rgb
        .chunks_exact(3)
        .map(|c| Spectrum::rgb(c[0], c[1], c[2]) * scale)
        .collect();
    EnvironmentMapLight::new(environment_frame(params), image.width, image.height, texels)
        .map(Light::EnvironmentMap)
        .ok_or_else(|| ApiError::invalid("filename", format!("'{filename}' is not a usable environment map")))
}

/// Create a homogeneous medium. A non-zero `g` selects the Henyey-Greenstein
/// phase function.
///
/// * `params` - Parameters: `sigma_a`, `sigma_s`, `g`.
fn make_homogeneous(params: &ParamSet) -> Result<Medium, ApiError> {
    let sigma_a = params.find_one_valid_spectrum("sigma_a", Spectrum::new(0.1));
    let sigma_s = params.find_one_valid_spectrum("sigma_s", Spectrum::new(0.1));
    let g = params.find_one_float("g", 0.0);
    let phase = if g == 0.0 {
        PhaseFunction::Isotropic
    } else if g.abs() < 1.0 {
        PhaseFunction::HenyeyGreenstein { g }
    } else {
        return Err(ApiError::invalid("g", format!("{g} must lie in (-1, 1)")));
    };
    Ok(Medium::Homogeneous(HomogeneousMedium::new(sigma_a, sigma_s, phase)))
}
