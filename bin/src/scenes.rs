//! Built-in demo scenes

use api::*;
use tessera_core::app::*;
use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::scene::*;
use tessera_core::spectrum::*;

/// Default rendering settings of a demo scene.
struct Defaults {
    integrator: &'static str,
    samples_per_pixel: usize,
}

/// Names of the built-in scenes.
pub const SCENES: [&str; 4] = ["cornell", "spheres", "fog", "point"];

/// Build a demo scene and apply the command line overrides.
///
/// * `name`    - Scene name.
/// * `options` - Command line options.
pub fn build(name: &str, options: &Options) -> Result<Scene, ApiError> {
    let mut b = SceneBuilder::default();
    let defaults = match name {
        "cornell" => cornell(&mut b)?,
        "spheres" => spheres(&mut b)?,
        "fog" => fog(&mut b)?,
        "point" => point(&mut b)?,
        _ => {
            return Err(ApiError::UnknownReference {
                kind: "scene",
                name: name.to_owned(),
            })
        }
    };

    let mut integrator_params = ParamSet::new();
    if let Some(rr_depth) = options.rr_depth {
        integrator_params.add_int("rrdepth", rr_depth as i32);
    }
    if let Some(max_depth) = options.max_depth {
        integrator_params.add_int("maxdepth", max_depth as i32);
    }
    let integrator = options.integrator.as_deref().unwrap_or(defaults.integrator);
    b.integrator(integrator, &integrator_params)?;

    let spp = options.samples_per_pixel.unwrap_or(defaults.samples_per_pixel);
    b.sampler(
        "independent",
        &ParamSet::new()
            .with_int("pixelsamples", spp as i32)
            .with_int("seed", options.seed as i32),
    )?;

    b.build()
}

fn camera(b: &mut SceneBuilder, position: Point3f, lookat: Point3f, fov: Float) -> Result<(), ApiError> {
    b.camera(
        "perspective",
        &ParamSet::new()
            .with_point3f("position", position)
            .with_point3f("lookat", lookat)
            .with_float("fov", fov)
            .with_int("xres", 512)
            .with_int("yres", 512),
    )
}

fn diffuse(b: &mut SceneBuilder, name: &str, albedo: Spectrum) -> Result<(), ApiError> {
    b.named_bsdf(name, "diffuse", &ParamSet::new().with_spectrum("albedo", albedo))
        .map(|_| ())
}

fn rectangle(b: &mut SceneBuilder, origin: Point3f, u: Vector3f, v: Vector3f, bsdf: &str) -> Result<ShapeId, ApiError> {
    b.shape(
        "rectangle",
        &ParamSet::new()
            .with_point3f("origin", origin)
            .with_vector3f("u", u)
            .with_vector3f("v", v)
            .with_string("bsdf", bsdf.to_owned()),
    )
}

fn sphere(b: &mut SceneBuilder, center: Point3f, radius: Float, bsdf: &str) -> Result<ShapeId, ApiError> {
    b.shape(
        "sphere",
        &ParamSet::new()
            .with_point3f("center", center)
            .with_float("radius", radius)
            .with_string("bsdf", bsdf.to_owned()),
    )
}

/// The Cornell box: a unit room spanning [-1, 1]^3 open towards +z with a
/// square area light under the ceiling.
fn cornell(b: &mut SceneBuilder) -> Result<Defaults, ApiError> {
    diffuse(b, "white", Spectrum::rgb(0.73, 0.73, 0.73))?;
    diffuse(b, "red", Spectrum::rgb(0.65, 0.05, 0.05))?;
    diffuse(b, "green", Spectrum::rgb(0.12, 0.45, 0.15))?;
    b.named_bsdf("glass", "dielectric", &ParamSet::new().with_float("intior", 1.5))?;
    b.named_bsdf("mirror", "mirror", &ParamSet::new())?;

    let x = Vector3f::new(2.0, 0.0, 0.0);
    let y = Vector3f::new(0.0, 2.0, 0.0);
    let z = Vector3f::new(0.0, 0.0, 2.0);
    rectangle(b, Point3f::new(-1.0, -1.0, -1.0), z, x, "white")?; // floor
    rectangle(b, Point3f::new(-1.0, 1.0, -1.0), x, z, "white")?; // ceiling
    rectangle(b, Point3f::new(-1.0, -1.0, -1.0), x, y, "white")?; // back
    rectangle(b, Point3f::new(-1.0, -1.0, -1.0), y, z, "red")?; // left
    rectangle(b, Point3f::new(1.0, -1.0, -1.0), z, y, "green")?; // right

    b.shape(
        "rectangle",
        &ParamSet::new()
            .with_point3f("origin", Point3f::new(-0.25, 0.99, -0.25))
            .with_vector3f("u", Vector3f::new(0.5, 0.0, 0.0))
            .with_vector3f("v", Vector3f::new(0.0, 0.0, 0.5))
            .with_string("bsdf", String::from("white"))
            .with_spectrum("emission", Spectrum::rgb(17.0, 12.0, 4.0)),
    )?;

    sphere(b, Point3f::new(-0.45, -0.6, -0.3), 0.4, "mirror")?;
    sphere(b, Point3f::new(0.45, -0.6, 0.3), 0.4, "glass")?;

    camera(b, Point3f::new(0.0, 0.0, 3.9), Point3f::ZERO, 40.0)?;
    Ok(Defaults {
        integrator: "path_mis",
        samples_per_pixel: 64,
    })
}

/// A row of spheres with different materials on a ground plane under a sky.
fn spheres(b: &mut SceneBuilder) -> Result<Defaults, ApiError> {
    diffuse(b, "ground", Spectrum::new(0.4))?;
    b.named_bsdf(
        "plastic",
        "plastic",
        &ParamSet::new().with_spectrum("diffuse", Spectrum::rgb(0.1, 0.2, 0.6)),
    )?;
    b.named_bsdf(
        "gold",
        "roughconductor",
        &ParamSet::new()
            .with_spectrum("reflectance", Spectrum::rgb(1.0, 0.78, 0.34))
            .with_float("alpha", 0.15),
    )?;
    b.named_bsdf("glass", "dielectric", &ParamSet::new())?;
    b.named_bsdf("chrome", "mirror", &ParamSet::new())?;

    rectangle(
        b,
        Point3f::new(-20.0, 0.0, 20.0),
        Vector3f::new(40.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, -40.0),
        "ground",
    )?;
    for (i, bsdf) in ["plastic", "gold", "glass", "chrome"].iter().enumerate() {
        sphere(b, Point3f::new(-3.0 + 2.0 * i as Float, 0.8, 0.0), 0.8, bsdf)?;
    }

    b.light(
        "sky",
        &ParamSet::new().with_vector3f("sundir", Vector3f::new(0.5, 0.6, 0.4)),
    )?;

    camera(b, Point3f::new(0.0, 3.0, 8.0), Point3f::new(0.0, 0.6, 0.0), 45.0)?;
    Ok(Defaults {
        integrator: "path_mis",
        samples_per_pixel: 32,
    })
}

/// A sphere of scattering fog with a null boundary, lit by a point light
/// above a floor.
fn fog(b: &mut SceneBuilder) -> Result<Defaults, ApiError> {
    diffuse(b, "floor", Spectrum::new(0.6))?;
    b.named_bsdf("boundary", "null", &ParamSet::new())?;
    b.named_medium(
        "fog",
        "homogeneous",
        &ParamSet::new()
            .with_spectrum("sigma_a", Spectrum::new(0.05))
            .with_spectrum("sigma_s", Spectrum::rgb(0.6, 0.7, 0.8))
            .with_float("g", 0.3),
    )?;

    rectangle(
        b,
        Point3f::new(-5.0, -1.0, 5.0),
        Vector3f::new(10.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, -10.0),
        "floor",
    )?;
    b.shape(
        "sphere",
        &ParamSet::new()
            .with_float("radius", 1.5)
            .with_string("bsdf", String::from("boundary"))
            .with_string("interior", String::from("fog")),
    )?;

    b.light(
        "point",
        &ParamSet::new()
            .with_point3f("position", Point3f::new(0.0, 2.5, 0.5))
            .with_spectrum("intensity", Spectrum::new(30.0)),
    )?;
    b.light("constant", &ParamSet::new().with_spectrum("radiance", Spectrum::new(0.05)))?;

    camera(b, Point3f::new(0.0, 1.0, 6.0), Point3f::ZERO, 40.0)?;
    Ok(Defaults {
        integrator: "volpath",
        samples_per_pixel: 64,
    })
}

/// A diffuse unit sphere lit by a point light between it and the camera.
fn point(b: &mut SceneBuilder) -> Result<Defaults, ApiError> {
    diffuse(b, "matte", Spectrum::new(0.8))?;
    sphere(b, Point3f::ZERO, 1.0, "matte")?;
    b.light(
        "point",
        &ParamSet::new()
            .with_point3f("position", Point3f::new(0.0, 0.0, 5.0))
            .with_spectrum("intensity", Spectrum::new(16.0)),
    )?;
    camera(b, Point3f::new(0.0, 0.0, 10.0), Point3f::ZERO, 20.0)?;
    Ok(Defaults {
        integrator: "path_mis",
        samples_per_pixel: 16,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tessera_core::sampler::*;

    #[test]
    fn every_scene_builds() {
        let options = Options::parse_from(["tessera"]);
        for name in SCENES {
            let scene = build(name, &options).unwrap();
            assert!(scene.is_initialized(), "{}", name);
            assert!(!scene.lights().is_empty(), "{}", name);
        }
    }

    #[test]
    fn overrides_are_applied() {
        let options = Options::parse_from(["tessera", "point", "-i", "ao", "--spp", "2"]);
        let scene = build("point", &options).unwrap();
        assert_eq!(scene.integrator().map(|i| i.name()), Some("ao"));
        assert_eq!(scene.sampler().map(|s| s.get_data().samples_per_pixel), Some(2));
    }

    #[test]
    fn unknown_scene() {
        let options = Options::parse_from(["tessera"]);
        assert!(matches!(
            build("teapot", &options),
            Err(ApiError::UnknownReference { kind: "scene", .. })
        ));
    }
}
