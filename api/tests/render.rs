//! End to end renders of scenes with known radiance.

use api::*;
use std::sync::{Arc, Mutex};
use tessera_core::base::*;
use tessera_core::camera::*;
use tessera_core::geometry::*;
use tessera_core::ray_tracer::*;
use tessera_core::spectrum::*;

const RES: usize = 32;
const SPP: i32 = 64;

/// A unit sphere at the origin seen from (0, 0, 10) through a narrow
/// perspective camera, with a box filter so each pixel is the plain mean of
/// its samples.
fn sphere_builder(albedo: Float, integrator: &str) -> SceneBuilder {
    let mut b = SceneBuilder::default();
    b.named_bsdf("matte", "diffuse", &ParamSet::new().with_spectrum("albedo", Spectrum::new(albedo)))
        .unwrap();
    b.shape(
        "sphere",
        &ParamSet::new()
            .with_float("radius", 1.0)
            .with_string("bsdf", String::from("matte")),
    )
    .unwrap();
    b.camera(
        "perspective",
        &ParamSet::new()
            .with_point3f("position", Point3f::new(0.0, 0.0, 10.0))
            .with_point3f("lookat", Point3f::ZERO)
            .with_float("fov", 20.0)
            .with_int("xres", RES as i32)
            .with_int("yres", RES as i32),
    )
    .unwrap();
    b.integrator(integrator, &ParamSet::new()).unwrap();
    b.sampler("independent", &ParamSet::new().with_int("pixelsamples", SPP))
        .unwrap();
    b.filter("box", &ParamSet::new()).unwrap();
    b
}

fn render(scene: tessera_core::scene::Scene) -> tessera_core::film::RenderedImage {
    let mut rt = RayTracer::new(RayTracerConfig {
        tile_size: 8,
        threads: 4,
        seed: 7,
    });
    assert!(rt.initialize_scene(scene));
    assert!(rt.start());
    rt.wait();
    assert_eq!(rt.status(), RenderStatus::Free);
    rt.image().cloned().unwrap()
}

#[test]
fn point_lit_sphere_converges_to_analytic_radiance() {
    let albedo = 0.8;
    let intensity = 8.0;
    let light_pos = Point3f::new(0.0, 0.0, 5.0);

    let mut b = sphere_builder(albedo, "path_mis");
    b.light(
        "point",
        &ParamSet::new()
            .with_point3f("position", light_pos)
            .with_spectrum("intensity", Spectrum::new(intensity)),
    )
    .unwrap();
    let scene = b.build().unwrap();

    // Reference: the analytic radiance averaged over an 8 x 8 grid of film
    // positions per pixel. Only pixels the sphere fully covers are compared.
    let camera = scene.camera().unwrap();
    let mut reference = vec![None; RES * RES];
    for y in 0..RES {
        for x in 0..RES {
            let mut sum = 0.0;
            let mut covered = true;
            for j in 0..8 {
                for i in 0..8 {
                    let p_film = Point2f::new(
                        x as Float + (i as Float + 0.5) / 8.0,
                        y as Float + (j as Float + 0.5) / 8.0,
                    );
                    let (ray, _) = camera.generate_ray(&CameraSample::new(p_film, Point2f::zero(), 0.0));
                    match scene.ray_intersect(&ray) {
                        Some(its) => {
                            let n = its.p.normalize();
                            let to_light = light_pos - its.p;
                            let d2 = to_light.length_squared();
                            let cos = n.dot(&to_light.normalize()).max(0.0);
                            sum += albedo * INV_PI * intensity * cos / d2;
                        }
                        None => covered = false,
                    }
                }
            }
            if covered {
                reference[y * RES + x] = Some(sum / 64.0);
            }
        }
    }

    let image = render(scene);
    assert_eq!((image.width, image.height), (RES, RES));

    let mut err2 = 0.0;
    let mut n = 0;
    for y in 0..RES {
        for x in 0..RES {
            if let Some(expected) = reference[y * RES + x] {
                let got = image.pixel(x, y);
                for c in 0..3 {
                    err2 += (got[c] - expected) * (got[c] - expected);
                }
                n += 3;
            }
        }
    }
    assert!(n > 100, "only {} channels covered", n);
    let rms = (err2 / n as Float).sqrt();
    assert!(rms < 1e-2, "rms error {}", rms);
}

#[test]
fn white_furnace_sphere() {
    let albedo = 0.5;
    let mut b = sphere_builder(albedo, "path_mis");
    b.light("constant", &ParamSet::new()).unwrap();
    let image = render(b.build().unwrap());

    // A 4 x 4 block in the middle of the sphere.
    let mut sum = 0.0;
    for y in RES / 2 - 2..RES / 2 + 2 {
        for x in RES / 2 - 2..RES / 2 + 2 {
            sum += image.pixel(x, y)[1];
        }
    }
    let mean = sum / 16.0;
    assert!((mean - albedo).abs() < 0.03, "sphere radiance {}", mean);

    // Corners see the environment directly.
    let corner = image.pixel(0, 0);
    assert!((corner[0] - 1.0).abs() < 1e-4, "background {}", corner);
}

#[test]
fn integrators_agree_on_direct_lighting() {
    let build = |integrator: &str| {
        let mut b = sphere_builder(0.5, integrator);
        b.light(
            "directional",
            &ParamSet::new()
                .with_vector3f("direction", Vector3f::new(0.0, 0.0, -1.0))
                .with_spectrum("irradiance", Spectrum::new(2.0)),
        )
        .unwrap();
        b.build().unwrap()
    };

    let center = |image: &tessera_core::film::RenderedImage| image.pixel(RES / 2, RES / 2)[0];
    let expected = 0.5 * INV_PI * 2.0;
    for integrator in ["direct", "path_mis", "volpath"] {
        let image = render(build(integrator));
        let got = center(&image);
        assert!((got - expected).abs() < 0.01, "{}: {} vs {}", integrator, got, expected);
    }
}

#[test]
fn progress_reaches_every_tile() {
    let mut b = sphere_builder(0.5, "normals");
    b.light("point", &ParamSet::new()).unwrap();
    let scene = b.build().unwrap();

    let mut rt = RayTracer::new(RayTracerConfig {
        tile_size: 8,
        threads: 2,
        seed: 0,
    });
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    assert!(rt.initialize_scene(scene));
    assert!(rt.set_progress_callback(Box::new(move |u: &RenderUpdate| {
        sink.lock().unwrap().push((u.blocks_rendered, u.total_blocks));
    })));
    assert!(rt.start());
    rt.wait();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 16);
    assert!(updates.iter().all(|&(_, total)| total == 16));
    assert_eq!(updates.last().map(|u| u.0), Some(16));
}

#[test]
fn stop_then_restart() {
    let mut b = sphere_builder(0.5, "path_mis");
    b.light("point", &ParamSet::new()).unwrap();
    let mut rt = RayTracer::new(RayTracerConfig {
        tile_size: 4,
        threads: 2,
        seed: 0,
    });
    assert!(rt.initialize_scene(b.build().unwrap()));
    assert!(rt.start());
    rt.stop();
    assert_eq!(rt.status(), RenderStatus::Free);

    assert!(rt.set_image_size(16, 8));
    assert!(rt.start());
    rt.wait();
    let image = rt.image().unwrap();
    assert_eq!((image.width, image.height), (16, 8));
}
