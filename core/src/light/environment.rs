//! Environment Lights

use super::*;

/// Spherical coordinates (θ, φ) of a local unit direction, φ in [0, 2π).
///
/// * `w` - Local direction.
fn spherical_angles(w: &Vector3f) -> (Float, Float) {
    let theta = safe_acos(w.z);
    let phi = w.y.atan2(w.x);
    let phi = if phi < 0.0 { phi + TWO_PI } else { phi };
    (theta, phi)
}

/// Uniform radiance arriving from every direction.
#[derive(Clone, Debug)]
pub struct ConstantEnvironmentLight {
    /// Radiance.
    pub radiance: Spectrum,

    /// Radius of the scene bounding sphere; set by `preprocess`.
    pub world_radius: Float,
}

impl ConstantEnvironmentLight {
    /// Returns a new `ConstantEnvironmentLight`.
    ///
    /// * `radiance` - Radiance.
    pub fn new(radiance: Spectrum) -> Self {
        Self {
            radiance,
            world_radius: 0.0,
        }
    }

    /// Sample a direction uniformly over the sphere.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_li(&self, u: &Point2f) -> (Spectrum, LightSample) {
        let wi = uniform_sample_sphere(u);
        let pdf = uniform_sphere_pdf();
        let ls = LightSample {
            p: Point3f::ZERO,
            n: -wi,
            wi,
            dist: INFINITY,
            pdf,
            measure: Measure::SolidAngle,
            light: None,
        };
        (self.radiance / pdf, ls)
    }

    /// Return the total emitted power.
    pub fn power(&self) -> Spectrum {
        self.radiance * (PI * self.world_radius * self.world_radius)
    }
}

/// Latitude-longitude radiance map importance sampled by luminance. The map
/// is laid out around the local +z axis: rows span θ in [0, π] and columns
/// span φ in [0, 2π).
#[derive(Clone, Debug)]
pub struct EnvironmentMapLight {
    /// Orientation of the map in world space.
    pub frame: Frame,

    /// Map width in texels.
    pub width: usize,

    /// Map height in texels.
    pub height: usize,

    /// Texels stored row by row.
    pub texels: Vec<Spectrum>,

    /// Sampling distribution over the map.
    pub distribution: Distribution2D,

    /// Radius of the scene bounding sphere; set by `preprocess`.
    pub world_radius: Float,
}

impl EnvironmentMapLight {
    /// Returns a new `EnvironmentMapLight`. Returns `None` if the texel count
    /// does not match the resolution.
    ///
    /// * `frame`  - Orientation of the map; its normal is the map's zenith.
    /// * `width`  - Map width in texels.
    /// * `height` - Map height in texels.
    /// * `texels` - Texels stored row by row.
    pub fn new(frame: Frame, width: usize, height: usize, texels: Vec<Spectrum>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width * height {
            warn!(
                "Environment map has {} texels, expected {} x {}",
                texels.len(),
                width,
                height
            );
            return None;
        }

        // Weight rows by sin θ to account for the lat-long stretch near the
        // poles.
        let mut func = Vec::with_capacity(width * height);
        for v in 0..height {
            let sin_theta = (PI * (v as Float + 0.5) / height as Float).sin();
            func.extend(texels[v * width..(v + 1) * width].iter().map(|t| t.y().max(0.0) * sin_theta));
        }
        let distribution = Distribution2D::new(&func, width, height);

        Some(Self {
            frame,
            width,
            height,
            texels,
            distribution,
            world_radius: 0.0,
        })
    }

    /// Build a procedural sky with a horizon-to-zenith gradient, a dark
    /// ground and a small bright sun.
    ///
    /// * `frame`     - Orientation of the map; its normal is the zenith.
    /// * `width`     - Map width in texels.
    /// * `height`    - Map height in texels.
    /// * `zenith`    - Radiance straight up.
    /// * `horizon`   - Radiance at the horizon.
    /// * `sun_dir`   - Local direction towards the sun.
    /// * `sun`       - Radiance of the sun disk.
    pub fn sky(
        frame: Frame,
        width: usize,
        height: usize,
        zenith: Spectrum,
        horizon: Spectrum,
        sun_dir: Vector3f,
        sun: Spectrum,
    ) -> Option<Self> {
        let sun_dir = sun_dir.normalize();
        let cos_sun = radians(2.5).cos();
        let mut texels = Vec::with_capacity(width * height);
        for v in 0..height {
            let theta = PI * (v as Float + 0.5) / height as Float;
            for u in 0..width {
                let phi = TWO_PI * (u as Float + 0.5) / width as Float;
                let w = Vector3f::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
                let mut l = if w.z >= 0.0 {
                    lerp(w.z, horizon, zenith)
                } else {
                    horizon * 0.1
                };
                if w.dot(&sun_dir) >= cos_sun {
                    l += sun;
                }
                texels.push(l);
            }
        }
        Self::new(frame, width, height, texels)
    }

    /// Returns the texel containing the map coordinates `uv`.
    ///
    /// * `uv` - Map coordinates in [0, 1)^2.
    fn lookup(&self, uv: &Point2f) -> Spectrum {
        let x = clamp((uv.x * self.width as Float) as usize, 0, self.width - 1);
        let y = clamp((uv.y * self.height as Float) as usize, 0, self.height - 1);
        self.texels[y * self.width + x]
    }

    /// Returns the radiance arriving from world direction `d`.
    ///
    /// * `d` - Direction pointing away from the scene.
    pub fn eval(&self, d: &Vector3f) -> Spectrum {
        let (theta, phi) = spherical_angles(&self.frame.to_local(&d.normalize()));
        self.lookup(&Point2f::new(phi * INV_TWO_PI, theta * INV_PI))
    }

    /// Importance sample a direction from the map.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    pub fn sample_li(&self, u: &Point2f) -> (Spectrum, LightSample) {
        let (uv, map_pdf) = self.distribution.sample_continuous(u);
        if map_pdf == 0.0 {
            return (Spectrum::ZERO, LightSample::default());
        }

        let theta = uv.y * PI;
        let phi = uv.x * TWO_PI;
        let sin_theta = theta.sin();
        if sin_theta == 0.0 {
            return (Spectrum::ZERO, LightSample::default());
        }
        let local = Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos());
        let wi = self.frame.to_world(&local);
        let pdf = map_pdf / (2.0 * PI * PI * sin_theta);

        let ls = LightSample {
            p: Point3f::ZERO,
            n: -wi,
            wi,
            dist: INFINITY,
            pdf,
            measure: Measure::SolidAngle,
            light: None,
        };
        (self.lookup(&uv) / pdf, ls)
    }

    /// Returns the solid angle density of sampling direction `wi`.
    ///
    /// * `wi` - World direction.
    pub fn pdf_li(&self, wi: &Vector3f) -> Float {
        let (theta, phi) = spherical_angles(&self.frame.to_local(wi));
        let sin_theta = theta.sin();
        if sin_theta == 0.0 {
            return 0.0;
        }
        self.distribution
            .pdf(&Point2f::new(phi * INV_TWO_PI, theta * INV_PI))
            / (2.0 * PI * PI * sin_theta)
    }

    /// Return the total emitted power using the average texel.
    pub fn power(&self) -> Spectrum {
        let mut sum = Spectrum::ZERO;
        for t in self.texels.iter() {
            sum += *t;
        }
        let avg = sum / self.texels.len() as Float;
        avg * (PI * self.world_radius * self.world_radius)
    }
}
