//! Diffuse Area Light

use super::*;

/// Uniform one-sided emitter attached to a shape. Light leaves the surface on
/// the side the geometric normal points to.
#[derive(Clone, Debug)]
pub struct AreaLight {
    /// The emitting shape.
    pub shape: ShapeId,

    /// Emitted radiance.
    pub radiance: Spectrum,
}

impl AreaLight {
    /// Returns a new `AreaLight`.
    ///
    /// * `shape`    - The emitting shape.
    /// * `radiance` - Emitted radiance.
    pub fn new(shape: ShapeId, radiance: Spectrum) -> Self {
        Self { shape, radiance }
    }

    /// Returns the emitted radiance leaving a point with normal `n` in
    /// direction `w`.
    ///
    /// * `n` - Geometric normal.
    /// * `w` - Outgoing direction.
    pub fn le(&self, n: &Normal3f, w: &Vector3f) -> Spectrum {
        if n.dot(w) > 0.0 {
            self.radiance
        } else {
            Spectrum::ZERO
        }
    }

    /// Sample a point on the emitter as seen from `ref_p`.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ref_p`  - Reference point.
    /// * `u`      - Sample value in [0, 1)^2.
    pub fn sample_li(&self, shapes: &[Shape], ref_p: &Point3f, u: &Point2f) -> (Spectrum, LightSample) {
        let shape = &shapes[self.shape.index()];
        let ss = match shape.kind.sample_solid_angle(ref_p, u) {
            Some(ss) => ss,
            None => return (Spectrum::ZERO, LightSample::default()),
        };

        let d = ss.p - *ref_p;
        let dist = d.length();
        if dist == 0.0 || ss.pdf == 0.0 {
            return (Spectrum::ZERO, LightSample::default());
        }
        let wi = d / dist;

        // Back-facing samples carry nothing.
        let l = self.le(&ss.n, &-wi);
        if l.is_black() {
            return (Spectrum::ZERO, LightSample::default());
        }

        let ls = LightSample {
            p: ss.p,
            n: ss.n,
            wi,
            dist,
            pdf: ss.pdf,
            measure: Measure::SolidAngle,
            light: None,
        };
        (l / ss.pdf, ls)
    }

    /// Returns the solid angle density of sampling the point in `ls`.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ref_p`  - Reference point.
    /// * `ls`     - The light sample.
    pub fn pdf_li(&self, shapes: &[Shape], ref_p: &Point3f, ls: &LightSample) -> Float {
        if ls.n.dot(&ls.wi) >= 0.0 {
            return 0.0;
        }
        shapes[self.shape.index()]
            .kind
            .pdf_solid_angle(ref_p, &ls.p, &ls.n)
    }

    /// Return the total emitted power.
    ///
    /// * `shapes` - The scene shapes.
    pub fn power(&self, shapes: &[Shape]) -> Spectrum {
        self.radiance * (PI * shapes[self.shape.index()].kind.area())
    }
}
