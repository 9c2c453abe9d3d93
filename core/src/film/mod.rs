//! Film

use crate::base::*;
use crate::filter::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::fmt;

mod image_block;

// Re-export.
pub use image_block::*;

/// A resolved image of linear RGB float triples stored row by row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: usize,

    /// Height in pixels.
    pub height: usize,

    /// RGB triples, `width * height * 3` values.
    pub rgb: Vec<Float>,
}

impl RenderedImage {
    /// Returns a black image.
    ///
    /// * `width`  - Width in pixels.
    /// * `height` - Height in pixels.
    pub fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: vec![0.0; width * height * 3],
        }
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn pixel(&self, x: usize, y: usize) -> Spectrum {
        let i = (y * self.width + x) * 3;
        Spectrum::rgb(self.rgb[i], self.rgb[i + 1], self.rgb[i + 2])
    }

    /// Copy a block of interior pixels into the image.
    ///
    /// * `x`      - Column of the block origin.
    /// * `y`      - Row of the block origin.
    /// * `width`  - Block width.
    /// * `height` - Block height.
    /// * `data`   - RGB triples of the block, row by row.
    pub fn blit(&mut self, x: usize, y: usize, width: usize, height: usize, data: &[Float]) {
        for row in 0..height {
            if y + row >= self.height {
                break;
            }
            let w = width.min(self.width.saturating_sub(x));
            let src = row * width * 3;
            let dst = ((y + row) * self.width + x) * 3;
            self.rgb[dst..dst + w * 3].copy_from_slice(&data[src..src + w * 3]);
        }
    }
}

/// Full resolution accumulator of image blocks.
pub struct Film {
    /// Image resolution.
    pub resolution: Point2i,

    /// Stores the image pixels.
    pixels: Vec<WeightedPixel>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution` - Image resolution.
    pub fn new(resolution: Point2i) -> Self {
        let n = (resolution.x.max(0) * resolution.y.max(0)) as usize;
        Self {
            resolution,
            pixels: vec![WeightedPixel::default(); n],
        }
    }

    /// Returns the image bounds.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::new(0, 0), self.resolution)
    }

    /// Reset all pixels to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(WeightedPixel::default());
    }

    /// Merge a block's weighted sums, border included, into the image.
    /// Border pixels outside the image are discarded.
    ///
    /// * `block` - The block to merge.
    pub fn merge_block(&mut self, block: &ImageBlock) {
        let width = self.resolution.x;
        let bounds = self.bounds();
        let pixels = &mut self.pixels;
        block.for_each_bordered(|p, wp| {
            if bounds.contains(&p) {
                let pixel = &mut pixels[(p.y * width + p.x) as usize];
                pixel.sum += wp.sum;
                pixel.weight += wp.weight;
            }
        });
    }

    /// Returns the normalized image.
    pub fn resolve(&self) -> RenderedImage {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for p in self.pixels.iter() {
            rgb.extend_from_slice(&p.resolve().to_rgb());
        }
        RenderedImage {
            width: self.resolution.x.max(0) as usize,
            height: self.resolution.y.max(0) as usize,
            rgb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    struct TestFilter {
        radius: Float,
    }

    impl Filter for TestFilter {
        fn radius(&self) -> Float {
            self.radius
        }

        fn evaluate(&self, x: Float) -> Float {
            // Tent profile.
            (self.radius - x.abs()).max(0.0)
        }

        fn name(&self) -> &'static str {
            "test"
        }
    }

    #[test]
    fn border_matches_radius() {
        let size = Point2i::new(8, 8);
        let b = ImageBlock::new(Point2i::new(0, 0), size, &TestFilter { radius: 0.5 });
        assert_eq!(b.border(), 0);
        let b = ImageBlock::new(Point2i::new(0, 0), size, &TestFilter { radius: 1.0 });
        assert_eq!(b.border(), 1);
        let b = ImageBlock::new(Point2i::new(0, 0), size, &TestFilter { radius: 2.0 });
        assert_eq!(b.border(), 2);
    }

    #[test]
    fn rejects_invalid_radiance() {
        let mut b = ImageBlock::new(Point2i::new(0, 0), Point2i::new(4, 4), &TestFilter { radius: 1.0 });
        let p = Point2f::new(1.5, 1.5);
        assert!(!b.add_sample(&p, &Spectrum::rgb(Float::NAN, 0.0, 0.0)));
        assert!(!b.add_sample(&p, &Spectrum::rgb(-1.0, 0.0, 0.0)));
        assert!(!b.add_sample(&p, &Spectrum::new(Float::INFINITY)));
        assert!(b.get_raw().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn empty_pixels_are_black() {
        let b = ImageBlock::new(Point2i::new(0, 0), Point2i::new(3, 2), &TestFilter { radius: 1.0 });
        let raw = b.get_raw();
        assert_eq!(raw.len(), 3 * 2 * 3);
        assert!(raw.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn get_raw_covers_interior_only() {
        let mut b = ImageBlock::new(Point2i::new(10, 20), Point2i::new(2, 2), &TestFilter { radius: 2.0 });
        // Sample in the left border region of the block.
        assert!(b.add_sample(&Point2f::new(9.5, 20.5), &Spectrum::new(1.0)));
        let raw = b.get_raw();
        assert_eq!(raw.len(), 12);
        // (10, 20) is within the footprint and receives the normalized value.
        assert!(approx_eq!(Float, raw[0], 1.0, epsilon = 1e-6));
    }

    #[test]
    fn film_merges_borders_across_tiles() {
        let filter = TestFilter { radius: 1.5 };
        let mut film = Film::new(Point2i::new(4, 1));
        let mut left = ImageBlock::new(Point2i::new(0, 0), Point2i::new(2, 1), &filter);
        let mut right = ImageBlock::new(Point2i::new(2, 0), Point2i::new(2, 1), &filter);
        // Both samples sit on the shared tile edge, equidistant from the
        // centers of pixels 1 and 2.
        left.add_sample(&Point2f::new(2.0, 0.5), &Spectrum::new(2.0));
        right.add_sample(&Point2f::new(2.0, 0.5), &Spectrum::new(4.0));
        film.merge_block(&left);
        film.merge_block(&right);
        let img = film.resolve();
        assert!(approx_eq!(Float, img.pixel(1, 0)[0], 3.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, img.pixel(2, 0)[0], 3.0, epsilon = 1e-5));
    }

    #[test]
    fn blit_copies_rows() {
        let mut img = RenderedImage::black(3, 2);
        img.blit(1, 1, 2, 1, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(img.pixel(1, 1), Spectrum::rgb(1.0, 2.0, 3.0));
        assert_eq!(img.pixel(2, 1), Spectrum::rgb(4.0, 5.0, 6.0));
        assert_eq!(img.pixel(0, 0), Spectrum::ZERO);
    }

    proptest! {
        #[test]
        fn zero_radius_round_trip(
            x in 0i32..16, y in 0i32..16,
            r in 0.0f32..10.0, g in 0.0f32..10.0, b in 0.0f32..10.0,
        ) {
            let mut block = ImageBlock::new(Point2i::new(0, 0), Point2i::new(16, 16), &TestFilter { radius: 0.0 });
            let v = Spectrum::rgb(r, g, b);
            prop_assert!(block.add_sample(&Point2f::new(x as Float + 0.5, y as Float + 0.5), &v));
            let raw = block.get_raw();
            let i = ((y * 16 + x) * 3) as usize;
            prop_assert_eq!(raw[i], r);
            prop_assert_eq!(raw[i + 1], g);
            prop_assert_eq!(raw[i + 2], b);
        }

        #[test]
        fn constant_radiance_reconstructs_exactly(
            sx in 0.0f32..8.0, sy in 0.0f32..8.0, v in 0.1f32..5.0,
        ) {
            let mut block = ImageBlock::new(Point2i::new(0, 0), Point2i::new(8, 8), &TestFilter { radius: 1.5 });
            block.add_sample(&Point2f::new(sx, sy), &Spectrum::new(v));
            for c in block.get_raw() {
                prop_assert!(c == 0.0 || approx_eq!(f32, c, v, epsilon = 1e-4 * v));
            }
        }
    }
}
