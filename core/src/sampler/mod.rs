//! Sampler

mod common;
mod pixel_sampler;

use crate::base::*;
use crate::camera::*;
use crate::geometry::*;
use crate::rng::*;

// Re-export
pub use common::*;
pub use pixel_sampler::*;

/// Sampler interface. Every render worker owns a private clone.
pub trait Sampler: Send + Sync {
    /// Returns a shared reference underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData;

    /// Returns a mutable reference to underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData;

    /// Generates a new instance of an initial `Sampler` for use by a rendering thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler>;

    /// Restart the random stream.
    ///
    /// * `sequence` - Sequence index for the random number generator.
    fn reseed(&mut self, sequence: u64);

    /// Returns the number of samples generated for each pixel.
    fn samples_per_pixel(&self) -> usize {
        self.get_data().samples_per_pixel
    }

    /// This should be called before rendering a tile. Reseeds from the tile
    /// origin so that the image does not depend on thread scheduling.
    ///
    /// * `tile` - The tile bounds.
    fn start_tile(&mut self, tile: &Bounds2i) {
        let sequence = self.get_data().tile_sequence(tile);
        self.reseed(sequence);
    }

    /// This should be called when the rendering algorithm is ready to start working on a given pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        self.get_data_mut().start_pixel(p);
    }

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns an initialized `CameraSample` for a given pixel. Pixel centers
    /// sit at half-integer film coordinates.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(p_raster.x as Float + film_sample.x, p_raster.y as Float + film_sample.y);

        let time = self.get_1d();
        let p_lens = self.get_2d();

        CameraSample::new(p_film, p_lens, time)
    }

    /// Advance to the next sample of the current pixel. Returns `true` if
    /// `current_pixel_sample_index` < `samples_per_pixel`; otherwise `false`.
    fn start_next_sample(&mut self) -> bool {
        self.get_data_mut().start_next_sample()
    }
}

// Implement `Sampler` so `Box<dyn Sampler>` can be passed around where `&mut dyn Sampler` is expected.
impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn get_data(&self) -> &SamplerData {
        (**self).get_data()
    }

    #[inline]
    fn get_data_mut(&mut self) -> &mut SamplerData {
        (**self).get_data_mut()
    }

    #[inline]
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        (**self).clone_sampler(seed)
    }

    #[inline]
    fn reseed(&mut self, sequence: u64) {
        (**self).reseed(sequence);
    }

    #[inline]
    fn samples_per_pixel(&self) -> usize {
        (**self).samples_per_pixel()
    }

    #[inline]
    fn start_tile(&mut self, tile: &Bounds2i) {
        (**self).start_tile(tile);
    }

    #[inline]
    fn start_pixel(&mut self, p: &Point2i) {
        (**self).start_pixel(p);
    }

    #[inline]
    fn get_1d(&mut self) -> Float {
        (**self).get_1d()
    }

    #[inline]
    fn get_2d(&mut self) -> Point2f {
        (**self).get_2d()
    }

    #[inline]
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        (**self).get_camera_sample(p_raster)
    }

    #[inline]
    fn start_next_sample(&mut self) -> bool {
        (**self).start_next_sample()
    }
}

/// A minimal independent sampler used by unit tests across the crate.
#[cfg(test)]
pub(crate) struct TestSampler {
    pub data: SamplerData,
    pub rng: RNG,
}

#[cfg(test)]
impl TestSampler {
    pub fn new(seed: u64) -> Self {
        Self::with_samples(1, seed)
    }

    pub fn with_samples(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            data: SamplerData::new(samples_per_pixel, seed),
            rng: RNG::new(seed),
        }
    }
}

#[cfg(test)]
impl Sampler for TestSampler {
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::with_samples(self.data.samples_per_pixel, seed))
    }

    fn reseed(&mut self, sequence: u64) {
        self.rng.set_sequence(sequence);
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_sequences_differ_per_tile() {
        let data = SamplerData::new(4, 7);
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(64, 64));
        let b = Bounds2i::new(Point2i::new(64, 0), Point2i::new(128, 64));
        assert_ne!(data.tile_sequence(&a), data.tile_sequence(&b));
        assert_eq!(data.tile_sequence(&a), SamplerData::new(1, 7).tile_sequence(&a));
    }

    #[test]
    fn start_tile_is_deterministic() {
        let tile = Bounds2i::new(Point2i::new(128, 64), Point2i::new(192, 128));
        let mut s1 = TestSampler::new(3);
        let mut s2 = TestSampler::new(3);
        s2.get_2d();
        s1.start_tile(&tile);
        s2.start_tile(&tile);
        assert_eq!(s1.get_1d(), s2.get_1d());
        assert_eq!(s1.get_2d(), s2.get_2d());
    }

    #[test]
    fn pixel_sampler_falls_back_to_rng() {
        let mut ps = PixelSampler::new(2, 1, 0);
        ps.samples_1d[0] = vec![0.25, 0.75];
        ps.start_pixel(&Point2i::new(0, 0));
        assert_eq!(ps.get_1d(), 0.25);
        let r = ps.get_1d();
        assert!((0.0..1.0).contains(&r));
        assert!(ps.start_next_sample());
        assert_eq!(ps.get_1d(), 0.75);
        assert!(!ps.start_next_sample());
    }

    #[test]
    fn camera_sample_lies_in_pixel() {
        let mut s = TestSampler::new(1);
        let cs = s.get_camera_sample(&Point2i::new(5, 9));
        assert!(cs.p_film.x >= 5.0 && cs.p_film.x < 6.0);
        assert!(cs.p_film.y >= 9.0 && cs.p_film.y < 10.0);
    }
}
