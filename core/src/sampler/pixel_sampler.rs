//! Pixel Sampler.

use super::*;

/// Storage for samplers that generate all sample values of a pixel at a time.
/// Precomputed dimensions are consumed in order; once they run out, samples
/// are drawn from the random number generator.
#[derive(Clone, Debug)]
pub struct PixelSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// Vector of 1D sample values, one vector per dimension.
    pub samples_1d: Vec<Vec<Float>>,

    /// Vector of 2D sample values, one vector per dimension.
    pub samples_2d: Vec<Vec<Point2f>>,

    /// Offset into the `samples_1d` array for the current pixel sample. It must
    /// be reset to 0 at the start of each new sample.
    pub current_1d_dimension: usize,

    /// Offset into the `samples_2d` array for the current pixel sample. It must
    /// be reset to 0 at the start of each new sample.
    pub current_2d_dimension: usize,

    /// The random number generator.
    pub rng: RNG,
}

impl PixelSampler {
    /// Create a new `PixelSampler`.
    ///
    /// * `samples_per_pixel`    - Number of samples per pixel.
    /// * `n_sampled_dimensions` - Number of dimensions for sampling.
    /// * `seed`                 - Base seed for the random number generator.
    pub fn new(samples_per_pixel: usize, n_sampled_dimensions: usize, seed: u64) -> Self {
        let data = SamplerData::new(samples_per_pixel, seed);
        let spp = data.samples_per_pixel;
        Self {
            data,
            samples_1d: vec![vec![0.0; spp]; n_sampled_dimensions],
            samples_2d: vec![vec![Point2f::zero(); spp]; n_sampled_dimensions],
            current_1d_dimension: 0,
            current_2d_dimension: 0,
            rng: RNG::new(seed),
        }
    }

    /// Reset the dimension counters and move to the given pixel.
    ///
    /// * `p` - The pixel.
    pub fn start_pixel(&mut self, p: &Point2i) {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.data.start_pixel(p);
    }

    /// Returns the sample value for the next dimension of the current sample
    /// vector.
    pub fn get_1d(&mut self) -> Float {
        if self.current_1d_dimension < self.samples_1d.len() {
            let r = self.samples_1d[self.current_1d_dimension][self.data.current_pixel_sample_index];
            self.current_1d_dimension += 1;
            r
        } else {
            self.rng.uniform_float()
        }
    }

    /// Returns the sample value for the next two dimensions of the current
    /// sample vector.
    pub fn get_2d(&mut self) -> Point2f {
        if self.current_2d_dimension < self.samples_2d.len() {
            let r = self.samples_2d[self.current_2d_dimension][self.data.current_pixel_sample_index];
            self.current_2d_dimension += 1;
            r
        } else {
            Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
        }
    }

    /// Reset the current sample dimension counter. Returns `true` if
    /// `current_pixel_sample_index` < `samples_per_pixel`; otherwise `false`.
    pub fn start_next_sample(&mut self) -> bool {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.data.start_next_sample()
    }
}
