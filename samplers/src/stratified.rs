//! Stratified Sampler.

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::sampler::*;
use tessera_core::sampling::*;

/// Implements a stratified sampler that subdivides pixel areas into
/// non-overlapping rectangular regions, called strata, and generates a single
/// sample inside each region. Only the first `n_sampled_dimensions` 1D and 2D
/// dimensions are stratified; later ones are independent random samples.
pub struct StratifiedSampler {
    /// Use a pixel sampler.
    sampler: PixelSampler,

    /// Number of samples in horizontal direction.
    x_pixel_samples: usize,

    /// Number of samples in vertical direction.
    y_pixel_samples: usize,

    /// Indicates whether or not to jitter each sample's center point.
    /// In unjittered mode is is uniform sampling and is not useful for
    /// high quality rendering but mostly for comparing sampling techniques.
    jitter_samples: bool,
}

impl StratifiedSampler {
    /// Create a new `StratifiedSampler`.
    ///
    /// * `x_pixel_samples`      - Number of samples in horizontal direction.
    /// * `y_pixel_samples`      - Number of samples in vertical direction.
    /// * `jitter_samples`       - Indicates whether or not to jitter each
    ///                            sample's center point.
    /// * `n_sampled_dimensions` - Number of dimensions for sampling.
    /// * `seed`                 - Base seed for the random number generator.
    pub fn new(
        x_pixel_samples: usize,
        y_pixel_samples: usize,
        jitter_samples: bool,
        n_sampled_dimensions: usize,
        seed: u64,
    ) -> Self {
        if x_pixel_samples == 0 || y_pixel_samples == 0 {
            warn!("Stratified sampler needs at least one stratum per axis. Using 1.");
        }
        let x_pixel_samples = x_pixel_samples.max(1);
        let y_pixel_samples = y_pixel_samples.max(1);
        let samples_per_pixel = x_pixel_samples * y_pixel_samples;
        Self {
            sampler: PixelSampler::new(samples_per_pixel, n_sampled_dimensions, seed),
            x_pixel_samples,
            y_pixel_samples,
            jitter_samples,
        }
    }
}

impl Sampler for StratifiedSampler {
    fn get_data(&self) -> &SamplerData {
        &self.sampler.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.sampler.data
    }

    /// Generates a new instance of an initial `Sampler` for use by a rendering
    /// thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::new(
            self.x_pixel_samples,
            self.y_pixel_samples,
            self.jitter_samples,
            self.sampler.samples_1d.len(),
            seed,
        ))
    }

    fn reseed(&mut self, sequence: u64) {
        self.sampler.rng.set_sequence(sequence);
    }

    /// This should be called when the rendering algorithm is ready to start
    /// working on a given pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        let samples_per_pixel = self.sampler.data.samples_per_pixel;
        let rng = &mut self.sampler.rng;

        // Generate single stratified samples for the pixel.
        for dimension in self.sampler.samples_1d.iter_mut() {
            let mut samples = stratified_sample_1d(rng, samples_per_pixel, self.jitter_samples);
            rng.shuffle(&mut samples, samples_per_pixel, 1);
            dimension.copy_from_slice(&samples);
        }

        for dimension in self.sampler.samples_2d.iter_mut() {
            let mut samples =
                stratified_sample_2d(rng, self.x_pixel_samples, self.y_pixel_samples, self.jitter_samples);
            rng.shuffle(&mut samples, samples_per_pixel, 1);
            dimension.copy_from_slice(&samples);
        }

        self.sampler.start_pixel(p);
    }

    /// Returns the sample value for the next dimension of the current sample
    /// vector.
    fn get_1d(&mut self) -> Float {
        self.sampler.get_1d()
    }

    /// Returns the sample value for the next two dimensions of the current
    /// sample vector.
    fn get_2d(&mut self) -> Point2f {
        self.sampler.get_2d()
    }

    /// Reset the current sample dimension counter. Returns `true` if
    /// `current_pixel_sample_index` < `samples_per_pixel`; otherwise `false`.
    fn start_next_sample(&mut self) -> bool {
        self.sampler.start_next_sample()
    }
}

impl From<&ParamSet> for StratifiedSampler {
    /// Create a `StratifiedSampler` from `ParamSet`.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let x_samples = params.find_one_count("xsamples", 4);
        let y_samples = params.find_one_count("ysamples", 4);
        let jitter = params.find_one_bool("jitter", true);
        let sd = params.find_one_count("dimensions", 4);
        let seed = params.find_one_count("seed", 0) as u64;
        Self::new(x_samples, y_samples, jitter, sd, seed)
    }
}
