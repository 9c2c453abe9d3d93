//! Random Sampler.

use tessera_core::base::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::rng::*;
use tessera_core::sampler::*;

/// Implements a sampler that uses a PRNG to generate independent uniformly
/// random samples.
pub struct RandomSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Base seed for the random number generator.
    pub fn new(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            data: SamplerData::new(samples_per_pixel, seed),
            rng: RNG::new(seed),
        }
    }
}

impl Sampler for RandomSampler {
    /// Returns a shared reference underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    /// Returns a mutable reference to underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    /// Generates a new instance of an initial `Sampler` for use by a rendering thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::new(self.data.samples_per_pixel, seed))
    }

    fn reseed(&mut self, sequence: u64) {
        self.rng.set_sequence(sequence);
    }

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
    }
}

impl From<&ParamSet> for RandomSampler {
    /// Create a `RandomSampler` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let samples_per_pixel = params.find_one_count("pixelsamples", 4);
        let seed = params.find_one_count("seed", 0) as u64;
        Self::new(samples_per_pixel, seed)
    }
}
