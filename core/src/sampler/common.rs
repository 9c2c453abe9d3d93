//! Common

use super::*;

/// Stores the sampler data and implements common functionality for all samplers.
#[derive(Clone, Default, Debug)]
pub struct SamplerData {
    /// Number of samples generated for each pixel.
    pub samples_per_pixel: usize,

    /// Base seed mixed into every per-tile reseed.
    pub seed: u64,

    /// Coordinates of current pixel being generated.
    pub current_pixel: Point2i,

    /// Sample number of the pixel currently being generated.
    pub current_pixel_sample_index: usize,
}

impl SamplerData {
    /// Create a new `SamplerData` instance.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Base seed.
    pub fn new(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            samples_per_pixel: samples_per_pixel.max(1),
            seed,
            current_pixel: Point2i::default(),
            current_pixel_sample_index: 0,
        }
    }

    /// This should be called when the rendering algorithm is ready to start
    /// working on a given pixel.
    ///
    /// * `p` - The pixel.
    pub fn start_pixel(&mut self, p: &Point2i) {
        self.current_pixel = *p;
        self.current_pixel_sample_index = 0;
    }

    /// Advance to the next sample of the current pixel. Returns `true` if
    /// `current_pixel_sample_index` < `samples_per_pixel`; otherwise `false`.
    pub fn start_next_sample(&mut self) -> bool {
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.samples_per_pixel
    }

    /// Returns the sequence index used to reseed for a tile. Mixes the tile
    /// origin with the base seed so that every tile draws from its own
    /// stream regardless of which worker renders it.
    ///
    /// * `tile` - The tile bounds.
    pub fn tile_sequence(&self, tile: &Bounds2i) -> u64 {
        let x = tile.p_min.x as u32 as u64;
        let y = tile.p_min.y as u32 as u64;
        let mut h = (y << 32 | x) ^ self.seed.wrapping_mul(0x9e37_79b9_7f4a_7c15);

        // SplitMix64 finalizer.
        h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        h ^ (h >> 31)
    }
}
