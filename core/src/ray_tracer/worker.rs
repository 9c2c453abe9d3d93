//! Tile rendering

use super::CancellationToken;
use crate::camera::*;
use crate::film::*;
use crate::filter::*;
use crate::geometry::*;
use crate::integrator::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use crossbeam_channel::{Receiver, Sender};

/// Everything a worker reads while rendering tiles. Borrowed from the
/// shared scene for the duration of a render.
pub(super) struct TileContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a dyn Camera,
    pub integrator: &'a dyn Integrator,
    pub filter: &'a dyn Filter,
}

impl<'a> TileContext<'a> {
    /// Render an image tile into a new `ImageBlock`.
    ///
    /// * `tile`    - Tile bounds in image space.
    /// * `sampler` - The worker's private sampler.
    pub fn render_tile(&self, tile: &Bounds2i, sampler: &mut dyn Sampler) -> ImageBlock {
        let mut block = ImageBlock::new(tile.p_min, tile.diagonal(), self.filter);
        sampler.start_tile(tile);

        trace!("Starting image tile {:?}", tile);

        for pixel in *tile {
            sampler.start_pixel(&pixel);

            loop {
                let camera_sample = sampler.get_camera_sample(&pixel);
                let (ray, ray_weight) = self.camera.generate_ray(&camera_sample);

                let mut l = Spectrum::ZERO;
                if !ray_weight.is_black() {
                    l = ray_weight * self.integrator.li(self.scene, sampler, &ray);
                }

                // Drop unexpected radiance values; they never reach the block.
                let sample_index = sampler.get_data().current_pixel_sample_index;
                if l.has_nans() {
                    error!(
                        "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Dropping sample.",
                        pixel.x, pixel.y, sample_index
                    );
                } else if l.y().is_infinite() {
                    error!(
                        "Infinite luminance value returned for pixel ({}, {}), sample {}. Dropping sample.",
                        pixel.x, pixel.y, sample_index
                    );
                } else if !l.is_valid() {
                    error!(
                        "Negative radiance value, {}, returned for pixel ({}, {}), sample {}. Dropping sample.",
                        l, pixel.x, pixel.y, sample_index
                    );
                } else {
                    block.add_sample(&camera_sample.p_film, &l);
                }

                if !sampler.start_next_sample() {
                    break;
                }
            }
        }

        block
    }

    /// Pull tiles from the queue until it is empty or the render is
    /// cancelled, sending each finished block to the aggregator. A tile
    /// already taken from the queue is always finished and reported.
    ///
    /// * `sampler` - The worker's private sampler.
    /// * `tiles`   - The shared tile queue.
    /// * `blocks`  - Channel to the aggregator.
    /// * `token`   - Cancellation token polled between tiles.
    pub fn run(
        &self,
        sampler: &mut dyn Sampler,
        tiles: &Receiver<Bounds2i>,
        blocks: &Sender<ImageBlock>,
        token: &CancellationToken,
    ) {
        while !token.is_cancelled() {
            let tile = match tiles.try_recv() {
                Ok(tile) => tile,
                Err(_) => break,
            };
            let block = self.render_tile(&tile, sampler);
            if blocks.send(block).is_err() {
                break;
            }
        }
    }
}
