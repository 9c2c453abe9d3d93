//! Application related stuff

use crate::ray_tracer::*;
use clap::Parser;
use std::thread;

/// Command line options. Parsed once in the binary and passed down
/// explicitly.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Name of the built-in scene to render.
    #[clap(default_value = "cornell", help = "Scene to render (cornell, spheres, fog, point).")]
    pub scene: String,

    /// Number of threads to use for rendering.
    #[clap(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 = all logical CPUs)."
    )]
    n_threads: usize,

    /// Suppress all text output other than error messages.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[clap(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "render.png",
        help = "Write the final image to the given filename (.png, .exr, ...)."
    )]
    pub image_file: String,

    /// Samples per pixel override.
    #[clap(long = "spp", short = 's', value_name = "NUM", help = "Override the samples per pixel.")]
    pub samples_per_pixel: Option<usize>,

    /// Tile size.
    #[clap(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = DEFAULT_TILE_SIZE,
        help = "Size in pixels of square tiles rendered per thread."
    )]
    pub tile_size: usize,

    /// Image resolution override.
    #[clap(
        long = "resolution",
        short = 'r',
        value_name = "NUM",
        num_args = 2,
        help = "Override the image resolution (width height)."
    )]
    pub resolution: Vec<usize>,

    /// Integrator override.
    #[clap(
        long = "integrator",
        short = 'i',
        value_name = "NAME",
        help = "Override the integrator (direct, path, path_mis, volpath, ao, normals)."
    )]
    pub integrator: Option<String>,

    /// Russian roulette warm-up.
    #[clap(long = "rrdepth", value_name = "NUM", help = "Bounces before Russian roulette starts.")]
    pub rr_depth: Option<usize>,

    /// Path length cap.
    #[clap(long = "maxdepth", value_name = "NUM", help = "Maximum number of bounces.")]
    pub max_depth: Option<usize>,

    /// Base seed.
    #[clap(long, value_name = "NUM", default_value_t = 0, help = "Base seed for the samplers.")]
    pub seed: u64,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = thread::available_parallelism().map_or(1, |n| n.get());
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the resolution override, if any.
    pub fn resolution(&self) -> Option<(usize, usize)> {
        match self.resolution.as_slice() {
            [w, h] if *w > 0 && *h > 0 => Some((*w, *h)),
            [] => None,
            _ => {
                warn!("Invalid resolution {:?}", self.resolution);
                None
            }
        }
    }

    /// Returns the scheduler settings.
    pub fn ray_tracer_config(&self) -> RayTracerConfig {
        RayTracerConfig {
            tile_size: self.tile_size.max(1),
            threads: self.threads(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::parse_from(["tessera"]);
        assert_eq!(options.scene, "cornell");
        assert_eq!(options.tile_size, 64);
        assert_eq!(options.image_file, "render.png");
        assert!(options.threads() >= 1);
        assert_eq!(options.resolution(), None);
    }

    #[test]
    fn overrides() {
        let options = Options::parse_from([
            "tessera", "fog", "-t", "1", "-r", "320", "240", "--spp", "16", "-i", "volpath", "--seed", "9",
        ]);
        assert_eq!(options.scene, "fog");
        assert_eq!(options.threads(), 1);
        assert_eq!(options.resolution(), Some((320, 240)));
        assert_eq!(options.samples_per_pixel, Some(16));
        assert_eq!(options.integrator.as_deref(), Some("volpath"));
        let config = options.ray_tracer_config();
        assert_eq!(config.threads, 1);
        assert_eq!(config.seed, 9);
    }
}
