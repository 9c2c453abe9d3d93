#[macro_use]
extern crate log;

mod scenes;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::process;
use tessera_core::app::*;
use tessera_core::image_io::*;
use tessera_core::ray_tracer::*;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = render(&options) {
        error!("{e}");
        process::exit(1);
    }
}

fn render(options: &Options) -> Result<(), String> {
    let scene = scenes::build(&options.scene, options).map_err(|e| e.to_string())?;

    let mut rt = RayTracer::new(options.ray_tracer_config());
    if !rt.initialize_scene(scene) {
        return Err(String::from("Unable to load the scene"));
    }
    if let Some((width, height)) = options.resolution() {
        if !rt.set_image_size(width, height) {
            return Err(format!("Unable to set the resolution to {width} x {height}"));
        }
    }

    let progress = if options.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let bar = progress.clone();
    rt.set_progress_callback(Box::new(move |update: &RenderUpdate| {
        bar.set_length(update.total_blocks as u64);
        bar.set_position(update.blocks_rendered as u64);
    }));

    if !rt.start() {
        return Err(format!("Unable to render scene '{}'", options.scene));
    }
    rt.wait();
    progress.finish();

    let image = rt.image().ok_or("Render produced no image")?;
    write_image(&options.image_file, image)?;
    if !options.quiet {
        info!("Wrote {} ({} x {})", options.image_file, image.width, image.height);
    }
    Ok(())
}
