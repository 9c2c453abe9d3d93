//! Ray tracer
//!
//! Schedules the rendering of a scene as a set of tiles processed by a pool
//! of worker threads. Workers post finished `ImageBlock`s over a channel to a
//! single aggregator that merges them into the `Film` and reports progress.

mod status;
mod tiles;
mod worker;

use crate::film::*;
use crate::geometry::*;
use crate::scene::*;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use worker::TileContext;

// Re-export.
pub use status::*;
pub use tiles::*;

/// Progress report for one finished tile.
#[derive(Clone, Debug)]
pub struct RenderUpdate {
    /// Tile x offset in pixels.
    pub x: usize,

    /// Tile y offset in pixels.
    pub y: usize,

    /// Tile width in pixels.
    pub width: usize,

    /// Tile height in pixels.
    pub height: usize,

    /// Tile interior as RGB triples, row by row.
    pub pixel_data: Vec<crate::base::Float>,

    /// Number of tiles finished so far.
    pub blocks_rendered: usize,

    /// Total number of tiles.
    pub total_blocks: usize,

    /// Number of pixels finished so far.
    pub pixels_rendered: usize,

    /// Total number of pixels.
    pub total_pixels: usize,

    /// Seconds since the render started.
    pub elapsed_seconds: f64,
}

/// Receives a `RenderUpdate` for every finished tile. Called from a single
/// aggregator thread, one update at a time.
pub type ProgressCallback = Box<dyn FnMut(&RenderUpdate) + Send>;

/// Scheduler settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RayTracerConfig {
    /// Tile edge length in pixels.
    pub tile_size: usize,

    /// Number of worker threads; 0 uses the available hardware concurrency.
    pub threads: usize,

    /// Base seed for the sampler clones.
    pub seed: u64,
}

impl RayTracerConfig {
    /// Returns the number of worker threads to spawn.
    pub fn worker_count(&self) -> usize {
        match self.threads {
            0 => thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        }
    }
}

impl Default for RayTracerConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            threads: 0,
            seed: 0,
        }
    }
}

/// What the render thread hands back when it is joined.
type RenderResult = (RenderedImage, Option<ProgressCallback>);

/// Drives rendering of a scene.
pub struct RayTracer {
    /// Scheduler settings.
    config: RayTracerConfig,

    /// The scene. Shared read-only with the render thread while Busy.
    scene: Option<Arc<Scene>>,

    /// Current life cycle state.
    status: SharedStatus,

    /// Cancellation token of the current render.
    token: CancellationToken,

    /// Progress consumer. Moved into the render thread while Busy.
    callback: Option<ProgressCallback>,

    /// The render thread.
    handle: Option<JoinHandle<RenderResult>>,

    /// Last rendered image.
    image: Option<RenderedImage>,
}

impl RayTracer {
    /// Create a new `RayTracer` with no scene.
    ///
    /// * `config` - Scheduler settings.
    pub fn new(config: RayTracerConfig) -> Self {
        Self {
            config,
            scene: None,
            status: SharedStatus::new(),
            token: CancellationToken::new(),
            callback: None,
            handle: None,
            image: None,
        }
    }

    /// Returns the scheduler settings.
    pub fn config(&self) -> &RayTracerConfig {
        &self.config
    }

    /// Returns the current status.
    pub fn status(&self) -> RenderStatus {
        self.status.get()
    }

    /// Returns the loaded scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_deref()
    }

    /// Returns the last rendered image. After `stop()` this holds the tiles
    /// that finished before the render was interrupted.
    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.as_ref()
    }

    /// Load a scene, finishing its initialization if needed. Only valid
    /// while `Free`.
    ///
    /// * `scene` - The scene.
    pub fn initialize_scene(&mut self, mut scene: Scene) -> bool {
        if !self.check_free("initialize_scene") {
            return false;
        }
        if !scene.is_initialized() {
            scene.finish_initialization();
        }
        self.scene = Some(Arc::new(scene));
        self.image = None;
        true
    }

    /// Change the camera resolution. Only valid while `Free` with a scene
    /// loaded.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn set_image_size(&mut self, width: usize, height: usize) -> bool {
        if !self.check_free("set_image_size") {
            return false;
        }
        let camera = self
            .scene
            .as_mut()
            .and_then(Arc::get_mut)
            .and_then(|scene| scene.camera_mut());
        match camera {
            Some(camera) => {
                camera.set_resolution(Point2i::new(width as i32, height as i32));
                true
            }
            None => {
                warn!("set_image_size() needs a scene with a camera");
                false
            }
        }
    }

    /// Install the progress consumer. Not valid while `Busy`.
    ///
    /// * `callback` - Called once per finished tile.
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) -> bool {
        if !self.check_free("set_progress_callback") {
            return false;
        }
        self.callback = Some(callback);
        true
    }

    /// Start rendering on a background thread. A no-op returning `false` if
    /// a render is already in progress or the scene cannot be rendered.
    pub fn start(&mut self) -> bool {
        if self.status() == RenderStatus::Busy {
            warn!("start() called while a render is in progress");
            return false;
        }

        // Collect a previous render that finished on its own.
        self.wait();

        let scene = match self.scene.as_ref() {
            Some(scene) => Arc::clone(scene),
            None => {
                warn!("start() called without a scene");
                return false;
            }
        };
        if scene.camera().is_none()
            || scene.integrator().is_none()
            || scene.sampler().is_none()
            || scene.filter().is_none()
        {
            warn!("start() needs a camera, integrator, sampler and filter");
            return false;
        }

        if !self.status.transition(RenderStatus::Free, RenderStatus::Busy) {
            warn!("start() called while not free");
            return false;
        }

        self.token = CancellationToken::new();
        let token = self.token.clone();
        let status = self.status.clone();
        let config = self.config;
        let callback = self.callback.take();

        info!("Render started");
        let handle = thread::spawn(move || {
            let result = render(&scene, &config, &token, callback);
            if status.transition(RenderStatus::Busy, RenderStatus::Done) {
                info!("Render finished");
            } else {
                info!("Render interrupted");
            }
            result
        });
        self.handle = Some(handle);
        true
    }

    /// Interrupt a render in progress and block until the render thread has
    /// joined. Workers finish the tile they are rendering. Leaves the status
    /// `Free`.
    pub fn stop(&mut self) {
        if self.status.transition(RenderStatus::Busy, RenderStatus::Interrupted) {
            self.token.cancel();
        }
        self.wait();
    }

    /// Block until the current render finishes, collect its image and
    /// return to `Free`. Returns immediately if nothing is rendering.
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok((image, callback)) => {
                    self.image = Some(image);
                    self.callback = callback;
                }
                Err(_) => error!("Render thread panicked"),
            }
        }
        self.status.set(RenderStatus::Free);
    }

    /// Log and return `false` unless the status is `Free`. A render that
    /// finished on its own is collected first.
    ///
    /// * `what` - Name of the operation for the log.
    fn check_free(&mut self, what: &str) -> bool {
        if self.status() == RenderStatus::Done {
            self.wait();
        }
        let status = self.status();
        if status != RenderStatus::Free {
            warn!("{}() ignored while {}", what, status);
            return false;
        }
        true
    }
}

impl Default for RayTracer {
    fn default() -> Self {
        Self::new(RayTracerConfig::default())
    }
}

impl Drop for RayTracer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Render the scene. Runs on the coordinating thread: fills the tile queue,
/// runs the worker pool and aggregates finished blocks into the film.
///
/// * `scene`    - The scene.
/// * `config`   - Scheduler settings.
/// * `token`    - Cancellation token.
/// * `callback` - Progress consumer.
fn render(
    scene: &Scene,
    config: &RayTracerConfig,
    token: &CancellationToken,
    mut callback: Option<ProgressCallback>,
) -> RenderResult {
    let (camera, integrator, sampler, filter) =
        match (scene.camera(), scene.integrator(), scene.sampler(), scene.filter()) {
            (Some(c), Some(i), Some(s), Some(f)) => (c, i, s, f),
            _ => return (RenderedImage::black(0, 0), callback),
        };

    let mut film = Film::new(camera.resolution());
    let tiles = spiral_tiles(&film.bounds(), config.tile_size);
    let total_blocks = tiles.len();
    let total_pixels = film.bounds().area().max(0) as usize;

    let (tile_tx, tile_rx) = crossbeam_channel::unbounded();
    for tile in tiles {
        // The receiver is alive until the end of this function.
        let _ = tile_tx.send(tile);
    }
    drop(tile_tx);

    let n_threads = config.worker_count().min(total_blocks.max(1));
    info!(
        "Rendering {} tiles of {}x{} on {} threads",
        total_blocks, config.tile_size, config.tile_size, n_threads
    );

    let context = TileContext {
        scene,
        camera,
        integrator,
        filter,
    };
    let start = Instant::now();

    thread::scope(|scope| {
        let (block_tx, block_rx) = crossbeam_channel::unbounded::<ImageBlock>();

        // Spawn workers, each with its own sampler. Tiles reseed the sampler
        // from their origin so all clones share the base seed.
        for _ in 0..n_threads {
            let mut sampler = sampler.clone_sampler(config.seed);
            let tiles = tile_rx.clone();
            let blocks = block_tx.clone();
            let context = &context;
            scope.spawn(move || {
                context.run(&mut *sampler, &tiles, &blocks, token);
            });
        }
        drop(block_tx); // Workers hold the remaining senders.

        // Aggregate finished blocks until every worker is done.
        let mut blocks_rendered = 0;
        let mut pixels_rendered = 0;
        for block in block_rx.iter() {
            film.merge_block(&block);

            let size = block.size();
            let offset = block.offset();
            blocks_rendered += 1;
            pixels_rendered += (size.x * size.y) as usize;

            if let Some(callback) = callback.as_mut() {
                callback(&RenderUpdate {
                    x: offset.x as usize,
                    y: offset.y as usize,
                    width: size.x as usize,
                    height: size.y as usize,
                    pixel_data: block.get_raw(),
                    blocks_rendered,
                    total_blocks,
                    pixels_rendered,
                    total_pixels,
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                });
            }
        }
        debug!("Aggregated {} of {} tiles", blocks_rendered, total_blocks);
    });

    (film.resolve(), callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::*;
    use crate::camera::*;
    use crate::filter::*;
    use crate::integrator::*;
    use crate::sampler::*;
    use crate::spectrum::*;
    use float_cmp::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    struct TestCamera {
        resolution: Point2i,
    }

    impl Camera for TestCamera {
        fn generate_ray(&self, sample: &CameraSample) -> (Ray, Spectrum) {
            let o = Point3f::new(sample.p_film.x, sample.p_film.y, 0.0);
            (Ray::new(o, Vector3f::new(0.0, 0.0, 1.0)), Spectrum::ONE)
        }

        fn resolution(&self) -> Point2i {
            self.resolution
        }

        fn set_resolution(&mut self, resolution: Point2i) {
            self.resolution = resolution;
        }

        fn name(&self) -> &'static str {
            "test"
        }
    }

    struct ConstantIntegrator {
        value: Float,
        delay: Option<Duration>,
    }

    impl Integrator for ConstantIntegrator {
        fn li(&self, _scene: &Scene, _sampler: &mut dyn Sampler, _ray: &Ray) -> Spectrum {
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            Spectrum::new(self.value)
        }

        fn name(&self) -> &'static str {
            "constant"
        }
    }

    /// Returns `bad` on even sample indices and 1 on odd ones.
    struct AlternatingIntegrator {
        bad: Float,
    }

    impl Integrator for AlternatingIntegrator {
        fn li(&self, _scene: &Scene, sampler: &mut dyn Sampler, _ray: &Ray) -> Spectrum {
            if sampler.get_data().current_pixel_sample_index % 2 == 0 {
                Spectrum::new(self.bad)
            } else {
                Spectrum::ONE
            }
        }

        fn name(&self) -> &'static str {
            "alternating"
        }
    }

    struct TestBoxFilter;

    impl Filter for TestBoxFilter {
        fn radius(&self) -> Float {
            0.5
        }

        fn evaluate(&self, _x: Float) -> Float {
            1.0
        }

        fn name(&self) -> &'static str {
            "box"
        }
    }

    fn scene(width: i32, height: i32, delay: Option<Duration>) -> Scene {
        let mut scene = Scene::new();
        scene.set_camera(Box::new(TestCamera {
            resolution: Point2i::new(width, height),
        }));
        scene.set_integrator(Box::new(ConstantIntegrator { value: 0.25, delay }));
        scene.set_sampler(Box::new(TestSampler::new(0)));
        scene.set_filter(Box::new(TestBoxFilter));
        scene
    }

    fn collect_updates(rt: &mut RayTracer) -> Arc<Mutex<Vec<RenderUpdate>>> {
        let updates = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&updates);
        assert!(rt.set_progress_callback(Box::new(move |u| {
            sink.lock().unwrap().push(u.clone());
        })));
        updates
    }

    #[test]
    fn start_without_scene_is_a_no_op() {
        let mut rt = RayTracer::default();
        assert!(!rt.start());
        assert_eq!(rt.status(), RenderStatus::Free);
    }

    #[test]
    fn renders_every_tile_once() {
        let mut rt = RayTracer::new(RayTracerConfig {
            tile_size: 32,
            threads: 3,
            seed: 7,
        });
        assert!(rt.initialize_scene(scene(100, 70, None)));
        let updates = collect_updates(&mut rt);

        assert!(rt.start());
        rt.wait();
        assert_eq!(rt.status(), RenderStatus::Free);

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 12);
        let offsets: HashSet<(usize, usize)> = updates.iter().map(|u| (u.x, u.y)).collect();
        assert_eq!(offsets.len(), 12);

        let last = updates.last().unwrap();
        assert_eq!(last.blocks_rendered, 12);
        assert_eq!(last.total_blocks, 12);
        assert_eq!(last.pixels_rendered, 7000);
        assert_eq!(last.total_pixels, 7000);
        for u in updates.iter() {
            assert_eq!(u.pixel_data.len(), u.width * u.height * 3);
            assert!(u.pixel_data.iter().all(|v| (v - 0.25).abs() < 1e-6));
        }

        let image = rt.image().unwrap();
        assert_eq!((image.width, image.height), (100, 70));
        assert!(image.rgb.iter().all(|v| (v - 0.25).abs() < 1e-6));
    }

    #[test]
    fn callback_survives_consecutive_renders() {
        let mut rt = RayTracer::new(RayTracerConfig {
            tile_size: 16,
            threads: 2,
            seed: 0,
        });
        rt.initialize_scene(scene(32, 32, None));
        let updates = collect_updates(&mut rt);

        assert!(rt.start());
        rt.wait();
        assert!(rt.start());
        rt.wait();
        assert_eq!(updates.lock().unwrap().len(), 8);
    }

    #[test]
    fn lifecycle_calls_are_ignored_while_busy() {
        let mut rt = RayTracer::new(RayTracerConfig {
            tile_size: 8,
            threads: 2,
            seed: 0,
        });
        rt.initialize_scene(scene(256, 256, Some(Duration::from_millis(1))));

        assert!(rt.start());
        assert_eq!(rt.status(), RenderStatus::Busy);
        assert!(!rt.start());
        assert!(!rt.set_image_size(10, 10));
        assert!(!rt.initialize_scene(scene(4, 4, None)));

        rt.stop();
        assert_eq!(rt.status(), RenderStatus::Free);
        assert!(rt.set_image_size(10, 10));
        assert_eq!(rt.scene().unwrap().camera().unwrap().resolution(), Point2i::new(10, 10));
    }

    #[test]
    fn stop_on_ten_thousand_tiles_is_bounded() {
        let threads = 4;
        let mut rt = RayTracer::new(RayTracerConfig {
            tile_size: 8,
            threads,
            seed: 0,
        });
        // 100 x 100 tiles of 8 x 8 pixels; each tile takes about 64ms.
        rt.initialize_scene(scene(800, 800, Some(Duration::from_millis(1))));
        let updates = collect_updates(&mut rt);

        let t0 = Instant::now();
        assert!(rt.start());
        rt.stop();
        let elapsed = t0.elapsed();

        assert_eq!(rt.status(), RenderStatus::Free);
        assert!(elapsed < Duration::from_secs(5), "stop took {:?}", elapsed);

        let updates = updates.lock().unwrap();
        assert!(updates.len() <= threads);
        let offsets: HashSet<(usize, usize)> = updates.iter().map(|u| (u.x, u.y)).collect();
        assert_eq!(offsets.len(), updates.len());
        assert!(updates.iter().all(|u| u.total_blocks == 10_000));
    }

    #[test]
    fn invalid_samples_are_dropped_not_blacked_out() {
        for bad in [Float::NAN, Float::INFINITY, -1.0] {
            let mut tiny = scene(4, 4, None);
            tiny.set_integrator(Box::new(AlternatingIntegrator { bad }));
            tiny.set_sampler(Box::new(TestSampler::with_samples(16, 0)));

            let mut rt = RayTracer::new(RayTracerConfig {
                tile_size: 4,
                threads: 1,
                seed: 0,
            });
            assert!(rt.initialize_scene(tiny));
            assert!(rt.start());
            rt.wait();

            let image = rt.image().unwrap();
            assert_eq!(image.rgb.len(), 4 * 4 * 3);
            for v in image.rgb.iter() {
                assert!(approx_eq!(Float, *v, 1.0, epsilon = 1e-6), "bad = {}: got {}", bad, v);
            }
        }
    }

    #[test]
    fn finished_render_is_collected_by_lifecycle_calls() {
        let mut rt = RayTracer::new(RayTracerConfig {
            tile_size: 8,
            threads: 2,
            seed: 0,
        });
        assert!(rt.initialize_scene(scene(16, 16, None)));
        assert!(rt.start());

        let t0 = Instant::now();
        while rt.status() != RenderStatus::Done {
            assert!(t0.elapsed() < Duration::from_secs(10), "render did not finish");
            thread::sleep(Duration::from_millis(1));
        }

        assert!(rt.set_image_size(8, 4));
        assert_eq!(rt.status(), RenderStatus::Free);
        assert_eq!(rt.image().map(|i| (i.width, i.height)), Some((16, 16)));

        assert!(rt.start());
        rt.wait();
        assert_eq!(rt.image().map(|i| (i.width, i.height)), Some((8, 4)));
    }

    #[test]
    fn worker_count_defaults_to_hardware() {
        let config = RayTracerConfig::default();
        assert_eq!(config.tile_size, 64);
        assert!(config.worker_count() >= 1);
        let fixed = RayTracerConfig { threads: 3, ..config };
        assert_eq!(fixed.worker_count(), 3);
    }
}
