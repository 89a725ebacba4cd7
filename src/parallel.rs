use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::mpsc;
use std::thread;

use log::{ debug, trace, warn };
use serde::{ Serialize, Deserialize };

use crate::error::{ Error, Result };
use crate::color::Color;
use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::consts::DEFAULT_CHUNK_SIZE;

/// What a render does when a tile (or, sequentially, a pixel) fails.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop dispatching, wait for in-flight tiles, return the first error.
    Abort,

    /// Log a warning and fill the failed tile with this color.
    ///
    /// The fill covers the whole failed unit of work: a tile in
    /// `render_parallel`, a single pixel in `Camera::render_with_policy`.
    /// The two renders only agree under this policy when every tile is one
    /// pixel (`chunk_size` 1); with larger tiles, healthy pixels sharing a
    /// tile with a failing one are filled too.
    Substitute(Color),
}

impl Default for FailurePolicy {
    fn default() -> FailurePolicy {
        FailurePolicy::Abort
    }
}

/// Parameters of a tiled render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Edge length of a square chunk, in pixels.
    pub chunk_size: usize,

    /// Number of worker threads (tiles in flight at once).
    pub workers: usize,

    pub on_tile_failure: FailurePolicy,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);

        RenderConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers,
            on_tile_failure: FailurePolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::ZeroChunkSize);
        }

        if self.workers == 0 {
            return Err(Error::NoWorkers);
        }

        Ok(())
    }
}

/// A rectangular region of the image, rendered as one job.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Column of the chunk's top-left pixel.
    pub x: usize,
    /// Row of the chunk's top-left pixel.
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Position of this chunk in dispatch order.
    pub index: usize,
}

impl Chunk {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Splits a `width` by `height` image into square chunks, row by row.
///
/// Chunks on the right and bottom edges are clipped to the image, so the
/// chunks exactly cover the image without overlapping.
pub fn generate_chunks(width: usize, height: usize, chunk_size: usize)
    -> Vec<Chunk> {
    let mut chunks = Vec::new();
    if chunk_size == 0 {
        return chunks;
    }

    for y in (0..height).step_by(chunk_size) {
        for x in (0..width).step_by(chunk_size) {
            chunks.push(Chunk {
                x,
                y,
                width: chunk_size.min(width - x),
                height: chunk_size.min(height - y),
                index: chunks.len(),
            });
        }
    }

    chunks
}

/// The rendered pixels of one chunk.
#[derive(Clone, Debug)]
pub struct Tile {
    pub chunk: Chunk,
    pub pixels: Canvas,
}

/// Renders the pixels of one chunk into a tile-sized canvas.
///
/// A single failing pixel fails the whole tile; nothing partial is
/// returned.
pub fn render_chunk(camera: &Camera, world: &World, chunk: &Chunk)
    -> Result<Tile> {
    let mut pixels = Canvas::new(chunk.width, chunk.height);

    for ty in 0..chunk.height {
        for tx in 0..chunk.width {
            let color = camera.pixel_color(world, chunk.x + tx, chunk.y + ty)?;
            pixels.write_pixel(tx, ty, &color);
        }
    }

    Ok(Tile { chunk: *chunk, pixels })
}

/// A worker's report back to the dispatcher.
struct Completion {
    worker: usize,
    chunk: Chunk,
    result: Result<Tile>,
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Renders tiles of the image on a fixed pool of worker threads.
///
/// `config.workers` slots are each seeded with one chunk. Whenever a worker
/// reports back, its tile is pasted into the image at the chunk's offset and
/// the worker is handed the next pending chunk, or retired when none remain.
/// Tiles may arrive in any order; the result is identical to
/// `Camera::render`.
///
/// `progress` is called after every completed tile with the fraction of
/// pixels done so far, ending at `1.0` on success.
///
/// A tile that fails (an error, or a panic inside the worker) is handled
/// according to `config.on_tile_failure`.
pub fn render_parallel<F>(camera: &Camera, world: &World, config: &RenderConfig,
    mut progress: F) -> Result<Canvas>
where
    F: FnMut(f64),
{
    config.validate()?;

    let chunks = generate_chunks(camera.hsize(), camera.vsize(), config.chunk_size);
    let total_pixels = (camera.hsize() * camera.vsize()) as f64;
    let slots = config.workers.min(chunks.len());

    debug!("rendering {}x{} in {} chunks of {} on {} workers",
        camera.hsize(), camera.vsize(), chunks.len(), config.chunk_size, slots);

    thread::scope(|scope| {
        let mut image = Canvas::new(camera.hsize(), camera.vsize());
        let mut pending = chunks.into_iter();

        let (done_tx, done_rx) = mpsc::channel::<Completion>();
        let mut jobs: Vec<Option<mpsc::Sender<Chunk>>> = Vec::with_capacity(slots);

        for worker in 0..slots {
            let (job_tx, job_rx) = mpsc::channel::<Chunk>();
            let done_tx = done_tx.clone();

            // Runs until the dispatcher drops this worker's job sender
            scope.spawn(move || {
                for chunk in job_rx {
                    let result = panic::catch_unwind(AssertUnwindSafe(||
                        render_chunk(camera, world, &chunk)
                    )).unwrap_or_else(|payload| Err(Error::TileFailed {
                        x: chunk.x,
                        y: chunk.y,
                        reason: panic_reason(payload.as_ref()),
                    }));

                    if done_tx.send(Completion { worker, chunk, result }).is_err() {
                        break;
                    }
                }
            });

            jobs.push(Some(job_tx));
        }
        drop(done_tx);

        let mut in_flight = 0;
        for (worker, slot) in jobs.iter().enumerate() {
            if let (Some(job_tx), Some(chunk)) = (slot, pending.next()) {
                trace!("chunk {} -> worker {}", chunk.index, worker);
                if job_tx.send(chunk).is_ok() {
                    in_flight += 1;
                }
            }
        }

        let mut done_pixels = 0;
        let mut failure: Option<Error> = None;

        while in_flight > 0 {
            let Completion { worker, chunk, result } = match done_rx.recv() {
                Ok(completion) => completion,
                Err(_) => break,
            };
            in_flight -= 1;

            match result {
                Ok(tile) => image.paste(chunk.x, chunk.y, &tile.pixels),
                Err(e) => match config.on_tile_failure {
                    FailurePolicy::Abort => {
                        debug!("chunk {} failed, aborting: {}", chunk.index, e);
                        failure.get_or_insert(e);
                    },
                    FailurePolicy::Substitute(sentinel) => {
                        warn!("{}; filling tile with {:?}", e, sentinel);
                        let fill = Canvas::filled(chunk.width, chunk.height, sentinel);
                        image.paste(chunk.x, chunk.y, &fill);
                    },
                },
            }

            done_pixels += chunk.pixel_count();
            progress(done_pixels as f64 / total_pixels);

            // Hand the free worker another chunk, or retire it
            let next = if failure.is_none() { pending.next() } else { None };
            match (next, &jobs[worker]) {
                (Some(next), Some(job_tx)) => {
                    trace!("chunk {} -> worker {}", next.index, worker);
                    if job_tx.send(next).is_ok() {
                        in_flight += 1;
                    } else {
                        failure.get_or_insert(Error::TileFailed {
                            x: next.x,
                            y: next.y,
                            reason: format!("worker {} exited", worker),
                        });
                    }
                },
                _ => {
                    trace!("retiring worker {}", worker);
                    jobs[worker] = None;
                },
            }
        }

        // Dropping the remaining senders lets every worker exit
        drop(jobs);

        match failure {
            Some(e) => Err(e),
            None => Ok(image),
        }
    })
}

#[cfg(test)]
use crate::tuple::Tuple4D;
#[cfg(test)]
use crate::matrix::Matrix4D;

#[cfg(test)]
fn default_camera(hsize: usize, vsize: usize) -> Camera {
    let from = Tuple4D::point(0.0, 0.0, -5.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    Camera::new(hsize, vsize, std::f64::consts::PI / 2.0,
        Matrix4D::view_transform(from, to, up)).unwrap()
}

#[cfg(test)]
fn config(chunk_size: usize, workers: usize) -> RenderConfig {
    RenderConfig { chunk_size, workers, on_tile_failure: FailurePolicy::Abort }
}

#[test]
fn chunks_cover_image_exactly() {
    let chunks = generate_chunks(100, 70, 32);

    // 4 columns by 3 rows, clipped on the right and bottom
    assert_eq!(chunks.len(), 12);
    assert_eq!(chunks.iter().map(Chunk::pixel_count).sum::<usize>(), 100 * 70);
    assert_eq!(chunks[3], Chunk { x: 96, y: 0, width: 4, height: 32, index: 3 });
    assert_eq!(chunks[11], Chunk { x: 96, y: 64, width: 4, height: 6, index: 11 });

    let mut seen = vec![0; 100 * 70];
    for c in chunks.iter() {
        for y in c.y..c.y + c.height {
            for x in c.x..c.x + c.width {
                seen[y * 100 + x] += 1;
            }
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn chunk_larger_than_image() {
    let chunks = generate_chunks(7, 5, 50);

    assert_eq!(chunks, vec![Chunk { x: 0, y: 0, width: 7, height: 5, index: 0 }]);
}

#[test]
fn invalid_config_is_rejected() {
    let w = World::default();
    let c = default_camera(5, 5);

    assert!(matches!(render_parallel(&c, &w, &config(0, 2), |_| ()),
        Err(Error::ZeroChunkSize)));
    assert!(matches!(render_parallel(&c, &w, &config(2, 0), |_| ()),
        Err(Error::NoWorkers)));
}

#[test]
fn default_config() {
    let cfg = RenderConfig::default();

    assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
    assert!(cfg.workers >= 1);
    assert_eq!(cfg.on_tile_failure, FailurePolicy::Abort);
}

#[test]
fn parallel_matches_sequential() {
    let w = World::default();
    let c = default_camera(23, 17);
    let expected = c.render(&w).unwrap();

    for &(chunk_size, workers) in [(1, 1), (4, 3), (5, 8), (16, 2), (64, 4)].iter() {
        let image = render_parallel(&c, &w, &config(chunk_size, workers), |_| ())
            .unwrap();
        assert_eq!(image, expected, "chunk {} workers {}", chunk_size, workers);
    }
}

#[test]
fn progress_is_monotonic_and_complete() {
    let w = World::default();
    let c = default_camera(20, 10);
    let mut reports = Vec::new();

    render_parallel(&c, &w, &config(6, 3), |p| reports.push(p)).unwrap();

    // 4 columns by 2 rows of chunks
    assert_eq!(reports.len(), 8);
    assert!(reports.windows(2).all(|w| w[0] < w[1]));
    assert!(crate::feq(*reports.last().unwrap(), 1.0));
}

#[test]
fn failed_tile_aborts_render() {
    let mut w = World::default();
    w.light.intensity = Color::rgb(f64::NAN, 1.0, 1.0);
    let c = default_camera(12, 12);

    let res = render_parallel(&c, &w, &config(4, 3), |_| ());
    assert!(matches!(res, Err(Error::NonFiniteColor { .. })));
}

#[test]
fn failed_tile_is_substituted_whole() {
    let mut w = World::default();
    w.light.intensity = Color::rgb(f64::NAN, 1.0, 1.0);
    let c = default_camera(12, 12);
    let magenta = Color::rgb(1.0, 0.0, 1.0);

    let cfg = RenderConfig {
        chunk_size: 4,
        workers: 3,
        on_tile_failure: FailurePolicy::Substitute(magenta),
    };
    let image = render_parallel(&c, &w, &cfg, |_| ()).unwrap();

    // The center tile holds sphere pixels; the corner tile misses everything
    for y in 4..8 {
        for x in 4..8 {
            assert_eq!(image.read_pixel(x, y), Some(magenta));
        }
    }
    assert_eq!(image.read_pixel(0, 0), Some(Color::black()));
}

#[test]
fn substitution_matches_sequential_only_for_pixel_tiles() {
    let mut w = World::default();
    w.light.intensity = Color::rgb(f64::NAN, 1.0, 1.0);
    let c = default_camera(12, 12);
    let magenta = Color::rgb(1.0, 0.0, 1.0);
    let policy = FailurePolicy::Substitute(magenta);

    let sequential = c.render_with_policy(&w, &policy).unwrap();

    let per_pixel = RenderConfig { chunk_size: 1, workers: 4, on_tile_failure: policy };
    assert_eq!(render_parallel(&c, &w, &per_pixel, |_| ()).unwrap(), sequential);

    // (4, 4) misses the spheres but shares a tile with pixels that hit them
    let tiled = RenderConfig { chunk_size: 4, workers: 4, on_tile_failure: policy };
    let image = render_parallel(&c, &w, &tiled, |_| ()).unwrap();
    assert_eq!(sequential.read_pixel(4, 4), Some(Color::black()));
    assert_eq!(image.read_pixel(4, 4), Some(magenta));
}

#[test]
fn panicking_worker_reports_tile_failure() {
    use crate::ray::Ray4D;
    use crate::shape::{ Primitive, Shape };

    #[derive(Debug)]
    struct Exploding;

    impl Primitive for Exploding {
        fn local_intersect(&self, _ray: &Ray4D) -> Vec<f64> {
            panic!("exploding primitive")
        }

        fn local_normal_at(&self, p: Tuple4D) -> Tuple4D {
            Tuple4D::vector(p.x, p.y, p.z)
        }

        fn kind(&self) -> &'static str {
            "exploding"
        }
    }

    let mut w = World::default();
    w.objects.push(Shape::new(Exploding));
    let c = default_camera(6, 6);

    match render_parallel(&c, &w, &config(3, 2), |_| ()) {
        Err(Error::TileFailed { reason, .. }) => {
            assert!(reason.contains("exploding primitive"))
        },
        other => panic!("expected a tile failure, got {:?}", other.map(|_| ())),
    }
}
