use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use parallel_ray_tracer::camera::Camera;
use parallel_ray_tracer::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_OUT_FILE
};
use parallel_ray_tracer::parallel::render_parallel;
use parallel_ray_tracer::scene::Scene;

/// Renders a scene description to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Scene description (JSON). The built-in demo scene is used if omitted.
    #[clap(long)]
    scene: Option<PathBuf>,

    /// Where to write the image.
    #[clap(long, short, default_value = DEFAULT_OUT_FILE)]
    out: PathBuf,

    /// Image width in pixels; overrides the scene.
    #[clap(long)]
    width: Option<usize>,

    /// Image height in pixels; overrides the scene.
    #[clap(long)]
    height: Option<usize>,

    /// Worker threads; overrides the scene.
    #[clap(long, short)]
    workers: Option<usize>,

    /// Chunk edge length in pixels; overrides the scene.
    #[clap(long)]
    chunk_size: Option<usize>,

    /// Render on the calling thread, one pixel at a time.
    #[clap(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();

    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => Scene::demo().context("failed to build the demo scene")?,
    };

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(DEFAULT_CANVAS_WIDTH);
        let height = args.height.unwrap_or(DEFAULT_CANVAS_HEIGHT);
        scene.camera = Camera::new(width, height,
            scene.camera.field_of_view(), *scene.camera.transform())?;
    }

    if let Some(workers) = args.workers {
        scene.render.workers = workers;
    }

    if let Some(chunk_size) = args.chunk_size {
        scene.render.chunk_size = chunk_size;
    }

    info!("rendering {}x{} image", scene.camera.hsize(), scene.camera.vsize());
    let start = Instant::now();

    let canvas = if args.sequential {
        scene.camera.render_with_policy(&scene.world, &scene.render.on_tile_failure)?
    } else {
        // Log at every 10% step
        let mut reported = 0;
        render_parallel(&scene.camera, &scene.world, &scene.render, |done| {
            let step = (done * 10.0).floor() as usize;
            if step > reported {
                reported = step;
                info!("{}% done", step * 10);
            }
        })?
    };

    info!("rendered in {:.2?}", start.elapsed());

    canvas.save(&args.out)
        .with_context(|| format!("failed to save {}", args.out.display()))?;
    info!("saved render to {}", args.out.display());

    Ok(())
}
