use std::f64::consts::PI;
use std::fs;

use parallel_ray_tracer::camera::Camera;
use parallel_ray_tracer::canvas::Canvas;
use parallel_ray_tracer::color::Color;
use parallel_ray_tracer::matrix::Matrix4D;
use parallel_ray_tracer::parallel::{ render_parallel, FailurePolicy, RenderConfig };
use parallel_ray_tracer::scene::Scene;
use parallel_ray_tracer::tuple::Tuple4D;
use parallel_ray_tracer::world::World;
use parallel_ray_tracer::Error;

fn small_demo() -> Scene {
    let mut scene = Scene::demo().unwrap();
    scene.camera = Camera::new(48, 27, scene.camera.field_of_view(),
        *scene.camera.transform()).unwrap();
    scene
}

#[test]
fn demo_scene_parallel_matches_sequential() {
    let scene = small_demo();
    let expected = scene.camera.render(&scene.world).unwrap();

    for &(chunk_size, workers) in [(1, 1), (5, 3), (16, 4), (100, 8)].iter() {
        let config = RenderConfig {
            chunk_size,
            workers,
            on_tile_failure: FailurePolicy::Abort,
        };

        let image = render_parallel(&scene.camera, &scene.world, &config, |_| {})
            .unwrap();
        assert_eq!(image, expected, "chunk_size {} workers {}", chunk_size, workers);
    }
}

#[test]
fn demo_scene_is_not_blank() {
    let scene = small_demo();
    let image = scene.camera.render(&scene.world).unwrap();

    assert!(!image.is_of_color(Color::black()));
}

#[test]
fn progress_ends_at_one() {
    let w = World::default();
    let c = Camera::new(20, 10, PI / 2.0, Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    )).unwrap();

    let config = RenderConfig { chunk_size: 3, workers: 2, ..Default::default() };
    let mut reports = Vec::new();
    render_parallel(&c, &w, &config, |p| reports.push(p)).unwrap();

    assert!(!reports.is_empty());
    assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!((reports[reports.len() - 1] - 1.0).abs() < 1e-9);
}

#[test]
fn scene_file_round_trip() {
    let json = r#"{
        "canvas_width": 16, "canvas_height": 8, "field_of_view": 1.0471975511965976,
        "camera_from": [0, 1.5, -5], "camera_to": [0, 1, 0], "camera_up": [0, 1, 0],
        "light": { "intensity": [1, 1, 1], "position": [-10, 10, -10] },
        "render": { "chunk_size": 4, "workers": 2 },
        "shapes": [
            { "ty": "plane", "material": {
                "pattern": { "ty": "checker", "colors": [[1, 1, 1], [0, 0, 0]] }
            } },
            { "ty": "sphere", "transform": [{ "translate": [0, 1, 0] }],
              "material": { "color": [0.1, 1, 0.5], "diffuse": 0.7 } }
        ]
    }"#;

    let path = std::env::temp_dir()
        .join(format!("parallel-ray-tracer-scene-{}.json", std::process::id()));
    fs::write(&path, json).unwrap();
    let scene = Scene::load(&path);
    fs::remove_file(&path).unwrap();
    let scene = scene.unwrap();

    assert_eq!(scene.camera.hsize(), 16);
    assert_eq!(scene.render.chunk_size, 4);
    assert_eq!(scene.render.workers, 2);
    assert_eq!(scene.render.on_tile_failure, FailurePolicy::Abort);
    assert_eq!(scene.world.objects.len(), 2);
    assert_eq!(scene.world.objects[1].material.diffuse, 0.7);

    let image = render_parallel(&scene.camera, &scene.world, &scene.render, |_| {})
        .unwrap();
    assert_eq!(image, scene.camera.render(&scene.world).unwrap());
}

#[test]
fn missing_scene_file_is_an_io_error() {
    let path = std::env::temp_dir().join("parallel-ray-tracer-no-such-scene.json");

    assert!(matches!(Scene::load(&path), Err(Error::Io(_))));
}

#[test]
fn zero_chunk_size_in_scene_is_rejected() {
    let json = r#"{
        "canvas_width": 4, "canvas_height": 4, "field_of_view": 1.0,
        "camera_from": [0, 0, -5], "camera_to": [0, 0, 0], "camera_up": [0, 1, 0],
        "light": { "intensity": [1, 1, 1], "position": [0, 0, -10] },
        "render": { "chunk_size": 0 },
        "shapes": []
    }"#;

    assert!(matches!(Scene::from_json(json), Err(Error::ZeroChunkSize)));
}

#[test]
fn saved_image_is_ppm() {
    let mut canvas = Canvas::new(3, 2);
    canvas.write_pixel(1, 1, &Color::white());

    let path = std::env::temp_dir()
        .join(format!("parallel-ray-tracer-out-{}.ppm", std::process::id()));
    canvas.save(&path).unwrap();
    let ppm = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(ppm.starts_with("P3\n3 2\n255\n"));
    assert!(ppm.contains("255 255 255"));
}
