use std::convert::Infallible;
use std::hint::black_box;
use std::time::Instant;

use blockview_assets::{CuboidMesh, MeshStore};
use blockview_common::{BlockId, FrameInput, MoveIntent, UploadSlot};
use blockview_kernel::{Camera, FrameSink, Pose, Scene};
use glam::{Mat4, Vec3};

/// Sink that only counts, so the loop measures the scene itself.
#[derive(Default)]
struct CountingSink {
    uploads: usize,
    draws: usize,
}

impl FrameSink for CountingSink {
    type Error = Infallible;

    fn upload(&mut self, _slot: UploadSlot, matrix: Mat4) -> Result<(), Infallible> {
        black_box(matrix);
        self.uploads += 1;
        Ok(())
    }

    fn draw(&mut self, _block: BlockId, mesh: &CuboidMesh) -> Result<(), Infallible> {
        black_box(mesh.vertex_count());
        self.draws += 1;
        Ok(())
    }
}

fn make_scene(block_count: usize) -> Scene {
    let mut store = MeshStore::new();
    let mesh = store.cuboid(Vec3::ZERO, 1.0);
    let mut scene = Scene::new(Camera::default(), Mat4::IDENTITY);
    let side = (block_count as f32).sqrt().ceil() as usize;
    for i in 0..block_count {
        let x = (i % side) as f32 * 2.0;
        let z = (i / side) as f32 * -2.0;
        scene
            .add_block(Pose::new(Vec3::new(x, 0.0, z)), mesh.clone())
            .expect("bench block count fits in u32");
    }
    scene
}

fn bench_camera_only(block_count: usize, iterations: usize) {
    let mut scene = make_scene(block_count);
    let mut sink = CountingSink::default();
    let _ = scene.init(&mut sink);
    let input = FrameInput::new()
        .with_intent(MoveIntent::Forward)
        .with_pointer_delta(1.0, 0.5);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = scene.update(black_box(1.0 / 60.0), black_box(&input), &mut sink);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  camera moving ({block_count} clean blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_all_dirty(block_count: usize, iterations: usize) {
    let mut scene = make_scene(block_count);
    let mut sink = CountingSink::default();
    let input = FrameInput::new();

    let start = Instant::now();
    for frame in 0..iterations {
        for i in 0..block_count {
            if let Ok(pose) = scene.block_pose_mut(BlockId(i as u32)) {
                pose.set_yaw(frame as f32);
            }
        }
        let _ = scene.update(black_box(1.0 / 60.0), &input, &mut sink);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  all blocks dirty ({block_count} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_render(block_count: usize, iterations: usize) {
    let scene = make_scene(block_count);
    let mut sink = CountingSink::default();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = scene.render(black_box(&mut sink));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  render ({block_count} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Scene Update Benchmarks ===\n");

    println!("Camera motion with clean blocks:");
    bench_camera_only(4, 100_000);
    bench_camera_only(1000, 10_000);

    println!("\nEvery block dirty:");
    bench_all_dirty(4, 100_000);
    bench_all_dirty(1000, 1000);
    bench_all_dirty(10000, 100);

    println!("\nDraw submission:");
    bench_render(1000, 10_000);
    bench_render(10000, 1000);

    println!("\n=== Done ===");
}
