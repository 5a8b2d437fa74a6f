use std::hint::black_box;
use std::time::Instant;

use blockfield_terrain::{FlatHeightmap, NoiseHeightmap, build_chunk_with};

fn bench_noise_chunk(size: u32, iterations: usize) {
    let heightmap = NoiseHeightmap::for_chunk(size);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(build_chunk_with(black_box(size), &heightmap));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  noise chunk (size {size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_flat_chunk(size: u32, iterations: usize) {
    let heightmap = FlatHeightmap(0);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(build_chunk_with(black_box(size), &heightmap));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  flat chunk (size {size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== build_chunk ===");
    for size in [8, 16, 32, 64] {
        bench_noise_chunk(size, 200);
    }
    for size in [16, 64] {
        bench_flat_chunk(size, 200);
    }
}
