use std::time::Instant;

use cgmath::{Matrix4, SquareMatrix};
use ploc_bvh::data_structures::timings::BuildTimings;
use ploc_bvh::data_structures::vector::vec3f;
use ploc_bvh::data_structures::{linearize, morton, ploc, sort, triangle};
use ploc_bvh::{Aabb, BuildOptions, ModelTable, Triangle};

/// Benchmark binary for the PLOC BVH builder.
fn main() {
    env_logger::init();

    let runs = 20;
    println!("Benchmarking with {runs} samples.\n");

    for &n in &[1_000usize, 10_000, 50_000] {
        let timings = run_build(n, runs);
        timings.display(&format!("PLOC: {n} triangles, R=16"));
        println!("----------------------------------");
    }
}

/// Runs each build phase separately so every `BuildTimings` field is
/// populated, same as the teacher's `bin/bvh_project.rs` timing its
/// construction and `flatten()` steps individually rather than the whole
/// `Bvh::new` call as one bucket.
fn run_build(n: usize, runs: u32) -> BuildTimings {
    let models = ModelTable::new(vec![Matrix4::identity()]);
    let triangles = grid_of_triangles(n);
    let options = BuildOptions::default();

    let mut total = BuildTimings::default();
    for _ in 0..runs {
        let mut sample = BuildTimings::default();

        let start = Instant::now();
        let bounds = morton::scene_bounds(&triangles, &models);
        let keys = morton::encode(&triangles, &models, &bounds);
        sample.morton = start.elapsed();

        let start = Instant::now();
        let pi = sort::sort_leaves(&keys);
        sample.sort = start.elapsed();

        let leaf_boxes: Vec<Aabb> = pi
            .iter()
            .map(|&t| {
                let tri = &triangles[t as usize];
                let (v0, v1, v2) = triangle::world_vertices(tri, &models);
                Aabb::from_triangle(v0, v1, v2)
            })
            .collect();

        let start = Instant::now();
        let result = ploc::build(n, &pi, &leaf_boxes, options.search_radius);
        sample.ploc = start.elapsed();

        let start = Instant::now();
        let _nodes = linearize::linearize(&result.pool, result.root).expect("benchmark scene is well-formed");
        sample.linearize = start.elapsed();

        total += sample;
    }
    total /= runs;
    total
}

fn grid_of_triangles(n: usize) -> Vec<Triangle> {
    (0..n)
        .map(|i| {
            let x = (i as f32) * 3.0;
            Triangle::new(vec3f(x, 0.0, 0.0), vec3f(x + 1.0, 0.0, 0.0), vec3f(x, 1.0, 0.0), 0)
        })
        .collect()
}
