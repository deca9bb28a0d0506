///
/// Morton (Z-order) encoding of triangle centroids into 30-bit keys.
///
/// Bit-interleave logic adapted from the `left_shift_3`/`encode_morton_3`
/// pair in the source project's HLBVH builder, itself taken from the PBR
/// book's Morton indexing utilities.
use super::aabb::Aabb;
use super::triangle::{world_centroid, world_vertices, ModelTable, Triangle};
use super::vector::{vec3f, Vec3f32};

const MORTON_BITS: u32 = 10;
const MORTON_SCALE: f32 = (1u32 << MORTON_BITS) as f32;

/// Scene-wide bounds computed once per build: the tight scene box and the
/// circumscribing cube derived from it.
#[derive(Debug, Clone, Copy)]
pub struct SceneBounds {
    pub scene_box: Aabb,
    pub cube: Aabb,
    /// True when the cube has zero extent (all triangles coincide); in
    /// this case every key collapses to `0` rather than dividing by zero.
    pub degenerate: bool,
}

/// Merge of all triangles' world-space boxes, and the cube that
/// circumscribes it.
pub fn scene_bounds(triangles: &[Triangle], models: &ModelTable) -> SceneBounds {
    let mut scene_box = Aabb::empty();
    for tri in triangles {
        let (v0, v1, v2) = world_vertices(tri, models);
        scene_box.include(&Aabb::from_triangle(v0, v1, v2));
    }
    let cube = circumscribing_cube(&scene_box);
    let degenerate = cube.extent().magnitude() == 0.0;
    log::trace!(
        "morton: scene_box min={:?} max={:?}, cube min={:?} max={:?}, degenerate={degenerate}",
        scene_box.min,
        scene_box.max,
        cube.min,
        cube.max
    );
    SceneBounds { scene_box, cube, degenerate }
}

/// Expand the box's two shorter axes until all three extents equal the
/// longest one, so Morton quantization has uniform resolution in every
/// direction. Ties are broken toward the first axis considered, in
/// X, Y, Z order (`Aabb::longest_axis`).
fn circumscribing_cube(scene_box: &Aabb) -> Aabb {
    let d = scene_box.extent();
    let axis = scene_box.longest_axis();
    let max_dist = match axis {
        0 => d.0,
        1 => d.1,
        _ => d.2,
    };
    log::trace!("morton: circumscribing cube picks axis {axis} with extent {max_dist}");
    let half = vec3f(max_dist, max_dist, max_dist) * 0.5;
    let center = scene_box.center();
    Aabb {
        min: center - half,
        max: center + half,
    }
}

/// Generate the parallel key array `K[0..N)` for the given triangles.
pub fn encode(triangles: &[Triangle], models: &ModelTable, bounds: &SceneBounds) -> Vec<u32> {
    if bounds.degenerate {
        return vec![0; triangles.len()];
    }
    triangles
        .iter()
        .enumerate()
        .map(|(i, tri)| {
            let centroid = world_centroid(tri, models);
            let offset = bounds.cube.offset(centroid);
            let key = encode_point(offset);
            log::trace!("morton: triangle {i} centroid={centroid:?} offset={offset:?} key={key}");
            key
        })
        .collect()
}

/// Quantize a normalized `[0,1]^3` point into a 30-bit Morton key.
fn encode_point(offset: Vec3f32) -> u32 {
    let quantize = |v: f32| (v * MORTON_SCALE).clamp(0.0, (1 << MORTON_BITS) as f32 - 1.0) as u32;
    let x = quantize(offset.0);
    let y = quantize(offset.1);
    let z = quantize(offset.2);
    (left_shift_3(x) << 2) | (left_shift_3(y) << 1) | left_shift_3(z)
}

/// Take a 10-bit number and tile it as follows: `xyzw -> --x--y--z--w`.
///
/// From the PBR Book vol. 4:
/// https://www.pbr-book.org/4ed/Utilities/Mathematical_Infrastructure#x7-MortonIndexing
#[inline]
fn left_shift_3(mut x: u32) -> u32 {
    if x == 1 << 10 {
        x -= 1;
    }
    x = (x | (x << 16)) & 0b00000011000000000000000011111111;
    x = (x | (x << 8)) & 0b00000011000000001111000000001111;
    x = (x | (x << 4)) & 0b00000011000011000011000011000011;
    x = (x | (x << 2)) & 0b00001001001001001001001001001001;
    x
}
