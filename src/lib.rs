///
/// Parallel BVH builder for an interactive GPU ray tracer.
///
/// Turns an unordered triangle soup into a flat, GPU-traversable binary
/// tree via PLOC (Parallel Locally-Ordered Clustering): Morton-encode
/// triangle centroids, sort them, agglomerate the sorted leaves into an
/// implicit tree through bounded-radius nearest-neighbor merges, then
/// linearize the result into a contiguous node array.
///
/// Window/context bootstrapping, shader compilation, storage-buffer
/// upload, mesh loading, and the GPU-side tracer itself are external
/// collaborators — this crate owns only the CPU-side tree build.
pub mod data_structures;
mod error;
mod options;

use std::ops::{Deref, DerefMut};

use data_structures::{linearize, morton, ploc, sort};

pub use data_structures::aabb::Aabb;
pub use data_structures::linearize::GpuNode;
pub use data_structures::triangle::{ModelTable, Triangle};
pub use error::BuildError;
pub use options::{BuildOptions, MAX_TRIANGLES};

/// Dense, GPU-consumable node sequence. Index 0 is the root; every
/// internal node's children live at strictly greater indices.
#[derive(Debug, Clone, Default)]
pub struct GpuNodeBuffer(pub Vec<GpuNode>);

impl Deref for GpuNodeBuffer {
    type Target = [GpuNode];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GpuNodeBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Build a BVH over `triangles`, looking up each triangle's model
/// transform through `models`. Rebuilds from scratch; the builder is not
/// incremental, refittable, or streaming.
pub fn build(
    triangles: &[Triangle],
    models: &ModelTable,
    options: BuildOptions,
) -> Result<GpuNodeBuffer, BuildError> {
    let n = triangles.len();
    if n > MAX_TRIANGLES {
        return Err(BuildError::InputTooLarge { n, max: MAX_TRIANGLES });
    }
    if n == 0 {
        return Ok(GpuNodeBuffer(Vec::new()));
    }

    let bounds = morton::scene_bounds(triangles, models);
    if bounds.degenerate {
        log::warn!("ploc_bvh: scene box has zero extent, collapsing all Morton keys to 0");
    }
    let keys = morton::encode(triangles, models, &bounds);
    let pi = sort::sort_leaves(&keys);

    let leaf_boxes: Vec<Aabb> = pi
        .iter()
        .map(|&t| {
            let tri = &triangles[t as usize];
            let (v0, v1, v2) = data_structures::triangle::world_vertices(tri, models);
            Aabb::from_triangle(v0, v1, v2)
        })
        .collect();

    let result = ploc::build(n, &pi, &leaf_boxes, options.search_radius);
    let nodes = linearize::linearize(&result.pool, result.root)?;
    Ok(GpuNodeBuffer(nodes))
}
