///
/// Depth-first linearization of the implicit PLOC tree into a contiguous,
/// child-indexed array for GPU traversal. Preallocation-by-offset pattern
/// follows `flatten`/`flatten_recursive` in the source's `bvh.rs` and
/// `hlbvh.rs`, rewritten as an explicit stack so build depth can't blow the
/// call stack on a pathologically unbalanced tree.
use crate::error::BuildError;

use super::cluster::{ClusterPool, NONE};
use super::vector::Vec3f32;

/// GPU-consumable node. Bit-exact layout for shader interop: two `vec4`
/// aligned boxes, then the three index fields, then tail padding to a
/// 16-byte stride.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, bytemuck::Zeroable, bytemuck::Pod)]
pub struct GpuNode {
    pub box_min: Vec3f32,
    _padding0: f32,
    pub box_max: Vec3f32,
    _padding1: f32,
    pub triangle_id: u32,
    pub left_index: u32,
    pub right_index: u32,
    _padding2: u32,
}
static_assertions::assert_eq_size!(GpuNode, [u8; 4 * 4 * 3]);

impl GpuNode {
    /// `left_index == 0 && right_index == 0` is the GPU-side leaf
    /// predicate (source convention "child == 0 then leaf"); this is safe
    /// exactly because the root occupies index 0 and is never anyone's
    /// child, so `0` never appears as a real child reference.
    pub fn is_leaf(&self) -> bool {
        self.left_index == 0 && self.right_index == 0
    }
}

/// Work-list item: the cluster to visit, and where to patch its index
/// into its parent once known (`None` for the root).
struct WorkItem {
    cluster_id: u32,
    parent: Option<(usize, bool)>,
}

/// Depth-first pre-order walk producing `V` with `V[0]` as the root, and
/// every internal node's children at strictly greater indices.
pub fn linearize(pool: &ClusterPool, root: u32) -> Result<Vec<GpuNode>, BuildError> {
    log::trace!("linearize: starting walk from root cluster {root}");
    let mut nodes = Vec::new();
    let mut stack = vec![WorkItem { cluster_id: root, parent: None }];

    while let Some(item) = stack.pop() {
        let cluster = pool.get(item.cluster_id);
        let index = nodes.len();
        log::trace!("linearize: cluster {} -> node index {index}", item.cluster_id);

        if let Some((parent_index, is_left)) = item.parent {
            if is_left {
                nodes[parent_index].left_index = index as u32;
            } else {
                nodes[parent_index].right_index = index as u32;
            }
        }

        if !cluster.is_leaf() && !cluster.is_internal() {
            return Err(BuildError::TreeInvariantViolated {
                cluster_id: item.cluster_id,
                detail: "cluster has exactly one child set, expected zero or two".into(),
            });
        }
        if cluster.is_leaf() && cluster.triangle == NONE {
            return Err(BuildError::TreeInvariantViolated {
                cluster_id: item.cluster_id,
                detail: "leaf cluster carries no triangle id".into(),
            });
        }

        nodes.push(GpuNode {
            box_min: cluster.bbox.min,
            _padding0: 0.0,
            box_max: cluster.bbox.max,
            _padding1: 0.0,
            triangle_id: if cluster.is_leaf() { cluster.triangle } else { 0 },
            left_index: 0,
            right_index: 0,
            _padding2: 0,
        });

        if cluster.is_internal() {
            // Push right first so left is processed (and appended) first,
            // preserving the pre-order visitation order.
            stack.push(WorkItem { cluster_id: cluster.right, parent: Some((index, false)) });
            stack.push(WorkItem { cluster_id: cluster.left, parent: Some((index, true)) });
        }
    }

    Ok(nodes)
}
