///
/// Clusters under construction during PLOC, and the shared pool that holds
/// them. A single variant with sentinel children and sentinel triangle
/// suffices: the discriminator is "has no children".
use std::cell::UnsafeCell;

use super::aabb::Aabb;

/// Sentinel for "no cluster" / "no child" in cluster ids and working sets.
pub const NONE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
pub struct Cluster {
    pub bbox: Aabb,
    pub triangle: u32,
    pub left: u32,
    pub right: u32,
}

impl Cluster {
    pub fn leaf(bbox: Aabb, triangle: u32) -> Self {
        Self { bbox, triangle, left: NONE, right: NONE }
    }

    pub fn internal(bbox: Aabb, left: u32, right: u32) -> Self {
        Self { bbox, triangle: NONE, left, right }
    }

    pub fn is_leaf(&self) -> bool {
        self.left == NONE && self.right == NONE
    }

    pub fn is_internal(&self) -> bool {
        self.left != NONE && self.right != NONE
    }
}

/// A monotonically growing sequence capable of holding `2N-1` clusters,
/// pre-sized so no reallocation happens mid-build (pointer/index stability
/// is required for concurrent writers during PLOC's merge phase).
///
/// Leaf clusters occupy ids `[0, N)` directly; internal clusters are
/// assigned ids starting at `N` by an atomic counter (`next_id`), owned by
/// the caller rather than this struct so a single fetch-and-add sequences
/// every allocation across the whole build.
pub struct ClusterPool {
    data: Vec<UnsafeCell<Cluster>>,
}

// Safety: every slot in `data` is written at most once per build (leaf
// slots during initialization, internal slots exactly once via the
// caller's atomic `next_id` counter), and never read before that write
// completes for its id. Concurrent access is therefore to disjoint cells.
unsafe impl Sync for ClusterPool {}

impl ClusterPool {
    pub fn with_capacity(capacity: usize) -> Self {
        let placeholder = Cluster::leaf(Aabb::empty(), NONE);
        Self {
            data: (0..capacity).map(|_| UnsafeCell::new(placeholder)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Cluster {
        // Safety: `Cluster` is `Copy`; this is a read of a fully
        // initialized cell (see the `Sync` justification above).
        unsafe { *self.data[id as usize].get() }
    }

    /// Write cluster data into slot `id`.
    ///
    /// Safety: the caller must guarantee no other thread is concurrently
    /// reading or writing this exact `id` for the duration of the call.
    /// PLOC upholds this by only ever writing an id once, immediately
    /// after allocating it from the shared atomic counter.
    pub unsafe fn write(&self, id: u32, cluster: Cluster) {
        *self.data[id as usize].get() = cluster;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::vector::vec3f;

    #[test]
    fn leaf_round_trips_through_pool() {
        let pool = ClusterPool::with_capacity(4);
        let bbox = Aabb::from_triangle(vec3f(0.0, 0.0, 0.0), vec3f(1.0, 0.0, 0.0), vec3f(0.0, 1.0, 0.0));
        unsafe { pool.write(2, Cluster::leaf(bbox, 7)) };
        let c = pool.get(2);
        assert!(c.is_leaf());
        assert_eq!(c.triangle, 7);
        assert_eq!(c.bbox, bbox);
    }

    #[test]
    fn internal_cluster_reports_no_triangle() {
        let pool = ClusterPool::with_capacity(4);
        unsafe { pool.write(0, Cluster::internal(Aabb::empty(), 1, 2)) };
        let c = pool.get(0);
        assert!(c.is_internal());
        assert!(!c.is_leaf());
    }
}
