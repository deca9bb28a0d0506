///
/// PLOC (Parallel Locally-Ordered Clustering): agglomerate Morton-sorted
/// leaves into an implicit binary tree via bounded-radius nearest-neighbor
/// merges, run to a fixed point in lock-free fork-join phases.
///
/// The four-phase structure (nearest-neighbor search, mutual merge,
/// prefix sum, compaction) and the lock-free mutual-NN merge rule follow
/// the source project's agglomerative `Bvh::new` in
/// `data_structures/bvh.rs`, generalized from its O(N^2) all-pairs search
/// to the bounded-radius search this crate's scale requires, and from a
/// sequential loop to the atomic-counter/rayon fan-out already used for
/// cluster-id allocation in `data_structures/hlbvh.rs`.
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use super::aabb::Aabb;
use super::cluster::{Cluster, ClusterPool, NONE};
use super::scan::exclusive_valid_prefix_sum;

/// Owns the finished cluster pool and names the root's id within it.
pub struct PlocResult {
    pub pool: ClusterPool,
    pub root: u32,
}

/// Build the implicit BVH over `n` Morton-sorted leaves.
///
/// `pi` is the sort permutation (triangle index per sorted slot) and
/// `leaf_boxes` is parallel to it (`leaf_boxes[i]` is the world-space box
/// of triangle `pi[i]`). `search_radius` is the PLOC window half-width
/// (`R`; 16 by default).
pub fn build(n: usize, pi: &[u32], leaf_boxes: &[Aabb], search_radius: u32) -> PlocResult {
    debug_assert_eq!(pi.len(), n);
    debug_assert_eq!(leaf_boxes.len(), n);

    if n == 0 {
        return PlocResult { pool: ClusterPool::with_capacity(0), root: NONE };
    }

    let pool = ClusterPool::with_capacity(2 * n - 1);
    for i in 0..n {
        // Safety: each leaf id [0, n) is written exactly once, here,
        // before any other thread can observe it.
        unsafe { pool.write(i as u32, Cluster::leaf(leaf_boxes[i], pi[i])) };
    }
    let next_id = AtomicU32::new(n as u32);

    let mut cur: Vec<AtomicU32> = (0..n as u32).map(AtomicU32::new).collect();
    let mut other: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(NONE)).collect();
    let mut l = n;

    while l > 1 {
        log::debug!("ploc: iterating with {l} active clusters");
        let nn = nearest_neighbors(&pool, &cur[..l], search_radius);
        mutual_merge(&pool, &cur[..l], &nn, &next_id);

        let valid: Vec<bool> = (0..l).map(|i| cur[i].load(Ordering::Relaxed) != NONE).collect();
        let (s, new_l) = exclusive_valid_prefix_sum(&valid);

        (0..l).into_par_iter().for_each(|i| {
            let v = cur[i].load(Ordering::Relaxed);
            if v != NONE {
                other[s[i] as usize].store(v, Ordering::Relaxed);
            }
        });

        std::mem::swap(&mut cur, &mut other);
        l = new_l as usize;
    }

    let root = cur[0].load(Ordering::Relaxed);
    PlocResult { pool, root }
}

/// Phase 1: for each active slot, scan the bounded window and remember the
/// slot whose merged-box surface area is smallest, tie-broken toward the
/// lower index.
fn nearest_neighbors(pool: &ClusterPool, active: &[AtomicU32], radius: u32) -> Vec<u32> {
    let l = active.len();
    let r = radius as usize;
    (0..l)
        .into_par_iter()
        .map(|i| {
            let ci = active[i].load(Ordering::Relaxed);
            let bbox_i = pool.get(ci).bbox;
            let window_start = i.saturating_sub(r);
            let window_end = (i + r + 1).min(l);

            let mut best_area = f32::INFINITY;
            let mut best_j = i;
            for j in window_start..window_end {
                if j == i {
                    continue;
                }
                let cj = active[j].load(Ordering::Relaxed);
                let merged = Aabb::merge(bbox_i, pool.get(cj).bbox);
                let area = merged.surface_area();
                if area < best_area || (area == best_area && j < best_j) {
                    best_area = area;
                    best_j = j;
                }
            }
            best_j as u32
        })
        .collect()
}

/// Phase 2: merge every mutual nearest-neighbor pair exactly once. The
/// lower-index side of the pair performs the allocation and pool write and
/// both of its slots; the higher-index side is left untouched by anyone
/// else, since `NN[j] == i` with `i < j` is unique to this pair (spec
/// section 5's "Ordering guarantees").
fn mutual_merge(pool: &ClusterPool, active: &[AtomicU32], nn: &[u32], next_id: &AtomicU32) {
    (0..active.len()).into_par_iter().for_each(|i| {
        let j = nn[i] as usize;
        if nn[j] as usize == i && i < j {
            let ci = active[i].load(Ordering::Relaxed);
            let cj = active[j].load(Ordering::Relaxed);
            let merged_box = Aabb::merge(pool.get(ci).bbox, pool.get(cj).bbox);

            let n = next_id.fetch_add(1, Ordering::Relaxed);
            // Safety: `n` was just allocated from the shared counter and
            // is therefore unique to this call across the whole build.
            unsafe { pool.write(n, Cluster::internal(merged_box, ci, cj)) };

            active[i].store(n, Ordering::Relaxed);
            active[j].store(NONE, Ordering::Relaxed);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::vector::vec3f;

    fn unit_box_at(x: f32) -> Aabb {
        Aabb::from_triangle(vec3f(x, 0.0, 0.0), vec3f(x + 1.0, 0.0, 0.0), vec3f(x, 1.0, 0.0))
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let boxes = vec![unit_box_at(0.0)];
        let result = build(1, &[0], &boxes, 16);
        assert_eq!(result.root, 0);
        assert!(pool_cluster_is_leaf(&result));
    }

    fn pool_cluster_is_leaf(result: &PlocResult) -> bool {
        result.pool.get(result.root).is_leaf()
    }

    #[test]
    fn two_leaves_merge_into_one_internal_root() {
        let boxes = vec![unit_box_at(0.0), unit_box_at(100.0)];
        let result = build(2, &[0, 1], &boxes, 16);
        let root = result.pool.get(result.root);
        assert!(root.is_internal());
        let left = result.pool.get(root.left);
        let right = result.pool.get(root.right);
        assert!(left.is_leaf() && right.is_leaf());
    }

    #[test]
    fn every_triangle_appears_in_exactly_one_leaf() {
        let n = 37;
        let boxes: Vec<Aabb> = (0..n).map(|i| unit_box_at(i as f32 * 3.0)).collect();
        let pi: Vec<u32> = (0..n as u32).collect();
        let result = build(n, &pi, &boxes, 16);

        let mut seen = vec![false; n];
        let mut stack = vec![result.root];
        while let Some(id) = stack.pop() {
            let c = result.pool.get(id);
            if c.is_leaf() {
                assert!(!seen[c.triangle as usize], "triangle visited twice");
                seen[c.triangle as usize] = true;
            } else {
                stack.push(c.left);
                stack.push(c.right);
            }
        }
        assert!(seen.iter().all(|&v| v));
    }

    #[test]
    fn internal_box_equals_union_of_children() {
        let n = 20;
        let boxes: Vec<Aabb> = (0..n).map(|i| unit_box_at(i as f32 * 2.0)).collect();
        let pi: Vec<u32> = (0..n as u32).collect();
        let result = build(n, &pi, &boxes, 16);

        let mut stack = vec![result.root];
        while let Some(id) = stack.pop() {
            let c = result.pool.get(id);
            if c.is_internal() {
                let left = result.pool.get(c.left);
                let right = result.pool.get(c.right);
                assert_eq!(c.bbox, Aabb::merge(left.bbox, right.bbox));
                stack.push(c.left);
                stack.push(c.right);
            }
        }
    }
}
