///
/// Axis aligned bounding box
/// Adapted from Javascript/C++ code provided by Jeppe Revall Frisvad,
/// originally based on code by Nvidia, MIT License (2008-2010)

use super::vector::*;

///
/// ### Bounding Box
/// Axis aligned bounding box type. The empty box is the sentinel
/// `min = +inf, max = -inf`; merging anything into it yields the other
/// operand untouched, since componentwise min/max already does the right
/// thing against an infinite sentinel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3f32,
    pub max: Vec3f32,
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
pub struct AabbGpu {
    pub min: Vec3f32,
    _padding0: f32,
    pub max: Vec3f32,
    _padding1: f32,
}
static_assertions::assert_eq_size!(AabbGpu, [u8; 4 * 4 * 2]);

impl From<Aabb> for AabbGpu {
    fn from(value: Aabb) -> Self {
        Self {
            min: value.min,
            _padding0: 0.0,
            max: value.max,
            _padding1: 0.0,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// The empty box: including nothing.
    pub fn empty() -> Aabb {
        Self {
            min: vec3f(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: vec3f(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.0 > self.max.0 || self.min.1 > self.max.1 || self.min.2 > self.max.2
    }

    /// Create a bounding box from a given (already world-space) triangle.
    pub fn from_triangle(v0: Vec3f32, v1: Vec3f32, v2: Vec3f32) -> Aabb {
        Self {
            min: v0.min(v1).min(v2),
            max: v0.max(v1).max(v2),
        }
    }

    /// Merge of two boxes: componentwise min of mins, max of maxes. The
    /// empty sentinel is the identity for this operation.
    pub fn merge(a: Aabb, b: Aabb) -> Aabb {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Extend the bounding box to include the given bounding box.
    pub fn include(&mut self, other: &Aabb) {
        *self = Aabb::merge(*self, *other);
    }

    /// Extend the bounding box to include the given vertex.
    pub fn include_vertex(&mut self, v: Vec3f32) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// Get the center of the bounding box.
    pub fn center(&self) -> Vec3f32 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents of the bounding box.
    pub fn extent(&self) -> Vec3f32 {
        self.max - self.min
    }

    /// Euclidean distance between min and max corners; a cluster's
    /// "diagonal" extent.
    pub fn diagonal(&self) -> f32 {
        self.extent().magnitude()
    }

    /// `2 * (dx*dy + dy*dz + dz*dx)`, the surface-area cluster-distance
    /// metric used by PLOC's nearest-neighbor search. Zero for the empty
    /// box.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.extent();
        2.0 * (d.0 * d.1 + d.1 * d.2 + d.2 * d.0)
    }

    /// Index of the first axis achieving the box's maximum extent, in
    /// X, Y, Z order.
    pub fn longest_axis(&self) -> u32 {
        let d = self.extent();
        let mut axis = 0u32;
        let mut max_dist = d.0;
        if d.1 > max_dist {
            axis = 1;
            max_dist = d.1;
        }
        if d.2 > max_dist {
            axis = 2;
        }
        axis
    }

    /// Return the relative position of a point inside of the box.
    ///
    /// The minimum corner will have an offset of (0, 0, 0) and
    /// the maximum corner will have an offset of (1, 1, 1).
    pub fn offset(&self, point: Vec3f32) -> Vec3f32 {
        let mut o = point - self.min;
        if self.max.0 > self.min.0 {
            o.0 /= self.max.0 - self.min.0;
        }
        if self.max.1 > self.min.1 {
            o.1 /= self.max.1 - self.min.1;
        }
        if self.max.2 > self.min.2 {
            o.2 /= self.max.2 - self.min.2;
        }
        o
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_with_empty_is_identity() {
        let a = Aabb::from_triangle(vec3f(0.0, 0.0, 0.0), vec3f(1.0, 0.0, 0.0), vec3f(0.0, 1.0, 0.0));
        assert_eq!(Aabb::merge(a, Aabb::empty()), a);
        assert_eq!(Aabb::merge(Aabb::empty(), a), a);
    }

    #[test]
    fn merge_is_commutative() {
        let a = Aabb::from_triangle(vec3f(0.0, 0.0, 0.0), vec3f(1.0, 0.0, 0.0), vec3f(0.0, 1.0, 0.0));
        let b = Aabb::from_triangle(vec3f(5.0, 5.0, 5.0), vec3f(6.0, 5.0, 5.0), vec3f(5.0, 6.0, 5.0));
        assert_eq!(Aabb::merge(a, b), Aabb::merge(b, a));
    }

    #[test]
    fn merged_surface_area_is_at_least_either_operand() {
        let a = Aabb::from_triangle(vec3f(0.0, 0.0, 0.0), vec3f(1.0, 0.0, 0.0), vec3f(0.0, 1.0, 0.0));
        let b = Aabb::from_triangle(vec3f(5.0, 5.0, 5.0), vec3f(6.0, 5.0, 5.0), vec3f(5.0, 6.0, 5.0));
        let merged = Aabb::merge(a, b).surface_area();
        assert!(merged >= a.surface_area());
        assert!(merged >= b.surface_area());
    }

    #[test]
    fn empty_box_has_zero_surface_area() {
        assert_eq!(Aabb::empty().surface_area(), 0.0);
    }

    #[test]
    fn longest_axis_breaks_ties_toward_x_then_y() {
        let tied = Aabb {
            min: vec3f(0.0, 0.0, 0.0),
            max: vec3f(2.0, 2.0, 1.0),
        };
        assert_eq!(tied.longest_axis(), 0);

        let tied_yz = Aabb {
            min: vec3f(0.0, 0.0, 0.0),
            max: vec3f(1.0, 2.0, 2.0),
        };
        assert_eq!(tied_yz.longest_axis(), 1);
    }
}
