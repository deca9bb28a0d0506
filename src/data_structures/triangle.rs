use cgmath::{Matrix4, Vector4};

use super::vector::Vec3f32;

/// A single triangle, immutable for the duration of one build. Addressed
/// by its position in the input slice (its "triangle index").
#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub p0: Vec3f32,
    pub p1: Vec3f32,
    pub p2: Vec3f32,
    /// Opaque handle used to look up this triangle's model transform.
    pub model_id: u32,
}

impl Triangle {
    pub fn new(p0: Vec3f32, p1: Vec3f32, p2: Vec3f32, model_id: u32) -> Self {
        Self { p0, p1, p2, model_id }
    }
}

/// Dense `model_id -> 4x4 matrix` mapping. The builder only reads it.
#[derive(Debug, Clone)]
pub struct ModelTable(Vec<Matrix4<f32>>);

impl ModelTable {
    pub fn new(matrices: Vec<Matrix4<f32>>) -> Self {
        Self(matrices)
    }

    pub fn get(&self, model_id: u32) -> &Matrix4<f32> {
        &self.0[model_id as usize]
    }
}

impl Default for ModelTable {
    fn default() -> Self {
        Self(Vec::new())
    }
}

#[inline]
fn transform_point(v: Vec3f32, model: &Matrix4<f32>) -> Vec3f32 {
    let world: Vector4<f32> = model * Vector4::new(v.0, v.1, v.2, 1.0);
    world.truncate().into()
}

/// World-space triangle vertices: each vertex transformed individually by
/// its model matrix, as `Aabb::from_triangle` expects.
pub fn world_vertices(tri: &Triangle, models: &ModelTable) -> (Vec3f32, Vec3f32, Vec3f32) {
    let model = models.get(tri.model_id);
    (
        transform_point(tri.p0, model),
        transform_point(tri.p1, model),
        transform_point(tri.p2, model),
    )
}

/// World-space centroid: average the model-space vertices first, then
/// transform the single resulting point. Matches the source's order of
/// operations exactly (not equivalent to averaging transformed vertices
/// under a non-affine model matrix).
pub fn world_centroid(tri: &Triangle, models: &ModelTable) -> Vec3f32 {
    let model = models.get(tri.model_id);
    let avg = (tri.p0 + tri.p1 + tri.p2) * (1.0 / 3.0);
    transform_point(avg, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::vector::vec3f;
    use cgmath::SquareMatrix;

    #[test]
    fn identity_model_leaves_vertices_unchanged() {
        let models = ModelTable::new(vec![Matrix4::identity()]);
        let tri = Triangle::new(vec3f(0.0, 0.0, 0.0), vec3f(1.0, 0.0, 0.0), vec3f(0.0, 1.0, 0.0), 0);
        let (a, b, c) = world_vertices(&tri, &models);
        assert_eq!(a, tri.p0);
        assert_eq!(b, tri.p1);
        assert_eq!(c, tri.p2);
    }

    #[test]
    fn translation_model_shifts_centroid() {
        let models = ModelTable::new(vec![Matrix4::from_translation(cgmath::Vector3::new(10.0, 0.0, 0.0))]);
        let tri = Triangle::new(vec3f(0.0, 0.0, 0.0), vec3f(3.0, 0.0, 0.0), vec3f(0.0, 3.0, 0.0), 0);
        let centroid = world_centroid(&tri, &models);
        assert_eq!(centroid, vec3f(11.0, 1.0, 0.0));
    }
}
