///
/// Small, `bytemuck`-friendly 3-component vector used for geometry that
/// ends up copied straight into a GPU storage buffer.
///
/// Adapted from the vector type originally shared by A.B. Sørensen in
/// https://github.com/absorensen/the-guide, trimmed to the operations the
/// BVH builder actually needs.
use std::ops::{Add, Index, IndexMut, Mul, Sub};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, bytemuck::Zeroable, bytemuck::Pod)]
pub struct Vec3f32(pub f32, pub f32, pub f32);

#[inline(always)]
pub const fn vec3f(x: f32, y: f32, z: f32) -> Vec3f32 {
    Vec3f32(x, y, z)
}

impl Vec3f32 {
    pub const ZERO: Vec3f32 = vec3f(0.0, 0.0, 0.0);

    /// Componentwise minimum.
    pub fn min(self, other: Self) -> Self {
        Self(
            f32::min(self.0, other.0),
            f32::min(self.1, other.1),
            f32::min(self.2, other.2),
        )
    }

    /// Componentwise maximum.
    pub fn max(self, other: Self) -> Self {
        Self(
            f32::max(self.0, other.0),
            f32::max(self.1, other.1),
            f32::max(self.2, other.2),
        )
    }

    pub fn magnitude(self) -> f32 {
        (self.0 * self.0 + self.1 * self.1 + self.2 * self.2).sqrt()
    }
}

impl Add<Vec3f32> for Vec3f32 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl Sub<Vec3f32> for Vec3f32 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2)
    }
}

impl Mul<f32> for Vec3f32 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self(self.0 * rhs, self.1 * rhs, self.2 * rhs)
    }
}

impl Index<u32> for Vec3f32 {
    type Output = f32;

    fn index(&self, index: u32) -> &Self::Output {
        match index {
            0 => &self.0,
            1 => &self.1,
            2 => &self.2,
            _ => panic!("unexpected axis index {index}"),
        }
    }
}

impl IndexMut<u32> for Vec3f32 {
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        match index {
            0 => &mut self.0,
            1 => &mut self.1,
            2 => &mut self.2,
            _ => panic!("unexpected axis index {index}"),
        }
    }
}

impl From<cgmath::Vector3<f32>> for Vec3f32 {
    fn from(value: cgmath::Vector3<f32>) -> Self {
        Self(value.x, value.y, value.z)
    }
}

impl From<Vec3f32> for cgmath::Vector3<f32> {
    fn from(value: Vec3f32) -> Self {
        cgmath::Vector3::new(value.0, value.1, value.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_are_componentwise() {
        let a = vec3f(1.0, -2.0, 3.0);
        let b = vec3f(-1.0, 5.0, 3.0);
        assert_eq!(a.min(b), vec3f(-1.0, -2.0, 3.0));
        assert_eq!(a.max(b), vec3f(1.0, 5.0, 3.0));
    }

    #[test]
    fn magnitude_matches_euclidean_distance() {
        let v = vec3f(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0);
    }
}
