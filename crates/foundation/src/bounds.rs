use crate::math::Vec3;

/// Axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb3 { min, max }
    }

    /// Cube with its minimum corner at `origin`.
    pub fn cube(origin: Vec3, edge: f64) -> Self {
        Aabb3::new(origin, origin + Vec3::splat(edge))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half-open containment: `min <= p < max` on every axis.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }
}
