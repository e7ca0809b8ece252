use foundation::bounds::Aabb3;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Integer cell of the world grid; each cell is a cube of `chunk_size`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl ChunkCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Floor-division of a world position by the chunk edge length.
    pub fn from_world(p: Vec3, chunk_size: f64) -> Self {
        let cell = |v: f64| {
            let c = (v / chunk_size).floor();
            if c.is_finite() { c as i64 } else { 0 }
        };
        Self::new(cell(p.x), cell(p.y), cell(p.z))
    }

    pub fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// Chebyshev (chessboard) distance in cells.
    pub fn chebyshev(self, other: Self) -> u64 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }

    pub fn origin(self, chunk_size: f64) -> Vec3 {
        Vec3::new(
            self.x as f64 * chunk_size,
            self.y as f64 * chunk_size,
            self.z as f64 * chunk_size,
        )
    }

    pub fn bounds(self, chunk_size: f64) -> Aabb3 {
        Aabb3::cube(self.origin(chunk_size), chunk_size)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkCoord;
    use foundation::math::Vec3;

    #[test]
    fn from_world_floors_negative_positions() {
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(0.0, 0.0, 50.0), 110.0),
            ChunkCoord::new(0, 0, 0)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-0.1, 110.0, -220.0), 110.0),
            ChunkCoord::new(-1, 1, -2)
        );
    }

    #[test]
    fn chebyshev_is_max_axis() {
        let a = ChunkCoord::new(1, -2, 3);
        assert_eq!(a.chebyshev(ChunkCoord::ORIGIN), 3);
        assert_eq!(a.chebyshev(a.offset(-2, 1, 0)), 2);
    }

    #[test]
    fn bounds_cover_the_cell() {
        let c = ChunkCoord::new(-1, 0, 2);
        let b = c.bounds(10.0);
        assert_eq!(b.min, Vec3::new(-10.0, 0.0, 20.0));
        assert!(b.contains(Vec3::new(-5.0, 5.0, 25.0)));
        assert_eq!(ChunkCoord::from_world(Vec3::new(-5.0, 5.0, 25.0), 10.0), c);
        assert_eq!(c.to_string(), "-1,0,2");
    }
}
