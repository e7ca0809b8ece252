use crate::chunk::ChunkCoord;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkOffset {
    pub dx: i64,
    pub dy: i64,
    pub dz: i64,
    /// Chebyshev distance from the centre cell.
    pub dist: u64,
}

/// Precomputed cube of offsets out to `render_distance + fade_margin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    render_distance: u32,
    fade_margin: u32,
    offsets: Vec<ChunkOffset>,
}

impl Neighborhood {
    pub fn new(render_distance: u32, fade_margin: u32) -> Self {
        let max = render_distance.saturating_add(fade_margin) as i64;
        let mut offsets = Vec::with_capacity(((2 * max + 1).pow(3)) as usize);
        for dx in -max..=max {
            for dy in -max..=max {
                for dz in -max..=max {
                    let dist = dx.unsigned_abs().max(dy.unsigned_abs()).max(dz.unsigned_abs());
                    if dist > max as u64 {
                        continue;
                    }
                    offsets.push(ChunkOffset { dx, dy, dz, dist });
                }
            }
        }
        Self {
            render_distance,
            fade_margin,
            offsets,
        }
    }

    pub fn render_distance(&self) -> u32 {
        self.render_distance
    }

    pub fn fade_margin(&self) -> u32 {
        self.fade_margin
    }

    /// Outer radius of the active set.
    pub fn radius(&self) -> u32 {
        self.render_distance.saturating_add(self.fade_margin)
    }

    pub fn offsets(&self) -> &[ChunkOffset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn around(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        self.offsets
            .iter()
            .map(|o| center.offset(o.dx, o.dy, o.dz))
            .collect()
    }
}
