//! Deterministic per-chunk plane placement.
//!
//! A chunk's layout is a pure function of its coordinate and the layout
//! parameters: the coordinate is hashed into a seed and a fixed number of
//! planes is drawn from that stream. Re-entering a chunk, or regenerating it
//! after a cache loss, yields bit-identical planes.
use std::collections::BTreeMap;

use foundation::hash::ChunkRng;
use foundation::ids::PlaneSlot;
use foundation::math::Vec3;
use tracing::debug;

use crate::chunk::ChunkCoord;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutParams {
    pub chunk_size: f64,
    pub planes_per_chunk: u32,
    /// Generated plane heights are uniform in `[min_height, max_height)`.
    pub min_height: f64,
    pub max_height: f64,
    /// Mixed into every chunk seed; changing it reshuffles the whole world.
    pub salt: u64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            chunk_size: 110.0,
            planes_per_chunk: 5,
            min_height: 12.0,
            max_height: 26.0,
            salt: 0x6d65_6469_615f_6776,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaneData {
    pub id: PlaneSlot,
    pub position: Vec3,
    pub scale: Vec3,
    /// Running media counter; the media item is `counter mod list length`,
    /// so the layout does not depend on how many items exist.
    pub media_index: u32,
}

/// Generate the planes of one chunk. Never fails; coordinates are unbounded.
pub fn generate_layout(coord: ChunkCoord, params: &LayoutParams) -> Vec<PlaneData> {
    let mut rng = ChunkRng::for_coords(params.salt, coord.x, coord.y, coord.z);
    let origin = coord.origin(params.chunk_size);
    let size = params.chunk_size;
    let (lo, hi) = if params.min_height <= params.max_height {
        (params.min_height, params.max_height)
    } else {
        (params.max_height, params.min_height)
    };

    // Consecutive counters within a chunk, offset by a chunk-seeded base.
    let counter_base = rng.next_u32();

    (0..params.planes_per_chunk)
        .map(|i| {
            let position = Vec3::new(
                origin.x + rng.range(0.0, size),
                origin.y + rng.range(0.0, size),
                origin.z + rng.range(0.0, size),
            );
            let h = if hi > lo { rng.range(lo, hi) } else { lo };
            PlaneData {
                id: PlaneSlot(i),
                position,
                scale: Vec3::new(h, h, 1.0),
                media_index: counter_base.wrapping_add(i),
            }
        })
        .collect()
}

/// Append-only memo of generated layouts.
///
/// Layouts are small and deterministic, so entries are kept indefinitely
/// even after their chunk (and its textures) leave the scene.
#[derive(Debug, Default)]
pub struct LayoutCache {
    params: LayoutParams,
    layouts: BTreeMap<ChunkCoord, Vec<PlaneData>>,
    generated: u64,
}

impl LayoutCache {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            layouts: BTreeMap::new(),
            generated: 0,
        }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// How many times the generator actually ran.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&[PlaneData]> {
        self.layouts.get(&coord).map(Vec::as_slice)
    }

    pub fn get_or_generate(&mut self, coord: ChunkCoord) -> &[PlaneData] {
        let params = self.params;
        let generated = &mut self.generated;
        self.layouts.entry(coord).or_insert_with(|| {
            *generated += 1;
            debug!("generated layout for chunk {coord}");
            generate_layout(coord, &params)
        })
    }
}
