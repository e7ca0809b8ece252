use serde::{Deserialize, Serialize};

/// Identifies a resident texture. Ids are never reused within a stream, so a
/// stale id simply stops resolving after eviction or context loss.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// Identifies a plane within its chunk: (chunk-local slot index).
///
/// Combined with the owning chunk coordinate this is globally unique.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneSlot(pub u32);
