use serde::Serialize;
use streaming::stream::StreamStats;

/// Counters reported by the canvas. Gauges reflect the last frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasStats {
    pub frames: u64,
    pub textures_requested: u64,
    pub textures_loaded: u64,
    pub textures_failed: u64,
    pub textures_evicted: u64,
    pub texture_resets: u64,
    pub stale_loads: u64,
    pub chunks_generated: u64,
    pub chunk_set_replacements: u64,
    pub layout_tasks_cancelled: u64,
    pub active_chunks: usize,
    pub instantiated_chunks: usize,
    pub resident_textures: usize,
    pub visible_planes: usize,
}

impl CanvasStats {
    pub fn with_stream(mut self, stream: &StreamStats) -> Self {
        self.textures_requested = stream.loads_started;
        self.textures_loaded = stream.loads_ready;
        self.textures_failed = stream.loads_failed;
        self.textures_evicted = stream.evicted;
        self.texture_resets = stream.resets;
        self.stale_loads = stream.stale_outcomes;
        self
    }
}
