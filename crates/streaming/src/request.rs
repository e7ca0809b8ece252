/// Identifies one in-flight texture load.
///
/// `generation` is bumped whenever the stream is reset (GPU context loss,
/// unmount); completions carrying an older generation are stale and ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket {
    pub id: u64,
    pub generation: u32,
}
