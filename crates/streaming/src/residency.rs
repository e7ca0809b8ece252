use foundation::ids::TextureId;

/// Lifecycle of a cached media URL.
///
/// Loading → Ready, or Loading → Failed. Eviction and context loss remove the
/// entry entirely; the next acquire starts over from Loading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Residency {
    Loading,
    Ready(TextureId),
    /// The load failed. The entry stays cached (and evictable) so the URL is
    /// not refetched every frame; waiters were dropped.
    Failed,
}

impl Residency {
    pub fn is_ready(&self) -> bool {
        matches!(self, Residency::Ready(_))
    }
}
