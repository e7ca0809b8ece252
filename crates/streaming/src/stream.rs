//! Texture stream manager.
//!
//! Loads each media URL at most once, fans the completion out to every
//! waiter registered for that URL, and bounds resident textures with an LRU
//! capacity. Single-threaded: the owner calls [`TextureStream::pump`] once per
//! frame to collect finished loads from the backend.
use std::collections::BTreeMap;

use foundation::ids::TextureId;
use tracing::{debug, warn};

use crate::backend::{LoadOutcome, TextureBackend};
use crate::cache::{CacheCapacity, LruCache};
use crate::progress::LoadProgress;
use crate::request::LoadTicket;
use crate::residency::Residency;
use crate::texture::{Sampling, Texture};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub capacity: CacheCapacity,
    pub sampling: Sampling,
}

/// Result of [`TextureStream::acquire`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Acquire {
    /// Already resident: usable this frame.
    Ready(TextureId),
    /// A load is in flight; the waiter will be reported by `take_ready`.
    Pending,
    /// The URL failed to load and is not retried until it leaves the cache.
    Failed,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StreamStats {
    pub loads_started: u64,
    pub loads_ready: u64,
    pub loads_failed: u64,
    pub evicted: u64,
    pub stale_outcomes: u64,
    pub resets: u64,
}

#[derive(Debug)]
enum Entry<W> {
    Loading { ticket: LoadTicket, waiters: Vec<W> },
    Ready(Texture),
    Failed,
}

impl<W> Entry<W> {
    fn residency(&self) -> Residency {
        match self {
            Entry::Loading { .. } => Residency::Loading,
            Entry::Ready(tex) => Residency::Ready(tex.id),
            Entry::Failed => Residency::Failed,
        }
    }
}

/// Sole owner of every texture. Consumers hold [`TextureId`]s and must
/// tolerate them going stale (eviction, context loss): [`TextureStream::texture`]
/// then returns `None` and the consumer acquires again.
#[derive(Debug)]
pub struct TextureStream<B: TextureBackend, W> {
    backend: B,
    config: StreamConfig,
    cache: LruCache<Entry<W>>,
    by_id: BTreeMap<TextureId, String>,
    generation: u32,
    next_ticket: u64,
    next_texture: u64,
    ready: Vec<(W, TextureId)>,
    progress: LoadProgress,
    stats: StreamStats,
}

impl<B: TextureBackend, W> TextureStream<B, W> {
    pub fn new(backend: B, config: StreamConfig) -> Self {
        Self {
            backend,
            config,
            cache: LruCache::new(config.capacity),
            by_id: BTreeMap::new(),
            generation: 0,
            next_ticket: 1,
            next_texture: 1,
            ready: Vec::new(),
            progress: LoadProgress::new(),
            stats: StreamStats::default(),
        }
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn progress(&self) -> &LoadProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut LoadProgress {
        &mut self.progress
    }

    pub fn residency(&self, url: &str) -> Option<Residency> {
        self.cache.peek(url).map(Entry::residency)
    }

    /// Resolve a texture id; `None` once it was evicted or the cache reset.
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        let url = self.by_id.get(&id)?;
        match self.cache.peek(url)? {
            Entry::Ready(tex) if tex.id == id => Some(tex),
            _ => None,
        }
    }

    /// Marks a resident URL most recently used. Loading and failed entries
    /// are left alone and no waiter is queued.
    pub fn touch(&mut self, url: &str) -> bool {
        match self.cache.peek(url) {
            Some(Entry::Ready(_)) => self.cache.touch(url),
            _ => false,
        }
    }

    /// Waiters queued behind the in-flight load for `url`.
    pub fn waiters(&self, url: &str) -> Option<&[W]> {
        match self.cache.peek(url)? {
            Entry::Loading { waiters, .. } => Some(waiters),
            _ => None,
        }
    }

    /// Request the texture for `url` on behalf of `waiter`.
    ///
    /// - Resident: returns `Ready` immediately (same tick) and marks the URL
    ///   most recently used; `waiter` is not queued.
    /// - Loading: queues `waiter` behind the in-flight load.
    /// - Unknown: starts exactly one backend load and queues `waiter`.
    pub fn acquire(&mut self, url: &str, waiter: W) -> Acquire {
        if let Some(entry) = self.cache.get_mut(url) {
            return match entry {
                Entry::Ready(tex) => Acquire::Ready(tex.id),
                Entry::Loading { waiters, .. } => {
                    waiters.push(waiter);
                    Acquire::Pending
                }
                Entry::Failed => Acquire::Failed,
            };
        }

        let ticket = LoadTicket {
            id: self.next_ticket,
            generation: self.generation,
        };
        self.next_ticket += 1;
        self.stats.loads_started += 1;
        self.progress.record_started();
        self.backend.begin_load(ticket, url);
        debug!("texture load started: {url} (ticket {})", ticket.id);

        let evicted = self.cache.insert(
            url,
            Entry::Loading {
                ticket,
                waiters: vec![waiter],
            },
        );
        self.release(evicted, true);
        Acquire::Pending
    }

    /// Collect finished loads from the backend. Returns how many outcomes
    /// were applied (stale ones excluded).
    pub fn pump(&mut self) -> usize {
        let outcomes = self.backend.poll_loads();
        let mut applied = 0;
        for outcome in outcomes {
            if self.finish(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one load outcome. Returns `false` for stale outcomes (the entry
    /// was evicted, reset, or replaced by a newer load).
    pub fn finish(&mut self, outcome: LoadOutcome) -> bool {
        let LoadOutcome { ticket, url, result } = outcome;

        let current = match self.cache.peek(&url) {
            Some(Entry::Loading { ticket: t, .. }) => *t == ticket,
            _ => false,
        };
        if ticket.generation != self.generation || !current {
            self.stats.stale_outcomes += 1;
            debug!("discarding stale texture outcome: {url}");
            return false;
        }

        self.progress.record_settled();

        let Some(entry) = self.cache.peek_mut(&url) else {
            return false;
        };

        match result {
            Ok(image) => {
                let id = TextureId(self.next_texture);
                self.next_texture += 1;
                self.backend.upload(id, &image, &self.config.sampling);

                let texture = Texture {
                    id,
                    url: url.clone(),
                    width: image.width,
                    height: image.height,
                    sampling: self.config.sampling,
                };
                let previous = std::mem::replace(entry, Entry::Ready(texture));
                if let Entry::Loading { waiters, .. } = previous {
                    self.ready.extend(waiters.into_iter().map(|w| (w, id)));
                }
                self.by_id.insert(id, url);
                self.stats.loads_ready += 1;
            }
            Err(err) => {
                warn!("texture load failed: {url} -> {err}");
                // Waiters are dropped here; nobody waits on a failed URL.
                *entry = Entry::Failed;
                self.stats.loads_failed += 1;
            }
        }
        true
    }

    /// Waiters whose texture became ready since the last call, in
    /// registration order per URL.
    pub fn take_ready(&mut self) -> Vec<(W, TextureId)> {
        std::mem::take(&mut self.ready)
    }

    /// Drop every texture and every pending waiter.
    ///
    /// Used for GPU context loss/restore and on teardown. In-flight loads are
    /// cancelled and their late completions ignored; the next `acquire` for
    /// any URL starts a fresh load.
    pub fn reset(&mut self) {
        let drained = self.cache.drain();
        let n = drained.len();
        self.release(drained, false);
        self.by_id.clear();
        self.ready.clear();
        self.generation = self.generation.wrapping_add(1);
        self.stats.resets += 1;
        debug!("texture stream reset: released {n} entries");
    }

    fn release(&mut self, entries: Vec<(String, Entry<W>)>, evicted: bool) {
        for (url, entry) in entries {
            match entry {
                Entry::Ready(tex) => {
                    self.by_id.remove(&tex.id);
                    self.backend.dispose(tex.id);
                }
                Entry::Loading { ticket, .. } => {
                    self.backend.cancel_load(ticket);
                    // A cancelled load will never settle.
                    self.progress.record_settled();
                }
                Entry::Failed => {}
            }
            if evicted {
                self.stats.evicted += 1;
                debug!("texture evicted: {url}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Acquire, StreamConfig, TextureStream};
    use crate::backend::{LoadError, LoadOutcome, TextureBackend};
    use crate::cache::CacheCapacity;
    use crate::request::LoadTicket;
    use crate::residency::Residency;
    use crate::texture::{DecodedImage, Sampling};
    use foundation::ids::TextureId;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct FakeBackend {
        started: Vec<(LoadTicket, String)>,
        cancelled: Vec<LoadTicket>,
        uploaded: Vec<TextureId>,
        disposed: Vec<TextureId>,
        completed: Vec<LoadOutcome>,
    }

    impl FakeBackend {
        fn complete_ok(&mut self, url: &str) {
            let (ticket, _) = self
                .started
                .iter()
                .rev()
                .find(|(_, u)| u == url)
                .cloned()
                .expect("load was started");
            self.completed.push(LoadOutcome {
                ticket,
                url: url.to_string(),
                result: Ok(DecodedImage {
                    width: 800,
                    height: 600,
                }),
            });
        }

        fn complete_err(&mut self, url: &str) {
            let (ticket, _) = self
                .started
                .iter()
                .rev()
                .find(|(_, u)| u == url)
                .cloned()
                .expect("load was started");
            self.completed.push(LoadOutcome {
                ticket,
                url: url.to_string(),
                result: Err(LoadError::Network("404".into())),
            });
        }

        fn loads_for(&self, url: &str) -> usize {
            self.started.iter().filter(|(_, u)| u == url).count()
        }
    }

    impl TextureBackend for FakeBackend {
        fn begin_load(&mut self, ticket: LoadTicket, url: &str) {
            self.started.push((ticket, url.to_string()));
        }

        fn poll_loads(&mut self) -> Vec<LoadOutcome> {
            std::mem::take(&mut self.completed)
        }

        fn cancel_load(&mut self, ticket: LoadTicket) {
            self.cancelled.push(ticket);
        }

        fn upload(&mut self, id: TextureId, _image: &DecodedImage, _sampling: &Sampling) {
            self.uploaded.push(id);
        }

        fn dispose(&mut self, id: TextureId) {
            self.disposed.push(id);
        }
    }

    fn stream(capacity: usize) -> TextureStream<FakeBackend, u32> {
        TextureStream::new(
            FakeBackend::default(),
            StreamConfig {
                capacity: CacheCapacity::new(capacity),
                sampling: Sampling::for_device(false),
            },
        )
    }

    fn load(s: &mut TextureStream<FakeBackend, u32>, url: &str, waiter: u32) -> TextureId {
        s.acquire(url, waiter);
        s.backend_mut().complete_ok(url);
        s.pump();
        let ready = s.take_ready();
        ready.last().map(|(_, id)| *id).expect("ready")
    }

    #[test]
    fn first_loader_wins_and_all_waiters_fire() {
        let mut s = stream(4);
        assert_eq!(s.acquire("a", 1), Acquire::Pending);
        assert_eq!(s.acquire("a", 2), Acquire::Pending);
        assert_eq!(s.backend().loads_for("a"), 1);

        s.backend_mut().complete_ok("a");
        assert_eq!(s.pump(), 1);

        let ready = s.take_ready();
        assert_eq!(ready.len(), 2);
        assert_eq!(ready[0].0, 1);
        assert_eq!(ready[1].0, 2);
        assert_eq!(ready[0].1, ready[1].1);
        assert!(s.take_ready().is_empty());

        let tex = s.texture(ready[0].1).expect("resident");
        assert_eq!(tex.url, "a");
        assert_eq!(tex.sampling, Sampling::for_device(false));
    }

    #[test]
    fn cached_texture_is_ready_synchronously() {
        let mut s = stream(4);
        let id = load(&mut s, "a", 1);
        assert_eq!(s.acquire("a", 9), Acquire::Ready(id));
        assert!(s.take_ready().is_empty());
        assert_eq!(s.backend().loads_for("a"), 1);
    }

    #[test]
    fn touch_only_refreshes_resident_entries() {
        let mut s = stream(2);
        let a = load(&mut s, "a", 1);
        s.acquire("b", 2);
        assert_eq!(s.waiters("b"), Some(&[2][..]));

        assert!(!s.touch("b"));
        assert_eq!(s.waiters("b"), Some(&[2][..]));
        assert!(!s.touch("missing"));
        assert_eq!(s.waiters("a"), None);

        // "a" was touched after "b" started loading, so "b" is evicted.
        assert!(s.touch("a"));
        load(&mut s, "c", 3);
        assert!(s.texture(a).is_some());
        assert_eq!(s.residency("b"), None);
    }

    #[test]
    fn failure_drops_waiters_and_is_not_retried() {
        let mut s = stream(4);
        s.acquire("bad", 1);
        s.acquire("bad", 2);
        s.backend_mut().complete_err("bad");
        s.pump();

        assert!(s.take_ready().is_empty());
        assert_eq!(s.residency("bad"), Some(Residency::Failed));
        assert_eq!(s.acquire("bad", 3), Acquire::Failed);
        assert_eq!(s.backend().loads_for("bad"), 1);
        assert_eq!(s.stats().loads_failed, 1);
        assert_eq!(s.progress().percent(), 100);
    }

    #[test]
    fn capacity_holds_and_lru_is_evicted() {
        let mut s = stream(3);
        let ids: Vec<TextureId> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, url)| load(&mut s, url, i as u32))
            .collect();

        // Touch "a" so "b" is now the least recently used.
        assert_eq!(s.acquire("a", 10), Acquire::Ready(ids[0]));
        load(&mut s, "d", 11);

        assert_eq!(s.len(), 3);
        assert!(s.texture(ids[0]).is_some());
        assert!(s.texture(ids[1]).is_none());
        assert_eq!(s.residency("b"), None);
        assert_eq!(s.backend().disposed, vec![ids[1]]);

        for (i, url) in ["e", "f", "g", "h"].iter().enumerate() {
            load(&mut s, url, 20 + i as u32);
            assert!(s.len() <= 3);
        }
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn evicting_a_loading_entry_cancels_and_ignores_late_completion() {
        let mut s = stream(1);
        s.acquire("a", 1);
        s.acquire("b", 2);
        assert_eq!(s.residency("a"), None);
        assert_eq!(s.backend().cancelled.len(), 1);

        s.backend_mut().complete_ok("a");
        s.pump();
        assert!(s.take_ready().is_empty());
        assert_eq!(s.stats().stale_outcomes, 1);
    }

    #[test]
    fn context_loss_forces_fresh_loads() {
        let mut s = stream(2);
        let a = load(&mut s, "a", 1);
        let b = load(&mut s, "b", 2);
        s.acquire("c", 3);

        s.reset();
        assert!(s.is_empty());
        assert!(s.texture(a).is_none());
        assert!(s.texture(b).is_none());
        assert_eq!(s.stats().evicted, 0);

        // The in-flight load from before the reset is stale.
        s.backend_mut().complete_ok("c");
        s.pump();
        assert!(s.take_ready().is_empty());

        assert_eq!(s.acquire("a", 4), Acquire::Pending);
        assert_eq!(s.backend().loads_for("a"), 2);
        s.backend_mut().complete_ok("a");
        s.pump();
        let ready = s.take_ready();
        assert_eq!(ready.len(), 1);
        assert_ne!(ready[0].1, a);
    }
}
