//! Throttled tracking of the active chunk set.
//!
//! The camera's chunk is observed every frame, but the active set is only
//! recomputed when the chunk changed and the throttle interval has passed.
//! The interval grows while the camera zooms, and grows further when it zooms
//! fast, so rapid dives do not rebuild the scene every few frames.
use std::collections::BTreeSet;

use foundation::time::Millis;
use runtime::throttle::Throttle;
use tracing::debug;

use crate::chunk::ChunkCoord;
use crate::neighborhood::Neighborhood;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThrottleConfig {
    pub idle_ms: f64,
    pub zoom_ms: f64,
    pub fast_zoom_ms: f64,
    /// `|velocity.z|` above which a zoom counts as fast.
    pub fast_zoom_speed: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            idle_ms: 100.0,
            zoom_ms: 250.0,
            fast_zoom_ms: 400.0,
            fast_zoom_speed: 1.5,
        }
    }
}

impl ThrottleConfig {
    pub fn interval_ms(&self, zooming: bool, z_speed: f64) -> f64 {
        if !zooming {
            self.idle_ms
        } else if z_speed.abs() > self.fast_zoom_speed {
            self.fast_zoom_ms
        } else {
            self.zoom_ms
        }
    }
}

/// Difference between two consecutive active sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSetChange {
    pub center: ChunkCoord,
    pub added: Vec<ChunkCoord>,
    pub removed: Vec<ChunkCoord>,
}

impl ChunkSetChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug)]
pub struct ChunkScheduler {
    neighborhood: Neighborhood,
    throttle_cfg: ThrottleConfig,
    throttle: Throttle,
    center: Option<ChunkCoord>,
    pending: Option<ChunkCoord>,
    active: BTreeSet<ChunkCoord>,
}

impl ChunkScheduler {
    pub fn new(neighborhood: Neighborhood, throttle_cfg: ThrottleConfig) -> Self {
        Self {
            neighborhood,
            throttle_cfg,
            throttle: Throttle::new(),
            center: None,
            pending: None,
            active: BTreeSet::new(),
        }
    }

    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Chunk waiting for the throttle to open, if any.
    pub fn pending(&self) -> Option<ChunkCoord> {
        self.pending
    }

    pub fn active(&self) -> &BTreeSet<ChunkCoord> {
        &self.active
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Chebyshev distance of `coord` from the committed centre.
    pub fn distance(&self, coord: ChunkCoord) -> Option<u64> {
        self.center.map(|c| c.chebyshev(coord))
    }

    /// Commits `center` immediately, bypassing the throttle. Used at mount so
    /// the first frame already has content.
    pub fn initialize(&mut self, center: ChunkCoord, now: Millis) -> ChunkSetChange {
        self.pending = None;
        self.throttle.mark(now);
        self.commit(center)
    }

    /// Feeds this frame's camera chunk. Returns the set change when a pending
    /// chunk gets committed.
    pub fn observe(
        &mut self,
        coord: ChunkCoord,
        now: Millis,
        zooming: bool,
        z_speed: f64,
    ) -> Option<ChunkSetChange> {
        if self.center.is_none() {
            return Some(self.initialize(coord, now));
        }
        if self.center == Some(coord) {
            // Back where we were; nothing to commit.
            self.pending = None;
            return None;
        }
        self.pending = Some(coord);

        let interval = self.throttle_cfg.interval_ms(zooming, z_speed);
        if !self.throttle.try_fire(now, interval) {
            return None;
        }
        let target = self.pending.take()?;
        Some(self.commit(target))
    }

    /// Drops all state; the next observation commits immediately.
    pub fn reset(&mut self) {
        self.throttle.reset();
        self.center = None;
        self.pending = None;
        self.active.clear();
    }

    fn commit(&mut self, center: ChunkCoord) -> ChunkSetChange {
        let next: BTreeSet<ChunkCoord> = self.neighborhood.around(center).into_iter().collect();
        let mut added: Vec<ChunkCoord> = next.difference(&self.active).copied().collect();
        // Nearest first, so deferred layout work fills in from the centre out.
        added.sort_by_key(|c| (center.chebyshev(*c), *c));
        let removed: Vec<ChunkCoord> = self.active.difference(&next).copied().collect();
        debug!(
            "active chunks recentred on {center}: +{} -{}",
            added.len(),
            removed.len()
        );
        self.active = next;
        self.center = Some(center);
        ChunkSetChange {
            center,
            added,
            removed,
        }
    }
}
