//! The infinite canvas: mount, per-frame pipeline, unmount.
//!
//! Each frame runs, in order:
//! 1. collect finished texture loads and attach them to waiting planes
//! 2. report progress increases to the host
//! 3. step the camera controller
//! 4. let the chunk scheduler recentre the active set (throttled)
//! 5. build deferred chunk layouts within the idle budget
//! 6. acquire textures for planes that could become visible, then ease fades
//! 7. publish the draw list
use std::collections::BTreeMap;

use foundation::time::Millis;
use runtime::budget::FrameBudget;
use runtime::frame::Frame;
use runtime::idle::IdleQueue;
use scene::chunk::ChunkCoord;
use scene::fade::{CameraGrid, FadeParams};
use scene::layout::LayoutCache;
use scene::media::MediaList;
use scene::neighborhood::Neighborhood;
use scene::plane::{MediaPlane, PlaneDraw, PlaneKey, TextureState};
use scene::visibility::{ChunkScheduler, ChunkSetChange};
use streaming::backend::TextureBackend;
use streaming::residency::Residency;
use streaming::stream::{Acquire, StreamConfig, TextureStream};
use tracing::{debug, info};

use crate::boundary::{SceneBoundary, contain};
use crate::config::{Appearance, CanvasConfig};
use crate::controller::{CameraController, CameraFrame, Cursor};
use crate::error::CanvasError;
use crate::input::{HeldKeys, InputEvent, KeyBindings, Listeners};
use crate::stats::CanvasStats;

pub type ProgressCallback = Box<dyn FnMut(u8)>;

pub struct InfiniteCanvas<B: TextureBackend> {
    config: CanvasConfig,
    media: MediaList,
    stream: TextureStream<B, PlaneKey>,
    layouts: LayoutCache,
    scheduler: ChunkScheduler,
    idle: IdleQueue<ChunkCoord, ()>,
    controller: CameraController,
    bindings: KeyBindings,
    held: HeldKeys,
    listeners: Listeners,
    boundary: SceneBoundary,
    /// Active chunks whose layout has been built, with their planes.
    chunks: BTreeMap<ChunkCoord, Vec<MediaPlane>>,
    draws: Vec<PlaneDraw>,
    camera: Option<CameraFrame>,
    on_progress: Option<ProgressCallback>,
    mounted: bool,
    now: Millis,
    stats: CanvasStats,
}

impl<B: TextureBackend> InfiniteCanvas<B> {
    pub fn new(config: CanvasConfig, media: MediaList, backend: B) -> Self {
        let stream = TextureStream::new(
            backend,
            StreamConfig {
                capacity: config.cache_capacity(),
                sampling: config.sampling,
            },
        );
        let neighborhood = Neighborhood::new(config.fade.render_distance, config.fade.fade_margin);
        Self {
            stream,
            layouts: LayoutCache::new(config.layout),
            scheduler: ChunkScheduler::new(neighborhood, config.throttle),
            idle: IdleQueue::new(),
            controller: CameraController::new(config.controller, config.layout.chunk_size),
            bindings: KeyBindings::default(),
            held: HeldKeys::default(),
            listeners: Listeners::new(),
            boundary: SceneBoundary::default(),
            chunks: BTreeMap::new(),
            draws: Vec::new(),
            camera: None,
            on_progress: None,
            mounted: false,
            now: Millis::ZERO,
            stats: CanvasStats::default(),
            config,
            media,
        }
    }

    /// Registers the splash progress callback. It receives strictly
    /// increasing values in `0..=100`.
    pub fn on_progress(&mut self, callback: impl FnMut(u8) + 'static) {
        self.on_progress = Some(Box::new(callback));
    }

    pub fn set_key_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn appearance(&self) -> &Appearance {
        &self.config.appearance
    }

    pub fn media(&self) -> &MediaList {
        &self.media
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn fault(&self) -> Option<&str> {
        self.boundary.fault()
    }

    pub fn cursor(&self) -> Cursor {
        self.controller.cursor()
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn camera(&self) -> Option<CameraFrame> {
        self.camera
    }

    pub fn active_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.scheduler.active().iter().copied()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.scheduler.active().len()
    }

    /// Chunks whose deferred layout has not been built yet.
    pub fn pending_layouts(&self) -> usize {
        self.idle.len()
    }

    pub fn planes(&self) -> impl Iterator<Item = &MediaPlane> + '_ {
        self.chunks.values().flatten()
    }

    pub fn draws(&self) -> &[PlaneDraw] {
        &self.draws
    }

    pub fn stream(&self) -> &TextureStream<B, PlaneKey> {
        &self.stream
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.stream.backend_mut()
    }

    pub fn progress(&self) -> u8 {
        self.stream.progress().percent()
    }

    /// Splash gate: all started loads settled, or the fallback elapsed.
    pub fn is_ready(&self) -> bool {
        self.mounted && (self.progress() >= 100 || self.now.0 >= self.config.splash_fallback_ms)
    }

    pub fn stats(&self) -> CanvasStats {
        CanvasStats {
            chunks_generated: self.layouts.generated(),
            active_chunks: self.scheduler.active().len(),
            instantiated_chunks: self.chunks.len(),
            resident_textures: self.stream.len(),
            visible_planes: self.draws.len(),
            ..self.stats
        }
        .with_stream(&self.stream.stats())
    }

    /// Attaches listeners and commits the initial chunk set around the
    /// camera. An empty media list declines to start.
    pub fn mount(&mut self) -> Result<(), CanvasError> {
        if self.mounted {
            return Err(CanvasError::AlreadyMounted);
        }
        if self.media.is_empty() {
            info!("canvas not mounted: media list is empty");
            return Err(CanvasError::EmptyMedia);
        }

        self.boundary.clear();
        self.controller.reset();
        self.held.clear();
        self.listeners.attach_all();
        self.now = Millis::ZERO;
        self.mounted = true;

        let change = self.scheduler.initialize(self.controller.chunk(), self.now);
        self.apply_chunk_change(change);
        info!(
            "canvas mounted: {} media items, {} active chunks",
            self.media.len(),
            self.scheduler.active().len()
        );
        Ok(())
    }

    /// Detaches every listener, cancels deferred work and disposes every
    /// texture.
    pub fn unmount(&mut self) -> Result<(), CanvasError> {
        if !self.mounted {
            return Err(CanvasError::NotMounted);
        }
        let detached = self.listeners.detach_all();
        self.unload();
        self.mounted = false;
        info!("canvas unmounted: {detached} listeners detached");
        Ok(())
    }

    /// Routes a host event. Returns whether it was consumed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.listeners.accepts(event) {
            return false;
        }
        match event {
            InputEvent::ContextLost | InputEvent::ContextRestored => {
                info!("render context event {event:?}: clearing texture cache");
                self.stream.reset();
                true
            }
            InputEvent::KeyDown { key } => {
                self.held.press(key);
                self.bindings.action(key).is_some()
            }
            InputEvent::KeyUp { key } => {
                self.held.release(key);
                self.bindings.action(key).is_some()
            }
            other => self.controller.handle(other),
        }
    }

    /// Replaces the media list. Planes whose resolved URL changed drop their
    /// texture and fade in again; an empty list unloads the scene.
    pub fn set_media(&mut self, media: MediaList) {
        if media.is_empty() {
            if self.mounted {
                self.listeners.detach_all();
                self.unload();
                self.mounted = false;
                info!("media list emptied: canvas unloaded");
            }
            self.media = media;
            return;
        }
        let mut changed = 0usize;
        for plane in self.chunks.values_mut().flatten() {
            if let Some(item) = media.resolve(plane.media_index()) {
                if plane.set_media(item.clone()) {
                    changed += 1;
                }
            }
        }
        debug!("media list replaced: {changed} planes changed texture");
        self.media = media;
    }

    /// Runs one frame inside the failure boundary and returns the draw list.
    pub fn frame(&mut self, frame: Frame) -> Result<&[PlaneDraw], CanvasError> {
        if let Some(msg) = self.boundary.fault() {
            return Err(CanvasError::Faulted(msg.to_string()));
        }
        if !self.mounted {
            return Err(CanvasError::NotMounted);
        }
        if let Err(msg) = contain(|| self.run_frame(frame)) {
            self.boundary.record(msg.clone());
            self.draws.clear();
            self.idle.cancel_all();
            return Err(CanvasError::Faulted(msg));
        }
        Ok(&self.draws)
    }

    fn run_frame(&mut self, frame: Frame) {
        self.now = frame.time;
        self.stats.frames += 1;

        self.stream.pump();
        for (key, id) in self.stream.take_ready() {
            // A waiter can outlive a media swap; only attach the texture
            // when it is still the plane's URL.
            let Some(url) = self.stream.texture(id).map(|t| t.url.clone()) else {
                continue;
            };
            if let Some(plane) = self.plane_mut(key) {
                if plane.texture() == TextureState::Waiting && plane.url() == url {
                    plane.mark_ready(id);
                }
            }
        }

        if let Some(pct) = self.stream.progress_mut().take_increase() {
            debug!("texture progress {pct}%");
            if let Some(cb) = self.on_progress.as_mut() {
                cb(pct);
            }
        }

        let actions = self.held.actions(&self.bindings);
        let camera = self.controller.step(self.now, &actions);
        self.camera = Some(camera);

        if let Some(change) =
            self.scheduler
                .observe(camera.grid.chunk, self.now, camera.zooming, camera.z_speed)
        {
            self.stats.chunk_set_replacements += 1;
            self.apply_chunk_change(change);
        }

        let mut budget = FrameBudget::new(self.config.idle_budget_units);
        for (coord, ()) in self.idle.take_ready(self.now, &mut budget) {
            if self.scheduler.is_active(coord) {
                self.instantiate(coord);
            }
        }

        self.update_planes(camera.grid);
    }

    fn apply_chunk_change(&mut self, change: ChunkSetChange) {
        for coord in &change.removed {
            if self.idle.cancel(coord) {
                self.stats.layout_tasks_cancelled += 1;
            }
            self.chunks.remove(coord);
        }
        let deadline = self.now.plus(self.config.layout_deadline_ms);
        for coord in change.added {
            if self.layouts.get(coord).is_some() {
                self.instantiate(coord);
            } else {
                self.idle.schedule(coord, (), deadline, 1);
            }
        }
    }

    fn instantiate(&mut self, coord: ChunkCoord) {
        if self.chunks.contains_key(&coord) {
            return;
        }
        let media = &self.media;
        let planes: Vec<MediaPlane> = self
            .layouts
            .get_or_generate(coord)
            .iter()
            .filter_map(|data| {
                media
                    .resolve(data.media_index)
                    .map(|item| MediaPlane::new(coord, data, item.clone()))
            })
            .collect();
        self.chunks.insert(coord, planes);
    }

    fn plane_mut(&mut self, key: PlaneKey) -> Option<&mut MediaPlane> {
        self.chunks
            .get_mut(&key.chunk)?
            .iter_mut()
            .find(|p| p.key() == key)
    }

    /// Texture bookkeeping and fade step for every instantiated plane.
    ///
    /// Only planes whose target opacity is above the invisibility threshold
    /// request (or re-request) textures; ready ones refresh their URL's
    /// recency so on-screen textures are the last to be evicted.
    fn update_planes(&mut self, grid: CameraGrid) {
        let fade = self.config.fade;
        let Self {
            chunks,
            stream,
            draws,
            ..
        } = self;
        draws.clear();

        for plane in chunks.values_mut().flatten() {
            sync_texture(plane, stream);

            if is_candidate(&fade, grid, plane) {
                match plane.texture() {
                    TextureState::Unrequested => match stream.acquire(plane.url(), plane.key()) {
                        Acquire::Ready(id) => plane.mark_ready(id),
                        Acquire::Pending => plane.mark_waiting(),
                        Acquire::Failed => plane.mark_failed(),
                    },
                    TextureState::Ready(_) => {
                        stream.touch(plane.url());
                    }
                    TextureState::Waiting | TextureState::Failed => {}
                }
            }

            plane.step_fade(&fade, grid);
            if let Some(draw) = plane.draw(&fade) {
                draws.push(draw);
            }
        }
    }

    fn unload(&mut self) {
        let cancelled = self.idle.cancel_all();
        self.stats.layout_tasks_cancelled += cancelled as u64;
        self.stream.reset();
        self.chunks.clear();
        self.scheduler.reset();
        self.controller.reset();
        self.held.clear();
        self.draws.clear();
        self.camera = None;
    }
}

fn is_candidate(fade: &FadeParams, grid: CameraGrid, plane: &MediaPlane) -> bool {
    let dist = grid.chunk.chebyshev(plane.chunk());
    let depth = (plane.position().z - grid.cam_z).abs();
    depth <= fade.clip_depth() && fade.target_opacity(dist, depth) > fade.invisible_threshold
}

/// Reconciles a plane's texture state with the stream: stale ids (evicted, or
/// resident under a URL the plane no longer shows) are dropped, and waiting
/// planes pick up outcomes they were not notified of (their load was evicted
/// and restarted by another plane, or it failed).
fn sync_texture<B: TextureBackend>(plane: &mut MediaPlane, stream: &TextureStream<B, PlaneKey>) {
    match plane.texture() {
        TextureState::Ready(id) => {
            if !stream.texture(id).is_some_and(|t| t.url == plane.url()) {
                plane.drop_texture();
            }
        }
        TextureState::Waiting => match stream.residency(plane.url()) {
            None => plane.drop_texture(),
            Some(Residency::Ready(id)) => plane.mark_ready(id),
            Some(Residency::Failed) => plane.mark_failed(),
            Some(Residency::Loading) => {}
        },
        TextureState::Failed => {
            if stream.residency(plane.url()).is_none() {
                plane.drop_texture();
            }
        }
        TextureState::Unrequested => {}
    }
}

#[cfg(test)]
mod tests {
    use super::InfiniteCanvas;
    use crate::config::{CanvasConfig, ConfigOverrides, DeviceProfile};
    use crate::error::CanvasError;
    use crate::input::{InputEvent, ListenerTarget};
    use foundation::ids::TextureId;
    use pretty_assertions::assert_eq;
    use runtime::frame::Frame;
    use scene::chunk::ChunkCoord;
    use scene::media::{MediaItem, MediaList};
    use scene::neighborhood::Neighborhood;
    use scene::plane::{PlaneKey, TextureState};
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;
    use streaming::backend::{LoadError, LoadOutcome, TextureBackend};
    use streaming::request::LoadTicket;
    use streaming::residency::Residency;
    use streaming::texture::{DecodedImage, Sampling};

    /// Completes every load `latency` polls after the next one (the next poll
    /// by default); URLs containing "broken" fail.
    #[derive(Debug, Default)]
    struct InstantBackend {
        in_flight: Vec<(LoadTicket, String, u64)>,
        latency: u64,
        polls: u64,
        started: Vec<String>,
        resident: BTreeSet<TextureId>,
        panic_on_poll: bool,
    }

    impl TextureBackend for InstantBackend {
        fn begin_load(&mut self, ticket: LoadTicket, url: &str) {
            self.in_flight
                .push((ticket, url.to_string(), self.polls + self.latency));
            self.started.push(url.to_string());
        }

        fn poll_loads(&mut self) -> Vec<LoadOutcome> {
            if self.panic_on_poll {
                panic!("backend exploded");
            }
            self.polls += 1;
            let now = self.polls;
            let (done, waiting): (Vec<_>, Vec<_>) =
                self.in_flight.drain(..).partition(|(_, _, due)| *due < now);
            self.in_flight = waiting;
            done.into_iter()
                .map(|(ticket, url, _)| {
                    let result = if url.contains("broken") {
                        Err(LoadError::Decode("bad bytes".into()))
                    } else {
                        Ok(DecodedImage {
                            width: 800,
                            height: 600,
                        })
                    };
                    LoadOutcome {
                        ticket,
                        url,
                        result,
                    }
                })
                .collect()
        }

        fn upload(&mut self, id: TextureId, _image: &DecodedImage, _sampling: &Sampling) {
            self.resident.insert(id);
        }

        fn dispose(&mut self, id: TextureId) {
            self.resident.remove(&id);
        }
    }

    fn media(urls: &[&str]) -> MediaList {
        MediaList::new(urls.iter().map(|u| MediaItem::new(*u, 800.0, 600.0)).collect())
    }

    fn canvas(urls: &[&str]) -> InfiniteCanvas<InstantBackend> {
        InfiniteCanvas::new(
            CanvasConfig::resolve(DeviceProfile::desktop()),
            media(urls),
            InstantBackend::default(),
        )
    }

    fn run(c: &mut InfiniteCanvas<InstantBackend>, from: u64, frames: u64) {
        for i in from..from + frames {
            c.frame(Frame::fixed(i, 16.0)).expect("frame");
        }
    }

    #[test]
    fn single_item_scene_loads_to_completion() {
        let mut c = canvas(&["a"]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        c.on_progress(move |p| sink.borrow_mut().push(p));

        c.mount().expect("mount");
        let expected: BTreeSet<ChunkCoord> = Neighborhood::new(2, 1)
            .around(ChunkCoord::ORIGIN)
            .into_iter()
            .collect();
        let active: BTreeSet<ChunkCoord> = c.active_chunks().collect();
        assert_eq!(active, expected);

        run(&mut c, 0, 120);

        assert_eq!(c.progress(), 100);
        assert!(c.is_ready());
        assert_eq!(seen.borrow().last(), Some(&100));
        assert!(seen.borrow().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(c.backend_mut().started, vec!["a".to_string()]);
        assert!(!c.draws().is_empty());
        for d in c.draws() {
            assert!((0.0..=1.0).contains(&d.opacity));
            assert_eq!(d.scale.x, d.scale.y * (800.0 / 600.0));
        }
    }

    #[test]
    fn empty_media_declines_to_mount() {
        let mut c = canvas(&[]);
        assert_eq!(c.mount(), Err(CanvasError::EmptyMedia));
        assert!(c.listeners().is_empty());
        assert_eq!(
            c.frame(Frame::fixed(0, 16.0)).map(|d| d.len()),
            Err(CanvasError::NotMounted)
        );
        assert!(c.backend_mut().started.is_empty());
    }

    #[test]
    fn layouts_are_deferred_to_idle_time() {
        let mut c = canvas(&["a"]);
        c.mount().expect("mount");
        assert_eq!(c.pending_layouts(), 343);
        assert_eq!(c.planes().count(), 0);

        run(&mut c, 0, 1);
        // 8 units of idle budget per frame on desktop.
        assert_eq!(c.pending_layouts(), 343 - 8);

        // Deadlines are 100ms after mount; overdue work runs regardless.
        run(&mut c, 1, 7);
        assert_eq!(c.pending_layouts(), 0);
        assert_eq!(c.stats().chunks_generated, 343);
    }

    #[test]
    fn context_loss_forces_fresh_loads() {
        let mut c = canvas(&["a", "b"]);
        c.mount().expect("mount");
        run(&mut c, 0, 30);
        assert_eq!(c.backend_mut().started.len(), 2);
        let visible_before = c.draws().len();
        assert!(visible_before > 0);

        assert!(c.handle_event(&InputEvent::ContextLost));
        assert!(c.stream().is_empty());
        assert!(c.backend_mut().resident.is_empty());

        run(&mut c, 30, 30);
        assert_eq!(c.backend_mut().started.len(), 4);
        assert!(!c.draws().is_empty());
        let live: Vec<TextureId> = c.draws().iter().map(|d| d.texture).collect();
        assert!(live.iter().all(|id| c.stream().texture(*id).is_some()));
    }

    #[test]
    fn failed_media_never_becomes_visible() {
        let mut c = canvas(&["broken.jpg"]);
        c.mount().expect("mount");
        run(&mut c, 0, 30);
        assert!(c.draws().is_empty());
        assert_eq!(c.progress(), 100);
        assert_eq!(c.stats().textures_failed, 1);
        assert_eq!(c.backend_mut().started.len(), 1);
    }

    #[test]
    fn unmount_detaches_everything() {
        let mut c = canvas(&["a"]);
        c.mount().expect("mount");
        assert_eq!(c.listeners().on(ListenerTarget::Window), 5);
        run(&mut c, 0, 3);

        c.unmount().expect("unmount");
        assert!(c.listeners().is_empty());
        assert_eq!(c.pending_layouts(), 0);
        assert!(c.stream().is_empty());
        assert!(c.backend_mut().resident.is_empty());
        assert!(!c.handle_event(&InputEvent::Wheel { delta_y: 50.0 }));
        assert_eq!(c.unmount(), Err(CanvasError::NotMounted));

        c.mount().expect("remount");
        assert_eq!(c.mount(), Err(CanvasError::AlreadyMounted));
    }

    #[test]
    fn moving_the_camera_recentres_chunks() {
        let mut c = canvas(&["a"]);
        c.mount().expect("mount");
        c.handle_event(&InputEvent::KeyDown { key: "s".into() });
        let mut i = 0;
        while c.controller().chunk().z < 1 {
            c.frame(Frame::fixed(i, 16.0)).expect("frame");
            i += 1;
            assert!(i < 2000);
        }
        c.handle_event(&InputEvent::KeyUp { key: "s".into() });
        run(&mut c, i, 30);

        assert_eq!(c.controller().chunk(), ChunkCoord::new(0, 0, 1));
        assert!(c.active_chunks().any(|a| a == ChunkCoord::new(0, 0, 4)));
        assert!(!c.active_chunks().any(|a| a == ChunkCoord::new(0, 0, -3)));
        assert!(c.stats().chunk_set_replacements >= 1);
    }

    #[test]
    fn replacing_media_swaps_textures() {
        let mut c = canvas(&["a"]);
        c.mount().expect("mount");
        run(&mut c, 0, 20);
        c.set_media(media(&["b"]));
        assert!(c.planes().all(|p| p.url() == "b"));
        run(&mut c, 20, 20);
        assert!(c.backend_mut().started.contains(&"b".to_string()));
        assert!(!c.draws().is_empty());

        c.set_media(MediaList::default());
        assert!(!c.is_mounted());
        assert!(c.listeners().is_empty());
    }

    #[test]
    fn media_swap_while_loading_never_attaches_the_old_texture() {
        let backend = InstantBackend {
            latency: 3,
            ..InstantBackend::default()
        };
        let mut c = InfiniteCanvas::new(
            CanvasConfig::resolve(DeviceProfile::desktop()),
            media(&["a"]),
            backend,
        );
        c.mount().expect("mount");

        let mut next = 0;
        while c.stream().residency("a") != Some(Residency::Loading) {
            assert!(next < 10, "load for \"a\" never started");
            c.frame(Frame::fixed(next, 16.0)).expect("frame");
            next += 1;
        }
        c.set_media(media(&["b"]));

        for i in next..next + 60 {
            c.frame(Frame::fixed(i, 16.0)).expect("frame");

            if let Some(waiters) = c.stream().waiters("b") {
                let unique: BTreeSet<PlaneKey> = waiters.iter().copied().collect();
                assert_eq!(unique.len(), waiters.len());
            }
            for plane in c.planes() {
                if let TextureState::Ready(id) = plane.texture() {
                    let url = c.stream().texture(id).map(|t| t.url.as_str());
                    assert_eq!(url, Some(plane.url()));
                }
            }
        }

        assert_eq!(c.stream().residency("a").map(|r| r.is_ready()), Some(true));
        assert!(c.planes().all(|p| p.url() == "b"));
        assert!(c.planes().any(|p| p.is_ready()));
        assert!(!c.draws().is_empty());
    }

    #[test]
    fn panics_degrade_to_no_scene() {
        let mut c = canvas(&["a"]);
        c.mount().expect("mount");
        run(&mut c, 0, 5);
        c.backend_mut().panic_on_poll = true;

        let err = c.frame(Frame::fixed(5, 16.0)).map(|d| d.len()).unwrap_err();
        assert_eq!(err, CanvasError::Faulted("backend exploded".into()));
        assert!(c.draws().is_empty());
        assert!(matches!(
            c.frame(Frame::fixed(6, 16.0)).map(|d| d.len()),
            Err(CanvasError::Faulted(_))
        ));

        c.backend_mut().panic_on_poll = false;
        c.unmount().expect("unmount");
        c.mount().expect("remount clears fault");
        assert!(c.frame(Frame::fixed(0, 16.0)).is_ok());
    }

    #[test]
    fn splash_falls_back_after_timeout() {
        let overrides = ConfigOverrides {
            splash_fallback_ms: Some(100.0),
            ..ConfigOverrides::default()
        };
        let cfg = CanvasConfig::resolve(DeviceProfile::desktop())
            .with_overrides(&overrides)
            .expect("valid");
        let mut c = InfiniteCanvas::new(cfg, media(&["a"]), InstantBackend::default());
        c.mount().expect("mount");
        assert!(!c.is_ready());
        c.frame(Frame::fixed(7, 16.0)).expect("frame");
        assert!(c.is_ready());
    }
}
