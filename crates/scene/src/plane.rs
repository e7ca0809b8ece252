use foundation::ids::{PlaneSlot, TextureId};
use foundation::math::Vec3;
use serde::Serialize;

use crate::chunk::ChunkCoord;
use crate::fade::{CameraGrid, FadeParams, PlaneFade};
use crate::layout::PlaneData;
use crate::media::MediaItem;

/// Stable identity of a plane: its chunk plus its slot in the chunk layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PlaneKey {
    pub chunk: ChunkCoord,
    pub slot: PlaneSlot,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureState {
    /// No request issued yet (or the previous texture was dropped).
    Unrequested,
    Waiting,
    Ready(TextureId),
    Failed,
}

/// One renderable instruction for the host's draw pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneDraw {
    pub key: PlaneKey,
    pub position: Vec3,
    pub scale: Vec3,
    pub texture: TextureId,
    pub opacity: f64,
    pub depth_write: bool,
}

/// A textured quad placed by the layout generator.
///
/// The plane draws nothing until its texture is ready; only then does its
/// fade start easing in.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPlane {
    key: PlaneKey,
    position: Vec3,
    base_scale: Vec3,
    media_index: u32,
    media: MediaItem,
    texture: TextureState,
    fade: PlaneFade,
}

impl MediaPlane {
    pub fn new(chunk: ChunkCoord, data: &PlaneData, media: MediaItem) -> Self {
        Self {
            key: PlaneKey {
                chunk,
                slot: data.id,
            },
            position: data.position,
            base_scale: data.scale,
            media_index: data.media_index,
            media,
            texture: TextureState::Unrequested,
            fade: PlaneFade::default(),
        }
    }

    pub fn key(&self) -> PlaneKey {
        self.key
    }

    pub fn chunk(&self) -> ChunkCoord {
        self.key.chunk
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn media_index(&self) -> u32 {
        self.media_index
    }

    pub fn media(&self) -> &MediaItem {
        &self.media
    }

    pub fn url(&self) -> &str {
        &self.media.url
    }

    pub fn texture(&self) -> TextureState {
        self.texture
    }

    pub fn fade(&self) -> &PlaneFade {
        &self.fade
    }

    pub fn display_scale(&self) -> Vec3 {
        self.media.display_scale(self.base_scale)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.texture, TextureState::Ready(_))
    }

    /// Swaps the media item. A different URL drops the texture and restarts
    /// the fade; returns whether that happened.
    pub fn set_media(&mut self, media: MediaItem) -> bool {
        let changed = media.url != self.media.url;
        self.media = media;
        if changed {
            self.texture = TextureState::Unrequested;
            self.fade.reset();
        }
        changed
    }

    pub fn mark_waiting(&mut self) {
        self.texture = TextureState::Waiting;
    }

    pub fn mark_failed(&mut self) {
        self.texture = TextureState::Failed;
    }

    /// Attaches a texture. The fade always starts from zero.
    pub fn mark_ready(&mut self, id: TextureId) {
        if self.texture != TextureState::Ready(id) {
            self.fade.reset();
        }
        self.texture = TextureState::Ready(id);
    }

    /// Forgets the texture, e.g. after it was evicted or the context was lost.
    pub fn drop_texture(&mut self) {
        self.texture = TextureState::Unrequested;
        self.fade.reset();
    }

    /// Advances the fade; no-op until the texture is ready.
    pub fn step_fade(&mut self, params: &FadeParams, cam: CameraGrid) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.fade.step(params, cam, self.key.chunk, self.position.z)
    }

    pub fn draw(&self, params: &FadeParams) -> Option<PlaneDraw> {
        let TextureState::Ready(texture) = self.texture else {
            return None;
        };
        if !self.fade.visible {
            return None;
        }
        Some(PlaneDraw {
            key: self.key,
            position: self.position,
            scale: self.display_scale(),
            texture,
            opacity: self.fade.material_opacity(params),
            depth_write: self.fade.depth_write,
        })
    }
}
