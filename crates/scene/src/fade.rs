//! Per-plane opacity easing.
//!
//! Each plane fades towards `min(grid, depth²)` where `grid` falls off with
//! chunk distance past the render distance and `depth` falls off with the
//! plane's z-distance from the camera. Planes far beyond the depth range are
//! hard-clipped without easing.
use foundation::math::{clamp, lerp};

use crate::chunk::ChunkCoord;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FadeParams {
    pub render_distance: u32,
    pub fade_margin: u32,
    pub depth_fade_start: f64,
    pub depth_fade_end: f64,
    /// Extra depth past `depth_fade_end` before a plane is clipped outright.
    pub clip_slack: f64,
    pub invisible_threshold: f64,
    pub opaque_threshold: f64,
    /// Per-step easing factor towards the target opacity.
    pub ease: f64,
}

impl Default for FadeParams {
    fn default() -> Self {
        Self {
            render_distance: 2,
            fade_margin: 1,
            depth_fade_start: 140.0,
            depth_fade_end: 260.0,
            clip_slack: 50.0,
            invisible_threshold: 0.01,
            opaque_threshold: 0.99,
            ease: 0.18,
        }
    }
}

impl FadeParams {
    pub fn grid_fade(&self, dist: u64) -> f64 {
        let rd = self.render_distance as f64;
        let d = dist as f64;
        if d <= rd {
            return 1.0;
        }
        let margin = (self.fade_margin as f64).max(1e-4);
        (1.0 - (d - rd) / margin).max(0.0)
    }

    pub fn depth_fade(&self, abs_depth: f64) -> f64 {
        if abs_depth <= self.depth_fade_start {
            return 1.0;
        }
        let span = (self.depth_fade_end - self.depth_fade_start).max(1e-4);
        (1.0 - (abs_depth - self.depth_fade_start) / span).max(0.0)
    }

    pub fn target_opacity(&self, dist: u64, abs_depth: f64) -> f64 {
        let depth = self.depth_fade(abs_depth);
        clamp(self.grid_fade(dist).min(depth * depth), 0.0, 1.0)
    }

    pub fn clip_depth(&self) -> f64 {
        self.depth_fade_end + self.clip_slack
    }
}

/// Camera position in grid terms, shared by every plane each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraGrid {
    pub chunk: ChunkCoord,
    pub cam_z: f64,
}

impl Default for CameraGrid {
    fn default() -> Self {
        Self {
            chunk: ChunkCoord::ORIGIN,
            cam_z: 0.0,
        }
    }
}

/// Opacity state of one plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaneFade {
    pub opacity: f64,
    pub visible: bool,
    pub depth_write: bool,
    parity: u8,
}

impl Default for PlaneFade {
    fn default() -> Self {
        Self {
            opacity: 0.0,
            visible: false,
            depth_write: false,
            parity: 0,
        }
    }
}

impl PlaneFade {
    /// Material opacity: snapped to 1 once the plane is effectively opaque.
    pub fn material_opacity(&self, params: &FadeParams) -> f64 {
        if self.opacity > params.opaque_threshold {
            1.0
        } else {
            self.opacity
        }
    }

    /// Advances one frame for a plane in chunk `chunk` at depth `z`.
    ///
    /// Returns `false` when the step was skipped: planes that are already
    /// invisible only re-evaluate every other frame.
    pub fn step(&mut self, params: &FadeParams, cam: CameraGrid, chunk: ChunkCoord, z: f64) -> bool {
        self.parity ^= 1;
        if self.opacity < params.invisible_threshold && !self.visible && self.parity == 0 {
            return false;
        }

        let abs_depth = (z - cam.cam_z).abs();
        if abs_depth > params.clip_depth() {
            self.opacity = 0.0;
            self.depth_write = false;
            self.visible = false;
            return true;
        }

        let target = params.target_opacity(cam.chunk.chebyshev(chunk), abs_depth);
        self.opacity = if target < params.invisible_threshold
            && self.opacity < params.invisible_threshold
        {
            0.0
        } else {
            clamp(lerp(self.opacity, target, params.ease), 0.0, 1.0)
        };
        self.depth_write = self.opacity > params.opaque_threshold;
        self.visible = self.opacity > params.invisible_threshold;
        true
    }

    /// Back to fully transparent, e.g. when the plane's texture changes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
