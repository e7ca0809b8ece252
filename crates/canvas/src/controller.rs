//! Camera controller: pointer/touch/wheel/keyboard input integrated into a
//! smoothed velocity model with idle parallax drift.
//!
//! Input handlers only accumulate into the target velocity and scroll buffer;
//! [`CameraController::step`] does all integration once per frame:
//! - intro impulse during the first seconds after mount
//! - held-key impulses
//! - drift easing (frozen while dragging, off on touch devices)
//! - scroll buffer into z, with exponential decay of the buffer
//! - clamp, ease velocity, integrate, decay target velocity
use std::collections::BTreeSet;

use foundation::math::{Vec2, Vec3, clamp, lerp};
use foundation::time::Millis;
use scene::chunk::ChunkCoord;
use scene::fade::CameraGrid;
use serde::Serialize;

use crate::config::ControllerTuning;
use crate::input::{Action, InputEvent, TouchPoint, touch_distance};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Cursor {
    #[default]
    Grab,
    Grabbing,
}

/// Mutable per-frame camera state. Single owner: the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub velocity: Vec3,
    pub target_velocity: Vec3,
    /// Navigational position; chunk math uses this, never the drifted one.
    pub base_position: Vec3,
    pub drift: Vec2,
    /// Pointer in normalized device coordinates (`[-1, 1]`, y up).
    pub pointer: Vec2,
    pub last_pointer_px: Vec2,
    pub scroll_accum: f64,
    pub dragging: bool,
    pub last_touches: Vec<TouchPoint>,
    pub last_touch_distance: f64,
}

impl ControllerState {
    pub fn new(initial_z: f64) -> Self {
        Self {
            velocity: Vec3::ZERO,
            target_velocity: Vec3::ZERO,
            base_position: Vec3::new(0.0, 0.0, initial_z),
            drift: Vec2::ZERO,
            pointer: Vec2::ZERO,
            last_pointer_px: Vec2::ZERO,
            scroll_accum: 0.0,
            dragging: false,
            last_touches: Vec::new(),
            last_touch_distance: 0.0,
        }
    }
}

/// Result of one controller step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFrame {
    /// Rendered camera position: base plus drift.
    pub position: Vec3,
    pub grid: CameraGrid,
    pub zooming: bool,
    pub z_speed: f64,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    tuning: ControllerTuning,
    chunk_size: f64,
    viewport: Vec2,
    state: ControllerState,
    cursor: Cursor,
}

impl CameraController {
    pub fn new(tuning: ControllerTuning, chunk_size: f64) -> Self {
        Self {
            tuning,
            chunk_size,
            viewport: Vec2::new(1280.0, 720.0),
            state: ControllerState::new(tuning.initial_camera_z),
            cursor: Cursor::Grab,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn tuning(&self) -> &ControllerTuning {
        &self.tuning
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// Chunk of the base position.
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from_world(self.state.base_position, self.chunk_size)
    }

    pub fn grid(&self) -> CameraGrid {
        CameraGrid {
            chunk: self.chunk(),
            cam_z: self.state.base_position.z,
        }
    }

    pub fn position(&self) -> Vec3 {
        let s = &self.state;
        Vec3::new(
            s.base_position.x + s.drift.x,
            s.base_position.y + s.drift.y,
            s.base_position.z,
        )
    }

    /// Applies one input event. Returns `false` for events the controller
    /// does not consume (keys, context and resize events are routed elsewhere).
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let t = self.tuning;
        let s = &mut self.state;
        match event {
            InputEvent::PointerDown { x, y } => {
                // Drift stays frozen at its current value while dragging.
                s.dragging = true;
                s.last_pointer_px = Vec2::new(*x, *y);
                self.cursor = Cursor::Grabbing;
            }
            InputEvent::PointerUp => {
                s.dragging = false;
                self.cursor = Cursor::Grab;
            }
            InputEvent::PointerLeave => {
                s.pointer = Vec2::ZERO;
                s.dragging = false;
                self.cursor = Cursor::Grab;
            }
            InputEvent::PointerMove { x, y } => {
                s.pointer = Vec2::new(
                    (x / self.viewport.x) * 2.0 - 1.0,
                    -(y / self.viewport.y) * 2.0 + 1.0,
                );
                if s.dragging {
                    s.target_velocity.x -= (x - s.last_pointer_px.x) * t.drag_sensitivity;
                    s.target_velocity.y += (y - s.last_pointer_px.y) * t.drag_sensitivity;
                    s.last_pointer_px = Vec2::new(*x, *y);
                }
            }
            InputEvent::Wheel { delta_y } => {
                s.scroll_accum += delta_y * t.scroll_scale;
            }
            InputEvent::TouchStart { touches } => {
                s.last_touches = touches.clone();
                s.last_touch_distance = touch_distance(touches);
                self.cursor = Cursor::Grabbing;
            }
            InputEvent::TouchMove { touches } => {
                match (touches.as_slice(), s.last_touches.first()) {
                    ([touch], Some(last)) => {
                        s.target_velocity.x -= (touch.x - last.x) * t.touch_sensitivity;
                        s.target_velocity.y += (touch.y - last.y) * t.touch_sensitivity;
                    }
                    ([_, _], _) if s.last_touch_distance > 0.0 => {
                        let dist = touch_distance(touches);
                        s.scroll_accum += (s.last_touch_distance - dist) * t.scroll_scale;
                        s.last_touch_distance = dist;
                    }
                    _ => {}
                }
                s.last_touches = touches.clone();
            }
            InputEvent::TouchEnd { touches } => {
                s.last_touches = touches.clone();
                s.last_touch_distance = touch_distance(touches);
                self.cursor = Cursor::Grab;
            }
            InputEvent::Resize { width, height } => {
                self.set_viewport(*width, *height);
            }
            _ => return false,
        }
        true
    }

    /// Advances one frame at canvas time `now` with `held` actions active.
    pub fn step(&mut self, now: Millis, held: &BTreeSet<Action>) -> CameraFrame {
        let t = self.tuning;
        let s = &mut self.state;

        if now.0 < t.intro_ms {
            s.target_velocity.z += (now.0 * t.intro_frequency).sin() * t.intro_amplitude;
        }

        for action in held {
            match action {
                Action::Forward => s.target_velocity.z -= t.keyboard_speed,
                Action::Backward => s.target_velocity.z += t.keyboard_speed,
                Action::Left => s.target_velocity.x -= t.keyboard_speed,
                Action::Right => s.target_velocity.x += t.keyboard_speed,
                Action::Down => s.target_velocity.y -= t.keyboard_speed,
                Action::Up => s.target_velocity.y += t.keyboard_speed,
            }
        }

        let zooming = s.velocity.z.abs() > t.zoom_threshold;
        let zoom_factor = clamp(s.base_position.z / 50.0, 0.3, 2.0);
        let drift_amount = t.drift_base * zoom_factor;
        let drift_lerp = if zooming {
            t.drift_lerp_zooming
        } else {
            t.drift_lerp
        };

        if s.dragging {
            // frozen
        } else if !t.drift_enabled {
            s.drift = s.drift.lerp(Vec2::ZERO, drift_lerp);
        } else {
            let goal = Vec2::new(s.pointer.x * drift_amount, s.pointer.y * drift_amount);
            s.drift = s.drift.lerp(goal, drift_lerp);
        }

        s.target_velocity.z += s.scroll_accum;
        s.scroll_accum *= t.scroll_decay;

        let max = t.max_velocity;
        s.target_velocity = s.target_velocity.map(|v| clamp(v, -max, max));

        s.velocity = Vec3::new(
            lerp(s.velocity.x, s.target_velocity.x, t.velocity_lerp),
            lerp(s.velocity.y, s.target_velocity.y, t.velocity_lerp),
            lerp(s.velocity.z, s.target_velocity.z, t.velocity_lerp),
        );
        s.base_position += s.velocity;
        s.target_velocity = s.target_velocity * t.velocity_decay;

        CameraFrame {
            position: self.position(),
            grid: self.grid(),
            zooming,
            z_speed: self.state.velocity.z.abs(),
        }
    }

    /// Back to the initial pose, keeping tuning and viewport.
    pub fn reset(&mut self) {
        self.state = ControllerState::new(self.tuning.initial_camera_z);
        self.cursor = Cursor::Grab;
    }
}
