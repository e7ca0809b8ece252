//! Device-resolved canvas configuration.
//!
//! Capabilities are probed once by the host and captured in a
//! [`DeviceProfile`]; every tunable is then fixed for the lifetime of the
//! canvas. Hosts may tweak individual values through [`ConfigOverrides`].
use scene::fade::FadeParams;
use scene::layout::LayoutParams;
use scene::visibility::ThrottleConfig;
use serde::{Deserialize, Serialize};
use streaming::cache::CacheCapacity;
use streaming::texture::Sampling;

use crate::error::ConfigError;

/// Largest `render_distance + fade_margin` accepted; the active set holds
/// `(2r + 1)^3` chunks.
pub const MAX_CHUNK_RADIUS: u32 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Coarse pointer / touch screen: no hover, so no pointer-driven drift.
    pub touch: bool,
    /// Small GPU budget: shorter render distance and texture cache.
    pub mobile: bool,
    pub device_pixel_ratio: f64,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl DeviceProfile {
    pub fn desktop() -> Self {
        Self {
            touch: false,
            mobile: false,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn phone() -> Self {
        Self {
            touch: true,
            mobile: true,
            device_pixel_ratio: 3.0,
        }
    }

    /// Render pixel ratio: the device ratio capped by device class.
    pub fn pixel_ratio(&self) -> f64 {
        let cap = if self.touch { 1.0 } else { 1.5 };
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        dpr.min(cap)
    }
}

/// Camera integration constants. Velocities are world units per frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControllerTuning {
    pub max_velocity: f64,
    pub keyboard_speed: f64,
    pub velocity_lerp: f64,
    pub velocity_decay: f64,
    pub drag_sensitivity: f64,
    pub touch_sensitivity: f64,
    /// Scale applied to wheel delta and pinch distance change.
    pub scroll_scale: f64,
    pub scroll_decay: f64,
    pub drift_base: f64,
    pub drift_lerp: f64,
    pub drift_lerp_zooming: f64,
    /// `|velocity.z|` above which the camera counts as zooming.
    pub zoom_threshold: f64,
    pub initial_camera_z: f64,
    pub intro_ms: f64,
    pub intro_amplitude: f64,
    /// Radians per millisecond of the intro impulse.
    pub intro_frequency: f64,
    pub drift_enabled: bool,
}

impl ControllerTuning {
    pub fn for_device(device: &DeviceProfile) -> Self {
        Self {
            max_velocity: 3.2,
            keyboard_speed: 0.18,
            velocity_lerp: 0.16,
            velocity_decay: 0.9,
            drag_sensitivity: 0.025,
            touch_sensitivity: 0.02,
            scroll_scale: 0.006,
            scroll_decay: 0.8,
            drift_base: 8.0,
            drift_lerp: 0.12,
            drift_lerp_zooming: 0.2,
            zoom_threshold: 0.05,
            initial_camera_z: 50.0,
            intro_ms: 3000.0,
            intro_amplitude: 0.1,
            intro_frequency: 0.001,
            drift_enabled: !device.touch,
        }
    }
}

/// Settings the host renderer applies to its camera and scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    pub fog_near: f64,
    pub fog_far: f64,
    pub background: String,
    pub fog_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 1.0,
            far: 500.0,
            fog_near: 120.0,
            fog_far: 320.0,
            background: "#ffffff".to_string(),
            fog_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub device: DeviceProfile,
    pub pixel_ratio: f64,
    pub layout: LayoutParams,
    pub fade: FadeParams,
    pub throttle: ThrottleConfig,
    pub texture_capacity: usize,
    pub sampling: Sampling,
    pub controller: ControllerTuning,
    /// Work units available to deferred layout generation per frame.
    pub idle_budget_units: u32,
    /// A deferred layout task runs no later than this after scheduling.
    pub layout_deadline_ms: f64,
    pub splash_fallback_ms: f64,
    pub appearance: Appearance,
}

impl CanvasConfig {
    pub fn resolve(device: DeviceProfile) -> Self {
        let mobile = device.mobile;
        let fade = FadeParams {
            render_distance: if mobile { 1 } else { 2 },
            fade_margin: 1,
            depth_fade_start: if mobile { 100.0 } else { 140.0 },
            depth_fade_end: if mobile { 180.0 } else { 260.0 },
            ..FadeParams::default()
        };
        Self {
            device,
            pixel_ratio: device.pixel_ratio(),
            layout: LayoutParams::default(),
            fade,
            throttle: ThrottleConfig::default(),
            texture_capacity: if mobile { 24 } else { 64 },
            sampling: Sampling::for_device(mobile),
            controller: ControllerTuning::for_device(&device),
            idle_budget_units: if mobile { 4 } else { 8 },
            layout_deadline_ms: 100.0,
            splash_fallback_ms: 4000.0,
            appearance: Appearance::default(),
        }
    }

    pub fn cache_capacity(&self) -> CacheCapacity {
        CacheCapacity {
            max_entries: self.texture_capacity,
        }
    }

    /// Applies `overrides` on top of `self` and validates the result.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let o = overrides;
        if let Some(v) = o.chunk_size {
            self.layout.chunk_size = v;
        }
        if let Some(v) = o.planes_per_chunk {
            self.layout.planes_per_chunk = v;
        }
        if let Some(v) = o.min_plane_height {
            self.layout.min_height = v;
        }
        if let Some(v) = o.max_plane_height {
            self.layout.max_height = v;
        }
        if let Some(v) = o.layout_salt {
            self.layout.salt = v;
        }
        if let Some(v) = o.render_distance {
            self.fade.render_distance = v;
        }
        if let Some(v) = o.fade_margin {
            self.fade.fade_margin = v;
        }
        if let Some(v) = o.depth_fade_start {
            self.fade.depth_fade_start = v;
        }
        if let Some(v) = o.depth_fade_end {
            self.fade.depth_fade_end = v;
        }
        if let Some(v) = o.texture_capacity {
            self.texture_capacity = v;
        }
        if let Some(v) = o.max_velocity {
            self.controller.max_velocity = v;
        }
        if let Some(v) = o.keyboard_speed {
            self.controller.keyboard_speed = v;
        }
        if let Some(v) = o.velocity_lerp {
            self.controller.velocity_lerp = v;
        }
        if let Some(v) = o.velocity_decay {
            self.controller.velocity_decay = v;
        }
        if let Some(v) = o.drag_sensitivity {
            self.controller.drag_sensitivity = v;
        }
        if let Some(v) = o.touch_sensitivity {
            self.controller.touch_sensitivity = v;
        }
        if let Some(v) = o.initial_camera_z {
            self.controller.initial_camera_z = v;
        }
        if let Some(v) = o.throttle_idle_ms {
            self.throttle.idle_ms = v;
        }
        if let Some(v) = o.throttle_zoom_ms {
            self.throttle.zoom_ms = v;
        }
        if let Some(v) = o.throttle_fast_zoom_ms {
            self.throttle.fast_zoom_ms = v;
        }
        if let Some(v) = o.idle_budget_units {
            self.idle_budget_units = v;
        }
        if let Some(v) = o.layout_deadline_ms {
            self.layout_deadline_ms = v;
        }
        if let Some(v) = o.splash_fallback_ms {
            self.splash_fallback_ms = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("chunk_size", self.layout.chunk_size)?;
        positive("min_plane_height", self.layout.min_height)?;
        positive("max_velocity", self.controller.max_velocity)?;
        if self.layout.max_height < self.layout.min_height {
            return Err(invalid("max_plane_height", "must be >= min_plane_height"));
        }
        if self.layout.planes_per_chunk == 0 {
            return Err(invalid("planes_per_chunk", "must be at least 1"));
        }
        if self.texture_capacity == 0 {
            return Err(invalid("texture_capacity", "must be at least 1"));
        }
        match self.fade.render_distance.checked_add(self.fade.fade_margin) {
            Some(r) if r <= MAX_CHUNK_RADIUS => {}
            _ => {
                return Err(invalid(
                    "render_distance",
                    &format!("render_distance + fade_margin must be at most {MAX_CHUNK_RADIUS}"),
                ));
            }
        }
        if !(self.fade.depth_fade_start >= 0.0
            && self.fade.depth_fade_end.is_finite()
            && self.fade.depth_fade_end >= self.fade.depth_fade_start)
        {
            return Err(invalid(
                "depth_fade_end",
                "must be >= depth_fade_start >= 0",
            ));
        }
        for (field, v) in [
            ("keyboard_speed", self.controller.keyboard_speed),
            ("drag_sensitivity", self.controller.drag_sensitivity),
            ("touch_sensitivity", self.controller.touch_sensitivity),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(invalid(field, "must be a non-negative finite number"));
            }
        }
        if !self.controller.initial_camera_z.is_finite() {
            return Err(invalid("initial_camera_z", "must be finite"));
        }
        unit("velocity_lerp", self.controller.velocity_lerp)?;
        unit("velocity_decay", self.controller.velocity_decay)?;
        for (field, v) in [
            ("throttle_idle_ms", self.throttle.idle_ms),
            ("throttle_zoom_ms", self.throttle.zoom_ms),
            ("throttle_fast_zoom_ms", self.throttle.fast_zoom_ms),
            ("layout_deadline_ms", self.layout_deadline_ms),
            ("splash_fallback_ms", self.splash_fallback_ms),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(invalid(field, "must be a non-negative number of milliseconds"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn unit(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field, "must be within [0, 1]"))
    }
}

/// Optional per-field overrides, usually read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub chunk_size: Option<f64>,
    pub planes_per_chunk: Option<u32>,
    pub min_plane_height: Option<f64>,
    pub max_plane_height: Option<f64>,
    pub layout_salt: Option<u64>,
    pub render_distance: Option<u32>,
    pub fade_margin: Option<u32>,
    pub depth_fade_start: Option<f64>,
    pub depth_fade_end: Option<f64>,
    pub texture_capacity: Option<usize>,
    pub max_velocity: Option<f64>,
    pub keyboard_speed: Option<f64>,
    pub velocity_lerp: Option<f64>,
    pub velocity_decay: Option<f64>,
    pub drag_sensitivity: Option<f64>,
    pub touch_sensitivity: Option<f64>,
    pub initial_camera_z: Option<f64>,
    pub throttle_idle_ms: Option<f64>,
    pub throttle_zoom_ms: Option<f64>,
    pub throttle_fast_zoom_ms: Option<f64>,
    pub idle_budget_units: Option<u32>,
    pub layout_deadline_ms: Option<f64>,
    pub splash_fallback_ms: Option<f64>,
}

impl ConfigOverrides {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasConfig, ConfigOverrides, DeviceProfile};
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;
    use streaming::texture::Filter;

    #[test]
    fn desktop_and_mobile_defaults_differ() {
        let desktop = CanvasConfig::resolve(DeviceProfile::desktop());
        let phone = CanvasConfig::resolve(DeviceProfile::phone());

        assert_eq!(desktop.fade.render_distance, 2);
        assert_eq!(phone.fade.render_distance, 1);
        assert_eq!(desktop.texture_capacity, 64);
        assert_eq!(phone.texture_capacity, 24);
        assert_eq!(desktop.fade.depth_fade_end, 260.0);
        assert_eq!(phone.fade.depth_fade_start, 100.0);
        assert_eq!(desktop.sampling.min_filter, Filter::LinearMipmapLinear);
        assert_eq!(phone.sampling.anisotropy, 1);
        assert!(desktop.controller.drift_enabled);
        assert!(!phone.controller.drift_enabled);
    }

    #[test]
    fn pixel_ratio_is_capped_by_device_class() {
        let hidpi = DeviceProfile {
            device_pixel_ratio: 2.0,
            ..DeviceProfile::desktop()
        };
        assert_eq!(hidpi.pixel_ratio(), 1.5);
        assert_eq!(DeviceProfile::phone().pixel_ratio(), 1.0);
        let bogus = DeviceProfile {
            device_pixel_ratio: f64::NAN,
            ..DeviceProfile::desktop()
        };
        assert_eq!(bogus.pixel_ratio(), 1.0);
    }

    #[test]
    fn overrides_apply_and_validate() {
        let overrides =
            ConfigOverrides::from_json(r#"{"render_distance": 3, "texture_capacity": 8}"#)
                .expect("parse");
        let cfg = CanvasConfig::resolve(DeviceProfile::desktop())
            .with_overrides(&overrides)
            .expect("valid");
        assert_eq!(cfg.fade.render_distance, 3);
        assert_eq!(cfg.texture_capacity, 8);

        let bad = ConfigOverrides {
            texture_capacity: Some(0),
            ..ConfigOverrides::default()
        };
        let err = CanvasConfig::resolve(DeviceProfile::desktop())
            .with_overrides(&bad)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "texture_capacity", .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ConfigOverrides::from_json(r#"{"render_distanse": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn oversized_neighbourhood_is_rejected() {
        for (render_distance, fade_margin) in [(u32::MAX, 1), (1000, 0), (8, 1)] {
            let bad = ConfigOverrides {
                render_distance: Some(render_distance),
                fade_margin: Some(fade_margin),
                ..ConfigOverrides::default()
            };
            let err = CanvasConfig::resolve(DeviceProfile::desktop())
                .with_overrides(&bad)
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "render_distance", .. }));
        }

        let widest = ConfigOverrides {
            render_distance: Some(7),
            fade_margin: Some(1),
            ..ConfigOverrides::default()
        };
        assert!(CanvasConfig::resolve(DeviceProfile::desktop())
            .with_overrides(&widest)
            .is_ok());
    }

    #[test]
    fn non_finite_controller_knobs_are_rejected() {
        let cases = [
            (
                ConfigOverrides {
                    keyboard_speed: Some(f64::NAN),
                    ..ConfigOverrides::default()
                },
                "keyboard_speed",
            ),
            (
                ConfigOverrides {
                    drag_sensitivity: Some(f64::INFINITY),
                    ..ConfigOverrides::default()
                },
                "drag_sensitivity",
            ),
            (
                ConfigOverrides {
                    touch_sensitivity: Some(-0.5),
                    ..ConfigOverrides::default()
                },
                "touch_sensitivity",
            ),
            (
                ConfigOverrides {
                    initial_camera_z: Some(f64::NEG_INFINITY),
                    ..ConfigOverrides::default()
                },
                "initial_camera_z",
            ),
            (
                ConfigOverrides {
                    depth_fade_end: Some(f64::INFINITY),
                    ..ConfigOverrides::default()
                },
                "depth_fade_end",
            ),
        ];
        for (overrides, expected) in cases {
            match CanvasConfig::resolve(DeviceProfile::desktop()).with_overrides(&overrides) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: expected rejection, got {other:?}"),
            }
        }
    }

    #[test]
    fn inverted_depth_range_is_rejected() {
        let bad = ConfigOverrides {
            depth_fade_start: Some(300.0),
            ..ConfigOverrides::default()
        };
        let err = CanvasConfig::resolve(DeviceProfile::desktop())
            .with_overrides(&bad)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "depth_fade_end", .. }));
    }
}
