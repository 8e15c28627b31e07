//! Tuning knobs for the globe scene.
//!
//! Every numeric constant the shaders, eases and orbit controller use lives
//! here as a default. The host may override any subset with a JSON document;
//! missing fields keep their defaults.

use foundation::color::Rgb;
use runtime::animator::Easing;
use serde::{Deserialize, Serialize};

use crate::sections::SectionTints;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("unknown control setting `{0}`")]
    UnknownSetting(String),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Id of the element the canvas is appended to.
    pub container_id: String,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub globe: GlobeSettings,
    pub atmosphere: AtmosphereSettings,
    pub particles: ParticleSettings,
    pub camera: CameraSettings,
    pub orbit: OrbitConfig,
    pub interaction: InteractionConfig,
    pub shading: ShadingConfig,
    pub assets: AssetConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            container_id: "globe-container".to_string(),
            log_level: "info".to_string(),
            globe: GlobeSettings::default(),
            atmosphere: AtmosphereSettings::default(),
            particles: ParticleSettings::default(),
            camera: CameraSettings::default(),
            orbit: OrbitConfig::default(),
            interaction: InteractionConfig::default(),
            shading: ShadingConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Duration of the pointer/scroll rotation ease.
    pub rotation_ease_ms: f32,
    /// Duration of the day/night mix ease.
    pub mix_ease_ms: f32,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            radius: 5.0,
            width_segments: 64,
            height_segments: 64,
            rotation_ease_ms: 1500.0,
            mix_ease_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereSettings {
    /// Shell radius as a multiple of the globe radius.
    pub scale: f32,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self { scale: 1.05 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count: u32,
    /// Edge length of the cube the points are scattered in.
    pub extent: f32,
    pub seed: u64,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: 2000,
            extent: 60.0,
            seed: 0x5eed_0f57,
            min_scale: 0.2,
            max_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the origin along +Z.
    pub distance: f32,
    /// Upper bound on the device pixel ratio used for the backing store.
    pub max_pixel_ratio: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 1000.0,
            distance: 15.0,
            max_pixel_ratio: 2.0,
        }
    }
}

/// What a single-finger touch drag does.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneFingerGesture {
    #[default]
    Rotate,
    Pan,
}

/// What a two-finger touch gesture does besides pinching.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoFingerGesture {
    #[default]
    DollyPan,
    DollyRotate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enabled: bool,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub auto_rotate: bool,
    /// 1.0 = one full turn per minute.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// `[min, max]` azimuth in radians; `None` leaves the azimuth free.
    pub azimuth_limits: Option<[f32; 2]>,
    pub one_finger: OneFingerGesture,
    pub two_finger: TwoFingerGesture,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_rotate: true,
            enable_zoom: false,
            enable_pan: false,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            min_distance: 0.0,
            max_distance: 500.0,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            azimuth_limits: None,
            one_finger: OneFingerGesture::Rotate,
            two_finger: TwoFingerGesture::DollyPan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of bias per pixel of pointer offset from the viewport center.
    pub pointer_scale: f32,
    /// Globe pitch = -pointer_pitch * pitch_factor.
    pub pitch_factor: f32,
    /// Globe yaw = pointer_yaw * yaw_factor + scroll yaw.
    pub yaw_factor: f32,
    /// Extra yaw (radians) at full scroll depth.
    pub scroll_yaw: f32,
    /// Duration of the hover tint and rotation-speed eases.
    pub tint_ease_ms: f32,
    pub easing: Easing,
    /// Auto-rotate speed while any section is hovered.
    pub hover_rotate_speed: f32,
    pub tints: SectionTints,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pointer_scale: 0.001,
            pitch_factor: 0.5,
            yaw_factor: 0.5,
            scroll_yaw: 0.5,
            tint_ease_ms: 1000.0,
            easing: Easing::QuadOut,
            hover_rotate_speed: 0.15,
            tints: SectionTints::default(),
        }
    }
}

/// Constants baked into the shading programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub clear_color: Rgb,
    /// Edge scattering tint blended over the globe surface.
    pub globe_tint: Rgb,
    pub intensity_bias: f32,
    pub scatter_exponent: f32,
    pub scatter_weight: f32,
    pub rim_tint: Rgb,
    pub rim_bias: f32,
    pub rim_exponent: f32,
    /// Billboard half-size of a particle at scale 1, in world units.
    pub particle_size: f32,
    /// Peak drift offset of a particle, in world units.
    pub drift_amplitude: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            clear_color: Rgb::new(0.0, 0.0, 0.02),
            globe_tint: Rgb::new(0.3, 0.6, 1.0),
            intensity_bias: 1.05,
            scatter_exponent: 1.5,
            scatter_weight: 0.3,
            rim_tint: Rgb::new(0.3, 0.6, 1.0),
            rim_bias: 0.7,
            rim_exponent: 2.0,
            particle_size: 0.35,
            drift_amplitude: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub day_texture_url: String,
    pub night_texture_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            day_texture_url: "assets/earth-day.jpg".to_string(),
            night_texture_url: "assets/earth-night.jpg".to_string(),
        }
    }
}

impl GlobeConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GlobeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(invalid(field, format!("must be a positive number, got {v}")))
            }
        }
        fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(invalid(field, format!("must be finite and >= 0, got {v}")))
            }
        }

        if self.container_id.trim().is_empty() {
            return Err(invalid("container_id", "must not be empty"));
        }

        positive("globe.radius", self.globe.radius)?;
        if self.globe.width_segments < 3 || self.globe.height_segments < 2 {
            return Err(invalid(
                "globe.segments",
                "need at least 3 width and 2 height segments",
            ));
        }
        // u16 indices.
        let verts = (self.globe.width_segments as u64 + 1) * (self.globe.height_segments as u64 + 1);
        if verts > u16::MAX as u64 {
            return Err(invalid("globe.segments", format!("{verts} vertices overflow u16 indices")));
        }
        non_negative("globe.rotation_ease_ms", self.globe.rotation_ease_ms)?;
        non_negative("globe.mix_ease_ms", self.globe.mix_ease_ms)?;

        if !(self.atmosphere.scale.is_finite() && self.atmosphere.scale >= 1.0) {
            return Err(invalid("atmosphere.scale", "must be >= 1.0"));
        }

        if self.particles.count == 0 {
            return Err(invalid("particles.count", "must be > 0"));
        }
        positive("particles.extent", self.particles.extent)?;
        non_negative("particles.min_scale", self.particles.min_scale)?;
        if !(self.particles.max_scale > self.particles.min_scale) {
            return Err(invalid("particles.max_scale", "must exceed min_scale"));
        }

        positive("camera.fov_y_deg", self.camera.fov_y_deg)?;
        positive("camera.near", self.camera.near)?;
        if !(self.camera.far > self.camera.near) {
            return Err(invalid("camera.far", "must exceed camera.near"));
        }
        positive("camera.distance", self.camera.distance)?;
        if !(self.camera.max_pixel_ratio.is_finite() && self.camera.max_pixel_ratio >= 1.0) {
            return Err(invalid("camera.max_pixel_ratio", "must be >= 1.0"));
        }

        let o = &self.orbit;
        if !(o.damping_factor > 0.0 && o.damping_factor <= 1.0) {
            return Err(invalid("orbit.damping_factor", "must be in (0, 1]"));
        }
        non_negative("orbit.min_distance", o.min_distance)?;
        if !(o.max_distance >= o.min_distance) {
            return Err(invalid("orbit.max_distance", "must be >= min_distance"));
        }
        if !(o.min_polar_angle >= 0.0
            && o.max_polar_angle <= std::f32::consts::PI
            && o.min_polar_angle <= o.max_polar_angle)
        {
            return Err(invalid("orbit.polar_angle", "must satisfy 0 <= min <= max <= PI"));
        }
        if let Some([min, max]) = o.azimuth_limits {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(invalid("orbit.azimuth_limits", "must be finite with min <= max"));
            }
        }
        if !o.auto_rotate_speed.is_finite() {
            return Err(invalid("orbit.auto_rotate_speed", "must be finite"));
        }

        let i = &self.interaction;
        if !(i.pointer_scale.is_finite() && i.scroll_yaw.is_finite()) {
            return Err(invalid("interaction", "scales must be finite"));
        }
        non_negative("interaction.tint_ease_ms", i.tint_ease_ms)?;
        if !i.hover_rotate_speed.is_finite() {
            return Err(invalid("interaction.hover_rotate_speed", "must be finite"));
        }
        for (name, tint) in i.tints.iter() {
            if !tint.is_normalized() {
                return Err(invalid(
                    "interaction.tints",
                    format!("`{name}` has components outside [0, 1]"),
                ));
            }
        }

        let s = &self.shading;
        for tint in [s.clear_color, s.globe_tint, s.rim_tint] {
            if !tint.is_normalized() {
                return Err(invalid("shading", "colors must have components in [0, 1]"));
            }
        }
        positive("shading.particle_size", s.particle_size)?;
        Ok(())
    }
}

impl OrbitConfig {
    /// Update a single orbit knob by key, clamping to a sane range.
    pub fn apply_setting(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(invalid("orbit", format!("`{key}` must be finite")));
        }
        let v = value as f32;
        match key {
            "auto_rotate_speed" => self.auto_rotate_speed = v.clamp(-10.0, 10.0),
            "damping_factor" => self.damping_factor = v.clamp(0.01, 1.0),
            "rotate_speed" => self.rotate_speed = v.clamp(0.1, 5.0),
            "enable_rotate" => self.enable_rotate = value > 0.5,
            "enable_damping" => self.enable_damping = value > 0.5,
            "auto_rotate" => self.auto_rotate = value > 0.5,
            _ => return Err(ConfigError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GlobeConfig, OrbitConfig};
    use foundation::color::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_stable() {
        let cfg = GlobeConfig::default();
        assert_eq!(cfg.globe.radius, 5.0);
        assert_eq!(cfg.atmosphere.scale, 1.05);
        assert_eq!(cfg.particles.count, 2000);
        assert_eq!(cfg.orbit.damping_factor, 0.05);
        assert!(cfg.orbit.auto_rotate);
        assert!(!cfg.orbit.enable_zoom);
        assert!(!cfg.orbit.enable_pan);
        assert_eq!(cfg.shading.intensity_bias, 1.05);
        assert_eq!(cfg.shading.scatter_weight, 0.3);
        assert_eq!(cfg.interaction.tint_ease_ms, 1000.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = GlobeConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GlobeConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = GlobeConfig::from_json(
            r#"{
                "container_id": "bg",
                "orbit": { "auto_rotate_speed": 2.0 },
                "interaction": { "tints": { "projects": [0.1, 0.2, 0.3] } }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.container_id, "bg");
        assert_eq!(cfg.orbit.auto_rotate_speed, 2.0);
        assert_eq!(cfg.orbit.damping_factor, 0.05);
        assert_eq!(cfg.interaction.tints.projects, Rgb::new(0.1, 0.2, 0.3));
        assert_eq!(cfg.interaction.tints.about, Rgb::new(0.40, 0.70, 1.00));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = GlobeConfig::from_json(r#"{ "particles": { "count": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "particles.count", .. }));

        let err = GlobeConfig::from_json(r#"{ "orbit": { "damping_factor": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "orbit.damping_factor", .. }));

        let err = GlobeConfig::from_json(r#"{ "interaction": { "tints": { "skills": [2.0, 0.0, 0.0] } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "interaction.tints", .. }));

        let err = GlobeConfig::from_json(r#"{ "globe": { "width_segments": 400, "height_segments": 400 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "globe.segments", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(GlobeConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut cfg = GlobeConfig::default();
        cfg.log_level = "debug".into();
        assert_eq!(cfg.log_level(), log::Level::Debug);
        cfg.log_level = "loud".into();
        assert_eq!(cfg.log_level(), log::Level::Info);
    }

    #[test]
    fn apply_setting_clamps_and_rejects_unknown_keys() {
        let mut orbit = OrbitConfig::default();
        orbit.apply_setting("damping_factor", 7.0).unwrap();
        assert_eq!(orbit.damping_factor, 1.0);
        orbit.apply_setting("auto_rotate", 0.0).unwrap();
        assert!(!orbit.auto_rotate);
        assert!(matches!(
            orbit.apply_setting("enable_zoom", 1.0),
            Err(ConfigError::UnknownSetting(_))
        ));
        assert!(orbit.apply_setting("rotate_speed", f64::NAN).is_err());
    }
}
