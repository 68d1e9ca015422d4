//! Scene layout and physics tuning
//!
//! Loaded from JSON (browser facade passes a string, the native runner reads a
//! file). Every section falls back to defaults that complete the whole chain
//! reaction at 60 Hz.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Shading model of one visual representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShadingMode {
    #[default]
    Phong,
    Gouraud,
    BlinnPhong,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 3] = [
        ShadingMode::Phong,
        ShadingMode::Gouraud,
        ShadingMode::BlinnPhong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShadingMode::Phong => "Phong",
            ShadingMode::Gouraud => "Gouraud",
            ShadingMode::BlinnPhong => "Blinn-Phong",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "phong" => Some(ShadingMode::Phong),
            "gouraud" => Some(ShadingMode::Gouraud),
            "blinn-phong" | "blinnphong" | "blinn" => Some(ShadingMode::BlinnPhong),
            _ => None,
        }
    }
}

/// Integrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f32,
    /// Clamp for the frame step; `None` feeds the raw step to the integrator
    pub max_dt: Option<f32>,
    /// Wrap the pendulum angle into [-π, π) after each step
    pub wrap_pendulum_angle: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_dt: Some(MAX_DT),
            wrap_pendulum_angle: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub pivot: Vec3,
    pub length: f32,
    /// Angle the pendulum is released from on reset (radians, about +Z)
    pub start_angle: f32,
    pub bob_half_extent: f32,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            pivot: Vec3::new(-4.0, 3.0, 0.0),
            length: PENDULUM_LENGTH,
            start_angle: PENDULUM_START_ANGLE,
            bob_half_extent: PENDULUM_BOB_HALF_EXTENT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Rest position (the visual anchor the ball is placed on)
    pub anchor: Vec3,
    pub radius: f32,
    /// Velocity given when the sequencer releases the ball
    pub kick_velocity: Vec3,
}

impl BallConfig {
    fn ball1() -> Self {
        Self {
            anchor: Vec3::new(-3.5, 0.5, 0.0),
            radius: BALL_RADIUS,
            kick_velocity: Vec3::new(BALL1_KICK_SPEED, 0.0, 0.0),
        }
    }

    fn ball2() -> Self {
        Self {
            anchor: Vec3::new(5.6, -0.7, 0.0),
            radius: BALL_RADIUS,
            kick_velocity: Vec3::new(BALL2_KICK_SPEED, 0.0, 0.0),
        }
    }
}

impl Default for BallConfig {
    fn default() -> Self {
        Self::ball1()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Incline (radians); the ramp descends toward +X
    pub incline: f32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.5, 0.0, 0.0),
            half_extents: Vec3::new(1.6, 0.05, 0.5),
            incline: RAMP_INCLINE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DominoConfig {
    pub count: usize,
    /// Base (pivot) of the first domino
    pub first_base: Vec3,
    pub spacing: f32,
    pub half_width: f32,
    pub height: f32,
    pub half_depth: f32,
    /// Angular velocity the first domino receives from ball1
    pub kick_angular_velocity: f32,
    /// Rest angle of every domino but the last
    pub interior_target: f32,
    /// Rest angle of the last domino
    pub last_target: f32,
    pub propagation_threshold: f32,
    pub ball2_threshold: f32,
}

impl Default for DominoConfig {
    fn default() -> Self {
        Self {
            count: DOMINO_COUNT,
            first_base: Vec3::new(2.0, -1.0, 0.0),
            spacing: DOMINO_SPACING,
            half_width: 0.1,
            height: DOMINO_HEIGHT,
            half_depth: 0.3,
            kick_angular_velocity: DOMINO_KICK_ANGULAR_VELOCITY,
            interior_target: DOMINO_INTERIOR_TARGET,
            last_target: DOMINO_LAST_TARGET,
            propagation_threshold: DOMINO_PROPAGATION_THRESHOLD,
            ball2_threshold: DOMINO_BALL2_THRESHOLD,
        }
    }
}

impl DominoConfig {
    /// Per-index rest angles
    pub fn settle_targets(&self) -> Vec<f32> {
        (0..self.count)
            .map(|i| {
                if i + 1 == self.count {
                    self.last_target
                } else {
                    self.interior_target
                }
            })
            .collect()
    }

    /// Base position of domino `index`
    pub fn base(&self, index: usize) -> Vec3 {
        self.first_base + Vec3::X * self.spacing * index as f32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// One mesh set is mirrored per listed mode
    pub modes: Vec<ShadingMode>,
    /// Mode whose meshes provide world bounds for collision tests
    pub collision_mode: ShadingMode,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            modes: ShadingMode::ALL.to_vec(),
            collision_mode: ShadingMode::Phong,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub pendulum: PendulumConfig,
    pub ball1: BallConfig,
    pub ball2: BallConfig,
    /// Ball2 starts falling once its x passes this edge
    pub table_edge_x: f32,
    pub ramp: RampConfig,
    pub dominoes: DominoConfig,
    pub shading: ShadingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            pendulum: PendulumConfig::default(),
            ball1: BallConfig::ball1(),
            ball2: BallConfig::ball2(),
            table_edge_x: 7.0,
            ramp: RampConfig::default(),
            dominoes: DominoConfig::default(),
            shading: ShadingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject layouts the integrator cannot run
    pub fn validate(&self) -> Result<(), SimError> {
        let p = &self.physics;
        if !p.gravity.is_finite() || p.gravity < 0.0 {
            return Err(SimError::InvalidConfig("gravity must be finite and non-negative"));
        }
        if p.max_dt.is_some_and(|dt| !(dt.is_finite() && dt > 0.0)) {
            return Err(SimError::InvalidConfig("max_dt must be finite and positive"));
        }
        if !(self.pendulum.length.is_finite() && self.pendulum.length > 0.0) {
            return Err(SimError::InvalidConfig("pendulum length must be positive"));
        }
        if !self.pendulum.start_angle.is_finite() || !self.pendulum.pivot.is_finite() {
            return Err(SimError::InvalidConfig("pendulum pivot and start angle must be finite"));
        }
        if !(self.pendulum.bob_half_extent.is_finite() && self.pendulum.bob_half_extent > 0.0) {
            return Err(SimError::InvalidConfig("pendulum bob half extent must be positive"));
        }
        for ball in [&self.ball1, &self.ball2] {
            if !(ball.radius.is_finite() && ball.radius > 0.0) {
                return Err(SimError::InvalidConfig("ball radius must be positive"));
            }
            if !ball.anchor.is_finite() || !ball.kick_velocity.is_finite() {
                return Err(SimError::InvalidConfig("ball anchor and kick must be finite"));
            }
        }
        if !self.table_edge_x.is_finite() {
            return Err(SimError::InvalidConfig("table edge must be finite"));
        }
        let r = &self.ramp;
        if !r.half_extents.is_finite() || r.half_extents.min_element() <= 0.0 {
            return Err(SimError::InvalidConfig("ramp extents must be positive"));
        }
        if !r.center.is_finite() || !r.incline.is_finite() {
            return Err(SimError::InvalidConfig("ramp center and incline must be finite"));
        }
        let d = &self.dominoes;
        if d.count == 0 {
            return Err(SimError::InvalidConfig("at least one domino is required"));
        }
        if !d.first_base.is_finite() || !(d.spacing.is_finite() && d.spacing > 0.0) {
            return Err(SimError::InvalidConfig("domino base must be finite, spacing positive"));
        }
        let dims = [d.half_width, d.height, d.half_depth];
        if !dims.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(SimError::InvalidConfig("domino dimensions must be positive"));
        }
        if d.kick_angular_velocity >= 0.0 || !d.kick_angular_velocity.is_finite() {
            return Err(SimError::InvalidConfig(
                "domino kick must be a finite negative angular velocity",
            ));
        }
        if !(d.interior_target < 0.0 && d.last_target < 0.0) {
            return Err(SimError::InvalidConfig("domino rest angles must be negative"));
        }
        // Interior dominoes must tip past the threshold before they come to rest
        if !(d.propagation_threshold > 0.0 && d.propagation_threshold < -d.interior_target) {
            return Err(SimError::InvalidConfig(
                "propagation threshold must lie between 0 and the interior rest angle",
            ));
        }
        // The last domino must pass the release angle on its way down
        if !(d.ball2_threshold < 0.0 && d.ball2_threshold > d.last_target) {
            return Err(SimError::InvalidConfig(
                "ball2 threshold must lie between 0 and the last rest angle",
            ));
        }
        if self.shading.modes.is_empty() {
            return Err(SimError::InvalidConfig("at least one shading mode is required"));
        }
        if !self.shading.modes.contains(&self.shading.collision_mode) {
            return Err(SimError::InvalidConfig("collision mode must be one of the mirrored modes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json(r#"{ "physics": { "gravity": 3.7 } }"#).unwrap();
        assert_eq!(config.physics.gravity, 3.7);
        assert_eq!(config.physics.max_dt, Some(MAX_DT));
        assert_eq!(config.dominoes.count, DOMINO_COUNT);
        assert_eq!(config.ball2.anchor, BallConfig::ball2().anchor);
    }

    #[test]
    fn test_json_round_trip_preserves_layout() {
        let config = SimConfig::default();
        let parsed = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.pendulum.pivot, config.pendulum.pivot);
        assert_eq!(parsed.shading.modes, config.shading.modes);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(SimConfig::from_json("{ nope"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = SimConfig::default();
        config.pendulum.length = 0.0;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.dominoes.kick_angular_velocity = 1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.shading.modes = vec![ShadingMode::Gouraud];
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.physics.max_dt = Some(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unfinishable_chains() {
        let mut config = SimConfig::default();
        config.dominoes.ball2_threshold = config.dominoes.last_target;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.dominoes.propagation_threshold = -config.dominoes.interior_target;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.pendulum.bob_half_extent = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.dominoes.height = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_finite_layout() {
        let mut config = SimConfig::default();
        config.table_edge_x = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.dominoes.spacing = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.pendulum.pivot.x = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.ramp.center.y = f32::NEG_INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settle_targets_differ_only_for_last() {
        let targets = DominoConfig::default().settle_targets();
        assert_eq!(targets.len(), DOMINO_COUNT);
        assert!(targets[..DOMINO_COUNT - 1].iter().all(|&t| t == DOMINO_INTERIOR_TARGET));
        assert_eq!(targets[DOMINO_COUNT - 1], DOMINO_LAST_TARGET);
    }

    #[test]
    fn test_shading_mode_names() {
        for mode in ShadingMode::ALL {
            assert_eq!(ShadingMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(ShadingMode::from_name("toon"), None);
    }
}
