//! Chain Reaction - a Rube-Goldberg physics toy
//!
//! Core modules:
//! - `sim`: Deterministic frame pipeline (integrator, collisions, sequencer)
//! - `config`: Data-driven scene layout and physics tuning
//! - `error`: Simulation error type
//! - `web`: Browser facade for the external renderer (wasm32 only)

pub mod config;
pub mod error;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ShadingMode, SimConfig};
pub use error::SimError;

use glam::Vec3;

/// Scene configuration constants (defaults for `SimConfig`)
pub mod consts {
    /// Nominal frame step (60 Hz presentation refresh)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest step fed to the integrator unless configured otherwise
    pub const MAX_DT: f32 = 0.1;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.81;

    /// Pendulum defaults - bob hangs `PENDULUM_LENGTH` below the pivot
    pub const PENDULUM_LENGTH: f32 = 2.5;
    pub const PENDULUM_START_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;
    pub const PENDULUM_BOB_HALF_EXTENT: f32 = 0.3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.3;
    pub const BALL1_KICK_SPEED: f32 = 2.0;
    pub const BALL2_KICK_SPEED: f32 = 2.0;

    /// Ramp incline (radians, ~20 degrees)
    pub const RAMP_INCLINE: f32 = 0.349_066;

    /// Domino defaults
    pub const DOMINO_COUNT: usize = 5;
    pub const DOMINO_SPACING: f32 = 0.6;
    pub const DOMINO_HEIGHT: f32 = 1.0;
    pub const DOMINO_KICK_ANGULAR_VELOCITY: f32 = -1.5;
    /// Interior dominoes come to rest leaning on their neighbour
    pub const DOMINO_INTERIOR_TARGET: f32 = -std::f32::consts::FRAC_PI_3;
    /// The last domino falls flat
    pub const DOMINO_LAST_TARGET: f32 = -std::f32::consts::FRAC_PI_2;
    /// |angle| past which a falling domino knocks over its neighbour
    pub const DOMINO_PROPAGATION_THRESHOLD: f32 = 0.35;
    /// Angle below which the last domino releases ball2
    pub const DOMINO_BALL2_THRESHOLD: f32 = -1.2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Offset of a point hanging `length` below a pivot rotated by `angle` about +Z
#[inline]
pub fn pendulum_offset(length: f32, angle: f32) -> Vec3 {
    Vec3::new(length * angle.sin(), -length * angle.cos(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps_into_range() {
        assert!((normalize_angle(2.5 * PI) - (0.5 * PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.5 * PI) - (0.5 * PI)).abs() < 1e-5);
        assert_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_pendulum_offset_hangs_straight_down_at_rest() {
        let offset = pendulum_offset(2.0, 0.0);
        assert!(offset.x.abs() < 1e-6);
        assert!((offset.y + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pendulum_offset_swings_left_for_negative_angle() {
        let offset = pendulum_offset(2.0, -PI / 2.0);
        assert!((offset.x + 2.0).abs() < 1e-5);
        assert!(offset.y.abs() < 1e-5);
    }
}
