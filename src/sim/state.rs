//! Kinematic object store
//!
//! Logical state of every simulated entity, independent of how (or how many
//! times) it is drawn. Objects are addressed by stable ids so collision events
//! never hold live references into the store.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{BallConfig, SimConfig};
use crate::error::SimError;
use crate::{normalize_angle, pendulum_offset};

/// Stable handle for one of the two balls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallId {
    /// Struck by the pendulum, rolls onto the ramp, knocks the first domino
    Ball1,
    /// Released by the last domino
    Ball2,
}

impl BallId {
    pub const ALL: [BallId; 2] = [BallId::Ball1, BallId::Ball2];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            BallId::Ball1 => 0,
            BallId::Ball2 => 1,
        }
    }
}

/// Stable handle for a domino (its index in the chain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DominoId(pub usize);

impl DominoId {
    pub const FIRST: DominoId = DominoId(0);

    pub fn next(self) -> DominoId {
        DominoId(self.0 + 1)
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// Inactive balls are frozen in place
    pub active: bool,
    /// Rest position restored on reset
    pub anchor: Vec3,
}

impl Ball {
    pub fn from_config(config: &BallConfig) -> Self {
        Self {
            position: config.anchor,
            velocity: Vec3::ZERO,
            radius: config.radius,
            active: false,
            anchor: config.anchor,
        }
    }

    /// Explicit Euler position update
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Put the ball back on its anchor, inactive and at rest
    pub fn rest(&mut self) {
        self.position = self.anchor;
        self.velocity = Vec3::ZERO;
        self.active = false;
    }
}

/// Planar pendulum swinging about +Z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub pivot: Vec3,
    /// Radians; 0 hangs straight down, negative swings toward -X
    pub angle: f32,
    pub angular_velocity: f32,
    pub length: f32,
    pub active: bool,
    /// Release angle used on reset
    pub start_angle: f32,
}

impl Pendulum {
    /// One explicit Euler step of θ'' = -(g/L)·sin θ
    pub fn swing(&mut self, gravity: f32, dt: f32, wrap: bool) {
        let accel = -(gravity / self.length) * self.angle.sin();
        self.angular_velocity += accel * dt;
        self.angle += self.angular_velocity * dt;
        if wrap {
            self.angle = normalize_angle(self.angle);
        }
    }

    /// World position of the bob
    pub fn bob_position(&self) -> Vec3 {
        self.pivot + pendulum_offset(self.length, self.angle)
    }

    /// Hold at the start angle, active and at rest
    pub fn release(&mut self) {
        self.angle = self.start_angle;
        self.angular_velocity = 0.0;
        self.active = true;
    }
}

/// A domino pivoting about its base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domino {
    /// Pivot point at the bottom edge
    pub base: Vec3,
    /// Radians about +Z; falling dominoes rotate negative (toward +X)
    pub angle: f32,
    pub angular_velocity: f32,
    pub fallen: bool,
    /// Rest angle once fallen (from the per-index target table)
    pub target: f32,
}

impl Domino {
    /// Integrate a fallen domino toward its rest angle, clamping exactly on arrival
    pub fn topple(&mut self, dt: f32) {
        if !self.fallen || self.angular_velocity == 0.0 {
            return;
        }
        self.angle += self.angular_velocity * dt;
        let remaining = (self.target - self.angle) * self.angular_velocity.signum();
        if remaining <= 0.0 {
            self.angle = self.target;
            self.angular_velocity = 0.0;
        }
    }

    /// Fallen and resting on its target
    pub fn is_settled(&self) -> bool {
        self.fallen && self.angular_velocity == 0.0 && self.angle == self.target
    }

    /// Stand the domino back up
    pub fn stand(&mut self) {
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.fallen = false;
    }
}

/// Static ramp reference (collision target and slope direction)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub incline: f32,
    /// Unit down-slope direction (descends toward +X)
    pub tangent: Vec3,
}

impl Ramp {
    pub fn new(incline: f32) -> Result<Self, SimError> {
        let tangent = Vec3::new(incline.cos(), -incline.sin(), 0.0)
            .try_normalize()
            .ok_or(SimError::NonFiniteDirection("ramp tangent"))?;
        Ok(Self { incline, tangent })
    }

    /// Gravity component along the slope: tangent · g·sin(θ)
    pub fn along_slope_acceleration(&self, gravity: f32) -> Result<Vec3, SimError> {
        let accel = self.tangent * gravity * self.incline.sin();
        if accel.is_finite() {
            Ok(accel)
        } else {
            Err(SimError::NonFiniteDirection("ramp acceleration"))
        }
    }
}

/// Every simulated object, owned by the frame pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub balls: [Ball; 2],
    pub pendulum: Pendulum,
    /// Ordered along the chain (index = `DominoId`)
    pub dominoes: Vec<Domino>,
    pub ramp: Ramp,
}

impl SimState {
    /// Build the store in its initial conditions
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let dominoes = config
            .dominoes
            .settle_targets()
            .into_iter()
            .enumerate()
            .map(|(i, target)| Domino {
                base: config.dominoes.base(i),
                angle: 0.0,
                angular_velocity: 0.0,
                fallen: false,
                target,
            })
            .collect();

        Ok(Self {
            balls: [
                Ball::from_config(&config.ball1),
                Ball::from_config(&config.ball2),
            ],
            pendulum: Pendulum {
                pivot: config.pendulum.pivot,
                angle: config.pendulum.start_angle,
                angular_velocity: 0.0,
                length: config.pendulum.length,
                active: true,
                start_angle: config.pendulum.start_angle,
            },
            dominoes,
            ramp: Ramp::new(config.ramp.incline)?,
        })
    }

    #[inline]
    pub fn ball(&self, id: BallId) -> &Ball {
        &self.balls[id.index()]
    }

    #[inline]
    pub fn ball_mut(&mut self, id: BallId) -> &mut Ball {
        &mut self.balls[id.index()]
    }

    pub fn domino(&self, id: DominoId) -> Option<&Domino> {
        self.dominoes.get(id.0)
    }

    pub fn domino_mut(&mut self, id: DominoId) -> Option<&mut Domino> {
        self.dominoes.get_mut(id.0)
    }

    /// Id of the final domino in the chain
    pub fn last_domino(&self) -> Option<DominoId> {
        self.dominoes.len().checked_sub(1).map(DominoId)
    }

    /// Every position and angle is finite
    pub fn is_finite(&self) -> bool {
        self.balls
            .iter()
            .all(|b| b.position.is_finite() && b.velocity.is_finite())
            && self.pendulum.angle.is_finite()
            && self.pendulum.angular_velocity.is_finite()
            && self
                .dominoes
                .iter()
                .all(|d| d.angle.is_finite() && d.angular_velocity.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_initial_conditions() {
        let config = SimConfig::default();
        let state = SimState::new(&config).unwrap();

        assert!(state.balls.iter().all(|b| !b.active && b.velocity == Vec3::ZERO));
        assert_eq!(state.ball(BallId::Ball1).position, config.ball1.anchor);
        assert!(state.pendulum.active);
        assert_eq!(state.pendulum.angle, PENDULUM_START_ANGLE);
        assert_eq!(state.dominoes.len(), DOMINO_COUNT);
        assert!(state.dominoes.iter().all(|d| !d.fallen && d.angle == 0.0));
        assert_eq!(state.last_domino(), Some(DominoId(DOMINO_COUNT - 1)));
    }

    #[test]
    fn test_ball_advance_is_explicit_euler() {
        let mut ball = Ball::from_config(&BallConfig::default());
        ball.velocity = Vec3::new(2.0, -1.0, 0.0);
        let start = ball.position;
        ball.advance(0.5);
        assert_eq!(ball.position, start + Vec3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn test_pendulum_accelerates_toward_rest() {
        let mut pendulum = SimState::new(&SimConfig::default()).unwrap().pendulum;
        pendulum.angle = -0.5;
        pendulum.swing(GRAVITY, FRAME_DT, false);
        assert!(pendulum.angular_velocity > 0.0);
        assert!(pendulum.angle > -0.5);
    }

    #[test]
    fn test_pendulum_wrap_keeps_angle_in_range() {
        let mut pendulum = SimState::new(&SimConfig::default()).unwrap().pendulum;
        pendulum.angle = 3.1;
        pendulum.angular_velocity = 10.0;
        pendulum.swing(GRAVITY, 0.1, true);
        assert!(pendulum.angle >= -std::f32::consts::PI && pendulum.angle < std::f32::consts::PI);
    }

    #[test]
    fn test_domino_clamps_on_target() {
        let mut domino = Domino {
            base: Vec3::ZERO,
            angle: -1.0,
            angular_velocity: -1.5,
            fallen: true,
            target: -1.04,
        };
        domino.topple(0.1);
        assert_eq!(domino.angle, -1.04);
        assert_eq!(domino.angular_velocity, 0.0);
        assert!(domino.is_settled());
    }

    #[test]
    fn test_standing_domino_does_not_move() {
        let mut domino = Domino {
            base: Vec3::ZERO,
            angle: 0.0,
            angular_velocity: -1.5,
            fallen: false,
            target: -1.0,
        };
        domino.topple(0.1);
        assert_eq!(domino.angle, 0.0);
    }

    #[test]
    fn test_ramp_tangent_descends() {
        let ramp = Ramp::new(RAMP_INCLINE).unwrap();
        assert!((ramp.tangent.length() - 1.0).abs() < 1e-6);
        assert!(ramp.tangent.x > 0.0 && ramp.tangent.y < 0.0);

        let accel = ramp.along_slope_acceleration(GRAVITY).unwrap();
        assert!((accel.length() - GRAVITY * RAMP_INCLINE.sin()).abs() < 1e-4);
    }

    #[test]
    fn test_ramp_rejects_non_finite_incline() {
        assert!(matches!(
            Ramp::new(f32::NAN),
            Err(SimError::NonFiniteDirection(_))
        ));
    }
}
