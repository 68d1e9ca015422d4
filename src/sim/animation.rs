//! Integrator
//!
//! Advances every active object by one explicit Euler step, then mirrors the
//! result onto the visual meshes. Ball motion depends on which phase of the
//! chain reaction is running, looked up from a small rule table.

use glam::Vec3;

use super::controller::ControllerState;
use super::scene::Scene;
use super::state::{BallId, SimState};
use super::sync::{SyncReport, sync};
use crate::config::SimConfig;
use crate::error::SimError;

/// How a ball's velocity evolves during one phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRule {
    /// Constrained to a rail: velocity unchanged
    Rail,
    /// Accelerating down the ramp tangent
    Ramp,
    /// Rolling until `edge_x`, then free-falling under gravity
    GatedFall { edge_x: f32 },
}

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Step actually used (after clamping)
    pub dt: f32,
    pub sync: SyncReport,
}

#[derive(Debug, Clone)]
pub struct AnimationSystem {
    gravity: f32,
    /// Gravity projected onto the ramp tangent, precomputed
    ramp_acceleration: Vec3,
    max_dt: Option<f32>,
    wrap_pendulum: bool,
    table_edge_x: f32,
}

impl AnimationSystem {
    pub fn new(config: &SimConfig, state: &SimState) -> Result<Self, SimError> {
        let gravity = config.physics.gravity;
        Ok(Self {
            gravity,
            ramp_acceleration: state.ramp.along_slope_acceleration(gravity)?,
            max_dt: config.physics.max_dt,
            wrap_pendulum: config.physics.wrap_pendulum_angle,
            table_edge_x: config.table_edge_x,
        })
    }

    pub fn ramp_acceleration(&self) -> Vec3 {
        self.ramp_acceleration
    }

    /// Rule table: which motion applies to `ball` while the sequencer is in `phase`
    pub fn motion_rule(&self, ball: BallId, phase: ControllerState) -> MotionRule {
        match (ball, phase) {
            (BallId::Ball1, ControllerState::Ball1Falling) => MotionRule::Ramp,
            (BallId::Ball2, ControllerState::Ball2Rolling) => MotionRule::GatedFall {
                edge_x: self.table_edge_x,
            },
            _ => MotionRule::Rail,
        }
    }

    /// Reject unusable steps, clamp oversized ones
    pub fn sanitize_dt(&self, dt: f32) -> Result<f32, SimError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidTimeStep(dt));
        }
        match self.max_dt {
            Some(max_dt) if dt > max_dt => {
                log::debug!("Clamping frame step {:.4}s to {:.4}s", dt, max_dt);
                Ok(max_dt)
            }
            _ => Ok(dt),
        }
    }

    /// Advance all motion by `dt`, then sync meshes
    ///
    /// Motion is integrated into a copy of the store and committed only if every
    /// position and angle is still finite, so a rejected step leaves no trace.
    pub fn update(
        &self,
        dt: f32,
        store: &mut SimState,
        phase: ControllerState,
        scene: &mut Scene,
    ) -> Result<StepReport, SimError> {
        let dt = self.sanitize_dt(dt)?;

        let mut next = store.clone();
        self.integrate(dt, &mut next, phase);
        if !next.is_finite() {
            log::warn!("Rejecting {}s step: state would leave the finite range", dt);
            return Err(SimError::NonFiniteState(dt));
        }
        *store = next;

        Ok(StepReport {
            dt,
            sync: sync(store, scene),
        })
    }

    fn integrate(&self, dt: f32, store: &mut SimState, phase: ControllerState) {
        for id in BallId::ALL {
            let rule = self.motion_rule(id, phase);
            let ball = store.ball_mut(id);
            if !ball.active {
                continue;
            }
            match rule {
                MotionRule::Rail => {}
                MotionRule::Ramp => ball.velocity += self.ramp_acceleration * dt,
                MotionRule::GatedFall { edge_x } => {
                    if ball.position.x > edge_x {
                        ball.velocity.y -= self.gravity * dt;
                    }
                }
            }
            ball.advance(dt);
        }

        if store.pendulum.active {
            store.pendulum.swing(self.gravity, dt, self.wrap_pendulum);
        }

        for domino in store.dominoes.iter_mut() {
            domino.topple(dt);
        }
    }
}
