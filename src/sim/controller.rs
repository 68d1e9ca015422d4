//! Chain reaction sequencer
//!
//! A finite state machine driven by collision events. Each event is gated on
//! one exact state; events that arrive in any other state are dropped without
//! touching the store. That gate is the only thing that stops a pair of
//! volumes overlapping for several frames from re-triggering a transition.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::state::SimState;
use crate::config::SimConfig;

/// Phase of the chain reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControllerState {
    /// Pendulum released, waiting for it to strike ball1
    #[default]
    PendulumSwinging,
    /// Ball1 rolling along the rail toward the ramp
    Ball1Rolling,
    /// Ball1 accelerating down the ramp
    Ball1Falling,
    /// Domino chain toppling
    DominosFalling,
    /// Ball2 released by the last domino
    Ball2Rolling,
    /// Reserved; no transition leads here yet
    Done,
}

/// Result of offering one event to the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The guard matched and the action ran (`from` may equal `to`)
    Applied {
        from: ControllerState,
        to: ControllerState,
    },
    /// Guard mismatch or nothing left to do; the store is untouched
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

/// The Rube-Goldberg machine controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RgmController {
    state: ControllerState,
    ball1_kick: Vec3,
    ball2_kick: Vec3,
    domino_kick: f32,
}

impl RgmController {
    /// Create the controller and put the store into its initial conditions
    pub fn new(config: &SimConfig, store: &mut SimState) -> Self {
        let mut controller = Self {
            state: ControllerState::default(),
            ball1_kick: config.ball1.kick_velocity,
            ball2_kick: config.ball2.kick_velocity,
            domino_kick: config.dominoes.kick_angular_velocity,
        };
        controller.reset(store);
        controller
    }

    #[inline]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Re-arm the machine: everything at rest, pendulum held at its start angle
    pub fn reset(&mut self, store: &mut SimState) {
        for ball in store.balls.iter_mut() {
            ball.rest();
        }
        for domino in store.dominoes.iter_mut() {
            domino.stand();
        }
        store.pendulum.release();
        self.state = ControllerState::PendulumSwinging;
        log::info!("Sequencer reset to {:?}", self.state);
    }

    /// Apply this frame's events in order
    pub fn update(&mut self, events: &[CollisionEvent], store: &mut SimState) -> Vec<Transition> {
        events.iter().map(|event| self.handle(event, store)).collect()
    }

    /// Offer one event; runs its action only if the state guard matches
    pub fn handle(&mut self, event: &CollisionEvent, store: &mut SimState) -> Transition {
        use ControllerState::*;

        let from = self.state;
        let to = match (*event, from) {
            (CollisionEvent::PendulumHitBall1 { ball }, PendulumSwinging) => {
                store.pendulum.angular_velocity = 0.0;
                let ball = store.ball_mut(ball);
                ball.active = true;
                ball.velocity = self.ball1_kick;
                Ball1Rolling
            }
            (CollisionEvent::Ball1HitRamp { ball }, Ball1Rolling) => {
                store.ball_mut(ball).velocity = Vec3::ZERO;
                Ball1Falling
            }
            (CollisionEvent::Ball1HitFirstDomino { ball, domino }, Ball1Falling) => {
                let Some(first) = store.domino_mut(domino) else {
                    log::warn!("Sequencer: {:?} does not exist", domino);
                    return Transition::Ignored;
                };
                first.fallen = true;
                first.angular_velocity = self.domino_kick;
                store.ball_mut(ball).velocity = Vec3::ZERO;
                DominosFalling
            }
            (CollisionEvent::DominoHitNext { source, target }, DominosFalling) => {
                let Some(omega) = store.domino(source).map(|d| d.angular_velocity) else {
                    return Transition::Ignored;
                };
                // A source that settled within this frame has no spin left to pass on
                let omega = if omega == 0.0 { self.domino_kick } else { omega };
                match store.domino_mut(target) {
                    Some(next) if !next.fallen => {
                        next.fallen = true;
                        next.angular_velocity = omega;
                        DominosFalling
                    }
                    _ => return Transition::Ignored,
                }
            }
            (CollisionEvent::DominoHitBall2 { ball, .. }, DominosFalling) => {
                let ball = store.ball_mut(ball);
                ball.active = true;
                ball.velocity = self.ball2_kick;
                Ball2Rolling
            }
            _ => {
                log::debug!("Sequencer: {:?} ignored in {:?}", event, from);
                return Transition::Ignored;
            }
        };

        self.state = to;
        if from != to {
            log::info!("Sequencer: {:?} -> {:?} on {:?}", from, to, event);
        }
        Transition::Applied { from, to }
    }
}
