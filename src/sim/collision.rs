//! Collision detection for the chain reaction
//!
//! A fixed set of pair predicates evaluated every frame. Spatial tests compare
//! world-space AABBs read from one shading mode's meshes; domino propagation is
//! an angle threshold rather than a spatial test. Nothing here mutates the
//! simulation; it only fills the event queue.

use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::scene::{Body, Scene};
use super::state::{BallId, DominoId, SimState};
use crate::config::{ShadingMode, SimConfig};

/// One detected contact, naming the objects involved by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    PendulumHitBall1 { ball: BallId },
    Ball1HitRamp { ball: BallId },
    Ball1HitFirstDomino { ball: BallId, domino: DominoId },
    DominoHitNext { source: DominoId, target: DominoId },
    DominoHitBall2 { domino: DominoId, ball: BallId },
}

/// Per-frame collision tester
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    events: Vec<CollisionEvent>,
    /// Meshes of this mode supply the world bounds
    mode: ShadingMode,
    propagation_threshold: f32,
    ball2_threshold: f32,
}

impl CollisionSystem {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            events: Vec::new(),
            mode: config.shading.collision_mode,
            propagation_threshold: config.dominoes.propagation_threshold,
            ball2_threshold: config.dominoes.ball2_threshold,
        }
    }

    /// This frame's events (cleared on the next update)
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Rebuild the event queue from the current poses
    pub fn update(&mut self, state: &SimState, scene: &Scene) -> &[CollisionEvent] {
        self.events.clear();

        let ball1 = Body::Ball(BallId::Ball1);

        if self.overlaps(scene, Body::PendulumBob, ball1) {
            self.events.push(CollisionEvent::PendulumHitBall1 { ball: BallId::Ball1 });
        }

        if self.overlaps(scene, ball1, Body::Ramp) {
            self.events.push(CollisionEvent::Ball1HitRamp { ball: BallId::Ball1 });
        }

        let first_standing = state.domino(DominoId::FIRST).is_some_and(|d| !d.fallen);
        if first_standing && self.overlaps(scene, ball1, Body::Domino(DominoId::FIRST)) {
            self.events.push(CollisionEvent::Ball1HitFirstDomino {
                ball: BallId::Ball1,
                domino: DominoId::FIRST,
            });
        }

        for (i, pair) in state.dominoes.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if current.fallen && !next.fallen && current.angle.abs() > self.propagation_threshold {
                let source = DominoId(i);
                self.events.push(CollisionEvent::DominoHitNext {
                    source,
                    target: source.next(),
                });
            }
        }

        let last_down = state.last_domino().filter(|&last| {
            state
                .domino(last)
                .is_some_and(|d| d.fallen && d.angle < self.ball2_threshold)
        });
        if let Some(last) = last_down {
            self.events.push(CollisionEvent::DominoHitBall2 {
                domino: last,
                ball: BallId::Ball2,
            });
        }

        &self.events
    }

    /// World bounds of `body` in the collision mode, warning if unavailable
    fn bounds(&self, scene: &Scene, body: Body) -> Option<Aabb> {
        let bounds = scene
            .mesh_for(body, self.mode)
            .and_then(|id| scene.world_bounds(id));
        if bounds.is_none() {
            log::warn!("Collision: no {:?} bounds for {:?}, skipping test", self.mode, body);
        }
        bounds
    }

    fn overlaps(&self, scene: &Scene, a: Body, b: Body) -> bool {
        match (self.bounds(scene, a), self.bounds(scene, b)) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }
}
