//! Frame pipeline
//!
//! Single owner of the object store, the mesh arena and the three systems.
//! Each `tick` runs integrator (motion, then mesh sync) → collision detector →
//! sequencer, strictly in that order, so the sequencer always acts on events
//! computed from this frame's integrated poses.

use glam::Vec3;
use serde::Serialize;

use super::animation::AnimationSystem;
use super::collision::{CollisionEvent, CollisionSystem};
use super::controller::{ControllerState, RgmController, Transition};
use super::focus::focus_point;
use super::scene::Scene;
use super::state::SimState;
use super::sync::{SyncReport, sync};
use crate::config::SimConfig;
use crate::error::SimError;

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Step used by the integrator (after clamping)
    pub dt: f32,
    /// Number of collision events emitted
    pub events: usize,
    /// Transitions whose guard matched
    pub transitions: Vec<Transition>,
    pub sync: SyncReport,
}

/// Serializable view for observers (HUD, native runner)
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub elapsed: f32,
    pub state: ControllerState,
    pub focus: Vec3,
    pub store: SimState,
    pub events: Vec<CollisionEvent>,
}

pub struct Simulation {
    store: SimState,
    scene: Scene,
    animation: AnimationSystem,
    collisions: CollisionSystem,
    controller: RgmController,
    frame: u64,
    elapsed: f32,
}

impl Simulation {
    /// Validate `config`, build the store and one mesh set per shading mode
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut store = SimState::new(&config)?;
        let controller = RgmController::new(&config, &mut store);
        let scene = Scene::build(&config, &store);
        let animation = AnimationSystem::new(&config, &store)?;
        let collisions = CollisionSystem::new(&config);

        log::info!(
            "Simulation ready: {} dominoes, {:?} shading for collisions",
            store.dominoes.len(),
            config.shading.collision_mode
        );

        Ok(Self {
            store,
            scene,
            animation,
            collisions,
            controller,
            frame: 0,
            elapsed: 0.0,
        })
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) -> Result<FrameReport, SimError> {
        let phase = self.controller.state();
        let step = self
            .animation
            .update(dt, &mut self.store, phase, &mut self.scene)?;

        let events = self.collisions.update(&self.store, &self.scene);
        let transitions: Vec<Transition> = self
            .controller
            .update(events, &mut self.store)
            .into_iter()
            .filter(Transition::is_applied)
            .collect();

        self.frame += 1;
        self.elapsed += step.dt;

        Ok(FrameReport {
            dt: step.dt,
            events: self.collisions.events().len(),
            transitions,
            sync: step.sync,
        })
    }

    /// Re-arm the chain reaction and pose the meshes to match
    pub fn reset(&mut self) {
        self.controller.reset(&mut self.store);
        sync(&self.store, &mut self.scene);
        self.frame = 0;
        self.elapsed = 0.0;
    }

    #[inline]
    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Events emitted during the last frame
    pub fn events(&self) -> &[CollisionEvent] {
        self.collisions.events()
    }

    pub fn store(&self) -> &SimState {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Renderer-side access (e.g. disposing a mesh)
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Point the lighting system should track
    pub fn focus_point(&self) -> Vec3 {
        focus_point(self.controller.state(), &self.store)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            elapsed: self.elapsed,
            state: self.controller.state(),
            focus: self.focus_point(),
            store: self.store.clone(),
            events: self.collisions.events().to_vec(),
        }
    }
}
