//! Chain reaction simulation
//!
//! Everything that moves lives here. This module must stay deterministic:
//! - Explicit Euler at the caller's step, no hidden clocks
//! - Stable iteration order (balls by id, dominoes by chain index)
//! - No rendering or platform dependencies beyond the mesh arena

pub mod animation;
pub mod bounds;
pub mod collision;
pub mod controller;
pub mod focus;
pub mod scene;
pub mod state;
pub mod sync;
pub mod tick;

pub use animation::{AnimationSystem, MotionRule, StepReport};
pub use bounds::Aabb;
pub use collision::{CollisionEvent, CollisionSystem};
pub use controller::{ControllerState, RgmController, Transition};
pub use focus::focus_point;
pub use scene::{Body, Mesh, MeshId, Scene};
pub use state::{Ball, BallId, Domino, DominoId, Pendulum, Ramp, SimState};
pub use sync::{SyncReport, sync};
pub use tick::{FrameReport, Simulation, Snapshot};
