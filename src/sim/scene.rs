//! Visual mesh arena
//!
//! Stand-in for the renderer's scene graph: just the fields the core reads
//! (local bounds, world transform) and writes (translation, rotation). Each
//! logical body is bound to one mesh per shading mode.

use std::collections::HashMap;

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::state::{BallId, DominoId, SimState};
use crate::config::{ShadingMode, SimConfig};

/// Handle into the mesh arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Logical body a mesh mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Ball(BallId),
    PendulumPivot,
    /// Child of the pivot; never written directly
    PendulumBob,
    Domino(DominoId),
    Ramp,
}

/// A drawable instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub label: String,
    pub shading: ShadingMode,
    /// Geometry bounds in mesh space (fixed per shape)
    pub local_bounds: Aabb,
    pub translation: Vec3,
    /// Rotation about +Z (radians)
    pub rotation_z: f32,
    pub parent: Option<MeshId>,
}

impl Mesh {
    pub fn new(label: impl Into<String>, shading: ShadingMode, local_bounds: Aabb) -> Self {
        Self {
            label: label.into(),
            shading,
            local_bounds,
            translation: Vec3::ZERO,
            rotation_z: 0.0,
            parent: None,
        }
    }

    pub fn at(mut self, translation: Vec3, rotation_z: f32) -> Self {
        self.translation = translation;
        self.rotation_z = rotation_z;
        self
    }

    pub fn child_of(mut self, parent: MeshId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Transform relative to the parent
    pub fn local_matrix(&self) -> Affine3A {
        let rotation = Quat::from_rotation_z(self.rotation_z);
        Affine3A::from_rotation_translation(rotation, self.translation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Removed meshes leave a hole so ids stay stable
    meshes: Vec<Option<Mesh>>,
    bindings: HashMap<Body, Vec<MeshId>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(Some(mesh));
        id
    }

    /// Register `mesh` as a visual of `body`
    pub fn bind(&mut self, body: Body, mesh: MeshId) {
        self.bindings.entry(body).or_default().push(mesh);
    }

    /// Drop a mesh (e.g. disposed by the renderer); bindings to it go stale
    pub fn remove_mesh(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Live meshes in id order
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (MeshId(i as u32), m)))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.iter().flatten().count()
    }

    /// Every mesh bound to `body` (including stale ids)
    pub fn meshes_for(&self, body: Body) -> &[MeshId] {
        self.bindings.get(&body).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The live mesh of `body` drawn with `mode`
    pub fn mesh_for(&self, body: Body, mode: ShadingMode) -> Option<MeshId> {
        self.meshes_for(body)
            .iter()
            .copied()
            .find(|&id| self.mesh(id).is_some_and(|m| m.shading == mode))
    }

    /// Compose the parent chain; `None` if any link is missing or cyclic
    pub fn world_matrix(&self, id: MeshId) -> Option<Affine3A> {
        let mut matrix = Affine3A::IDENTITY;
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(mesh_id) = current {
            if depth > self.meshes.len() {
                return None;
            }
            let mesh = self.mesh(mesh_id)?;
            matrix = mesh.local_matrix() * matrix;
            current = mesh.parent;
            depth += 1;
        }
        Some(matrix)
    }

    /// Local bounds pushed through the current world matrix
    pub fn world_bounds(&self, id: MeshId) -> Option<Aabb> {
        let world = self.world_matrix(id)?;
        Some(self.mesh(id)?.local_bounds.transformed(&world))
    }

    /// Create one mesh set per configured shading mode, posed from `state`
    pub fn build(config: &SimConfig, state: &SimState) -> Self {
        let mut scene = Scene::new();

        for &mode in &config.shading.modes {
            let tag = mode.as_str().to_lowercase();

            for id in BallId::ALL {
                let ball = state.ball(id);
                let bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(ball.radius));
                let mesh = scene.add_mesh(
                    Mesh::new(format!("{tag}/{id:?}"), mode, bounds).at(ball.position, 0.0),
                );
                scene.bind(Body::Ball(id), mesh);
            }

            let pendulum = &state.pendulum;
            let pivot = scene.add_mesh(
                Mesh::new(
                    format!("{tag}/pivot"),
                    mode,
                    Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.05)),
                )
                .at(pendulum.pivot, pendulum.angle),
            );
            scene.bind(Body::PendulumPivot, pivot);

            let bob = scene.add_mesh(
                Mesh::new(
                    format!("{tag}/bob"),
                    mode,
                    Aabb::from_center_half_extents(
                        Vec3::ZERO,
                        Vec3::splat(config.pendulum.bob_half_extent),
                    ),
                )
                .at(Vec3::new(0.0, -pendulum.length, 0.0), 0.0)
                .child_of(pivot),
            );
            scene.bind(Body::PendulumBob, bob);

            let d = &config.dominoes;
            let domino_bounds = Aabb::new(
                Vec3::new(-d.half_width, 0.0, -d.half_depth),
                Vec3::new(d.half_width, d.height, d.half_depth),
            );
            for (i, domino) in state.dominoes.iter().enumerate() {
                let mesh = scene.add_mesh(
                    Mesh::new(format!("{tag}/domino{i}"), mode, domino_bounds)
                        .at(domino.base, domino.angle),
                );
                scene.bind(Body::Domino(DominoId(i)), mesh);
            }

            let ramp = scene.add_mesh(
                Mesh::new(
                    format!("{tag}/ramp"),
                    mode,
                    Aabb::from_center_half_extents(Vec3::ZERO, config.ramp.half_extents),
                )
                .at(config.ramp.center, -config.ramp.incline),
            );
            scene.bind(Body::Ramp, ramp);
        }

        log::info!(
            "Scene built: {} meshes across {} shading modes",
            scene.mesh_count(),
            config.shading.modes.len()
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn default_scene() -> (SimConfig, SimState, Scene) {
        let config = SimConfig::default();
        let state = SimState::new(&config).unwrap();
        let scene = Scene::build(&config, &state);
        (config, state, scene)
    }

    #[test]
    fn test_build_creates_one_set_per_mode() {
        let (_, _, scene) = default_scene();
        // 2 balls + pivot + bob + dominoes + ramp per mode
        let per_mode = 2 + 2 + DOMINO_COUNT + 1;
        assert_eq!(scene.mesh_count(), per_mode * ShadingMode::ALL.len());
        for mode in ShadingMode::ALL {
            assert!(scene.mesh_for(Body::Ball(BallId::Ball1), mode).is_some());
            assert!(scene.mesh_for(Body::Ramp, mode).is_some());
        }
        assert_eq!(scene.meshes_for(Body::Domino(DominoId(2))).len(), 3);
    }

    #[test]
    fn test_bob_world_bounds_follow_pivot() {
        let (config, state, mut scene) = default_scene();
        let bob = scene.mesh_for(Body::PendulumBob, ShadingMode::Phong).unwrap();
        let center = scene.world_bounds(bob).unwrap().center();
        assert!((center - state.pendulum.bob_position()).length() < 1e-4);

        let pivot = scene.mesh_for(Body::PendulumPivot, ShadingMode::Phong).unwrap();
        scene.mesh_mut(pivot).unwrap().rotation_z = 0.0;
        let center = scene.world_bounds(bob).unwrap().center();
        let expected = config.pendulum.pivot - Vec3::Y * config.pendulum.length;
        assert!((center - expected).length() < 1e-4);
    }

    #[test]
    fn test_domino_pivots_about_base() {
        let (_, state, mut scene) = default_scene();
        let mesh = scene.mesh_for(Body::Domino(DominoId(0)), ShadingMode::Phong).unwrap();
        let upright = scene.world_bounds(mesh).unwrap();
        assert!((upright.min.y - state.dominoes[0].base.y).abs() < 1e-5);

        scene.mesh_mut(mesh).unwrap().rotation_z = -std::f32::consts::FRAC_PI_2;
        let flat = scene.world_bounds(mesh).unwrap();
        // Lying toward +X with its base still at the pivot
        assert!(flat.max.x > state.dominoes[0].base.x + 0.9);
        assert!(flat.max.y < state.dominoes[0].base.y + 0.2);
    }

    #[test]
    fn test_removed_mesh_has_no_bounds() {
        let (_, _, mut scene) = default_scene();
        let pivot = scene.mesh_for(Body::PendulumPivot, ShadingMode::Phong).unwrap();
        let bob = scene.mesh_for(Body::PendulumBob, ShadingMode::Phong).unwrap();
        assert!(scene.remove_mesh(pivot).is_some());
        assert!(scene.world_bounds(pivot).is_none());
        // The child loses its parent transform as well
        assert!(scene.world_bounds(bob).is_none());
        assert!(scene.mesh_for(Body::PendulumPivot, ShadingMode::Phong).is_none());
    }
}
