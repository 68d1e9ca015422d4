//! Render sync: mirror logical state onto every bound mesh
//!
//! Pure copying, no physics. A binding whose mesh has gone away is skipped
//! so one broken visual never stalls the rest of the frame.

use super::scene::{Body, Mesh, MeshId, Scene};
use super::state::{BallId, DominoId, SimState};

/// Outcome of one sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub mirrored: usize,
    pub skipped: usize,
}

/// Copy ball positions, pendulum angle and domino angles onto their meshes
pub fn sync(state: &SimState, scene: &mut Scene) -> SyncReport {
    let mut report = SyncReport::default();

    for id in BallId::ALL {
        let position = state.ball(id).position;
        write_each(scene, Body::Ball(id), &mut report, |mesh| {
            mesh.translation = position;
        });
    }

    let angle = state.pendulum.angle;
    write_each(scene, Body::PendulumPivot, &mut report, |mesh| {
        mesh.rotation_z = angle;
    });

    for (i, domino) in state.dominoes.iter().enumerate() {
        let angle = domino.angle;
        write_each(scene, Body::Domino(DominoId(i)), &mut report, |mesh| {
            mesh.rotation_z = angle;
        });
    }

    report
}

fn write_each(
    scene: &mut Scene,
    body: Body,
    report: &mut SyncReport,
    mut write: impl FnMut(&mut Mesh),
) {
    let ids: Vec<MeshId> = scene.meshes_for(body).to_vec();
    for id in ids {
        match scene.mesh_mut(id) {
            Some(mesh) => {
                write(mesh);
                report.mirrored += 1;
            }
            None => {
                log::warn!("Render sync: {:?} mesh {:?} is missing, skipping", body, id);
                report.skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShadingMode, SimConfig};
    use glam::Vec3;

    #[test]
    fn test_sync_mirrors_every_mode() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config).unwrap();
        let mut scene = Scene::build(&config, &state);

        state.ball_mut(BallId::Ball1).position = Vec3::new(1.0, 2.0, 3.0);
        state.pendulum.angle = 0.25;
        state.dominoes[1].angle = -0.5;

        let report = sync(&state, &mut scene);
        assert_eq!(report.skipped, 0);

        for mode in ShadingMode::ALL {
            let ball = scene.mesh_for(Body::Ball(BallId::Ball1), mode).unwrap();
            assert_eq!(scene.mesh(ball).unwrap().translation, Vec3::new(1.0, 2.0, 3.0));
            let pivot = scene.mesh_for(Body::PendulumPivot, mode).unwrap();
            assert_eq!(scene.mesh(pivot).unwrap().rotation_z, 0.25);
            let domino = scene.mesh_for(Body::Domino(DominoId(1)), mode).unwrap();
            assert_eq!(scene.mesh(domino).unwrap().rotation_z, -0.5);
        }
    }

    #[test]
    fn test_missing_mesh_is_skipped() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config).unwrap();
        let mut scene = Scene::build(&config, &state);

        let gone = scene.mesh_for(Body::Ball(BallId::Ball2), ShadingMode::Gouraud).unwrap();
        scene.remove_mesh(gone);
        state.ball_mut(BallId::Ball2).position = Vec3::new(9.0, 0.0, 0.0);

        let report = sync(&state, &mut scene);
        assert_eq!(report.skipped, 1);

        let phong = scene.mesh_for(Body::Ball(BallId::Ball2), ShadingMode::Phong).unwrap();
        assert_eq!(scene.mesh(phong).unwrap().translation.x, 9.0);
    }
}
