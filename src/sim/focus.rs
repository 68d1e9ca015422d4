//! Lighting focus
//!
//! The spotlight in the demo follows whichever object the chain reaction is
//! currently "about". This is a read-only view over the store.

use glam::Vec3;

use super::controller::ControllerState;
use super::state::{BallId, SimState};

/// World point the lighting system should track in `phase`
pub fn focus_point(phase: ControllerState, store: &SimState) -> Vec3 {
    match phase {
        ControllerState::PendulumSwinging => store.pendulum.bob_position(),
        ControllerState::Ball1Rolling | ControllerState::Ball1Falling => {
            store.ball(BallId::Ball1).position
        }
        // Front of the wave: first domino still toppling, else the last one down
        ControllerState::DominosFalling => store
            .dominoes
            .iter()
            .find(|d| d.fallen && !d.is_settled())
            .or_else(|| store.dominoes.iter().rev().find(|d| d.fallen))
            .map(|d| d.base)
            .unwrap_or(store.ball(BallId::Ball1).position),
        ControllerState::Ball2Rolling | ControllerState::Done => store.ball(BallId::Ball2).position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_focus_follows_phase() {
        let mut store = SimState::new(&SimConfig::default()).unwrap();

        let bob = focus_point(ControllerState::PendulumSwinging, &store);
        assert_eq!(bob, store.pendulum.bob_position());

        assert_eq!(
            focus_point(ControllerState::Ball1Falling, &store),
            store.ball(BallId::Ball1).position
        );

        store.dominoes[0].fallen = true;
        store.dominoes[0].angle = store.dominoes[0].target;
        store.dominoes[1].fallen = true;
        store.dominoes[1].angular_velocity = -1.5;
        assert_eq!(
            focus_point(ControllerState::DominosFalling, &store),
            store.dominoes[1].base
        );

        store.dominoes[1].angle = store.dominoes[1].target;
        store.dominoes[1].angular_velocity = 0.0;
        assert_eq!(
            focus_point(ControllerState::DominosFalling, &store),
            store.dominoes[1].base
        );

        assert_eq!(
            focus_point(ControllerState::Ball2Rolling, &store),
            store.ball(BallId::Ball2).position
        );
    }
}
