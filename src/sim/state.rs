//! Game state machine
//!
//! Transitions are computed from a snapshot of the ship's status; entry actions
//! live on the engine since they touch the ship, timer and output buffers.

use serde::{Deserialize, Serialize};

use super::entity::Lifecycle;

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen, waiting for the START input
    WaitingForStart,
    /// Ship flies onto the screen, not yet controllable
    Starting,
    /// Active gameplay
    Playing,
    /// Ship destroyed, explosion playing out
    PlayerDead,
    /// Run ended, waiting for RESTART
    GameOver,
}

impl GameState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, next),
            (WaitingForStart, Starting)
                | (Starting, Playing)
                | (Playing, PlayerDead)
                | (PlayerDead, GameOver)
                | (GameOver, Starting)
        )
    }

    /// States in which the map scrolls and generates
    pub fn is_scrolling(self) -> bool {
        matches!(
            self,
            GameState::Starting | GameState::Playing | GameState::PlayerDead
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameState::WaitingForStart => "waiting_for_start",
            GameState::Starting => "starting",
            GameState::Playing => "playing",
            GameState::PlayerDead => "player_dead",
            GameState::GameOver => "game_over",
        }
    }
}

/// Ship facts the state machine decides on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStatus {
    pub health: i32,
    pub lifecycle: Lifecycle,
    pub explode_anim_done: bool,
    /// Ship x has reached its resting x-position
    pub reached_rest_x: bool,
}

impl ShipStatus {
    /// Status reported once the ship has been purged from the world
    pub fn absent() -> Self {
        Self {
            health: 0,
            lifecycle: Lifecycle::Terminated,
            explode_anim_done: true,
            reached_rest_x: true,
        }
    }
}

/// Compute the state for this tick. At most one step per call, so PlayerDead is
/// always observed for at least one tick between Playing and GameOver.
pub fn next_state(current: GameState, ship: ShipStatus) -> GameState {
    match current {
        GameState::Starting if ship.reached_rest_x => GameState::Playing,
        GameState::Playing if ship.health <= 0 || ship.lifecycle != Lifecycle::Alive => {
            GameState::PlayerDead
        }
        GameState::PlayerDead
            if ship.explode_anim_done || ship.lifecycle == Lifecycle::Terminated =>
        {
            GameState::GameOver
        }
        other => other,
    }
}
