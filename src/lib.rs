//! Galaxy Run - A side-scrolling space arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, map generation, collisions, game state)
//! - `ui`: In-game buttons, overlays and HUD, driven by abstract touch input
//! - `draw`: Renderer-agnostic draw instructions
//! - `platform`: Input boundary, thread-safe input queue and clocks
//! - `runner`: Simulation thread with request/response updates

pub mod audio;
pub mod draw;
pub mod error;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, EngineError, RunnerError};
pub use settings::{Dimensions, Settings};
pub use sim::{GameEngine, GameState, UpdateResult};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Number of tile rows in the map. Doesn't change.
    pub const NUM_ROWS: usize = 6;
    /// Fraction of the screen height used by the game area (rest is the HUD strip)
    pub const GAME_HEIGHT_FRACTION: f64 = 0.94;

    /// Upper bound on the time delta applied in a single tick (ms)
    pub const MAX_TICK_DELTA_MS: f64 = 100.0;

    /// Default player health at the start of a game
    pub const STARTING_PLAYER_HEALTH: i32 = 100;
    /// Default number of points a coin is worth
    pub const COIN_VALUE: u32 = 100;

    /// Speed at which the ship flies onto the screen (fraction of game width per second)
    pub const ONBOARD_SPEED_FRACTION: f64 = 0.12;
    /// Resting x-position of the ship (fraction of game width)
    pub const SHIP_REST_X_FRACTION: f64 = 0.25;

    /// Difficulty at zero run time
    pub const BASE_DIFFICULTY: f64 = 0.1;
    /// Continuous score per second at difficulty 1.0
    pub const SCORE_PER_SECOND: f64 = 100.0;

    /// Number of draw layers entities are sorted into
    pub const NUM_DRAW_LAYERS: usize = 7;
}

/// Axis-aligned rectangle in game-space pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at `pos` with the given size
    pub fn from_pos_size(pos: DVec2, size: DVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that merely share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the point lies inside (inclusive of the top-left edges)
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
