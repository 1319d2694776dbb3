//! Engine settings
//!
//! Everything the engine needs at construction time. Screen dimensions are turned
//! into an immutable `Dimensions` value that is handed to every component, so no
//! part of the simulation reads process-wide state.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Engine settings consumed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen width in pixels
    pub screen_width_px: u32,
    /// Screen height in pixels
    pub screen_height_px: u32,
    /// Player health at the start of a game
    pub starting_health: i32,
    /// Points awarded per collected coin
    pub coin_value: u32,
    /// Emit hitbox and UI bounds outlines
    pub debug: bool,
    /// Seed for the simulation RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width_px: 1280,
            screen_height_px: 720,
            starting_health: STARTING_PLAYER_HEALTH,
            coin_value: COIN_VALUE,
            debug: false,
            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {}x{} seed={}",
            settings.screen_width_px,
            settings.screen_height_px,
            settings.seed
        );
        Ok(settings)
    }

    /// Reject values the engine can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width_px == 0 {
            return Err(ConfigError::Invalid {
                field: "screen_width_px",
                reason: "must be positive",
            });
        }
        // Need at least one pixel per tile row
        if (self.screen_height_px as f64 * GAME_HEIGHT_FRACTION) < NUM_ROWS as f64 {
            return Err(ConfigError::Invalid {
                field: "screen_height_px",
                reason: "too small to fit the tile rows",
            });
        }
        if self.starting_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "starting_health",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from_screen(self.screen_width_px, self.screen_height_px)
    }
}

/// Screen and game-area dimensions, derived once from the settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub screen_width: f64,
    pub screen_height: f64,
    /// Width of the playable area
    pub game_width: f64,
    /// Height of the playable area; the HUD strip sits below it
    pub game_height: f64,
    /// Side length of one map tile
    pub tile_width: f64,
}

impl Dimensions {
    pub fn from_screen(screen_width_px: u32, screen_height_px: u32) -> Self {
        let screen_width = screen_width_px as f64;
        let screen_height = screen_height_px as f64;
        let game_height = (screen_height * GAME_HEIGHT_FRACTION).floor();
        Self {
            screen_width,
            screen_height,
            game_width: screen_width,
            game_height,
            tile_width: game_height / NUM_ROWS as f64,
        }
    }

    /// Resting x-position of the ship once it has flown on screen
    pub fn ship_rest_x(&self) -> f64 {
        self.game_width * SHIP_REST_X_FRACTION
    }
}
