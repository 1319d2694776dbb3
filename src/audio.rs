//! Sound identifiers
//!
//! The engine never plays audio. It emits `SoundId`s in each update result and the
//! presentation layer plays each one exactly once.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    /// Ship fires its cannons
    Laser,
    /// Ship or alien explodes
    Explosion,
    /// Coin picked up
    CoinCollected,
    /// Projectile hits something
    BulletDestroyed,
    /// Alien fires at the ship
    AlienFire,
    /// UI button released
    ButtonClick,
    /// Game over
    GameOver,
}

impl SoundId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundId::Laser => "laser",
            SoundId::Explosion => "explosion",
            SoundId::CoinCollected => "coin_collected",
            SoundId::BulletDestroyed => "bullet_destroyed",
            SoundId::AlienFire => "alien_fire",
            SoundId::ButtonClick => "button_click",
            SoundId::GameOver => "game_over",
        }
    }
}
