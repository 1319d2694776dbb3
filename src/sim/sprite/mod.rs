//! Entity variants
//!
//! Sizes are given in tile widths so everything scales with the screen.

mod alien;
mod asteroid;
mod coin;
mod obstacle;
mod projectile;
mod ship;

pub use alien::Alien;
pub use asteroid::Asteroid;
pub use coin::Coin;
pub use obstacle::Obstacle;
pub use projectile::{Projectile, ProjectileOwner};
pub use ship::Ship;

/// Draw layers, lowest first
pub mod layers {
    pub const COIN: usize = 1;
    pub const OBSTACLE: usize = 2;
    pub const ASTEROID: usize = 3;
    pub const ALIEN: usize = 4;
    pub const PROJECTILE: usize = 5;
    pub const SHIP: usize = 6;
}

/// Health of hostile entities at a given difficulty
pub fn enemy_health(difficulty: f64) -> i32 {
    10 + (20.0 * difficulty) as i32
}
