//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same settings, seed, clock readings
//! and inputs, the engine produces the same sequence of results:
//! - Seeded RNG only, threaded explicitly through every random decision
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod background;
pub mod chunk;
pub mod collision;
pub mod control;
pub mod engine;
pub mod entity;
pub mod map;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod time;
pub mod update;

pub use chunk::{Chunk, ChunkGenerator, ChunkType, TileType};
pub use control::{ControlState, Direction, TiltController};
pub use engine::GameEngine;
pub use entity::{Body, Entity, EntityKind, EntityTag, Lifecycle};
pub use map::Map;
pub use state::{GameState, ShipStatus, next_state};
pub use time::{FrameStats, GameTime, GameTimer};
pub use update::{EventId, UpdateResult};
