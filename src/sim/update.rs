//! Per-tick context and results
//!
//! `UpdateContext` is what entities see during the update and collision passes.
//! Anything they produce (child entities, events, sounds) goes into the tick's
//! `TickOutput`, which the engine folds back in after the passes finish.

use glam::DVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::state::GameState;
use super::time::GameTime;
use crate::audio::SoundId;
use crate::draw::instruction::DrawInstruction;
use crate::settings::Dimensions;

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventId {
    GameStarted,
    BulletFired,
    BulletCollided,
    AlienFiredBullet,
    AlienShot,
    AlienDied,
    AsteroidShot,
    AsteroidDestroyed,
    CoinCollected,
    SpaceshipDamaged,
    SpaceshipKilled,
    SpaceshipInvisible,
    GameOver,
}

/// Everything produced by one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub draw_instructions: Vec<DrawInstruction>,
    pub events: Vec<EventId>,
    /// Empty whenever the engine is muted
    pub sounds: Vec<SoundId>,
    pub frame_count: u64,
    pub fps: f64,
    pub game_state: GameState,
    pub score: f64,
    pub difficulty: f64,
}

/// Buffers collecting a tick's side effects
#[derive(Debug, Default)]
pub struct TickOutput {
    pub created: Vec<Entity>,
    pub events: Vec<EventId>,
    pub sounds: Vec<SoundId>,
}

impl TickOutput {
    pub fn event(&mut self, event: EventId) {
        self.events.push(event);
    }

    pub fn sound(&mut self, sound: SoundId) {
        self.sounds.push(sound);
    }
}

/// Read-mostly world view handed to entities
pub struct UpdateContext<'a> {
    pub game_time: GameTime,
    pub state: GameState,
    pub difficulty: f64,
    /// Current scroll speed in px/s
    pub scroll_speed: f64,
    pub dims: &'a Dimensions,
    /// Hitbox center of the living ship, if any
    pub ship_target: Option<DVec2>,
    pub rng: &'a mut Pcg32,
    pub out: &'a mut TickOutput,
}

impl UpdateContext<'_> {
    #[inline]
    pub fn delta_ms(&self) -> f64 {
        self.game_time.ms_since_prev_update
    }

    #[inline]
    pub fn delta_s(&self) -> f64 {
        self.game_time.delta_s()
    }

    /// Queue a child entity for registration at the end of the tick
    pub fn spawn(&mut self, entity: Entity) {
        self.out.created.push(entity);
    }

    pub fn event(&mut self, event: EventId) {
        self.out.event(event);
    }

    pub fn sound(&mut self, sound: SoundId) {
        self.out.sound(sound);
    }
}
