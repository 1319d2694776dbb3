//! Scrolling map: difficulty curve, scroll speed and chunk spawning

use glam::DVec2;
use rand_pcg::Pcg32;

use super::chunk::{Chunk, ChunkGenerator, TileType};
use super::entity::Entity;
use super::sprite::{Alien, Asteroid, Coin, Obstacle};
use super::time::GameTime;
use crate::consts::BASE_DIFFICULTY;
use crate::error::EngineError;
use crate::settings::Dimensions;

/// Difficulty after `run_time_ms` of play, rising from 0.1 to 1.0 over 90 seconds
pub fn difficulty_at(run_time_ms: f64) -> f64 {
    (BASE_DIFFICULTY + run_time_ms / 1000.0 / 100.0).min(1.0)
}

/// Scroll speed in px/s at a difficulty
pub fn scroll_speed_px(difficulty: f64, game_width: f64) -> f64 {
    (0.43 * difficulty + 0.12) * game_width
}

/// Scroll position and chunk spawner
#[derive(Debug, Clone)]
pub struct Map {
    dims: Dimensions,
    generator: ChunkGenerator,
    difficulty: f64,
    scroll_speed: f64,
    num_px_scrolled: f64,
    next_spawn_at_px: f64,
    spawn_margin_px: f64,
}

impl Map {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            generator: ChunkGenerator::new(),
            difficulty: BASE_DIFFICULTY,
            scroll_speed: scroll_speed_px(BASE_DIFFICULTY, dims.game_width),
            num_px_scrolled: 0.0,
            next_spawn_at_px: 0.0,
            spawn_margin_px: dims.tile_width,
        }
    }

    /// Difficulty as of the most recent chunk
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Scroll speed (px/s) as of the most recent chunk
    pub fn scroll_speed(&self) -> f64 {
        self.scroll_speed
    }

    pub fn num_px_scrolled(&self) -> f64 {
        self.num_px_scrolled
    }

    pub fn next_spawn_at_px(&self) -> f64 {
        self.next_spawn_at_px
    }

    /// Scroll forward and spawn the next chunk once its threshold is reached
    pub fn update(
        &mut self,
        game_time: &GameTime,
        rng: &mut Pcg32,
        created: &mut Vec<Entity>,
    ) -> Result<(), EngineError> {
        self.num_px_scrolled += self.scroll_speed * game_time.delta_s();
        if self.num_px_scrolled < self.next_spawn_at_px {
            return Ok(());
        }

        self.difficulty = difficulty_at(game_time.run_time_ms);
        self.scroll_speed = scroll_speed_px(self.difficulty, self.dims.game_width);
        let chunk = self.generator.generate(self.difficulty, rng)?;
        self.place_chunk(&chunk, rng, created)
    }

    /// Spawn a chunk's tiles just past the right edge and schedule the next chunk
    fn place_chunk(
        &mut self,
        chunk: &Chunk,
        rng: &mut Pcg32,
        created: &mut Vec<Entity>,
    ) -> Result<(), EngineError> {
        let tile = self.dims.tile_width;
        // Align the new chunk to the tile grid that's already on screen
        let start_x = self.dims.game_width + self.spawn_margin_px - self.num_px_scrolled % tile;
        for (row, col, tile_type) in chunk.occupied() {
            let pos = DVec2::new(start_x + col as f64 * tile, row as f64 * tile);
            created.push(self.spawn_tile(tile_type, pos, chunk.difficulty, rng)?);
        }
        self.next_spawn_at_px = self.num_px_scrolled + chunk.num_cols() as f64 * tile;
        Ok(())
    }

    /// Entity for one tile at `pos`
    pub fn spawn_tile(
        &self,
        tile: TileType,
        pos: DVec2,
        difficulty: f64,
        rng: &mut Pcg32,
    ) -> Result<Entity, EngineError> {
        match tile {
            TileType::Obstacle => Ok(Obstacle::spawn(pos, &self.dims)),
            TileType::Coin => Ok(Coin::spawn(pos, &self.dims)),
            TileType::Alien => Ok(Alien::spawn(pos, difficulty, &self.dims, rng)),
            TileType::Asteroid => Ok(Asteroid::spawn(
                pos,
                difficulty,
                self.scroll_speed,
                &self.dims,
                rng,
            )),
            TileType::Empty => Err(EngineError::UnsupportedTile(TileType::Empty)),
        }
    }
}
