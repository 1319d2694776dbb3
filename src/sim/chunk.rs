//! Map chunks and procedural chunk generation
//!
//! A chunk is a NUM_ROWS-high grid of tiles. The generator picks a chunk type from
//! a difficulty-weighted table and fills in its body from the engine's RNG, so the
//! same seed always produces the same level.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::NUM_ROWS;
use crate::error::EngineError;

/// Content of one map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Empty,
    Obstacle,
    Coin,
    Alien,
    Asteroid,
}

impl TryFrom<char> for TileType {
    type Error = EngineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(TileType::Empty),
            '#' => Ok(TileType::Obstacle),
            'c' => Ok(TileType::Coin),
            'a' => Ok(TileType::Alien),
            'o' => Ok(TileType::Asteroid),
            other => Err(EngineError::UnknownTile(other)),
        }
    }
}

impl TileType {
    pub fn as_char(self) -> char {
        match self {
            TileType::Empty => '.',
            TileType::Obstacle => '#',
            TileType::Coin => 'c',
            TileType::Alien => 'a',
            TileType::Asteroid => 'o',
        }
    }
}

/// A NUM_ROWS x num_cols grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    rows: Vec<Vec<TileType>>,
    num_cols: usize,
    /// Difficulty the chunk was generated at
    pub difficulty: f64,
}

impl Chunk {
    pub fn empty(num_cols: usize, difficulty: f64) -> Self {
        Self {
            rows: vec![vec![TileType::Empty; num_cols]; NUM_ROWS],
            num_cols,
            difficulty,
        }
    }

    /// Build a chunk from one string per row
    pub fn from_ascii(rows: &[&str], difficulty: f64) -> Result<Self, EngineError> {
        let num_cols = rows.first().map_or(0, |r| r.chars().count());
        if rows.len() > NUM_ROWS {
            return Err(EngineError::MalformedChunk {
                row: NUM_ROWS,
                expected: 0,
                actual: rows[NUM_ROWS].chars().count(),
            });
        }
        if rows.len() < NUM_ROWS {
            return Err(EngineError::MalformedChunk {
                row: rows.len(),
                expected: num_cols,
                actual: 0,
            });
        }

        let mut chunk = Chunk::empty(num_cols, difficulty);
        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != num_cols {
                return Err(EngineError::MalformedChunk {
                    row,
                    expected: num_cols,
                    actual,
                });
            }
            for (col, c) in line.chars().enumerate() {
                chunk.rows[row][col] = TileType::try_from(c)?;
            }
        }
        Ok(chunk)
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn get(&self, row: usize, col: usize) -> TileType {
        self.rows[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, tile: TileType) {
        self.rows[row][col] = tile;
    }

    /// Non-empty tiles as (row, col, tile), row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, TileType)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .filter(|(_, tile)| **tile != TileType::Empty)
                .map(move |(col, tile)| (row, col, *tile))
        })
    }

    pub fn to_ascii(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect()
    }
}

/// Kinds of chunk the generator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    Empty,
    Coins,
    Obstacles,
    Tunnel,
    Alien,
    AlienSwarm,
    Asteroid,
}

impl ChunkType {
    pub const ALL: [ChunkType; 7] = [
        ChunkType::Empty,
        ChunkType::Coins,
        ChunkType::Obstacles,
        ChunkType::Tunnel,
        ChunkType::Alien,
        ChunkType::AlienSwarm,
        ChunkType::Asteroid,
    ];

    /// Selection weight at a difficulty. Zero means not yet unlocked.
    pub fn weight(self, difficulty: f64) -> f64 {
        let d = difficulty;
        match self {
            ChunkType::Empty => 2.0 * (1.0 - d) + 0.2,
            ChunkType::Coins => 1.2,
            ChunkType::Obstacles => 1.0 + 2.0 * d,
            ChunkType::Tunnel if d >= 0.3 => 2.0 * d,
            ChunkType::Alien => 0.4 + 1.6 * d,
            ChunkType::AlienSwarm if d >= 0.5 => 2.0 * d,
            ChunkType::Asteroid if d >= 0.2 => 1.5 * d,
            ChunkType::Tunnel | ChunkType::AlienSwarm | ChunkType::Asteroid => 0.0,
        }
    }

    /// Normalized selection probability at a difficulty
    pub fn probability(self, difficulty: f64) -> f64 {
        let total: f64 = ChunkType::ALL.iter().map(|t| t.weight(difficulty)).sum();
        self.weight(difficulty) / total
    }
}

/// Columns of empty space at the start of every game
pub const LEAD_IN_COLS: usize = 10;

const TUNNEL_TEMPLATES: [[&str; NUM_ROWS]; 3] = [
    [
        "############",
        "............",
        "..c.c.c.c...",
        "............",
        "............",
        "############",
    ],
    [
        "############",
        "####....####",
        "....c..c....",
        "............",
        "##........##",
        "############",
    ],
    [
        "##########",
        "#####.....",
        "...c......",
        "......c...",
        ".....#####",
        "##########",
    ],
];

/// Procedural chunk source
#[derive(Debug, Clone, Default)]
pub struct ChunkGenerator {
    chunks_generated: u64,
}

impl ChunkGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks_generated(&self) -> u64 {
        self.chunks_generated
    }

    /// Produce the next chunk
    pub fn generate(&mut self, difficulty: f64, rng: &mut Pcg32) -> Result<Chunk, EngineError> {
        let first = self.chunks_generated == 0;
        self.chunks_generated += 1;
        if first {
            return Ok(Chunk::empty(LEAD_IN_COLS, difficulty));
        }

        let chunk_type = pick_chunk_type(difficulty, rng);
        let chunk = match chunk_type {
            ChunkType::Empty => empty_chunk(difficulty),
            ChunkType::Coins => coin_chunk(difficulty, rng),
            ChunkType::Obstacles => obstacle_chunk(difficulty, rng),
            ChunkType::Tunnel => tunnel_chunk(difficulty, rng)?,
            ChunkType::Alien => alien_chunk(difficulty, rng),
            ChunkType::AlienSwarm => alien_swarm_chunk(difficulty, rng),
            ChunkType::Asteroid => asteroid_chunk(difficulty, rng),
        };
        log::info!(
            "Generated {:?} chunk ({} cols) at difficulty {:.2}",
            chunk_type,
            chunk.num_cols(),
            difficulty
        );
        Ok(chunk)
    }
}

/// Weighted pick over the chunk table
pub fn pick_chunk_type(difficulty: f64, rng: &mut Pcg32) -> ChunkType {
    let total: f64 = ChunkType::ALL.iter().map(|t| t.weight(difficulty)).sum();
    let mut roll = rng.random_range(0.0..total);
    for chunk_type in ChunkType::ALL {
        let weight = chunk_type.weight(difficulty);
        if roll < weight {
            return chunk_type;
        }
        roll -= weight;
    }
    // Only reachable through float rounding at the top of the range
    ChunkType::Coins
}

fn empty_chunk(difficulty: f64) -> Chunk {
    let cols = 8 - (4.0 * difficulty.clamp(0.0, 1.0)).round() as usize;
    Chunk::empty(cols, difficulty)
}

fn coin_chunk(difficulty: f64, rng: &mut Pcg32) -> Chunk {
    let cols = rng.random_range(6..=9);
    let mut chunk = Chunk::empty(cols, difficulty);
    let mut row = rng.random_range(0..NUM_ROWS) as i64;
    for col in 0..cols {
        chunk.set(row as usize, col, TileType::Coin);
        row = (row + rng.random_range(-1..=1)).clamp(0, NUM_ROWS as i64 - 1);
    }
    chunk
}

fn obstacle_chunk(difficulty: f64, rng: &mut Pcg32) -> Chunk {
    let cols = rng.random_range(8..=11);
    let mut chunk = Chunk::empty(cols, difficulty);
    let run_chance = 0.2 + 0.4 * difficulty.clamp(0.0, 1.0);
    let max_run = NUM_ROWS / 2;

    let mut col = 0;
    while col < cols {
        if rng.random_bool(run_chance) {
            let len = rng.random_range(1..=max_run);
            let from_top = rng.random_bool(0.5);
            for i in 0..len {
                let row = if from_top { i } else { NUM_ROWS - 1 - i };
                chunk.set(row, col, TileType::Obstacle);
            }
            // Leave a clear column after every wall so there's time to steer
            col += 2;
        } else {
            if rng.random_bool(0.25) {
                chunk.set(rng.random_range(0..NUM_ROWS), col, TileType::Coin);
            }
            col += 1;
        }
    }
    chunk
}

fn tunnel_chunk(difficulty: f64, rng: &mut Pcg32) -> Result<Chunk, EngineError> {
    let template = &TUNNEL_TEMPLATES[rng.random_range(0..TUNNEL_TEMPLATES.len())];
    Chunk::from_ascii(template, difficulty)
}

fn alien_chunk(difficulty: f64, rng: &mut Pcg32) -> Chunk {
    let mut chunk = Chunk::empty(4, difficulty);
    chunk.set(rng.random_range(0..NUM_ROWS), 1, TileType::Alien);
    chunk
}

fn alien_swarm_chunk(difficulty: f64, rng: &mut Pcg32) -> Chunk {
    let count = 2 + (3.0 * difficulty.clamp(0.0, 1.0)).floor() as usize;
    let mut chunk = Chunk::empty(count * 2, difficulty);
    for i in 0..count {
        chunk.set(rng.random_range(0..NUM_ROWS), i * 2, TileType::Alien);
    }
    chunk
}

fn asteroid_chunk(difficulty: f64, rng: &mut Pcg32) -> Chunk {
    let count = 1 + (2.0 * difficulty.clamp(0.0, 1.0)).floor() as usize;
    let mut chunk = Chunk::empty(count * 3, difficulty);
    for i in 0..count {
        let col = i * 3 + rng.random_range(0..2);
        chunk.set(rng.random_range(0..NUM_ROWS), col, TileType::Asteroid);
    }
    chunk
}
