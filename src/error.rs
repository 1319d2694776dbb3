//! Error types
//!
//! `EngineError` values are contract violations: they mean an upstream invariant was
//! already broken, so the tick that hit one is aborted and the error is propagated to
//! whoever drives the engine. Recoverable platform noise (bad touch samples) never
//! becomes an `EngineError`; it is dropped at the translation boundary instead.

use thiserror::Error;

use crate::sim::chunk::TileType;
use crate::sim::state::GameState;

/// Fatal simulation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown tile character {0:?}")]
    UnknownTile(char),

    #[error("tile type {0:?} does not produce an entity")]
    UnsupportedTile(TileType),

    #[error("malformed chunk: row {row} has {actual} columns, expected {expected}")]
    MalformedChunk {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown motion phase code {0}")]
    UnknownMotionPhase(u8),

    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    #[error("control magnitude {0} outside [0, 1]")]
    InvalidMagnitude(f32),

    #[error("invalid game state transition {from:?} -> {to:?}")]
    InvalidTransition { from: GameState, to: GameState },

    #[error("draw layer {layer} out of range (have {num_layers} layers)")]
    DrawLayerOutOfRange { layer: usize, num_layers: usize },
}

/// Errors loading or validating engine settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors from the simulation thread
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("simulation thread is gone")]
    Disconnected,
}
