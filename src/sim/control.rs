//! Ship control: tilt integration and the per-tick control state

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::platform::input::SensorReading;

/// Vertical steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

/// Validated control input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub direction: Direction,
    /// Steering strength in [0, 1]
    pub magnitude: f32,
    pub shooting: bool,
}

impl ControlState {
    pub fn new(direction: Direction, magnitude: f32, shooting: bool) -> Result<Self, EngineError> {
        // Written so NaN fails too
        if !(0.0..=1.0).contains(&magnitude) {
            return Err(EngineError::InvalidMagnitude(magnitude));
        }
        Ok(Self {
            direction,
            magnitude,
            shooting,
        })
    }
}

/// Assumed gyroscope sample period (s)
const SENSOR_SAMPLE_PERIOD_S: f32 = 1.0 / 60.0;
/// Fraction of the integrated pitch kept per sample, pulls slowly back to level
const PITCH_LEAK: f32 = 0.995;
/// Pitch (rad) at which steering saturates
const MAX_PITCH: f32 = 0.5;
/// Pitch (rad) below which the device counts as level
const PITCH_DEAD_ZONE: f32 = 0.05;

/// Integrates gyroscope pitch rate into a device tilt
#[derive(Debug, Clone, Default)]
pub struct TiltController {
    pitch: f32,
}

impl TiltController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, reading: SensorReading) {
        self.pitch =
            (self.pitch * PITCH_LEAK + reading.y * SENSOR_SAMPLE_PERIOD_S).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Direction and magnitude implied by the current tilt
    pub fn tilt_state(&self) -> (Direction, f32) {
        let abs = self.pitch.abs();
        if abs < PITCH_DEAD_ZONE {
            return (Direction::None, 0.0);
        }
        let magnitude = ((abs - PITCH_DEAD_ZONE) / (MAX_PITCH - PITCH_DEAD_ZONE)).min(1.0);
        let direction = if self.pitch > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        (direction, magnitude)
    }
}
