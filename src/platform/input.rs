//! External input records
//!
//! `ExternalInput` is the closed set of inputs the engine accepts. Raw platform
//! touch events are translated into it by `translate_touch`, which drops anything
//! malformed instead of letting it reach the engine.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::settings::Dimensions;

/// Phase of a pointer motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    Down,
    Move,
    Up,
    Cancel,
}

// Android MotionEvent action codes
const ACTION_DOWN: u8 = 0;
const ACTION_UP: u8 = 1;
const ACTION_MOVE: u8 = 2;
const ACTION_CANCEL: u8 = 3;
const ACTION_POINTER_DOWN: u8 = 5;
const ACTION_POINTER_UP: u8 = 6;

/// Decodes the Android action codes, with pointer down/up folded into down/up
impl TryFrom<u8> for MotionPhase {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            ACTION_DOWN | ACTION_POINTER_DOWN => Ok(MotionPhase::Down),
            ACTION_UP | ACTION_POINTER_UP => Ok(MotionPhase::Up),
            ACTION_MOVE => Ok(MotionPhase::Move),
            ACTION_CANCEL => Ok(MotionPhase::Cancel),
            other => Err(EngineError::UnknownMotionPhase(other)),
        }
    }
}

/// Gyroscope sample: angular rate around each axis (rad/s)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Inputs accepted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExternalInput {
    StartGame,
    Restart,
    Pause,
    Resume,
    Mute,
    Unmute,
    /// Pointer motion in screen pixels
    Motion {
        pointer_id: u32,
        phase: MotionPhase,
        x: f32,
        y: f32,
    },
    Sensor(SensorReading),
}

impl ExternalInput {
    /// Payload check. Non-finite values should have been dropped upstream.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self {
            ExternalInput::Motion { x, y, .. } if !(x.is_finite() && y.is_finite()) => Err(
                EngineError::MalformedInput("motion coordinates must be finite"),
            ),
            ExternalInput::Sensor(r) if !(r.x.is_finite() && r.y.is_finite() && r.z.is_finite()) => {
                Err(EngineError::MalformedInput("sensor values must be finite"))
            }
            _ => Ok(()),
        }
    }
}

/// Raw touch sample as delivered by the platform (Android-style action codes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouch {
    pub pointer_id: i32,
    pub action: i32,
    pub x: f32,
    pub y: f32,
}

/// Translate a raw touch into an engine input.
///
/// Platform touch data isn't always well-formed. Malformed samples are logged and
/// dropped here so the engine only ever sees valid `Motion` inputs. Off-screen
/// downs and moves are dropped too; an off-screen up becomes a cancel so the
/// pointer is still released without activating anything.
pub fn translate_touch(raw: &RawTouch, dims: &Dimensions) -> Option<ExternalInput> {
    if raw.pointer_id < 0 {
        log::warn!("Dropping touch with negative pointer id {}", raw.pointer_id);
        return None;
    }
    if !(raw.x.is_finite() && raw.y.is_finite()) {
        log::warn!("Dropping touch with non-finite coordinates ({}, {})", raw.x, raw.y);
        return None;
    }

    let phase = match u8::try_from(raw.action).map(MotionPhase::try_from) {
        Ok(Ok(phase)) => phase,
        _ => {
            log::warn!("Unhandled touch action {}", raw.action);
            return None;
        }
    };

    let (x, y) = (raw.x as f64, raw.y as f64);
    let on_screen =
        (0.0..dims.screen_width).contains(&x) && (0.0..dims.screen_height).contains(&y);
    let phase = match phase {
        _ if on_screen => phase,
        MotionPhase::Up | MotionPhase::Cancel => MotionPhase::Cancel,
        MotionPhase::Down | MotionPhase::Move => {
            log::warn!("Dropping off-screen touch at ({}, {})", raw.x, raw.y);
            return None;
        }
    };

    Some(ExternalInput::Motion {
        pointer_id: raw.pointer_id as u32,
        phase,
        x: raw.x,
        y: raw.y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pointer_id: i32, action: i32, x: f32, y: f32) -> RawTouch {
        RawTouch {
            pointer_id,
            action,
            x,
            y,
        }
    }

    fn dims() -> Dimensions {
        Dimensions::from_screen(1000, 600)
    }

    #[test]
    fn test_translate_touch_phases() {
        let dims = dims();
        let down = translate_touch(&raw(1, ACTION_POINTER_DOWN as i32, 3.0, 4.0), &dims);
        assert_eq!(
            down,
            Some(ExternalInput::Motion {
                pointer_id: 1,
                phase: MotionPhase::Down,
                x: 3.0,
                y: 4.0
            })
        );
        assert!(matches!(
            translate_touch(&raw(0, ACTION_CANCEL as i32, 0.0, 0.0), &dims),
            Some(ExternalInput::Motion {
                phase: MotionPhase::Cancel,
                ..
            })
        ));
    }

    #[test]
    fn test_translate_touch_drops_malformed() {
        let dims = dims();
        let down = ACTION_DOWN as i32;
        let moved = ACTION_MOVE as i32;
        assert_eq!(translate_touch(&raw(-1, down, 0.0, 0.0), &dims), None);
        assert_eq!(translate_touch(&raw(0, moved, f32::NAN, 0.0), &dims), None);
        assert_eq!(translate_touch(&raw(0, moved, 0.0, f32::INFINITY), &dims), None);
        // ACTION_OUTSIDE isn't something we translate
        assert_eq!(translate_touch(&raw(0, 4, 0.0, 0.0), &dims), None);
        assert_eq!(translate_touch(&raw(0, 300, 0.0, 0.0), &dims), None);
        assert_eq!(translate_touch(&raw(0, -1, 0.0, 0.0), &dims), None);
    }

    #[test]
    fn test_translate_touch_off_screen() {
        let dims = dims();
        assert_eq!(
            translate_touch(&raw(0, ACTION_DOWN as i32, -1.0, 10.0), &dims),
            None
        );
        assert_eq!(
            translate_touch(&raw(0, ACTION_MOVE as i32, 10.0, 600.0), &dims),
            None
        );
        assert_eq!(
            translate_touch(&raw(0, ACTION_DOWN as i32, 5000.0, 5000.0), &dims),
            None
        );
        // Lifting off-screen still releases the pointer, without a click
        assert_eq!(
            translate_touch(&raw(2, ACTION_UP as i32, 1200.0, 10.0), &dims),
            Some(ExternalInput::Motion {
                pointer_id: 2,
                phase: MotionPhase::Cancel,
                x: 1200.0,
                y: 10.0
            })
        );
        assert!(matches!(
            translate_touch(&raw(0, ACTION_UP as i32, 999.0, 599.0), &dims),
            Some(ExternalInput::Motion {
                phase: MotionPhase::Up,
                ..
            })
        ));
    }

    #[test]
    fn test_motion_phase_decoder() {
        assert_eq!(MotionPhase::try_from(0), Ok(MotionPhase::Down));
        assert_eq!(MotionPhase::try_from(1), Ok(MotionPhase::Up));
        assert_eq!(MotionPhase::try_from(2), Ok(MotionPhase::Move));
        assert_eq!(MotionPhase::try_from(3), Ok(MotionPhase::Cancel));
        assert_eq!(MotionPhase::try_from(6), Ok(MotionPhase::Up));
        assert_eq!(
            MotionPhase::try_from(9),
            Err(EngineError::UnknownMotionPhase(9))
        );
    }

    #[test]
    fn test_validate_rejects_non_finite_payloads() {
        let bad_motion = ExternalInput::Motion {
            pointer_id: 0,
            phase: MotionPhase::Down,
            x: f32::NAN,
            y: 0.0,
        };
        assert!(matches!(
            bad_motion.validate(),
            Err(EngineError::MalformedInput(_))
        ));
        let bad_sensor = ExternalInput::Sensor(SensorReading {
            x: 0.0,
            y: f32::NEG_INFINITY,
            z: 0.0,
        });
        assert!(bad_sensor.validate().is_err());
        assert!(ExternalInput::Pause.validate().is_ok());
    }
}
