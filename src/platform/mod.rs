//! Platform abstraction layer
//!
//! Handles the boundary between the presentation side and the simulation:
//! - Input events (closed `ExternalInput` set, raw touch translation)
//! - Thread-safe input queue
//! - Time sources

pub mod input;
pub mod queue;
pub mod time;

pub use input::{ExternalInput, MotionPhase, RawTouch, SensorReading, translate_touch};
pub use queue::{InputReceiver, InputSender, input_queue};
pub use time::{Clock, ManualClock, StepClock, SystemClock};
