//! Thread-safe external input queue
//!
//! Producers (any number of presentation-side threads) push through a cloneable
//! `InputSender`. The simulation owns the single `InputReceiver` and drains it once
//! at the start of every tick. The drain swaps the whole buffer out under one lock,
//! so everything pushed after that point lands in the next tick.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::input::{ExternalInput, SensorReading};

type Shared = Arc<Mutex<VecDeque<ExternalInput>>>;

fn lock(shared: &Shared) -> MutexGuard<'_, VecDeque<ExternalInput>> {
    // A producer panicking mid-push can't leave the deque inconsistent
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected sender/receiver pair
pub fn input_queue() -> (InputSender, InputReceiver) {
    let shared: Shared = Arc::new(Mutex::new(VecDeque::new()));
    (
        InputSender {
            shared: Arc::clone(&shared),
        },
        InputReceiver { shared },
    )
}

/// Producer handle
#[derive(Debug, Clone)]
pub struct InputSender {
    shared: Shared,
}

impl InputSender {
    pub fn send(&self, input: ExternalInput) {
        lock(&self.shared).push_back(input);
    }

    pub fn start_game(&self) {
        self.send(ExternalInput::StartGame);
    }

    pub fn restart(&self) {
        self.send(ExternalInput::Restart);
    }

    pub fn pause(&self) {
        self.send(ExternalInput::Pause);
    }

    pub fn resume(&self) {
        self.send(ExternalInput::Resume);
    }

    pub fn set_muted(&self, muted: bool) {
        self.send(if muted {
            ExternalInput::Mute
        } else {
            ExternalInput::Unmute
        });
    }

    pub fn sensor(&self, reading: SensorReading) {
        self.send(ExternalInput::Sensor(reading));
    }
}

/// Consumer handle, owned by the engine
#[derive(Debug)]
pub struct InputReceiver {
    shared: Shared,
}

impl InputReceiver {
    /// Take every queued input, in enqueue order. Never blocks on an empty queue.
    pub fn drain(&self) -> Vec<ExternalInput> {
        let taken = std::mem::take(&mut *lock(&self.shared));
        taken.into()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.shared).is_empty()
    }
}
