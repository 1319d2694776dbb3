//! Time sources
//!
//! The engine reads its clock exactly once per tick. Production uses the monotonic
//! system clock; tests use a manual or fixed-step clock so runs are reproducible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Millisecond time source
pub trait Clock: Send {
    fn now_ms(&mut self) -> f64;
}

/// Monotonic wall clock, zeroed at construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Externally controlled clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_ms.to_bits())),
        }
    }

    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, ms: f64) {
        self.set(self.get() + ms);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> f64 {
        self.get()
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug, Clone)]
pub struct StepClock {
    now: f64,
    step: f64,
}

impl StepClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            now: 0.0,
            step: step_ms,
        }
    }
}

impl Clock for StepClock {
    fn now_ms(&mut self) -> f64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}
