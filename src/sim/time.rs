//! Game clock and frame statistics

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TICK_DELTA_MS;

/// Time snapshot for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GameTime {
    /// Clamped time since the previous tick (ms). Zero while the timer isn't running.
    pub ms_since_prev_update: f64,
    /// Accumulated running time (ms). Excludes pauses and clamped-away time.
    pub run_time_ms: f64,
}

impl GameTime {
    #[inline]
    pub fn delta_s(&self) -> f64 {
        self.ms_since_prev_update / 1000.0
    }

    #[inline]
    pub fn run_time_s(&self) -> f64 {
        self.run_time_ms / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// Pausable run clock
#[derive(Debug, Clone)]
pub struct GameTimer {
    state: TimerState,
    prev_ms: f64,
    run_time_ms: f64,
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Stopped,
            prev_ms: 0.0,
            run_time_ms: 0.0,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.state = TimerState::Running;
        self.prev_ms = now_ms;
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Resume a paused timer. The paused interval never counts.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
            self.prev_ms = now_ms;
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Advance to `now_ms` and produce this tick's time
    pub fn record_update(&mut self, now_ms: f64) -> GameTime {
        let delta = if self.is_running() {
            let raw = now_ms - self.prev_ms;
            self.prev_ms = now_ms;
            if raw > MAX_TICK_DELTA_MS {
                log::debug!("Clamping tick delta {raw:.1}ms to {MAX_TICK_DELTA_MS}ms");
            }
            raw.clamp(0.0, MAX_TICK_DELTA_MS)
        } else {
            0.0
        };
        self.run_time_ms += delta;
        GameTime {
            ms_since_prev_update: delta,
            run_time_ms: self.run_time_ms,
        }
    }
}

/// Number of ticks averaged for the FPS estimate
pub const FPS_WINDOW: usize = 60;

/// Tick counter plus a rolling FPS estimate
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_count: u64,
    timestamps: VecDeque<f64>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            timestamps: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    pub fn record_frame(&mut self, now_ms: f64) {
        self.frame_count += 1;
        if self.timestamps.len() == FPS_WINDOW {
            self.timestamps.pop_front();
        }
        self.timestamps.push_back(now_ms);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the window. Zero until two frames are recorded.
    pub fn fps(&self) -> f64 {
        match (self.timestamps.front(), self.timestamps.back()) {
            (Some(first), Some(last)) if last > first => {
                (self.timestamps.len() - 1) as f64 * 1000.0 / (last - first)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stopped_timer_has_zero_delta() {
        let mut timer = GameTimer::new();
        let t = timer.record_update(500.0);
        assert_eq!(t.ms_since_prev_update, 0.0);
        assert_eq!(t.run_time_ms, 0.0);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut timer = GameTimer::new();
        timer.start(0.0);
        let t = timer.record_update(250.0);
        assert_eq!(t.ms_since_prev_update, 100.0);
        assert_eq!(t.run_time_ms, 100.0);
    }

    #[test]
    fn test_backwards_clock_gives_zero_delta() {
        let mut timer = GameTimer::new();
        timer.start(1000.0);
        let t = timer.record_update(900.0);
        assert_eq!(t.ms_since_prev_update, 0.0);
    }

    #[test]
    fn test_pause_excludes_interval() {
        let mut timer = GameTimer::new();
        timer.start(0.0);
        timer.record_update(16.0);
        timer.pause();
        assert_eq!(timer.record_update(5000.0).ms_since_prev_update, 0.0);
        timer.resume(5000.0);
        let t = timer.record_update(5016.0);
        assert_eq!(t.ms_since_prev_update, 16.0);
        assert_eq!(t.run_time_ms, 32.0);
    }

    #[test]
    fn test_fps_window() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.fps(), 0.0);
        for i in 0..120 {
            stats.record_frame(i as f64 * 20.0);
        }
        assert_eq!(stats.frame_count(), 120);
        assert!((stats.fps() - 50.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn test_delta_always_clamped(gaps in prop::collection::vec(-500.0f64..500.0, 1..50)) {
            let mut timer = GameTimer::new();
            let mut now = 0.0;
            timer.start(now);
            let mut expected_run = 0.0;
            for gap in gaps {
                now += gap;
                let t = timer.record_update(now);
                prop_assert!((0.0..=MAX_TICK_DELTA_MS).contains(&t.ms_since_prev_update));
                expected_run += t.ms_since_prev_update;
                prop_assert!((t.run_time_ms - expected_run).abs() < 1e-6);
            }
        }
    }
}
