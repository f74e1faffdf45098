//! Frame clocks
//!
//! [`SystemClock`] measures wall time between frames; [`FixedClock`] advances
//! by a constant step for deterministic runs.

use std::time::{Duration, Instant};

use skyfly_core::FrameClock;

/// Longest frame delta reported by [`SystemClock`] (prevents spiral of death)
pub const MAX_DELTA: Duration = Duration::from_millis(100);

/// Monotonic wall clock
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    last: Option<Instant>,
    max_delta: Duration,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
            max_delta: MAX_DELTA,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    /// The first call reports zero
    fn delta_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let delta = match self.last {
            Some(last) => (now - last).min(self.max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        delta.as_secs_f32()
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock advancing a fixed step on every frame
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    elapsed_ms: f64,
}

impl FixedClock {
    /// Clock stepping `step` seconds per frame. Negative or non-finite steps
    /// are treated as zero.
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step >= 0.0 {
            step
        } else {
            tracing::warn!("FixedClock: step must be >= 0.0, got {step}, using 0.0");
            0.0
        };
        Self {
            step,
            elapsed_ms: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl FrameClock for FixedClock {
    fn delta_seconds(&mut self) -> f32 {
        self.elapsed_ms += self.step as f64 * 1000.0;
        self.step
    }

    fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }
}
