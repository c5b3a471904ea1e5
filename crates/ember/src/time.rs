//! Frame timing and the fixed-step scheduler.
//!
//! [`Time`] is updated by the frame loop at the start of each redraw. Systems
//! read it for the frame delta and total elapsed time.
//!
//! [`FixedTimestep`] decouples simulation from rendering: the frame delta is
//! poured into an accumulator and drained in whole fixed steps. What remains
//! is the fraction of a step that has elapsed since the last simulated tick,
//! which the renderer uses to blend between the last two simulated poses.
//!
//! ```text
//!   frame deltas ─► accumulator ─► step, step, ... (while acc >= step)
//!                                     │
//!                        remainder ───┴─► t = acc / step ─► interpolation
//! ```

use std::time::{Duration, Instant};

/// Default simulation rate.
pub const DEFAULT_FIXED_UPDATES_PER_SECOND: u32 = 50;

/// Frame timing. Owned by [`Context`](crate::context::Context) and updated
/// once per redraw.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start a new frame: the delta is the time since the previous call.
    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.elapsed = now - self.startup;
        self.frame_count += 1;
    }

    /// Wall time the last frame took.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// [`delta`](Self::delta) in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instantaneous frame rate from the last delta; 0 before the first frame.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

// ── FixedTimestep ────────────────────────────────────────────────────────

/// Accumulator-driven fixed-step scheduler.
///
/// Each frame the loop calls [`accumulate`](Self::accumulate) with the frame
/// delta, then [`step_due`](Self::step_due) in a `while` loop, running one
/// simulation step per `true`. Afterwards [`alpha`](Self::alpha) is the
/// interpolation fraction for rendering.
///
/// All due steps run; a long frame produces several steps. Set
/// [`max_frame_delta`](Self::with_max_frame_delta) to bound how much time a
/// single frame can add.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_frame_delta: Option<f32>,
    steps_this_frame: u32,
    total_steps: u64,
}

impl FixedTimestep {
    /// A scheduler running `updates_per_second` steps per simulated second.
    ///
    /// Panics if `updates_per_second` is zero.
    pub fn new(updates_per_second: u32) -> Self {
        assert!(updates_per_second > 0, "fixed update rate must be positive");
        Self::from_step_secs(1.0 / updates_per_second as f32)
    }

    /// A scheduler with an explicit step duration in seconds.
    pub fn from_step_secs(step: f32) -> Self {
        assert!(step > 0.0, "fixed step must be positive");
        Self {
            step,
            accumulator: 0.0,
            max_frame_delta: None,
            steps_this_frame: 0,
            total_steps: 0,
        }
    }

    /// Clamp the per-frame delta fed into the accumulator.
    pub fn with_max_frame_delta(mut self, max: Option<f32>) -> Self {
        self.max_frame_delta = max;
        self
    }

    /// Add a frame's worth of wall time to the accumulator.
    pub fn accumulate(&mut self, frame_delta_secs: f32) {
        let delta = match self.max_frame_delta {
            Some(max) => frame_delta_secs.min(max),
            None => frame_delta_secs,
        };
        self.accumulator += delta.max(0.0);
        self.steps_this_frame = 0;
    }

    /// Consume one step from the accumulator if a whole step is due.
    pub fn step_due(&mut self) -> bool {
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.steps_this_frame += 1;
            self.total_steps += 1;
            true
        } else {
            false
        }
    }

    /// Fraction of a step elapsed since the last simulated tick.
    ///
    /// In `[0, 1)` once all due steps have been drained. Not clamped.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Duration of one fixed step in seconds.
    pub fn step_secs(&self) -> f32 {
        self.step
    }

    /// Time carried over toward the next step.
    pub fn accumulated_secs(&self) -> f32 {
        self.accumulator
    }

    /// Steps run since the last [`accumulate`](Self::accumulate).
    pub fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_UPDATES_PER_SECOND)
    }
}
