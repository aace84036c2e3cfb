//! Fixed-timestep driver.
//!
//! Real elapsed time is fed into an accumulator and drained in whole
//! simulation steps. Leftover time is carried into the next frame, so the
//! simulation speed does not depend on the frame rate.

use std::time::{Duration, Instant};

/// Longest frame time fed into the accumulator. Longer stalls (suspend,
/// a debugger, a blocked terminal) are not replayed.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

pub struct GameLoop {
    last_update: Instant,
    accumulator: Duration,
    fixed_timestep: Duration,
}

impl GameLoop {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            last_update: Instant::now(),
            accumulator: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64),
        }
    }

    /// Measure the wall-clock time since the previous call and run as many
    /// steps as fit. Returns the number of steps run.
    pub fn tick<F>(&mut self, update_fn: F) -> u32
    where
        F: FnMut(Duration),
    {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_update);
        self.last_update = now;
        self.advance(frame_time, update_fn)
    }

    /// Feed `frame_time` into the accumulator and run whole steps.
    pub fn advance<F>(&mut self, frame_time: Duration, mut update_fn: F) -> u32
    where
        F: FnMut(Duration),
    {
        self.accumulator += frame_time.min(MAX_FRAME_TIME);

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep {
            update_fn(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Drop any pending time, e.g. after a pause or a menu screen.
    pub fn reset(&mut self) {
        self.last_update = Instant::now();
        self.accumulator = Duration::ZERO;
    }

    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Time carried over to the next frame.
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}
