/// Fixed timestep accumulator, in milliseconds.
/// Host frames arrive at whatever rate the browser chooses; game logic and
/// timers only ever advance in whole `step_ms` increments.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed step length.
    step_ms: f32,
    /// Frame time not yet consumed by a step.
    accumulator: f32,
}

/// Maximum steps per host frame (prevents a spiral after a long pause).
const MAX_STEPS_PER_FRAME: u32 = 10;

impl FixedTimestep {
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: f32) -> u32 {
        if frame_ms <= 0.0 || !frame_ms.is_finite() {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_ms).min(self.step_ms * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.step_ms) as u32;
        self.accumulator -= steps as f32 * self.step_ms;
        steps
    }

    /// Forget any partial frame (used when a game restarts).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
