//! Movement domain: countdown timer for grace windows and cooldowns.

/// Countdown used for the various grace windows (coyote-style ground/air
/// debounce, wall release, post-wall-jump input delay, dash duration).
///
/// After `reset()` the timer is running; `update(dt)` accumulates time and
/// returns true exactly once, on the tick where the configured duration is
/// first reached. From that tick on `has_finished()` stays true until the
/// next `reset()`.
#[derive(Debug, Clone)]
pub struct GraceTimer {
    duration: f32,
    elapsed: f32,
    running: bool,
    finished: bool,
}

impl GraceTimer {
    pub fn new(duration: f32) -> Self {
        debug_assert!(duration >= 0.0, "GraceTimer duration must be non-negative");
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            running: false,
            finished: false,
        }
    }

    /// Restart the countdown from zero.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
        self.finished = false;
    }

    /// Advance the countdown. Returns true only on the crossing tick.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.running = false;
            self.finished = true;
            return true;
        }

        false
    }

    /// Force the terminal state without waiting out the countdown.
    /// Used when a jump must count as airborne immediately.
    pub fn finish(&mut self) {
        self.running = false;
        self.finished = true;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn has_finished(&self) -> bool {
        self.finished
    }

    pub fn remaining(&self) -> f32 {
        if self.running {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once_per_reset_cycle() {
        let mut timer = GraceTimer::new(0.1);
        timer.reset();

        assert!(!timer.update(0.04));
        assert!(!timer.update(0.04));
        assert!(timer.update(0.04));
        // Terminal: no further fires, flag stays set.
        assert!(!timer.update(0.04));
        assert!(timer.has_finished());
        assert!(!timer.running());
    }

    #[test]
    fn reset_clears_finished_flag() {
        let mut timer = GraceTimer::new(0.05);
        timer.reset();
        timer.update(0.1);
        assert!(timer.has_finished());

        timer.reset();
        assert!(!timer.has_finished());
        assert!(timer.running());
    }

    #[test]
    fn not_running_before_first_reset() {
        let mut timer = GraceTimer::new(0.05);
        assert!(!timer.running());
        assert!(!timer.has_finished());
        assert!(!timer.update(1.0));
        assert!(!timer.has_finished());
    }

    #[test]
    fn zero_duration_fires_on_first_update() {
        let mut timer = GraceTimer::new(0.0);
        timer.reset();
        assert!(timer.update(0.016));
    }

    #[test]
    fn finish_forces_terminal_state() {
        let mut timer = GraceTimer::new(1.0);
        timer.reset();
        timer.finish();
        assert!(timer.has_finished());
        assert!(!timer.update(0.016));
    }

    #[test]
    fn remaining_counts_down_and_clamps() {
        let mut timer = GraceTimer::new(0.2);
        timer.reset();
        timer.update(0.05);
        assert!((timer.remaining() - 0.15).abs() < 1e-6);
        timer.update(1.0);
        assert_eq!(timer.remaining(), 0.0);
    }
}
