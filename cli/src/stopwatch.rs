use std::time::Instant;

/// Turns wall-clock time into the once-per-second ticks the game clock expects.
#[derive(Debug, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    delivered: u32,
}

impl Stopwatch {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.delivered = 0;
    }

    /// No more ticks until the next `start`.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Whole seconds passed since the last call, never delivering the same second twice.
    pub fn ticks_due(&mut self, now: Instant) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };

        let total = now.saturating_duration_since(started_at).as_secs();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let due = total.saturating_sub(self.delivered);
        self.delivered = total;
        due
    }
}
