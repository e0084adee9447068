use std::time::{Duration, Instant};

/// Periodic timer driven by the caller's clock.
///
/// A stopped ticker never fires. `fire` re-arms from the moment it fired,
/// so a late check does not cause a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
