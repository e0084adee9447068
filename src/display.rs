use std::time::{Duration, Instant};
use tracing::info;

use crate::scheduler::Ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Earthquake,
    Tsunami,
    Eew,
}

impl DisplayMode {
    pub fn title(&self) -> &'static str {
        match self {
            DisplayMode::Earthquake => "EARTHQUAKE",
            DisplayMode::Tsunami => "TSUNAMI",
            DisplayMode::Eew => "EEW",
        }
    }

    /// The other rotating mode. `Eew` does not rotate.
    fn alternate(&self) -> DisplayMode {
        match self {
            DisplayMode::Earthquake => DisplayMode::Tsunami,
            DisplayMode::Tsunami => DisplayMode::Earthquake,
            DisplayMode::Eew => DisplayMode::Eew,
        }
    }
}

pub struct DisplayController {
    mode: DisplayMode,
    auto_rotate: bool,
    rotation: Ticker,
}

impl DisplayController {
    pub fn new(rotate_every: Duration, now: Instant) -> Self {
        let mut rotation = Ticker::new(rotate_every);
        rotation.start(now);
        Self {
            mode: DisplayMode::Earthquake,
            auto_rotate: true,
            rotation,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Manual switching is disabled while an early warning is shown.
    pub fn is_locked(&self) -> bool {
        self.mode == DisplayMode::Eew
    }

    pub fn rotation_remaining(&self, now: Instant) -> Option<Duration> {
        self.rotation.remaining(now)
    }

    /// Follow the presence of an early warning: force `Eew` when one appears
    /// and fall back to `Earthquake` when it clears.
    pub fn sync(&mut self, eew_present: bool, now: Instant) {
        match (eew_present, self.mode) {
            (true, DisplayMode::Eew) | (false, DisplayMode::Earthquake | DisplayMode::Tsunami) => {}
            (true, _) => {
                info!("early warning active, forcing EEW display");
                self.mode = DisplayMode::Eew;
                self.rotation.stop();
            }
            (false, DisplayMode::Eew) => {
                info!("early warning cleared, back to earthquake display");
                self.mode = DisplayMode::Earthquake;
                self.restart_rotation(now);
            }
        }
    }

    /// Advance auto-rotation. Returns `true` when the mode changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.rotation.fire(now) {
            return false;
        }
        self.mode = self.mode.alternate();
        true
    }

    /// Pick a mode by hand, which stops auto-rotation. Only the rotating
    /// modes can be selected, and nothing while an early warning is shown.
    pub fn select(&mut self, mode: DisplayMode) -> bool {
        if self.is_locked() || mode == DisplayMode::Eew {
            return false;
        }
        self.mode = mode;
        self.auto_rotate = false;
        self.rotation.stop();
        true
    }

    /// Manual step to the other rotating mode.
    pub fn cycle(&mut self) -> bool {
        let next = self.mode.alternate();
        self.select(next)
    }

    pub fn toggle_auto(&mut self, now: Instant) -> bool {
        if self.is_locked() {
            return false;
        }
        self.auto_rotate = !self.auto_rotate;
        self.restart_rotation(now);
        true
    }

    fn restart_rotation(&mut self, now: Instant) {
        if self.auto_rotate && !self.is_locked() {
            self.rotation.start(now);
        } else {
            self.rotation.stop();
        }
    }
}
