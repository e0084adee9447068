use anyhow::Error;

use crate::api::{EewRecord, QuakeRecord, TsunamiRecord};

/// Outcome of one poll of the three feeds. Each slot is independent:
/// `Ok(None)` means the feed had nothing new, `Err` that it failed.
#[derive(Debug)]
pub struct PollOutcome {
    pub quake: Result<Option<QuakeRecord>, Error>,
    pub tsunami: Result<Option<TsunamiRecord>, Error>,
    pub eew: Result<Option<EewRecord>, Error>,
}

/// What a single key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Refresh,
    ShowEarthquake,
    ShowTsunami,
    CycleMode,
    ToggleAuto,
    ToggleMute,
    SoundCheck,
    ToggleHelp,
    CloseHelp,
    ScrollUp,
    ScrollDown,
}
