use chrono::{DateTime, Utc};
use tracing::debug;

use crate::api::{EewRecord, QuakeRecord, TsunamiRecord};

#[derive(Debug, Default)]
pub struct DisasterState {
    quake: Option<QuakeRecord>,
    tsunami: Option<TsunamiRecord>,
    eew: Option<EewRecord>,
    eew_window_secs: u64,
}

impl DisasterState {
    pub fn new(eew_window_secs: u64) -> Self {
        Self {
            eew_window_secs,
            ..Self::default()
        }
    }

    pub fn quake(&self) -> Option<&QuakeRecord> {
        self.quake.as_ref()
    }

    pub fn tsunami(&self) -> Option<&TsunamiRecord> {
        self.tsunami.as_ref()
    }

    pub fn eew(&self) -> Option<&EewRecord> {
        self.eew.as_ref()
    }

    pub fn has_eew(&self) -> bool {
        self.eew.is_some()
    }

    /// `true` when the stored record changed.
    pub fn apply_quake(&mut self, record: QuakeRecord) -> bool {
        if self.quake.as_ref() == Some(&record) {
            return false;
        }
        debug!(hypocenter = %record.hypocenter, max_scale = record.max_scale, "earthquake report replaced");
        self.quake = Some(record);
        true
    }

    pub fn apply_tsunami(&mut self, record: TsunamiRecord) -> bool {
        if self.tsunami.as_ref() == Some(&record) {
            return false;
        }
        debug!(max_grade = ?record.max_grade, cancelled = record.cancelled, "tsunami forecast replaced");
        self.tsunami = Some(record);
        true
    }

    /// Replace the early warning. Cancelled, test and stale warnings clear the slot.
    pub fn apply_eew(&mut self, record: EewRecord, now: DateTime<Utc>) -> bool {
        let next = if record.cancelled || record.is_test || !record.is_fresh(now, self.eew_window_secs) {
            None
        } else {
            Some(record)
        };

        if self.eew == next {
            return false;
        }
        debug!(present = next.is_some(), "early warning replaced");
        self.eew = next;
        true
    }

    /// Drop the early warning once it falls out of the freshness window.
    pub fn expire_eew(&mut self, now: DateTime<Utc>) -> bool {
        match &self.eew {
            Some(eew) if !eew.is_fresh(now, self.eew_window_secs) => {
                debug!("early warning expired");
                self.eew = None;
                true
            }
            _ => false,
        }
    }
}
