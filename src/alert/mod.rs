pub mod tone;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use crate::state::DisasterState;
use tone::{eew_pattern, quake_pattern, tsunami_pattern, AlertPattern, TonePlayer};

/// Intensity code that makes an earthquake report audible (shindo 3).
pub const DEFAULT_ALERT_THRESHOLD: i32 = 30;

/// Alert kinds, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Eew,
    Earthquake,
    Tsunami,
}

impl AlertKind {
    pub fn pattern(&self) -> AlertPattern {
        match self {
            AlertKind::Eew => eew_pattern(),
            AlertKind::Earthquake => quake_pattern(),
            AlertKind::Tsunami => tsunami_pattern(),
        }
    }

    fn slot(&self) -> usize {
        match self {
            AlertKind::Eew => 0,
            AlertKind::Earthquake => 1,
            AlertKind::Tsunami => 2,
        }
    }
}

/// Every alertable record in `state` with its event time, in priority order.
pub fn candidates(state: &DisasterState, threshold: i32) -> Vec<(AlertKind, DateTime<FixedOffset>)> {
    let eew = state.eew().map(|e| (AlertKind::Eew, e.time));
    let quake = state
        .quake()
        .filter(|q| q.max_scale >= threshold)
        .map(|q| (AlertKind::Earthquake, q.time));
    let tsunami = state
        .tsunami()
        .filter(|t| t.is_active())
        .map(|t| (AlertKind::Tsunami, t.time));
    [eew, quake, tsunami].into_iter().flatten().collect()
}

pub struct Alerter {
    player: Box<dyn TonePlayer>,
    threshold: i32,
    muted: bool,
    /// Last alerted event time per kind, indexed by `AlertKind::slot`.
    last_alerted: [Option<DateTime<FixedOffset>>; 3],
}

impl Alerter {
    pub fn new(player: Box<dyn TonePlayer>, threshold: i32, muted: bool) -> Self {
        Self {
            player,
            threshold,
            muted,
            last_alerted: [None; 3],
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn last_alerted(&self, kind: AlertKind) -> Option<DateTime<FixedOffset>> {
        self.last_alerted[kind.slot()]
    }

    /// Sound the highest-priority event that has not been alerted yet.
    ///
    /// Every new event seen in this pass is marked, including ones outranked
    /// by the sound that plays, and events are marked even when muted or when
    /// playback fails. An event therefore never sounds twice.
    pub fn evaluate(&mut self, state: &DisasterState) -> Option<AlertKind> {
        let mut chosen = None;
        for (kind, time) in candidates(state, self.threshold) {
            let slot = &mut self.last_alerted[kind.slot()];
            if *slot == Some(time) {
                continue;
            }
            *slot = Some(time);
            match chosen {
                None => chosen = Some((kind, time)),
                Some((top, _)) => debug!(?kind, outranked_by = ?top, event_time = %time, "alert folded"),
            }
        }

        let (kind, time) = chosen?;
        info!(?kind, event_time = %time, muted = self.muted, "alert triggered");
        if !self.muted {
            self.sound(kind);
        }
        Some(kind)
    }

    /// Play a pattern outside the dedup bookkeeping (sound check).
    pub fn sound(&mut self, kind: AlertKind) {
        if let Err(e) = self.player.play(&kind.pattern()) {
            warn!(error = %e, "failed to play alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{parse_feed_time, AffectedArea, EewRecord, Grade, QuakeRecord, TsunamiRecord};
    use anyhow::Result;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    impl TonePlayer for Recorder {
        fn play(&mut self, pattern: &AlertPattern) -> Result<()> {
            self.0.lock().unwrap().push(pattern.name);
            Ok(())
        }
    }

    fn quake(time: &str, max_scale: i32) -> QuakeRecord {
        QuakeRecord {
            time: parse_feed_time(time).unwrap(),
            hypocenter: "CHIBA EAST OFFSHORE".into(),
            magnitude: 5.1,
            max_scale,
            depth: 40,
            domestic_tsunami: "None".into(),
        }
    }

    fn tsunami(time: &str, cancelled: bool) -> TsunamiRecord {
        TsunamiRecord::new(
            parse_feed_time(time).unwrap(),
            cancelled,
            vec![AffectedArea {
                grade: Grade::Watch,
                name: "IZU ISLANDS".into(),
                immediate: false,
            }],
        )
    }

    fn eew(time: &str) -> EewRecord {
        EewRecord {
            time: parse_feed_time(time).unwrap(),
            hypocenter: "NOTO".into(),
            magnitude: 7.0,
            max_scale: 60,
            cancelled: false,
            is_warning: true,
            is_test: false,
            areas: Vec::new(),
        }
    }

    fn alerter() -> (Alerter, Recorder) {
        let recorder = Recorder::default();
        let alerter = Alerter::new(Box::new(recorder.clone()), DEFAULT_ALERT_THRESHOLD, false);
        (alerter, recorder)
    }

    #[test]
    fn same_timestamp_sounds_once() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);

        state.apply_quake(quake("2024/01/01 16:10:00", 40));
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Earthquake));
        state.apply_quake(quake("2024/01/01 16:10:00", 45));
        assert_eq!(alerter.evaluate(&state), None);

        assert_eq!(*recorder.0.lock().unwrap(), vec!["earthquake"]);
    }

    #[test]
    fn weak_quake_is_silent() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);
        state.apply_quake(quake("2024/01/01 16:10:00", 20));
        assert_eq!(alerter.evaluate(&state), None);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn eew_outranks_quake_and_tsunami() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);
        let now = parse_feed_time("2024/01/01 16:10:20").unwrap().with_timezone(&Utc);

        state.apply_tsunami(tsunami("2024/01/01 16:05:00", false));
        state.apply_quake(quake("2024/01/01 16:00:00", 50));
        state.apply_eew(eew("2024/01/01 16:10:00"), now);

        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Eew));
        assert_eq!(*recorder.0.lock().unwrap(), vec!["eew"]);
    }

    #[test]
    fn quake_outranks_tsunami() {
        let (mut alerter, _) = alerter();
        let mut state = DisasterState::new(180);
        state.apply_tsunami(tsunami("2024/01/01 16:05:00", false));
        state.apply_quake(quake("2024/01/01 16:00:00", 30));
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Earthquake));
    }

    #[test]
    fn cancelled_tsunami_is_silent() {
        let (mut alerter, _) = alerter();
        let mut state = DisasterState::new(180);
        state.apply_tsunami(tsunami("2024/01/01 16:05:00", true));
        assert_eq!(alerter.evaluate(&state), None);

        state.apply_tsunami(tsunami("2024/01/01 16:07:00", false));
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Tsunami));
    }

    #[test]
    fn muted_alert_is_recorded_but_not_played() {
        let recorder = Recorder::default();
        let mut alerter = Alerter::new(Box::new(recorder.clone()), DEFAULT_ALERT_THRESHOLD, true);
        let mut state = DisasterState::new(180);
        state.apply_quake(quake("2024/01/01 16:10:00", 70));

        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Earthquake));
        assert!(recorder.0.lock().unwrap().is_empty());

        alerter.toggle_mute();
        assert_eq!(alerter.evaluate(&state), None);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn tsunami_sounds_after_alerted_quake() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);

        state.apply_quake(quake("2024/01/01 16:10:00", 70));
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Earthquake));
        state.apply_tsunami(tsunami("2024/01/01 16:22:00", false));
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Tsunami));
        assert_eq!(alerter.evaluate(&state), None);

        assert_eq!(*recorder.0.lock().unwrap(), vec!["earthquake", "tsunami"]);
    }

    #[test]
    fn expired_eew_does_not_replay_quake() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);

        state.apply_quake(quake("2024/01/01 16:00:00", 40));
        alerter.evaluate(&state);
        let now = parse_feed_time("2024/01/01 16:10:20").unwrap().with_timezone(&Utc);
        state.apply_eew(eew("2024/01/01 16:10:00"), now);
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Eew));

        let later = parse_feed_time("2024/01/01 16:14:00").unwrap().with_timezone(&Utc);
        assert!(state.expire_eew(later));
        assert_eq!(alerter.evaluate(&state), None);

        assert_eq!(*recorder.0.lock().unwrap(), vec!["earthquake", "eew"]);
        assert_eq!(
            alerter.last_alerted(AlertKind::Earthquake),
            Some(parse_feed_time("2024/01/01 16:00:00").unwrap())
        );
    }

    #[test]
    fn outranked_events_in_one_pass_sound_once() {
        let (mut alerter, recorder) = alerter();
        let mut state = DisasterState::new(180);
        let now = parse_feed_time("2024/01/01 16:10:20").unwrap().with_timezone(&Utc);

        state.apply_quake(quake("2024/01/01 16:00:00", 50));
        state.apply_eew(eew("2024/01/01 16:10:00"), now);
        assert_eq!(alerter.evaluate(&state), Some(AlertKind::Eew));
        assert_eq!(alerter.evaluate(&state), None);

        assert_eq!(*recorder.0.lock().unwrap(), vec!["eew"]);
    }
}
