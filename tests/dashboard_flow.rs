//! End-to-end behaviour of the dashboard state machine, fed with parsed
//! feed payloads instead of live HTTP.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use shindo::alert::tone::{AlertPattern, TonePlayer};
use shindo::api::{parse_feed_time, EewPayload, EewRecord, QuakePayload, QuakeRecord, TsunamiPayload, TsunamiRecord};
use shindo::app::{App, ConnectionState};
use shindo::config::DashboardConfig;
use shindo::display::DisplayMode;
use shindo::events::{AppAction, PollOutcome};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<&'static str>>>);

impl Recorder {
    fn played(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

impl TonePlayer for Recorder {
    fn play(&mut self, pattern: &AlertPattern) -> Result<()> {
        self.0.lock().unwrap().push(pattern.name);
        Ok(())
    }
}

fn app() -> (App, Recorder) {
    let recorder = Recorder::default();
    let app = App::with_player(DashboardConfig::default(), Box::new(recorder.clone())).unwrap();
    (app, recorder)
}

fn utc(time: &str) -> DateTime<Utc> {
    parse_feed_time(time).unwrap().with_timezone(&Utc)
}

fn quake(time: &str, max_scale: i32) -> QuakeRecord {
    let json = format!(
        r#"{{"time": "{time}", "earthquake": {{
            "time": "{time}",
            "hypocenter": {{"name": "千葉県東方沖", "depth": 30, "magnitude": 5.2}},
            "maxScale": {max_scale},
            "domesticTsunami": "None"
        }}}}"#
    );
    serde_json::from_str::<QuakePayload>(&json).unwrap().into_record().unwrap()
}

fn tsunami(time: &str, cancelled: bool) -> TsunamiRecord {
    let json = format!(
        r#"{{"time": "{time}", "cancelled": {cancelled}, "issue": {{"time": "{time}"}},
            "areas": [{{"grade": "Watch", "immediate": false, "name": "伊豆諸島"}},
                      {{"grade": "Warning", "immediate": true, "name": "千葉県九十九里・外房"}}]}}"#
    );
    serde_json::from_str::<TsunamiPayload>(&json).unwrap().into_record().unwrap()
}

fn eew(origin: &str, cancelled: bool) -> EewRecord {
    let json = format!(
        r#"{{"code": 556, "time": "{origin}", "cancelled": {cancelled},
            "earthquake": {{"originTime": "{origin}", "hypocenter": {{"name": "石川県能登地方", "magnitude": 6.9}}}},
            "areas": [{{"name": "石川県能登", "scaleFrom": 55, "scaleTo": 60}}]}}"#
    );
    serde_json::from_str::<EewPayload>(&json).unwrap().into_record().unwrap()
}

fn outcome(
    quake: Option<QuakeRecord>,
    tsunami: Option<TsunamiRecord>,
    eew: Option<EewRecord>,
) -> PollOutcome {
    PollOutcome {
        quake: Ok(quake),
        tsunami: Ok(tsunami),
        eew: Ok(eew),
    }
}

#[test]
fn repeated_poll_of_same_event_alerts_once() {
    let (mut app, recorder) = app();
    let now = Instant::now();
    let now_utc = utc("2024/01/01 16:12:00");

    app.apply_poll(outcome(Some(quake("2024/01/01 16:10:00", 40)), None, None), now_utc, now);
    app.apply_poll(outcome(Some(quake("2024/01/01 16:10:00", 40)), None, None), now_utc, now);

    assert_eq!(recorder.played(), vec!["earthquake"]);
    assert_eq!(app.connection_state(), ConnectionState::Connected);
}

#[test]
fn new_event_after_alert_sounds_again() {
    let (mut app, recorder) = app();
    let now = Instant::now();
    let now_utc = utc("2024/01/01 17:00:00");

    app.apply_poll(outcome(Some(quake("2024/01/01 16:10:00", 40)), None, None), now_utc, now);
    app.apply_poll(outcome(Some(quake("2024/01/01 16:40:00", 30)), None, None), now_utc, now);

    assert_eq!(recorder.played(), vec!["earthquake", "earthquake"]);
}

#[test]
fn early_warning_takes_over_and_locks_mode() {
    let (mut app, recorder) = app();
    let now = Instant::now();

    app.apply_poll(
        outcome(None, Some(tsunami("2024/01/01 16:05:00", false)), Some(eew("2024/01/01 16:10:00", false))),
        utc("2024/01/01 16:10:30"),
        now,
    );
    assert_eq!(app.display_mode(), DisplayMode::Eew);
    assert_eq!(recorder.played(), vec!["eew"]);

    app.apply_action(AppAction::ShowTsunami, now);
    app.apply_action(AppAction::CycleMode, now);
    app.apply_action(AppAction::ToggleAuto, now);
    app.on_tick(utc("2024/01/01 16:11:00"), now + Duration::from_secs(60));
    assert_eq!(app.display_mode(), DisplayMode::Eew);
}

#[test]
fn early_warning_expires_back_to_earthquake() {
    let (mut app, _) = app();
    let now = Instant::now();

    app.apply_poll(outcome(None, None, Some(eew("2024/01/01 16:10:00", false))), utc("2024/01/01 16:10:30"), now);
    assert!(app.state().has_eew());

    app.on_tick(utc("2024/01/01 16:13:30"), now + Duration::from_secs(1));
    assert!(!app.state().has_eew());
    assert_eq!(app.display_mode(), DisplayMode::Earthquake);

    app.apply_action(AppAction::ShowTsunami, now);
    assert_eq!(app.display_mode(), DisplayMode::Tsunami);
}

#[test]
fn cancelled_early_warning_clears_panel() {
    let (mut app, _) = app();
    let now = Instant::now();
    let now_utc = utc("2024/01/01 16:10:30");

    app.apply_poll(outcome(None, None, Some(eew("2024/01/01 16:10:00", false))), now_utc, now);
    app.apply_poll(outcome(None, None, Some(eew("2024/01/01 16:10:00", true))), now_utc, now);

    assert!(app.state().eew().is_none());
    assert_eq!(app.display_mode(), DisplayMode::Earthquake);
}

#[test]
fn failed_feed_keeps_previous_record() {
    let (mut app, _) = app();
    let now = Instant::now();
    let now_utc = utc("2024/01/01 17:00:00");

    app.apply_poll(outcome(Some(quake("2024/01/01 16:10:00", 20)), None, None), now_utc, now);
    app.apply_poll(
        PollOutcome {
            quake: Err(anyhow!("connection reset")),
            tsunami: Ok(None),
            eew: Ok(None),
        },
        now_utc,
        now,
    );

    let kept = app.state().quake().expect("previous quake kept");
    assert_eq!(kept.hypocenter, "CHIBA EAST OFFSHORE");
    assert!(app.error_message().unwrap().contains("connection reset"));
    assert_eq!(app.connection_state(), ConnectionState::Connected);
}

#[test]
fn all_feeds_failing_marks_offline() {
    let (mut app, _) = app();
    app.apply_poll(
        PollOutcome {
            quake: Err(anyhow!("timeout")),
            tsunami: Err(anyhow!("timeout")),
            eew: Err(anyhow!("timeout")),
        },
        utc("2024/01/01 17:00:00"),
        Instant::now(),
    );
    assert_eq!(app.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn active_tsunami_alerts_when_quake_is_weak() {
    let (mut app, recorder) = app();
    app.apply_poll(
        outcome(
            Some(quake("2024/01/01 16:10:00", 20)),
            Some(tsunami("2024/01/01 16:15:00", false)),
            None,
        ),
        utc("2024/01/01 16:20:00"),
        Instant::now(),
    );
    assert_eq!(recorder.played(), vec!["tsunami"]);
}

#[test]
fn tsunami_after_strong_quake_still_alerts() {
    let (mut app, recorder) = app();
    let now = Instant::now();

    app.apply_poll(
        outcome(Some(quake("2024/01/01 16:10:00", 70)), None, None),
        utc("2024/01/01 16:11:00"),
        now,
    );
    app.apply_poll(
        outcome(
            Some(quake("2024/01/01 16:10:00", 70)),
            Some(tsunami("2024/01/01 16:22:00", false)),
            None,
        ),
        utc("2024/01/01 16:22:30"),
        now,
    );
    app.apply_poll(
        outcome(
            Some(quake("2024/01/01 16:10:00", 70)),
            Some(tsunami("2024/01/01 16:22:00", false)),
            None,
        ),
        utc("2024/01/01 16:23:00"),
        now,
    );

    assert_eq!(recorder.played(), vec!["earthquake", "tsunami"]);
}

#[test]
fn expired_early_warning_does_not_replay_quake() {
    let (mut app, recorder) = app();
    let now = Instant::now();

    app.apply_poll(outcome(Some(quake("2024/01/01 16:00:00", 40)), None, None), utc("2024/01/01 16:01:00"), now);
    app.apply_poll(
        outcome(Some(quake("2024/01/01 16:00:00", 40)), None, Some(eew("2024/01/01 16:10:00", false))),
        utc("2024/01/01 16:10:30"),
        now,
    );
    app.on_tick(utc("2024/01/01 16:14:00"), now + Duration::from_secs(1));

    assert!(!app.state().has_eew());
    assert_eq!(recorder.played(), vec!["earthquake", "eew"]);
}

#[test]
fn panels_rotate_until_manual_selection() {
    let (mut app, _) = app();
    let start = Instant::now();
    let now_utc = utc("2024/01/01 17:00:00");

    app.on_tick(now_utc, start + Duration::from_secs(11));
    assert_eq!(app.display_mode(), DisplayMode::Tsunami);

    app.apply_action(AppAction::ShowEarthquake, start + Duration::from_secs(12));
    app.on_tick(now_utc, start + Duration::from_secs(60));
    assert_eq!(app.display_mode(), DisplayMode::Earthquake);
}

#[test]
fn quit_action_stops_loop() {
    let (mut app, _) = app();
    app.apply_action(AppAction::Quit, Instant::now());
    assert!(app.should_quit());
}
