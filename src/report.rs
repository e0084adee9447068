use anyhow::Error;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Write;
use tracing::warn;

use crate::api::{EewRecord, QuakeRecord, TsunamiRecord};
use crate::events::PollOutcome;
use crate::scale::{depth_label, grade_label, intensity_label, magnitude_label};

/// Plain-text report of one poll. A failed feed prints an "unavailable"
/// line under its heading; the other feeds print as usual.
pub fn latest_text(outcome: &PollOutcome) -> String {
    let mut out = String::new();

    out.push_str("EARTHQUAKE\n");
    if let Some(quake) = feed_or_note("earthquake", &outcome.quake, &mut out) {
        quake_lines(quake.as_ref(), &mut out);
    }
    out.push('\n');

    out.push_str("TSUNAMI\n");
    if let Some(tsunami) = feed_or_note("tsunami", &outcome.tsunami, &mut out) {
        tsunami_lines(tsunami.as_ref(), &mut out);
    }
    out.push('\n');

    out.push_str("EARLY WARNING (latest issued, freshness not applied)\n");
    if let Some(eew) = feed_or_note("eew", &outcome.eew, &mut out) {
        eew_lines(eew.as_ref(), &mut out);
    }

    out
}

/// JSON report of one poll: the record, `null`, or `{"error": ...}` per feed.
pub fn latest_json(outcome: &PollOutcome) -> Value {
    json!({
        "earthquake": feed_json("earthquake", &outcome.quake),
        "tsunami": feed_json("tsunami", &outcome.tsunami),
        "eew": feed_json("eew", &outcome.eew),
    })
}

fn feed_or_note<'a, T>(
    feed: &str,
    result: &'a Result<Option<T>, Error>,
    out: &mut String,
) -> Option<&'a Option<T>> {
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(feed, error = %message, "feed unavailable");
            let _ = writeln!(out, "   Feed unavailable: {}", message);
            None
        }
    }
}

fn feed_json<T: Serialize>(feed: &str, result: &Result<Option<T>, Error>) -> Value {
    match result {
        Ok(record) => serde_json::to_value(record).unwrap_or_else(|e| json!({ "error": e.to_string() })),
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(feed, error = %message, "feed unavailable");
            json!({ "error": message })
        }
    }
}

fn quake_lines(quake: Option<&QuakeRecord>, out: &mut String) {
    let Some(q) = quake else {
        out.push_str("   No report\n");
        return;
    };
    let _ = writeln!(out, "   Time:          {}", q.time);
    let _ = writeln!(out, "   Epicenter:     {}", q.hypocenter);
    let _ = writeln!(out, "   Magnitude:     {}", magnitude_label(q.magnitude));
    let _ = writeln!(out, "   Depth:         {}", depth_label(q.depth));
    let _ = writeln!(out, "   Max intensity: {}", intensity_label(q.max_scale));
}

fn tsunami_lines(tsunami: Option<&TsunamiRecord>, out: &mut String) {
    match tsunami {
        Some(t) if t.cancelled => {
            let _ = writeln!(out, "   Cancelled ({})", t.time);
        }
        Some(t) => {
            let _ = writeln!(out, "   Issued:        {}", t.time);
            let _ = writeln!(out, "   Highest grade: {}", grade_label(t.max_grade));
            for area in &t.areas {
                let _ = writeln!(out, "   {:<14} {}", grade_label(area.grade), area.name);
            }
        }
        None => out.push_str("   No forecast\n"),
    }
}

fn eew_lines(eew: Option<&EewRecord>, out: &mut String) {
    let Some(e) = eew else {
        out.push_str("   None\n");
        return;
    };
    let kind = if e.is_warning { "Warning" } else { "Forecast" };
    let cancelled = if e.cancelled { " (cancelled)" } else { "" };
    let _ = writeln!(out, "   {} at {}{}", kind, e.time, cancelled);
    let _ = writeln!(out, "   Epicenter:     {}", e.hypocenter);
    let _ = writeln!(out, "   Magnitude:     {}", magnitude_label(e.magnitude));
    let _ = writeln!(out, "   Forecast max:  {}", intensity_label(e.max_scale));
}
