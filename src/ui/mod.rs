pub mod eew;
pub mod quake;
pub mod tsunami;

pub use eew::EewView;
pub use quake::QuakeView;
pub use tsunami::TsunamiView;

use chrono::{DateTime, FixedOffset};
use ratatui::style::Color;

use crate::api::Grade;

/// Colour ramp for intensity codes, following the JMA map palette loosely.
pub fn intensity_color(code: i32) -> Color {
    match code {
        c if c >= 60 => Color::Magenta,
        c if c >= 50 => Color::Red,
        c if c >= 45 => Color::LightRed,
        c if c >= 40 => Color::Yellow,
        c if c >= 30 => Color::LightYellow,
        c if c >= 10 => Color::Cyan,
        _ => Color::Gray,
    }
}

pub fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::MajorWarning => Color::Magenta,
        Grade::Warning => Color::Red,
        Grade::Watch => Color::Yellow,
        Grade::Unknown => Color::Gray,
    }
}

pub fn time_display(time: &DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%d %H:%M:%S (UTC%:z)").to_string()
}

/// Placeholder for names the feed left blank.
pub fn name_or_unknown(name: &str) -> &str {
    if name.is_empty() {
        "UNKNOWN"
    } else {
        name
    }
}
