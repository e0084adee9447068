//! Severity labels for JMA seismic intensity codes and tsunami grades.

use crate::api::Grade;

/// Human label for a JMA intensity code as published by the feed.
pub fn intensity_label(code: i32) -> &'static str {
    match code {
        -1 => "UNKNOWN",
        0 => "0",
        10 => "1",
        20 => "2",
        30 => "3",
        40 => "4",
        45 => "5- (LOWER)",
        46 => "5- OR ABOVE (EST)",
        50 => "5+ (UPPER)",
        55 => "6- (LOWER)",
        60 => "6+ (UPPER)",
        70 => "7 (MAX)",
        _ => "?",
    }
}

pub fn grade_label(grade: Grade) -> &'static str {
    match grade {
        Grade::MajorWarning => "MAJOR WARNING",
        Grade::Warning => "WARNING",
        Grade::Watch => "ADVISORY",
        Grade::Unknown => "INFO",
    }
}

/// Label for the `domesticTsunami` comment attached to earthquake reports.
pub fn tsunami_comment(value: &str) -> &'static str {
    match value {
        "None" => "NO TSUNAMI",
        "Checking" => "CHECKING",
        "NonEffective" => "MINOR SEA LEVEL CHANGE",
        "Watch" => "ADVISORY",
        "Warning" => "WARNING",
        _ => "UNKNOWN",
    }
}

/// Depth in km, with -1 meaning unknown and 0 meaning very shallow.
pub fn depth_label(depth: i32) -> String {
    match depth {
        d if d < 0 => "UNKNOWN".to_string(),
        0 => "SHALLOW".to_string(),
        d => format!("{}KM", d),
    }
}

pub fn magnitude_label(magnitude: f64) -> String {
    if magnitude < 0.0 {
        "M--".to_string()
    } else {
        format!("M{:.1}", magnitude)
    }
}
