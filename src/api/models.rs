use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::translate::translate;

/// Feed timestamps without an explicit offset are Japan Standard Time.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Feed code the early-warning endpoint uses for warnings (as opposed to forecasts).
pub const EEW_WARNING_CODE: i32 = 556;

/// Parse a feed timestamp: `YYYY/MM/DD HH:MM[:SS[.fff]]` in JST, or RFC 3339.
pub fn parse_feed_time(raw: &str) -> Result<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }

    let jst = FixedOffset::east_opt(JST_OFFSET_SECS).context("invalid JST offset")?;
    for format in ["%Y/%m/%d %H:%M:%S%.f", "%Y/%m/%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            if let Some(dt) = naive.and_local_timezone(jst).single() {
                return Ok(dt);
            }
        }
    }

    bail!("unrecognised feed time {:?}", raw)
}

/// Tsunami forecast grade, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Grade {
    Watch,
    Warning,
    MajorWarning,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Grade {
    fn rank(&self) -> u8 {
        match self {
            Grade::Unknown => 0,
            Grade::Watch => 1,
            Grade::Warning => 2,
            Grade::MajorWarning => 3,
        }
    }
}

impl Ord for Grade {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Grade {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Raw payloads (one list item of each feed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Hypocenter {
    #[serde(default)]
    pub name: String,
    pub depth: Option<i32>,
    pub magnitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeDetail {
    pub time: Option<String>,
    pub hypocenter: Option<Hypocenter>,
    pub max_scale: Option<i32>,
    pub domestic_tsunami: Option<String>,
}

/// Item of the earthquake report feed.
#[derive(Debug, Clone, Deserialize)]
pub struct QuakePayload {
    pub time: Option<String>,
    pub earthquake: QuakeDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TsunamiAreaPayload {
    #[serde(default)]
    pub grade: Grade,
    #[serde(default)]
    pub immediate: bool,
    #[serde(default)]
    pub name: String,
}

/// Item of the tsunami forecast feed.
#[derive(Debug, Clone, Deserialize)]
pub struct TsunamiPayload {
    pub time: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
    pub issue: Option<Issue>,
    #[serde(default)]
    pub areas: Vec<TsunamiAreaPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewQuake {
    pub origin_time: Option<String>,
    pub hypocenter: Option<Hypocenter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewAreaPayload {
    #[serde(default)]
    pub name: String,
    pub scale_from: Option<i32>,
    pub scale_to: Option<i32>,
}

impl EewAreaPayload {
    /// Forecast intensity for the area; `scaleTo` 99 means "`scaleFrom` or above".
    fn forecast_scale(&self) -> i32 {
        let from = self.scale_from.unwrap_or(-1);
        match self.scale_to {
            Some(99) | None => from,
            Some(to) => to.max(from),
        }
    }
}

/// Item of the earthquake early warning feed.
#[derive(Debug, Clone, Deserialize)]
pub struct EewPayload {
    #[serde(default)]
    pub code: i32,
    pub time: Option<String>,
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub cancelled: bool,
    pub earthquake: Option<EewQuake>,
    #[serde(default)]
    pub areas: Vec<EewAreaPayload>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuakeRecord {
    pub time: DateTime<FixedOffset>,
    pub hypocenter: String,
    pub magnitude: f64,
    pub max_scale: i32,
    pub depth: i32,
    pub domestic_tsunami: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedArea {
    pub grade: Grade,
    pub name: String,
    pub immediate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TsunamiRecord {
    pub time: DateTime<FixedOffset>,
    pub cancelled: bool,
    pub areas: Vec<AffectedArea>,
    pub max_grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EewRecord {
    pub time: DateTime<FixedOffset>,
    pub hypocenter: String,
    pub magnitude: f64,
    pub max_scale: i32,
    pub cancelled: bool,
    pub is_warning: bool,
    pub is_test: bool,
    pub areas: Vec<String>,
}

impl QuakePayload {
    pub fn into_record(self) -> Result<QuakeRecord> {
        let detail = self.earthquake;
        let raw_time = detail
            .time
            .as_deref()
            .or(self.time.as_deref())
            .context("earthquake report has no time")?;
        let hypocenter = detail.hypocenter;

        Ok(QuakeRecord {
            time: parse_feed_time(raw_time)?,
            hypocenter: hypocenter
                .as_ref()
                .map(|h| translate(&h.name))
                .unwrap_or_default(),
            magnitude: hypocenter.as_ref().and_then(|h| h.magnitude).unwrap_or(-1.0),
            max_scale: detail.max_scale.unwrap_or(-1),
            depth: hypocenter.as_ref().and_then(|h| h.depth).unwrap_or(-1),
            domestic_tsunami: detail.domestic_tsunami.unwrap_or_default(),
        })
    }
}

impl TsunamiRecord {
    pub fn new(time: DateTime<FixedOffset>, cancelled: bool, areas: Vec<AffectedArea>) -> Self {
        let max_grade = areas.iter().map(|a| a.grade).max().unwrap_or_default();
        Self {
            time,
            cancelled,
            areas,
            max_grade,
        }
    }

    /// A forecast that has not been cancelled.
    pub fn is_active(&self) -> bool {
        !self.cancelled
    }
}

impl TsunamiPayload {
    pub fn into_record(self) -> Result<TsunamiRecord> {
        let raw_time = self
            .issue
            .as_ref()
            .and_then(|i| i.time.as_deref())
            .or(self.time.as_deref())
            .context("tsunami forecast has no time")?;
        let time = parse_feed_time(raw_time)?;

        let areas = self
            .areas
            .into_iter()
            .map(|a| AffectedArea {
                grade: a.grade,
                name: translate(&a.name),
                immediate: a.immediate,
            })
            .collect();

        Ok(TsunamiRecord::new(time, self.cancelled, areas))
    }
}

impl EewRecord {
    /// Age of the event relative to `now`, in whole seconds.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.time.with_timezone(&Utc)).num_seconds()
    }

    /// Fresh when not older than `window_secs`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window_secs: u64) -> bool {
        self.age_secs(now) <= i64::try_from(window_secs).unwrap_or(i64::MAX)
    }
}

impl EewPayload {
    pub fn into_record(self) -> Result<EewRecord> {
        let quake = self.earthquake;
        let raw_time = quake
            .as_ref()
            .and_then(|q| q.origin_time.as_deref())
            .or(self.time.as_deref())
            .context("early warning has no time")?;
        let time = parse_feed_time(raw_time)?;
        let hypocenter = quake.and_then(|q| q.hypocenter);

        Ok(EewRecord {
            time,
            hypocenter: hypocenter
                .as_ref()
                .map(|h| translate(&h.name))
                .unwrap_or_default(),
            magnitude: hypocenter.as_ref().and_then(|h| h.magnitude).unwrap_or(-1.0),
            max_scale: self
                .areas
                .iter()
                .map(EewAreaPayload::forecast_scale)
                .max()
                .unwrap_or(-1),
            cancelled: self.cancelled,
            is_warning: self.code == EEW_WARNING_CODE,
            is_test: self.test,
            areas: self.areas.iter().map(|a| translate(&a.name)).collect(),
        })
    }
}
