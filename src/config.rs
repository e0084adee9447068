use std::time::Duration;

use crate::alert::DEFAULT_ALERT_THRESHOLD;

pub const DEFAULT_API_URL: &str = "https://api.p2pquake.net/v2";
pub const DEFAULT_POLL_SECS: u64 = 6;
pub const DEFAULT_ROTATE_SECS: u64 = 10;
/// Early warnings older than this are treated as over.
pub const DEFAULT_EEW_WINDOW_SECS: u64 = 180;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub rotate_interval: Duration,
    pub eew_window_secs: u64,
    pub alert_threshold: i32,
    pub request_timeout_secs: u64,
    pub muted: bool,
    /// Ring the terminal bell; otherwise alerts are only logged.
    pub bell: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            rotate_interval: Duration::from_secs(DEFAULT_ROTATE_SECS),
            eew_window_secs: DEFAULT_EEW_WINDOW_SECS,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            muted: false,
            bell: true,
        }
    }
}
