use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// Linear frequency sweep of one oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub from_hz: f32,
    pub to_hz: f32,
}

/// Two oscillators sounding together for `duration`, then `gap` of silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub primary: Sweep,
    pub secondary: Sweep,
    pub duration: Duration,
    pub gap: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertPattern {
    pub name: &'static str,
    pub tones: Vec<Tone>,
}

impl AlertPattern {
    pub fn total_duration(&self) -> Duration {
        self.tones.iter().map(|t| t.duration + t.gap).sum()
    }
}

fn tone(primary: (f32, f32), secondary: (f32, f32), duration_ms: u64, gap_ms: u64) -> Tone {
    Tone {
        primary: Sweep {
            from_hz: primary.0,
            to_hz: primary.1,
        },
        secondary: Sweep {
            from_hz: secondary.0,
            to_hz: secondary.1,
        },
        duration: Duration::from_millis(duration_ms),
        gap: Duration::from_millis(gap_ms),
    }
}

/// Urgent rising sweeps, repeated.
pub fn eew_pattern() -> AlertPattern {
    let rise = tone((880.0, 1320.0), (1760.0, 2640.0), 250, 80);
    AlertPattern {
        name: "eew",
        tones: vec![rise; 6],
    }
}

/// Two-note chime.
pub fn quake_pattern() -> AlertPattern {
    AlertPattern {
        name: "earthquake",
        tones: vec![
            tone((987.8, 987.8), (1975.5, 1975.5), 400, 120),
            tone((784.0, 784.0), (1568.0, 1568.0), 600, 0),
        ],
    }
}

/// Low falling sweep.
pub fn tsunami_pattern() -> AlertPattern {
    let fall = tone((660.0, 330.0), (440.0, 220.0), 900, 300);
    AlertPattern {
        name: "tsunami",
        tones: vec![fall; 3],
    }
}

/// Something that can sound an alert pattern.
pub trait TonePlayer {
    fn play(&mut self, pattern: &AlertPattern) -> Result<()>;
}

/// Spacing between bells; terminals collapse back-to-back bells into one.
const BELL_SPACING: Duration = Duration::from_millis(150);

/// Rings the terminal bell once per tone.
///
/// A paced player rings the first bell immediately and the rest from a
/// tokio task, so `play` never blocks the caller.
pub struct BellPlayer<W: Write + Send + 'static> {
    out: Arc<Mutex<W>>,
    pace: Option<Duration>,
}

impl BellPlayer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::paced(io::stdout(), BELL_SPACING)
    }
}

impl<W: Write + Send + 'static> BellPlayer<W> {
    /// Bells at most `spacing` apart.
    pub fn paced(out: W, spacing: Duration) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            pace: Some(spacing),
        }
    }

    /// Bell writer without the inter-tone delay.
    pub fn unpaced(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            pace: None,
        }
    }
}

fn ring<W: Write>(out: &Arc<Mutex<W>>) -> Result<()> {
    let mut out = out.lock().map_err(|_| anyhow!("bell writer lock poisoned"))?;
    out.write_all(b"\x07")
        .and_then(|_| out.flush())
        .context("Failed to ring terminal bell")
}

impl<W: Write + Send + 'static> TonePlayer for BellPlayer<W> {
    fn play(&mut self, pattern: &AlertPattern) -> Result<()> {
        let Some((_, rest)) = pattern.tones.split_first() else {
            return Ok(());
        };
        ring(&self.out)?;

        let handle = tokio::runtime::Handle::try_current();
        match (self.pace, handle) {
            (Some(spacing), Ok(handle)) => {
                let gaps: Vec<Duration> = pattern.tones[..rest.len()]
                    .iter()
                    .map(|t| t.duration.min(spacing))
                    .collect();
                let out = Arc::clone(&self.out);
                handle.spawn(async move {
                    for gap in gaps {
                        tokio::time::sleep(gap).await;
                        if let Err(e) = ring(&out) {
                            warn!(error = %e, "failed to ring terminal bell");
                            break;
                        }
                    }
                });
            }
            _ => {
                for _ in rest {
                    ring(&self.out)?;
                }
            }
        }
        Ok(())
    }
}

/// Muted backend: logs what would have played.
#[derive(Debug, Default)]
pub struct LogPlayer;

impl TonePlayer for LogPlayer {
    fn play(&mut self, pattern: &AlertPattern) -> Result<()> {
        info!(
            pattern = pattern.name,
            tones = pattern.tones.len(),
            duration_ms = pattern.total_duration().as_millis() as u64,
            "alert muted"
        );
        Ok(())
    }
}
