use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use shindo::api::ApiClient;
use shindo::app::App;
use shindo::config::{
    DashboardConfig, DEFAULT_API_URL, DEFAULT_EEW_WINDOW_SECS, DEFAULT_POLL_SECS, DEFAULT_ROTATE_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use shindo::events::PollOutcome;
use shindo::report::{latest_json, latest_text};
use shindo::translate::translate;

#[derive(Parser, Debug)]
#[command(name = "shindo")]
#[command(about = "Terminal dashboard for Japanese earthquake, tsunami and early-warning feeds", long_about = None)]
struct Args {
    /// Feed API base URL
    #[arg(long, default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Poll interval in seconds
    #[arg(long, default_value_t = DEFAULT_POLL_SECS, global = true)]
    poll_interval: u64,

    /// Seconds between earthquake/tsunami panel rotation
    #[arg(long, default_value_t = DEFAULT_ROTATE_SECS, global = true)]
    rotate_interval: u64,

    /// Early warnings older than this many seconds are dropped
    #[arg(long, default_value_t = DEFAULT_EEW_WINDOW_SECS, global = true)]
    eew_window: u64,

    /// Intensity code at which an earthquake report sounds an alert (30 = shindo 3)
    #[arg(long, default_value_t = shindo::alert::DEFAULT_ALERT_THRESHOLD, global = true)]
    alert_threshold: i32,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Start with alert sounds muted
    #[arg(long, global = true)]
    mute: bool,

    /// Log alerts instead of ringing the terminal bell
    #[arg(long, global = true)]
    no_bell: bool,

    /// Write logs to this file (the dashboard has no other log output)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive TUI dashboard
    #[command(name = "dashboard", alias = "tui")]
    Dashboard,

    /// Fetch each feed once and print the newest records
    #[command(name = "latest")]
    Latest {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Translate Japanese place names
    #[command(name = "translate")]
    Translate {
        /// Names to translate
        #[arg(required = true)]
        text: Vec<String>,
    },
}

impl Args {
    fn config(&self) -> DashboardConfig {
        DashboardConfig {
            api_url: self.api_url.clone(),
            poll_interval: Duration::from_secs(self.poll_interval.max(1)),
            rotate_interval: Duration::from_secs(self.rotate_interval.max(1)),
            eew_window_secs: self.eew_window,
            alert_threshold: self.alert_threshold,
            request_timeout_secs: self.timeout,
            muted: self.mute,
            bell: !self.no_bell,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let tui = matches!(args.command, Some(Commands::Dashboard) | None);
    init_logging(args.log_file.as_ref(), tui)?;

    let config = args.config();
    match args.command {
        Some(Commands::Latest { json }) => print_latest(&config, json).await?,
        Some(Commands::Translate { text }) => {
            for name in text {
                println!("{}", translate(&name));
            }
        }
        Some(Commands::Dashboard) | None => run_tui(config).await?,
    }

    Ok(())
}

/// Route logs to the file if given, else to stderr outside the TUI.
fn init_logging(log_file: Option<&PathBuf>, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "shindo=info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // stderr would tear the alternate screen
        None if tui => {}
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

async fn print_latest(config: &DashboardConfig, json: bool) -> Result<()> {
    let client = ApiClient::new(config.api_url.clone(), config.request_timeout_secs)?;
    let (quake, tsunami, eew) = tokio::join!(
        client.get_latest_quake(),
        client.get_latest_tsunami(),
        client.get_latest_eew(),
    );
    let outcome = PollOutcome { quake, tsunami, eew };

    if json {
        println!("{}", serde_json::to_string_pretty(&latest_json(&outcome))?);
    } else {
        print!("{}", latest_text(&outcome));
    }
    Ok(())
}

async fn run_tui(config: DashboardConfig) -> Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(config)?;
    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "dashboard stopped");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
