//! order-dashboard entry point.
//!
//! Loads configuration, starts the dashboard session and hands the terminal
//! to the UI until the user quits.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use order_dashboard::config::{DashboardConfig, LogFormat};
use order_dashboard::session::DashboardSession;
use order_dashboard::ui::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = DashboardConfig::from_env()?;
    init_tracing(&config)?;
    tracing::info!(
        base = %config.api_base,
        poll_ms = config.poll_interval.as_millis(),
        "starting order-dashboard"
    );

    // Start both data sources before taking over the terminal
    let session = DashboardSession::connect(&config)?;

    let mut terminal = ratatui::try_init().context("failed to initialise terminal")?;
    let result = App::new()
        .run(&mut terminal, session, &config.api_base)
        .await;
    ratatui::restore();

    result?;
    tracing::info!("order-dashboard exited");
    Ok(())
}

/// Installs the tracing subscriber.
///
/// The terminal belongs to the UI, so logs go to `DASHBOARD_LOG_FILE` when
/// set, to stderr only when stderr is redirected, and nowhere otherwise.
fn init_tracing(config: &DashboardConfig) -> anyhow::Result<()> {
    let writer = if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        BoxMakeWriter::new(Mutex::new(file))
    } else if !std::io::stderr().is_terminal() {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        return Ok(());
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}
