use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use storeview::config::{self, EnvOverrides, ViewerConfig};
use tracing::{error, info};

/// Live viewer for the store simulation server
#[derive(Parser, Debug)]
#[command(name = "storeview", version, about)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WebSocket URL of the simulation server
    #[arg(long)]
    ws_url: Option<String>,

    /// Base URL of the simulation HTTP API
    #[arg(long)]
    api_url: Option<String>,

    /// Initial value of the customer-count field
    #[arg(long)]
    customers: Option<u32>,
}

/// Config file, then env vars, then CLI flags
fn resolve_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ViewerConfig::default(),
    };

    EnvOverrides::from_env().apply(&mut config);

    if let Some(ref url) = args.ws_url {
        config.server.ws_url = url.clone();
    }
    if let Some(ref url) = args.api_url {
        config.server.api_url = url.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &ViewerConfig) -> Result<()> {
    let file = File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file {}", config.logging.file))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();

    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode and the alternate screen before the default panic report
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    init_tracing(&config)?;

    info!(
        ws_url = %config.server.ws_url,
        api_url = %config.server.api_url,
        "Storeview starting..."
    );

    let initial_count = args
        .customers
        .unwrap_or(config.simulation.default_customer_count);

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    install_panic_hook();
    let result = storeview::app::run(&mut terminal, &config, initial_count).await;
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    if let Err(ref e) = result {
        error!(error = %e, "Viewer exited with error");
    }
    result
}
