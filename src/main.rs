use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use connect_four::ai::Difficulty;
use connect_four::config::{AppConfig, LoggingConfig};
use connect_four::game::{Controller, NetworkRole};
use connect_four::net::{self, CancelToken, HostListener};
use connect_four::settings::Settings;
use connect_four::ui::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play against the computer
    Solo,
    /// Two players at one keyboard
    Local,
    /// Wait for an opponent to join over the network
    Host,
    /// Join a hosted game
    Join,
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, value_enum, default_value = "solo")]
    mode: Mode,

    /// Bot difficulty; stored in the settings file
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Host address to join (defaults to the last one used)
    #[arg(long)]
    address: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the JSON settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let loaded = AppConfig::load_optional(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let missing = loaded.is_none();
    let config = loaded.unwrap_or_default();
    init_logging(&config.logging)?;
    if missing {
        tracing::warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let mut settings = Settings::read_or_default(&cli.settings)
        .with_context(|| format!("reading settings from {}", cli.settings.display()))?;
    if let Some(difficulty) = cli.difficulty {
        settings.set_difficulty(difficulty);
        settings.save(&cli.settings).context("saving settings")?;
    }

    let controller = match cli.mode {
        Mode::Solo => Controller::solo(settings.difficulty()?),
        Mode::Local => Controller::local(),
        Mode::Host => {
            let listener = HostListener::bind(&config.network).context("binding game port")?;
            println!(
                "Waiting for an opponent on port {}...",
                listener.local_addr()?.port()
            );
            match listener.accept(&CancelToken::new())? {
                Some(peer) => {
                    tracing::info!(peer = %peer.peer_addr()?, "hosting game");
                    Controller::networked(NetworkRole::Host, Box::new(peer))
                }
                None => return Ok(()),
            }
        }
        Mode::Join => {
            let address = match cli.address.clone() {
                Some(address) => address,
                None if !settings.last_ip.is_empty() => settings.last_ip.clone(),
                None => bail!("no host address given (use --address)"),
            };
            println!("Joining {address}...");
            let peer = match net::connect(&address, &config.network, &CancelToken::new())
                .with_context(|| format!("joining {address}"))?
            {
                Some(peer) => peer,
                None => return Ok(()),
            };
            tracing::info!(peer = %peer.peer_addr()?, "joined game");
            settings.last_ip = address;
            settings.save(&cli.settings).context("saving settings")?;
            Controller::networked(NetworkRole::Join, Box::new(peer))
        }
    };

    tracing::info!(mode = ?controller.mode(), "starting game");
    run(controller).context("running terminal UI")
}

/// Send logs to the configured file; `RUST_LOG` overrides the filter.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("opening log file {}", config.file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(controller: Controller) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
