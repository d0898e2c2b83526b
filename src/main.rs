mod api;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod ui;

use crate::api::PlatformClient;
use crate::config::Config;
use crate::environment::Environment;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the dashboard
    Start {
        /// Base URL of the execution platform API
        #[arg(long, value_name = "API_URL")]
        api_url: Option<String>,
    },
    /// Clear the saved console configuration.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let faas_environment_str = std::env::var("FAAS_ENVIRONMENT").unwrap_or_default();
    let environment = faas_environment_str
        .parse::<Environment>()
        .unwrap_or_default();

    let config_path = config::get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start { api_url } => {
            let resolved = match api_url {
                Some(url) => {
                    // Remember the explicit choice for next time.
                    if let Err(e) = Config::new(url.clone()).save(&config_path) {
                        eprintln!("Failed to save config: {}", e);
                    }
                    url
                }
                None => match Config::load_from_file(&config_path) {
                    Ok(config) => config.api_url,
                    Err(_) => environment.platform_url(),
                },
            };
            start(resolved, environment).await
        }
        Command::Reset => {
            println!("Clearing console configuration file...");
            config::clear_config(&config_path).map_err(Into::into)
        }
    }
}

/// Starts the console application.
///
/// # Arguments
/// * `api_url` - Base URL of the execution platform API.
/// * `env` - The environment to connect to.
async fn start(api_url: String, env: Environment) -> Result<(), Box<dyn Error>> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend.
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create the application and run it.
    let platform = PlatformClient::new(api_url.clone());
    let app = ui::App::new(env, api_url, platform);
    let res = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}
