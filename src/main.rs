//! # LinkCraft
//!
//! A terminal assistant that turns trending news into LinkedIn content.
//!
//! ## Features
//!
//! - Fetches the top 10 headlines for an industry and date range from NewsAPI
//! - Generates a LinkedIn post for a chosen headline through an
//!   OpenAI-compatible chat API
//! - Breaks the post into slides, each with bullet points and an image prompt
//!
//! ## Usage
//!
//! ```sh
//! linkcraft                          # interactive session
//! linkcraft headlines -i healthcare  # one-shot commands
//! linkcraft parse outline.txt        # offline slide parsing
//! ```
//!
//! ## Flow
//!
//! 1. **Configuration**: both API keys are loaded once; a missing key stops
//!    the program before any request is made
//! 2. **Headlines**: fetch and pick a headline
//! 3. **Post**: ask the model for a LinkedIn post
//! 4. **Slides**: ask the model for a slide outline and parse it

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod app;
mod cli;
mod config;
mod error;
mod models;
mod news;
mod prompts;
mod session;
mod slides;
mod ui;
mod utils;

use app::Clients;
use cli::{Cli, Command};
use error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    // Logs go to stderr and default to warnings so they don't interleave
    // with the interactive prompts.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(config = %args.config.display(), command = ?args.command, "Parsed CLI arguments");

    let start_time = std::time::Instant::now();
    let result = run(args).await;
    let elapsed = start_time.elapsed();

    match result {
        Ok(()) => {
            info!(?elapsed, "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, fatal = e.is_fatal(), "Execution failed");
            ui::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    // Commands that never touch the network need no credentials.
    match &args.command {
        Some(Command::Industries) => {
            ui::print_industries();
            return Ok(());
        }
        Some(Command::Parse(parse)) => return app::run_parse(parse).await,
        _ => {}
    }

    let secrets = config::load_secrets(&args.config).await?;
    let settings = config::resolve(secrets, args.overrides())?;
    info!(model = %settings.model, temperature = settings.temperature, "Loaded configuration");
    let clients = Clients::new(&settings)?;

    match &args.command {
        None | Some(Command::Interactive) => app::run_interactive(&clients).await,
        Some(Command::Headlines(headlines)) => app::run_headlines(&clients, headlines).await,
        Some(Command::Post(post)) => app::run_post(&clients, post).await,
        Some(Command::Slides(slides)) => app::run_slides(&clients, slides).await,
        Some(Command::Industries) | Some(Command::Parse(_)) => Ok(()),
    }
}
