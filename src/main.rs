//! table-memo - browse table metadata and keep per-attribute memos
//!
//! This is the main entry point for the table-memo application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod controller;
mod model;
mod services;
#[cfg(test)]
mod testing;
mod tui;
mod view;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "table-memo", version, about = "Browse table metadata and edit attribute memos")]
struct Args {
    /// Base URL of the metadata backend. Overrides the saved config.
    #[arg(long, env = "TABLE_MEMO_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log file path (default: ~/.table-memo/table-memo.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal belongs to the UI, so logs only ever go to a file
    if let Err(e) = init_logging(args.verbose, args.log_file.clone()) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::warn!(error = %reason, "ignoring unreadable config");
            Config::default()
        }
    }
    .with_overrides(args.api_url, args.timeout);
    tracing::info!(configured = config.has_api_url(), "starting");

    // Setup terminal
    let mut tui = Tui::new(Duration::from_millis(100))?;
    tui.enter()?;

    let mut app = App::new(config);

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting on error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("bye");
    Ok(())
}

fn init_logging(verbose: u8, log_file: Option<PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let path = log_file
        .or_else(Config::log_path)
        .context("could not determine log file location")?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("could not open {}", path.display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                tracing::trace!(action = %a, "dispatch");
                current_action = app.update(a)?;
            }
        }

        // Tick every pass so replies land even while keys keep arriving
        app.update(Action::Tick)?;
    }

    Ok(())
}
