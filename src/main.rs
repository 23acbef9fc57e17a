//! names-tui - A terminal explorer for name popularity statistics
//!
//! This is the main entry point for the names-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Cli, Config, ConfigError};
use crate::model::ui::Route;
use crate::services::build_api;
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use tracing::{error, info};

fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };
    logging::init(&config)?;

    let route = match Route::parse(&config.start_route) {
        Some(route) => route,
        None => {
            let err = ConfigError::InvalidRoute(config.start_route.clone());
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };
    let api = build_api(&config)?;

    // Setup terminal
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut app = App::new(config, api, route);
    app.init()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        error!(error = %err, "exiting with error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "draw failed");
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
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick to pick up finished fetches
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
