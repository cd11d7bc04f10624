//! citywx - Browse world cities and their weather forecasts
//!
//! A terminal UI application that lists the world's most populous cities
//! and shows a short-term weather forecast for any of them.

mod app;
mod cli;
mod data;
mod fetch;
mod logging;
mod pagination;
mod ui;

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, View};
use cli::{Cli, StartupConfig};
use fetch::FetchHandle;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the currently active view
fn render_ui(frame: &mut ratatui::Frame, app: &mut App) {
    match app.active_view() {
        View::Loading => {
            render_loading(frame);
        }
        View::CityList => {
            ui::render_city_list(frame, app);
        }
        View::Forecast => {
            ui::render_forecast(frame, app);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while the first city batch is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading cities...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve configuration before touching the terminal so errors print normally
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    logging::init(config.log_file.as_deref())?;
    tracing::info!(batch_size = config.batch_size, "starting citywx");
    if config.api_key.is_none() {
        tracing::warn!("no forecast API key configured; forecast requests will fail");
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance and the channel fetch results arrive on
    let mut app = App::with_startup_config(config);
    let mut fetch = FetchHandle::new();

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &mut app))?;

    // Trigger the initial city batch
    app.request_cities(&fetch);

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &mut app))?;

        // Apply fetch results that arrived since the last frame
        while let Some(message) = fetch::try_recv(&mut fetch) {
            app.handle_fetch_message(message);
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Spawn any fetches the key handler requested
        app.process_requests(&fetch);

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
