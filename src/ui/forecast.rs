//! Forecast screen UI
//!
//! Renders the forecast for the activated city as a scrollable list of
//! 3-hour entries inside a bordered box, with timestamps, temperatures,
//! humidity, wind, and a condition icon per entry.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Forecast, ForecastEntry, WeatherKind};

/// Color scheme for the forecast view
mod colors {
    use ratatui::style::Color;

    /// Section headers and borders
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Unknown/unavailable data
    pub const UNKNOWN: Color = Color::DarkGray;
}

/// Renders the forecast screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state; its forecast scroll offset is clamped here
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let Some(forecast) = app.forecast.as_ref() else {
        return;
    };

    let title = forecast_title(forecast);
    let lines = build_forecast_lines(forecast);

    // Create main bordered block with the city name as title
    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    // Content (scrollable) above a fixed help line
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner_area);
    let content_area = chunks[0];

    // Clamp scroll offset to valid range
    let content_height = lines.len() as u16;
    let max_scroll = content_height.saturating_sub(content_area.height);
    if app.forecast_scroll_offset > max_scroll {
        app.forecast_scroll_offset = max_scroll;
    }
    let scroll_offset = app.forecast_scroll_offset;

    let paragraph = Paragraph::new(lines).scroll((scroll_offset, 0));
    frame.render_widget(paragraph, content_area);

    if scroll_offset > 0 {
        render_scroll_indicator_top(frame, content_area);
    }
    if scroll_offset < max_scroll {
        render_scroll_indicator_bottom(frame, content_area);
    }

    render_help_text(frame, chunks[1]);
}

/// Builds the window title from the forecast's city block
fn forecast_title(forecast: &Forecast) -> String {
    if forecast.country.is_empty() {
        format!(" {} ", forecast.city_name)
    } else {
        format!(" {}, {} ", forecast.city_name, forecast.country)
    }
}

/// Builds all content lines for the forecast view
fn build_forecast_lines(forecast: &Forecast) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} entries · fetched {}",
                forecast.entries.len(),
                forecast.fetched_at.format("%H:%M UTC")
            ),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::from(""),
    ];

    if forecast.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No forecast entries returned",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    for entry in &forecast.entries {
        lines.push(entry_line(entry));
    }

    lines
}

/// Builds one line for a 3-hour forecast entry
fn entry_line(entry: &ForecastEntry) -> Line<'static> {
    let time = entry.timestamp.format("%a %d %b %H:%M").to_string();

    Line::from(vec![
        Span::styled(
            format!("{:<16}", time),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::raw(" "),
        Span::raw(weather_icon(&entry.condition).to_string()),
        Span::raw(" "),
        Span::styled(
            format!("{:>6.1}\u{00B0}C", entry.temperature),
            Style::default().fg(temperature_color(entry.temperature)),
        ),
        Span::styled(
            format!("  feels {:>5.1}\u{00B0}C", entry.feels_like),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(
            format!("  {:>3}%", entry.humidity),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  {:>4.1} m/s", entry.wind_speed),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::raw("  "),
        Span::styled(
            entry.description.clone(),
            Style::default().fg(colors::SECONDARY),
        ),
    ])
}

/// Weather condition to icon mapping
fn weather_icon(condition: &WeatherKind) -> &'static str {
    match condition {
        WeatherKind::Clear => "\u{2600}",        // ☀
        WeatherKind::Clouds => "\u{2601}",       // ☁
        WeatherKind::Drizzle => "\u{1F326}",     // 🌦
        WeatherKind::Rain => "\u{1F327}",        // 🌧
        WeatherKind::Thunderstorm => "\u{26C8}", // ⛈
        WeatherKind::Snow => "\u{2744}",         // ❄
        WeatherKind::Atmosphere => "\u{1F32B}",  // 🌫
        WeatherKind::Other => "\u{00B7}",        // ·
    }
}

/// Color for temperature (warmer = more red, cooler = more blue)
fn temperature_color(temp: f64) -> Color {
    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 15.0 {
        Color::Green
    } else if temp >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the "more above" scroll indicator
fn render_scroll_indicator_top(frame: &mut Frame, area: Rect) {
    if area.width < 10 {
        return;
    }
    let indicator = Span::styled("\u{25B2} more", Style::default().fg(colors::SECONDARY));
    let x = area.x + area.width.saturating_sub(8);
    let indicator_area = Rect {
        x,
        y: area.y,
        width: 8,
        height: 1,
    };
    frame.render_widget(Paragraph::new(Line::from(indicator)), indicator_area);
}

/// Renders the "more below" scroll indicator
fn render_scroll_indicator_bottom(frame: &mut Frame, area: Rect) {
    if area.width < 10 || area.height == 0 {
        return;
    }
    let indicator = Span::styled("\u{25BC} more", Style::default().fg(colors::SECONDARY));
    let x = area.x + area.width.saturating_sub(8);
    let indicator_area = Rect {
        x,
        y: area.y + area.height.saturating_sub(1),
        width: 8,
        height: 1,
    };
    frame.render_widget(Paragraph::new(Line::from(indicator)), indicator_area);
}

/// Renders the fixed help line at the bottom
fn render_help_text(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll  "),
        Span::styled("g/G", Style::default().fg(Color::Yellow)),
        Span::raw(" Top/Bottom  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
