//! City list screen rendering
//!
//! Renders the scrollable city table showing name, country, timezone,
//! coordinates, and population for every visible row. The renderer writes
//! the measured viewport height back into the app so input handling knows
//! when the bottom of the list has been reached.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::CityRecord;

/// Column widths for the city table
const NAME_WIDTH: usize = 22;
const COUNTRY_WIDTH: usize = 18;
const TIMEZONE_WIDTH: usize = 20;
const COORDINATES_WIDTH: usize = 18;

/// Renders the city list screen
///
/// Displays the visible window of the city roster with:
/// - Header with the application name and row counts
/// - One table row per visible city
/// - Help text at the bottom
///
/// The currently selected city is highlighted with a cursor indicator
/// and different colors.
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing cities and selection
pub fn render_city_list(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Create main layout with header, content area, and help text at bottom
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(3),    // City table
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

/// Renders the header with the application name and row counts
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.cities_pending {
        Span::styled("fetching...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            format!("{} cities", app.visible_count()),
            Style::default().fg(Color::White),
        )
    };

    let width = area.width as usize;
    let separator = "─".repeat(width.saturating_sub(2));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "CITYWX",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                "World cities by population",
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            status,
        ]),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the city table content
fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Cities ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    // The first inner line holds the column headers; the rest shows rows.
    // Report the measured height back so scrolling knows the viewport size.
    let row_capacity = inner.height.saturating_sub(1) as usize;
    app.viewport_rows = row_capacity;
    app.ensure_selection_visible();

    let mut lines: Vec<Line> = Vec::with_capacity(row_capacity + 1);
    lines.push(header_line());

    let selected_index = app.selected_index;
    let scroll_offset = app.scroll_offset;
    for (index, city) in app
        .visible_cities()
        .enumerate()
        .skip(scroll_offset)
        .take(row_capacity)
    {
        lines.push(city_line(city, index == selected_index));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Builds the column header line
fn header_line() -> Line<'static> {
    let text = format!(
        "  {} {} {} {} {:>10}",
        fit("City", NAME_WIDTH),
        fit("Country", COUNTRY_WIDTH),
        fit("Timezone", TIMEZONE_WIDTH),
        fit("Coordinates", COORDINATES_WIDTH),
        "Population",
    );
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Builds one table row for a city
fn city_line(city: &CityRecord, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space

    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let cursor_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let coordinates = format!("{:>8.2} {:>8.2}", city.latitude, city.longitude);

    Line::from(vec![
        Span::styled(cursor.to_string(), cursor_style),
        Span::styled(fit(&city.name, NAME_WIDTH), name_style),
        Span::raw(" "),
        Span::styled(
            fit(&city.country, COUNTRY_WIDTH),
            Style::default().fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(
            fit(&city.timezone, TIMEZONE_WIDTH),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
            fit(&coordinates, COORDINATES_WIDTH),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:>10}", format_population(city.population)),
            Style::default().fg(Color::Yellow),
        ),
    ])
}

/// Renders the help text at the bottom of the screen
fn render_help(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Forecast  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Pads or truncates a value to a fixed column width
fn fit(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        format!("{:<width$}", text)
    }
}

/// Formats a population count with thousands separators
fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
