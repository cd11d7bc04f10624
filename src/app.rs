//! Application state management for citywx
//!
//! This module contains the main application state, handling keyboard input,
//! fetch results arriving from background tasks, and the derivation of the
//! current view from that state.

use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::{StartupConfig, DEFAULT_BATCH_SIZE};
use crate::data::{
    CityDirectoryClient, CityRecord, Forecast, ForecastClient, MAX_FORECAST_ENTRIES,
};
use crate::fetch::{FetchHandle, FetchMessage};
use crate::pagination::{scrolled_to_bottom, Pagination};

/// How many more cities each bottom-of-list hit requests
pub const BATCH_GROWTH: usize = 10;

/// The view currently on screen, derived from application state
///
/// There is no stored view field: a present forecast means the forecast view,
/// otherwise the loading flag decides between the loading screen and the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Waiting for the first successful city batch
    Loading,
    /// Scrollable city list
    CityList,
    /// Forecast for the activated city
    Forecast,
}

/// Main application struct managing state and data
pub struct App {
    /// City roster as returned by the directory, in response order
    pub cities: Vec<CityRecord>,
    /// Number of cities the next directory request will ask for
    pub batch_size: usize,
    /// Append-only window of roster indices shown in the list
    pub pagination: Pagination,
    /// Forecast for the activated city; presence switches the view
    pub forecast: Option<Forecast>,
    /// True until the first directory batch arrives successfully
    pub loading: bool,
    /// Index of the currently selected row in the visible list
    pub selected_index: usize,
    /// First visible row of the list viewport
    pub scroll_offset: usize,
    /// Rows the list viewport can show, written back by the renderer
    pub viewport_rows: usize,
    /// Scroll offset for the forecast view
    pub forecast_scroll_offset: u16,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag requesting a re-fetch of the current batch
    pub refresh_requested: bool,
    /// Flag requesting the next, larger batch
    pub more_cities_requested: bool,
    /// Roster index of a city whose forecast should be fetched
    pub pending_forecast: Option<usize>,
    /// Whether a directory fetch is currently outstanding
    pub cities_pending: bool,
    /// Generation of the most recently issued directory request
    pub cities_generation: u64,
    /// Generation of the most recently issued forecast request
    pub forecast_generation: u64,
    /// City directory API client
    directory_client: CityDirectoryClient,
    /// Forecast API client
    forecast_client: ForecastClient,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self {
            cities: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            pagination: Pagination::new(),
            forecast: None,
            loading: true,
            selected_index: 0,
            scroll_offset: 0,
            viewport_rows: 0,
            forecast_scroll_offset: 0,
            should_quit: false,
            show_help: false,
            refresh_requested: false,
            more_cities_requested: false,
            pending_forecast: None,
            cities_pending: false,
            cities_generation: 0,
            forecast_generation: 0,
            directory_client: CityDirectoryClient::new(),
            forecast_client: ForecastClient::new(String::new()),
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// This is used to apply CLI arguments like --batch-size and --api-key.
    ///
    /// # Arguments
    /// * `config` - The startup configuration derived from CLI arguments
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let mut app = Self::new();

        // Apply startup config
        app.batch_size = config.batch_size;
        if let Some(api_key) = config.api_key {
            app.forecast_client = ForecastClient::new(api_key);
        }

        app
    }

    /// Returns the view that should currently be on screen.
    ///
    /// A present forecast always wins; while no forecast is shown the loading
    /// flag decides between the loading screen and the city list.
    pub fn active_view(&self) -> View {
        if self.forecast.is_some() {
            View::Forecast
        } else if self.loading {
            View::Loading
        } else {
            View::CityList
        }
    }

    /// Returns the number of visible list rows
    pub fn visible_count(&self) -> usize {
        self.pagination.len()
    }

    /// Iterates the city records currently visible in the list
    pub fn visible_cities(&self) -> impl Iterator<Item = &CityRecord> {
        self.pagination
            .visible()
            .iter()
            .filter_map(|&index| self.cities.get(index))
    }

    /// Roster index of the currently selected row, if any
    pub fn selected_roster_index(&self) -> Option<usize> {
        self.pagination.visible().get(self.selected_index).copied()
    }

    /// Returns the currently selected city, if any
    pub fn selected_city(&self) -> Option<&CityRecord> {
        self.selected_roster_index()
            .and_then(|index| self.cities.get(index))
    }

    /// Issues the fetches that key handling has flagged as wanted.
    ///
    /// Called by the event loop after input handling; spawning happens here
    /// so key handling itself stays synchronous.
    ///
    /// # Arguments
    /// * `fetch` - Handle the spawned tasks report back on
    pub fn process_requests(&mut self, fetch: &FetchHandle) {
        if self.more_cities_requested {
            self.more_cities_requested = false;
            self.batch_size += BATCH_GROWTH;
            self.request_cities(fetch);
        }
        if self.refresh_requested {
            self.refresh_requested = false;
            self.request_cities(fetch);
        }
        if let Some(city_index) = self.pending_forecast.take() {
            self.request_forecast(city_index, fetch);
        }
    }

    /// Spawns a directory fetch for the current batch size.
    ///
    /// Bumps the directory generation first, so any batch still in flight is
    /// superseded and will be discarded on arrival.
    pub fn request_cities(&mut self, fetch: &FetchHandle) {
        self.cities_generation += 1;
        self.cities_pending = true;
        tracing::debug!(
            batch_size = self.batch_size,
            generation = self.cities_generation,
            "requesting city batch"
        );
        fetch.spawn_cities_fetch(
            self.directory_client.clone(),
            self.batch_size,
            self.cities_generation,
        );
    }

    /// Spawns a forecast fetch for the given roster index.
    ///
    /// # Arguments
    /// * `city_index` - Roster index of the activated city
    /// * `fetch` - Handle the spawned task reports back on
    pub fn request_forecast(&mut self, city_index: usize, fetch: &FetchHandle) {
        let Some(city) = self.cities.get(city_index) else {
            return;
        };

        self.forecast_generation += 1;
        tracing::info!(
            city = %city.name,
            generation = self.forecast_generation,
            "requesting forecast"
        );
        fetch.spawn_forecast_fetch(
            self.forecast_client.clone(),
            city.latitude,
            city.longitude,
            self.forecast_generation,
        );
    }

    /// Applies a fetch result arriving from a background task.
    ///
    /// Results stamped with a generation older than the most recently issued
    /// request are discarded; failed fetches are logged and leave all state
    /// untouched.
    ///
    /// # Arguments
    /// * `message` - The fetch result to apply
    pub fn handle_fetch_message(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Cities { generation, result } => {
                if generation != self.cities_generation {
                    tracing::debug!(
                        generation,
                        current = self.cities_generation,
                        "discarding stale city batch"
                    );
                    return;
                }
                self.cities_pending = false;
                match result {
                    Ok(cities) => self.apply_cities(cities),
                    Err(error) => tracing::error!(%error, "city batch fetch failed"),
                }
            }
            FetchMessage::Forecast { generation, result } => {
                if generation != self.forecast_generation {
                    tracing::debug!(
                        generation,
                        current = self.forecast_generation,
                        "discarding stale forecast"
                    );
                    return;
                }
                match result {
                    Ok(forecast) => self.apply_forecast(forecast),
                    Err(error) => tracing::error!(%error, "forecast fetch failed"),
                }
            }
        }
    }

    /// Replaces the roster with a fresh directory batch
    fn apply_cities(&mut self, cities: Vec<CityRecord>) {
        self.cities = cities;
        self.pagination.sync(self.cities.len());
        self.pagination.grow(self.batch_size, self.cities.len());
        self.clamp_selection();
        self.loading = false;
        tracing::debug!(
            visible = self.pagination.len(),
            roster = self.cities.len(),
            "applied city batch"
        );
    }

    /// Installs the forecast for the activated city, capped to the
    /// entries the view shows
    fn apply_forecast(&mut self, mut forecast: Forecast) {
        forecast.entries.truncate(MAX_FORECAST_ENTRIES);
        self.forecast_scroll_offset = 0;
        self.forecast = Some(forecast);
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Key Bindings
    /// - `q` or `Esc` (in CityList): Quit the application
    /// - `Up`/`k`: Move selection up in list
    /// - `Down`/`j`: Move selection down in list (requests more at the bottom)
    /// - `PageUp`/`PageDown`: Move selection a full page
    /// - `Home`/`g`, `End`/`G`: Jump to the first/last row
    /// - `Enter`: Fetch the forecast for the selected city
    /// - `r`: Re-fetch the current batch
    /// - `Esc`/`Backspace` (in Forecast): Close the forecast, back to the list
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {} // Ignore other keys when help is shown
            }
            return;
        }

        match self.active_view() {
            View::Loading => match key_event.code {
                // Only quit and retry are allowed during loading
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            View::CityList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::PageUp => {
                    self.page_up();
                }
                KeyCode::PageDown => {
                    self.page_down();
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    self.select_first();
                }
                KeyCode::End | KeyCode::Char('G') => {
                    self.select_last();
                }
                KeyCode::Enter => {
                    if let Some(index) = self.selected_roster_index() {
                        self.pending_forecast = Some(index);
                    }
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            View::Forecast => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    self.close_forecast();
                }
                // Scroll navigation
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.scroll_to_top();
                }
                KeyCode::Char('G') => {
                    self.scroll_to_bottom();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Moves the selection up in the list, stopping at the top
    fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
        self.ensure_selection_visible();
    }

    /// Moves the selection down in the list, stopping at the bottom.
    ///
    /// Once the viewport has reached the end of the visible rows, flags a
    /// request for the next, larger batch (unless one is already in flight).
    fn move_selection_down(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
        self.ensure_selection_visible();
        self.maybe_request_more();
    }

    /// Moves the selection up by a full page
    fn page_up(&mut self) {
        let step = self.viewport_rows.max(1);
        self.selected_index = self.selected_index.saturating_sub(step);
        self.ensure_selection_visible();
    }

    /// Moves the selection down by a full page
    fn page_down(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let step = self.viewport_rows.max(1);
        self.selected_index = (self.selected_index + step).min(count - 1);
        self.ensure_selection_visible();
        self.maybe_request_more();
    }

    /// Jumps the selection to the first row
    fn select_first(&mut self) {
        self.selected_index = 0;
        self.ensure_selection_visible();
    }

    /// Jumps the selection to the last row
    fn select_last(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        self.selected_index = count - 1;
        self.ensure_selection_visible();
        self.maybe_request_more();
    }

    /// Flags a request for the next batch once the viewport has reached the
    /// bottom of the visible rows and no directory fetch is in flight
    fn maybe_request_more(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        if scrolled_to_bottom(self.scroll_offset, self.viewport_rows, count)
            && !self.cities_pending
        {
            self.more_cities_requested = true;
        }
    }

    /// Keeps the selected row inside the viewport.
    ///
    /// Also called by the renderer after it has measured the viewport, since
    /// a resize can leave the selection outside the visible window.
    pub fn ensure_selection_visible(&mut self) {
        if self.viewport_rows == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + self.viewport_rows {
            self.scroll_offset = self.selected_index + 1 - self.viewport_rows;
        }
    }

    /// Clamps the selection after the visible window changed
    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            self.selected_index = 0;
            self.scroll_offset = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    /// Closes the forecast view and drops any response still in flight.
    ///
    /// Bumping the generation here means a forecast that was requested but
    /// has not arrived yet can no longer reopen the view.
    pub fn close_forecast(&mut self) {
        self.forecast = None;
        self.forecast_scroll_offset = 0;
        self.forecast_generation += 1;
    }

    /// Scrolls up in the forecast view with bounds checking
    ///
    /// Decreases scroll offset by 1, stopping at 0.
    pub fn scroll_up(&mut self) {
        self.forecast_scroll_offset = self.forecast_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the forecast view with bounds checking
    ///
    /// Increases scroll offset by 1, with a maximum limit.
    /// The actual maximum depends on content height, but we use a reasonable upper bound.
    pub fn scroll_down(&mut self) {
        // Use a reasonable maximum scroll offset (can be adjusted based on content)
        const MAX_SCROLL: u16 = 100;
        if self.forecast_scroll_offset < MAX_SCROLL {
            self.forecast_scroll_offset += 1;
        }
    }

    /// Scrolls to the top of the forecast view
    ///
    /// Resets scroll offset to 0.
    pub fn scroll_to_top(&mut self) {
        self.forecast_scroll_offset = 0;
    }

    /// Scrolls to the bottom of the forecast view
    ///
    /// Sets scroll offset to a large value that will be clamped by the renderer.
    pub fn scroll_to_bottom(&mut self) {
        // Set to a large value; the renderer will clamp to actual max
        self.forecast_scroll_offset = 100;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
