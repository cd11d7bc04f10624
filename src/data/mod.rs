//! Core data models for citywx
//!
//! This module contains the data types used throughout the application for
//! representing cities from the directory API and weather forecasts.

pub mod cities;
pub mod forecast;

pub use cities::{CityDirectoryClient, DirectoryError};
pub use forecast::{ForecastClient, ForecastError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of forecast entries kept after a fetch.
///
/// The forecast endpoint returns up to 40 three-hour entries (5 days); the
/// application stores only the first 16 (two days' worth).
pub const MAX_FORECAST_ENTRIES: usize = 16;

/// A populated city as returned by the city directory
///
/// Records are immutable once fetched. The full collection is owned by the
/// application state; the pagination controller refers to records by index
/// rather than cloning them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// City name
    pub name: String,
    /// English country name
    pub country: String,
    /// IANA timezone identifier (e.g. "Europe/Paris")
    pub timezone: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Resident population
    pub population: u64,
}

/// A multi-day weather forecast for one city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Name of the city the forecast is for, as reported by the API
    pub city_name: String,
    /// ISO country code reported by the API
    pub country: String,
    /// Time-ordered forecast entries (3-hour steps)
    pub entries: Vec<ForecastEntry>,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

/// One timestamped entry of a forecast time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Condition group for icon/color selection
    pub condition: WeatherKind,
    /// Human-readable condition description (e.g. "light rain")
    pub description: String,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

/// Coarse weather condition groups
///
/// Mirrors the `weather[].main` grouping of the forecast API, collapsed to
/// the categories the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherKind {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    /// Mist, fog, haze, dust and other obscurations
    Atmosphere,
    /// Anything the API reports that is not recognized
    Other,
}
