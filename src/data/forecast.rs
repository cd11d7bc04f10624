//! OpenWeatherMap forecast client
//!
//! Fetches the 5-day/3-hour forecast for a coordinate pair and parses it
//! into a [`Forecast`]. The endpoint returns temperatures in Kelvin; they
//! are converted to Celsius during parsing so the rest of the application
//! never sees raw Kelvin values.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{Forecast, ForecastEntry, WeatherKind};

/// Base URL for the forecast endpoint
const FORECAST_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Errors that can occur when fetching a forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response was missing an expected field
    #[error("Missing expected field: {0}")]
    MissingField(String),
}

/// Client for fetching forecasts from the weather API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    api_key: String,
}

impl ForecastClient {
    /// Create a new ForecastClient using the given API key
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Create a new ForecastClient with a custom HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Builds the request URL for the given coordinates
    ///
    /// The query carries exactly the latitude, longitude, and API key.
    pub fn request_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?lat={}&lon={}&appid={}",
            FORECAST_BASE_URL, latitude, longitude, self.api_key
        )
    }

    /// Fetch the forecast for a coordinate pair
    ///
    /// # Arguments
    /// * `latitude` - Latitude of the city
    /// * `longitude` - Longitude of the city
    ///
    /// # Returns
    /// * `Ok(Forecast)` - The parsed forecast, temperatures in Celsius
    /// * `Err(ForecastError)` - If the request or parsing fails
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast, ForecastError> {
        let url = self.request_url(latitude, longitude);

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;
        let api_response: ForecastResponse = serde_json::from_str(&text)?;

        parse_forecast(api_response)
    }
}

/// Converts a raw API response into a domain forecast
fn parse_forecast(response: ForecastResponse) -> Result<Forecast, ForecastError> {
    let entries = response
        .list
        .into_iter()
        .map(|slot| {
            let timestamp = DateTime::from_timestamp(slot.dt, 0)
                .ok_or_else(|| ForecastError::MissingField("dt".to_string()))?;

            // The weather array is documented to hold at least one element,
            // but an empty one should not sink the whole forecast.
            let (condition, description) = match slot.weather.first() {
                Some(w) => (classify_condition(&w.main), w.description.clone()),
                None => (WeatherKind::Other, String::new()),
            };

            Ok(ForecastEntry {
                timestamp,
                temperature: kelvin_to_celsius(slot.main.temp),
                feels_like: kelvin_to_celsius(slot.main.feels_like),
                humidity: slot.main.humidity,
                condition,
                description,
                wind_speed: slot.wind.speed,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(Forecast {
        city_name: response.city.name,
        country: response.city.country,
        entries,
        fetched_at: Utc::now(),
    })
}

/// Converts a temperature from Kelvin to Celsius
fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// Maps the API's weather group name onto a [`WeatherKind`]
fn classify_condition(group: &str) -> WeatherKind {
    match group {
        "Clear" => WeatherKind::Clear,
        "Clouds" => WeatherKind::Clouds,
        "Drizzle" => WeatherKind::Drizzle,
        "Rain" => WeatherKind::Rain,
        "Thunderstorm" => WeatherKind::Thunderstorm,
        "Snow" => WeatherKind::Snow,
        "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall" | "Tornado" => {
            WeatherKind::Atmosphere
        }
        _ => WeatherKind::Other,
    }
}

/// Forecast API response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastSlot>,
    city: CityInfo,
}

/// One 3-hour forecast slot
#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    wind: Wind,
}

/// Thermal and humidity readings for a slot
#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

/// Weather condition descriptor
#[derive(Debug, Deserialize)]
struct WeatherCondition {
    main: String,
    description: String,
}

/// Wind readings for a slot
#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// City block of the forecast response
#[derive(Debug, Deserialize)]
struct CityInfo {
    name: String,
    #[serde(default)]
    country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample forecast response with two 3-hour slots
    const VALID_RESPONSE: &str = r#"{
        "cod": "200",
        "message": 0,
        "cnt": 2,
        "list": [
            {
                "dt": 1661871600,
                "main": {
                    "temp": 296.76,
                    "feels_like": 296.98,
                    "temp_min": 296.76,
                    "temp_max": 297.87,
                    "pressure": 1015,
                    "humidity": 69
                },
                "weather": [
                    { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
                ],
                "wind": { "speed": 0.62, "deg": 349 },
                "dt_txt": "2022-08-30 15:00:00"
            },
            {
                "dt": 1661882400,
                "main": {
                    "temp": 295.45,
                    "feels_like": 295.59,
                    "temp_min": 292.84,
                    "temp_max": 295.45,
                    "pressure": 1015,
                    "humidity": 71
                },
                "weather": [
                    { "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03n" }
                ],
                "wind": { "speed": 1.97, "deg": 157 },
                "dt_txt": "2022-08-30 18:00:00"
            }
        ],
        "city": {
            "id": 3163858,
            "name": "Zocca",
            "coord": { "lat": 44.34, "lon": 10.99 },
            "country": "IT",
            "timezone": 7200
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let response: ForecastResponse =
            serde_json::from_str(VALID_RESPONSE).expect("Failed to parse valid response");

        let forecast = parse_forecast(response).expect("Failed to convert response");

        assert_eq!(forecast.city_name, "Zocca");
        assert_eq!(forecast.country, "IT");
        assert_eq!(forecast.entries.len(), 2);

        let first = &forecast.entries[0];
        assert!((first.temperature - 23.61).abs() < 0.01);
        assert!((first.feels_like - 23.83).abs() < 0.01);
        assert_eq!(first.humidity, 69);
        assert_eq!(first.condition, WeatherKind::Rain);
        assert_eq!(first.description, "light rain");
        assert!((first.wind_speed - 0.62).abs() < 0.001);
        assert_eq!(first.timestamp.timestamp(), 1_661_871_600);

        let second = &forecast.entries[1];
        assert_eq!(second.condition, WeatherKind::Clouds);
        assert_eq!(second.humidity, 71);
    }

    #[test]
    fn test_parse_preserves_slot_order() {
        let response: ForecastResponse =
            serde_json::from_str(VALID_RESPONSE).expect("Failed to parse valid response");

        let forecast = parse_forecast(response).expect("Failed to convert response");
        assert!(forecast.entries[0].timestamp < forecast.entries[1].timestamp);
    }

    #[test]
    fn test_kelvin_to_celsius() {
        assert!((kelvin_to_celsius(273.15) - 0.0).abs() < f64::EPSILON);
        assert!((kelvin_to_celsius(296.76) - 23.61).abs() < 0.0001);
        assert!((kelvin_to_celsius(255.37) - (-17.78)).abs() < 0.0001);
    }

    #[test]
    fn test_classify_condition_groups() {
        assert_eq!(classify_condition("Clear"), WeatherKind::Clear);
        assert_eq!(classify_condition("Clouds"), WeatherKind::Clouds);
        assert_eq!(classify_condition("Drizzle"), WeatherKind::Drizzle);
        assert_eq!(classify_condition("Rain"), WeatherKind::Rain);
        assert_eq!(classify_condition("Thunderstorm"), WeatherKind::Thunderstorm);
        assert_eq!(classify_condition("Snow"), WeatherKind::Snow);
    }

    #[test]
    fn test_classify_condition_atmosphere_group() {
        for group in ["Mist", "Smoke", "Haze", "Dust", "Fog", "Sand", "Ash", "Squall", "Tornado"] {
            assert_eq!(classify_condition(group), WeatherKind::Atmosphere);
        }
    }

    #[test]
    fn test_classify_condition_unknown_is_other() {
        assert_eq!(classify_condition("Volcano"), WeatherKind::Other);
        assert_eq!(classify_condition(""), WeatherKind::Other);
    }

    #[test]
    fn test_request_url_carries_coordinates_and_key() {
        let client = ForecastClient::new("test-key".to_string());
        let url = client.request_url(51.5, -0.12);

        assert_eq!(
            url,
            format!("{}?lat=51.5&lon=-0.12&appid=test-key", FORECAST_BASE_URL)
        );
    }

    #[test]
    fn test_request_url_has_no_extra_parameters() {
        let client = ForecastClient::new("k".to_string());
        let url = client.request_url(44.34, 10.99);

        let query = url.split('?').nth(1).expect("URL should have a query");
        let params: Vec<&str> = query.split('&').collect();
        assert_eq!(params, vec!["lat=44.34", "lon=10.99", "appid=k"]);
    }

    #[test]
    fn test_parse_empty_weather_array() {
        let body = r#"{
            "list": [
                {
                    "dt": 1661871600,
                    "main": { "temp": 280.15, "feels_like": 278.15, "humidity": 50 },
                    "weather": [],
                    "wind": { "speed": 3.0 }
                }
            ],
            "city": { "name": "Nowhere", "country": "XX" }
        }"#;

        let response: ForecastResponse = serde_json::from_str(body).expect("Failed to parse");
        let forecast = parse_forecast(response).expect("Failed to convert");

        assert_eq!(forecast.entries[0].condition, WeatherKind::Other);
        assert_eq!(forecast.entries[0].description, "");
    }

    #[test]
    fn test_parse_malformed_json() {
        let malformed = "{ not json }";
        let result: Result<ForecastResponse, _> = serde_json::from_str(malformed);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_list_field() {
        let missing = r#"{ "city": { "name": "Zocca", "country": "IT" } }"#;
        let result: Result<ForecastResponse, _> = serde_json::from_str(missing);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_city_country_defaults_empty() {
        let body = r#"{
            "list": [],
            "city": { "name": "Zocca" }
        }"#;

        let response: ForecastResponse = serde_json::from_str(body).expect("Failed to parse");
        let forecast = parse_forecast(response).expect("Failed to convert");
        assert_eq!(forecast.country, "");
        assert!(forecast.entries.is_empty());
    }
}
