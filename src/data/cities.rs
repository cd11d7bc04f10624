//! OpenDataSoft city directory client
//!
//! Fetches populated cities from the "geonames all cities with a population
//! > 1000" dataset and parses them into [`CityRecord`] values. The endpoint
//! is paginated by a single `limit` query parameter: the application always
//! requests the first `limit` records of the server-side ordering.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::CityRecord;

/// Base URL for the city directory records endpoint
const CITY_DIRECTORY_BASE_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000/records";

/// Errors that can occur when fetching the city directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for fetching city records from the directory API
#[derive(Debug, Clone)]
pub struct CityDirectoryClient {
    client: Client,
}

impl Default for CityDirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CityDirectoryClient {
    /// Create a new CityDirectoryClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new CityDirectoryClient with a custom HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Builds the request URL for the given record limit
    ///
    /// The limit is the only query parameter; every batch-size change
    /// re-issues the request with the new value.
    pub fn request_url(&self, limit: usize) -> String {
        format!("{}?limit={}", CITY_DIRECTORY_BASE_URL, limit)
    }

    /// Fetch the first `limit` cities of the directory
    ///
    /// # Arguments
    /// * `limit` - Number of records to request
    ///
    /// # Returns
    /// * `Ok(Vec<CityRecord>)` - The ordered city records
    /// * `Err(DirectoryError)` - If the request or parsing fails
    pub async fn fetch_cities(&self, limit: usize) -> Result<Vec<CityRecord>, DirectoryError> {
        let url = self.request_url(limit);

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;
        let api_response: RecordsResponse = serde_json::from_str(&text)?;

        Ok(parse_records(api_response))
    }
}

/// Converts raw directory rows into domain records
///
/// Rows without coordinates are skipped (a city the forecast endpoint cannot
/// be queried for is useless to the application); optional string fields
/// default to empty.
fn parse_records(response: RecordsResponse) -> Vec<CityRecord> {
    response
        .results
        .into_iter()
        .filter_map(|row| {
            let coordinates = row.coordinates?;
            Some(CityRecord {
                name: row.name.unwrap_or_default(),
                country: row.cou_name_en.unwrap_or_default(),
                timezone: row.timezone.unwrap_or_default(),
                latitude: coordinates.lat,
                longitude: coordinates.lon,
                population: row.population,
            })
        })
        .collect()
}

/// Directory API response structure
#[derive(Debug, Deserialize)]
struct RecordsResponse {
    results: Vec<CityRow>,
}

/// One raw row of the directory response
#[derive(Debug, Deserialize)]
struct CityRow {
    name: Option<String>,
    cou_name_en: Option<String>,
    timezone: Option<String>,
    #[serde(default)]
    population: u64,
    coordinates: Option<GeoPoint>,
}

/// Geographic point as serialized by the directory API
#[derive(Debug, Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}
