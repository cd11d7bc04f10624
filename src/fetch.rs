//! Background fetch plumbing
//!
//! Directory and forecast requests run on spawned tokio tasks and report
//! back over an mpsc channel that the event loop drains between key events.
//! Every task carries the generation it was spawned with, so responses that
//! arrive after a newer request was issued can be discarded.

use tokio::sync::mpsc;

use crate::data::{CityDirectoryClient, CityRecord, Forecast, ForecastClient};

/// Messages sent from background fetch tasks to the main app
#[derive(Debug)]
pub enum FetchMessage {
    /// A city directory batch arrived
    Cities {
        generation: u64,
        result: Result<Vec<CityRecord>, String>,
    },
    /// A forecast for the activated city arrived
    Forecast {
        generation: u64,
        result: Result<Forecast, String>,
    },
}

/// Handle owning the channel that fetch tasks report back on
pub struct FetchHandle {
    /// Channel for receiving fetch messages
    pub receiver: mpsc::Receiver<FetchMessage>,
    sender: mpsc::Sender<FetchMessage>,
}

impl Default for FetchHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchHandle {
    /// Creates a new FetchHandle with an open message channel
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self { receiver, sender }
    }

    /// Spawns a background task fetching a city directory batch
    ///
    /// # Arguments
    /// * `client` - Directory client to fetch with
    /// * `batch_size` - Number of records to request
    /// * `generation` - Directory generation this request belongs to
    pub fn spawn_cities_fetch(
        &self,
        client: CityDirectoryClient,
        batch_size: usize,
        generation: u64,
    ) {
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_cities(batch_size)
                .await
                .map_err(|e| e.to_string());
            // Send fails only if the app is shutting down
            let _ = tx.send(FetchMessage::Cities { generation, result }).await;
        });
    }

    /// Spawns a background task fetching a forecast
    ///
    /// # Arguments
    /// * `client` - Forecast client to fetch with
    /// * `latitude` - Latitude of the activated city
    /// * `longitude` - Longitude of the activated city
    /// * `generation` - Forecast generation this request belongs to
    pub fn spawn_forecast_fetch(
        &self,
        client: ForecastClient,
        latitude: f64,
        longitude: f64,
        generation: u64,
    ) {
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_forecast(latitude, longitude)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchMessage::Forecast { generation, result }).await;
        });
    }
}

/// Checks for pending fetch messages without blocking
///
/// # Arguments
/// * `handle` - The FetchHandle to check
///
/// # Returns
/// * `Some(FetchMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut FetchHandle) -> Option<FetchMessage> {
    handle.receiver.try_recv().ok()
}
