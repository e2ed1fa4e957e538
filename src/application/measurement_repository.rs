// Repository trait for water level measurements
use crate::domain::measurement::MeasurementSeries;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed measurement payload: {0}")]
    Parse(String),
    #[error("station returned no measurements")]
    EmptySeries,
}

impl FetchError {
    /// Text shown in place of a reading when loading failed
    pub const SENTINEL: &'static str = "Error loading data.";
}

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Fetch the measurement series for a station, oldest first
    async fn fetch(&self, station_id: &str) -> Result<MeasurementSeries, FetchError>;
}
