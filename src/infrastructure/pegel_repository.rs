// PEGELONLINE measurement repository implementation
use crate::application::measurement_repository::{FetchError, MeasurementRepository};
use crate::domain::measurement::{Measurement, MeasurementSeries};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct PegelOnlineRepository {
    api_base: String,
    lookback: Option<String>,
    client: reqwest::Client,
}

impl PegelOnlineRepository {
    pub fn new(api_base: String, lookback: Option<String>) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            lookback,
            client: reqwest::Client::new(),
        }
    }

    fn build_measurements_url(&self, station_id: &str) -> String {
        let encoded_station = urlencoding::encode(station_id);
        let mut url = format!(
            "{}/stations/{}/w/measurements.json",
            self.api_base, encoded_station
        );
        if let Some(lookback) = &self.lookback {
            url.push_str("?start=");
            url.push_str(&urlencoding::encode(lookback));
        }
        url
    }

    async fn execute_fetch(&self, station_id: &str) -> Result<MeasurementSeries, FetchError> {
        let url = self.build_measurements_url(station_id);
        tracing::debug!("Fetching measurements from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let measurements: Vec<Measurement> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let series = MeasurementSeries::new(measurements).ok_or(FetchError::EmptySeries)?;
        tracing::debug!("Received {} measurements for {}", series.len(), station_id);
        Ok(series)
    }
}

#[async_trait]
impl MeasurementRepository for PegelOnlineRepository {
    async fn fetch(&self, station_id: &str) -> Result<MeasurementSeries, FetchError> {
        let result = self.execute_fetch(station_id).await;
        if let Err(e) = &result {
            tracing::warn!("Loading measurements for {} failed: {}", station_id, e);
        }
        result
    }
}
