// HTTP request handlers
use crate::application::measurement_repository::FetchError;
use crate::domain::panel::CurrentReading;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

pub const CHART_ROUTE: &str = "/panel/chart.png";
pub const LOGO_ROUTE: &str = "/panel/logo";

/// JSON summary of the panel; images are served from their own routes
#[derive(Debug, Serialize)]
pub struct PanelView {
    pub title: String,
    pub headline: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_url: Option<&'static str>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Describe the current panel
pub async fn panel(State(state): State<Arc<AppState>>) -> Json<PanelView> {
    let panel = state.panel_service.current_panel().await;

    let error = match panel.reading {
        CurrentReading::Unavailable { .. } => Some(FetchError::SENTINEL),
        CurrentReading::Available { .. } => None,
    };

    Json(PanelView {
        headline: panel.reading.headline().to_string(),
        detail: panel.reading.detail().to_string(),
        title: panel.title.clone(),
        error,
        logo_url: panel.logo.as_ref().map(|_| LOGO_ROUTE),
        chart_url: panel.chart_png.as_ref().map(|_| CHART_ROUTE),
    })
}

/// Trend chart of the current panel as PNG
pub async fn chart(State(state): State<Arc<AppState>>) -> Response {
    let panel = state.panel_service.current_panel().await;
    match &panel.chart_png {
        Some(png) => ([(header::CONTENT_TYPE, "image/png")], png.clone()).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Branding logo from the asset cache
pub async fn logo(State(state): State<Arc<AppState>>) -> Response {
    let content_type = content_type_for(state.panel_service.logo_name());
    let panel = state.panel_service.current_panel().await;
    match &panel.logo {
        Some(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::asset_repository::{AssetCacheError, AssetRepository};
    use crate::application::measurement_repository::MeasurementRepository;
    use crate::application::panel_service::PanelService;
    use crate::domain::measurement::{Measurement, MeasurementSeries};
    use crate::infrastructure::config::PanelConfig;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubMeasurements(bool);

    #[async_trait]
    impl MeasurementRepository for StubMeasurements {
        async fn fetch(&self, _station_id: &str) -> Result<MeasurementSeries, FetchError> {
            if !self.0 {
                return Err(FetchError::Request("connection refused".to_string()));
            }
            MeasurementSeries::new(vec![
                Measurement::new("2024-05-01T12:00:00+02:00", 10.0),
                Measurement::new("2024-05-01T12:15:00+02:00", 12.0),
                Measurement::new("2024-05-01T12:30:00+02:00", 11.0),
                Measurement::new("2024-05-01T12:45:00+02:00", 15.0),
            ])
            .ok_or(FetchError::EmptySeries)
        }
    }

    /// Serves one good series, then fails every later fetch
    #[derive(Default)]
    struct OneShotMeasurements {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MeasurementRepository for OneShotMeasurements {
        async fn fetch(&self, station_id: &str) -> Result<MeasurementSeries, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(FetchError::Status(503));
            }
            StubMeasurements(true).fetch(station_id).await
        }
    }

    struct MissingAssets;

    #[async_trait]
    impl AssetRepository for MissingAssets {
        async fn get_asset(&self, name: &str) -> Result<Bytes, AssetCacheError> {
            Err(AssetCacheError::InvalidName(name.to_string()))
        }
    }

    fn state(measurements_ok: bool) -> Arc<AppState> {
        Arc::new(AppState {
            panel_service: PanelService::new(
                Arc::new(StubMeasurements(measurements_ok)),
                Arc::new(MissingAssets),
                PanelConfig::default(),
            ),
        })
    }

    #[tokio::test]
    async fn test_panel_view_with_data() {
        let Json(view) = panel(State(state(true))).await;

        assert_eq!(view.headline, "15 cm");
        assert_eq!(view.error, None);
        assert_eq!(view.chart_url, Some(CHART_ROUTE));
        assert_eq!(view.logo_url, None);
    }

    #[tokio::test]
    async fn test_panel_view_reports_sentinel() {
        let Json(view) = panel(State(state(false))).await;

        assert_eq!(view.headline, ":-(");
        assert_eq!(view.error, Some("Error loading data."));
        assert_eq!(view.chart_url, None);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("chart_url").is_none());
    }

    #[tokio::test]
    async fn test_chart_and_logo_status() {
        let response = chart(State(state(true))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let response = chart(State(state(false))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = logo(State(state(true))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chart_served_from_same_composition_as_summary() {
        let measurements = Arc::new(OneShotMeasurements::default());
        let state = Arc::new(AppState {
            panel_service: PanelService::new(
                measurements.clone(),
                Arc::new(MissingAssets),
                PanelConfig::default(),
            ),
        });

        let Json(view) = panel(State(state.clone())).await;
        assert_eq!(view.chart_url, Some(CHART_ROUTE));

        let response = chart(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = logo(State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(measurements.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("codingfreaks.jpg"), "image/jpeg");
        assert_eq!(content_type_for("Logo.PNG"), "image/png");
        assert_eq!(content_type_for("logo"), "application/octet-stream");
    }
}
