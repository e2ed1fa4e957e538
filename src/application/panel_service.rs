// Panel service - Use case for composing the water level panel
use crate::application::asset_repository::AssetRepository;
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::chart::build_smooth_fill_path;
use crate::domain::measurement::{Measurement, MeasurementSeries};
use crate::domain::panel::{CurrentReading, Panel};
use crate::infrastructure::chart_renderer::ChartRasterizer;
use crate::infrastructure::config::PanelConfig;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const UNAVAILABLE_HEADLINE: &str = ":-(";

struct CachedPanel {
    composed_at: Instant,
    panel: Arc<Panel>,
}

#[derive(Clone)]
pub struct PanelService {
    measurements: Arc<dyn MeasurementRepository>,
    assets: Arc<dyn AssetRepository>,
    rasterizer: ChartRasterizer,
    config: PanelConfig,
    latest: Arc<Mutex<Option<CachedPanel>>>,
}

impl PanelService {
    pub fn new(
        measurements: Arc<dyn MeasurementRepository>,
        assets: Arc<dyn AssetRepository>,
        config: PanelConfig,
    ) -> Self {
        Self {
            measurements,
            assets,
            rasterizer: ChartRasterizer::new(config.chart.fill_rgba),
            config,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// The most recent panel, recomposed once it is older than `panel.max_age_secs`.
    ///
    /// Summary, chart and logo requests within that window all see the same composition.
    pub async fn current_panel(&self) -> Arc<Panel> {
        // Held across composition so concurrent requests share one upstream fetch
        let mut latest = self.latest.lock().await;
        let max_age = Duration::from_secs(self.config.panel.max_age_secs);

        if let Some(cached) = latest.as_ref() {
            if cached.composed_at.elapsed() < max_age {
                return cached.panel.clone();
            }
        }

        let panel = Arc::new(self.compose().await);
        *latest = Some(CachedPanel {
            composed_at: Instant::now(),
            panel: panel.clone(),
        });
        panel
    }

    pub fn logo_name(&self) -> &str {
        &self.config.assets.logo
    }

    async fn compose(&self) -> Panel {
        // Logo and measurements are independent, load both at once
        let (series, logo) = tokio::join!(self.load_series(), self.load_logo());

        let reading = match &series {
            Some(series) => self.format_reading(series.current()),
            None => CurrentReading::Unavailable {
                headline: UNAVAILABLE_HEADLINE.to_string(),
                detail: self.config.panel.error_label.clone(),
            },
        };
        let chart_png = series.as_ref().and_then(|s| self.render_chart(s));

        Panel::new(self.config.panel.title.clone(), logo, reading, chart_png)
    }

    async fn load_logo(&self) -> Option<Bytes> {
        let name = &self.config.assets.logo;
        match self.assets.get_asset(name).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Omitting logo {}: {}", name, e);
                None
            }
        }
    }

    async fn load_series(&self) -> Option<MeasurementSeries> {
        // Failures are already logged by the repository
        self.measurements.fetch(&self.config.station.id).await.ok()
    }

    fn render_chart(&self, series: &MeasurementSeries) -> Option<Vec<u8>> {
        let chart = &self.config.chart;
        let path = match build_smooth_fill_path(
            &series.values(),
            chart.width as f64,
            chart.height as f64,
        ) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Omitting chart: {}", e);
                return None;
            }
        };

        match self.rasterizer.render_png(&path, chart.width, chart.height) {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::warn!("Omitting chart: {}", e);
                None
            }
        }
    }

    /// Station-local time as reported by the endpoint, not the server's zone
    fn format_reading(&self, current: &Measurement) -> CurrentReading {
        let timestamp_text = match current.instant() {
            Some(instant) => instant.format("%d.%m.%Y %H:%M").to_string(),
            None => current.timestamp.clone(),
        };

        CurrentReading::Available {
            value_text: format!("{} {}", current.value, self.config.station.unit),
            timestamp_text,
        }
    }
}
