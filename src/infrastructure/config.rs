use serde::Deserialize;

const CONFIG_FILE: &str = "config/panel";
const ENV_PREFIX: &str = "PEGEL_PANEL";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub server: ServerSettings,
    pub station: StationSettings,
    pub assets: AssetSettings,
    pub panel: PanelSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StationSettings {
    /// Plain station name; percent-encoded when the URL is built
    pub id: String,
    pub api_base: String,
    /// ISO-8601 duration passed as `start`, e.g. `P1D`
    pub lookback: Option<String>,
    pub unit: String,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            id: "MAGDEBURG-STROMBRÜCKE".to_string(),
            api_base: "https://www.pegelonline.wsv.de/webservices/rest-api/v2".to_string(),
            lookback: None,
            unit: "cm".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssetSettings {
    pub cache_dir: String,
    pub cdn_base: String,
    pub logo: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            cache_dir: "cache".to_string(),
            cdn_base: "https://devdeer.blob.core.windows.net/shared/codingfreaks/images"
                .to_string(),
            logo: "codingfreaks.jpg".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PanelSettings {
    pub title: String,
    pub error_label: String,
    /// How long a composed panel is served before measurements are fetched again
    pub max_age_secs: u64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            title: "ELBE-PEGEL MD".to_string(),
            error_label: "Fehler beim Laden".to_string(),
            max_age_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub fill_rgba: [u8; 4],
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 120,
            fill_rgba: [0, 122, 255, 128],
        }
    }
}

/// Load `config/panel.toml` (optional) overlaid with `PEGEL_PANEL__*` environment variables
pub fn load_panel_config() -> anyhow::Result<PanelConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
