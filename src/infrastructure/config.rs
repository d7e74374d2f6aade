use crate::application::panel_controller::PanelLayout;
use crate::domain::geometry::{PanelSize, Viewport};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub monitor: MonitorSettings,
    pub panel: PanelSettings,
    pub viewport: ViewportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorSettings {
    pub endpoint: String,
    pub request_timeout_ms: Option<u64>,
    pub startup_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelSettings {
    pub state_file: Option<PathBuf>,
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub anchor_margin: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
}

impl MonitorSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl MonitorConfig {
    pub fn layout(&self) -> PanelLayout {
        PanelLayout {
            viewport: Viewport::new(self.viewport.width, self.viewport.height),
            panel: PanelSize::new(self.panel.width, self.panel.height),
            header_height: self.panel.header_height,
            anchor_margin: self.panel.anchor_margin,
        }
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("monitor.endpoint", "http://127.0.0.1:8800/api/gpu_status")?
        .set_default("monitor.startup_delay_ms", 1000)?
        .set_default("panel.width", 320.0)?
        .set_default("panel.height", 240.0)?
        .set_default("panel.header_height", 44.0)?
        .set_default("panel.anchor_margin", 20.0)?
        .set_default("viewport.width", 1280.0)?
        .set_default("viewport.height", 800.0)?)
}

/// Defaults, then `config/monitor.*` if present, then `GPU_MONITOR__*` variables.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("GPU_MONITOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
