// Render view: maps the latest fetch result onto a description of the panel body
use super::metrics::{DeviceMetrics, FetchError, FetchResult, Reading};

pub const UTILIZATION_COLOR: &str = "#5352ed";

/// Memory bar color band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLevel {
    Normal,
    Elevated,
    High,
}

impl MemoryLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            MemoryLevel::High
        } else if percent >= 60.0 {
            MemoryLevel::Elevated
        } else {
            MemoryLevel::Normal
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MemoryLevel::Normal => "#2ed573",
            MemoryLevel::Elevated => "#ffa502",
            MemoryLevel::High => "#ff4757",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Fill width, 0..=100
    pub fill_percent: f64,
    pub color: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    pub title: String,
    pub memory_level: MemoryLevel,
    pub memory_bar: Bar,
    pub utilization_bar: Option<Bar>,
    pub temperature: Option<String>,
    pub power: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    NoDevices,
    Devices(Vec<DeviceCard>),
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityStatus {
    Online,
    Error,
    #[default]
    Offline,
}

impl ConnectivityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityStatus::Online => "online",
            ConnectivityStatus::Error => "error",
            ConnectivityStatus::Offline => "offline",
        }
    }
}

/// What the view is asked to draw.
#[derive(Debug, Clone, Copy)]
pub enum ViewInput<'a> {
    Loading,
    Result(&'a FetchResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub content: PanelContent,
    /// `None` leaves the status indicator untouched
    pub status: Option<ConnectivityStatus>,
}

pub fn render(input: ViewInput<'_>) -> PanelView {
    match input {
        ViewInput::Loading => PanelView {
            content: PanelContent::Loading,
            status: None,
        },
        ViewInput::Result(result) => PanelView {
            content: render_content(result),
            status: Some(status_of(result)),
        },
    }
}

pub fn status_of(result: &FetchResult) -> ConnectivityStatus {
    match result {
        Ok(_) => ConnectivityStatus::Online,
        Err(FetchError::Reported(_)) => ConnectivityStatus::Error,
        Err(FetchError::Network(_)) => ConnectivityStatus::Offline,
    }
}

fn render_content(result: &FetchResult) -> PanelContent {
    match result {
        Ok(snapshot) if snapshot.is_empty() => PanelContent::NoDevices,
        Ok(snapshot) => PanelContent::Devices(snapshot.devices.iter().map(device_card).collect()),
        Err(error) => PanelContent::Error {
            message: error.display_message().to_string(),
        },
    }
}

fn device_card(device: &DeviceMetrics) -> DeviceCard {
    let memory = &device.memory;
    let memory_level = MemoryLevel::from_percent(memory.usage_percent);

    let memory_bar = Bar {
        fill_percent: bar_width(memory.usage_percent),
        color: memory_level.color(),
        label: format!(
            "{}GB / {}GB ({}%)",
            memory.used_gb, memory.total_gb, memory.usage_percent
        ),
    };

    let utilization_bar = device.utilization.value().map(|utilization| Bar {
        fill_percent: bar_width(utilization),
        color: UTILIZATION_COLOR,
        label: format!("{}%", utilization),
    });

    DeviceCard {
        title: format!("GPU {}: {}", device.id, device.name),
        memory_level,
        memory_bar,
        utilization_bar,
        temperature: format_reading(device.temperature, |t| format!("{}°C", t)),
        power: format_reading(device.power, |p| format!("{:.1}W", p)),
    }
}

fn format_reading(reading: Reading, format: impl Fn(f64) -> String) -> Option<String> {
    reading.value().map(format)
}

fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
