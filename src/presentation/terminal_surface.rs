// Terminal rendition of the floating panel
use crate::application::panel_controller::PanelSurface;
use crate::domain::geometry::Position;
use crate::domain::panel::PollInterval;
use crate::domain::view::{Bar, ConnectivityStatus, DeviceCard, PanelContent, PanelView};
use chrono::{DateTime, Local};
use std::io::Write;

const BAR_CELLS: usize = 20;

pub struct TerminalSurface<W: Write + Send> {
    out: W,
    visible: bool,
    minimized: bool,
    removed: bool,
    position: Option<Position>,
    interval: PollInterval,
    content: PanelContent,
    status: ConnectivityStatus,
    updated_at: Option<DateTime<Local>>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            visible: false,
            minimized: false,
            removed: false,
            position: None,
            interval: PollInterval::default(),
            content: PanelContent::Loading,
            status: ConnectivityStatus::default(),
            updated_at: None,
        }
    }

    /// Lines of the panel as currently shown; empty when hidden.
    pub fn frame(&self) -> Vec<String> {
        if !self.visible || self.removed {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let toggle = if self.minimized { "[□]" } else { "[-]" };
        let at = self
            .position
            .map(|p| format!(" @ {},{}", p.left, p.top))
            .unwrap_or_default();
        lines.push(format!("== GPU Monitor {} [x]{}", toggle, at));

        if self.minimized {
            return lines;
        }

        match &self.content {
            PanelContent::Loading => lines.push("  Fetching GPU information...".to_string()),
            PanelContent::NoDevices => lines.push("  No GPU detected".to_string()),
            PanelContent::Error { message } => lines.push(format!("  ! {}", message)),
            PanelContent::Devices(cards) => {
                for card in cards {
                    device_lines(card, &mut lines);
                }
            }
        }

        let updated = self
            .updated_at
            .map(|t| format!(" | updated {}", t.format("%H:%M:%S")))
            .unwrap_or_default();
        lines.push(format!(
            "-- ● {}{} | every {}s",
            self.status.label(),
            updated,
            self.interval.as_millis() / 1000
        ));
        lines
    }

    fn redraw(&mut self) {
        let frame = self.frame();
        if frame.is_empty() {
            return;
        }
        let mut write = || -> std::io::Result<()> {
            writeln!(self.out)?;
            for line in &frame {
                writeln!(self.out, "{}", line)?;
            }
            self.out.flush()
        };
        if let Err(e) = write() {
            tracing::warn!("Failed to draw panel: {}", e);
        }
    }
}

fn device_lines(card: &DeviceCard, lines: &mut Vec<String>) {
    lines.push(format!("  {}", card.title));
    lines.push(format!("    Memory      {}", bar_line(&card.memory_bar)));
    if let Some(bar) = &card.utilization_bar {
        lines.push(format!("    Utilization {}", bar_line(bar)));
    }
    let readouts: Vec<&str> = [card.temperature.as_deref(), card.power.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !readouts.is_empty() {
        lines.push(format!("    {}", readouts.join("  ")));
    }
}

fn bar_line(bar: &Bar) -> String {
    let filled = ((bar.fill_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!(
        "[{}{}] {} {}",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled),
        bar.label,
        bar.color
    )
}

impl<W: Write + Send> PanelSurface for TerminalSurface<W> {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.redraw();
    }

    fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
        self.redraw();
    }

    fn place(&mut self, position: Position) {
        self.position = Some(position);
    }

    fn set_poll_interval(&mut self, interval: PollInterval) {
        self.interval = interval;
    }

    fn render(&mut self, view: &PanelView) {
        self.content = view.content.clone();
        if let Some(status) = view.status {
            self.status = status;
            self.updated_at = Some(Local::now());
        }
        self.redraw();
    }

    fn remove(&mut self) {
        self.visible = false;
        self.removed = true;
        let _ = writeln!(self.out, "GPU Monitor closed");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{
        DeviceMetrics, FetchError, FetchResult, MemoryUsage, MetricsSnapshot, Reading,
    };
    use crate::domain::view::{ViewInput, render};

    fn surface() -> TerminalSurface<Vec<u8>> {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_visible(true);
        surface
    }

    #[test]
    fn test_hidden_panel_draws_nothing() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.render(&render(ViewInput::Loading));
        assert!(surface.frame().is_empty());
        assert!(surface.out.is_empty());
    }

    #[test]
    fn test_device_frame() {
        let mut surface = surface();
        let result: FetchResult = Ok(MetricsSnapshot::new(vec![DeviceMetrics {
            id: 0,
            name: "X".into(),
            memory: MemoryUsage::new(4.0, 8.0),
            utilization: Reading::new(30.0),
            temperature: Reading::new(60.0),
            power: Reading::ABSENT,
        }]));
        surface.render(&render(ViewInput::Result(&result)));

        let frame = surface.frame();
        assert!(frame[0].starts_with("== GPU Monitor [-] [x]"));
        assert_eq!(frame[1], "  GPU 0: X");
        assert_eq!(frame[2], "    Memory      [##########----------] 4GB / 8GB (50%) #2ed573");
        assert_eq!(frame[3], "    Utilization [######--------------] 30% #5352ed");
        assert_eq!(frame[4], "    60°C");
        assert!(frame[5].starts_with("-- ● online | updated "));
        assert!(frame[5].ends_with("| every 2s"));
    }

    #[test]
    fn test_minimized_frame_shows_header_only() {
        let mut surface = surface();
        surface.place(Position::new(10.0, 20.0));
        surface.set_minimized(true);
        assert_eq!(surface.frame(), vec!["== GPU Monitor [□] [x] @ 10,20".to_string()]);
    }

    #[test]
    fn test_error_frame() {
        let mut surface = surface();
        let result: FetchResult = Err(FetchError::Reported("driver missing".into()));
        surface.render(&render(ViewInput::Result(&result)));
        let frame = surface.frame();
        assert_eq!(frame[1], "  ! driver missing");
        assert!(frame[2].starts_with("-- ● error"));
    }

    #[test]
    fn test_remove_detaches() {
        let mut surface = surface();
        surface.remove();
        assert!(surface.frame().is_empty());
        surface.set_visible(true);
        assert!(surface.frame().is_empty());
        let output = String::from_utf8(surface.out.clone()).unwrap();
        assert!(output.ends_with("GPU Monitor closed\n"));
    }
}
