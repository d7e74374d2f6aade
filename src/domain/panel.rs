// Panel state machine: visibility, minimize, poll interval, position
use super::geometry::Position;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// Poll frequencies offered by the panel's frequency selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollInterval {
    OneSecond,
    #[default]
    TwoSeconds,
    FiveSeconds,
    TenSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("poll interval {0}ms is not one of 1000, 2000, 5000, 10000")]
pub struct InvalidInterval(pub i64);

impl PollInterval {
    pub const ALL: [PollInterval; 4] = [
        PollInterval::OneSecond,
        PollInterval::TwoSeconds,
        PollInterval::FiveSeconds,
        PollInterval::TenSeconds,
    ];

    pub fn as_millis(&self) -> u64 {
        match self {
            PollInterval::OneSecond => 1000,
            PollInterval::TwoSeconds => 2000,
            PollInterval::FiveSeconds => 5000,
            PollInterval::TenSeconds => 10000,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    pub fn from_millis(ms: i64) -> Result<Self, InvalidInterval> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_millis() as i64 == ms)
            .ok_or(InvalidInterval(ms))
    }

    /// Closest offered interval; ties resolve to the shorter one
    pub fn nearest(ms: i64) -> Self {
        let mut best = PollInterval::OneSecond;
        for interval in Self::ALL {
            let distance = (interval.as_millis() as i64).abs_diff(ms);
            if distance < (best.as_millis() as i64).abs_diff(ms) {
                best = interval;
            }
        }
        best
    }
}

/// The single source of truth for everything the panel persists.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelState {
    pub visibility: Visibility,
    pub minimized: bool,
    pub poll_interval: PollInterval,
    /// `None` keeps the default corner anchor
    pub position: Option<Position>,
}

impl PanelState {
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Shown
    }

    /// Returns true when the state changed.
    pub fn show(&mut self) -> bool {
        let changed = self.visibility != Visibility::Shown;
        self.visibility = Visibility::Shown;
        changed
    }

    pub fn hide(&mut self) -> bool {
        let changed = self.visibility != Visibility::Hidden;
        self.visibility = Visibility::Hidden;
        changed
    }

    pub fn toggle_minimized(&mut self) -> bool {
        self.minimized = !self.minimized;
        self.minimized
    }

    pub fn set_poll_interval(&mut self, interval: PollInterval) -> bool {
        let changed = self.poll_interval != interval;
        self.poll_interval = interval;
        changed
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }
}
