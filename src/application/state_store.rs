// Persistence of panel state into a key-value byte store
use crate::domain::geometry::Position;
use crate::domain::panel::{PanelState, PollInterval, Visibility};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Key under which the panel state lives.
pub const STATE_KEY: &str = "gpu-monitor-state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store contents are corrupt: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    fn set(&mut self, key: &str, value: Bytes) -> Result<(), StoreError>;
}

/// Best-effort persistence: failures are logged and never surface to callers.
pub struct PersistenceStore {
    backend: Box<dyn KeyValueStore>,
}

impl PersistenceStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Restored state, or the default when nothing usable is stored.
    pub fn load(&self) -> PanelState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => PanelState::default(),
            Err(e) => {
                tracing::warn!("Failed to restore panel state, using defaults: {}", e);
                PanelState::default()
            }
        }
    }

    pub fn save(&mut self, state: &PanelState) {
        if let Err(e) = self.try_save(state) {
            tracing::warn!("Failed to persist panel state: {}", e);
        }
    }

    fn try_load(&self) -> Result<Option<PanelState>, StoreError> {
        let Some(raw) = self.backend.get(STATE_KEY)? else {
            return Ok(None);
        };
        let persisted: PersistedState = serde_json::from_slice(&raw)?;
        Ok(Some(persisted.into_state()))
    }

    fn try_save(&mut self, state: &PanelState) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec(&PersistedState::from_state(state))?;
        self.backend.set(STATE_KEY, Bytes::from(encoded))
    }
}

/// Stored shape, field-compatible with the browser widget's localStorage entry.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    is_visible: bool,
    #[serde(default)]
    is_minimized: bool,
    #[serde(default, serialize_with = "serialize_millis")]
    update_frequency: Option<f64>,
    #[serde(default)]
    position: Option<PersistedPosition>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedPosition {
    #[serde(default)]
    left: CssLength,
    #[serde(default)]
    top: CssLength,
    #[serde(default)]
    right: CssLength,
    #[serde(default)]
    bottom: CssLength,
}

impl PersistedState {
    fn from_state(state: &PanelState) -> Self {
        let position = match state.position {
            Some(p) => PersistedPosition {
                left: CssLength::Px(p.left),
                top: CssLength::Px(p.top),
                right: CssLength::Auto,
                bottom: CssLength::Auto,
            },
            None => PersistedPosition::default(),
        };
        Self {
            is_visible: state.is_visible(),
            is_minimized: state.minimized,
            update_frequency: Some(state.poll_interval.as_millis() as f64),
            position: Some(position),
        }
    }

    fn into_state(self) -> PanelState {
        let visibility = if self.is_visible {
            Visibility::Shown
        } else {
            Visibility::Hidden
        };

        let poll_interval = match self.update_frequency {
            Some(ms) if ms.is_finite() && ms != 0.0 => {
                let ms = ms.round() as i64;
                PollInterval::from_millis(ms).unwrap_or_else(|e| {
                    let nearest = PollInterval::nearest(ms);
                    tracing::warn!("Stored {}, using {}ms", e, nearest.as_millis());
                    nearest
                })
            }
            _ => PollInterval::default(),
        };

        // right/bottom only describe the corner anchor, which is the default anyway
        let position = self.position.and_then(|p| match (p.left, p.top) {
            (CssLength::Px(left), CssLength::Px(top)) => Some(Position::new(left, top)),
            _ => None,
        });

        PanelState {
            visibility,
            minimized: self.is_minimized,
            poll_interval,
            position,
        }
    }
}

fn serialize_millis<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(ms) => serializer.serialize_u64(ms.round().max(0.0) as u64),
        None => serializer.serialize_none(),
    }
}

/// Inline-style length: `""`, `"auto"` or `"<n>px"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum CssLength {
    #[default]
    Unset,
    Auto,
    Px(f64),
}

impl CssLength {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return CssLength::Unset;
        }
        if raw.eq_ignore_ascii_case("auto") {
            return CssLength::Auto;
        }
        raw.strip_suffix("px")
            .unwrap_or(raw)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(CssLength::Px)
            .unwrap_or(CssLength::Unset)
    }
}

impl Serialize for CssLength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CssLength::Unset => serializer.serialize_str(""),
            CssLength::Auto => serializer.serialize_str("auto"),
            CssLength::Px(v) => serializer.serialize_str(&format!("{}px", v)),
        }
    }
}

impl<'de> Deserialize<'de> for CssLength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => CssLength::parse(&s),
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(CssLength::Px)
                .unwrap_or(CssLength::Unset),
            _ => CssLength::Unset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Bytes>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }

        fn set(&mut self, _key: &str, _value: Bytes) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    fn store_with(raw: &str) -> PersistenceStore {
        let mut backend = MemoryStore::new();
        backend.set(STATE_KEY, Bytes::from(raw.to_string())).unwrap();
        PersistenceStore::new(Box::new(backend))
    }

    #[test]
    fn test_round_trip_all_combinations() {
        let positions = [
            None,
            Some(Position::new(0.0, 0.0)),
            Some(Position::new(120.5, 48.0)),
            Some(Position::new(960.0, 560.0)),
        ];
        for visibility in [Visibility::Hidden, Visibility::Shown] {
            for minimized in [false, true] {
                for poll_interval in PollInterval::ALL {
                    for position in positions {
                        let state = PanelState {
                            visibility,
                            minimized,
                            poll_interval,
                            position,
                        };
                        let mut store = PersistenceStore::new(Box::new(MemoryStore::new()));
                        store.save(&state);
                        assert_eq!(store.load(), state);
                    }
                }
            }
        }
    }

    #[test]
    fn test_stored_shape_matches_widget_format() {
        let backend = MemoryStore::new();
        let mut store = PersistenceStore::new(Box::new(backend.clone()));
        store.save(&PanelState {
            visibility: Visibility::Shown,
            minimized: false,
            poll_interval: PollInterval::FiveSeconds,
            position: Some(Position::new(100.0, 40.0)),
        });

        let raw = backend.get(STATE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isVisible": true,
                "isMinimized": false,
                "updateFrequency": 5000,
                "position": {"left": "100px", "top": "40px", "right": "auto", "bottom": "auto"}
            })
        );
    }

    #[test]
    fn test_load_legacy_entry() {
        let store = store_with(
            r#"{"isVisible":true,"isMinimized":true,"updateFrequency":10000,
                "position":{"left":"","top":"","right":"20px","bottom":""}}"#,
        );
        let state = store.load();
        assert!(state.is_visible());
        assert!(state.minimized);
        assert_eq!(state.poll_interval, PollInterval::TenSeconds);
        assert_eq!(state.position, None);
    }

    #[test]
    fn test_load_accepts_numeric_positions() {
        let store = store_with(r#"{"position":{"left":15,"top":"30.5px"}}"#);
        assert_eq!(store.load().position, Some(Position::new(15.0, 30.5)));
    }

    #[test]
    fn test_load_clamps_unknown_frequency() {
        let store = store_with(r#"{"updateFrequency":3000}"#);
        assert_eq!(store.load().poll_interval, PollInterval::TwoSeconds);

        let store = store_with(r#"{"updateFrequency":4200}"#);
        assert_eq!(store.load().poll_interval, PollInterval::FiveSeconds);

        let store = store_with(r#"{"updateFrequency":0}"#);
        assert_eq!(store.load().poll_interval, PollInterval::TwoSeconds);
    }

    #[test]
    fn test_missing_or_corrupt_entry_falls_back_to_defaults() {
        let empty = PersistenceStore::new(Box::new(MemoryStore::new()));
        assert_eq!(empty.load(), PanelState::default());

        assert_eq!(store_with("{not json").load(), PanelState::default());
        assert_eq!(store_with("[1,2,3]").load(), PanelState::default());
    }

    #[test]
    fn test_unavailable_store_is_swallowed() {
        let mut store = PersistenceStore::new(Box::new(BrokenStore));
        store.save(&PanelState::default());
        assert_eq!(store.load(), PanelState::default());
    }

    #[test]
    fn test_css_length_parse() {
        assert_eq!(CssLength::parse(""), CssLength::Unset);
        assert_eq!(CssLength::parse("auto"), CssLength::Auto);
        assert_eq!(CssLength::parse("12px"), CssLength::Px(12.0));
        assert_eq!(CssLength::parse(" 7.25px "), CssLength::Px(7.25));
        assert_eq!(CssLength::parse("3em"), CssLength::Unset);
    }
}
