use queens_core::{NextStrategy, Speed, DEFAULT_BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Preferences kept between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub size: usize,
    pub speed: Speed,
    /// Deterministic "next solution" instead of the randomized retry search
    pub canonical_next: bool,
    pub light_theme: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            speed: Speed::Medium,
            canonical_next: false,
            light_theme: false,
        }
    }
}

impl Settings {
    pub fn next_strategy(&self) -> NextStrategy {
        if self.canonical_next {
            NextStrategy::Canonical
        } else {
            NextStrategy::default()
        }
    }

    fn save_path() -> PathBuf {
        data_dir().join("queens_settings.json")
    }

    /// Load settings, falling back to defaults on a missing or corrupt file
    pub fn load() -> Self {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => Self::from_json(&json),
            Err(_) => Self::default(),
        }
    }

    fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable settings file");
            Self::default()
        })
    }

    /// Save settings to file
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(Self::save_path(), json) {
                    tracing::warn!(error = %e, "could not save settings");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not encode settings"),
        }
    }
}

/// Directory for settings and the log file
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.size, 8);
        assert_eq!(settings.speed, Speed::Medium);
        assert_eq!(
            settings.next_strategy(),
            NextStrategy::Randomized { attempts: 100 }
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "speed": "Slow", "canonical_next": true }"#);
        assert_eq!(settings.speed, Speed::Slow);
        assert_eq!(settings.size, 8);
        assert_eq!(settings.next_strategy(), NextStrategy::Canonical);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"speed\":\"Medium\""));
        assert!(json.contains("\"size\":8"));
    }
}
