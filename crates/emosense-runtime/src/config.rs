//! Runtime configuration

use std::time::Duration;

use emosense_core::{EmoResult, EmoSenseError};
use emosense_visual::OverlayStyle;
use serde::{Deserialize, Serialize};

/// Perception loop configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Tick interval
    #[serde(with = "duration_str")]
    pub tick_interval: Duration,
    /// Overlay drawing style
    pub overlay: OverlayStyle,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            tick_interval: Duration::from_millis(100),
            overlay: OverlayStyle::default(),
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> EmoResult<()> {
        if self.tick_interval.is_zero() {
            return Err(EmoSenseError::Config(
                "tick_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Map shown for the user's position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub popup: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            zoom: 13,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            popup: "You are here!".to_string(),
        }
    }
}

/// Full application configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub perception: LoopConfig,
    pub map: MapConfig,
}

impl AppConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> EmoResult<Self> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| EmoSenseError::Config(e.to_string()))?;
        config.perception.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> EmoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EmoSenseError::Config(e.to_string()))
    }
}

/// Durations as human-readable strings such as `"100ms"`
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
