//! Engraving configuration
//!
//! Style values the instrument-change core reads, plus editor-level
//! settings. Loaded from YAML or JSON; any missing field takes its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Placement of a staff text relative to its staff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Above,
    Below,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Above => "above",
            Placement::Below => "below",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Placement> {
        match s {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

/// Score style
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingStyle {
    /// Show written pitch without transposition
    pub concert_pitch: bool,
    pub instrument_change_placement: Placement,
    /// Minimum distance from the staff, in spatium units
    pub instrument_change_min_distance: f64,
    /// Label for instrument changes; `{}` is replaced by the track name
    pub instrument_change_text: String,
}

impl Default for EngravingStyle {
    fn default() -> Self {
        Self {
            concert_pitch: false,
            instrument_change_placement: Placement::Above,
            instrument_change_min_distance: 2.0,
            instrument_change_text: "To {}".to_string(),
        }
    }
}

impl EngravingStyle {
    /// Plain-text label for a change to `track_name`
    pub fn instrument_change_label(&self, track_name: &str) -> String {
        self.instrument_change_text.replacen("{}", track_name, 1)
    }
}

/// Editor-level settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingConfig {
    pub style: EngravingStyle,
    /// Maximum number of undo steps kept
    pub undo_limit: usize,
}

impl Default for EngravingConfig {
    fn default() -> Self {
        Self {
            style: EngravingStyle::default(),
            undo_limit: 100,
        }
    }
}

impl EngravingConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::debug!("Loaded engraving config from {}", path.display());
        Ok(config)
    }
}
