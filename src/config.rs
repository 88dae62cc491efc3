//! Page configuration, passed from JavaScript as an optional JSON string.
//! Every field has a default so `start_page()` with no argument works.

use serde::Deserialize;
use thiserror::Error;

use crate::fx::AmbientVariant;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_FIREWORK_CHANCE: f64 = 0.05;
/// Smallest accepted `targetYear`. Two-digit years would be read as 19xx.
pub const MIN_TARGET_YEAR: i32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("targetYear {0} is out of range (must be at least {MIN_TARGET_YEAR})")]
    YearOutOfRange(i32),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Year whose January 1st (local midnight) ends the countdown.
    /// Defaults to the year after the current one.
    pub target_year: Option<i32>,
    /// Absolute deadline in epoch milliseconds; wins over `target_year`.
    pub target_epoch_ms: Option<f64>,
    /// Credential for the prediction provider. Without one the built-in list is used.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    /// How many predictions to ask the provider for.
    pub prediction_count: u8,
    pub variant: AmbientVariant,
    /// Per-frame probability of launching a firework shell.
    pub firework_chance: f64,
    pub countdown_period_ms: i32,
    pub rotation_period_ms: i32,
    pub ids: ElementIds,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            target_year: None,
            target_epoch_ms: None,
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prediction_count: 10,
            variant: AmbientVariant::Classic,
            firework_chance: DEFAULT_FIREWORK_CHANCE,
            countdown_period_ms: 1_000,
            rotation_period_ms: 8_000,
            ids: ElementIds::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON object; `None` or a blank string yields the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = match json {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(text)?,
            _ => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(year) = self.target_year {
            if year < MIN_TARGET_YEAR {
                return Err(ConfigError::YearOutOfRange(year));
            }
        }
        Ok(())
    }

    /// The API credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// DOM ids the page writes into. Missing elements are skipped, canvases are created.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub background_canvas: String,
    pub celebration_canvas: String,
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub inspiration_text: String,
    pub inspiration_topic: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            background_canvas: "dc-background".into(),
            celebration_canvas: "dc-celebration".into(),
            days: "dc-days".into(),
            hours: "dc-hours".into(),
            minutes: "dc-minutes".into(),
            seconds: "dc-seconds".into(),
            inspiration_text: "dc-inspiration-text".into(),
            inspiration_topic: "dc-inspiration-topic".into(),
        }
    }
}
