//! Driver tuning: tick, per-step timeouts, fixed pauses and selectors.
//!
//! All fields have defaults, so a config file only needs the values it
//! changes. Durations are plain milliseconds.

use crate::error::ConfigError;
use crate::host::Scope;
use crate::locator::LocatorStrategy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub tick_ms: u64,
    pub timeouts: StepTimeouts,
    pub pauses: Pauses,
    pub selectors: SelectorProfile,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            timeouts: StepTimeouts::default(),
            pauses: Pauses::default(),
            selectors: SelectorProfile::marker(),
        }
    }
}

impl DriverConfig {
    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        tracing::debug!("Loaded driver config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
        }
        if self.pauses.settle_min_ms > self.pauses.settle_max_ms {
            return Err(ConfigError::Invalid(format!(
                "settle_min_ms ({}) exceeds settle_max_ms ({})",
                self.pauses.settle_min_ms, self.pauses.settle_max_ms
            )));
        }
        self.selectors.validate()
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTimeouts {
    pub open_composer_ms: u64,
    pub composer_surface_ms: u64,
    pub source_kind_ms: u64,
    pub value_field_ms: u64,
    pub confirm_ms: u64,
    /// Covers the host's own server round-trip, hence generous
    pub completion_ms: u64,
}

impl Default for StepTimeouts {
    fn default() -> Self {
        Self {
            open_composer_ms: 7000,
            composer_surface_ms: 5000,
            source_kind_ms: 5000,
            value_field_ms: 5000,
            confirm_ms: 5000,
            completion_ms: 15000,
        }
    }
}

impl StepTimeouts {
    pub fn open_composer(&self) -> Duration {
        Duration::from_millis(self.open_composer_ms)
    }

    pub fn composer_surface(&self) -> Duration {
        Duration::from_millis(self.composer_surface_ms)
    }

    pub fn source_kind(&self) -> Duration {
        Duration::from_millis(self.source_kind_ms)
    }

    pub fn value_field(&self) -> Duration {
        Duration::from_millis(self.value_field_ms)
    }

    pub fn confirm(&self) -> Duration {
        Duration::from_millis(self.confirm_ms)
    }

    pub fn completion(&self) -> Duration {
        Duration::from_millis(self.completion_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pauses {
    pub warmup_ms: u64,
    pub after_open_ms: u64,
    pub after_kind_ms: u64,
    pub after_fill_ms: u64,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
}

impl Default for Pauses {
    fn default() -> Self {
        Self {
            warmup_ms: 500,
            after_open_ms: 500,
            after_kind_ms: 500,
            after_fill_ms: 250,
            settle_min_ms: 1500,
            settle_max_ms: 2000,
        }
    }
}

impl Pauses {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn after_open(&self) -> Duration {
        Duration::from_millis(self.after_open_ms)
    }

    pub fn after_kind(&self) -> Duration {
        Duration::from_millis(self.after_kind_ms)
    }

    pub fn after_fill(&self) -> Duration {
        Duration::from_millis(self.after_fill_ms)
    }

    /// Randomised delay in `[settle_min_ms, settle_max_ms]`
    pub fn settle(&self) -> Duration {
        let ms = if self.settle_min_ms >= self.settle_max_ms {
            self.settle_min_ms
        } else {
            rand::thread_rng().gen_range(self.settle_min_ms..=self.settle_max_ms)
        };
        Duration::from_millis(ms)
    }
}

/// Selectors and locator ladders for each composer step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    pub name: String,
    pub open_composer: Vec<LocatorStrategy>,
    /// The modal surface that appears once the composer is open
    pub composer_surface: String,
    /// Preferred selectors for the surface once it is fully shown
    pub active_surface: Vec<String>,
    pub source_kind: Vec<LocatorStrategy>,
    pub value_field: Vec<LocatorStrategy>,
    pub confirm: Vec<LocatorStrategy>,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self::marker()
    }
}

const ADD_SOURCE_BUTTON: &str = "button.add-source-button";
const DIALOG: &str = "mat-dialog-container";
const VISIBLE_DIALOG: &str = "mat-dialog-container:not([hidden])";
const URL_INPUT: &str = "input[formcontrolname=\"newUrl\"]";
const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";

impl SelectorProfile {
    /// Source kind chosen by the chip's icon, falling back to its text
    pub fn marker() -> Self {
        Self {
            name: "marker".to_string(),
            open_composer: vec![LocatorStrategy::attribute(ADD_SOURCE_BUTTON)],
            composer_surface: DIALOG.to_string(),
            active_surface: vec![VISIBLE_DIALOG.to_string()],
            source_kind: vec![
                LocatorStrategy::marker("mat-icon", "video_youtube", "mat-chip[tabindex=\"0\"]"),
                LocatorStrategy::content("YouTube"),
            ],
            value_field: vec![LocatorStrategy::attribute(URL_INPUT)],
            confirm: vec![LocatorStrategy::attribute(SUBMIT_BUTTON)],
        }
    }

    /// Open control and source kind chosen by accessible attributes first
    pub fn attribute() -> Self {
        Self {
            name: "attribute".to_string(),
            open_composer: vec![
                LocatorStrategy::attribute("button[aria-label=\"Add source\"]"),
                LocatorStrategy::attribute(ADD_SOURCE_BUTTON),
            ],
            source_kind: vec![
                LocatorStrategy::attribute("mat-chip[aria-label*=\"YouTube\"]"),
                LocatorStrategy::content("YouTube"),
            ],
            ..Self::marker()
        }
    }

    pub fn named(name: &str) -> Option<Self> {
        match name {
            "marker" => Some(Self::marker()),
            "attribute" => Some(Self::attribute()),
            _ => None,
        }
    }

    /// Surface scope, re-resolved on every query
    pub fn surface_scope(&self) -> Scope {
        Scope::within(self.composer_surface.clone())
    }

    /// Visible surface if there is one, otherwise any surface
    pub fn active_scope(&self) -> Scope {
        let mut selectors = self.active_surface.clone();
        selectors.push(self.composer_surface.clone());
        Scope::Within(selectors)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ladders = [
            ("open_composer", &self.open_composer),
            ("source_kind", &self.source_kind),
            ("value_field", &self.value_field),
            ("confirm", &self.confirm),
        ];
        for (step, ladder) in ladders {
            if ladder.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "selector ladder '{}' is empty",
                    step
                )));
            }
            for strategy in ladder {
                if let Some(field) = strategy.blank_field() {
                    return Err(ConfigError::Invalid(format!(
                        "selector ladder '{}' has a blank '{}' in {:?}",
                        step, field, strategy
                    )));
                }
            }
        }
        if self.active_surface.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "active_surface has a blank selector".to_string(),
            ));
        }
        if self.composer_surface.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "composer_surface selector is empty".to_string(),
            ));
        }
        Ok(())
    }
}
