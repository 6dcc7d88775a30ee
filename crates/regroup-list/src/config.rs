#![forbid(unsafe_code)]

//! List configuration.
//!
//! [`ListConfig`] gathers the dimensions and timings every controller reads.
//! With the `config` feature it can be loaded from TOML or JSON; missing fields
//! take their defaults.
//!
//! ```toml
//! row_height = 56.0
//! section_header_height = 32.0
//! amazing_effect = true
//!
//! [viewport]
//! height = 844.0
//! insets = { top = 47.0, bottom = 34.0 }
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use regroup_core::Viewport;
use regroup_layout::Metrics;

/// Dimensions, timings, and feature switches for one list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ListConfig {
    /// Height of every item row, in pixels.
    pub row_height: f64,
    /// Height of every section header, in pixels.
    pub section_header_height: f64,
    /// Collapse a section's items while the section itself is dragged.
    pub amazing_effect: bool,
    pub viewport: Viewport,
    /// Distance from a viewport edge that triggers auto-scroll. Defaults to
    /// the row height.
    pub scroll_edge_threshold: Option<f64>,
    /// Fraction of a dragged section's height added to the pointer when
    /// testing the bottom edge zone.
    pub section_scroll_lead_in: f64,
    /// Duration of an edge auto-scroll to the top or bottom.
    pub auto_scroll_ms: u64,
    /// Duration of the tween that keeps a dragged element under the pointer.
    pub drag_follow_ms: u64,
    /// Duration of the settle after release and after data changes.
    pub settle_ms: u64,
    /// Duration of the collapse effect.
    pub collapse_ms: u64,
    /// Border width of a section highlighted as a drop target.
    pub drop_highlight_width: f64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            row_height: 50.0,
            section_header_height: 40.0,
            amazing_effect: false,
            viewport: Viewport::default(),
            scroll_edge_threshold: None,
            section_scroll_lead_in: 1.0 / 3.0,
            auto_scroll_ms: 2500,
            drag_follow_ms: 16,
            settle_ms: 300,
            collapse_ms: 200,
            drop_highlight_width: 2.0,
        }
    }
}

impl ListConfig {
    #[must_use]
    pub fn new(row_height: f64, section_header_height: f64) -> Self {
        Self {
            row_height,
            section_header_height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_amazing_effect(mut self, enabled: bool) -> Self {
        self.amazing_effect = enabled;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_scroll_edge_threshold(mut self, threshold: f64) -> Self {
        self.scroll_edge_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_section_scroll_lead_in(mut self, fraction: f64) -> Self {
        self.section_scroll_lead_in = fraction;
        self
    }

    #[must_use]
    pub fn with_auto_scroll_ms(mut self, ms: u64) -> Self {
        self.auto_scroll_ms = ms;
        self
    }

    #[must_use]
    pub fn with_settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }

    #[must_use]
    pub fn with_collapse_ms(mut self, ms: u64) -> Self {
        self.collapse_ms = ms;
        self
    }

    #[must_use]
    pub fn with_drop_highlight_width(mut self, width: f64) -> Self {
        self.drop_highlight_width = width;
        self
    }

    #[inline]
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.row_height, self.section_header_height)
    }

    #[inline]
    #[must_use]
    pub fn edge_threshold(&self) -> f64 {
        self.scroll_edge_threshold.unwrap_or(self.row_height)
    }

    #[must_use]
    pub fn auto_scroll_duration(&self) -> Duration {
        Duration::from_millis(self.auto_scroll_ms)
    }

    #[must_use]
    pub fn drag_follow_duration(&self) -> Duration {
        Duration::from_millis(self.drag_follow_ms)
    }

    #[must_use]
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[must_use]
    pub fn collapse_duration(&self) -> Duration {
        Duration::from_millis(self.collapse_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let positive = [
            ("row_height", self.row_height),
            ("section_header_height", self.section_header_height),
            ("viewport.height", self.viewport.height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be finite and > 0, got {value}"));
            }
        }

        let non_negative = [
            ("viewport.insets.top", self.viewport.insets.top),
            ("viewport.insets.bottom", self.viewport.insets.bottom),
            ("drop_highlight_width", self.drop_highlight_width),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if let Some(threshold) = self.scroll_edge_threshold
            && (!threshold.is_finite() || threshold < 0.0)
        {
            errors.push(format!(
                "scroll_edge_threshold must be finite and >= 0, got {threshold}"
            ));
        }

        if !(0.0..=1.0).contains(&self.section_scroll_lead_in) {
            errors.push(format!(
                "section_scroll_lead_in must be in [0, 1], got {}",
                self.section_scroll_lead_in
            ));
        }

        errors
    }

    /// [`validate`](Self::validate), as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or validating a [`ListConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
