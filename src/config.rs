//! Widget configuration handed over by the host page as a JSON string.
//!
//! Every field is optional; missing keys fall back to [`CanvasConfig::default`].
//! Unknown keys are rejected so typos surface at construction time instead of
//! being silently ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{EXPORT_FILE_NAME, EXPORT_SETTLE_MS};
use crate::tools::Color;

/// Error returned when configuration input cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON text did not deserialize into a [`CanvasConfig`].
    #[error("invalid canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A color value was not `#rgb` or `#rrggbb`.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// A numeric field is outside its allowed range.
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange { field: &'static str, expected: &'static str, value: f64 },
    /// The log level name is not one `log` understands.
    #[error("unknown log level: {0:?}")]
    LogLevel(String),
}

/// Settings for the PNG export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Download file name.
    pub file_name: String,
    /// Background passed to the rasterizer for transparent regions.
    pub background_color: Color,
    /// Device scale passed to the rasterizer.
    pub scale: f64,
    /// Milliseconds to wait after neutralizing the transform before capturing.
    pub settle_ms: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_owned(),
            background_color: Color::WHITE,
            scale: 2.0,
            settle_ms: EXPORT_SETTLE_MS,
        }
    }
}

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Fill of the raster surface; also the eraser color.
    pub background: Color,
    /// Initial brush color.
    pub stroke_color: Color,
    /// Initial brush width in content pixels.
    pub stroke_width: f64,
    /// Raster surface width in content pixels.
    pub surface_width: u32,
    /// Raster surface height in content pixels.
    pub surface_height: u32,
    /// Console log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    pub export: ExportConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            stroke_color: Color::BLACK,
            stroke_width: 3.0,
            surface_width: 2400,
            surface_height: 1600,
            log_level: "info".to_owned(),
            export: ExportConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. An empty or blank string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric ranges and the log level.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("stroke_width", self.stroke_width)?;
        positive("export.scale", self.export.scale)?;
        positive("surface_width", f64::from(self.surface_width))?;
        positive("surface_height", f64::from(self.surface_height))?;
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::OutOfRange {
                field: "export.file_name",
                expected: "non-empty",
                value: 0.0,
            });
        }
        self.level_filter()?;
        Ok(())
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for names `log` does not know.
    pub fn level_filter(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, expected: "a positive number", value })
    }
}
