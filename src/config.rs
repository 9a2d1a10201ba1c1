// src/config.rs

//! Defines the configuration structures for the `painter` server.
//!
//! Every section deserializes with defaults for missing fields, so a config
//! file only needs the settings it changes. The file is JSON and is located
//! through the `PAINTER_CONFIG` environment variable; without it the defaults
//! apply.

use crate::geometry::Size;
use crate::painter::CoordinateMode;
use anyhow::{Context, Result};
use log::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "PAINTER_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the painter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP transport settings.
    pub server: ServerConfig,
    /// Canvas geometry and command interpretation.
    pub canvas: CanvasConfig,
    /// Display settings.
    pub display: DisplayConfig,
}

impl Config {
    /// Loads the file named by `PAINTER_CONFIG`, or the defaults.
    ///
    /// A missing or malformed file is logged and replaced by defaults.
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            debug!("Config: {} not set, using defaults", CONFIG_ENV_VAR);
            return Config::default();
        };
        match Config::from_file(&path) {
            Ok(config) => {
                info!("Config: Loaded {}", path);
                config
            }
            Err(e) => {
                warn!("Config: {:#}; using defaults", e);
                Config::default()
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Config::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// --- Server Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP transport binds to.
    pub listen_addr: String,
    /// Largest accepted request body. Longer bodies are answered with 500.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: "127.0.0.1:17000".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

// --- Canvas Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Initial texture width in pixels.
    pub width: u32,
    /// Initial texture height in pixels.
    pub height: u32,
    /// How the parser reads geometry arguments.
    pub coordinates: CoordinateMode,
}

impl CanvasConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 800,
            height: 800,
            coordinates: CoordinateMode::Absolute,
        }
    }
}

// --- Display Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: "Simple painter".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_log::test;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_json(
            r#"{ "server": { "listen_addr": "0.0.0.0:8080" },
                 "canvas": { "coordinates": "normalized", "width": 400 } }"#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.canvas.coordinates, CoordinateMode::Normalized);
        assert_eq!(config.canvas.size(), Size::new(400, 800));
        assert_eq!(config.display.title, "Simple painter");
    }

    #[test]
    fn unknown_coordinate_mode_is_rejected() {
        assert!(Config::from_json(r#"{ "canvas": { "coordinates": "polar" } }"#).is_err());
    }

    #[test]
    fn from_file_reads_json() {
        let path = std::env::temp_dir().join(format!("painter-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "display": {{ "title": "test" }} }}"#).unwrap();
        drop(file);

        let config = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.display.title, "test");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::from_file("/nonexistent/painter.json").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
