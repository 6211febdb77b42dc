//! Configuration for rendering

use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration options for markup generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Attribute carrying a handler id until its listener is bound
    pub marker_attribute: String,

    /// Prefix of generated handler ids (`handler_0`, `handler_1`, ...)
    pub handler_prefix: String,

    /// Attribute the bare `translate` keyword is rewritten to
    pub translate_attribute: String,

    /// Selector of the style block preserved across re-renders
    pub style_selector: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_attribute: "data-event-handler-id".to_string(),
            handler_prefix: "handler_".to_string(),
            translate_attribute: "data-translate".to_string(),
            style_selector: "style".to_string(),
        }
    }
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    markers: Option<TomlMarkers>,
    surface: Option<TomlSurface>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlMarkers {
    event_handler: Option<String>,
    handler_prefix: Option<String>,
    translate: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSurface {
    style_selector: Option<String>,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded render config {}", path.display());
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(markers) = parsed.markers {
            if let Some(v) = markers.event_handler {
                config.marker_attribute = v;
            }
            if let Some(v) = markers.handler_prefix {
                config.handler_prefix = v;
            }
            if let Some(v) = markers.translate {
                config.translate_attribute = v;
            }
        }
        if let Some(v) = parsed.surface.and_then(|s| s.style_selector) {
            config.style_selector = v;
        }

        Ok(config)
    }

    /// Set the handler marker attribute
    pub fn with_marker_attribute(mut self, name: impl Into<String>) -> Self {
        self.marker_attribute = name.into();
        self
    }

    /// Set the handler id prefix
    pub fn with_handler_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.handler_prefix = prefix.into();
        self
    }

    /// Set the attribute `translate` is rewritten to
    pub fn with_translate_attribute(mut self, name: impl Into<String>) -> Self {
        self.translate_attribute = name.into();
        self
    }

    /// Set the selector of the preserved style block
    pub fn with_style_selector(mut self, selector: impl Into<String>) -> Self {
        self.style_selector = selector.into();
        self
    }

    /// Handler id for the `index`-th binding of a render
    pub fn handler_id(&self, index: usize) -> String {
        format!("{}{}", self.handler_prefix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.marker_attribute, "data-event-handler-id");
        assert_eq!(config.handler_id(3), "handler_3");
        assert_eq!(config.translate_attribute, "data-translate");
        assert_eq!(config.style_selector, "style");
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_marker_attribute("data-h")
            .with_handler_prefix("h")
            .with_translate_attribute("i18n")
            .with_style_selector("style.theme");

        assert_eq!(config.marker_attribute, "data-h");
        assert_eq!(config.handler_id(0), "h0");
        assert_eq!(config.translate_attribute, "i18n");
        assert_eq!(config.style_selector, "style.theme");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RenderConfig::from_toml(
            r#"
            [markers]
            handler_prefix = "cb_"
            "#,
        )
        .unwrap();
        assert_eq!(config.handler_id(1), "cb_1");
        assert_eq!(config.marker_attribute, "data-event-handler-id");
    }

    #[test]
    fn test_from_toml_full() {
        let config = RenderConfig::from_toml(
            r#"
            [markers]
            event_handler = "data-on"
            handler_prefix = "on_"
            translate = "data-i18n"

            [surface]
            style_selector = "style#theme"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            RenderConfig::new()
                .with_marker_attribute("data-on")
                .with_handler_prefix("on_")
                .with_translate_attribute("data-i18n")
                .with_style_selector("style#theme")
        );
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(matches!(
            RenderConfig::from_toml("[markers]\ncolour = \"red\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            RenderConfig::from_file(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
