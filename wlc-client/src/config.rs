//! Runtime configuration, loadable from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Window settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Animation settings.
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial surface width in pixels, before the compositor configures
    /// its own size.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial surface height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Toplevel title.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_title() -> String {
    "wlc demo".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

/// Animation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Checkerboard scroll speed in pixels per second.
    #[serde(default = "default_scroll_rate")]
    pub scroll_rate: f64,
}

fn default_scroll_rate() -> f64 {
    wlc_render::DEFAULT_SCROLL_RATE
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            scroll_rate: default_scroll_rate(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ClientError::Config(format!("{}: {err}", path.display())))?;
        toml::from_str(&text)
            .map_err(|err| ClientError::Config(format!("{}: {err}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(config.display.width, 640);
        assert_eq!(config.display.height, 480);
        assert_eq!(config.display.title, "wlc demo");
        assert_eq!(config.animation.scroll_rate, 24.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(
            r#"
            [display]
            width = 800

            [animation]
            scroll_rate = 48.0
            "#,
        )
        .unwrap();
        assert_eq!(config.display.width, 800);
        assert_eq!(config.display.height, 480);
        assert_eq!(config.animation.scroll_rate, 48.0);
    }

    #[test]
    fn empty_toml_is_a_full_default_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.display.width, 640);
        assert_eq!(config.animation.scroll_rate, 24.0);
    }
}
