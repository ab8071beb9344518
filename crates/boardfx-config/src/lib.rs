//! boardfx configuration
//!
//! Loads animation defaults from `boardfx.toml`, with `BOARDFX_*` environment
//! variables taking precedence. Values are kept as plain strings and numbers
//! here; the engine turns them into typed settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default file looked up by [`BoardFxConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "boardfx.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoardFxConfig {
    /// Manager-level animation defaults
    pub animations: AnimationsConfig,
    /// Floating message / scoring / bubble settings
    pub display: DisplayConfig,
    /// CSS-transition animation path
    pub legacy: LegacyConfig,
    /// Headless demo settings
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationsConfig {
    /// Default duration in milliseconds
    pub duration_ms: f64,
    /// CSS easing (`ease-in-out`, `cubic-bezier(...)`, ...). Unset keeps
    /// each operation's own default easing.
    pub easing: Option<String>,
    /// `all`, `none`, `from` or `to`
    pub filling_spaces: String,
    /// Scale at the middle of a slide; 1.0 disables the bump. Unset keeps
    /// the built-in 1.2.
    pub bump: Option<f64>,
    /// z-index applied to moving elements
    pub z_index: i32,
    /// Skip all animations (replay / fast-forward)
    pub instantaneous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long messages and scores stay on screen
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Extra time granted to a transition before it is force-completed
    pub timeout_margin_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Scene to replay (slide, swap, sequence, scoring, fade, legacy)
    pub scene: String,
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            easing: None,
            filling_spaces: "all".to_string(),
            bump: None,
            z_index: 10,
            instantaneous: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
        }
    }
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            timeout_margin_ms: 100.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: "slide".to_string(),
        }
    }
}

fn truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl BoardFxConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `boardfx.toml` from the current directory, or defaults if it is
    /// missing. A file that exists but does not parse is reported and ignored.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(err) => {
                tracing::warn!(%err, file = DEFAULT_CONFIG_FILE, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source. Unparsable numbers are
    /// skipped.
    pub fn merge_with_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("BOARDFX_DURATION_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.animations.duration_ms = ms;
            }
        }
        if let Some(easing) = var("BOARDFX_EASING") {
            self.animations.easing = Some(easing);
        }
        if let Some(policy) = var("BOARDFX_FILLING_SPACES") {
            self.animations.filling_spaces = policy;
        }
        if let Some(val) = var("BOARDFX_BUMP") {
            if let Ok(bump) = val.parse::<f64>() {
                self.animations.bump = Some(bump);
            }
        }
        if let Some(val) = var("BOARDFX_INSTANTANEOUS") {
            self.animations.instantaneous = truthy(&val);
        }
        if let Some(val) = var("BOARDFX_DISPLAY_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.display.duration_ms = ms;
            }
        }
        // DEMO_SCENE is what the demo binary has always read.
        if let Some(scene) = var("BOARDFX_SCENE").or_else(|| var("DEMO_SCENE")) {
            self.demo.scene = scene;
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
