//! # Theme Configuration
//!
//! [ThemeConfig] describes which documents a host starts with and how the
//! registry is set up. It can be built in code, read from the environment or
//! loaded from a TOML file, then applied to a [ThemeRegistry].
//!
//! ## Environment Variables
//!
//! - `TAPKIT_THEME`: source of a single theme (path or `https://` URL)
//! - `TAPKIT_THEME_LIGHT` / `TAPKIT_THEME_DARK`: a light/dark pair
//! - `TAPKIT_THEME_ASSETS`: directory probed for images
//! - `TAPKIT_THEME_LOCALE`: locale used for font substitution
//! - `TAPKIT_THEME_TRANSITION_MS`: re-apply transition duration, `0` disables it
//! - `TAPKIT_THEME_CONFIG`: path to a TOML configuration file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [theme]
//! light = "themes/light.json"
//! dark = "themes/dark.json"
//! assets = "assets/images"
//! locale = "ar-SA"
//! transition_ms = 250
//! ```
//!
//! ```rust
//! use tapkit_theme::config::ThemeConfig;
//!
//! let config = ThemeConfig::from_toml(r#"
//! [theme]
//! source = "themes/light.json"
//! locale = "en"
//! "#).unwrap();
//!
//! assert_eq!(config.locale.as_deref(), Some("en"));
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ThemeError, ThemeResult};
use crate::loader::DocumentSource;
use crate::registry::ThemeRegistry;
use crate::transition::TransitionConfig;

/// Startup configuration for a [ThemeRegistry].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// A single theme, used when no light/dark pair is configured.
    pub source: Option<String>,
    /// Light variant of a light/dark pair.
    pub light: Option<String>,
    /// Dark variant of a light/dark pair.
    pub dark: Option<String>,
    /// Directory probed for image files.
    pub assets: Option<PathBuf>,
    /// Locale used for font substitution.
    pub locale: Option<String>,
    /// Transition duration in milliseconds; `0` disables transitions.
    pub transition_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: ThemeConfig,
}

impl ThemeConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from `TAPKIT_THEME*` environment variables.
    ///
    /// A file named by `TAPKIT_THEME_CONFIG` is loaded first; the other
    /// variables override its values. An unreadable file is logged and skipped.
    pub fn from_env_or_default() -> Self {
        let mut config = match env::var("TAPKIT_THEME_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring theme configuration {}: {}", path, e);
                Self::new()
            }),
            Err(_) => Self::new(),
        };

        if let Ok(source) = env::var("TAPKIT_THEME") {
            config.source = Some(source);
        }
        if let Ok(light) = env::var("TAPKIT_THEME_LIGHT") {
            config.light = Some(light);
        }
        if let Ok(dark) = env::var("TAPKIT_THEME_DARK") {
            config.dark = Some(dark);
        }
        if let Ok(assets) = env::var("TAPKIT_THEME_ASSETS") {
            config.assets = Some(PathBuf::from(assets));
        }
        if let Ok(locale) = env::var("TAPKIT_THEME_LOCALE") {
            config.locale = Some(locale);
        }
        if let Ok(ms) = env::var("TAPKIT_THEME_TRANSITION_MS") {
            match ms.trim().parse() {
                Ok(ms) => config.transition_ms = Some(ms),
                Err(_) => log::warn!("TAPKIT_THEME_TRANSITION_MS is not a number: {}", ms),
            }
        }

        config
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ThemeResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            ThemeError::ConfigParse { details, .. } => ThemeError::config_parse(path, details),
            other => other,
        })
    }

    /// Parse a configuration from TOML content with a `[theme]` table.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ThemeError::config_parse("<memory>", e))?;
        Ok(file.theme)
    }

    /// Use a single theme source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Use a light/dark pair.
    pub fn with_light_dark(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.light = Some(light.into());
        self.dark = Some(dark.into());
        self
    }

    /// Set the image asset directory.
    pub fn with_assets(mut self, assets: impl Into<PathBuf>) -> Self {
        self.assets = Some(assets.into());
        self
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the transition duration.
    pub fn with_transition_ms(mut self, ms: u64) -> Self {
        self.transition_ms = Some(ms);
        self
    }

    /// The configured transition, if any.
    pub fn transition(&self) -> Option<TransitionConfig> {
        self.transition_ms.map(|ms| TransitionConfig::new(ms > 0, ms))
    }

    /// Configure `registry` and load the configured documents.
    ///
    /// A light/dark pair wins over a single source. A failing pair falls back
    /// to the built-in documents; a failing single source is returned as an
    /// error and leaves the registry's document untouched.
    pub fn apply(&self, registry: &ThemeRegistry) -> ThemeResult<()> {
        if let Some(transition) = self.transition() {
            registry.set_transition(transition);
        }

        if self.assets.is_some() || self.locale.is_some() {
            registry.update_environment(|environment| {
                if let Some(assets) = &self.assets {
                    environment.asset_root = Some(assets.clone());
                }
                if let Some(locale) = &self.locale {
                    environment.locale = locale.clone();
                }
            });
        }

        match (&self.light, &self.dark, &self.source) {
            (Some(light), Some(dark), _) => {
                registry.set_light_dark_sources(&DocumentSource::parse(light), &DocumentSource::parse(dark));
            },
            (_, _, Some(source)) => registry.set_theme_from(&DocumentSource::parse(source))?,
            (None, None, None) => log::debug!("No theme configured"),
            _ => log::warn!("Both light and dark themes must be configured, ignoring the pair"),
        }

        Ok(())
    }
}
