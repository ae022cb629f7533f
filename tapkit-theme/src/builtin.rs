//! Default light and dark documents compiled into the crate.
//!
//! Used whenever loading the configured light/dark pair fails.

use std::path::PathBuf;

use crate::document::ThemeDocument;
use crate::loader::{parse_document, Bundle, DocumentFormat};

const DEFAULT_LIGHT: &str = include_str!("../themes/default_light.json");
const DEFAULT_DARK: &str = include_str!("../themes/default_dark.json");

/// The built-in light document.
pub fn default_light() -> ThemeDocument {
    parse_builtin(DEFAULT_LIGHT, "default_light.json")
}

/// The built-in dark document.
pub fn default_dark() -> ThemeDocument {
    parse_builtin(DEFAULT_DARK, "default_dark.json")
}

/// Directory holding the bundled default documents.
pub fn themes_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/themes"))
}

impl Bundle {
    /// The engine's bundled assets.
    pub fn builtin() -> Self {
        Bundle::new(themes_dir())
    }
}

fn parse_builtin(content: &str, name: &str) -> ThemeDocument {
    parse_document(content.as_bytes(), Some(DocumentFormat::Json), name).unwrap_or_else(|e| {
        log::error!("Built-in theme {} is invalid: {}", name, e);
        ThemeDocument::new()
    })
}
