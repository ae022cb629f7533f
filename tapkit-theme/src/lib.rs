#![warn(missing_docs)]

//! # TapKit Theming System
//!
//! A runtime theme engine for input components. Themes are plain documents
//! (JSON, property lists or TOML) loaded at runtime; UI objects bind typed
//! selectors to their attributes and are re-themed whenever the active theme
//! changes.
//!
//! ## Overview
//!
//! - **[ThemeDocument](document::ThemeDocument)**: the raw nested document
//! - **[DocumentLoader](loader::DocumentLoader)**: loads documents from files, bundles or URLs
//! - **[decode]**: typed decoding of colors, fonts, images and styles
//! - **[Selector](selector::Selector)**: a deferred typed value
//! - **[ThemeRegistry](registry::ThemeRegistry)**: active theme state and change broadcasts
//! - **[ThemeBindings](binding::ThemeBindings)**: re-applies selectors to a UI object
//! - **[ThemeConfig](config::ThemeConfig)**: startup configuration from env or TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use tapkit_theme::prelude::*;
//!
//! let registry = ThemeRegistry::new();
//! registry.set_theme(
//!     ThemeDocument::new()
//!         .with("cardNumberTextField", ThemeDocument::new().with("font", "Roboto-Bold,14")),
//! );
//!
//! let font = Selector::font("cardNumberTextField.font").value(&registry);
//! assert_eq!(font.as_ref().and_then(|f| f.as_font()).and_then(|f| f.family()), Some("Roboto-Bold"));
//! ```
//!
//! ## Light and Dark
//!
//! ```rust
//! use tapkit_theme::prelude::*;
//!
//! let registry = ThemeRegistry::new();
//! registry.set_light_dark_themes(builtin::default_light(), builtin::default_dark());
//! registry.notify_appearance_changed(Appearance::Dark);
//! ```
//!
//! ## Features
//!
//! - `remote` (default): fetch `.json` documents over http(s)
//! - `watch` (default): [hot reload](watch) of local documents

/// Attribute bindings and the [binding::Themeable] adapter trait.
pub mod binding;
/// Built-in default documents.
pub mod builtin;
/// Startup configuration.
pub mod config;
/// Typed value decoding.
pub mod decode;
/// Raw theme documents.
pub mod document;
/// Error types.
pub mod error;
/// Dotted key-path resolution.
pub mod key_path;
/// Document loading.
pub mod loader;
/// Typed values and selector kinds.
pub mod properties;
/// The theme registry.
pub mod registry;
/// Selectors.
pub mod selector;
/// Transition configuration.
pub mod transition;
/// Hot reload.
#[cfg(feature = "watch")]
pub mod watch;

/// Commonly used types.
pub mod prelude {
    pub use vello::peniko::Color;

    pub use crate::binding::{ThemeBindings, Themeable};
    pub use crate::builtin;
    pub use crate::config::ThemeConfig;
    pub use crate::decode::font::{FontCatalog, FontDescriptor, TextStyle};
    pub use crate::decode::image::{ImageCatalog, ImageOrigin, ImageRef};
    pub use crate::decode::styles::{
        ActivityIndicatorStyle, BarStyle, BlurEffectStyle, KeyboardAppearance, ScrollIndicatorStyle,
        StatusBarStyle,
    };
    pub use crate::decode::ThemeEnvironment;
    pub use crate::document::{DocValue, ThemeDocument};
    pub use crate::error::{DecodeError, LoadError, ThemeError, ThemeResult};
    pub use crate::loader::{Bundle, DocumentFormat, DocumentLoader, DocumentSource, RemoteOptions};
    pub use crate::properties::{ControlState, NavigationBarAppearance, SelectorKind, ThemeValue};
    pub use crate::registry::{Appearance, SubscriptionId, ThemeObserver, ThemeRegistry};
    pub use crate::selector::{Selector, ValueSource};
    pub use crate::transition::TransitionConfig;
    #[cfg(feature = "watch")]
    pub use crate::watch::{ThemeWatcher, WatchTarget};
}
