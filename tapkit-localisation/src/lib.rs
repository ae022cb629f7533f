#![warn(missing_docs)]

//! # TapKit Localisation
//!
//! Resolves dotted key paths in locale documents, falling back from the
//! configured locale to the device locale, then to English, and finally to the
//! key path itself. Lookups never fail.
//!
//! ```rust
//! use tapkit_localisation::Localiser;
//! use tapkit_theme::document::ThemeDocument;
//!
//! let localiser = Localiser::new("en_US");
//! localiser.set_primary(Some(
//!     ThemeDocument::new().with("en", ThemeDocument::new().with("cvv", "Security code")),
//! ));
//!
//! assert_eq!(localiser.localize("cvv", None), "Security code");
//! assert_eq!(localiser.localize("expiry", None), "expiry");
//! ```

/// Locale identifiers.
pub mod locale;
/// The localiser.
pub mod resolver;

pub use locale::{device_locale, normalize_locale, DEFAULT_LOCALE};
pub use resolver::Localiser;
