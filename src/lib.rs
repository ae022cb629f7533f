#![warn(missing_docs)]

//! Runtime theming and localisation for payment input components.

pub use vello::peniko as color;

pub use tapkit_localisation as localisation;
pub use tapkit_theme as theme;

/// A "prelude" for users of tapkit.
///
/// Importing this module brings into scope the most common types
/// needed to theme and localise input components.
///
/// ```rust
/// use tapkit::prelude::*;
///
/// let registry = ThemeRegistry::new();
/// registry.set_light_dark_themes(builtin::default_light(), builtin::default_dark());
///
/// let localiser = Localiser::new("en");
/// assert_eq!(localiser.localize("card.number", None), "card.number");
/// ```
pub mod prelude {
    pub use tapkit_theme::prelude::*;

    pub use tapkit_localisation::{device_locale, normalize_locale, Localiser};
}
