//! # Font Decoding
//!
//! Font strings come in three shapes:
//!
//! - `"<name>,<size>"`, e.g. `"Roboto-Bold,14"`
//! - `"<size>"`, the system font at that size
//! - `"<TextStyle>"`, a semantic text style such as `"headline"`
//!
//! Named fonts are first matched against the built-in families (Roboto for
//! Latin scripts, Tajawal for Arabic). When the active locale is Arabic the
//! Latin weights are swapped for their Arabic counterparts. Other names must
//! be registered in the caller's [FontCatalog]; anything else falls back to
//! the system font at the requested size.

use indexmap::IndexMap;

use crate::document::DocValue;

/// A decoded font.
#[derive(Debug, Clone, PartialEq)]
pub enum FontDescriptor {
    /// A concrete family at a point size.
    Named {
        /// Family (PostScript) name.
        family: String,
        /// Point size.
        size: f32,
    },
    /// The platform default font at a point size.
    System {
        /// Point size.
        size: f32,
    },
    /// The platform's preferred font for a semantic text style.
    TextStyle(TextStyle),
}

impl FontDescriptor {
    /// Point size, when the descriptor carries one.
    pub fn size(&self) -> Option<f32> {
        match self {
            FontDescriptor::Named { size, .. } | FontDescriptor::System { size } => Some(*size),
            FontDescriptor::TextStyle(_) => None,
        }
    }

    /// Family name, when the descriptor names one.
    pub fn family(&self) -> Option<&str> {
        match self {
            FontDescriptor::Named { family, .. } => Some(family),
            _ => None,
        }
    }
}

/// Semantic text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Large title.
    LargeTitle,
    /// First level title.
    Title1,
    /// Second level title.
    Title2,
    /// Third level title.
    Title3,
    /// Headline.
    Headline,
    /// Subheadline.
    Subheadline,
    /// Body text.
    Body,
    /// Callout.
    Callout,
    /// Footnote.
    Footnote,
    /// Primary caption.
    Caption1,
    /// Secondary caption.
    Caption2,
}

impl TextStyle {
    const PLATFORM_PREFIX: &'static str = "UICTFontTextStyle";

    /// Parse a style name. Case-insensitive; the platform prefix is optional.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let prefix_len = Self::PLATFORM_PREFIX.len();
        let bare = match (trimmed.get(..prefix_len), trimmed.get(prefix_len..)) {
            (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case(Self::PLATFORM_PREFIX) => rest,
            _ => trimmed,
        };

        match bare.to_ascii_lowercase().as_str() {
            "largetitle" => Some(Self::LargeTitle),
            "title1" => Some(Self::Title1),
            "title2" => Some(Self::Title2),
            "title3" => Some(Self::Title3),
            "headline" => Some(Self::Headline),
            "subheadline" => Some(Self::Subheadline),
            "body" => Some(Self::Body),
            "callout" => Some(Self::Callout),
            "footnote" => Some(Self::Footnote),
            "caption1" => Some(Self::Caption1),
            "caption2" => Some(Self::Caption2),
            _ => None,
        }
    }

    /// Capitalized style name, e.g. `Headline`.
    pub fn name(&self) -> &'static str {
        match self {
            TextStyle::LargeTitle => "LargeTitle",
            TextStyle::Title1 => "Title1",
            TextStyle::Title2 => "Title2",
            TextStyle::Title3 => "Title3",
            TextStyle::Headline => "Headline",
            TextStyle::Subheadline => "Subheadline",
            TextStyle::Body => "Body",
            TextStyle::Callout => "Callout",
            TextStyle::Footnote => "Footnote",
            TextStyle::Caption1 => "Caption1",
            TextStyle::Caption2 => "Caption2",
        }
    }

    /// Platform identifier, e.g. `UICTFontTextStyleHeadline`.
    pub fn platform_name(&self) -> String {
        format!("{}{}", Self::PLATFORM_PREFIX, self.name())
    }
}

/// Fonts that ship with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    /// Roboto Thin.
    RobotoThin,
    /// Roboto Light.
    RobotoLight,
    /// Roboto Regular.
    RobotoRegular,
    /// Roboto Medium.
    RobotoMedium,
    /// Roboto Bold.
    RobotoBold,
    /// Tajawal Light.
    TajawalLight,
    /// Tajawal Regular.
    TajawalRegular,
    /// Tajawal Medium.
    TajawalMedium,
    /// Tajawal Bold.
    TajawalBold,
    /// Tajawal Black.
    TajawalBlack,
}

impl BuiltinFont {
    /// Every built-in font.
    pub const ALL: [BuiltinFont; 10] = [
        BuiltinFont::RobotoThin,
        BuiltinFont::RobotoLight,
        BuiltinFont::RobotoRegular,
        BuiltinFont::RobotoMedium,
        BuiltinFont::RobotoBold,
        BuiltinFont::TajawalLight,
        BuiltinFont::TajawalRegular,
        BuiltinFont::TajawalMedium,
        BuiltinFont::TajawalBold,
        BuiltinFont::TajawalBlack,
    ];

    /// PostScript family name.
    pub fn family_name(&self) -> &'static str {
        match self {
            BuiltinFont::RobotoThin => "Roboto-Thin",
            BuiltinFont::RobotoLight => "Roboto-Light",
            BuiltinFont::RobotoRegular => "Roboto-Regular",
            BuiltinFont::RobotoMedium => "Roboto-Medium",
            BuiltinFont::RobotoBold => "Roboto-Bold",
            BuiltinFont::TajawalLight => "Tajawal-Light",
            BuiltinFont::TajawalRegular => "Tajawal-Regular",
            BuiltinFont::TajawalMedium => "Tajawal-Medium",
            BuiltinFont::TajawalBold => "Tajawal-Bold",
            BuiltinFont::TajawalBlack => "Tajawal-Black",
        }
    }

    /// Look a family name up, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|font| font.family_name().eq_ignore_ascii_case(name))
    }

    /// The font to use for `locale`. Latin weights map to a heavier Arabic
    /// weight in Arabic locales; everything else is returned unchanged.
    pub fn localized(self, locale: &str) -> Self {
        if !is_arabic_locale(locale) {
            return self;
        }
        match self {
            BuiltinFont::RobotoThin | BuiltinFont::RobotoLight => BuiltinFont::TajawalRegular,
            BuiltinFont::RobotoRegular => BuiltinFont::TajawalMedium,
            BuiltinFont::RobotoMedium => BuiltinFont::TajawalBold,
            BuiltinFont::RobotoBold => BuiltinFont::TajawalBlack,
            arabic => arabic,
        }
    }
}

/// Whether `locale` selects Arabic (`ar`, `ar-SA`, `ar_EG`, ...).
pub fn is_arabic_locale(locale: &str) -> bool {
    let language = locale.trim().split(['-', '_']).next().unwrap_or_default();
    language.eq_ignore_ascii_case("ar")
}

/// Fonts registered by the host application, beyond the built-in families.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    families: IndexMap<String, Option<Vec<u8>>>,
}

impl FontCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family that is already installed on the platform.
    pub fn register_family(&mut self, name: impl Into<String>) {
        self.families.insert(name.into(), None);
    }

    /// Register a family from font file bytes.
    ///
    /// Bytes that are not a TrueType/OpenType font are rejected with a log
    /// line and the family stays unregistered, so lookups fall back to the
    /// system font. Returns whether the family was registered.
    pub fn register_font_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        let name = name.into();
        if !looks_like_font(&bytes) {
            log::error!("Font data for '{}' is not a TrueType/OpenType font, using the system font", name);
            return false;
        }
        self.families.insert(name, Some(bytes));
        true
    }

    /// Whether a family is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    /// Raw bytes of a family registered through [Self::register_font_bytes].
    pub fn font_bytes(&self, name: &str) -> Option<&[u8]> {
        self.families.get(name).and_then(|bytes| bytes.as_deref())
    }

    /// Registered family names.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

fn looks_like_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

/// Parse a font string for `locale`, consulting `catalog` for non built-in names.
pub fn parse_font(input: &str, locale: &str, catalog: &FontCatalog) -> Option<FontDescriptor> {
    let input = input.trim();

    if let Some((name, size)) = input.split_once(',') {
        let name = name.trim();
        let Ok(size) = size.trim().parse::<f32>() else {
            log::warn!("Font '{}' has an invalid size", input);
            return None;
        };

        if let Some(builtin) = BuiltinFont::from_name(name) {
            return Some(FontDescriptor::Named {
                family: builtin.localized(locale).family_name().to_string(),
                size,
            });
        }
        if catalog.contains(name) {
            return Some(FontDescriptor::Named {
                family: name.to_string(),
                size,
            });
        }

        log::warn!("Font family '{}' is not registered, using the system font", name);
        return Some(FontDescriptor::System { size });
    }

    if let Ok(size) = input.parse::<f32>() {
        return Some(FontDescriptor::System { size });
    }

    let style = TextStyle::from_name(input);
    if style.is_none() {
        log::warn!("'{}' is neither a font nor a text style", input);
    }
    style.map(FontDescriptor::TextStyle)
}

/// Decode a raw document value into a font.
pub fn decode_font(raw: &DocValue, locale: &str, catalog: &FontCatalog) -> Option<FontDescriptor> {
    match raw {
        DocValue::String(value) => parse_font(value, locale, catalog),
        DocValue::Number(size) => Some(FontDescriptor::System { size: *size as f32 }),
        other => {
            log::warn!("Expected a font string, found {}", other.type_name());
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(family: &str, size: f32) -> Option<FontDescriptor> {
        Some(FontDescriptor::Named {
            family: family.to_string(),
            size,
        })
    }

    #[test]
    fn test_builtin_font_keeps_name_outside_arabic() {
        let catalog = FontCatalog::new();
        assert_eq!(parse_font("Roboto-Bold,14", "en", &catalog), named("Roboto-Bold", 14.0));
        assert_eq!(parse_font("Roboto-Bold,14", "fr-FR", &catalog), named("Roboto-Bold", 14.0));
    }

    #[test]
    fn test_arabic_locale_substitutes_weights() {
        let catalog = FontCatalog::new();
        assert_eq!(parse_font("Roboto-Bold,14", "ar", &catalog), named("Tajawal-Black", 14.0));
        assert_eq!(parse_font("Roboto-Medium,12", "ar-SA", &catalog), named("Tajawal-Bold", 12.0));
        assert_eq!(parse_font("Roboto-Regular,12", "ar", &catalog), named("Tajawal-Medium", 12.0));
        assert_eq!(parse_font("Roboto-Thin,12", "ar", &catalog), named("Tajawal-Regular", 12.0));
        assert_eq!(parse_font("Roboto-Light,12", "ar", &catalog), named("Tajawal-Regular", 12.0));
        assert_eq!(parse_font("Tajawal-Light,12", "ar", &catalog), named("Tajawal-Light", 12.0));
    }

    #[test]
    fn test_catalog_and_system_fallback() {
        let mut catalog = FontCatalog::new();
        catalog.register_family("Brand-Display");

        assert_eq!(parse_font("Brand-Display,20", "en", &catalog), named("Brand-Display", 20.0));
        assert_eq!(
            parse_font("Missing-Font,20", "en", &catalog),
            Some(FontDescriptor::System { size: 20.0 })
        );
        assert_eq!(parse_font("Missing-Font,big", "en", &catalog), None);
    }

    #[test]
    fn test_bare_size_and_text_styles() {
        let catalog = FontCatalog::new();
        assert_eq!(parse_font("17", "en", &catalog), Some(FontDescriptor::System { size: 17.0 }));
        assert_eq!(
            parse_font("headline", "en", &catalog),
            Some(FontDescriptor::TextStyle(TextStyle::Headline))
        );
        assert_eq!(
            parse_font("UICTFontTextStyleCaption1", "en", &catalog),
            Some(FontDescriptor::TextStyle(TextStyle::Caption1))
        );
        assert_eq!(TextStyle::LargeTitle.platform_name(), "UICTFontTextStyleLargeTitle");
        assert_eq!(parse_font("Helvetica", "en", &catalog), None);
    }

    #[test]
    fn test_invalid_font_bytes_are_not_registered() {
        let mut catalog = FontCatalog::new();
        assert!(!catalog.register_font_bytes("Broken", b"not a font".to_vec()));
        assert!(!catalog.contains("Broken"));

        assert!(catalog.register_font_bytes("Otf", b"OTTO\0\0\0\0".to_vec()));
        assert_eq!(catalog.font_bytes("Otf").map(<[u8]>::len), Some(8));
    }
}
