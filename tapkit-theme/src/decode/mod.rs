//! # Typed Value Decoding
//!
//! Turns raw [DocValue]s into typed [ThemeValue]s according to a
//! [SelectorKind]. Decoding never fails hard: a value that cannot be decoded
//! is either absent (`None`) or replaced by the kind's default, and a log line
//! records what happened.
//!
//! | Kind | Absent / invalid |
//! |------|------------------|
//! | colors, fonts, images, maps | `None` |
//! | floats | `0.0` |
//! | enumerated styles | the style's default case |
//! | navigation bar appearance | empty appearance |

pub mod color;
pub mod font;
pub mod image;
pub mod styles;

use std::path::PathBuf;

use crate::document::{DocValue, ThemeDocument};
use crate::properties::{NavigationBarAppearance, SelectorKind, ThemeValue};

use self::font::FontCatalog;
use self::image::ImageCatalog;
use self::styles::{
    ActivityIndicatorStyle, BarStyle, BlurEffectStyle, KeyboardAppearance, ScrollIndicatorStyle,
    StatusBarStyle, StyleValue,
};

/// Palette prefixes searched when a color string is not a hex color.
pub const DEFAULT_PALETTE_PREFIXES: [&str; 2] = ["GlobalValues.Colors", "Global.Colors"];

/// Host-provided resources the decoders consult.
#[derive(Debug, Clone)]
pub struct ThemeEnvironment {
    /// Locale used for font substitution, e.g. `en` or `ar-SA`.
    pub locale: String,
    /// Key-path prefixes under which palette colors live.
    pub palette_prefixes: Vec<String>,
    /// Registered fonts.
    pub fonts: FontCatalog,
    /// Primary image catalog.
    pub images: ImageCatalog,
    /// Fallback image catalog.
    pub default_images: ImageCatalog,
    /// Directory probed for image files.
    pub asset_root: Option<PathBuf>,
}

impl Default for ThemeEnvironment {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            palette_prefixes: DEFAULT_PALETTE_PREFIXES.iter().map(|p| p.to_string()).collect(),
            fonts: FontCatalog::default(),
            images: ImageCatalog::default(),
            default_images: ImageCatalog::default(),
            asset_root: None,
        }
    }
}

impl ThemeEnvironment {
    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the asset root.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }
}

/// Everything a decoder needs besides the raw value.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// The active document, used for palette lookups.
    pub document: Option<&'a ThemeDocument>,
    /// Host resources.
    pub environment: &'a ThemeEnvironment,
}

impl<'a> DecodeContext<'a> {
    /// Create a context.
    pub fn new(document: Option<&'a ThemeDocument>, environment: &'a ThemeEnvironment) -> Self {
        Self { document, environment }
    }
}

/// Decode `raw` as a value of `kind`.
pub fn decode(kind: SelectorKind, raw: Option<&DocValue>, ctx: &DecodeContext<'_>) -> Option<ThemeValue> {
    match kind {
        SelectorKind::Float => return Some(ThemeValue::Float(decode_float(raw))),
        SelectorKind::BarStyle => return Some(ThemeValue::BarStyle(BarStyle::decode(raw))),
        SelectorKind::StatusBarStyle => return Some(ThemeValue::StatusBarStyle(StatusBarStyle::decode(raw))),
        SelectorKind::KeyboardAppearance => {
            return Some(ThemeValue::KeyboardAppearance(KeyboardAppearance::decode(raw)))
        },
        SelectorKind::ScrollIndicatorStyle => {
            return Some(ThemeValue::ScrollIndicatorStyle(ScrollIndicatorStyle::decode(raw)))
        },
        SelectorKind::ActivityIndicatorStyle => {
            return Some(ThemeValue::ActivityIndicatorStyle(ActivityIndicatorStyle::decode(raw)))
        },
        SelectorKind::BlurEffect => return Some(ThemeValue::BlurEffect(BlurEffectStyle::decode(raw))),
        SelectorKind::NavigationBarAppearance => {
            return Some(ThemeValue::NavigationBarAppearance(decode_navigation_bar_appearance(
                raw, ctx,
            )))
        },
        _ => {},
    }

    let raw = raw?;
    match kind {
        SelectorKind::Color => color::decode_color(raw, ctx).map(ThemeValue::Color),
        SelectorKind::CgColor => color::decode_color(raw, ctx).map(ThemeValue::CgColor),
        SelectorKind::Font => {
            font::decode_font(raw, &ctx.environment.locale, &ctx.environment.fonts).map(ThemeValue::Font)
        },
        SelectorKind::Image => image::decode_image(raw, ctx.environment).map(ThemeValue::Image),
        SelectorKind::StringAttributes => decode_map(raw, kind).map(ThemeValue::StringAttributes),
        SelectorKind::Dictionary => decode_map(raw, kind).map(ThemeValue::Dictionary),
        _ => None,
    }
}

/// Decode a float. Numbers pass through, numeric strings are parsed and
/// anything else (including an absent value) is `0.0`.
pub fn decode_float(raw: Option<&DocValue>) -> f64 {
    match raw {
        Some(DocValue::Number(value)) => *value,
        Some(DocValue::String(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("'{}' is not a number, using 0", value);
            0.0
        }),
        Some(other) => {
            log::warn!("Expected a number, found {}, using 0", other.type_name());
            0.0
        },
        None => {
            log::debug!("No float value, using 0");
            0.0
        },
    }
}

/// Decode a boolean from a bool, `"true"`/`"false"`/`"yes"`/`"no"` or a number.
pub fn decode_bool(raw: Option<&DocValue>) -> Option<bool> {
    match raw? {
        DocValue::Bool(value) => Some(*value),
        DocValue::Number(value) => Some(*value != 0.0),
        DocValue::String(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => {
                log::warn!("'{}' is not a boolean", value);
                None
            },
        },
        other => {
            log::warn!("Expected a boolean, found {}", other.type_name());
            None
        },
    }
}

/// Decode a navigation bar appearance map.
pub fn decode_navigation_bar_appearance(
    raw: Option<&DocValue>,
    ctx: &DecodeContext<'_>,
) -> NavigationBarAppearance {
    let Some(map) = raw.and_then(DocValue::as_map) else {
        if let Some(raw) = raw {
            log::warn!("Expected a navigation bar appearance map, found {}", raw.type_name());
        }
        return NavigationBarAppearance::default();
    };

    let color = |key: &str| map.get(key).and_then(|raw| color::decode_color(raw, ctx));
    let attributes = |key: &str| map.get(key).and_then(DocValue::as_map).cloned();

    NavigationBarAppearance {
        background_color: color("backgroundColor"),
        shadow_color: color("shadowColor"),
        title_text_attributes: attributes("titleTextAttributes"),
        large_title_text_attributes: attributes("largeTitleTextAttributes"),
    }
}

fn decode_map(raw: &DocValue, kind: SelectorKind) -> Option<ThemeDocument> {
    match raw.as_map() {
        Some(map) => Some(map.clone()),
        None => {
            log::warn!("Expected a mapping for {}, found {}", kind, raw.type_name());
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_with(kind: SelectorKind, raw: Option<&DocValue>) -> Option<ThemeValue> {
        let environment = ThemeEnvironment::default();
        decode(kind, raw, &DecodeContext::new(None, &environment))
    }

    #[test]
    fn test_float_defaults_to_zero() {
        assert_eq!(decode_float(None), 0.0);
        assert_eq!(decode_float(Some(&DocValue::from(2.5))), 2.5);
        assert_eq!(decode_float(Some(&DocValue::from(" 12 "))), 12.0);
        assert_eq!(decode_float(Some(&DocValue::from("wide"))), 0.0);
        assert_eq!(
            decode_with(SelectorKind::Float, None).and_then(|v| v.as_float()),
            Some(0.0)
        );
    }

    #[test]
    fn test_bool() {
        assert_eq!(decode_bool(Some(&DocValue::from(true))), Some(true));
        assert_eq!(decode_bool(Some(&DocValue::from("No"))), Some(false));
        assert_eq!(decode_bool(Some(&DocValue::from(1))), Some(true));
        assert_eq!(decode_bool(Some(&DocValue::from("maybe"))), None);
        assert_eq!(decode_bool(None), None);
    }

    #[test]
    fn test_styles_are_never_absent() {
        assert!(matches!(
            decode_with(SelectorKind::BarStyle, None),
            Some(ThemeValue::BarStyle(BarStyle::Default))
        ));
        assert!(matches!(
            decode_with(SelectorKind::BlurEffect, Some(&DocValue::from("light"))),
            Some(ThemeValue::BlurEffect(BlurEffectStyle::Light))
        ));
    }

    #[test]
    fn test_absent_leaves() {
        assert!(decode_with(SelectorKind::Color, None).is_none());
        assert!(decode_with(SelectorKind::Font, None).is_none());
        assert!(decode_with(SelectorKind::Dictionary, Some(&DocValue::from("flat"))).is_none());
    }

    #[test]
    fn test_navigation_bar_appearance() {
        let raw = DocValue::from(
            ThemeDocument::new()
                .with("backgroundColor", "#ffffff")
                .with("shadowColor", "#00000000")
                .with("titleTextAttributes", ThemeDocument::new().with("font", "Roboto-Bold,17")),
        );
        let Some(ThemeValue::NavigationBarAppearance(appearance)) =
            decode_with(SelectorKind::NavigationBarAppearance, Some(&raw))
        else {
            panic!("expected a navigation bar appearance");
        };

        assert_eq!(appearance.background_color.map(|c| c.components), Some([1.0; 4]));
        assert_eq!(appearance.shadow_color.map(|c| c.components[3]), Some(0.0));
        assert_eq!(
            appearance
                .title_text_attributes
                .as_ref()
                .and_then(|map| map.get("font"))
                .and_then(DocValue::as_str),
            Some("Roboto-Bold,17")
        );
        assert!(appearance.large_title_text_attributes.is_none());
    }
}
