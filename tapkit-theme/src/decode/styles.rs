//! Enumerated style values.
//!
//! Style strings are matched loosely: a dotted prefix such as
//! `UIBarStyle.black` is dropped, separators are ignored and case does not
//! matter, so `black`, `Black`, `.black` and `UIBarStyle.black` all decode to
//! [BarStyle::Black]. Unknown names decode to the style's default.

use crate::document::DocValue;

/// A style enumeration decoded from a document string.
pub trait StyleValue: Sized + Copy + Default {
    /// Match an already normalized name.
    fn from_normalized(name: &str) -> Option<Self>;

    /// Decode a raw name, falling back to the default for unknown names.
    fn from_name(name: &str) -> Self {
        let normalized = normalize(name);
        Self::from_normalized(&normalized).unwrap_or_else(|| {
            log::warn!(
                "Unknown style '{}' for {}, using the default",
                name,
                std::any::type_name::<Self>().rsplit("::").next().unwrap_or_default()
            );
            Self::default()
        })
    }

    /// Decode a raw document value. Absent or non-string values give the default.
    fn decode(raw: Option<&DocValue>) -> Self {
        match raw.and_then(DocValue::as_str) {
            Some(name) => Self::from_name(name),
            None => Self::default(),
        }
    }
}

/// Keep the last dotted segment, lowercase it and drop anything that is not alphanumeric.
pub fn normalize(name: &str) -> String {
    name.trim()
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Navigation/tool bar style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarStyle {
    /// Light bar.
    #[default]
    Default,
    /// Dark bar.
    Black,
}

impl StyleValue for BarStyle {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "black" | "blacktranslucent" | "blackopaque" => Some(Self::Black),
            _ => None,
        }
    }
}

/// Status bar content style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusBarStyle {
    /// Platform default.
    #[default]
    Default,
    /// Light content for dark backgrounds.
    LightContent,
    /// Dark content for light backgrounds.
    DarkContent,
}

impl StyleValue for StatusBarStyle {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "lightcontent" => Some(Self::LightContent),
            "darkcontent" => Some(Self::DarkContent),
            _ => None,
        }
    }
}

/// Keyboard appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardAppearance {
    /// Platform default.
    #[default]
    Default,
    /// Dark keyboard.
    Dark,
    /// Light keyboard.
    Light,
}

impl StyleValue for KeyboardAppearance {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "dark" | "alert" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Scroll indicator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollIndicatorStyle {
    /// Platform default.
    #[default]
    Default,
    /// Dark indicators.
    Black,
    /// Light indicators.
    White,
}

impl StyleValue for ScrollIndicatorStyle {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "black" => Some(Self::Black),
            "white" => Some(Self::White),
            _ => None,
        }
    }
}

/// Activity indicator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityIndicatorStyle {
    /// Medium, tinted.
    #[default]
    Medium,
    /// Large, tinted.
    Large,
    /// Legacy white.
    White,
    /// Legacy large white.
    WhiteLarge,
    /// Legacy gray.
    Gray,
}

impl StyleValue for ActivityIndicatorStyle {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            "white" => Some(Self::White),
            "whitelarge" => Some(Self::WhiteLarge),
            "gray" | "grey" => Some(Self::Gray),
            _ => None,
        }
    }
}

/// Blur effect level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlurEffectStyle {
    /// Extra light blur.
    ExtraLight,
    /// Light blur.
    Light,
    /// Dark blur.
    #[default]
    Dark,
    /// Regular, adapts to appearance.
    Regular,
    /// Prominent, adapts to appearance.
    Prominent,
}

impl StyleValue for BlurEffectStyle {
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "extralight" => Some(Self::ExtraLight),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "regular" => Some(Self::Regular),
            "prominent" => Some(Self::Prominent),
            _ => None,
        }
    }
}
