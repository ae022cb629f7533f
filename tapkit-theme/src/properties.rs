//! Typed theme values and the attribute kinds that produce them.

use std::fmt;

use vello::peniko::Color;

use crate::decode::font::FontDescriptor;
use crate::decode::image::ImageRef;
use crate::decode::styles::{
    ActivityIndicatorStyle, BarStyle, BlurEffectStyle, KeyboardAppearance, ScrollIndicatorStyle,
    StatusBarStyle,
};
use crate::document::ThemeDocument;

/// The kind of attribute a selector drives. Decides how raw document values
/// are decoded into a [ThemeValue].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// A color, see [crate::decode::color].
    Color,
    /// A color destined for a layer-level (core graphics) attribute.
    CgColor,
    /// A font, see [crate::decode::font].
    Font,
    /// A floating point number.
    Float,
    /// An image resource, see [crate::decode::image].
    Image,
    /// A text attribute mapping.
    StringAttributes,
    /// Navigation/tool bar style.
    BarStyle,
    /// Status bar style.
    StatusBarStyle,
    /// Keyboard appearance.
    KeyboardAppearance,
    /// Scroll indicator style.
    ScrollIndicatorStyle,
    /// Activity indicator style.
    ActivityIndicatorStyle,
    /// Blur effect level.
    BlurEffect,
    /// Navigation bar appearance bundle.
    NavigationBarAppearance,
    /// An arbitrary mapping.
    Dictionary,
}

impl SelectorKind {
    /// Stable lowercase name, used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::Color => "color",
            SelectorKind::CgColor => "cg_color",
            SelectorKind::Font => "font",
            SelectorKind::Float => "float",
            SelectorKind::Image => "image",
            SelectorKind::StringAttributes => "string_attributes",
            SelectorKind::BarStyle => "bar_style",
            SelectorKind::StatusBarStyle => "status_bar_style",
            SelectorKind::KeyboardAppearance => "keyboard_appearance",
            SelectorKind::ScrollIndicatorStyle => "scroll_indicator_style",
            SelectorKind::ActivityIndicatorStyle => "activity_indicator_style",
            SelectorKind::BlurEffect => "blur_effect",
            SelectorKind::NavigationBarAppearance => "navigation_bar_appearance",
            SelectorKind::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction state of a control, used by state selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlState {
    /// Idle state.
    #[default]
    Normal,
    /// Pressed / highlighted.
    Highlighted,
    /// Disabled.
    Disabled,
    /// Selected.
    Selected,
    /// Focused.
    Focused,
}

/// A grouped navigation bar appearance.
#[derive(Debug, Clone, Default)]
pub struct NavigationBarAppearance {
    /// Bar background color.
    pub background_color: Option<Color>,
    /// Hairline shadow color.
    pub shadow_color: Option<Color>,
    /// Attributes for the inline title.
    pub title_text_attributes: Option<ThemeDocument>,
    /// Attributes for the large title.
    pub large_title_text_attributes: Option<ThemeDocument>,
}

/// A decoded, typed value ready to be applied to a target attribute.
#[derive(Debug, Clone)]
pub enum ThemeValue {
    /// A color value.
    Color(Color),
    /// A color for layer-level attributes.
    CgColor(Color),
    /// A font.
    Font(FontDescriptor),
    /// A float value.
    Float(f64),
    /// An image reference.
    Image(ImageRef),
    /// Text attributes.
    StringAttributes(ThemeDocument),
    /// Bar style.
    BarStyle(BarStyle),
    /// Status bar style.
    StatusBarStyle(StatusBarStyle),
    /// Keyboard appearance.
    KeyboardAppearance(KeyboardAppearance),
    /// Scroll indicator style.
    ScrollIndicatorStyle(ScrollIndicatorStyle),
    /// Activity indicator style.
    ActivityIndicatorStyle(ActivityIndicatorStyle),
    /// Blur effect level.
    BlurEffect(BlurEffectStyle),
    /// Navigation bar appearance.
    NavigationBarAppearance(NavigationBarAppearance),
    /// An arbitrary mapping.
    Dictionary(ThemeDocument),
}

impl ThemeValue {
    /// The kind of attribute this value belongs to.
    pub fn kind(&self) -> SelectorKind {
        match self {
            ThemeValue::Color(_) => SelectorKind::Color,
            ThemeValue::CgColor(_) => SelectorKind::CgColor,
            ThemeValue::Font(_) => SelectorKind::Font,
            ThemeValue::Float(_) => SelectorKind::Float,
            ThemeValue::Image(_) => SelectorKind::Image,
            ThemeValue::StringAttributes(_) => SelectorKind::StringAttributes,
            ThemeValue::BarStyle(_) => SelectorKind::BarStyle,
            ThemeValue::StatusBarStyle(_) => SelectorKind::StatusBarStyle,
            ThemeValue::KeyboardAppearance(_) => SelectorKind::KeyboardAppearance,
            ThemeValue::ScrollIndicatorStyle(_) => SelectorKind::ScrollIndicatorStyle,
            ThemeValue::ActivityIndicatorStyle(_) => SelectorKind::ActivityIndicatorStyle,
            ThemeValue::BlurEffect(_) => SelectorKind::BlurEffect,
            ThemeValue::NavigationBarAppearance(_) => SelectorKind::NavigationBarAppearance,
            ThemeValue::Dictionary(_) => SelectorKind::Dictionary,
        }
    }

    /// Get the color value, if this is a color of either flavour.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            ThemeValue::Color(color) | ThemeValue::CgColor(color) => Some(*color),
            _ => None,
        }
    }

    /// Get the font, if this is a font.
    pub fn as_font(&self) -> Option<&FontDescriptor> {
        match self {
            ThemeValue::Font(font) => Some(font),
            _ => None,
        }
    }

    /// Get the float value, if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ThemeValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the image reference, if this is an image.
    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            ThemeValue::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Get the mapping, if this is a dictionary or text attributes.
    pub fn as_dictionary(&self) -> Option<&ThemeDocument> {
        match self {
            ThemeValue::Dictionary(map) | ThemeValue::StringAttributes(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Color> for ThemeValue {
    fn from(color: Color) -> Self {
        ThemeValue::Color(color)
    }
}

impl From<FontDescriptor> for ThemeValue {
    fn from(font: FontDescriptor) -> Self {
        ThemeValue::Font(font)
    }
}

impl From<f64> for ThemeValue {
    fn from(value: f64) -> Self {
        ThemeValue::Float(value)
    }
}
