//! Hex color decoding with palette-name fallback.
//!
//! Grammar: `#` followed by 3, 4, 6 or 8 hex digits (`RGB`, `RGBA`,
//! `RRGGBB`, `RRGGBBAA`). Short forms divide each nibble by 15, long forms
//! divide each byte by 255. Omitted alpha is opaque.

use vello::peniko::Color;

use super::DecodeContext;
use crate::document::DocValue;
use crate::error::DecodeError;
use crate::key_path;

/// Parse a hex color string.
pub fn parse_hex_color(input: &str) -> Result<Color, DecodeError> {
    let digits = input
        .strip_prefix('#')
        .ok_or_else(|| DecodeError::NoHashPrefix(input.to_string()))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHexDigits(input.to_string()));
    }

    let (width, divisor) = match digits.len() {
        3 | 4 => (1, 15.0),
        6 | 8 => (2, 255.0),
        len => {
            return Err(DecodeError::UnsupportedLength {
                value: input.to_string(),
                len,
            })
        },
    };

    let mut channels = [1.0_f32; 4];
    for (slot, start) in (0..digits.len()).step_by(width).enumerate() {
        let value = u8::from_str_radix(&digits[start..start + width], 16)
            .map_err(|_| DecodeError::InvalidHexDigits(input.to_string()))?;
        channels[slot] = f32::from(value) / divisor;
    }

    Ok(Color::new(channels))
}

/// Encode a color as `#rrggbb`, or `#rrggbbaa` when it is not opaque.
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.components.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Decode a raw value into a color.
///
/// A string that is not a hex color is treated as a palette name and looked
/// up under each of the context's palette prefixes, e.g.
/// `GlobalValues.Colors.<name>`. Palette entries must themselves be hex
/// colors. Returns `None` (and logs) when nothing matches.
pub fn decode_color(raw: &DocValue, ctx: &DecodeContext<'_>) -> Option<Color> {
    let Some(value) = raw.as_str() else {
        log::warn!("Expected a color string, found {}", raw.type_name());
        return None;
    };

    match parse_hex_color(value) {
        Ok(color) => Some(color),
        Err(hex_error) => {
            let found = ctx.document.and_then(|document| {
                ctx.environment.palette_prefixes.iter().find_map(|prefix| {
                    let path = key_path::join(prefix, value);
                    let entry = document.resolve(&path)?.as_str()?;
                    match parse_hex_color(entry) {
                        Ok(color) => Some(color),
                        Err(e) => {
                            log::warn!("Palette entry '{}' is not a hex color: {}", path, e);
                            None
                        },
                    }
                })
            });

            if found.is_none() {
                log::warn!("Could not resolve color '{}' ({}) in the palette", value, hex_error);
            }
            found
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ThemeEnvironment;
    use crate::document::ThemeDocument;

    fn assert_components(color: Color, expected: [f32; 4]) {
        for (actual, expected) in color.components.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-6, "{:?} != {:?}", color.components, expected);
        }
    }

    #[test]
    fn test_short_forms_divide_by_15() {
        assert_components(parse_hex_color("#f80").unwrap(), [1.0, 8.0 / 15.0, 0.0, 1.0]);
        assert_components(parse_hex_color("#f808").unwrap(), [1.0, 8.0 / 15.0, 0.0, 8.0 / 15.0]);
    }

    #[test]
    fn test_long_forms_divide_by_255() {
        assert_components(
            parse_hex_color("#336699").unwrap(),
            [51.0 / 255.0, 102.0 / 255.0, 153.0 / 255.0, 1.0],
        );
        assert_components(
            parse_hex_color("#33669980").unwrap(),
            [51.0 / 255.0, 102.0 / 255.0, 153.0 / 255.0, 128.0 / 255.0],
        );
    }

    #[test]
    fn test_digits_survive_reencoding() {
        for input in ["#0af", "#0Af7", "#1a2b3c", "#1a2b3c4d", "#ffffff", "#00000000"] {
            let color = parse_hex_color(input).unwrap();
            let digits = &input[1..];
            let (width, scale) = if digits.len() <= 4 { (1, 15.0) } else { (2, 255.0) };
            let reencoded: String = color.components[..digits.len() / width]
                .iter()
                .map(|c| {
                    let value = (c * scale).round() as u8;
                    if width == 1 {
                        format!("{:x}", value)
                    } else {
                        format!("{:02x}", value)
                    }
                })
                .collect();
            assert_eq!(reencoded, digits.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            parse_hex_color("336699"),
            Err(DecodeError::NoHashPrefix("336699".to_string()))
        );
        assert_eq!(
            parse_hex_color("#33g"),
            Err(DecodeError::InvalidHexDigits("#33g".to_string()))
        );
        assert_eq!(
            parse_hex_color("#12345"),
            Err(DecodeError::UnsupportedLength {
                value: "#12345".to_string(),
                len: 5
            })
        );
        assert!(matches!(
            parse_hex_color("#"),
            Err(DecodeError::UnsupportedLength { len: 0, .. })
        ));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(parse_hex_color("#336699").unwrap()), "#336699");
        assert_eq!(to_hex(parse_hex_color("#33669980").unwrap()), "#33669980");
    }

    #[test]
    fn test_palette_name_fallback() {
        let document = ThemeDocument::new().with(
            "Global",
            ThemeDocument::new().with("Colors", ThemeDocument::new().with("brand", "#336699")),
        );
        let environment = ThemeEnvironment::default();
        let ctx = DecodeContext::new(Some(&document), &environment);

        let color = decode_color(&DocValue::from("brand"), &ctx).unwrap();
        assert_eq!(to_hex(color), "#336699");
        assert!(decode_color(&DocValue::from("unknown"), &ctx).is_none());
        assert!(decode_color(&DocValue::from(3), &ctx).is_none());
    }
}
