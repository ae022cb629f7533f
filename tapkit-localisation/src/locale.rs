//! Locale identifiers.

use std::env;

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Normalize a locale identifier for lookup.
///
/// - Trims whitespace.
/// - Drops an encoding or modifier suffix (`en_US.UTF-8`, `de_DE@euro`).
/// - Converts `_` to `-` (`en_US` becomes `en-US`).
pub fn normalize_locale(locale: &str) -> String {
    let trimmed = locale.trim();
    let end = trimmed.find(['.', '@']).unwrap_or(trimmed.len());
    trimmed[..end].replace('_', "-")
}

/// The language subtag of a locale, e.g. `ar` for `ar-SA`.
pub fn language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Tags to try inside a locale document: the exact tag, then its language.
pub fn lookup_tags(locale: &str) -> Vec<String> {
    let normalized = normalize_locale(locale);
    let mut tags = Vec::with_capacity(2);
    if normalized.is_empty() {
        return tags;
    }

    let lang = language(&normalized).to_string();
    tags.push(normalized);
    if !lang.is_empty() && !tags.contains(&lang) {
        tags.push(lang);
    }
    tags
}

/// The device locale from `LC_ALL`, `LC_MESSAGES` or `LANG`, defaulting to `en`.
///
/// The `C` and `POSIX` locales count as unset.
pub fn device_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| normalize_locale(&value))
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}
