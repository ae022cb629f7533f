//! Dotted key-path resolution against a [ThemeDocument].

use crate::document::{DocValue, ThemeDocument};

/// Resolve `"a.b.c"` against `document`.
///
/// Every component but the last must name a nested map. A missing key, an
/// empty component, or a non-map intermediate yields `None`. Lists are
/// returned as they are; picking an element is up to the caller.
pub fn resolve<'a>(document: &'a ThemeDocument, key_path: &str) -> Option<&'a DocValue> {
    let mut components = key_path.split('.');
    let first = components.next().filter(|component| !component.is_empty())?;
    let mut current = document.get(first)?;

    for component in components {
        if component.is_empty() {
            return None;
        }
        current = current.as_map()?.get(component)?;
    }

    Some(current)
}

/// Join key-path components with `.`, skipping empty ones.
pub fn join(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}.{key}"),
    }
}
