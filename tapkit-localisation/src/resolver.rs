//! Key-path localisation with a locale fallback chain.

use std::env;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use tapkit_theme::document::{DocValue, ThemeDocument};
use tapkit_theme::error::LoadError;
use tapkit_theme::key_path;
use tapkit_theme::loader::{DocumentLoader, DocumentSource};

use crate::locale::{self, DEFAULT_LOCALE};

struct LocaliserState {
    locale: String,
    device: String,
    primary: Option<Arc<ThemeDocument>>,
}

/// Resolves localised strings from locale documents.
///
/// A locale document is keyed first by locale tag:
///
/// ```json
/// { "en": { "card": { "number": "Card number" } },
///   "ar": { "card": { "number": "رقم البطاقة" } } }
/// ```
///
/// [Localiser::localize] tries, in order:
///
/// 1. the primary document at the configured locale
/// 2. the fallback document (if given) at the configured locale, then the
///    device locale, then `en`
/// 3. the key path itself
///
/// Inside a document the exact tag is tried before its language (`ar-SA`, then `ar`).
pub struct Localiser {
    state: RwLock<LocaliserState>,
    cache: Mutex<IndexMap<DocumentSource, Arc<ThemeDocument>>>,
    loader: DocumentLoader,
}

impl Localiser {
    /// Create a localiser for `locale` without a primary document.
    pub fn new(locale: &str) -> Self {
        Self::with_loader(locale, DocumentLoader::new())
    }

    /// Create a localiser that loads fallback documents through `loader`.
    pub fn with_loader(locale: &str, loader: DocumentLoader) -> Self {
        Self {
            state: RwLock::new(LocaliserState {
                locale: locale::normalize_locale(locale),
                device: locale::device_locale(),
                primary: None,
            }),
            cache: Mutex::new(IndexMap::new()),
            loader,
        }
    }

    /// Build a localiser from `TAPKIT_LOCALE` and `TAPKIT_LOCALISATION_FILE`.
    ///
    /// Without `TAPKIT_LOCALE` the device locale is used. A primary document
    /// that fails to load is logged and skipped.
    pub fn from_env() -> Self {
        let locale = env::var("TAPKIT_LOCALE").unwrap_or_else(|_| locale::device_locale());
        let localiser = Self::new(&locale);

        if let Ok(source) = env::var("TAPKIT_LOCALISATION_FILE") {
            if let Err(e) = localiser.set_primary_from(&DocumentSource::parse(&source)) {
                log::warn!("Failed to load localisation document {}: {}", source, e);
            }
        }

        localiser
    }

    /// Use `device` as the device locale instead of the one read from the environment.
    pub fn with_device_locale(self, device: &str) -> Self {
        self.set_device_locale(device);
        self
    }

    /// The device locale, the second fallback tier.
    pub fn device_locale(&self) -> String {
        self.state.read().device.clone()
    }

    /// Replace the device locale.
    pub fn set_device_locale(&self, device: &str) {
        self.state.write().device = locale::normalize_locale(device);
    }

    /// The configured locale.
    pub fn locale(&self) -> String {
        self.state.read().locale.clone()
    }

    /// Change the configured locale.
    pub fn set_locale(&self, locale: &str) {
        self.state.write().locale = locale::normalize_locale(locale);
    }

    /// Replace the primary document. `None` removes it.
    pub fn set_primary(&self, document: Option<ThemeDocument>) {
        self.state.write().primary = document.map(Arc::new);
    }

    /// Load and install the primary document.
    pub fn set_primary_from(&self, source: &DocumentSource) -> Result<(), LoadError> {
        let document = self.loader.load(source)?;
        log::info!("Loaded localisation document from {}", source.describe());
        self.set_primary(Some(document));
        Ok(())
    }

    /// The primary document.
    pub fn primary(&self) -> Option<Arc<ThemeDocument>> {
        self.state.read().primary.clone()
    }

    /// Resolve `key_path`, falling back through `fallback` and finally to the key path itself.
    pub fn localize(&self, key_path: &str, fallback: Option<&DocumentSource>) -> String {
        let (locale, device, primary) = {
            let state = self.state.read();
            (state.locale.clone(), state.device.clone(), state.primary.clone())
        };

        if let Some(text) = primary.and_then(|document| lookup(&document, &locale, key_path)) {
            return text;
        }

        if let Some(document) = fallback.and_then(|source| self.fallback_document(source)) {
            for candidate in [locale.as_str(), device.as_str(), DEFAULT_LOCALE] {
                if let Some(text) = lookup(&document, candidate, key_path) {
                    return text;
                }
            }
        }

        log::debug!("No localisation for '{}' in '{}'", key_path, locale);
        key_path.to_string()
    }

    /// [Self::localize] followed by `{name}` interpolation.
    ///
    /// Placeholders without a matching argument are left as they are.
    pub fn localize_with(
        &self,
        key_path: &str,
        fallback: Option<&DocumentSource>,
        args: &[(&str, &str)],
    ) -> String {
        interpolate(&self.localize(key_path, fallback), args)
    }

    /// Forget every cached fallback document.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Number of cached fallback documents.
    pub fn cached_documents(&self) -> usize {
        self.cache.lock().len()
    }

    fn fallback_document(&self, source: &DocumentSource) -> Option<Arc<ThemeDocument>> {
        if let Some(document) = self.cache.lock().get(source) {
            return Some(Arc::clone(document));
        }

        // Loaded without holding the cache lock; remote sources block.
        match self.loader.load(source) {
            Ok(document) => {
                let document = Arc::new(document);
                self.cache
                    .lock()
                    .insert(source.clone(), Arc::clone(&document));
                Some(document)
            },
            Err(e) => {
                log::warn!("Failed to load fallback localisation {}: {}", source.describe(), e);
                None
            },
        }
    }
}

impl Default for Localiser {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

/// Look `key_path` up under `locale` in `document`, trying the exact tag then the language.
pub fn lookup(document: &ThemeDocument, locale: &str, key_path: &str) -> Option<String> {
    locale::lookup_tags(locale).iter().find_map(|tag| {
        match document.resolve(&key_path::join(tag, key_path))? {
            DocValue::String(text) => Some(text.clone()),
            DocValue::Number(number) => Some(number.to_string()),
            other => {
                log::warn!("Localisation '{}' in '{}' is a {}, not a string", key_path, tag, other.type_name());
                None
            },
        }
    })
}

fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match args.iter().find(|(name, _)| *name == token) {
                    Some((_, value)) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(token);
                        result.push('}');
                    },
                }
                rest = &after[close + 1..];
            },
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            },
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ThemeDocument {
        ThemeDocument::new()
            .with("en", ThemeDocument::new().with("card", ThemeDocument::new().with("number", "Card number")))
            .with("ar", ThemeDocument::new().with("card", ThemeDocument::new().with("number", "رقم البطاقة")))
    }

    #[test]
    fn test_lookup_tries_language_subtag() {
        let document = document();
        assert_eq!(lookup(&document, "ar-SA", "card.number").as_deref(), Some("رقم البطاقة"));
        assert_eq!(lookup(&document, "en_GB", "card.number").as_deref(), Some("Card number"));
        assert_eq!(lookup(&document, "fr", "card.number"), None);
    }

    #[test]
    fn test_primary_then_key_path() {
        let localiser = Localiser::new("ar");
        assert_eq!(localiser.localize("card.number", None), "card.number");

        localiser.set_primary(Some(document()));
        assert_eq!(localiser.localize("card.number", None), "رقم البطاقة");
        assert_eq!(localiser.localize("card.expiry", None), "card.expiry");
    }

    #[test]
    fn test_set_locale_normalises() {
        let localiser = Localiser::default();
        assert_eq!(localiser.locale(), "en");
        localiser.set_locale("pt_BR");
        assert_eq!(localiser.locale(), "pt-BR");
    }

    #[test]
    fn test_device_locale_is_injectable() {
        let localiser = Localiser::new("fr").with_device_locale("ar_SA.UTF-8");
        assert_eq!(localiser.device_locale(), "ar-SA");
        localiser.set_device_locale("de");
        assert_eq!(localiser.device_locale(), "de");
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(interpolate("Hi {name}!", &[("name", "Sam")]), "Hi Sam!");
        assert_eq!(interpolate("{a}{b}", &[("b", "2")]), "{a}2");
        assert_eq!(interpolate("open {brace", &[]), "open {brace");
    }
}
