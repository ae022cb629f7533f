//! Image name resolution.
//!
//! An image name is looked up, in order, in the caller's catalog, under the
//! asset root directory, in the caller's default catalog and finally among the
//! images bundled with the engine. The first hit wins.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use super::ThemeEnvironment;
use crate::document::DocValue;

/// Images that ship with the engine.
pub const BUNDLED_IMAGES: &[&str] = &[
    "amex",
    "apple_pay",
    "back",
    "card_placeholder",
    "checkmark",
    "close",
    "diners",
    "discover",
    "jcb",
    "mada",
    "maestro",
    "mastercard",
    "meeza",
    "omannet",
    "unionpay",
    "visa",
];

/// File extensions tried when probing the asset root.
const ASSET_EXTENSIONS: &[&str] = &["png", "pdf", "svg"];

/// Where an image was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    /// The caller's primary catalog.
    Catalog,
    /// A file under the asset root.
    AssetRoot(PathBuf),
    /// The caller's default catalog.
    DefaultCatalog,
    /// The engine's bundled images.
    Bundled,
}

/// A resolved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The image name as written in the document.
    pub name: String,
    /// Where it was found.
    pub origin: ImageOrigin,
}

/// A set of image names known to the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    names: BTreeSet<String>,
}

impl ImageCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Whether the catalog holds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ImageCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolve an image name against the environment.
pub fn resolve_image(name: &str, environment: &ThemeEnvironment) -> Option<ImageRef> {
    let found = |origin| {
        Some(ImageRef {
            name: name.to_string(),
            origin,
        })
    };

    if environment.images.contains(name) {
        return found(ImageOrigin::Catalog);
    }
    if let Some(path) = environment
        .asset_root
        .as_deref()
        .and_then(|root| find_asset(root, name))
    {
        return found(ImageOrigin::AssetRoot(path));
    }
    if environment.default_images.contains(name) {
        return found(ImageOrigin::DefaultCatalog);
    }
    if BUNDLED_IMAGES.contains(&name) {
        return found(ImageOrigin::Bundled);
    }

    log::warn!("Image '{}' was not found in any catalog", name);
    None
}

fn find_asset(root: &Path, name: &str) -> Option<PathBuf> {
    if !is_plain_file_name(name) {
        log::warn!("Image name '{}' is not a plain file name, skipping the asset root", name);
        return None;
    }
    let exact = root.join(name);
    if exact.is_file() {
        return Some(exact);
    }
    ASSET_EXTENSIONS
        .iter()
        .map(|extension| root.join(format!("{name}.{extension}")))
        .find(|path| path.is_file())
}

/// A single path component that stays inside the directory it is joined to.
fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        )
}

/// Decode a raw document value into an image.
pub fn decode_image(raw: &DocValue, environment: &ThemeEnvironment) -> Option<ImageRef> {
    match raw.as_str() {
        Some(name) => resolve_image(name, environment),
        None => {
            log::warn!("Expected an image name, found {}", raw.type_name());
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hero.png"), b"png").unwrap();
        std::fs::write(dir.path().join("visa.png"), b"png").unwrap();

        let environment = ThemeEnvironment {
            images: ["logo"].into_iter().collect(),
            default_images: ["fallback", "hero"].into_iter().collect(),
            asset_root: Some(dir.path().to_path_buf()),
            ..ThemeEnvironment::default()
        };

        let origin = |name: &str| resolve_image(name, &environment).map(|image| image.origin);

        assert_eq!(origin("logo"), Some(ImageOrigin::Catalog));
        assert_eq!(origin("hero"), Some(ImageOrigin::AssetRoot(dir.path().join("hero.png"))));
        assert_eq!(origin("fallback"), Some(ImageOrigin::DefaultCatalog));
        assert_eq!(origin("visa"), Some(ImageOrigin::AssetRoot(dir.path().join("visa.png"))));
        assert_eq!(origin("mada"), Some(ImageOrigin::Bundled));
        assert_eq!(origin("nothing"), None);
    }

    #[test]
    fn test_asset_names_cannot_leave_the_asset_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("assets");
        std::fs::create_dir_all(root.join("nested")).unwrap();
        std::fs::write(dir.path().join("secret.png"), b"png").unwrap();
        std::fs::write(root.join("nested").join("card.png"), b"png").unwrap();

        let environment = ThemeEnvironment {
            asset_root: Some(root),
            ..ThemeEnvironment::default()
        };

        assert!(resolve_image("../secret", &environment).is_none());
        assert!(resolve_image("../secret.png", &environment).is_none());
        assert!(resolve_image("nested/card", &environment).is_none());
        assert!(resolve_image("..", &environment).is_none());
        assert!(!is_plain_file_name("/etc/passwd"));
        assert!(!is_plain_file_name("a\\b"));
        assert!(is_plain_file_name("card.png"));
    }

    #[test]
    fn test_non_string_is_absent() {
        let environment = ThemeEnvironment::default();
        assert!(decode_image(&DocValue::from(true), &environment).is_none());
        assert_eq!(
            decode_image(&DocValue::from("visa"), &environment).map(|image| image.name),
            Some("visa".to_string())
        );
    }
}
