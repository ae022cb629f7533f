//! # Document Loader
//!
//! Loads [ThemeDocument]s from a local file, a bundle resource or a remote
//! `.json` URL. Loading never touches the [registry](crate::registry); the
//! caller decides what to do with the document.
//!
//! ```rust,no_run
//! use tapkit_theme::loader::{DocumentLoader, DocumentSource};
//!
//! let loader = DocumentLoader::new();
//! let doc = loader.load(&DocumentSource::file("themes/light.json"))?;
//! # Ok::<(), tapkit_theme::error::LoadError>(())
//! ```

pub mod remote;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::document::{DocValue, ThemeDocument};
use crate::error::LoadError;

pub use remote::RemoteOptions;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// JSON object.
    Json,
    /// XML or binary property list.
    PropertyList,
    /// TOML table.
    Toml,
}

impl DocumentFormat {
    /// Guess the format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "plist" => Some(Self::PropertyList),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }
}

/// A directory of named resources, addressed by name and extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bundle {
    root: PathBuf,
}

impl Bundle {
    /// Create a bundle rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundle's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the resource `name.extension` inside the bundle.
    pub fn path_for(&self, name: &str, extension: &str) -> PathBuf {
        if extension.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{name}.{extension}"))
        }
    }

    /// Whether the resource exists.
    pub fn contains(&self, name: &str, extension: &str) -> bool {
        self.path_for(name, extension).is_file()
    }
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentSource {
    /// A file on the local filesystem.
    File(PathBuf),
    /// A resource inside a [Bundle].
    Bundle {
        /// The bundle to look in.
        bundle: Bundle,
        /// Resource name without extension.
        name: String,
        /// Resource extension, e.g. `json`.
        extension: String,
    },
    /// An absolute http(s) URL whose path ends in `.json`.
    Remote(String),
}

impl DocumentSource {
    /// A local file source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// A bundle resource source.
    pub fn bundle(bundle: Bundle, name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::Bundle {
            bundle,
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// A remote URL source.
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(url.into())
    }

    /// Parse a source string: `http(s)://` prefixes are remote, anything else a file path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::remote(trimmed)
        } else {
            Self::file(trimmed)
        }
    }

    /// The local path this source reads from, if any.
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            Self::File(path) => Some(path.clone()),
            Self::Bundle {
                bundle,
                name,
                extension,
            } => Some(bundle.path_for(name, extension)),
            Self::Remote(_) => None,
        }
    }

    /// Human readable description used in errors and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            _ => self
                .local_path()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Loads [ThemeDocument]s from [DocumentSource]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    remote: RemoteOptions,
}

impl DocumentLoader {
    /// Create a loader with default remote options (no timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given options for remote loads.
    pub fn with_remote_options(mut self, remote: RemoteOptions) -> Self {
        self.remote = remote;
        self
    }

    /// Load a document from any source.
    ///
    /// Remote sources block the calling thread until the fetch completes.
    pub fn load(&self, source: &DocumentSource) -> Result<ThemeDocument, LoadError> {
        match source {
            DocumentSource::File(path) => self.load_file(path),
            DocumentSource::Bundle {
                bundle,
                name,
                extension,
            } => self.load_file(bundle.path_for(name, extension)),
            DocumentSource::Remote(url) => self.load_remote(url),
        }
    }

    /// Load a document from a local file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<ThemeDocument, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::not_found(path),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        log::debug!("Loaded {} bytes of theme document from {:?}", bytes.len(), path);
        parse_document(&bytes, DocumentFormat::from_path(path), &path.display().to_string())
    }

    /// Load a document from a remote `.json` URL.
    ///
    /// The URL is validated before any network access.
    pub fn load_remote(&self, url: &str) -> Result<ThemeDocument, LoadError> {
        let parsed = remote::validate_url(url)?;
        let bytes = remote::fetch_blocking(&parsed, &self.remote)?;
        parse_document(&bytes, Some(DocumentFormat::Json), url)
    }

    /// Parse an in-memory document.
    pub fn load_str(&self, content: &str, format: DocumentFormat) -> Result<ThemeDocument, LoadError> {
        parse_document(content.as_bytes(), Some(format), "<memory>")
    }
}

/// Parse bytes into a document. With no format, JSON is tried before property lists.
pub fn parse_document(
    bytes: &[u8],
    format: Option<DocumentFormat>,
    origin: &str,
) -> Result<ThemeDocument, LoadError> {
    let value = match format {
        Some(DocumentFormat::Json) => parse_json(bytes, origin)?,
        Some(DocumentFormat::PropertyList) => parse_plist(bytes, origin)?,
        Some(DocumentFormat::Toml) => parse_toml(bytes, origin)?,
        None => match parse_json(bytes, origin) {
            Ok(value) => value,
            Err(json_error) => parse_plist(bytes, origin).map_err(|_| json_error)?,
        },
    };

    match value {
        Some(DocValue::Map(document)) => Ok(document),
        Some(other) => Err(LoadError::parse(
            origin,
            format!("document root must be a mapping, found {}", other.type_name()),
        )),
        None => Err(LoadError::parse(origin, "document is empty")),
    }
}

fn parse_json(bytes: &[u8], origin: &str) -> Result<Option<DocValue>, LoadError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| LoadError::parse(origin, e))?;
    Ok(DocValue::from_json(value))
}

fn parse_plist(bytes: &[u8], origin: &str) -> Result<Option<DocValue>, LoadError> {
    let value = plist::Value::from_reader(Cursor::new(bytes)).map_err(|e| LoadError::parse(origin, e))?;
    Ok(DocValue::from_plist(value))
}

fn parse_toml(bytes: &[u8], origin: &str) -> Result<Option<DocValue>, LoadError> {
    let content = std::str::from_utf8(bytes).map_err(|e| LoadError::parse(origin, e))?;
    let value: toml::Value = toml::from_str(content).map_err(|e| LoadError::parse(origin, e))?;
    Ok(Some(DocValue::from_toml(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>card</key>
    <dict>
        <key>textColor</key>
        <string>#336699</string>
        <key>cornerRadius</key>
        <real>8</real>
        <key>enabled</key>
        <true/>
    </dict>
</dict>
</plist>"#;

    #[test]
    fn test_parse_json_document() {
        let doc = DocumentLoader::new()
            .load_str(r##"{"card":{"textColor":"#000"}}"##, DocumentFormat::Json)
            .unwrap();
        assert_eq!(doc.resolve("card.textColor").and_then(DocValue::as_str), Some("#000"));
    }

    #[test]
    fn test_parse_plist_document() {
        let doc = DocumentLoader::new()
            .load_str(PLIST, DocumentFormat::PropertyList)
            .unwrap();
        assert_eq!(doc.resolve("card.textColor").and_then(DocValue::as_str), Some("#336699"));
        assert_eq!(doc.resolve("card.cornerRadius").and_then(DocValue::as_f64), Some(8.0));
        assert_eq!(doc.resolve("card.enabled").and_then(DocValue::as_bool), Some(true));
    }

    #[test]
    fn test_unknown_format_falls_back_to_plist() {
        let doc = parse_document(PLIST.as_bytes(), None, "memory").unwrap();
        assert!(doc.get("card").is_some());
    }

    #[test]
    fn test_non_mapping_root_is_parse_error() {
        let err = DocumentLoader::new()
            .load_str("[1, 2, 3]", DocumentFormat::Json)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = parse_document(b"{ not json", Some(DocumentFormat::Json), "memory").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            DocumentSource::parse("https://example.com/t.json"),
            DocumentSource::Remote("https://example.com/t.json".to_string())
        );
        assert_eq!(
            DocumentSource::parse("themes/light.json"),
            DocumentSource::File(PathBuf::from("themes/light.json"))
        );
    }

    #[test]
    fn test_bundle_paths() {
        let bundle = Bundle::new("/opt/app/Resources");
        assert_eq!(
            bundle.path_for("LightTheme", "json"),
            PathBuf::from("/opt/app/Resources/LightTheme.json")
        );
    }
}
