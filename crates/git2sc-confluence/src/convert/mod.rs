//! Conversion of local documentation files to HTML.
//!
//! Formats are looked up by file extension in a [`ConverterRegistry`]. The
//! default registry knows:
//!
//! | Extension | Converter             |
//! |-----------|-----------------------|
//! | `html`    | [`HtmlConverter`]     |
//! | `adoc`    | [`AsciidocConverter`] |
//! | `md`      | [`MarkdownConverter`] |
//!
//! Additional formats are added with [`ConverterRegistry::register`].

mod asciidoc;
mod html;
mod markdown;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub use asciidoc::AsciidocConverter;
pub use html::HtmlConverter;
pub use markdown::MarkdownConverter;

use crate::error::ConvertError;

/// Converts one file format to an HTML fragment.
pub trait Converter {
    /// Convert the file at `path`.
    fn convert(&self, path: &Path) -> Result<String, ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(&Path) -> Result<String, ConvertError>,
{
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        self(path)
    }
}

/// Converters keyed by lowercase file extension.
pub struct ConverterRegistry {
    converters: HashMap<String, Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Registry without any converter.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Add or replace the converter for `extension` (without leading dot).
    pub fn register(&mut self, extension: &str, converter: impl Converter + 'static) {
        self.converters
            .insert(extension.to_ascii_lowercase(), Box::new(converter));
    }

    /// Builder form of [`ConverterRegistry::register`].
    #[must_use]
    pub fn with(mut self, extension: &str, converter: impl Converter + 'static) -> Self {
        self.register(extension, converter);
        self
    }

    /// Whether a converter exists for the file's extension.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.converters.contains_key(&ext))
    }

    /// Registered extensions in sorted order.
    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<_> = self.converters.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Convert `path` with the converter registered for its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedFormat`] if no converter handles the
    /// extension, otherwise whatever the converter reports.
    pub fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let converter = extension_of(path)
            .and_then(|ext| self.converters.get(&ext))
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                extension: path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default(),
                path: path.to_path_buf(),
            })?;
        converter.convert(path)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::empty()
            .with("html", HtmlConverter)
            .with("adoc", AsciidocConverter::default())
            .with("md", MarkdownConverter::default())
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
