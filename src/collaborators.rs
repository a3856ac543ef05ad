//! Collaborators the transformer depends on but does not implement.
//!
//! | Trait | Question it answers |
//! |---|---|
//! | [`EditModeResolver`] | Is the caller editing content right now? |
//! | [`UrlResolver`] | What public URL serves this stored image reference? |
//! | [`PictureRenderer`] | What `<picture>` markup renders this image? |
//!
//! They are passed to [`RichTextTransformer`](crate::transform::RichTextTransformer)
//! explicitly; nothing is looked up from a process-wide registry. All three are
//! `Sync` so one transformer can serve many threads at once.
//!
//! [`FixedMode`] and [`BaseUrlResolver`] are the small concrete
//! implementations used by the CLI. The bundled renderer lives in
//! [`render`](crate::render).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Request context as seen by the edit-mode resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Content is being authored; markup must reach the editor untouched.
    Edit,
    Other,
}

/// How the rendered image should be lazy-loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LazyLoading {
    #[default]
    None,
    /// Native `loading="lazy"`.
    Browser,
}

/// Value for the `<img decoding>` hint. `Default` omits the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDecoding {
    #[default]
    Default,
    Async,
    Sync,
    Auto,
}

impl ImageDecoding {
    /// Attribute value, or `None` when no attribute should be written.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            ImageDecoding::Default => None,
            ImageDecoding::Async => Some("async"),
            ImageDecoding::Sync => Some("sync"),
            ImageDecoding::Auto => Some("auto"),
        }
    }
}

/// Original image formats that may also be offered as WebP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Guess the format from a URL's file extension, ignoring any query string.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

/// Width, size and encoding settings handed to a [`PictureRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingConfig {
    /// Widths to list in the `srcset`.
    pub src_set_widths: Vec<u32>,
    /// Entries for the `sizes` attribute, e.g. `"500px"`.
    pub sizes: Vec<String>,
    /// `0.0` when the ratio is not constrained.
    pub aspect_ratio: f64,
    pub create_webp_for_format: Vec<ImageFormat>,
    pub quality: u32,
}

pub trait EditModeResolver: Sync {
    fn current_mode(&self) -> ContextMode;
}

pub trait UrlResolver: Sync {
    /// Map a stored image reference to a publicly servable URL.
    ///
    /// An empty reference is passed through; implementations decide what it
    /// resolves to.
    fn resolve(&self, source: &str) -> Result<String, CollaboratorError>;
}

/// Produces the final `<picture>` markup for one image.
pub trait PictureRenderer: Sync {
    #[allow(clippy::too_many_arguments)]
    fn render(
        &self,
        url: &str,
        config: &SizingConfig,
        alt_text: &str,
        lazy_loading: LazyLoading,
        decoding: ImageDecoding,
        css_class: &str,
        percentage_width: &str,
    ) -> Result<String, CollaboratorError>;
}

/// Edit-mode resolver that always reports the same mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedMode(pub ContextMode);

impl EditModeResolver for FixedMode {
    fn current_mode(&self) -> ContextMode {
        self.0
    }
}

/// Resolves relative references against a base URL.
///
/// Absolute URLs (`scheme://`), protocol-relative URLs (`//host`), `data:`
/// URIs and empty references are returned unchanged. An empty base leaves
/// every reference as written.
#[derive(Debug, Clone, Default)]
pub struct BaseUrlResolver {
    base: String,
}

impl BaseUrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl UrlResolver for BaseUrlResolver {
    fn resolve(&self, source: &str) -> Result<String, CollaboratorError> {
        if self.base.is_empty() || source.is_empty() || is_absolute(source) {
            return Ok(source.to_string());
        }
        let base = self.base.trim_end_matches('/');
        let path = source.trim_start_matches('/');
        Ok(format!("{base}/{path}"))
    }
}

fn is_absolute(source: &str) -> bool {
    source.starts_with("//") || source.starts_with("data:") || source.contains("://")
}
