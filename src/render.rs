//! Bundled `<picture>` renderer.
//!
//! Targets image services that resize on the fly from query parameters
//! (`?width=500&height=250&quality=80`, plus `&format=webp` for the WebP
//! variant). Markup is generated with maud, so alt text, classes and URLs are
//! escaped.
//!
//! ```text
//! <picture>
//!   <source type="image/webp" srcset="a.jpg?width=500&format=webp&quality=80 500w" sizes="500px">
//!   <img srcset="a.jpg?width=500&quality=80 500w" sizes="500px" src="a.jpg?width=500&quality=80"
//!        alt="…" loading="lazy" class="…" style="width:50%">
//! </picture>
//! ```
//!
//! The real output has no whitespace between elements and fits on one line.

use crate::collaborators::{
    CollaboratorError, ImageDecoding, ImageFormat, LazyLoading, PictureRenderer, SizingConfig,
};
use maud::html;

/// Renders `<picture>` elements with query-string resize URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPictureRenderer;

impl HtmlPictureRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PictureRenderer for HtmlPictureRenderer {
    fn render(
        &self,
        url: &str,
        config: &SizingConfig,
        alt_text: &str,
        lazy_loading: LazyLoading,
        decoding: ImageDecoding,
        css_class: &str,
        percentage_width: &str,
    ) -> Result<String, CollaboratorError> {
        let first_width = config
            .src_set_widths
            .first()
            .copied()
            .ok_or_else(|| CollaboratorError::Failed("no srcset widths configured".into()))?;

        let sizes = config.sizes.join(", ");
        let srcset = build_srcset(url, config, None);
        let webp_srcset = wants_webp(url, &config.create_webp_for_format)
            .then(|| build_srcset(url, config, Some("webp")));

        let fallback_src = resize_url(url, first_width, config, None);
        let (width_attr, height_attr) = match height_for(first_width, config.aspect_ratio) {
            Some(h) => (Some(first_width), Some(h)),
            None => (None, None),
        };
        let loading = (lazy_loading == LazyLoading::Browser).then_some("lazy");
        let class = (!css_class.is_empty()).then_some(css_class);
        let style = (!percentage_width.is_empty()).then(|| format!("width:{percentage_width}"));

        let markup = html! {
            picture {
                @if let Some(webp) = &webp_srcset {
                    source type="image/webp" srcset=(webp) sizes=(sizes);
                }
                img srcset=(srcset)
                    sizes=(sizes)
                    src=(fallback_src)
                    alt=(alt_text)
                    width=[width_attr]
                    height=[height_attr]
                    loading=[loading]
                    decoding=[decoding.as_attr()]
                    class=[class]
                    style=[style];
            }
        };
        Ok(markup.into_string())
    }
}

/// Height matching `width` at `aspect_ratio`, or `None` when unconstrained.
fn height_for(width: u32, aspect_ratio: f64) -> Option<u32> {
    (aspect_ratio > 0.0).then(|| (width as f64 / aspect_ratio).round() as u32)
}

fn wants_webp(url: &str, formats: &[ImageFormat]) -> bool {
    ImageFormat::from_url(url).is_some_and(|f| formats.contains(&f))
}

/// `url?width=W[&height=H][&format=F]&quality=Q`. Empty URLs stay empty.
fn resize_url(url: &str, width: u32, config: &SizingConfig, format: Option<&str>) -> String {
    if url.is_empty() {
        return String::new();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    let mut out = format!("{url}{sep}width={width}");
    if let Some(h) = height_for(width, config.aspect_ratio) {
        out.push_str(&format!("&height={h}"));
    }
    if let Some(f) = format {
        out.push_str(&format!("&format={f}"));
    }
    out.push_str(&format!("&quality={}", config.quality));
    out
}

fn build_srcset(url: &str, config: &SizingConfig, format: Option<&str>) -> String {
    config
        .src_set_widths
        .iter()
        .map(|&w| format!("{} {}w", resize_url(url, w, config, format), w))
        .collect::<Vec<_>>()
        .join(", ")
}
