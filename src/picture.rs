//! Turning one `<img>` tag into `<picture>` markup.
//!
//! [`plan`] makes every sizing decision from the tag alone; [`PictureTagBuilder`]
//! then resolves the source URL and hands the plan to the renderer. Keeping the
//! two apart lets `inspect` show what would happen without touching any
//! collaborator.

use crate::attributes::{self, ImageAttributes};
use crate::collaborators::{ImageDecoding, LazyLoading, PictureRenderer, SizingConfig, UrlResolver};
use crate::config::RichTextPictureProfile;
use crate::sizing::SizingProfile;
use crate::transform::TransformError;
use serde::Serialize;

/// Everything decided about one image before any collaborator is called.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicturePlan {
    pub attributes: ImageAttributes,
    pub sizing: SizingProfile,
    pub config: SizingConfig,
    /// `"50%"` for percentage widths, otherwise empty.
    pub percentage_width: String,
}

/// Extract, size and configure one `<img>` tag.
///
/// A single width is generated: the srcset lists `target_width` and `sizes` is
/// `"{target_width}px"`. Rich-text images are laid out at a known size, so
/// more candidates would only add bytes.
pub fn plan(img_tag: &str, profile: &RichTextPictureProfile) -> PicturePlan {
    let attributes = attributes::extract(img_tag);
    let sizing = SizingProfile::compute(&attributes, profile.max_image_width);

    let config = SizingConfig {
        src_set_widths: vec![sizing.target_width],
        sizes: vec![format!("{}px", sizing.target_width)],
        aspect_ratio: sizing.aspect_ratio,
        create_webp_for_format: profile.create_webp_for_format.clone(),
        quality: profile.quality,
    };

    let percentage_width = if attributes.percentage_width > 0.0 {
        format!("{}%", attributes.percentage_width)
    } else {
        String::new()
    };

    PicturePlan {
        attributes,
        sizing,
        config,
        percentage_width,
    }
}

/// What a rewrite produced, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriteRecord {
    pub source: String,
    pub url: String,
    pub target_width: u32,
    pub aspect_ratio: f64,
    pub percentage_width: String,
}

/// Builds `<picture>` markup for single `<img>` tags.
pub struct PictureTagBuilder<'a> {
    urls: &'a dyn UrlResolver,
    renderer: &'a dyn PictureRenderer,
}

impl<'a> PictureTagBuilder<'a> {
    pub fn new(urls: &'a dyn UrlResolver, renderer: &'a dyn PictureRenderer) -> Self {
        Self { urls, renderer }
    }

    /// Render the replacement markup for `img_tag`.
    ///
    /// The renderer's output is returned verbatim. An empty `src` is not an
    /// error; resolver and renderer decide what it becomes.
    pub fn build(
        &self,
        img_tag: &str,
        profile: &RichTextPictureProfile,
    ) -> Result<String, TransformError> {
        self.build_with_record(img_tag, profile).map(|(html, _)| html)
    }

    pub(crate) fn build_with_record(
        &self,
        img_tag: &str,
        profile: &RichTextPictureProfile,
    ) -> Result<(String, RewriteRecord), TransformError> {
        let plan = plan(img_tag, profile);
        let source = &plan.attributes.source;
        if source.is_empty() {
            tracing::warn!(tag = img_tag, "img tag has no src");
        }

        let url = self
            .urls
            .resolve(source)
            .map_err(|error| TransformError::UrlResolution {
                source_ref: source.clone(),
                error,
            })?;

        let html = self
            .renderer
            .render(
                &url,
                &plan.config,
                &plan.attributes.alt_text,
                LazyLoading::Browser,
                ImageDecoding::Default,
                &plan.attributes.css_class,
                &plan.percentage_width,
            )
            .map_err(|error| TransformError::Render {
                url: url.clone(),
                error,
            })?;

        tracing::debug!(
            source = %source,
            url = %url,
            width = plan.sizing.target_width,
            aspect_ratio = plan.sizing.aspect_ratio,
            "rewrote img as picture"
        );

        let record = RewriteRecord {
            source: plan.attributes.source,
            url,
            target_width: plan.sizing.target_width,
            aspect_ratio: plan.sizing.aspect_ratio,
            percentage_width: plan.percentage_width,
        };
        Ok((html, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::ImageFormat;
    use crate::collaborators::tests::{MockRenderer, MockUrls};

    fn profile(max: u32) -> RichTextPictureProfile {
        RichTextPictureProfile {
            max_image_width: max,
            ..Default::default()
        }
    }

    // =========================================================================
    // plan tests
    // =========================================================================

    #[test]
    fn plan_single_width_srcset() {
        let p = plan(r#"<img src="/a.jpg" width="300">"#, &profile(800));
        assert_eq!(p.config.src_set_widths, vec![300]);
        assert_eq!(p.config.sizes, vec!["300px".to_string()]);
    }

    #[test]
    fn plan_percentage_hint() {
        let p = plan(r#"<img src="/a.jpg" width="50%">"#, &profile(1000));
        assert_eq!(p.sizing.target_width, 500);
        assert_eq!(p.percentage_width, "50%");
    }

    #[test]
    fn plan_fractional_percentage_hint() {
        let p = plan(r#"<img width="12.5%">"#, &profile(1000));
        assert_eq!(p.percentage_width, "12.5%");
        // 125.0 exactly
        assert_eq!(p.sizing.target_width, 125);
    }

    #[test]
    fn plan_no_hint_for_pixel_width() {
        let p = plan(r#"<img width="300">"#, &profile(1000));
        assert_eq!(p.percentage_width, "");
    }

    #[test]
    fn plan_carries_profile_settings() {
        let profile = RichTextPictureProfile {
            max_image_width: 640,
            create_webp_for_format: vec![ImageFormat::Jpeg],
            quality: 70,
        };
        let p = plan(r#"<img src="/a.jpg" width="300" height="150">"#, &profile);
        assert_eq!(p.config.aspect_ratio, 2.0);
        assert_eq!(p.config.quality, 70);
        assert_eq!(p.config.create_webp_for_format, vec![ImageFormat::Jpeg]);
    }

    // =========================================================================
    // build tests
    // =========================================================================

    #[test]
    fn build_calls_renderer_with_plan() {
        let urls = MockUrls::default();
        let renderer = MockRenderer::default();
        let builder = PictureTagBuilder::new(&urls, &renderer);

        let html = builder
            .build(
                r#"<img src="/a.jpg" alt="Lake" class="float-left" width="50%">"#,
                &profile(1000),
            )
            .unwrap();

        assert!(html.contains(r#"data-width="500""#));
        let calls = renderer.get_calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.url, "https://cdn.test/a.jpg");
        assert_eq!(call.alt_text, "Lake");
        assert_eq!(call.css_class, "float-left");
        assert_eq!(call.percentage_width, "50%");
        assert_eq!(call.lazy_loading, LazyLoading::Browser);
        assert_eq!(call.decoding, ImageDecoding::Default);
        assert_eq!(call.config.sizes, vec!["500px".to_string()]);
    }

    #[test]
    fn build_returns_renderer_output_verbatim() {
        let urls = MockUrls::default();
        let renderer = MockRenderer::default();
        let builder = PictureTagBuilder::new(&urls, &renderer);

        let html = builder.build(r#"<img src="/a.jpg">"#, &profile(800)).unwrap();
        assert_eq!(
            html,
            r#"<picture data-src="https://cdn.test/a.jpg" data-width="800" data-pct=""></picture>"#
        );
    }

    #[test]
    fn build_with_empty_src_still_renders() {
        let urls = MockUrls::default();
        let renderer = MockRenderer::default();
        let builder = PictureTagBuilder::new(&urls, &renderer);

        assert!(builder.build("<img>", &profile(800)).is_ok());
        assert_eq!(renderer.get_calls()[0].url, "https://cdn.test");
    }

    #[test]
    fn build_propagates_resolver_failure() {
        let urls = MockUrls {
            fail_on: Some("/missing.jpg".to_string()),
        };
        let renderer = MockRenderer::default();
        let builder = PictureTagBuilder::new(&urls, &renderer);

        let result = builder.build(r#"<img src="/missing.jpg">"#, &profile(800));
        assert!(matches!(
            result,
            Err(TransformError::UrlResolution { ref source_ref, .. }) if source_ref == "/missing.jpg"
        ));
        assert!(renderer.get_calls().is_empty());
    }

    #[test]
    fn build_record_matches_plan() {
        let urls = MockUrls::default();
        let renderer = MockRenderer::default();
        let builder = PictureTagBuilder::new(&urls, &renderer);

        let (_, record) = builder
            .build_with_record(r#"<img src="/a.jpg" width="400" height="200">"#, &profile(800))
            .unwrap();
        assert_eq!(record.source, "/a.jpg");
        assert_eq!(record.url, "https://cdn.test/a.jpg");
        assert_eq!(record.target_width, 400);
        assert_eq!(record.aspect_ratio, 2.0);
    }
}
