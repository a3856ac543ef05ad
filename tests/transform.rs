//! End-to-end rewriting through the public API with the bundled collaborators.

use rich_picture::attributes::extract;
use rich_picture::collaborators::{
    BaseUrlResolver, CollaboratorError, ContextMode, FixedMode, ImageDecoding, ImageFormat,
    LazyLoading, PictureRenderer, SizingConfig, UrlResolver,
};
use rich_picture::config::RichTextPictureProfile;
use rich_picture::render::HtmlPictureRenderer;
use rich_picture::sizing::{compute_aspect_ratio, compute_width};
use rich_picture::transform::{RichTextTransformer, TransformError};

fn profile(max: u32) -> RichTextPictureProfile {
    RichTextPictureProfile {
        max_image_width: max,
        ..Default::default()
    }
}

fn transform(blob: &str, mode: ContextMode, profile: Option<&RichTextPictureProfile>) -> String {
    let mode = FixedMode(mode);
    let urls = BaseUrlResolver::default();
    let renderer = HtmlPictureRenderer::new();
    RichTextTransformer::new(&mode, &urls, &renderer)
        .transform(blob, profile)
        .unwrap()
}

// ===========================================================================
// Sizing properties
// ===========================================================================

#[test]
fn no_dimensions_renders_at_max_without_ratio() {
    for tag in [r#"<img src="/a.jpg">"#, "<img>", r#"<img alt="x" class="y" />"#] {
        let attrs = extract(tag);
        assert_eq!(compute_width(&attrs, 720), 720, "{tag}");
        assert_eq!(compute_aspect_ratio(&attrs), 0.0, "{tag}");
    }
}

#[test]
fn pixel_widths_up_to_max_are_kept() {
    for n in [1, 50, 719, 720] {
        let attrs = extract(&format!(r#"<img width="{n}">"#));
        assert_eq!(compute_width(&attrs, 720), n);
    }
}

#[test]
fn pixel_widths_above_max_are_capped() {
    for n in [721, 1000, 99999] {
        let attrs = extract(&format!(r#"<img width="{n}">"#));
        assert_eq!(compute_width(&attrs, 720), 720);
    }
}

#[test]
fn percentage_widths_scale_max() {
    assert_eq!(compute_width(&extract(r#"<img width="50%">"#), 800), 400);
    assert_eq!(compute_width(&extract(r#"<img width="25%">"#), 1000), 250);
    assert_eq!(compute_width(&extract(r#"<img width="33%">"#), 1000), 330);
}

#[test]
fn ratio_from_width_and_height() {
    let attrs = extract(r#"<img width="300" height="150">"#);
    assert_eq!(compute_aspect_ratio(&attrs), 2.0);
}

// ===========================================================================
// Transform properties
// ===========================================================================

#[test]
fn edit_mode_leaves_blob_untouched() {
    let blob = r#"<p>Intro</p><img src="/a.jpg" width="300"><p>Outro</p>"#;
    assert_eq!(transform(blob, ContextMode::Edit, Some(&profile(800))), blob);
}

#[test]
fn surrounding_text_is_preserved_exactly() {
    let blob = "<h2>Title</h2>\n\n  <p>One &amp; two</p>\n<img src=\"/1.jpg\">\t<em>mid</em>  \r\n<img src=\"/2.png\" width=\"10%\">\n<p>end</p>\n";
    let out = transform(blob, ContextMode::Other, Some(&profile(800)));

    let first = out.find("<picture>").unwrap();
    assert_eq!(&out[..first], "<h2>Title</h2>\n\n  <p>One &amp; two</p>\n");

    let first_end = out.find("</picture>").unwrap() + "</picture>".len();
    let second = out[first_end..].find("<picture>").unwrap() + first_end;
    assert_eq!(&out[first_end..second], "\t<em>mid</em>  \r\n");

    assert!(out.ends_with("</picture>\n<p>end</p>\n"));
    assert!(!out.contains(r#"<img src="/1.jpg">"#));
}

#[test]
fn second_pass_is_a_no_op() {
    let blob = r#"<p>a</p><img src="/a.jpg" width="300" height="200"><p>b</p><img src="/b.jpg">"#;
    let webp = RichTextPictureProfile {
        create_webp_for_format: vec![ImageFormat::Jpeg],
        ..profile(800)
    };
    let once = transform(blob, ContextMode::Other, Some(&webp));
    let twice = transform(&once, ContextMode::Other, Some(&webp));
    assert_ne!(once, blob);
    assert_eq!(once, twice);
}

#[test]
fn percentage_image_after_prose() {
    let blob = r#"<p>A</p><img src="/a.jpg" width="50%" alt="x">"#;
    let out = transform(blob, ContextMode::Other, Some(&profile(1000)));

    assert!(out.starts_with("<p>A</p><picture>"));
    assert!(out.ends_with("</picture>"));
    assert!(out.contains("/a.jpg?width=500&amp;quality=80 500w"));
    assert!(out.contains(r#"sizes="500px""#));
    assert!(out.contains(r#"style="width:50%""#));
    assert!(out.contains(r#"alt="x""#));
}

#[test]
fn default_profile_when_none_given() {
    let out = transform(r#"<img src="/a.jpg">"#, ContextMode::Other, None);
    let max = RichTextPictureProfile::default().max_image_width;
    assert!(out.contains(&format!(r#"sizes="{max}px""#)));
}

#[test]
fn base_url_is_applied() {
    let mode = FixedMode(ContextMode::Other);
    let urls = BaseUrlResolver::new("https://cdn.example.com");
    let renderer = HtmlPictureRenderer::new();
    let out = RichTextTransformer::new(&mode, &urls, &renderer)
        .transform(r#"<img src="/media/a.jpg">"#, Some(&profile(600)))
        .unwrap();
    assert!(out.contains("https://cdn.example.com/media/a.jpg?width=600"));
}

// ===========================================================================
// Failure propagation
// ===========================================================================

struct BrokenRenderer;

impl PictureRenderer for BrokenRenderer {
    fn render(
        &self,
        _url: &str,
        _config: &SizingConfig,
        _alt_text: &str,
        _lazy_loading: LazyLoading,
        _decoding: ImageDecoding,
        _css_class: &str,
        _percentage_width: &str,
    ) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Failed("renderer offline".to_string()))
    }
}

struct RejectingUrls;

impl UrlResolver for RejectingUrls {
    fn resolve(&self, source: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Failed(format!("unknown asset {source}")))
    }
}

#[test]
fn renderer_failure_is_propagated() {
    let mode = FixedMode(ContextMode::Other);
    let urls = BaseUrlResolver::default();
    let result = RichTextTransformer::new(&mode, &urls, &BrokenRenderer)
        .transform(r#"<p>x</p><img src="/a.jpg">"#, None);

    let err = result.unwrap_err();
    assert!(matches!(err, TransformError::Render { .. }));
    assert!(err.to_string().contains("/a.jpg"));
}

#[test]
fn resolver_failure_is_propagated() {
    let mode = FixedMode(ContextMode::Other);
    let renderer = HtmlPictureRenderer::new();
    let result = RichTextTransformer::new(&mode, &RejectingUrls, &renderer)
        .transform(r#"<img src="/gone.jpg">"#, None);

    assert!(matches!(
        result,
        Err(TransformError::UrlResolution { ref source_ref, .. }) if source_ref == "/gone.jpg"
    ));
}

#[test]
fn edit_mode_skips_failing_collaborators() {
    let mode = FixedMode(ContextMode::Edit);
    let blob = r#"<img src="/a.jpg">"#;
    let out = RichTextTransformer::new(&mode, &RejectingUrls, &BrokenRenderer)
        .transform(blob, None)
        .unwrap();
    assert_eq!(out, blob);
}

#[test]
fn transformer_is_shareable_across_threads() {
    let mode = FixedMode(ContextMode::Other);
    let urls = BaseUrlResolver::default();
    let renderer = HtmlPictureRenderer::new();
    let transformer = RichTextTransformer::new(&mode, &urls, &renderer);
    let p = profile(800);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let transformer = &transformer;
                let p = &p;
                s.spawn(move || {
                    transformer
                        .transform(&format!(r#"<img src="/{i}.jpg" width="100">"#), Some(p))
                        .unwrap()
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            assert!(h.join().unwrap().contains(&format!("/{i}.jpg?width=100")));
        }
    });
}
