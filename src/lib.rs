//! # rich-picture
//!
//! Rewrites the `<img>` elements of rich-text HTML into responsive `<picture>`
//! markup. Authors write plain images in a WYSIWYG editor; this crate picks the
//! render width, aspect ratio and source set for them.
//!
//! # Pipeline
//!
//! ```text
//! blob ──locate──▶ <img …> ──extract──▶ ImageAttributes ──size──▶ SizingProfile
//!                                                                     │
//!        rewritten blob ◀──splice── <picture> ◀──render── SizingConfig ┘
//! ```
//!
//! Everything up to the [`SizingConfig`](collaborators::SizingConfig) is pure
//! and decided from the tag alone. URL resolution and markup rendering are
//! collaborators passed in by the caller.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locate`] | Finds `<img>` tags in a blob, skipping ones already inside `<picture>` |
//! | [`attributes`] | Pulls `src`, `alt`, `class`, `width`, `height` out of one tag |
//! | [`sizing`] | Width precedence and aspect-ratio rounding |
//! | [`picture`] | Builds the renderer configuration and calls the collaborators for one tag |
//! | [`transform`] | Entry point: edit-mode check and whole-blob splice |
//! | [`collaborators`] | Edit-mode, URL and renderer traits plus simple implementations |
//! | [`render`] | Bundled maud-based `<picture>` renderer |
//! | [`config`] | Picture profile and layered `config.toml` loading |
//! | [`output`] | CLI output formatting |
//!
//! # Example
//!
//! ```
//! use rich_picture::collaborators::{BaseUrlResolver, ContextMode, FixedMode};
//! use rich_picture::config::RichTextPictureProfile;
//! use rich_picture::render::HtmlPictureRenderer;
//! use rich_picture::transform::RichTextTransformer;
//!
//! let mode = FixedMode(ContextMode::Other);
//! let urls = BaseUrlResolver::new("https://cdn.example.com");
//! let renderer = HtmlPictureRenderer::new();
//! let transformer = RichTextTransformer::new(&mode, &urls, &renderer);
//!
//! let profile = RichTextPictureProfile { max_image_width: 1000, ..Default::default() };
//! let html = transformer
//!     .transform(r#"<p>A</p><img src="/a.jpg" width="50%" alt="x">"#, Some(&profile))
//!     .unwrap();
//! assert!(html.starts_with("<p>A</p><picture>"));
//! assert!(html.contains("width=500"));
//! ```
//!
//! # Design Decisions
//!
//! ## Tolerant Attribute Parsing
//!
//! Hand-authored content omits and mistypes dimensions. Missing or unparseable
//! values degrade to empty strings and zeros, and zero means "use the maximum".
//! A typo in one image never fails the page.
//!
//! ## Edit Mode Is a Hard Stop
//!
//! When the caller is authoring, the blob is returned byte-for-byte. The
//! editor must round-trip the markup the author wrote.
//!
//! ## All or Nothing
//!
//! If resolving or rendering any image fails, the whole transform fails and no
//! partially rewritten text is returned.

pub mod attributes;
pub mod collaborators;
pub mod config;
pub mod locate;
pub mod output;
pub mod picture;
pub mod render;
pub mod sizing;
pub mod transform;
