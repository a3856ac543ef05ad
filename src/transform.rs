//! Whole-blob rewriting.
//!
//! [`RichTextTransformer`] is the entry point: it asks the edit-mode resolver
//! once, and outside edit mode replaces every located `<img>` tag with the
//! markup produced by [`PictureTagBuilder`]. Every other byte of the input is
//! copied through unchanged.
//!
//! In edit mode the input comes back untouched. Authoring tools must see the
//! markup they wrote, or round-trip editing breaks.
//!
//! A failure from the URL resolver or renderer aborts the whole blob. Callers
//! get either a fully rewritten text or an error, never a half-rewritten one.

use crate::collaborators::{
    CollaboratorError, ContextMode, EditModeResolver, PictureRenderer, UrlResolver,
};
use crate::config::RichTextPictureProfile;
use crate::locate::find_img_tags;
use crate::picture::{PictureTagBuilder, RewriteRecord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("could not resolve image reference {source_ref:?}: {error}")]
    UrlResolution {
        source_ref: String,
        #[source]
        error: CollaboratorError,
    },
    #[error("could not render picture for {url}: {error}")]
    Render {
        url: String,
        #[source]
        error: CollaboratorError,
    },
}

/// Result of [`RichTextTransformer::transform_with_report`].
#[derive(Debug, Clone, Default)]
pub struct Transformed {
    pub html: String,
    /// One entry per replaced tag, in document order. Empty in edit mode.
    pub rewrites: Vec<RewriteRecord>,
    /// Set when the blob was returned untouched because of edit mode.
    pub skipped_edit_mode: bool,
}

/// Rewrites `<img>` tags in rich text as responsive `<picture>` elements.
pub struct RichTextTransformer<'a> {
    mode: &'a dyn EditModeResolver,
    urls: &'a dyn UrlResolver,
    renderer: &'a dyn PictureRenderer,
}

impl<'a> RichTextTransformer<'a> {
    pub fn new(
        mode: &'a dyn EditModeResolver,
        urls: &'a dyn UrlResolver,
        renderer: &'a dyn PictureRenderer,
    ) -> Self {
        Self {
            mode,
            urls,
            renderer,
        }
    }

    /// Rewrite `blob`. `None` uses [`RichTextPictureProfile::default`].
    pub fn transform(
        &self,
        blob: &str,
        profile: Option<&RichTextPictureProfile>,
    ) -> Result<String, TransformError> {
        self.transform_with_report(blob, profile).map(|t| t.html)
    }

    /// Like [`transform`](Self::transform), also reporting each rewrite.
    pub fn transform_with_report(
        &self,
        blob: &str,
        profile: Option<&RichTextPictureProfile>,
    ) -> Result<Transformed, TransformError> {
        if self.mode.current_mode() == ContextMode::Edit {
            tracing::debug!("edit mode, leaving rich text untouched");
            return Ok(Transformed {
                html: blob.to_string(),
                rewrites: Vec::new(),
                skipped_edit_mode: true,
            });
        }

        let default_profile;
        let profile = match profile {
            Some(p) => p,
            None => {
                default_profile = RichTextPictureProfile::default();
                &default_profile
            }
        };

        let builder = PictureTagBuilder::new(self.urls, self.renderer);
        let mut html = String::with_capacity(blob.len());
        let mut rewrites = Vec::new();
        let mut last = 0;

        for tag in find_img_tags(blob) {
            let (picture, record) = builder.build_with_record(tag.as_str(), profile)?;
            html.push_str(&blob[last..tag.start()]);
            html.push_str(&picture);
            rewrites.push(record);
            last = tag.end();
        }
        html.push_str(&blob[last..]);

        Ok(Transformed {
            html,
            rewrites,
            skipped_edit_mode: false,
        })
    }
}
