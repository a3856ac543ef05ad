//! Responsive sizing policy.
//!
//! Pure functions that turn author-supplied dimensions into the width to render
//! and the aspect ratio to enforce. No I/O, no configuration lookup.
//!
//! ## Width Precedence
//!
//! 1. A percentage width is intent relative to the container. The configured
//!    maximum stands in for the container, so `50%` of `1000` is `500`.
//! 2. A pixel width is honored only if it fits under the maximum.
//! 3. An unknown width (0) renders at the maximum.
//!
//! Both rounding steps use round-half-to-even, so `400.5` becomes `400`.

use crate::attributes::ImageAttributes;
use serde::Serialize;

/// Width to render and ratio to enforce for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingProfile {
    pub target_width: u32,
    /// `width / height` to 3 decimals, or `0.0` when unconstrained.
    pub aspect_ratio: f64,
}

impl SizingProfile {
    pub fn compute(attrs: &ImageAttributes, max_width: u32) -> Self {
        Self {
            target_width: compute_width(attrs, max_width),
            aspect_ratio: compute_aspect_ratio(attrs),
        }
    }
}

/// Target render width for an image, capped by `max_width`.
///
/// A percentage is applied without a floor, so a small enough one (such as
/// `0.01%` of 1000) rounds down to 0.
///
/// ```
/// # use rich_picture::attributes::extract;
/// # use rich_picture::sizing::compute_width;
/// assert_eq!(compute_width(&extract(r#"<img width="50%">"#), 800), 400);
/// assert_eq!(compute_width(&extract(r#"<img width="300">"#), 800), 300);
/// assert_eq!(compute_width(&extract(r#"<img width="3000">"#), 800), 800);
/// assert_eq!(compute_width(&extract("<img>"), 800), 800);
/// ```
pub fn compute_width(attrs: &ImageAttributes, max_width: u32) -> u32 {
    if attrs.percentage_width > 0.0 {
        return (max_width as f64 * attrs.percentage_width / 100.0).round_ties_even() as u32;
    }
    if attrs.width == 0 || attrs.width > max_width {
        max_width
    } else {
        attrs.width
    }
}

/// Aspect ratio (`width / height`) rounded to 3 decimals.
///
/// Returns `0.0` when either dimension is unknown, meaning the renderer should
/// not constrain the ratio.
pub fn compute_aspect_ratio(attrs: &ImageAttributes) -> f64 {
    if attrs.width == 0 || attrs.height == 0 {
        return 0.0;
    }
    round_to(attrs.width as f64 / attrs.height as f64, 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
