//! Attribute extraction from a single `<img>` tag.
//!
//! Rich-text editors emit a very regular subset of HTML: double-quoted
//! attributes on a single element. Each attribute is looked up independently
//! with a `name="..."` pattern; the first occurrence wins. This is not an HTML
//! parser and does not try to be one.
//!
//! ## Tolerant Parsing
//!
//! Authors omit and mistype dimensions. Nothing here fails: a missing string
//! attribute becomes `""`, a number that does not parse becomes `0`. The
//! sizing policy treats `0` as "unknown" and falls back to the configured
//! maximum.
//!
//! ## Width Forms
//!
//! | Markup | `width` | `percentage_width` |
//! |---|---|---|
//! | `width="300"` | 300 | 0.0 |
//! | `width="50%"` | 0 | 50.0 |
//! | `width="12.5%"` | 0 | 12.5 |
//! | `width="abc"` / `width="x%"` / absent | 0 | 0.0 |

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

macro_rules! attr_re {
    ($name:literal) => {
        LazyLock::new(|| Regex::new(concat!($name, r#"="(.*?)""#)).unwrap())
    };
}

static SRC: LazyLock<Regex> = attr_re!("src");
static ALT: LazyLock<Regex> = attr_re!("alt");
static CLASS: LazyLock<Regex> = attr_re!("class");
static WIDTH: LazyLock<Regex> = attr_re!("width");
static HEIGHT: LazyLock<Regex> = attr_re!("height");

/// Values pulled out of one `<img>` tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageAttributes {
    /// Raw `src` value as written in the markup.
    pub source: String,
    pub alt_text: String,
    pub css_class: String,
    /// Pixel width, 0 when absent, unparseable or given as a percentage.
    pub width: u32,
    /// Pixel height, 0 when absent or unparseable.
    pub height: u32,
    /// Width in percent when written as `width="N%"`, else 0.
    pub percentage_width: f64,
}

/// Parse one `<img ...>` tag into its attribute record.
///
/// ```
/// # use rich_picture::attributes::extract;
/// let attrs = extract(r#"<img src="/a.jpg" alt="Dusk" width="50%">"#);
/// assert_eq!(attrs.source, "/a.jpg");
/// assert_eq!(attrs.alt_text, "Dusk");
/// assert_eq!(attrs.width, 0);
/// assert_eq!(attrs.percentage_width, 50.0);
/// ```
pub fn extract(img_tag: &str) -> ImageAttributes {
    let raw_width = capture(&WIDTH, img_tag);
    let (width, percentage_width) = parse_width(raw_width);

    ImageAttributes {
        source: capture(&SRC, img_tag).to_string(),
        alt_text: capture(&ALT, img_tag).to_string(),
        css_class: capture(&CLASS, img_tag).to_string(),
        width,
        height: parse_pixels(capture(&HEIGHT, img_tag)),
        percentage_width,
    }
}

/// First capture group of `re` in `tag`, or `""` when there is no match.
fn capture<'t>(re: &Regex, tag: &'t str) -> &'t str {
    re.captures(tag)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Split a raw width value into `(pixels, percent)`. At most one is non-zero.
fn parse_width(raw: &str) -> (u32, f64) {
    match raw.strip_suffix('%') {
        Some(pct) => {
            let pct = pct
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .unwrap_or_default();
            (0, pct)
        }
        None => (parse_pixels(raw), 0.0),
    }
}

fn parse_pixels(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or_default()
}
