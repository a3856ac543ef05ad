//! Locating `<img>` tags inside a rich-text blob.
//!
//! The grammar is deliberately narrow: a tag starts at the literal `<img` and
//! ends at the first `>` after it, on the same line. An attribute value that
//! itself contains `>` cuts the match short; existing content relies on exactly
//! these match boundaries.
//!
//! `<img>` tags that already live inside a `<picture>` element are skipped,
//! which keeps a second pass over rewritten output from touching it again.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img.*?>").unwrap());

static PICTURE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<picture[\s>]").unwrap());

static PICTURE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</picture>").unwrap());

/// One `<img ...>` tag found in a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImgTag<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> ImgTag<'t> {
    /// The full tag text, `<img` through the closing `>`.
    pub fn as_str(&self) -> &'t str {
        self.text
    }

    /// Byte range of the tag in the searched blob.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// Lazy iterator over the `<img>` tags of one blob.
///
/// Created by [`find_img_tags`]. Matches never overlap and come out in
/// document order.
pub struct ImgTags<'t> {
    haystack: &'t str,
    matches: regex::Matches<'static, 't>,
    /// Bytes before this offset have already been checked for `<picture>`.
    scanned: usize,
    /// Byte offset where the currently open `<picture>` ends, if inside one.
    picture_end: usize,
}

impl<'t> Iterator for ImgTags<'t> {
    type Item = ImgTag<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        for m in self.matches.by_ref() {
            if m.start() < self.picture_end {
                continue;
            }
            let from = self.scanned.max(self.picture_end);
            self.scanned = m.start();
            if let Some(end) = enclosing_picture_end(self.haystack, from, m.start()) {
                self.picture_end = end;
                continue;
            }
            return Some(ImgTag {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
            });
        }
        None
    }
}

/// Scan `text` for `<img ...>` tags.
///
/// ```
/// # use rich_picture::locate::find_img_tags;
/// let html = r#"<p>a</p><img src="/a.jpg"><p>b</p>"#;
/// let tags: Vec<_> = find_img_tags(html).map(|t| t.as_str()).collect();
/// assert_eq!(tags, vec![r#"<img src="/a.jpg">"#]);
/// ```
pub fn find_img_tags(text: &str) -> ImgTags<'_> {
    ImgTags {
        haystack: text,
        matches: IMG_TAG.find_iter(text),
        scanned: 0,
        picture_end: 0,
    }
}

/// If the tag at `pos` sits inside a `<picture>` element opened somewhere in
/// `haystack[from..pos]`, return the byte offset just past that element's
/// `</picture>`.
///
/// Only the nearest `<picture` opening in the window counts, and only when it
/// has not been closed again before `pos`. The caller guarantees nothing
/// before `from` is still open, so each byte is scanned once per blob.
fn enclosing_picture_end(haystack: &str, from: usize, pos: usize) -> Option<usize> {
    let window = &haystack[from..pos];
    let open = PICTURE_OPEN.find_iter(window).last()?;
    let closed_before = PICTURE_CLOSE.is_match(&window[open.end()..]);
    if closed_before {
        return None;
    }
    match PICTURE_CLOSE.find(&haystack[pos..]) {
        Some(close) => Some(pos + close.end()),
        // Unterminated <picture>: treat the rest of the blob as enclosed.
        None => Some(haystack.len()),
    }
}
