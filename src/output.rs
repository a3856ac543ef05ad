//! CLI output formatting.
//!
//! Output is image-centric: each rewritten image leads with its positional
//! index and source reference, followed by the chosen width. Details (resolved
//! URL, aspect ratio, original dimensions) go on indented context lines.
//!
//! ## Render / Build
//!
//! ```text
//! articles/intro.html
//!     001 /media/lake.jpg → 500px (50%)
//!         URL: https://cdn.example.com/media/lake.jpg
//!     002 /media/dune.jpg → 300px
//!         URL: https://cdn.example.com/media/dune.jpg
//!         Aspect ratio: 1.5
//!
//! Rewrote 2 images in 1 file
//! ```
//!
//! ## Inspect
//!
//! ```text
//! 001 /media/lake.jpg
//!     Attributes: width=50% height=-
//!     Alt: "Lake at dawn"
//!     Render: 500px, ratio -, sizes 500px
//! ```
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout.

use crate::picture::{PicturePlan, RewriteRecord};
use crate::transform::Transformed;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Source reference for display; empty sources are shown as `(no src)`.
fn source_label(source: &str) -> &str {
    if source.is_empty() { "(no src)" } else { source }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `"-"` for zero values, which mean "unknown" throughout.
fn or_dash<T: PartialEq + Default + std::fmt::Display>(value: T) -> String {
    if value == T::default() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn rewrite_lines(index: usize, record: &RewriteRecord, depth: usize) -> Vec<String> {
    let base = indent(depth);
    let mut header = format!(
        "{}{} {} → {}px",
        base,
        format_index(index),
        source_label(&record.source),
        record.target_width
    );
    if !record.percentage_width.is_empty() {
        header.push_str(&format!(" ({})", record.percentage_width));
    }

    let mut lines = vec![header];
    if record.url != record.source {
        lines.push(format!("{}    URL: {}", base, record.url));
    }
    if record.aspect_ratio > 0.0 {
        lines.push(format!("{}    Aspect ratio: {}", base, record.aspect_ratio));
    }
    lines
}

// ============================================================================
// Render / build output
// ============================================================================

/// Format the rewrites of one file (or stdin when `path` is `None`).
pub fn format_transform_output(path: Option<&Path>, transformed: &Transformed) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(match path {
        Some(p) => p.display().to_string(),
        None => "<stdin>".to_string(),
    });

    if transformed.skipped_edit_mode {
        lines.push(format!("{}edit mode: left unchanged", indent(1)));
        return lines;
    }
    if transformed.rewrites.is_empty() {
        lines.push(format!("{}no images", indent(1)));
        return lines;
    }
    for (i, record) in transformed.rewrites.iter().enumerate() {
        lines.extend(rewrite_lines(i + 1, record, 1));
    }
    lines
}

/// Final summary line for a multi-file build.
pub fn format_build_summary(files: usize, images: usize) -> String {
    format!(
        "Rewrote {} in {}",
        plural(images, "image", "images"),
        plural(files, "file", "files")
    )
}

pub fn print_transform_output(path: Option<&Path>, transformed: &Transformed) {
    for line in format_transform_output(path, transformed) {
        println!("{}", line);
    }
}

// ============================================================================
// Inspect output
// ============================================================================

/// Format the sizing decisions for each `<img>` without rendering anything.
pub fn format_inspect_output(plans: &[PicturePlan]) -> Vec<String> {
    if plans.is_empty() {
        return vec!["No <img> tags found".to_string()];
    }

    let mut lines = Vec::new();
    for (i, plan) in plans.iter().enumerate() {
        let attrs = &plan.attributes;
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            source_label(&attrs.source)
        ));

        let width = if plan.percentage_width.is_empty() {
            or_dash(attrs.width)
        } else {
            plan.percentage_width.clone()
        };
        lines.push(format!(
            "{}Attributes: width={} height={}",
            indent(1),
            width,
            or_dash(attrs.height)
        ));
        if !attrs.alt_text.is_empty() {
            lines.push(format!("{}Alt: {:?}", indent(1), attrs.alt_text));
        }
        if !attrs.css_class.is_empty() {
            lines.push(format!("{}Class: {}", indent(1), attrs.css_class));
        }
        lines.push(format!(
            "{}Render: {}px, ratio {}, sizes {}",
            indent(1),
            plan.sizing.target_width,
            or_dash(plan.sizing.aspect_ratio),
            plan.config.sizes.join(", ")
        ));
    }
    lines
}

pub fn print_inspect_output(plans: &[PicturePlan]) {
    for line in format_inspect_output(plans) {
        println!("{}", line);
    }
}
