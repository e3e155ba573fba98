//! Parsing of free-form target lists pasted by the user.
//!
//! Each non-blank line is one of:
//!
//! ```text
//! Category Name, https://www.daraz.lk/mens-watches/
//! Category Name<TAB>https://www.daraz.lk/smartphones/
//! https://www.daraz.lk/laptops/
//! ```
//!
//! The comma form wins over the tab form when a line has both, and both
//! split on the first delimiter only. Lines in no recognised shape are
//! dropped rather than reported as errors.

use crate::parse_helpers::title_case;
use crate::types::ScrapeTarget;

/// Category used for a bare URL that has no path segment to name it after.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Result of [`parse_input_detailed`]: the targets found, plus how many
/// non-blank lines were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInput {
    pub targets: Vec<ScrapeTarget>,
    pub skipped: usize,
}

/// Parses `text` into targets, silently dropping malformed lines.
#[must_use]
pub fn parse_input(text: &str) -> Vec<ScrapeTarget> {
    parse_input_detailed(text).targets
}

/// Parses `text` into targets and counts the non-blank lines that were
/// dropped. Never fails.
#[must_use]
pub fn parse_input_detailed(text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(target) => parsed.targets.push(target),
            None => {
                tracing::debug!(line, "dropping unrecognised input line");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Parses one trimmed, non-blank line.
fn parse_line(line: &str) -> Option<ScrapeTarget> {
    let (category, url) = if let Some((cat, url)) = line.split_once(',') {
        (cat.trim().to_owned(), url.trim())
    } else if let Some((cat, url)) = line.split_once('\t') {
        (cat.trim().to_owned(), url.trim())
    } else if line.starts_with("http") {
        (category_from_url(line), line)
    } else {
        return None;
    };

    if url.is_empty() {
        return None;
    }

    Some(ScrapeTarget {
        category,
        url: url.to_owned(),
    })
}

/// Derives a category label from the last path segment of `url`:
/// `"https://www.daraz.lk/mens-watches/"` → `"Mens Watches"`.
///
/// Falls back to [`FALLBACK_CATEGORY`] when there is nothing after the host.
fn category_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let after_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);

    // The first segment is the host; a bare domain has no segment to use.
    let Some((_, path)) = after_scheme.split_once('/') else {
        return FALLBACK_CATEGORY.to_owned();
    };

    match path.rsplit('/').next().filter(|s| !s.trim().is_empty()) {
        Some(segment) => title_case(&segment.replace('-', " ")),
        None => FALLBACK_CATEGORY.to_owned(),
    }
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
