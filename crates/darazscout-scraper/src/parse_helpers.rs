//! Small text helpers shared by the target generator, the input parser, and
//! the lenient numeric decoding of extracted records.

use std::sync::LazyLock;

use regex::Regex;

/// Title-cases `text` word by word.
///
/// A letter is upper-cased when the character before it is not a letter and
/// lower-cased otherwise, so `"mens-watches"` → `"Mens-Watches"` and
/// `"4k tv"` → `"4K Tv"`.
#[must_use]
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(-?\d[\d,]*(?:\.\d+)?|-?\.\d+)(?:\s*([km])\b)?").expect("valid number regex")
});

/// Parses the first number in a loosely formatted string.
///
/// Thousands separators are ignored and a trailing `k`/`m` multiplies by a
/// thousand/million: `"1.2k sold"` → `1200.0`, `"Rs. 12,500"` → `12500.0`.
/// Returns `None` when the string holds no digits.
#[must_use]
pub(crate) fn parse_loose_number(raw: &str) -> Option<f64> {
    let caps = NUMBER_RE.captures(raw)?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(ref s) if s == "k" => 1_000.0,
        Some(ref s) if s == "m" => 1_000_000.0,
        _ => 1.0,
    };
    let scaled = value * multiplier;
    scaled.is_finite().then_some(scaled)
}
