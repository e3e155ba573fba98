//! Scrape targets and the raw product records decoded from model replies.
//!
//! ## Observed reply shape
//!
//! The extraction prompt asks for a JSON array of objects with the keys
//! `name`, `sold`, `reviews`, `rating`, `seller`, `price`, `productUrl`.
//! Models mostly comply, but individual records drift:
//! - keys go missing (`rating` is the usual casualty on unrated items),
//! - numbers arrive as strings, sometimes still formatted the way the page
//!   shows them (`"1.2k"`, `"1,250"`, `"Rs. 12,500"`),
//! - `null` shows up where the page had nothing to extract.
//!
//! None of that should sink the record, so every field has a default and
//! the numeric fields decode leniently. Only a record that is not an object
//! at all fails to deserialize.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::parse_helpers::parse_loose_number;

/// One listing page to scrape: the category label it is reported under and
/// the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    pub category: String,
    pub url: String,
}

impl ScrapeTarget {
    #[must_use]
    pub fn new(category: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            url: url.into(),
        }
    }

    /// Renders the target as a tab-delimited input line.
    ///
    /// [`crate::input::parse_input`] reads it back unchanged only when the
    /// category has no comma: a comma anywhere on the line wins over the tab.
    #[must_use]
    pub fn to_input_line(&self) -> String {
        format!("{}\t{}", self.category, self.url)
    }
}

/// A product record as the model returned it, with defaults applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtractedProduct {
    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub sold: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub reviews: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: f64,

    #[serde(default = "not_available", deserialize_with = "lenient_text")]
    pub seller: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,

    #[serde(default, deserialize_with = "lenient_url")]
    pub product_url: String,
}

impl Default for RawExtractedProduct {
    fn default() -> Self {
        Self {
            name: not_available(),
            sold: 0.0,
            reviews: 0.0,
            rating: 0.0,
            seller: not_available(),
            price: 0.0,
            product_url: String::new(),
        }
    }
}

fn not_available() -> String {
    "N/A".to_owned()
}

/// Numbers pass through; strings are parsed loosely; everything else is 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn number_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_loose_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings pass through, numbers and booleans are stringified, and `null`,
/// arrays, or objects fall back to `"N/A"`.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value).unwrap_or_else(not_available))
}

/// Like [`lenient_text`], but the fallback is an empty string.
fn lenient_url<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value).unwrap_or_default())
}
