//! Normalization from decoded model replies to scored [`darazscout_core::Product`]s.
//!
//! Field-level leniency lives in [`crate::types::RawExtractedProduct`]; this
//! module owns the batch shape check, numeric coercion, the demand score, and
//! price formatting.

use chrono::{DateTime, Utc};
use darazscout_core::{FunnelStage, Product};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::RawExtractedProduct;

const SOLD_WEIGHT: f64 = 0.4;
const REVIEWS_WEIGHT: f64 = 0.3;
const RATING_WEIGHT: f64 = 0.3;
/// Lifts a 0–5 star rating onto a 0–100 range before weighting.
const RATING_SCALE: f64 = 20.0;

/// Products normalized from one extraction reply.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub products: Vec<Product>,
    /// Array elements that were not product objects and were dropped.
    pub skipped: usize,
}

/// Normalizes a decoded extraction reply, stamping every product with the
/// current time.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedExtraction`] if `raw` is not a JSON array.
pub fn normalize_products(
    raw: &Value,
    category: &str,
    source_url: &str,
    batch_index_start: usize,
) -> Result<NormalizedBatch, ScraperError> {
    normalize_products_at(raw, category, source_url, batch_index_start, Utc::now())
}

/// Normalizes a decoded extraction reply against a fixed `scraped_at` time.
///
/// Element `i` of the array becomes a product with id
/// `"<category>_<batch_index_start + i>_<epoch seconds of scraped_at>"`.
/// Elements that are not JSON objects are skipped and counted; they never
/// abort the rest of the batch.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedExtraction`] if `raw` is not a JSON array.
pub fn normalize_products_at(
    raw: &Value,
    category: &str,
    source_url: &str,
    batch_index_start: usize,
    scraped_at: DateTime<Utc>,
) -> Result<NormalizedBatch, ScraperError> {
    let Value::Array(records) = raw else {
        return Err(ScraperError::MalformedExtraction {
            reason: format!("expected a JSON array of products, got {}", kind_of(raw)),
        });
    };

    let epoch = scraped_at.timestamp();
    let mut batch = NormalizedBatch {
        products: Vec::with_capacity(records.len()),
        skipped: 0,
    };

    for (idx, record) in records.iter().enumerate() {
        let decoded = if record.is_object() {
            RawExtractedProduct::deserialize(record).map_err(|e| e.to_string())
        } else {
            Err(format!("expected an object, got {}", kind_of(record)))
        };

        match decoded {
            Ok(product) => {
                let id = format!("{category}_{}_{epoch}", batch_index_start + idx);
                batch
                    .products
                    .push(normalize_record(product, id, category, source_url, scraped_at));
            }
            Err(reason) => {
                tracing::warn!(category, index = idx, %reason, "skipping malformed product record");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

fn normalize_record(
    raw: RawExtractedProduct,
    id: String,
    category: &str,
    source_url: &str,
    scraped_at: DateTime<Utc>,
) -> Product {
    let sold = coerce_count(raw.sold);
    let reviews = coerce_count(raw.reviews);
    let price_value = if raw.price.is_finite() && raw.price > 0.0 {
        raw.price
    } else {
        0.0
    };

    Product {
        id,
        category: category.to_owned(),
        name: raw.name,
        sold,
        reviews,
        rating: raw.rating,
        seller: raw.seller,
        price: format_price(price_value),
        price_value,
        product_url: raw.product_url,
        source_url: source_url.to_owned(),
        score: demand_score(sold, reviews, raw.rating),
        funnel_stage: FunnelStage::Scraped,
        scraped_at,
    }
}

/// Weighted demand signal, rounded to two decimals:
/// `sold * 0.4 + reviews * 0.3 + rating * 20 * 0.3`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn demand_score(sold: u64, reviews: u64, rating: f64) -> f64 {
    let score = sold as f64 * SOLD_WEIGHT
        + reviews as f64 * REVIEWS_WEIGHT
        + rating * RATING_SCALE * RATING_WEIGHT;
    (score * 100.0).round() / 100.0
}

/// Formats a rupee amount for display: `12500.0` → `"Rs. 12,500"`.
///
/// The value is rounded to a whole number; negative or non-finite input
/// renders as `"Rs. 0"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_price(value: f64) -> String {
    let whole = if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    };
    format!("Rs. {}", group_thousands(whole))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rounds a decoded count to a non-negative integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
