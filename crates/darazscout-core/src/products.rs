use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Manual curation stage of a scraped product.
///
/// Every product starts as [`FunnelStage::Scraped`]; the later stages are
/// set by whoever curates the list, never by the scrape pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStage {
    #[default]
    Scraped,
    Selected,
    PettahHub,
    Listed,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::Scraped,
        FunnelStage::Selected,
        FunnelStage::PettahHub,
        FunnelStage::Listed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FunnelStage::Scraped => "SCRAPED",
            FunnelStage::Selected => "SELECTED",
            FunnelStage::PettahHub => "PETTAH_HUB",
            FunnelStage::Listed => "LISTED",
        }
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunnelStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CoreError::InvalidFunnelStage(s.to_owned()))
    }
}

/// A product extracted from one listing page, normalized and scored.
///
/// Field names serialize in camelCase (`priceValue`, `productUrl`, ...) with
/// the exception of `scraped_at`; the order of fields here is the column
/// order of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// `"<category>_<index>_<epochSeconds>"`; unique within one batch only.
    pub id: String,
    /// Label of the target the product was scraped from.
    pub category: String,
    pub name: String,
    pub sold: u64,
    pub reviews: u64,
    /// Star rating as reported, expected in `0..=5` but not clamped.
    pub rating: f64,
    pub seller: String,
    /// Display price, e.g. `"Rs. 12,500"`.
    pub price: String,
    pub price_value: f64,
    pub product_url: String,
    /// Listing page the product was extracted from.
    pub source_url: String,
    /// Demand score, fixed at creation time.
    pub score: f64,
    pub funnel_stage: FunnelStage,
    #[serde(rename = "scraped_at")]
    pub scraped_at: DateTime<Utc>,
}

/// Numeric product attribute used to rank the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Score,
    Sold,
    Reviews,
    Rating,
    PriceValue,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Score,
        SortKey::Sold,
        SortKey::Reviews,
        SortKey::Rating,
        SortKey::PriceValue,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Sold => "sold",
            SortKey::Reviews => "reviews",
            SortKey::Rating => "rating",
            SortKey::PriceValue => "priceValue",
        }
    }

    /// The value of this attribute on `product`, widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, product: &Product) -> f64 {
        match self {
            SortKey::Score => product.score,
            SortKey::Sold => product.sold as f64,
            SortKey::Reviews => product.reviews as f64,
            SortKey::Rating => product.rating,
            SortKey::PriceValue => product.price_value,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        // "price" is accepted as shorthand for the numeric price column.
        if wanted.eq_ignore_ascii_case("price") || wanted.eq_ignore_ascii_case("price-value") {
            return Ok(SortKey::PriceValue);
        }
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidSortKey(s.to_owned()))
    }
}

/// Sorts `products` by `key`, highest first.
///
/// The sort is stable: products with equal values keep their insertion order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    products.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
}

/// Returns the products whose funnel stage is one of `stages`, in their
/// original order.
#[must_use]
pub fn filter_by_stages<'a>(products: &'a [Product], stages: &[FunnelStage]) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| stages.contains(&p.funnel_stage))
        .collect()
}
