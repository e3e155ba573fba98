//! CSV export of scraped products.

use std::io::Write;

use chrono::{DateTime, Utc};
use darazscout_core::Product;

use crate::error::ScraperError;

/// Column names, in the field order of [`Product`].
pub const CSV_HEADERS: [&str; 14] = [
    "id",
    "category",
    "name",
    "sold",
    "reviews",
    "rating",
    "seller",
    "price",
    "priceValue",
    "productUrl",
    "sourceUrl",
    "score",
    "funnelStage",
    "scraped_at",
];

/// Writes a header row followed by one row per product.
///
/// The header is written even when `products` is empty.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] if a row cannot be serialized or the
/// writer fails.
pub fn write_products_csv<'a, W, I>(products: I, writer: W) -> Result<usize, ScraperError>
where
    W: Write,
    I: IntoIterator<Item = &'a Product>,
{
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    w.write_record(CSV_HEADERS)?;

    let mut rows = 0usize;
    for product in products {
        w.serialize(product)?;
        rows += 1;
    }
    w.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Default export file name for a run finished at `now`:
/// `daraz_scrape_YYYYMMDD_HHMMSS.csv`.
#[must_use]
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("daraz_scrape_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
