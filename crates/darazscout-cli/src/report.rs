//! Plain-text rendering of scrape results for the terminal.
//!
//! Everything here is pure: it formats into a `String` and the caller
//! prints it.

use darazscout_core::{Product, ScrapeStats, SessionState};
use darazscout_scraper::{BatchSummary, TargetOutcome};

pub(crate) const TOP_PRODUCTS: usize = 10;
pub(crate) const PRICE_SCORE_POINTS: usize = 50;

/// One line per target: `✓ Scraped 12 items from Phones` or
/// `✗ Failed to scrape Phones: <error>`.
pub(crate) fn outcome_line(outcome: &TargetOutcome) -> String {
    match &outcome.result {
        Ok(found) => format!("✓ Scraped {found} items from {}", outcome.category),
        Err(e) => format!("✗ Failed to scrape {}: {e}", outcome.category),
    }
}

pub(crate) fn render_outcomes(summary: &BatchSummary) -> String {
    summary
        .outcomes
        .iter()
        .map(|outcome| outcome_line(outcome) + "\n")
        .collect()
}

pub(crate) fn render_stats(stats: &ScrapeStats, total_scraped: usize) -> String {
    format!(
        "URLs: {}/{}  Items found: {}  Success: {}  Failed: {}  Total scraped: {}\n",
        stats.processed_urls,
        stats.total_urls,
        stats.items_found,
        stats.success_count,
        stats.fail_count,
        total_scraped
    )
}

/// The display list: one block per product, already sorted and filtered.
pub(crate) fn render_listing(products: &[&Product]) -> String {
    if products.is_empty() {
        return "No products match the selected stages.\n".to_owned();
    }
    let mut out = String::new();
    for (rank, p) in products.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}\n     Category: {} | Seller: {}\n",
            rank + 1,
            p.name,
            p.category,
            p.seller
        ));
        out.push_str(&format!(
            "     {} | rating {} | {} sold | {} reviews\n",
            p.price, p.rating, p.sold, p.reviews
        ));
        out.push_str(&format!("     Score: {} | Stage: {}\n", p.score, p.funnel_stage));
        if !p.product_url.is_empty() {
            out.push_str(&format!("     {}\n", p.product_url));
        }
    }
    out
}

/// Top products by score, category counts, and the price/score pairs.
pub(crate) fn render_analytics(session: &SessionState) -> String {
    let mut out = format!("Top {TOP_PRODUCTS} products by score\n");
    for p in session.top_by_score(TOP_PRODUCTS) {
        out.push_str(&format!(
            "  {:>10}  {:>7} sold  {:>4} ★  {}\n",
            p.score, p.sold, p.rating, p.name
        ));
    }

    out.push_str("\nCategory distribution\n");
    for (category, count) in session.category_distribution() {
        out.push_str(&format!("  {count:>5}  {category}\n"));
    }

    out.push_str(&format!("\nPrice vs score (first {PRICE_SCORE_POINTS})\n"));
    for (price, score, name) in session.price_score_points(PRICE_SCORE_POINTS) {
        out.push_str(&format!("  {price:>10}  {score:>10}  {name}\n"));
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
