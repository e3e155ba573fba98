//! Sequential scrape orchestration: fetch → extract → decode → normalize,
//! one target at a time.

use std::time::Duration;

use darazscout_core::SessionState;

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::extract::extract_products;
use crate::llm::LlmClient;
use crate::normalize::{normalize_products, NormalizedBatch};
use crate::types::ScrapeTarget;

/// Per-run knobs for [`run_scrape`] and [`scrape_target`].
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub model: String,
    /// Pause between consecutive targets. Not applied before the first.
    pub inter_request_delay_ms: u64,
    /// Markup characters embedded in each extraction prompt.
    pub max_markup_chars: usize,
}

impl ScrapeOptions {
    #[must_use]
    pub fn from_config(config: &darazscout_core::AppConfig) -> Self {
        Self {
            model: config.model.as_str().to_owned(),
            inter_request_delay_ms: config.scraper_inter_request_delay_ms,
            max_markup_chars: config.max_markup_chars,
        }
    }
}

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub category: String,
    pub url: String,
    /// Number of products found, or the error message.
    pub result: Result<usize, String>,
}

impl TargetOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-target outcomes of one batch, in target order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchSummary {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    #[must_use]
    pub fn items_found(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }
}

/// Scrapes one target. Product ids are numbered from `batch_index_start`.
///
/// # Errors
///
/// Returns the first failing step's error: a fetch-class error from the page
/// client, [`ScraperError::Llm`], [`ScraperError::ExtractionFormat`], or
/// [`ScraperError::MalformedExtraction`].
pub async fn scrape_target(
    pages: &PageClient,
    llm: &LlmClient,
    options: &ScrapeOptions,
    target: &ScrapeTarget,
    batch_index_start: usize,
) -> Result<NormalizedBatch, ScraperError> {
    let markup = pages.fetch_page(&target.url).await?;
    let decoded = extract_products(
        llm,
        &options.model,
        &markup,
        options.max_markup_chars,
        &target.category,
    )
    .await?;
    let batch = normalize_products(&decoded, &target.category, &target.url, batch_index_start)?;

    if batch.skipped > 0 {
        tracing::warn!(
            category = %target.category,
            skipped = batch.skipped,
            "extraction reply contained non-product records"
        );
    }
    Ok(batch)
}

/// Scrapes `targets` in order, appending products to `session` and updating
/// its stats after every target.
///
/// A failing target is logged and tallied; it never stops the batch.
pub async fn run_scrape(
    pages: &PageClient,
    llm: &LlmClient,
    options: &ScrapeOptions,
    targets: &[ScrapeTarget],
    session: &mut SessionState,
) -> BatchSummary {
    session.begin_batch(targets.len());
    let mut summary = BatchSummary {
        outcomes: Vec::with_capacity(targets.len()),
    };

    for (idx, target) in targets.iter().enumerate() {
        if idx > 0 && options.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(options.inter_request_delay_ms)).await;
        }

        // Numbering from the session length keeps ids unique when two
        // targets share a category.
        let start = session.products.len();
        let result = match scrape_target(pages, llm, options, target, start).await {
            Ok(batch) => {
                let found = batch.products.len();
                tracing::info!(
                    category = %target.category,
                    items = found,
                    "scraped {found} items from {}",
                    target.category
                );
                session.record_success(batch.products);
                Ok(found)
            }
            Err(e) => {
                tracing::error!(
                    category = %target.category,
                    url = %target.url,
                    error = %e,
                    "failed to scrape target"
                );
                session.record_failure();
                Err(e.to_string())
            }
        };

        summary.outcomes.push(TargetOutcome {
            category: target.category.clone(),
            url: target.url.clone(),
            result,
        });
    }

    tracing::info!(
        total = targets.len(),
        succeeded = summary.success_count(),
        failed = summary.fail_count(),
        items = summary.items_found(),
        "scrape batch complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(result: Result<usize, String>) -> TargetOutcome {
        TargetOutcome {
            category: "Phones".to_owned(),
            url: "https://www.daraz.lk/smartphones/".to_owned(),
            result,
        }
    }

    #[test]
    fn summary_tallies_outcomes() {
        let summary = BatchSummary {
            outcomes: vec![
                outcome(Ok(3)),
                outcome(Err("page not found".to_owned())),
                outcome(Ok(0)),
                outcome(Ok(7)),
            ],
        };
        assert_eq!(summary.success_count(), 3);
        assert_eq!(summary.fail_count(), 1);
        assert_eq!(summary.items_found(), 10);
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = BatchSummary::default();
        assert_eq!(summary.success_count(), 0);
        assert_eq!(summary.fail_count(), 0);
        assert_eq!(summary.items_found(), 0);
    }
}
