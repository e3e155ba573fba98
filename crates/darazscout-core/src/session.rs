//! In-memory state for one scraping session.
//!
//! Everything collected during a run lives in a [`SessionState`] owned by the
//! caller. The scrape pipeline and the chat helper borrow it mutably; nothing
//! here is persisted.

use serde::{Deserialize, Serialize};

use crate::products::{sort_products, Product, SortKey};

/// Running counters for the current batch of targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeStats {
    pub total_urls: usize,
    pub processed_urls: usize,
    /// Cumulative across batches until [`SessionState::clear`].
    pub items_found: usize,
    pub success_count: usize,
    pub fail_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub products: Vec<Product>,
    pub chat_history: Vec<ChatMessage>,
    pub stats: ScrapeStats,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the per-batch counters before processing `total_urls` targets.
    ///
    /// `items_found` is left alone; it keeps counting across batches.
    pub fn begin_batch(&mut self, total_urls: usize) {
        self.stats.total_urls = total_urls;
        self.stats.processed_urls = 0;
        self.stats.success_count = 0;
        self.stats.fail_count = 0;
    }

    /// Appends a successful target's products and bumps the counters.
    pub fn record_success(&mut self, products: Vec<Product>) {
        self.stats.items_found += products.len();
        self.stats.success_count += 1;
        self.stats.processed_urls += 1;
        self.products.extend(products);
    }

    pub fn record_failure(&mut self) {
        self.stats.fail_count += 1;
        self.stats.processed_urls += 1;
    }

    /// Drops collected products and all counters so a long-lived session can
    /// start over; the next batch numbers product ids from zero again. Chat
    /// history survives a clear.
    pub fn clear(&mut self) {
        self.products.clear();
        self.stats = ScrapeStats::default();
    }

    pub fn push_chat(&mut self, role: ChatRole, text: impl Into<String>) {
        self.chat_history.push(ChatMessage {
            role,
            text: text.into(),
        });
    }

    /// The `n` highest-scoring products, ties in insertion order.
    #[must_use]
    pub fn top_by_score(&self, n: usize) -> Vec<Product> {
        let mut ranked = self.products.clone();
        sort_products(&mut ranked, SortKey::Score);
        ranked.truncate(n);
        ranked
    }

    /// Product count per category, largest first; equal counts keep the order
    /// in which the categories were first seen.
    #[must_use]
    pub fn category_distribution(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for product in &self.products {
            match counts.iter_mut().find(|(cat, _)| *cat == product.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((product.category.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// `(price_value, score, name)` for the first `n` products, for
    /// price-versus-demand comparisons.
    #[must_use]
    pub fn price_score_points(&self, n: usize) -> Vec<(f64, f64, &str)> {
        self.products
            .iter()
            .take(n)
            .map(|p| (p.price_value, p.score, p.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
