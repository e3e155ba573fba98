//! Scrape pipeline for Daraz.lk listing pages: target generation and
//! parsing, page fetch, model-driven extraction, normalization, chat, and
//! CSV export.

pub mod chat;
pub mod client;
pub mod error;
pub mod export;
pub mod extract;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod sanitize;
pub mod search;
pub mod types;

mod parse_helpers;
mod rate_limit;

pub use chat::{ask_about_products, build_chat_prompt};
pub use client::{relay_url, PageClient};
pub use error::ScraperError;
pub use export::{export_filename, write_products_csv, CSV_HEADERS};
pub use extract::{build_extraction_prompt, decode_reply, extract_products};
pub use input::{parse_input, parse_input_detailed, ParsedInput, FALLBACK_CATEGORY};
pub use llm::{CompletionRequest, LlmClient};
pub use normalize::{
    demand_score, format_price, normalize_products, normalize_products_at, NormalizedBatch,
};
pub use pipeline::{run_scrape, scrape_target, BatchSummary, ScrapeOptions, TargetOutcome};
pub use sanitize::sanitize_reply;
pub use search::{generate_search_urls, generate_search_urls_with_endpoint};
pub use types::{RawExtractedProduct, ScrapeTarget};
