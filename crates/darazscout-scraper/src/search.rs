//! Paginated search-result targets built from a keyword.

use darazscout_core::config::DEFAULT_SEARCH_ENDPOINT;

use crate::parse_helpers::title_case;
use crate::types::ScrapeTarget;

/// Builds one target per result page `1..=page_count` against the default
/// Daraz catalog search endpoint.
///
/// See [`generate_search_urls_with_endpoint`].
#[must_use]
pub fn generate_search_urls(query: &str, page_count: u32) -> Vec<ScrapeTarget> {
    generate_search_urls_with_endpoint(DEFAULT_SEARCH_ENDPOINT, query, page_count)
}

/// Builds one target per result page `1..=page_count`, in page order.
///
/// The url is `"<endpoint>?page=<n>&q=<query>"` with the query embedded as
/// given; the label is the title-cased query followed by `" (Page <n>)"`.
/// A `page_count` of zero yields no targets. The 50-page ceiling is the
/// caller's to enforce.
#[must_use]
pub fn generate_search_urls_with_endpoint(
    endpoint: &str,
    query: &str,
    page_count: u32,
) -> Vec<ScrapeTarget> {
    let label = title_case(query);
    (1..=page_count)
        .map(|page| ScrapeTarget {
            category: format!("{label} (Page {page})"),
            url: format!("{endpoint}?page={page}&q={query}"),
        })
        .collect()
}
