//! Target URL validation and CORS relay rewriting.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::ScraperError;

/// Checks that `target` is an absolute `http`/`https` URL.
pub(super) fn validate_target(target: &str) -> Result<reqwest::Url, ScraperError> {
    let url = reqwest::Url::parse(target).map_err(|e| ScraperError::InvalidUrl {
        url: target.to_owned(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScraperError::InvalidUrl {
            url: target.to_owned(),
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}

/// Builds the URL actually requested for `target`.
///
/// With an empty `cors_proxy` the target is fetched directly. Otherwise the
/// target is percent-encoded and appended to the proxy prefix, so
/// `https://corsproxy.io/?` + `https://www.daraz.lk/catalog/?page=1&q=racks`
/// becomes `https://corsproxy.io/?https%3A%2F%2Fwww%2Edaraz%2Elk%2F...`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `target` is not an absolute
/// `http`/`https` URL.
pub fn relay_url(cors_proxy: &str, target: &str) -> Result<String, ScraperError> {
    validate_target(target)?;
    if cors_proxy.is_empty() {
        return Ok(target.to_owned());
    }
    Ok(format!(
        "{cors_proxy}{}",
        utf8_percent_encode(target, NON_ALPHANUMERIC)
    ))
}

/// Host name of `target` for error messages, or the whole string if it
/// does not parse.
pub(super) fn extract_domain(target: &str) -> String {
    reqwest::Url::parse(target)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| target.to_owned())
}
