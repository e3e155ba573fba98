use std::str::FromStr;

use crate::CoreError;

/// Chat-completion models the tool is allowed to call.
///
/// The name is passed through to the completion endpoint untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmModel {
    #[default]
    Gpt4oMini,
    Gpt4o,
    Gpt4Turbo,
    Gpt35Turbo,
}

impl LlmModel {
    pub const ALL: [LlmModel; 4] = [
        LlmModel::Gpt4oMini,
        LlmModel::Gpt4o,
        LlmModel::Gpt4Turbo,
        LlmModel::Gpt35Turbo,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LlmModel::Gpt4oMini => "gpt-4o-mini",
            LlmModel::Gpt4o => "gpt-4o",
            LlmModel::Gpt4Turbo => "gpt-4-turbo",
            LlmModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl std::fmt::Display for LlmModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidModel(s.to_owned()))
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub openai_api_key: Option<String>,
    pub model: LlmModel,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub search_endpoint: String,
    pub cors_proxy: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
    pub max_markup_chars: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("model", &self.model)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("search_endpoint", &self.search_endpoint)
            .field("cors_proxy", &self.cors_proxy)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .field("max_markup_chars", &self.max_markup_chars)
            .finish()
    }
}
