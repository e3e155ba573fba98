//! Product extraction: prompt construction, the completion call, and reply
//! decoding.

use serde_json::Value;

use crate::error::ScraperError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::sanitize::sanitize_reply;

const EXTRACTION_SYSTEM: &str = "You are a data extraction expert. Always return valid JSON.";
const EXTRACTION_TEMPERATURE: f32 = 0.1;
const EXTRACTION_MAX_TOKENS: u32 = 4000;

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a data extraction expert. Extract ALL products from this Daraz.lk HTML page.

For each product, extract:
- Product Name
- Sold Count (number only, if "1.2k sold" → 1200)
- Reviews Count (number only)
- Rating (number, e.g., 4.5)
- Seller Name
- Price (in Rs., numeric value only)
- Product URL (full link)

Return ONLY a valid JSON array like:
[
  {
    "name": "Product Name",
    "sold": 120,
    "reviews": 45,
    "rating": 4.5,
    "seller": "Seller Name",
    "price": 12500,
    "productUrl": "https://www.daraz.lk/products/..."
  }
]"#;

/// Builds the user prompt for one page, keeping at most `max_chars`
/// characters of `markup`.
#[must_use]
pub fn build_extraction_prompt(markup: &str, max_chars: usize) -> String {
    let excerpt = match markup.char_indices().nth(max_chars) {
        Some((cut, _)) => &markup[..cut],
        None => markup,
    };
    format!("{EXTRACTION_INSTRUCTIONS}\n\nHTML Content (first {max_chars} chars):\n{excerpt}\n")
}

/// Strips fences from `reply` and parses what is left as JSON.
///
/// The shape of the value is not checked here; see
/// [`crate::normalize::normalize_products`].
///
/// # Errors
///
/// Returns [`ScraperError::ExtractionFormat`] if the sanitized reply is not
/// valid JSON.
pub fn decode_reply(reply: &str, context: &str) -> Result<Value, ScraperError> {
    let cleaned = sanitize_reply(reply);
    serde_json::from_str(&cleaned).map_err(|source| ScraperError::ExtractionFormat {
        context: context.to_owned(),
        source,
    })
}

/// Asks the model to extract products from `markup` and decodes the reply.
///
/// # Errors
///
/// Returns [`ScraperError::Llm`] if the completion call fails and
/// [`ScraperError::ExtractionFormat`] if the reply is not valid JSON.
pub async fn extract_products(
    llm: &LlmClient,
    model: &str,
    markup: &str,
    max_chars: usize,
    context: &str,
) -> Result<Value, ScraperError> {
    let request = CompletionRequest {
        model: model.to_owned(),
        system: EXTRACTION_SYSTEM.to_owned(),
        user: build_extraction_prompt(markup, max_chars),
        temperature: EXTRACTION_TEMPERATURE,
        max_tokens: EXTRACTION_MAX_TOKENS,
    };
    let reply = llm.complete(&request).await?;
    decode_reply(&reply, context)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prompt_embeds_whole_markup_when_short() {
        let prompt = build_extraction_prompt("<div>rack</div>", 50_000);
        assert!(prompt.starts_with("You are a data extraction expert."));
        assert!(prompt.contains("\"productUrl\""));
        assert!(prompt.contains("HTML Content (first 50000 chars):\n<div>rack</div>"));
    }

    #[test]
    fn prompt_truncates_on_char_boundary() {
        let markup = "ශ්‍රී".repeat(10);
        let prompt = build_extraction_prompt(&markup, 3);
        let excerpt: String = markup.chars().take(3).collect();
        assert!(prompt.ends_with(&format!("{excerpt}\n")));
    }

    #[test]
    fn prompt_with_zero_chars_has_no_markup() {
        let prompt = build_extraction_prompt("<html>", 0);
        assert!(prompt.ends_with("(first 0 chars):\n\n"));
    }

    #[test]
    fn decode_reply_strips_fences() {
        let value = decode_reply("```json\n[{\"name\":\"X\"}]\n```", "Phones").unwrap();
        assert_eq!(value, json!([{ "name": "X" }]));
    }

    #[test]
    fn decode_reply_keeps_non_array_json() {
        let value = decode_reply("{\"products\": []}", "Phones").unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn decode_reply_rejects_prose() {
        let err = decode_reply("Sorry, I could not find any products.", "Phones").unwrap_err();
        assert!(
            matches!(err, ScraperError::ExtractionFormat { ref context, .. } if context == "Phones")
        );
    }
}
