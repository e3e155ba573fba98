//! Free-form questions about the scraped products.

use darazscout_core::{ChatRole, Product, SessionState};

use crate::error::ScraperError;
use crate::llm::{CompletionRequest, LlmClient};

const CHAT_SYSTEM: &str = "You are a helpful data analysis assistant.";
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1000;
const SAMPLE_SIZE: usize = 5;

/// Builds the context prompt: product count, the first few products as
/// pretty JSON, and the question.
#[must_use]
pub fn build_chat_prompt(products: &[Product], question: &str) -> String {
    let sample = &products[..products.len().min(SAMPLE_SIZE)];
    let sample_json = serde_json::to_string_pretty(sample).unwrap_or_else(|_| "[]".to_owned());
    format!(
        "You are a data analysis assistant. The user has scraped {count} products from Daraz.lk.\n\n\
         Sample data (first {SAMPLE_SIZE} products):\n{sample_json}\n\n\
         User question: {question}\n\n\
         Provide insights based on the data.\n",
        count = products.len(),
    )
}

/// Asks `question` about the products in `session` and records both sides
/// of the exchange in its chat history.
///
/// # Errors
///
/// Returns [`ScraperError::Llm`] if the completion call fails. The question
/// stays in the history; no assistant message is added.
pub async fn ask_about_products(
    llm: &LlmClient,
    model: &str,
    session: &mut SessionState,
    question: &str,
) -> Result<String, ScraperError> {
    session.push_chat(ChatRole::User, question);

    let request = CompletionRequest {
        model: model.to_owned(),
        system: CHAT_SYSTEM.to_owned(),
        user: build_chat_prompt(&session.products, question),
        temperature: CHAT_TEMPERATURE,
        max_tokens: CHAT_MAX_TOKENS,
    };
    let answer = llm.complete(&request).await?;

    session.push_chat(ChatRole::Assistant, answer.clone());
    Ok(answer)
}
