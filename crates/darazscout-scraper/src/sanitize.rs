//! Markdown fence stripping for model replies.

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Strips markdown code fences from a model reply so the remainder can be
/// handed to a strict JSON parser.
///
/// Every "```json" opener and every bare "```" delimiter is removed wherever
/// it appears, and the result is trimmed. The function is total and
/// idempotent. It does not validate JSON.
#[must_use]
pub fn sanitize_reply(reply: &str) -> String {
    reply
        .trim()
        .replace(JSON_FENCE, "")
        .replace(FENCE, "")
        .trim()
        .to_owned()
}
