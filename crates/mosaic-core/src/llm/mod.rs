//! LLM integration
//!
//! HTTP clients for external inference services (vLLM, OpenAI-compatible):
//! chat completion for article generation and tag classification, and
//! embeddings for similarity search.

mod cache;
mod client;

pub use client::{ChatMessage, HttpLlmClient, LlmClient, MetricsSnapshot};

/// Strip a Markdown code-fence wrapper from LLM output, if present.
///
/// Models regularly wrap the requested JSON in ```json fences; the parsing
/// policy is to unwrap before parsing and fall back to the raw text when the
/// closing fence is missing.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some((_, rest)) = trimmed.split_once("```json") {
        return match rest.split_once("```") {
            Some((inner, _)) => inner.trim(),
            None => rest.trim(),
        };
    }
    if let Some((_, rest)) = trimmed.split_once("```") {
        return match rest.split_once("```") {
            Some((inner, _)) => inner.trim(),
            None => rest.trim(),
        };
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let wrapped = "```json\n{\"tags\": []}\n```";
        assert_eq!(strip_code_fences(wrapped), "{\"tags\": []}");
    }

    #[test]
    fn strips_bare_fence() {
        let wrapped = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(wrapped), "{\"a\": 1}");
    }

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(strip_code_fences("hello world"), "hello world");
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }
}
