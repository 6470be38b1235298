//! LLM tag classification
//!
//! Content in, vocabulary tag names out. Classification never raises past
//! this boundary: empty input, upstream errors, and unparseable output all
//! degrade to an empty tag set.

use super::vocabulary::TagVocabulary;
use crate::llm::{strip_code_fences, ChatMessage, LlmClient};
use serde::Deserialize;
use std::sync::Arc;

/// Structured output expected from the tagging LLM
#[derive(Debug, Default, Deserialize)]
struct TagResult {
    #[serde(default)]
    tags: Vec<String>,
}

/// Classifies content against the controlled vocabulary
pub struct TagClassifier {
    llm: Arc<dyn LlmClient>,
    vocabulary: Arc<TagVocabulary>,
    max_content_length: usize,
}

impl TagClassifier {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        vocabulary: Arc<TagVocabulary>,
        max_content_length: usize,
    ) -> Self {
        Self {
            llm,
            vocabulary,
            max_content_length,
        }
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You are an expert tagging system for AI-related content scraped from the web (like research papers, blog posts, code repositories). Your sole responsibility is to analyze the provided text content and output a valid JSON object of the form {{"tags": ["tag name", ...]}}.

Available Tags (categorized):
{}

Instructions:
1. Analyze the input text content carefully.
2. Assign tags from the 'Available Tags' list that are most relevant to the content.
3. Focus on accurately categorizing the content based on its subject matter, type, source, technical level, and potential applications.
4. Only assign tags that are clearly supported by the text.
5. Return the assigned tag names as a list of strings under the key "tags".
6. If no tags from the list clearly apply, return an empty list: {{"tags": []}}.
7. Do NOT include any tags that are not in the 'Available Tags' list.
8. Output ONLY the JSON object, with no introductory text, explanations, or apologies."#,
            self.vocabulary.prompt_catalog()
        )
    }

    /// Classify content, returning tag names from the vocabulary.
    pub async fn classify(&self, content: &str) -> Vec<String> {
        if content.trim().is_empty() {
            tracing::warn!("Received empty content for tagging, returning no tags");
            return Vec::new();
        }

        // Truncate excessively long content to stay within token limits
        let content = if content.len() > self.max_content_length {
            tracing::warn!(
                "Content length ({}) exceeds limit ({}), truncating",
                content.len(),
                self.max_content_length
            );
            truncate_at_boundary(content, self.max_content_length)
        } else {
            content
        };

        let messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(format!(
                "Please analyze and tag the following content:\n\n---\nContent Start:\n{}\nContent End\n---",
                content
            )),
        ];

        let response = match self.llm.chat_completion(messages).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error invoking tagging LLM: {}", e);
                return Vec::new();
            }
        };

        let payload = strip_code_fences(&response);
        let result: TagResult = match serde_json::from_str(payload) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Error parsing tag result: {}", e);
                return Vec::new();
            }
        };

        // The vocabulary is the contract; drop anything the model invented.
        let tags: Vec<String> = result
            .tags
            .into_iter()
            .filter(|t| {
                let known = self.vocabulary.contains(t);
                if !known {
                    tracing::warn!("Dropping out-of-vocabulary tag: {}", t);
                }
                known
            })
            .collect();

        tracing::info!("Generated tags: {:?}", tags);
        tags
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MosaicError, Result};
    use async_trait::async_trait;

    struct StubLlm {
        response: std::result::Result<String, String>,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
            self.response
                .clone()
                .map_err(MosaicError::ExternalError)
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(Vec::new())
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(Vec::new())
        }

        fn embedding_dimensions(&self) -> usize {
            0
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn vocabulary() -> Arc<TagVocabulary> {
        Arc::new(
            serde_json::from_value(serde_json::json!({
                "namespace": "ai-content",
                "custom_tags": [{
                    "category": "AI Domain",
                    "tags": [
                        {"name": "LLMs"},
                        {"name": "Reinforcement Learning"}
                    ]
                }]
            }))
            .unwrap(),
        )
    }

    fn classifier(response: std::result::Result<String, String>) -> TagClassifier {
        TagClassifier::new(Arc::new(StubLlm { response }), vocabulary(), 15000)
    }

    #[tokio::test]
    async fn classify_filters_to_vocabulary() {
        let c = classifier(Ok(
            "{\"tags\": [\"LLMs\", \"Made Up Tag\", \"Reinforcement Learning\"]}".to_string(),
        ));
        let tags = c.classify("a paper about RLHF for language models").await;
        assert_eq!(tags, vec!["LLMs", "Reinforcement Learning"]);
    }

    #[tokio::test]
    async fn classify_empty_content_returns_no_tags() {
        let c = classifier(Ok("{\"tags\": [\"LLMs\"]}".to_string()));
        assert!(c.classify("   ").await.is_empty());
    }

    #[tokio::test]
    async fn classify_degrades_on_llm_error() {
        let c = classifier(Err("service down".to_string()));
        assert!(c.classify("some content").await.is_empty());
    }

    #[tokio::test]
    async fn classify_degrades_on_unparseable_output() {
        let c = classifier(Ok("I think the tags are LLMs".to_string()));
        assert!(c.classify("some content").await.is_empty());
    }

    #[tokio::test]
    async fn classify_accepts_fenced_output() {
        let c = classifier(Ok("```json\n{\"tags\": [\"LLMs\"]}\n```".to_string()));
        assert_eq!(c.classify("content").await, vec!["LLMs"]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "héllo wörld";
        let t = truncate_at_boundary(s, 2);
        assert!(t.len() <= 2);
        assert!(s.starts_with(t));
    }
}
