//! Tag vocabulary
//!
//! A fixed catalog of categories and named tags, loaded once at process
//! start and treated as read-only configuration.

use crate::error::{MosaicError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A single tag with an optional description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A named category holding tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCategory {
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tags: Vec<Tag>,
}

/// The controlled vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagVocabulary {
    pub namespace: String,
    pub custom_tags: Vec<TagCategory>,
}

impl TagVocabulary {
    /// Load the vocabulary from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MosaicError::Config(format!(
                "failed to read tag vocabulary at {}: {}",
                path.display(),
                e
            ))
        })?;
        let vocabulary: TagVocabulary = serde_json::from_str(&content)?;
        Ok(vocabulary)
    }

    /// All valid tag names across categories
    pub fn tag_names(&self) -> HashSet<&str> {
        self.custom_tags
            .iter()
            .flat_map(|c| c.tags.iter().map(|t| t.name.as_str()))
            .collect()
    }

    /// Whether a tag name belongs to the vocabulary
    pub fn contains(&self, name: &str) -> bool {
        self.custom_tags
            .iter()
            .any(|c| c.tags.iter().any(|t| t.name == name))
    }

    /// Format the catalog for embedding in the classification prompt
    pub fn prompt_catalog(&self) -> String {
        let mut lines = Vec::new();
        for category in &self.custom_tags {
            lines.push(format!(
                "\nCategory: {} ({})",
                category.category,
                category.description.as_deref().unwrap_or("No description")
            ));
            for tag in &category.tags {
                lines.push(format!(
                    "  - {}: {}",
                    tag.name,
                    tag.description.as_deref().unwrap_or("No description")
                ));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample() -> TagVocabulary {
        serde_json::from_value(serde_json::json!({
            "namespace": "ai-content",
            "custom_tags": [
                {
                    "category": "Content Type",
                    "description": "What kind of content this is",
                    "tags": [
                        {"name": "Research Paper", "description": "Academic publication"},
                        {"name": "Blog Post", "description": null}
                    ]
                },
                {
                    "category": "AI Domain",
                    "tags": [
                        {"name": "LLMs", "description": "Large language models"},
                        {"name": "Computer Vision", "description": "Image and video"}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn collects_tag_names_across_categories() {
        let vocabulary = sample();
        let names = vocabulary.tag_names();
        assert_eq!(names.len(), 4);
        assert!(names.contains("LLMs"));
        assert!(vocabulary.contains("Research Paper"));
        assert!(!vocabulary.contains("Nonexistent"));
    }

    #[test]
    fn prompt_catalog_lists_categories_and_tags() {
        let catalog = sample().prompt_catalog();
        assert!(catalog.contains("Category: Content Type"));
        assert!(catalog.contains("- LLMs: Large language models"));
        assert!(catalog.contains("Blog Post: No description"));
    }
}
