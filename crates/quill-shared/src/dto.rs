//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post metadata sent as the JSON `data` field of the create and update forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogMetadata {
    /// Author of a new post. Defaults to the caller; ignored on update.
    #[serde(default)]
    pub author: Option<Uuid>,
    pub category: Uuid,
    pub title: String,
    pub slug: String,
    pub blog_content: String,
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Confirmation returned by mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_parses_camel_case() {
        let category = Uuid::new_v4();
        let raw = format!(
            r#"{{"category":"{category}","title":"Hello","slug":"hello","blogContent":"<p>x</p>"}}"#
        );

        let meta: BlogMetadata = serde_json::from_str(&raw).unwrap();

        assert_eq!(meta.author, None);
        assert_eq!(meta.category, category);
        assert_eq!(meta.blog_content, "<p>x</p>");
    }

    #[test]
    fn test_metadata_rejects_missing_fields() {
        assert!(serde_json::from_str::<BlogMetadata>(r#"{"title":"x"}"#).is_err());
    }
}
