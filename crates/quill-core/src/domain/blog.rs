use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::encode_content;
use super::{Category, Role, User};
use crate::error::DomainError;

/// Blog entity - a published post.
///
/// `blog_content` always holds encoded text; use [`Blog::new`] and
/// [`Blog::revise`] rather than writing it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub author: Uuid,
    pub category: Uuid,
    pub title: String,
    pub slug: String,
    pub featured_image: String,
    pub blog_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new post from a draft. `featured_image` is empty when no
    /// image was uploaded.
    pub fn new(draft: BlogDraft, featured_image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author: draft.author,
            category: draft.category,
            title: draft.title,
            slug: draft.slug,
            featured_image,
            blog_content: encode_content(&draft.content),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields from a draft. The author never changes.
    pub fn revise(&mut self, draft: BlogDraft, featured_image: Option<String>) {
        self.category = draft.category;
        self.title = draft.title;
        self.slug = draft.slug;
        self.blog_content = encode_content(&draft.content);
        if let Some(url) = featured_image {
            self.featured_image = url;
        }
        self.updated_at = Utc::now();
    }
}

/// Caller-supplied fields of a post, with the body still raw.
#[derive(Debug, Clone)]
pub struct BlogDraft {
    pub author: Uuid,
    pub category: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
}

impl BlogDraft {
    /// Reject drafts with a blank title or slug.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if self.slug.trim().is_empty() {
            return Err(DomainError::Validation("Slug is required".to_string()));
        }
        Ok(())
    }
}

/// Filter for listing posts. Every set field must match; results are always
/// ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogQuery {
    pub author: Option<Uuid>,
    pub category: Option<Uuid>,
    pub exclude_slug: Option<String>,
    /// Case-insensitive literal substring of the title.
    pub title_contains: Option<String>,
}

impl BlogQuery {
    /// Match every post.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(mut self, author: Uuid) -> Self {
        self.author = Some(author);
        self
    }

    pub fn in_category(mut self, category: Uuid) -> Self {
        self.category = Some(category);
        self
    }

    pub fn excluding_slug(mut self, slug: impl Into<String>) -> Self {
        self.exclude_slug = Some(slug.into());
        self
    }

    pub fn title_contains(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    /// Evaluate the filter against a single post.
    pub fn matches(&self, blog: &Blog) -> bool {
        if self.author.is_some_and(|a| a != blog.author) {
            return false;
        }
        if self.category.is_some_and(|c| c != blog.category) {
            return false;
        }
        if self.exclude_slug.as_deref() == Some(blog.slug.as_str()) {
            return false;
        }
        if let Some(needle) = &self.title_contains {
            return blog.title.to_lowercase().contains(&needle.to_lowercase());
        }
        true
    }
}

/// Author fields joined into a post view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
        }
    }
}

/// Category fields joined into a post view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// A post with its author and category resolved. A reference that no longer
/// resolves is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: Uuid,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub title: String,
    pub slug: String,
    pub featured_image: String,
    pub blog_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogView {
    pub fn assemble(blog: Blog, author: Option<&User>, category: Option<&Category>) -> Self {
        Self {
            id: blog.id,
            author: author.map(AuthorSummary::from),
            category: category.map(CategorySummary::from),
            title: blog.title,
            slug: blog.slug,
            featured_image: blog.featured_image,
            blog_content: blog.blog_content,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, slug: &str) -> BlogDraft {
        BlogDraft {
            author: Uuid::new_v4(),
            category: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            content: "<b>hi</b>".to_string(),
        }
    }

    #[test]
    fn test_new_blog_encodes_content() {
        let blog = Blog::new(draft("Title", "title"), String::new());
        assert_eq!(blog.blog_content, "&lt;b&gt;hi&lt;/b&gt;");
        assert!(blog.featured_image.is_empty());
    }

    #[test]
    fn test_revise_keeps_author_and_image_when_absent() {
        let mut blog = Blog::new(draft("Title", "title"), "https://img/1.png".to_string());
        let author = blog.author;
        let mut next = draft("Renamed", "renamed");
        next.content = "a < b".to_string();
        blog.revise(next, None);

        assert_eq!(blog.author, author);
        assert_eq!(blog.title, "Renamed");
        assert_eq!(blog.blog_content, "a &lt; b");
        assert_eq!(blog.featured_image, "https://img/1.png");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(draft("  ", "slug").validate().is_err());
        assert!(draft("Title", "").validate().is_err());
        assert!(draft("Title", "slug").validate().is_ok());
    }

    #[test]
    fn test_query_matches() {
        let blog = Blog::new(draft("Cats 101", "cats-101"), String::new());

        assert!(BlogQuery::all().matches(&blog));
        assert!(BlogQuery::all().by_author(blog.author).matches(&blog));
        assert!(!BlogQuery::all().by_author(Uuid::new_v4()).matches(&blog));
        assert!(!BlogQuery::all().excluding_slug("cats-101").matches(&blog));
        assert!(BlogQuery::all().title_contains("CAT").matches(&blog));
        assert!(!BlogQuery::all().title_contains("dog").matches(&blog));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let blog = Blog::new(draft("Title", "title"), String::new());
        let json = serde_json::to_value(BlogView::assemble(blog, None, None)).unwrap();

        assert!(json.get("featuredImage").is_some());
        assert!(json.get("blogContent").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["author"].is_null());
    }
}
