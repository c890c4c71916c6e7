use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Blog, BlogQuery};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, BlogRepository};

/// In-memory blog repository using a HashMap behind an async RwLock.
///
/// Enforces slug uniqueness the way the database index does.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    store: RwLock<HashMap<Uuid, Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn slug_taken(store: &HashMap<Uuid, Blog>, slug: &str, except: Uuid) -> bool {
        store.values().any(|b| b.slug == slug && b.id != except)
    }
}

#[async_trait]
impl BaseRepository<Blog, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&blog.id) {
            return Err(RepoError::Constraint(format!("blog {} already exists", blog.id)));
        }
        if Self::slug_taken(&store, &blog.slug, blog.id) {
            return Err(RepoError::Constraint(format!("slug '{}' is taken", blog.slug)));
        }
        store.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn update(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&blog.id) {
            return Err(RepoError::NotFound);
        }
        if Self::slug_taken(&store, &blog.slug, blog.id) {
            return Err(RepoError::Constraint(format!("slug '{}' is taken", blog.slug)));
        }
        store.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|b| b.slug == slug).cloned())
    }

    async fn find_all(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let store = self.store.read().await;
        let mut blogs: Vec<Blog> = store.values().filter(|b| query.matches(b)).cloned().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blogs)
    }
}
