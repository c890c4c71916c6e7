//! Blog use cases. Each method is one request's worth of work against the
//! injected ports.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Blog, BlogDraft, BlogQuery, BlogView, Category, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    BlogRepository, CategoryRepository, ImageHost, ImageUpload, UploadOptions, UserRepository,
};

/// Blog service - owns every blog operation exposed over HTTP.
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageHost>,
    upload_options: UploadOptions,
}

impl BlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            blogs,
            categories,
            users,
            images,
            upload_options: UploadOptions::default(),
        }
    }

    pub fn with_upload_options(mut self, options: UploadOptions) -> Self {
        self.upload_options = options;
        self
    }

    /// Create a post. When an image is attached it is uploaded first; if the
    /// upload fails nothing is persisted.
    pub async fn create(
        &self,
        actor: &Actor,
        draft: BlogDraft,
        image: Option<ImageUpload>,
    ) -> Result<Blog, DomainError> {
        draft.validate()?;
        if !actor.can_act_for(draft.author) {
            return Err(DomainError::Forbidden);
        }
        self.require_author(draft.author).await?;
        self.require_category(draft.category).await?;

        let featured_image = match image {
            Some(image) => self.upload(image).await?,
            None => String::new(),
        };

        let blog = Blog::new(draft, featured_image);
        Ok(self.blogs.insert(blog).await?)
    }

    /// Admins see every post; everyone else sees their own.
    pub async fn list_for(&self, actor: &Actor) -> Result<Vec<BlogView>, DomainError> {
        let query = if actor.is_admin() {
            BlogQuery::all()
        } else {
            BlogQuery::all().by_author(actor.id)
        };
        self.find_views(&query).await
    }

    /// Every post, regardless of caller.
    pub async fn list_all(&self) -> Result<Vec<BlogView>, DomainError> {
        self.find_views(&BlogQuery::all()).await
    }

    /// Hard-delete a post. Deleting an id that does not exist succeeds.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        let Some(blog) = self.blogs.find_by_id(id).await? else {
            return Ok(());
        };
        if !actor.can_modify(&blog) {
            return Err(DomainError::Forbidden);
        }

        match self.blogs.delete(id).await {
            Ok(()) | Err(RepoError::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load one post for the edit form.
    pub async fn fetch_for_edit(&self, actor: &Actor, id: Uuid) -> Result<BlogView, DomainError> {
        let blog = self.require_blog(id).await?;
        if !actor.can_modify(&blog) {
            return Err(DomainError::Forbidden);
        }
        self.view(blog).await
    }

    /// Overwrite category, title, slug and content; optionally replace the
    /// featured image. The author in `draft` is ignored.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        draft: BlogDraft,
        image: Option<ImageUpload>,
    ) -> Result<Blog, DomainError> {
        draft.validate()?;
        let mut blog = self.require_blog(id).await?;
        if !actor.can_modify(&blog) {
            return Err(DomainError::Forbidden);
        }
        self.require_category(draft.category).await?;

        let featured_image = match image {
            Some(image) => Some(self.upload(image).await?),
            None => None,
        };

        blog.revise(draft, featured_image);
        Ok(self.blogs.update(blog).await?)
    }

    /// One post by slug, or `None`.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogView>, DomainError> {
        match self.blogs.find_by_slug(slug).await? {
            Some(blog) => Ok(Some(self.view(blog).await?)),
            None => Ok(None),
        }
    }

    /// Other posts of the category, without joins.
    pub async fn related(
        &self,
        category_slug: &str,
        exclude_slug: &str,
    ) -> Result<Vec<Blog>, DomainError> {
        let category = self.require_category_by_slug(category_slug).await?;
        let query = BlogQuery::all()
            .in_category(category.id)
            .excluding_slug(exclude_slug);
        Ok(self.blogs.find_all(&query).await?)
    }

    /// Every post of the category, together with the category itself.
    pub async fn by_category(
        &self,
        category_slug: &str,
    ) -> Result<(Category, Vec<BlogView>), DomainError> {
        let category = self.require_category_by_slug(category_slug).await?;
        let blogs = self
            .find_views(&BlogQuery::all().in_category(category.id))
            .await?;
        Ok((category, blogs))
    }

    /// Case-insensitive title search. A blank query matches every post.
    pub async fn search(&self, q: &str) -> Result<Vec<BlogView>, DomainError> {
        let query = if q.trim().is_empty() {
            BlogQuery::all()
        } else {
            BlogQuery::all().title_contains(q)
        };
        self.find_views(&query).await
    }

    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError> {
        let uploaded = self.images.upload(image, &self.upload_options).await?;
        Ok(uploaded.secure_url)
    }

    async fn require_blog(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Blog", id))
    }

    async fn require_author(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Validation("Author not found".to_string()))
    }

    async fn require_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Validation("Category not found".to_string()))
    }

    async fn require_category_by_slug(&self, slug: &str) -> Result<Category, DomainError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", slug))
    }

    async fn find_views(&self, query: &BlogQuery) -> Result<Vec<BlogView>, DomainError> {
        let blogs = self.blogs.find_all(query).await?;
        self.populate(blogs).await
    }

    async fn view(&self, blog: Blog) -> Result<BlogView, DomainError> {
        let mut views = self.populate(vec![blog]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Repository(RepoError::NotFound))
    }

    /// Resolve author and category references with one batched lookup each.
    async fn populate(&self, blogs: Vec<Blog>) -> Result<Vec<BlogView>, DomainError> {
        if blogs.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = blogs.iter().map(|b| b.author).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut category_ids: Vec<Uuid> = blogs.iter().map(|b| b.category).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let authors: HashMap<Uuid, User> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let author = authors.get(&blog.author);
                let category = categories.get(&blog.category);
                BlogView::assemble(blog, author, category)
            })
            .collect())
    }
}
