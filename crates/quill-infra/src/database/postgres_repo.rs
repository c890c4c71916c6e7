//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Blog, BlogQuery, Category, User};
use quill_core::error::RepoError;
use quill_core::ports::{BlogRepository, CategoryRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, read_err};

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Escape LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Translate a domain query into a SQL condition.
pub(crate) fn blog_condition(query: &BlogQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(author) = query.author {
        condition = condition.add(blog::Column::AuthorId.eq(author));
    }
    if let Some(category) = query.category {
        condition = condition.add(blog::Column::CategoryId.eq(category));
    }
    if let Some(slug) = &query.exclude_slug {
        condition = condition.add(blog::Column::Slug.ne(slug.as_str()));
    }
    if let Some(needle) = &query.title_contains {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col(blog::Column::Title)))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }

    condition
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>, RepoError> {
        tracing::debug!(slug = %slug, "Finding blog by slug");

        let result = BlogEntity::find()
            .filter(blog::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(read_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        tracing::debug!(?query, "Listing blogs");

        let result = BlogEntity::find()
            .filter(blog_condition(query))
            .order_by_desc(blog::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(read_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(read_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(read_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(read_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
