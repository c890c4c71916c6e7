//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::BlogService;
use quill_core::domain::{Category, Role, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, BlogRepository, CategoryRepository, ImageHost, UserRepository,
};
use quill_infra::{
    DisabledImageHost, InMemoryBlogRepository, InMemoryCategoryRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    self, PostgresBlogRepository, PostgresCategoryRepository, PostgresUserRepository,
};

#[cfg(feature = "cloudinary")]
use quill_infra::{CloudinaryConfig, CloudinaryImageHost};

use crate::config::{AppConfig, MemorySeed};

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// The three repositories the blog service reads and writes.
pub struct Repositories {
    pub blogs: Arc<dyn BlogRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Empty in-memory repositories loaded with `seed`. Returns the seeded
    /// admin alongside.
    pub async fn in_memory(seed: &MemorySeed) -> Result<(Self, User), RepoError> {
        let categories = InMemoryCategoryRepository::new();
        let users = InMemoryUserRepository::new();

        for (name, slug) in &seed.categories {
            categories
                .insert(Category::new(name.clone(), slug.clone()))
                .await?;
        }

        let mut admin = User::new(
            seed.admin_name.clone(),
            seed.admin_email.clone(),
            Role::Admin,
        );
        if let Some(id) = seed.admin_id {
            admin.id = id;
        }
        let admin = users.insert(admin).await?;

        tracing::info!(
            categories = seed.categories.len(),
            admin_id = %admin.id,
            "Seeded in-memory store"
        );

        let repos = Self {
            blogs: Arc::new(InMemoryBlogRepository::new()),
            categories: Arc::new(categories),
            users: Arc::new(users),
        };
        Ok((repos, admin))
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<BlogService>,
    pub storage: Storage,
    /// Admin account created in the in-memory store, if one was seeded.
    pub seeded_admin: Option<User>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let (repos, storage, seeded_admin) = init_repositories(config).await?;
        let images = init_image_host();

        let service = BlogService::new(repos.blogs, repos.categories, repos.users, images)
            .with_upload_options(config.uploads.clone());

        tracing::info!(storage = storage.as_str(), "Application state initialized");

        Ok(Self {
            seeded_admin,
            ..Self::from_service(service, storage)
        })
    }

    pub fn from_service(service: BlogService, storage: Storage) -> Self {
        Self {
            blogs: Arc::new(service),
            storage,
            seeded_admin: None,
        }
    }
}

type InitializedRepositories = (Repositories, Storage, Option<User>);

async fn in_memory(seed: &MemorySeed) -> Result<InitializedRepositories, RepoError> {
    let (repos, admin) = Repositories::in_memory(seed).await?;
    Ok((repos, Storage::Memory, Some(admin)))
}

#[cfg(feature = "postgres")]
async fn init_repositories(config: &AppConfig) -> Result<InitializedRepositories, RepoError> {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory(&config.memory_seed).await;
    };

    match database::connect(db_config).await {
        Ok(conn) => {
            let conn = Arc::new(conn);
            let repos = Repositories {
                blogs: Arc::new(PostgresBlogRepository::new(conn.clone())),
                categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                users: Arc::new(PostgresUserRepository::new(conn)),
            };
            Ok((repos, Storage::Postgres, None))
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory(&config.memory_seed).await
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn init_repositories(config: &AppConfig) -> Result<InitializedRepositories, RepoError> {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory(&config.memory_seed).await
}

#[cfg(feature = "cloudinary")]
fn init_image_host() -> Arc<dyn ImageHost> {
    let Some(config) = CloudinaryConfig::from_env() else {
        tracing::warn!("Cloudinary credentials not set. Image uploads are disabled.");
        return Arc::new(DisabledImageHost);
    };

    match CloudinaryImageHost::new(config) {
        Ok(host) => Arc::new(host),
        Err(e) => {
            tracing::error!("Failed to build image host client: {}. Uploads disabled.", e);
            Arc::new(DisabledImageHost)
        }
    }
}

#[cfg(not(feature = "cloudinary"))]
fn init_image_host() -> Arc<dyn ImageHost> {
    tracing::info!("Running without cloudinary feature - image uploads are disabled");
    Arc::new(DisabledImageHost)
}
