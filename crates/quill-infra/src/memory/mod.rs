//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

mod blog;
mod category;
mod user;

pub use blog::InMemoryBlogRepository;
pub use category::InMemoryCategoryRepository;
pub use user::InMemoryUserRepository;
