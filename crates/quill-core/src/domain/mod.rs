//! Domain entities - the core business objects.

mod actor;
mod blog;
mod category;
mod content;
mod user;

pub use actor::Actor;
pub use blog::{AuthorSummary, Blog, BlogDraft, BlogQuery, BlogView, CategorySummary};
pub use category::Category;
pub use content::encode_content;
pub use user::{Role, User};
