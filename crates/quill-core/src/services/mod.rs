//! Application services - orchestrate ports to fulfil one use case each.

mod blog;

pub use blog::BlogService;
