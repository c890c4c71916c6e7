//! SeaORM entities.

pub mod blog;
pub mod category;
pub mod user;
