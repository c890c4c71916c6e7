//! Application configuration loaded from environment variables.

use std::env;

use uuid::Uuid;

use quill_core::ports::{ResourceType, UploadOptions};
use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub uploads: UploadOptions,
    /// Largest accepted multipart file, in bytes.
    pub upload_limit_bytes: usize,
    /// Loaded into the in-memory store when no database is used.
    pub memory_seed: MemorySeed,
}

/// Categories and admin account the in-memory store starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySeed {
    /// `(name, slug)` pairs.
    pub categories: Vec<(String, String)>,
    pub admin_id: Option<Uuid>,
    pub admin_name: String,
    pub admin_email: String,
}

impl Default for MemorySeed {
    fn default() -> Self {
        Self {
            categories: parse_categories("General"),
            admin_id: None,
            admin_name: "Admin".to_string(),
            admin_email: "admin@localhost".to_string(),
        }
    }
}

impl MemorySeed {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            categories: env::var("SEED_CATEGORIES")
                .map(|raw| parse_categories(&raw))
                .unwrap_or(defaults.categories),
            admin_id: parse_var("SEED_ADMIN_ID"),
            admin_name: env::var("SEED_ADMIN_NAME").unwrap_or(defaults.admin_name),
            admin_email: env::var("SEED_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_var("DB_MAX_CONNECTIONS").unwrap_or(100);
            config.min_connections = parse_var("DB_MIN_CONNECTIONS").unwrap_or(10);
            config
        });

        let mut uploads = UploadOptions::default();
        if let Ok(folder) = env::var("IMAGE_UPLOAD_FOLDER") {
            uploads.folder = folder;
        }
        if let Ok(kind) = env::var("IMAGE_RESOURCE_TYPE") {
            uploads.resource_type = ResourceType::parse(&kind);
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            uploads,
            upload_limit_bytes: parse_var::<usize>("UPLOAD_LIMIT_MB").unwrap_or(10) * 1024 * 1024,
            memory_seed: MemorySeed::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Comma-separated category names; each slug is derived from its name.
fn parse_categories(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| (name.to_string(), slugify(name)))
        .collect()
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_derives_slugs() {
        assert_eq!(
            parse_categories(" Pets, Fast Cars ,,Rust & Go"),
            vec![
                ("Pets".to_string(), "pets".to_string()),
                ("Fast Cars".to_string(), "fast-cars".to_string()),
                ("Rust & Go".to_string(), "rust-go".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_seed_has_a_category() {
        let seed = MemorySeed::default();
        assert_eq!(seed.categories, vec![("General".to_string(), "general".to_string())]);
        assert!(seed.admin_id.is_none());
    }
}
