//! Environment configuration

use std::path::PathBuf;
use validator::Validate;

use crate::domain::value_objects::PageSize;
use crate::{CatalogError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:1337";

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Prefix for relative image paths, without a trailing slash.
    pub backend_url: String,
    pub page_size: PageSize,
    pub news_page_size: PageSize,
    pub tree_path: Option<PathBuf>,
    pub news_path: Option<PathBuf>,
    pub port: u16,
}

#[derive(Debug, Validate)]
struct RawConfig {
    #[validate(url)]
    backend_url: String,
    #[validate(range(min = 1, max = 100))]
    page_size: usize,
    #[validate(range(min = 1, max = 100))]
    news_page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            page_size: PageSize::default(),
            news_page_size: PageSize::new(9).unwrap_or_default(),
            tree_path: None,
            news_path: None,
            port: 8083,
        }
    }
}

impl CatalogConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let raw = RawConfig {
            backend_url: lookup("BACKEND_URL").unwrap_or(defaults.backend_url),
            page_size: parse_or(&lookup, "CATALOG_PAGE_SIZE", defaults.page_size.get())?,
            news_page_size: parse_or(&lookup, "NEWS_PAGE_SIZE", defaults.news_page_size.get())?,
        };
        raw.validate().map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self {
            backend_url: raw.backend_url.trim_end_matches('/').to_string(),
            page_size: PageSize::new(raw.page_size)?,
            news_page_size: PageSize::new(raw.news_page_size)?,
            tree_path: lookup("CATALOG_TREE_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            news_path: lookup("NEWS_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            port: parse_or(&lookup, "PORT", defaults.port)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| CatalogError::Config(format!("{key} is not a valid number: {v}"))),
        None => Ok(default),
    }
}
