//! OpenSASE Catalog
//!
//! Normalization and query layer between a loosely-typed content backend
//! and the storefront listing pages.
//!
//! ## Features
//! - Response normalization for wrapped and flat backend records
//! - Image URL resolution with per-call-site fallback chains
//! - Deterministic synthesis of missing commerce fields
//! - Category tree flattening with ancestry
//! - Filter, sort and paginate pipeline
//! - URL query-string mirroring per page type

pub mod config;
pub mod domain;
pub mod fallback;
pub mod http;

use thiserror::Error;

pub use config::CatalogConfig;
pub use domain::aggregates::{
    find_branch, flatten, flatten_branch, ArticleSummary, Branch, CategoryAncestry, CategoryNode,
    ItemDescriptor, ProductViewModel, SubcategoryNode,
};
pub use domain::events::{QueryEvent, Transition};
pub use domain::media::{resolve_image_url, ImageFormat};
pub use domain::query::{Listing, ListingPage, QueryState};
pub use domain::records::{normalize, normalize_response, ContentRecord, Normalized};
pub use domain::url_state::{PageType, UrlState};
pub use domain::value_objects::{CategoryFilter, PageSize, PriceRange, Seed, SortKey};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown page type: {0}")]
    UnknownPageType(String),

    #[error("Subcategory not found: {0}")]
    BranchNotFound(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
