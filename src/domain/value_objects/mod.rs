//! Value Objects for catalog queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CatalogError;

/// Listing sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the flattened tree order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    Rating,
    Popular,
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Default,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Rating,
        SortKey::Popular,
        SortKey::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
            Self::Popular => "popular",
            Self::Newest => "newest",
        }
    }

    /// Parse for address-bar input, where an unknown key degrades to `Default`.
    pub fn parse_lenient(value: &str) -> Self { value.parse().unwrap_or_default() }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| CatalogError::UnknownSortKey(s.to_string()))
    }
}

/// Category selection for the first pipeline stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Parent(String),
}

impl CategoryFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v == Self::ALL_SENTINEL => Self::All,
            Some(v) => Self::Parent(v.to_string()),
        }
    }

    /// An empty parent id never matches a concrete selection.
    pub fn matches(&self, parent_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Parent(id) => !parent_id.is_empty() && id == parent_id,
        }
    }

    pub fn as_str(&self) -> &str {
        match self { Self::All => Self::ALL_SENTINEL, Self::Parent(id) => id.as_str() }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self { Self::from_param(Some(&value)) }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self { value.as_str().to_string() }
}

/// Inclusive price window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange { pub min: u64, pub max: u64 }

impl PriceRange {
    /// Bounds given out of order are swapped.
    pub fn new(min: u64, max: u64) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }

    /// Full min/max window over the observed prices, `None` when there are none.
    pub fn observed(prices: impl IntoIterator<Item = u64>) -> Option<Self> {
        prices.into_iter().fold(None, |acc, p| match acc {
            None => Some(Self { min: p, max: p }),
            Some(r) => Some(Self { min: r.min.min(p), max: r.max.max(p) }),
        })
    }

    /// Replace either bound of `self`, leaving the other as it was.
    pub fn narrow(&self, min: Option<u64>, max: Option<u64>) -> Self {
        Self::new(min.unwrap_or(self.min), max.unwrap_or(self.max))
    }

    pub fn contains(&self, price: u64) -> bool { price >= self.min && price <= self.max }
}

/// Integer seed for synthesized fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// `code(first char of subcategory id) + multiplier * index`.
    pub fn derive(subcategory_id: &str, index: usize, multiplier: u64) -> Self {
        let code = subcategory_id.encode_utf16().next().map(u64::from).unwrap_or(0);
        Self(code + multiplier * index as u64)
    }
    pub fn value(&self) -> u64 { self.0 }
    pub fn modulo(&self, m: u64) -> u64 { self.0 % m }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Number of items per listing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize(usize);

impl PageSize {
    pub const MAX: usize = 100;

    pub fn new(value: usize) -> Result<Self, CatalogError> {
        if value == 0 { return Err(CatalogError::Config("page size must be positive".into())); }
        if value > Self::MAX { return Err(CatalogError::Config(format!("page size above {}", Self::MAX))); }
        Ok(Self(value))
    }
    pub fn get(&self) -> usize { self.0 }
}

impl Default for PageSize { fn default() -> Self { Self(12) } }
