//! Category tree

use serde::Serialize;
use serde_json::Value;

use crate::domain::records::{normalize_item, normalize_response, ContentRecord};

/// Top level of the three-level catalog tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub icon_token: String,
    pub href: String,
    pub children: Vec<SubcategoryNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SubcategoryNode {
    pub id: String,
    pub name: String,
    pub children: Vec<ItemDescriptor>,
}

/// Raw leaf entry. Every commerce field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDescriptor {
    pub name: String,
    pub href: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub original_price: Option<u64>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub badge: Option<String>,
    pub discount_percent: Option<u64>,
    pub brand: Option<String>,
    pub in_stock: Option<bool>,
    pub images: Vec<Value>,
}

impl CategoryNode {
    /// Read a whole tree from a backend response, wrapped or flat.
    pub fn tree_from_json(raw: &Value) -> Vec<CategoryNode> {
        normalize_response(raw).into_vec().iter().map(Self::from_record).collect()
    }

    pub fn from_record(record: &ContentRecord) -> Self {
        let children = first_array(record, &["children", "subcategories"]);
        Self {
            id: record.id.clone(),
            name: record.string_or("name", ""),
            icon_token: record.str("icon").or_else(|| record.str("iconToken")).unwrap_or_default().to_string(),
            href: record.string_or("href", ""),
            children: children.iter().map(|v| SubcategoryNode::from_record(&normalize_item(v))).collect(),
        }
    }

    pub fn item_count(&self) -> usize { self.children.iter().map(|s| s.children.len()).sum() }
}

impl SubcategoryNode {
    pub fn from_record(record: &ContentRecord) -> Self {
        let children = first_array(record, &["children", "items"]);
        Self {
            id: record.id.clone(),
            name: record.string_or("name", ""),
            children: children.iter().map(|v| ItemDescriptor::from_record(&normalize_item(v))).collect(),
        }
    }
}

impl ItemDescriptor {
    pub fn from_record(record: &ContentRecord) -> Self {
        let mut images = record.array("images").to_vec();
        if images.is_empty() {
            images.extend(record.get("image").cloned());
        }
        Self {
            name: record.string_or("name", ""),
            href: record.string_or("href", ""),
            slug: non_empty(record.str("slug")),
            description: non_empty(record.str("description")),
            price: record.u64("price"),
            original_price: record.u64("originalPrice"),
            rating: record.f64("rating"),
            review_count: record.u64("reviewCount"),
            badge: non_empty(record.str("badge")),
            discount_percent: record.u64("discountPercent"),
            brand: non_empty(record.str("brand")),
            in_stock: record.bool("inStock"),
            images,
        }
    }
}

fn first_array<'a>(record: &'a ContentRecord, keys: &[&str]) -> &'a [Value] {
    keys.iter().map(|k| record.array(k)).find(|a| !a.is_empty()).unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
