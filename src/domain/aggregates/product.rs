//! Product view model and tree flattening

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::aggregates::category::{CategoryNode, ItemDescriptor, SubcategoryNode};
use crate::domain::media::{resolve_first, PRODUCT_CARD};
use crate::domain::synthesis::synthesize;

/// Render-ready product, every field populated.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    pub image: String,
    pub rating: f64,
    pub reviews: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub href: String,
    pub in_stock: bool,
    pub brand: String,
    pub free_shipping: bool,
    pub warranty: String,
    /// Sort key only.
    #[serde(skip)]
    pub popularity: f64,
    pub created_at: DateTime<Utc>,
    /// Index of the source item within its subcategory.
    pub position: usize,
    pub category: CategoryAncestry,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAncestry {
    pub parent_id: String,
    pub parent_name: String,
    pub sub_category_id: String,
    pub sub_category_name: String,
}

impl CategoryAncestry {
    pub fn new(parent: &CategoryNode, sub: &SubcategoryNode) -> Self {
        Self {
            parent_id: parent.id.clone(),
            parent_name: parent.name.clone(),
            sub_category_id: sub.id.clone(),
            sub_category_name: sub.name.clone(),
        }
    }
}

impl ProductViewModel {
    pub fn derive(item: &ItemDescriptor, index: usize, ancestry: &CategoryAncestry, base_url: &str) -> Self {
        let fields = synthesize(item, index, &ancestry.sub_category_id);
        let id = item.slug.clone().unwrap_or_else(|| format!("{}-{}", ancestry.sub_category_id, index));
        let image = Some(resolve_first(&item.images, base_url, PRODUCT_CARD))
            .filter(|url| !url.is_empty())
            .unwrap_or(fields.image);
        let description = item
            .description
            .clone()
            .unwrap_or_else(|| format!("{} - {}", item.name, ancestry.sub_category_name));
        let href = if item.href.is_empty() { format!("/san-pham/{id}") } else { item.href.clone() };

        Self {
            id,
            name: item.name.clone(),
            description,
            price: fields.price,
            original_price: fields.original_price,
            image,
            rating: fields.rating,
            reviews: fields.reviews,
            badge: fields.badge,
            href,
            in_stock: fields.in_stock,
            brand: fields.brand,
            free_shipping: fields.free_shipping,
            warranty: fields.warranty,
            popularity: fields.popularity,
            created_at: fields.created_at,
            position: index,
            category: ancestry.clone(),
        }
    }
}

/// One subcategory resolved with its parent.
#[derive(Clone, Copy, Debug)]
pub struct Branch<'a> {
    pub parent_category: &'a CategoryNode,
    pub sub_category: &'a SubcategoryNode,
    pub items: &'a [ItemDescriptor],
}

impl Branch<'_> {
    pub fn ancestry(&self) -> CategoryAncestry { CategoryAncestry::new(self.parent_category, self.sub_category) }
}

/// Walk category, subcategory, item in tree order. Indices restart at 0 in
/// every subcategory.
pub fn flatten(categories: &[CategoryNode], base_url: &str) -> Vec<ProductViewModel> {
    categories
        .iter()
        .flat_map(|parent| parent.children.iter().map(move |sub| (parent, sub)))
        .flat_map(|(parent, sub)| {
            let ancestry = CategoryAncestry::new(parent, sub);
            sub.children
                .iter()
                .enumerate()
                .map(move |(index, item)| ProductViewModel::derive(item, index, &ancestry, base_url))
        })
        .collect()
}

/// First subcategory whose id matches, without flattening the tree.
pub fn find_branch<'a>(categories: &'a [CategoryNode], sub_category_id: &str) -> Option<Branch<'a>> {
    categories.iter().find_map(|parent| {
        parent.children.iter().find(|sub| sub.id == sub_category_id).map(|sub| Branch {
            parent_category: parent,
            sub_category: sub,
            items: &sub.children,
        })
    })
}

pub fn flatten_branch(branch: &Branch<'_>, base_url: &str) -> Vec<ProductViewModel> {
    let ancestry = branch.ancestry();
    branch
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| ProductViewModel::derive(item, index, &ancestry, base_url))
        .collect()
}
