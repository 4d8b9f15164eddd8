//! Aggregates module
pub mod article;
pub mod category;
pub mod product;

pub use article::ArticleSummary;
pub use category::{CategoryNode, ItemDescriptor, SubcategoryNode};
pub use product::{find_branch, flatten, flatten_branch, Branch, CategoryAncestry, ProductViewModel};
