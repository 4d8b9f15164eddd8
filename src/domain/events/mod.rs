//! Query events
//!
//! What a listing page's controls emit. Applied to a
//! [`QueryState`](crate::domain::query::QueryState) with `apply`.
use crate::domain::value_objects::{CategoryFilter, PriceRange, SortKey};

#[derive(Clone, Debug, PartialEq)]
pub enum QueryEvent {
    CategoryChanged(CategoryFilter),
    SortChanged(SortKey),
    /// `None` restores the full observed window.
    PriceRangeChanged(Option<PriceRange>),
    RatingChanged(Option<f64>),
    PageChanged(u32),
}

/// Side effects the page owes after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub scroll_to_top: bool,
    /// Sort or page moved, so a mirrored query string may need rewriting.
    pub url_dirty: bool,
}
