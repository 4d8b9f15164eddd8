//! Filter, sort and paginate
//!
//! Five stages, each a pure function over a fresh copy of the flattened
//! list: category, price window, rating threshold, sort, page slice.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::domain::aggregates::ProductViewModel;
use crate::domain::events::{QueryEvent, Transition};
use crate::domain::value_objects::{CategoryFilter, PageSize, PriceRange, SortKey};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub category: CategoryFilter,
    /// `None` means the full observed window.
    pub price_range: Option<PriceRange>,
    pub rating: Option<f64>,
    pub sort: SortKey,
    /// 1-based.
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self { category: CategoryFilter::All, price_range: None, rating: None, sort: SortKey::Default, page: 1 }
    }
}

impl QueryState {
    /// Filter changes go back to page 1 and keep the sort. A sort change also
    /// goes back to page 1. A page change touches nothing else.
    pub fn apply(&mut self, event: QueryEvent) -> Transition {
        let before = (self.sort, self.page);
        let mut scroll_to_top = false;
        match event {
            QueryEvent::CategoryChanged(category) => { self.category = category; self.page = 1; }
            QueryEvent::PriceRangeChanged(range) => { self.price_range = range; self.page = 1; }
            QueryEvent::RatingChanged(rating) => { self.rating = rating; self.page = 1; }
            QueryEvent::SortChanged(sort) => { self.sort = sort; self.page = 1; }
            QueryEvent::PageChanged(page) => {
                self.page = page.max(1);
                scroll_to_top = self.page != 1;
            }
        }
        Transition { scroll_to_top, url_dirty: before != (self.sort, self.page) }
    }
}

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: u32,
}

impl<T: Clone> Page<T> {
    /// Page 0 reads as page 1. A page past the end is empty, not an error.
    pub fn slice(all: &[T], page: u32, size: PageSize) -> Self {
        let page = page.max(1);
        let start = (page as usize - 1).saturating_mul(size.get());
        let items = all.iter().skip(start).take(size.get()).cloned().collect();
        Self { items, page, page_size: size.get(), total_items: all.len(), total_pages: total_pages(all.len(), size) }
    }
}

impl<T> Page<T> {
    /// Filters matched nothing at all, as opposed to a page past the end.
    pub fn is_empty_result(&self) -> bool { self.total_items == 0 }
}

pub fn total_pages(len: usize, size: PageSize) -> u32 { len.div_ceil(size.get()) as u32 }

/// Listing output plus the observed price window for the range control.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(flatten)]
    pub page: Page<ProductViewModel>,
    pub price_window: Option<PriceRange>,
    pub sort: SortKey,
    /// Filters matched nothing, so the page shows the empty-result state.
    pub is_empty: bool,
}

/// Query runner over one immutable snapshot of flattened products.
#[derive(Clone, Copy, Debug)]
pub struct Listing<'a> {
    products: &'a [ProductViewModel],
    page_size: PageSize,
}

impl<'a> Listing<'a> {
    pub fn new(products: &'a [ProductViewModel], page_size: PageSize) -> Self { Self { products, page_size } }

    pub fn run(&self, state: &QueryState) -> ListingPage { self.run_over(self.products, state) }

    /// Name search ahead of the usual stages.
    pub fn search(&self, text: &str, state: &QueryState) -> ListingPage {
        let matched = filter_text(self.products, text);
        self.run_over(&matched, state)
    }

    /// Observed min/max over the whole snapshot.
    pub fn price_window(&self) -> Option<PriceRange> { PriceRange::observed(self.products.iter().map(|p| p.price)) }

    fn run_over(&self, products: &[ProductViewModel], state: &QueryState) -> ListingPage {
        let by_category = filter_category(products, &state.category);
        let by_price = filter_price(&by_category, state.price_range);
        let by_rating = filter_rating(&by_price, state.rating);
        let sorted = sort_products(by_rating, state.sort);
        let page = Page::slice(&sorted, state.page, self.page_size);
        debug!(
            snapshot = products.len(),
            matched = sorted.len(),
            page = page.page,
            total_pages = page.total_pages,
            sort = %state.sort,
            "listing pass"
        );
        let is_empty = page.is_empty_result();
        ListingPage { page, price_window: self.price_window(), sort: state.sort, is_empty }
    }
}

pub fn filter_category(items: &[ProductViewModel], filter: &CategoryFilter) -> Vec<ProductViewModel> {
    items.iter().filter(|p| filter.matches(&p.category.parent_id)).cloned().collect()
}

/// `None` keeps everything: the default window spans every observed price.
pub fn filter_price(items: &[ProductViewModel], range: Option<PriceRange>) -> Vec<ProductViewModel> {
    match range {
        Some(range) => items.iter().filter(|p| range.contains(p.price)).cloned().collect(),
        None => items.to_vec(),
    }
}

/// A non-finite threshold filters nothing.
pub fn filter_rating(items: &[ProductViewModel], threshold: Option<f64>) -> Vec<ProductViewModel> {
    match threshold.filter(|t| t.is_finite()) {
        Some(min) => items.iter().filter(|p| p.rating >= min).cloned().collect(),
        None => items.to_vec(),
    }
}

pub fn filter_text(items: &[ProductViewModel], text: &str) -> Vec<ProductViewModel> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|p| p.name.to_lowercase().contains(&needle)).cloned().collect()
}

/// Stable, so ties keep their incoming order.
pub fn sort_products(mut items: Vec<ProductViewModel>, key: SortKey) -> Vec<ProductViewModel> {
    let compare: fn(&ProductViewModel, &ProductViewModel) -> Ordering = match key {
        SortKey::Default => return items,
        SortKey::PriceAsc => |a, b| a.price.cmp(&b.price),
        SortKey::PriceDesc => |a, b| b.price.cmp(&a.price),
        SortKey::Rating => |a, b| b.rating.total_cmp(&a.rating),
        SortKey::Popular => |a, b| b.popularity.total_cmp(&a.popularity),
        SortKey::Newest => |a, b| b.created_at.cmp(&a.created_at),
    };
    items.sort_by(compare);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{flatten, CategoryNode, ItemDescriptor, SubcategoryNode};

    fn item(name: &str, price: u64, rating: f64) -> ItemDescriptor {
        ItemDescriptor { name: name.into(), href: format!("/p/{name}"), price: Some(price), rating: Some(rating), ..Default::default() }
    }

    fn products() -> Vec<ProductViewModel> {
        let tree = vec![
            CategoryNode {
                id: "noi-that".into(),
                name: "Nội thất".into(),
                children: vec![SubcategoryNode {
                    id: "ghe".into(),
                    name: "Ghế".into(),
                    children: vec![item("Ghế xoay", 3_000_000, 4.5), item("Ghế gỗ", 1_000_000, 4.0), item("Ghế sofa", 3_000_000, 4.9)],
                }],
                ..Default::default()
            },
            CategoryNode {
                id: "den".into(),
                name: "Đèn".into(),
                children: vec![SubcategoryNode {
                    id: "den-ban".into(),
                    name: "Đèn bàn".into(),
                    children: vec![item("Đèn LED", 500_000, 4.2), item("Đèn ngủ", 2_000_000, 5.0)],
                }],
                ..Default::default()
            },
        ];
        flatten(&tree, "http://h")
    }

    fn names(items: &[ProductViewModel]) -> Vec<&str> { items.iter().map(|p| p.name.as_str()).collect() }

    #[test]
    fn test_category_filter_stage() {
        let all = products();
        assert_eq!(filter_category(&all, &CategoryFilter::All).len(), 5);
        assert_eq!(names(&filter_category(&all, &CategoryFilter::from_param(Some("den")))), vec!["Đèn LED", "Đèn ngủ"]);
    }

    #[test]
    fn test_price_stage_is_inclusive() {
        let all = products();
        let kept = filter_price(&all, Some(PriceRange::new(1_000_000, 2_000_000)));
        assert_eq!(names(&kept), vec!["Ghế gỗ", "Đèn ngủ"]);
        assert_eq!(filter_price(&all, None).len(), 5);
    }

    #[test]
    fn test_rating_stage() {
        let all = products();
        assert_eq!(names(&filter_rating(&all, Some(4.5))), vec!["Ghế xoay", "Ghế sofa", "Đèn ngủ"]);
        assert_eq!(filter_rating(&all, None).len(), 5);
        assert_eq!(filter_rating(&all, Some(f64::NAN)).len(), 5);
        assert_eq!(filter_rating(&all, Some(f64::INFINITY)).len(), 5);
    }

    #[test]
    fn test_sort_is_stable() {
        let all = products();
        assert_eq!(names(&sort_products(all.clone(), SortKey::Default)), names(&all));
        let asc = sort_products(all.clone(), SortKey::PriceAsc);
        assert_eq!(names(&asc), vec!["Đèn LED", "Ghế gỗ", "Đèn ngủ", "Ghế xoay", "Ghế sofa"]);
        let desc = sort_products(all.clone(), SortKey::PriceDesc);
        assert_eq!(names(&desc)[..2], ["Ghế xoay", "Ghế sofa"]);
        let rating = sort_products(all, SortKey::Rating);
        assert_eq!(names(&rating)[0], "Đèn ngủ");
    }

    #[test]
    fn test_pagination_edges() {
        let all: Vec<u32> = (0..5).collect();
        let size = PageSize::new(2).unwrap();
        assert_eq!(Page::slice(&all, 3, size).items, vec![4]);
        assert!(Page::slice(&all, 4, size).items.is_empty());
        assert_eq!(Page::slice(&all, 1, size).total_pages, 3);
        assert_eq!(Page::slice(&all, 0, size).items, vec![0, 1]);
        let empty: Page<u32> = Page::slice(&[], 1, size);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_empty_result());
    }

    #[test]
    fn test_listing_run_and_search() {
        let all = products();
        let listing = Listing::new(&all, PageSize::new(2).unwrap());
        let state = QueryState { category: CategoryFilter::from_param(Some("noi-that")), sort: SortKey::PriceAsc, ..Default::default() };
        let out = listing.run(&state);
        assert_eq!(names(&out.page.items), vec!["Ghế gỗ", "Ghế xoay"]);
        assert_eq!(out.page.total_pages, 2);
        assert!(!out.is_empty);
        assert_eq!(out.price_window, Some(PriceRange::new(500_000, 3_000_000)));

        let found = listing.search("ĐÈN", &QueryState::default());
        assert_eq!(found.page.total_items, 2);

        let none = listing.run(&QueryState { rating: Some(6.0), ..Default::default() });
        assert!(none.page.is_empty_result() && none.is_empty);
        let past_end = listing.run(&QueryState { page: 9, ..Default::default() });
        assert!(past_end.page.items.is_empty() && !past_end.is_empty);
    }

    #[test]
    fn test_apply_resets_page_but_not_sort() {
        let mut state = QueryState { sort: SortKey::PriceDesc, page: 3, ..Default::default() };
        let t = state.apply(QueryEvent::CategoryChanged(CategoryFilter::from_param(Some("den"))));
        assert_eq!((state.page, state.sort), (1, SortKey::PriceDesc));
        assert!(t.url_dirty && !t.scroll_to_top);

        state.page = 2;
        state.apply(QueryEvent::RatingChanged(Some(4.0)));
        assert_eq!(state.page, 1);
        state.page = 2;
        state.apply(QueryEvent::PriceRangeChanged(Some(PriceRange::new(1, 2))));
        assert_eq!(state.page, 1);

        state.page = 4;
        state.apply(QueryEvent::SortChanged(SortKey::Rating));
        assert_eq!((state.page, state.sort), (1, SortKey::Rating));
    }

    #[test]
    fn test_apply_page_change_only_touches_page() {
        let mut state = QueryState { rating: Some(4.0), sort: SortKey::Newest, ..Default::default() };
        let before = state.clone();
        let t = state.apply(QueryEvent::PageChanged(3));
        assert!(t.scroll_to_top && t.url_dirty);
        assert_eq!(QueryState { page: 1, ..state.clone() }, before);

        let back = state.apply(QueryEvent::PageChanged(1));
        assert!(!back.scroll_to_top);
        assert_eq!(state.apply(QueryEvent::PageChanged(1)), Transition::default());
    }
}
