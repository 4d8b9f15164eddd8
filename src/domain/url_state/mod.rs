//! Address-bar mirroring of listing state
//!
//! Only `sort` and `page` ever reach the query string, and which of them
//! does depends on the page type. Writes keep every unrelated parameter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::domain::query::QueryState;
use crate::domain::value_objects::SortKey;
use crate::CatalogError;

pub const SORT_PARAM: &str = "sort";
pub const PAGE_PARAM: &str = "page";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    /// `?page=<n>`; filters and sort stay in memory.
    Catalog,
    /// `?page=<n>`; category selection stays in memory.
    News,
    /// `?sort=<key>&page=<n>`
    Search,
    /// `?sort=<key>&page=<n>`
    BranchDetail,
}

impl PageType {
    pub fn mirrors_sort(&self) -> bool { matches!(self, Self::Search | Self::BranchDetail) }
    pub fn mirrors_page(&self) -> bool { true }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::News => "news",
            Self::Search => "search",
            Self::BranchDetail => "branch-detail",
        }
    }

    fn mirrors(&self, key: &str) -> bool {
        (key == SORT_PARAM && self.mirrors_sort()) || (key == PAGE_PARAM && self.mirrors_page())
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PageType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "catalog" => Ok(Self::Catalog),
            "news" => Ok(Self::News),
            "search" => Ok(Self::Search),
            "branch-detail" => Ok(Self::BranchDetail),
            other => Err(CatalogError::UnknownPageType(other.to_string())),
        }
    }
}

/// The mirrored slice of a [`QueryState`]. `None` leaves a key alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UrlState {
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
}

impl UrlState {
    /// Read the keys `page_type` mirrors. Bad values read as absent, an
    /// unknown sort as `default`.
    pub fn read(page_type: PageType, query: &str) -> Self {
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
            match &*key {
                SORT_PARAM if page_type.mirrors_sort() && state.sort.is_none() => {
                    state.sort = Some(SortKey::parse_lenient(&value));
                }
                PAGE_PARAM if page_type.mirrors_page() && state.page.is_none() => {
                    state.page = value.trim().parse::<u32>().ok().filter(|p| *p >= 1);
                }
                _ => {}
            }
        }
        state
    }

    pub fn from_query_state(page_type: PageType, state: &QueryState) -> Self {
        Self {
            sort: page_type.mirrors_sort().then_some(state.sort),
            page: page_type.mirrors_page().then_some(state.page.max(1)),
        }
    }

    /// Seed an in-memory state from what the address bar carried.
    pub fn apply_to(&self, state: &mut QueryState) {
        if let Some(sort) = self.sort { state.sort = sort; }
        if let Some(page) = self.page { state.page = page; }
    }

    /// Read-modify-write of `existing`: mirrored keys are replaced in place
    /// (or appended), every other pair is kept in order. Returns the query
    /// without a leading `?`.
    pub fn write(&self, page_type: PageType, existing: &str) -> String {
        let updates: Vec<(&str, String)> = [
            (SORT_PARAM, self.sort.map(|s| s.to_string())),
            (PAGE_PARAM, self.page.map(|p| p.to_string())),
        ]
        .into_iter()
        .filter(|(key, _)| page_type.mirrors(key))
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

        let mut written: Vec<&str> = Vec::new();
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(strip_question_mark(existing).as_bytes()) {
            match updates.iter().find(|(k, _)| *k == &*key) {
                Some((k, _)) if written.contains(k) => {}
                Some((k, v)) => {
                    serializer.append_pair(k, v);
                    written.push(*k);
                }
                None => {
                    serializer.append_pair(&key, &value);
                }
            }
        }
        for (k, v) in updates.iter().filter(|(k, _)| !written.contains(k)) {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

fn strip_question_mark(query: &str) -> &str { query.strip_prefix('?').unwrap_or(query) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_mirrors_page_only() {
        let state = QueryState { sort: SortKey::PriceAsc, page: 3, ..Default::default() };
        let url = UrlState::from_query_state(PageType::Catalog, &state);
        assert_eq!(url.write(PageType::Catalog, ""), "page=3");
        assert_eq!(UrlState::read(PageType::Catalog, "?sort=rating&page=2"), UrlState { sort: None, page: Some(2) });
    }

    #[test]
    fn test_news_mirrors_page_only() {
        let state = QueryState { page: 2, ..Default::default() };
        assert_eq!(UrlState::from_query_state(PageType::News, &state).write(PageType::News, "?sort=x"), "sort=x&page=2");
    }

    #[test]
    fn test_search_mirrors_sort_and_page() {
        let state = QueryState { sort: SortKey::PriceDesc, page: 2, ..Default::default() };
        let url = UrlState::from_query_state(PageType::Search, &state);
        assert_eq!(url.write(PageType::Search, "q=gh%E1%BA%BF"), "q=gh%E1%BA%BF&sort=price-desc&page=2");
        assert_eq!(UrlState::read(PageType::Search, "q=x&sort=price-desc&page=2"), url);
    }

    #[test]
    fn test_write_replaces_in_place_and_drops_duplicates() {
        let url = UrlState { sort: Some(SortKey::Rating), page: Some(1) };
        let out = url.write(PageType::BranchDetail, "page=5&utm=a&sort=newest&page=6");
        assert_eq!(out, "page=1&utm=a&sort=rating");
    }

    #[test]
    fn test_read_degrades() {
        let url = UrlState::read(PageType::BranchDetail, "sort=cheapest&page=0");
        assert_eq!(url, UrlState { sort: Some(SortKey::Default), page: None });
        assert_eq!(UrlState::read(PageType::Search, "page=abc"), UrlState::default());
    }

    #[test]
    fn test_apply_to_state() {
        let mut state = QueryState::default();
        UrlState::read(PageType::Search, "sort=popular&page=4").apply_to(&mut state);
        assert_eq!((state.sort, state.page), (SortKey::Popular, 4));
    }

    #[test]
    fn test_page_type_parse() {
        assert_eq!("branch-detail".parse::<PageType>().unwrap(), PageType::BranchDetail);
        assert!(matches!("home".parse::<PageType>(), Err(CatalogError::UnknownPageType(_))));
    }
}
