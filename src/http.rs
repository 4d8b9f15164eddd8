//! Read API over one catalog snapshot.

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::domain::aggregates::{find_branch, flatten, flatten_branch, ArticleSummary, CategoryNode, ProductViewModel};
use crate::domain::query::{Listing, ListingPage, Page, QueryState};
use crate::domain::records::{normalize_response, Normalized};
use crate::domain::url_state::{PageType, UrlState};
use crate::domain::value_objects::{CategoryFilter, PriceRange, SortKey};
use crate::{fallback, CatalogConfig, CatalogError, Result};

/// Immutable data for one derivation pass. A reload builds a new one.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub categories: Vec<CategoryNode>,
    pub products: Vec<ProductViewModel>,
    pub articles: Vec<ArticleSummary>,
}

impl Snapshot {
    pub fn build(categories: Vec<CategoryNode>, articles: Vec<ArticleSummary>, base_url: &str) -> Self {
        let products = flatten(&categories, base_url);
        Self { categories, products, articles }
    }
}

#[derive(Clone)]
pub struct AppState { pub snapshot: Arc<Snapshot>, pub config: Arc<CatalogConfig> }

impl AppState {
    pub fn new(snapshot: Snapshot, config: CatalogConfig) -> Self {
        Self { snapshot: Arc::new(snapshot), config: Arc::new(config) }
    }
}

/// Read the configured files, falling back to the static tree when the tree
/// file is unset or unreadable.
pub async fn load_snapshot(config: &CatalogConfig) -> Snapshot {
    let categories = match &config.tree_path {
        Some(path) => match read_json(path).await {
            Ok(raw) => CategoryNode::tree_from_json(&raw),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "category tree unavailable, using static fallback");
                fallback::static_tree()
            }
        },
        None => fallback::static_tree(),
    };
    let articles = match &config.news_path {
        Some(path) => match read_json(path).await {
            Ok(raw) => ArticleSummary::list_from_json(&raw, &config.backend_url),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "articles unavailable");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let snapshot = Snapshot::build(categories, articles, &config.backend_url);
    info!(
        categories = snapshot.categories.len(),
        products = snapshot.products.len(),
        articles = snapshot.articles.len(),
        "catalog snapshot ready"
    );
    snapshot
}

async fn read_json(path: &FsPath) -> Result<Value> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-catalog"})) }))
        .route("/api/v1/catalog/categories", get(list_categories))
        .route("/api/v1/catalog/products", get(list_products))
        .route("/api/v1/catalog/search", get(search_products))
        .route("/api/v1/catalog/branches/:sub_id", get(list_branch))
        .route("/api/v1/news", get(list_news))
        .route("/api/v1/content/normalize", post(normalize_content))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub rating: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub q: Option<String>,
}

impl ListParams {
    fn query_state(&self, listing: &Listing<'_>) -> QueryState {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some(listing.price_window().unwrap_or(PriceRange::new(0, u64::MAX)).narrow(min, max)),
        };
        QueryState {
            category: CategoryFilter::from_param(self.category.as_deref()),
            price_range,
            rating: self.rating.filter(|r| r.is_finite()),
            sort: self.sort.as_deref().map(SortKey::parse_lenient).unwrap_or_default(),
            page: self.page.unwrap_or(1).max(1),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: ListingPage,
    pub page_type: PageType,
    /// Query string the page should carry after this render.
    pub location: String,
}

impl ListingResponse {
    fn new(listing: ListingPage, page_type: PageType, state: &QueryState, raw_query: Option<String>) -> Self {
        let location = UrlState::from_query_state(page_type, state).write(page_type, raw_query.as_deref().unwrap_or_default());
        Self { listing, page_type, location }
    }
}

async fn list_categories(State(s): State<AppState>) -> Json<Vec<CategoryNode>> {
    Json(s.snapshot.categories.clone())
}

async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>, RawQuery(raw): RawQuery) -> Json<ListingResponse> {
    let listing = Listing::new(&s.snapshot.products, s.config.page_size);
    let state = p.query_state(&listing);
    Json(ListingResponse::new(listing.run(&state), PageType::Catalog, &state, raw))
}

async fn search_products(State(s): State<AppState>, Query(p): Query<ListParams>, RawQuery(raw): RawQuery) -> Json<ListingResponse> {
    let listing = Listing::new(&s.snapshot.products, s.config.page_size);
    let state = p.query_state(&listing);
    let result = listing.search(p.q.as_deref().unwrap_or_default(), &state);
    Json(ListingResponse::new(result, PageType::Search, &state, raw))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchResponse {
    pub parent_id: String,
    pub parent_name: String,
    pub sub_category_id: String,
    pub sub_category_name: String,
    #[serde(flatten)]
    pub listing: ListingResponse,
}

async fn list_branch(
    State(s): State<AppState>,
    Path(sub_id): Path<String>,
    Query(p): Query<ListParams>,
    RawQuery(raw): RawQuery,
) -> std::result::Result<Json<BranchResponse>, (StatusCode, String)> {
    let branch = find_branch(&s.snapshot.categories, &sub_id).ok_or_else(|| error_response(CatalogError::BranchNotFound(sub_id.clone())))?;
    let products = flatten_branch(&branch, &s.config.backend_url);
    let listing = Listing::new(&products, s.config.page_size);
    let state = p.query_state(&listing);
    let ancestry = branch.ancestry();
    Ok(Json(BranchResponse {
        parent_id: ancestry.parent_id,
        parent_name: ancestry.parent_name,
        sub_category_id: ancestry.sub_category_id,
        sub_category_name: ancestry.sub_category_name,
        listing: ListingResponse::new(listing.run(&state), PageType::BranchDetail, &state, raw),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewsParams { pub category: Option<String>, pub page: Option<u32> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    #[serde(flatten)]
    pub page: Page<ArticleSummary>,
    pub location: String,
}

async fn list_news(State(s): State<AppState>, Query(p): Query<NewsParams>, RawQuery(raw): RawQuery) -> Json<NewsResponse> {
    let filter = CategoryFilter::from_param(p.category.as_deref());
    let matched: Vec<ArticleSummary> = s.snapshot.articles.iter().filter(|a| a.in_category(&filter)).cloned().collect();
    let state = QueryState { category: filter, page: p.page.unwrap_or(1).max(1), ..Default::default() };
    let page = Page::slice(&matched, state.page, s.config.news_page_size);
    let location = UrlState::from_query_state(PageType::News, &state).write(PageType::News, raw.as_deref().unwrap_or_default());
    Json(NewsResponse { page, location })
}

async fn normalize_content(Json(raw): Json<Value>) -> Json<Normalized> {
    Json(normalize_response(&raw))
}

fn error_response(e: CatalogError) -> (StatusCode, String) {
    let status = match e {
        CatalogError::BranchNotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::UnknownSortKey(_) | CatalogError::UnknownPageType(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
