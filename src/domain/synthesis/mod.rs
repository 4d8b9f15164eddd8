//! Deterministic commerce fields
//!
//! Preview content often arrives without price, rating or review data. Every
//! value filled in here is a pure function of `(item, index, subcategory id)`,
//! so two renders of the same snapshot always agree.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::aggregates::ItemDescriptor;
use crate::domain::value_objects::Seed;

pub const PRICE_MULTIPLIER: u64 = 7;
pub const RATING_MULTIPLIER: u64 = 13;
pub const REVIEW_MULTIPLIER: u64 = 17;

const PRICE_BASE: u64 = 1_000_000;
const PRICE_STEP: u64 = 100_000;
const PRICE_BUCKETS: u64 = 50;
const DISCOUNT_BUCKETS: u64 = 30;
const FREE_SHIPPING_FROM: u64 = 2_000_000;

const BADGES: [Option<&str>; 4] = [Some("Bán chạy"), Some("Mới"), Some("Hot"), None];
const BRANDS: [&str; 5] = ["Hòa Phát", "Xuân Hòa", "Nội Thất 190", "Fami", "Govi"];
const WARRANTIES: [&str; 3] = ["12 tháng", "24 tháng", "6 tháng"];

/// 2024-01-01T00:00:00Z
const CATALOG_EPOCH: i64 = 1_704_067_200;
const PLACEHOLDER_HOST: &str = "https://picsum.photos/seed";

/// Every commerce field a view model needs, real where the backend had it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SynthesizedFields {
    pub price: u64,
    pub original_price: Option<u64>,
    pub rating: f64,
    pub reviews: u64,
    pub badge: Option<String>,
    pub popularity: f64,
    pub image: String,
    pub brand: String,
    pub in_stock: bool,
    pub free_shipping: bool,
    pub warranty: String,
    pub created_at: DateTime<Utc>,
}

pub fn synthesize(item: &ItemDescriptor, index: usize, subcategory_id: &str) -> SynthesizedFields {
    let seed = Seed::derive(subcategory_id, index, PRICE_MULTIPLIER);
    let rating_seed = Seed::derive(subcategory_id, index, RATING_MULTIPLIER);
    let review_seed = Seed::derive(subcategory_id, index, REVIEW_MULTIPLIER);

    let price = item.price.unwrap_or_else(|| PRICE_BASE + seed.modulo(PRICE_BUCKETS) * PRICE_STEP);
    // No markup when it would not fit above a backend price.
    let original = item.original_price.or_else(|| price.checked_add(seed.modulo(DISCOUNT_BUCKETS) * PRICE_STEP));
    let rating = item.rating.map(round_rating).unwrap_or_else(|| synthetic_rating(rating_seed));
    let reviews = item.review_count.unwrap_or_else(|| 10 + review_seed.modulo(200));

    SynthesizedFields {
        price,
        original_price: original.filter(|o| *o > price),
        rating,
        reviews,
        badge: badge_for(item, index),
        popularity: reviews as f64 * 10.0 + rating * 10.0,
        image: placeholder_image(seed),
        brand: item.brand.clone().unwrap_or_else(|| BRANDS[seed.modulo(BRANDS.len() as u64) as usize].to_string()),
        in_stock: item.in_stock.unwrap_or(seed.modulo(10) != 0),
        free_shipping: price >= FREE_SHIPPING_FROM,
        warranty: WARRANTIES[seed.modulo(WARRANTIES.len() as u64) as usize].to_string(),
        created_at: created_at(seed),
    }
}

pub fn round_rating(rating: f64) -> f64 { (rating * 10.0).round() / 10.0 }

/// 4.0 to 5.9 in tenths.
fn synthetic_rating(seed: Seed) -> f64 { (40 + seed.modulo(20)) as f64 / 10.0 }

fn badge_for(item: &ItemDescriptor, index: usize) -> Option<String> {
    if let Some(badge) = item.badge.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        return Some(badge.to_string());
    }
    if let Some(pct) = item.discount_percent.filter(|p| *p > 0) {
        return Some(format!("-{pct}%"));
    }
    BADGES[index % BADGES.len()].map(str::to_string)
}

pub fn placeholder_image(seed: Seed) -> String { format!("{PLACEHOLDER_HOST}/{seed}/600/600") }

fn created_at(seed: Seed) -> DateTime<Utc> {
    let at = CATALOG_EPOCH - Duration::days(seed.modulo(365) as i64).num_seconds();
    DateTime::from_timestamp(at, 0).unwrap_or_default()
}
