//! Image URL resolution
//!
//! Each call site passes its own list of derived sizes to fall back on. The
//! chains differ on purpose and must not be merged into one.

use serde_json::Value;

use crate::domain::records::{strip_envelope, WRAPPER_FIELD};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat { Large, Medium, Small }

impl ImageFormat {
    pub fn key(&self) -> &'static str {
        match self { Self::Large => "large", Self::Medium => "medium", Self::Small => "small" }
    }
}

/// Product cards in listings.
pub const PRODUCT_CARD: &[ImageFormat] = &[ImageFormat::Large, ImageFormat::Medium, ImageFormat::Small];
/// Product detail hero image.
pub const PRODUCT_DETAIL: &[ImageFormat] = &[ImageFormat::Large];
/// Article cards on the news listing.
pub const ARTICLE_CARD: &[ImageFormat] = &[ImageFormat::Large, ImageFormat::Medium];

/// Resolve `descriptor` to an absolute URL, or `""` when nothing matches.
///
/// Lookup order: direct `url`, then `url` inside the `data` wrapper, then
/// `formats.<size>.url` for each size in `chain`. Relative results are
/// prefixed with `base_url`.
pub fn resolve_image_url(descriptor: &Value, base_url: &str, chain: &[ImageFormat]) -> String {
    if let Value::String(direct) = descriptor {
        return absolutize(direct, base_url);
    }

    let wrapped = descriptor.get("data").filter(|v| v.is_object()).map(unwrap_attributes);
    let layers: Vec<&Value> = std::iter::once(descriptor).chain(wrapped).collect();

    let direct = layers.iter().find_map(|layer| non_empty_str(layer.get("url")));
    let derived = || {
        chain.iter().find_map(|format| {
            layers.iter().find_map(|layer| {
                non_empty_str(layer.get("formats").and_then(|f| f.get(format.key())).and_then(|f| f.get("url")))
            })
        })
    };

    direct.or_else(derived).map(|url| absolutize(url, base_url)).unwrap_or_default()
}

/// First resolvable image in a list, using the same chain for each entry.
pub fn resolve_first(images: &[Value], base_url: &str, chain: &[ImageFormat]) -> String {
    images
        .iter()
        .map(|img| resolve_image_url(unwrap_attributes(img), base_url, chain))
        .find(|url| !url.is_empty())
        .unwrap_or_default()
}

/// Image relation field (`cover: { data: .. }`) resolved with `chain`.
pub fn resolve_relation(field: Option<&Value>, base_url: &str, chain: &[ImageFormat]) -> String {
    match field.map(strip_envelope) {
        Some(Value::Array(images)) => resolve_first(images, base_url, chain),
        Some(other) => resolve_image_url(unwrap_attributes(other), base_url, chain),
        None => String::new(),
    }
}

pub fn is_absolute(url: &str) -> bool {
    url.contains("://") || url.starts_with("//") || url.starts_with("data:")
}

fn absolutize(url: &str, base_url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || is_absolute(url) {
        return url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') { format!("{base}{url}") } else { format!("{base}/{url}") }
}

fn unwrap_attributes(value: &Value) -> &Value {
    value.get(WRAPPER_FIELD).filter(|v| v.is_object()).unwrap_or(value)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}
