//! Article summaries for the news listing

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::media::{resolve_relation, ARTICLE_CARD};
use crate::domain::records::{normalize_response, ContentRecord};
use crate::domain::value_objects::CategoryFilter;

const EXCERPT_CHARS: usize = 160;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Empty when the article has no category.
    pub category: String,
    pub category_name: String,
    /// Empty when no image resolves; the card supplies its own placeholder.
    pub image: String,
    pub published_at: Option<DateTime<Utc>>,
    pub href: String,
}

impl ArticleSummary {
    pub fn list_from_json(raw: &Value, base_url: &str) -> Vec<ArticleSummary> {
        normalize_response(raw).into_vec().iter().map(|r| Self::from_record(r, base_url)).collect()
    }

    pub fn from_record(record: &ContentRecord, base_url: &str) -> Self {
        let title = record.str("title").or_else(|| record.str("name")).unwrap_or_default().to_string();
        let slug = record.str("slug").map(str::to_string).unwrap_or_else(|| record.id.clone());
        let excerpt = record
            .str("excerpt")
            .or_else(|| record.str("description"))
            .map(truncate_excerpt)
            .unwrap_or_default();

        let (category, category_name) = match record.relation("category") {
            Some(cat) => (
                cat.str("slug").map(str::to_string).unwrap_or_else(|| cat.id.clone()),
                cat.string_or("name", ""),
            ),
            None => (record.string_or("category", ""), String::new()),
        };

        let cover = ["cover", "thumbnail", "image"].iter().find_map(|k| record.get(k));
        let published_at = record
            .str("publishedAt")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));

        Self {
            href: format!("/tin-tuc/{slug}"),
            id: record.id.clone(),
            title,
            slug,
            excerpt,
            category,
            category_name,
            image: resolve_relation(cover, base_url, ARTICLE_CARD),
            published_at,
        }
    }

    pub fn in_category(&self, filter: &CategoryFilter) -> bool { filter.matches(&self.category) }
}

fn truncate_excerpt(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
