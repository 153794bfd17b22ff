use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::vocab::{Category, EventFormat, PriceType};

/// Placeholder used when the page never names an organizer.
pub const UNKNOWN_ORGANIZER: &str = "Organizador não informado";

/// A page as the browser rendered it: raw HTML plus everything captured
/// after JavaScript execution. Created once per request and dropped after
/// distillation — no browser handle crosses this boundary.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    /// Body text as laid out by the browser (post-JavaScript DOM).
    pub visible_text: String,
    /// `og:*` tags plus the standard description meta, name → content.
    pub meta_tags: BTreeMap<String, String>,
    /// Raw `application/ld+json` block texts, in document order.
    pub structured_data: Vec<String>,
    pub title: Option<String>,
}

/// Content-only reduction of a [`RenderedPage`], ready for prompting.
#[derive(Debug, Clone)]
pub struct DistilledContent {
    /// Plain text, capped at 15,000 characters, at least 50.
    pub text: String,
    pub meta_tags: BTreeMap<String, String>,
    /// First structured-data block whose text mentions "Event", if any.
    pub event_block: Option<String>,
    pub has_structured_data: bool,
    pub has_social_tags: bool,
}

/// The validated event record handed to the submission form.
///
/// Every enumerated field holds a value from its fixed vocabulary or was
/// defaulted during validation; nothing here comes straight from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedEventData {
    pub title: String,
    /// HTML fragment, possibly empty.
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Local time of day, `HH:MM`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub venue_name: Option<String>,
    pub category: Category,
    /// Subset of [`crate::vocab::TOPICS`], deduplicated.
    pub topics: Vec<String>,
    pub is_free: bool,
    pub price_type: Option<PriceType>,
    pub price_value: Option<f64>,
    pub ticket_url: Option<String>,
    pub event_url: String,
    pub image_url: Option<String>,
    pub organizer_name: String,
    pub organizer_url: Option<String>,
    pub format: EventFormat,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// URL-safe suggestion; uniqueness is the submission system's problem.
    pub slug: String,
}

/// Advisory completeness estimate shown to the human reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Sidecar diagnostics for the reviewer. Never gates pipeline success.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeMeta {
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
    pub has_jsonld: bool,
    pub has_og_tags: bool,
    pub confidence: Confidence,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Extracted {
    pub data: ScrapedEventData,
    pub meta: ScrapeMeta,
}
