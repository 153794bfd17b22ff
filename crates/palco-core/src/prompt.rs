//! Prompt assembly for the extraction model.
//!
//! Pure string building — no I/O, no failure modes. The system message is
//! fixed per process; the user message carries one page's distilled
//! content plus today's date so the model can resolve relative dates.

use chrono::NaiveDate;

use crate::models::DistilledContent;
use crate::vocab::{Category, EventFormat, PriceType, TOPICS};

/// Marker serialized into the user message when no event-flavored
/// structured-data block was found on the page.
pub const NO_STRUCTURED_DATA: &str = "(no structured data block found)";

/// The exact reply shape restated to the model. Field names here are the
/// model-side contract; the validator is the sole authority on what is
/// accepted.
const REPLY_SHAPE: &str = r#"{
  "title": "...",
  "description": "<p>...</p>",
  "start_date": "YYYY-MM-DD",
  "end_date": "YYYY-MM-DD" | null,
  "start_time": "HH:MM" | null,
  "end_time": "HH:MM" | null,
  "city": "..." | null,
  "state": "UF" | null,
  "address": "..." | null,
  "venue_name": "..." | null,
  "category": "<category slug>",
  "topics": ["<topic slug>", ...],
  "is_free": true | false,
  "price_type": "a_partir_de" | "unico" | "nao_informado" | null,
  "price_value": <number> | null,
  "ticket_url": "..." | null,
  "event_url": "..." | null,
  "image_url": "..." | null,
  "organizer_name": "..." | null,
  "organizer_url": "..." | null,
  "format": "PRESENCIAL" | "ONLINE" | "HIBRIDO",
  "latitude": <number> | null,
  "longitude": <number> | null
}"#;

#[derive(Debug, Clone)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

/// Assemble the system instruction and per-call user message for one page.
pub fn build_prompt(url: &str, content: &DistilledContent, today: NaiveDate) -> PromptPayload {
    PromptPayload {
        system: system_message(),
        user: user_message(url, content, today),
    }
}

fn system_message() -> String {
    let categories = join_slugs(Category::ALL.iter().map(|c| c.as_str()));
    let formats = join_slugs(EventFormat::ALL.iter().map(|f| f.as_str()));
    let price_types = join_slugs(PriceType::ALL.iter().map(|p| p.as_str()));
    let topics = join_slugs(TOPICS.iter().copied());

    format!(
        "You extract structured data about Brazilian marketing-industry events \
         from web page content. Respond with a single JSON object and nothing \
         else — no prose, no explanations.\n\n\
         Rules:\n\
         - Use only information present in the provided content. Never invent \
         or guess values; emit null for anything the page does not state.\n\
         - Resolve relative dates (\"próxima sexta\", \"amanhã\") against \
         today's date given in the message.\n\
         - Dates are \"YYYY-MM-DD\"; times are local 24h \"HH:MM\".\n\
         - For ticket_url, prefer a link that actually sells or reserves \
         tickets over generic page links.\n\
         - Keep basic HTML structure (<p>, <ul>, <strong>) in description.\n\
         - category must be exactly one of: {categories}.\n\
         - format must be exactly one of: {formats}.\n\
         - price_type must be one of: {price_types}, or null for free events.\n\
         - topics is an array drawn only from: {topics}.\n\n\
         Reply shape:\n{REPLY_SHAPE}"
    )
}

fn user_message(url: &str, content: &DistilledContent, today: NaiveDate) -> String {
    let mut meta = String::new();
    if content.meta_tags.is_empty() {
        meta.push_str("(none)");
    } else {
        for (name, value) in &content.meta_tags {
            meta.push_str(name);
            meta.push_str(": ");
            meta.push_str(value);
            meta.push('\n');
        }
    }

    let structured = content
        .event_block
        .as_deref()
        .unwrap_or(NO_STRUCTURED_DATA);

    format!(
        "Source URL: {url}\n\
         Today's date: {today}\n\n\
         Meta tags:\n{meta}\n\n\
         Structured data:\n{structured}\n\n\
         Page text:\n{text}\n\n\
         Extract the event as a single JSON object in exactly this shape:\n\
         {REPLY_SHAPE}",
        text = content.text,
    )
}

fn join_slugs<'a>(slugs: impl Iterator<Item = &'a str>) -> String {
    slugs.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn distilled(event_block: Option<String>) -> DistilledContent {
        let mut meta_tags = BTreeMap::new();
        meta_tags.insert("og:title".to_string(), "Growth Summit".to_string());
        DistilledContent {
            text: "Growth Summit 2026, dia 12 de março em São Paulo.".into(),
            meta_tags,
            has_structured_data: event_block.is_some(),
            event_block,
            has_social_tags: true,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn test_system_lists_all_vocabularies() {
        let prompt = build_prompt("https://example.com", &distilled(None), today());
        for cat in Category::ALL {
            assert!(prompt.system.contains(cat.as_str()));
        }
        for fmt in EventFormat::ALL {
            assert!(prompt.system.contains(fmt.as_str()));
        }
        for topic in TOPICS {
            assert!(prompt.system.contains(topic));
        }
    }

    #[test]
    fn test_user_carries_url_date_meta_and_text() {
        let prompt = build_prompt("https://example.com/evento", &distilled(None), today());
        assert!(prompt.user.contains("https://example.com/evento"));
        assert!(prompt.user.contains("2026-02-01"));
        assert!(prompt.user.contains("og:title: Growth Summit"));
        assert!(prompt.user.contains("dia 12 de março"));
    }

    #[test]
    fn test_absent_structured_data_uses_marker() {
        let prompt = build_prompt("https://example.com", &distilled(None), today());
        assert!(prompt.user.contains(NO_STRUCTURED_DATA));
    }

    #[test]
    fn test_present_structured_data_is_embedded() {
        let block = r#"{"@type":"Event","name":"Growth Summit"}"#.to_string();
        let prompt = build_prompt("https://example.com", &distilled(Some(block.clone())), today());
        assert!(prompt.user.contains(&block));
        assert!(!prompt.user.contains(NO_STRUCTURED_DATA));
    }
}
