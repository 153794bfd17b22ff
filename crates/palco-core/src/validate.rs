//! Validation and normalization of the model's reply.
//!
//! The model is untrusted: every field passes through an explicit rule
//! here before it reaches the submission form. Required fields reject,
//! optional fields default — never the other way around.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ScrapeError;
use crate::models::{ScrapedEventData, UNKNOWN_ORGANIZER};
use crate::slug::slugify;
use crate::vocab::{is_known_topic, Category, EventFormat, PriceType};

/// Parse and validate a raw model reply into the final event record.
pub fn validate_reply(raw: &str, source_url: &str) -> Result<ScrapedEventData, ScrapeError> {
    let reply = parse_reply(raw)?;

    // Required fields: reject, never default.
    let title = string_field(&reply, "title")
        .ok_or(ScrapeError::MissingRequiredField { field: "title" })?;
    let start_date = string_field(&reply, "start_date")
        .and_then(|s| parse_date(&s))
        .ok_or(ScrapeError::MissingRequiredField { field: "start_date" })?;
    let category = string_field(&reply, "category")
        .and_then(|s| Category::parse(&s))
        .ok_or(ScrapeError::MissingRequiredField { field: "category" })?;

    // Optional fields: coerce with explicit fallbacks.
    let description = string_field(&reply, "description").unwrap_or_default();
    let end_date = string_field(&reply, "end_date").and_then(|s| parse_date(&s));
    let start_time = string_field(&reply, "start_time").filter(|s| is_valid_time(s));
    let end_time = string_field(&reply, "end_time").filter(|s| is_valid_time(s));
    let city = string_field(&reply, "city");
    let state = string_field(&reply, "state");
    let address = string_field(&reply, "address");
    let venue_name = string_field(&reply, "venue_name");

    let topics = topic_list(&reply);

    let format = string_field(&reply, "format")
        .and_then(|s| EventFormat::parse(&s))
        .unwrap_or(EventFormat::Presencial);

    let is_free = reply.get("is_free").and_then(Value::as_bool).unwrap_or(false);
    let (price_type, price_value) = if is_free {
        (None, None)
    } else {
        let price_type = string_field(&reply, "price_type").and_then(|s| PriceType::parse(&s));
        let price_value = reply
            .get("price_value")
            .and_then(Value::as_f64)
            .filter(|v| *v > 0.0);
        (price_type, price_value)
    };

    let ticket_url = string_field(&reply, "ticket_url");
    let event_url = string_field(&reply, "event_url").unwrap_or_else(|| source_url.to_string());
    let image_url = string_field(&reply, "image_url");
    let organizer_name =
        string_field(&reply, "organizer_name").unwrap_or_else(|| UNKNOWN_ORGANIZER.to_string());
    let organizer_url = string_field(&reply, "organizer_url");

    let latitude = reply.get("latitude").and_then(Value::as_f64);
    let longitude = reply.get("longitude").and_then(Value::as_f64);

    let slug = slugify(&title, city.as_deref());

    Ok(ScrapedEventData {
        title,
        description,
        start_date,
        end_date,
        start_time,
        end_time,
        city,
        state,
        address,
        venue_name,
        category,
        topics,
        is_free,
        price_type,
        price_value,
        ticket_url,
        event_url,
        image_url,
        organizer_name,
        organizer_url,
        format,
        latitude,
        longitude,
        slug,
    })
}

/// Parse the reply as JSON, tolerating markdown code fencing.
///
/// Direct parse first; on failure, recover the interior of the first
/// triple-backtick block (optionally tagged `json`) and parse that.
pub fn parse_reply(raw: &str) -> Result<Value, ScrapeError> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Ok(value);
        }
    }

    if let Some(inner) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(inner) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    Err(ScrapeError::UnparsableResponse(preview(trimmed)))
}

/// Interior of the first ``` ... ``` block, with an optional `json` tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body = after_fence
        .strip_prefix("json")
        .unwrap_or(after_fence)
        .trim_start();
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Non-empty trimmed string at `key`, or `None`.
fn string_field(reply: &Value, key: &str) -> Option<String> {
    reply
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Strict `YYYY-MM-DD` calendar date. chrono alone would accept
/// non-zero-padded parts, so the 4-2-2 digit shape is checked first.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !digits(0..4) || !digits(5..7) || !digits(8..10) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Local time of day in `HH:MM`.
fn is_valid_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let (Ok(hour), Ok(minute)) = (s[..2].parse::<u8>(), s[3..].parse::<u8>()) else {
        return false;
    };
    hour < 24 && minute < 60
}

/// Topics filtered to the known vocabulary, deduplicated, order preserved.
/// Unknown slugs are dropped silently — never an error.
fn topic_list(reply: &Value) -> Vec<String> {
    let Some(items) = reply.get("topics").and_then(Value::as_array) else {
        return vec![];
    };
    let mut topics: Vec<String> = Vec::new();
    for item in items {
        if let Some(slug) = item.as_str() {
            if is_known_topic(slug) && !topics.iter().any(|t| t == slug) {
                topics.push(slug.to_string());
            }
        }
    }
    topics
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    let mut end = text.len().min(MAX);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
