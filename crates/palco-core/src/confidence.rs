use crate::models::{Confidence, ScrapedEventData};

/// Classify extraction completeness from how many of the 12 designated
/// optional fields came back filled. Advisory only — never blocks or
/// alters the record.
pub fn score(data: &ScrapedEventData) -> Confidence {
    let filled = [
        !data.description.trim().is_empty(),
        data.end_date.is_some(),
        is_filled(&data.start_time),
        is_filled(&data.end_time),
        is_filled(&data.city),
        is_filled(&data.state),
        is_filled(&data.address),
        is_filled(&data.venue_name),
        data.price_type.is_some(),
        is_filled(&data.ticket_url),
        is_filled(&data.image_url),
        is_filled(&data.organizer_url),
    ]
    .iter()
    .filter(|&&f| f)
    .count();

    match filled {
        n if n >= 8 => Confidence::High,
        n if n >= 4 => Confidence::Medium,
        _ => Confidence::Low,
    }
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}
