use deunicode::deunicode;

/// Maximum slug length in characters.
const MAX_SLUG_LEN: usize = 80;

/// Derive a URL-safe slug from an event title and, when known, its city.
///
/// Lowercased, accents transliterated to ASCII, every run of
/// non-alphanumeric characters collapsed to a single hyphen, trimmed, and
/// capped at 80 characters. The result is a suggestion for the caller —
/// global uniqueness is enforced downstream.
pub fn slugify(title: &str, city: Option<&str>) -> String {
    let base = match city {
        Some(city) => format!("{title} {city}"),
        None => title.to_string(),
    };
    let ascii = deunicode(&base).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}
