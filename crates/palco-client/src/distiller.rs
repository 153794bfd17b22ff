use palco_core::error::ScrapeError;
use palco_core::models::{DistilledContent, RenderedPage};
use palco_core::traits::Distiller;
use scraper::node::Element;
use scraper::{Html, Selector};

/// Minimum usable text length; anything shorter typically means a
/// bot-blocking wall or an invalid URL.
const MIN_CONTENT_CHARS: usize = 50;

/// Cap on the distilled text handed to the model.
const MAX_CONTENT_CHARS: usize = 15_000;

/// Tags whose subtrees carry no event content.
const EXCLUDED_TAGS: [&str; 9] = [
    "script", "style", "nav", "footer", "header", "iframe", "noscript", "svg", "form",
];

/// Class/id substrings marking cookie banners, popups, modals, sidebars,
/// and ads. Matched case-insensitively.
const NOISE_MARKERS: [&str; 11] = [
    "cookie", "consent", "gdpr", "popup", "modal", "overlay", "sidebar", "banner", "advert",
    "ads", "sponsor",
];

/// Reduces a rendered page to bounded, content-only plain text plus the
/// first event-flavored structured-data block.
///
/// The canonical text is whichever is longer of the browser's own visible
/// text and the text recovered from a cleaned re-parse of the raw HTML —
/// pages that render everything client-side favor the former, pages whose
/// markup hides content behind overlays favor the latter.
#[derive(Debug, Clone, Default)]
pub struct HtmlDistiller;

impl HtmlDistiller {
    pub fn new() -> Self {
        Self
    }
}

impl Distiller for HtmlDistiller {
    fn distill(&self, page: &RenderedPage) -> Result<DistilledContent, ScrapeError> {
        // Browser-captured blocks win; re-parsing the HTML is the fallback
        // for pages whose scripts were injected too late to be captured.
        let event_block = find_event_block(&page.structured_data)
            .or_else(|| find_event_block(&jsonld_blocks(&page.html)));

        let cleaned = clean_text(&page.html);
        let canonical = if page.visible_text.chars().count() >= cleaned.chars().count() {
            page.visible_text.as_str()
        } else {
            cleaned.as_str()
        };
        let text = truncate_chars(canonical.trim(), MAX_CONTENT_CHARS).to_string();

        let length = text.chars().count();
        if length < MIN_CONTENT_CHARS {
            return Err(ScrapeError::InsufficientContent { length });
        }

        Ok(DistilledContent {
            text,
            meta_tags: page.meta_tags.clone(),
            has_structured_data: event_block.is_some(),
            has_social_tags: page.meta_tags.keys().any(|k| k.starts_with("og:")),
            event_block,
        })
    }
}

/// First structured-data block mentioning "Event". A plain tagged search
/// over the ordered blocks, not a schema-aware parse.
fn find_event_block(blocks: &[String]) -> Option<String> {
    blocks.iter().find(|block| block.contains("Event")).cloned()
}

/// Re-parse the raw HTML for `application/ld+json` blocks.
fn jsonld_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return vec![];
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect()
}

/// Extract plain text from the HTML with non-content subtrees removed.
fn clean_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();

    for node in document.root_element().descendants() {
        // A node inside any excluded subtree contributes nothing.
        let excluded = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(is_excluded);
        if excluded {
            continue;
        }

        match node.value() {
            scraper::Node::Text(text) => raw.push_str(text),
            scraper::Node::Element(el) if !is_excluded(el) && is_block_level(el.name()) => {
                raw.push('\n');
            }
            _ => {}
        }
    }

    normalize_whitespace(&raw)
}

fn is_excluded(el: &Element) -> bool {
    if EXCLUDED_TAGS.contains(&el.name()) {
        return true;
    }
    for attr in ["class", "id"] {
        if let Some(value) = el.attr(attr) {
            let value = value.to_ascii_lowercase();
            if NOISE_MARKERS.iter().any(|marker| value.contains(marker)) {
                return true;
            }
        }
    }
    false
}

fn is_block_level(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "br"
            | "li"
            | "tr"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "ul"
            | "ol"
            | "table"
            | "blockquote"
    )
}

/// Collapse whitespace runs within lines and triple-or-more newlines to
/// double.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;
    for line in raw.lines() {
        let mut compact = String::new();
        for word in line.split_whitespace() {
            if !compact.is_empty() {
                compact.push(' ');
            }
            compact.push_str(word);
        }
        if compact.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(&compact);
        out.push('\n');
    }
    out.trim().to_string()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn page(html: &str, visible_text: &str) -> RenderedPage {
        RenderedPage {
            html: html.to_string(),
            visible_text: visible_text.to_string(),
            meta_tags: BTreeMap::new(),
            structured_data: vec![],
            title: None,
        }
    }

    const FILLER: &str = "Palestras, workshops e networking para profissionais de marketing \
                          digital de todo o Brasil.";

    #[test]
    fn test_strips_excluded_tags() {
        let html = format!(
            "<html><body><nav>Home | Eventos | Contato</nav>\
             <p>Growth Summit 2026. {FILLER}</p>\
             <script>trackPageview()</script>\
             <footer>Todos os direitos reservados</footer></body></html>"
        );
        let distilled = HtmlDistiller::new().distill(&page(&html, "")).unwrap();
        assert!(distilled.text.contains("Growth Summit 2026"));
        assert!(!distilled.text.contains("trackPageview"));
        assert!(!distilled.text.contains("Contato"));
        assert!(!distilled.text.contains("direitos reservados"));
    }

    #[test]
    fn test_strips_noise_classes_and_ids() {
        let html = format!(
            "<html><body>\
             <div class=\"CookieConsent-wrapper\">Aceitar todos os cookies</div>\
             <div id=\"newsletter-modal\">Assine a newsletter</div>\
             <aside class=\"right-sidebar\">Veja também</aside>\
             <p>Growth Summit 2026. {FILLER}</p></body></html>"
        );
        let distilled = HtmlDistiller::new().distill(&page(&html, "")).unwrap();
        assert!(distilled.text.contains("Growth Summit 2026"));
        assert!(!distilled.text.contains("cookies"));
        assert!(!distilled.text.contains("newsletter"));
        assert!(!distilled.text.contains("Veja também"));
    }

    #[test]
    fn test_prefers_longer_source() {
        let short_html = "<html><body><p>Evento</p></body></html>";
        let long_visible = format!("Growth Summit 2026 em São Paulo. {FILLER}");
        let distilled = HtmlDistiller::new()
            .distill(&page(short_html, &long_visible))
            .unwrap();
        assert_eq!(distilled.text, long_visible);

        let long_html = format!("<html><body><p>Growth Summit 2026. {FILLER} {FILLER}</p></body></html>");
        let distilled = HtmlDistiller::new()
            .distill(&page(&long_html, "Growth Summit"))
            .unwrap();
        assert!(distilled.text.contains(FILLER.split_whitespace().next().unwrap()));
    }

    #[test]
    fn test_length_comparison_counts_chars_not_bytes() {
        // 60 chars of accented text is 120 bytes in UTF-8; the 100-char
        // ASCII paragraph is the longer content despite fewer bytes.
        let visible = "ê".repeat(60);
        let ascii = format!("Growth Summit 2026. {}", "a".repeat(80));
        let html = format!("<html><body><p>{ascii}</p></body></html>");
        let distilled = HtmlDistiller::new().distill(&page(&html, &visible)).unwrap();
        assert!(distilled.text.contains("Growth Summit 2026"));
    }

    #[test]
    fn test_insufficient_content() {
        let err = HtmlDistiller::new()
            .distill(&page("<html><body><p>Oi</p></body></html>", "Oi"))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InsufficientContent { .. }));
    }

    #[test]
    fn test_truncates_to_cap() {
        let visible = "palavra ".repeat(4000);
        let distilled = HtmlDistiller::new()
            .distill(&page("<html><body></body></html>", &visible))
            .unwrap();
        assert!(distilled.text.chars().count() <= MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_browser_captured_event_block_wins() {
        let mut p = page(
            r#"<html><body><script type="application/ld+json">{"@type":"Event","name":"Do HTML"}</script></body></html>"#,
            FILLER,
        );
        p.structured_data = vec![
            r#"{"@type":"WebSite"}"#.to_string(),
            r#"{"@type":"Event","name":"Do navegador"}"#.to_string(),
        ];
        let distilled = HtmlDistiller::new().distill(&p).unwrap();
        assert!(distilled.has_structured_data);
        assert!(distilled.event_block.unwrap().contains("Do navegador"));
    }

    #[test]
    fn test_falls_back_to_html_rescan() {
        let p = page(
            r#"<html><body><script type="application/ld+json">{"@type":"Event","name":"Só no HTML"}</script></body></html>"#,
            FILLER,
        );
        let distilled = HtmlDistiller::new().distill(&p).unwrap();
        assert!(distilled.has_structured_data);
        assert!(distilled.event_block.unwrap().contains("Só no HTML"));
    }

    #[test]
    fn test_no_event_block_anywhere() {
        let p = page(
            r#"<html><body><script type="application/ld+json">{"@type":"WebSite"}</script></body></html>"#,
            FILLER,
        );
        let distilled = HtmlDistiller::new().distill(&p).unwrap();
        assert!(!distilled.has_structured_data);
        assert!(distilled.event_block.is_none());
    }

    #[test]
    fn test_og_tags_flagged() {
        let mut p = page("<html><body></body></html>", FILLER);
        p.meta_tags
            .insert("og:title".to_string(), "Growth Summit".to_string());
        let distilled = HtmlDistiller::new().distill(&p).unwrap();
        assert!(distilled.has_social_tags);

        let p = page("<html><body></body></html>", FILLER);
        let distilled = HtmlDistiller::new().distill(&p).unwrap();
        assert!(!distilled.has_social_tags);
    }

    #[test]
    fn test_collapses_newline_runs() {
        let html = format!(
            "<html><body><div><div><div><p>Primeira linha</p></div></div></div>\
             <div><div><p>Segunda linha. {FILLER}</p></div></div></body></html>"
        );
        let distilled = HtmlDistiller::new().distill(&page(&html, "")).unwrap();
        assert!(!distilled.text.contains("\n\n\n"));
    }
}
