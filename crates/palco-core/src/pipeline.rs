use chrono::Utc;

use crate::confidence;
use crate::error::ScrapeError;
use crate::models::{Extracted, ScrapeMeta};
use crate::prompt::build_prompt;
use crate::traits::{Distiller, ModelClient, PageFetcher};
use crate::validate::validate_reply;

/// Orchestrates one extraction: fetch → distill → prompt → complete →
/// validate → score.
///
/// Generic over its collaborators via traits, so tests run without a
/// browser or a model. Stateless across calls; each invocation stands
/// alone, and callers that need resilience retry the whole pipeline.
pub struct ExtractionPipeline<F, D, M>
where
    F: PageFetcher,
    D: Distiller,
    M: ModelClient,
{
    fetcher: F,
    distiller: D,
    model: M,
}

impl<F, D, M> ExtractionPipeline<F, D, M>
where
    F: PageFetcher,
    D: Distiller,
    M: ModelClient,
{
    pub fn new(fetcher: F, distiller: D, model: M) -> Self {
        Self {
            fetcher,
            distiller,
            model,
        }
    }

    /// Run the full pipeline for a single event-listing URL.
    ///
    /// Fails fast with a typed [`ScrapeError`] at the first stage that
    /// cannot proceed; no partial records are ever returned.
    pub async fn extract(&self, url: &str) -> Result<Extracted, ScrapeError> {
        tracing::info!("Fetching {}", url);
        let page = self.fetcher.fetch(url).await?;
        tracing::info!(
            html_bytes = page.html.len(),
            structured_blocks = page.structured_data.len(),
            meta_tags = page.meta_tags.len(),
            "Page rendered"
        );

        let distilled = self.distiller.distill(&page)?;
        tracing::info!(
            chars = distilled.text.chars().count(),
            has_structured_data = distilled.has_structured_data,
            has_social_tags = distilled.has_social_tags,
            "Content distilled"
        );
        drop(page);

        let prompt = build_prompt(url, &distilled, Utc::now().date_naive());
        let reply = self.model.complete(&prompt.system, &prompt.user).await?;
        tracing::info!(reply_chars = reply.chars().count(), "Model replied");

        let data = validate_reply(&reply, url)?;
        let confidence = confidence::score(&data);
        tracing::info!(?confidence, slug = %data.slug, "Extraction validated");

        let meta = ScrapeMeta {
            source_url: url.to_string(),
            scraped_at: Utc::now(),
            has_jsonld: distilled.has_structured_data,
            has_og_tags: distilled.has_social_tags,
            confidence,
        };

        Ok(Extracted { data, meta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use crate::testutil::*;
    use crate::vocab::Category;

    fn model_reply() -> String {
        serde_json::json!({
            "title": "Growth Summit 2026",
            "start_date": "2026-03-12",
            "category": "growth",
            "city": "São Paulo",
            "topics": ["seo", "nao-existe"],
        })
        .to_string()
    }

    #[tokio::test]
    async fn happy_path() {
        let pipeline = ExtractionPipeline::new(
            MockFetcher::with_page(page_with_event()),
            MockDistiller::passthrough(),
            MockModel::new(&model_reply()),
        );

        let out = pipeline.extract("https://example.com/evento").await.unwrap();
        assert_eq!(out.data.category, Category::Growth);
        assert_eq!(out.data.topics, vec!["seo".to_string()]);
        assert_eq!(out.data.slug, "growth-summit-2026-sao-paulo");
        assert_eq!(out.meta.source_url, "https://example.com/evento");
        assert!(out.meta.has_jsonld);
        assert!(out.meta.has_og_tags);
        assert_eq!(out.meta.confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let pipeline = ExtractionPipeline::new(
            MockFetcher::with_error(ScrapeError::FetchTimeout(30)),
            MockDistiller::passthrough(),
            MockModel::new("{}"),
        );

        let err = pipeline.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::FetchTimeout(30)));
    }

    #[tokio::test]
    async fn insufficient_content_skips_model_call() {
        let model = MockModel::new(&model_reply());
        let pipeline = ExtractionPipeline::new(
            MockFetcher::with_page(page_with_text("muito curto")),
            MockDistiller::with_error(ScrapeError::InsufficientContent { length: 11 }),
            model.clone(),
        );

        let err = pipeline.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InsufficientContent { length: 11 }));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn model_error_propagates() {
        let pipeline = ExtractionPipeline::new(
            MockFetcher::with_page(page_with_event()),
            MockDistiller::passthrough(),
            MockModel::with_error(ScrapeError::ModelCall("503 service unavailable".into())),
        );

        let err = pipeline.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::ModelCall(_)));
    }

    #[tokio::test]
    async fn invalid_reply_fails_validation() {
        let pipeline = ExtractionPipeline::new(
            MockFetcher::with_page(page_with_event()),
            MockDistiller::passthrough(),
            MockModel::new("no json at all"),
        );

        let err = pipeline.extract("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::UnparsableResponse(_)));
    }
}
