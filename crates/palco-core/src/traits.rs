use std::future::Future;

use crate::error::ScrapeError;
use crate::models::{DistilledContent, RenderedPage};

/// Renders a URL in a browser and captures the result.
///
/// Each call owns exactly one short-lived browser session, released on
/// every exit path.
pub trait PageFetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RenderedPage, ScrapeError>> + Send;
}

/// Reduces a rendered page to bounded, content-only text.
pub trait Distiller: Send + Sync + Clone {
    fn distill(&self, page: &RenderedPage) -> Result<DistilledContent, ScrapeError>;
}

/// Single-shot text-completion call against the extraction model.
///
/// No retry or backoff here; callers that need resilience retry the whole
/// pipeline.
pub trait ModelClient: Send + Sync + Clone {
    fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}
