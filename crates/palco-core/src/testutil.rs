//! Test utilities: mock implementations of the pipeline seam traits.
//!
//! Handwritten mocks for dependency injection in unit tests. Mocks use
//! `Arc<Mutex<_>>` for interior mutability so tests can assert on
//! recorded calls.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ScrapeError;
use crate::models::{DistilledContent, RenderedPage};
use crate::traits::{Distiller, ModelClient, PageFetcher};

/// A rendered page with an Event JSON-LD block and og tags.
pub fn page_with_event() -> RenderedPage {
    let mut meta_tags = BTreeMap::new();
    meta_tags.insert("og:title".to_string(), "Growth Summit 2026".to_string());
    meta_tags.insert(
        "description".to_string(),
        "O maior encontro de growth do Brasil".to_string(),
    );
    RenderedPage {
        html: "<html><body><h1>Growth Summit 2026</h1></body></html>".to_string(),
        visible_text: "Growth Summit 2026 — 12 de março, São Paulo. \
                       Dois dias de palestras sobre growth, aquisição e retenção."
            .to_string(),
        meta_tags,
        structured_data: vec![
            r#"{"@context":"https://schema.org","@type":"Event","name":"Growth Summit 2026"}"#
                .to_string(),
        ],
        title: Some("Growth Summit 2026".to_string()),
    }
}

/// A rendered page with only the given visible text and nothing else.
pub fn page_with_text(text: &str) -> RenderedPage {
    RenderedPage {
        html: format!("<html><body>{text}</body></html>"),
        visible_text: text.to_string(),
        meta_tags: BTreeMap::new(),
        structured_data: vec![],
        title: None,
    }
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher returning a queue of configured results.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<RenderedPage, ScrapeError>>>>,
}

impl MockFetcher {
    pub fn with_page(page: RenderedPage) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(page)])),
        }
    }

    pub fn with_error(error: ScrapeError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
        }
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<RenderedPage, ScrapeError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(page_with_event())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockDistiller
// ---------------------------------------------------------------------------

/// Mock distiller that forwards page content without any cleaning.
#[derive(Clone)]
pub struct MockDistiller {
    error: Arc<Mutex<Option<ScrapeError>>>,
}

impl MockDistiller {
    pub fn passthrough() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_error(error: ScrapeError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl Distiller for MockDistiller {
    fn distill(&self, page: &RenderedPage) -> Result<DistilledContent, ScrapeError> {
        let mut err = self.error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        let event_block = page
            .structured_data
            .iter()
            .find(|block| block.contains("Event"))
            .cloned();
        Ok(DistilledContent {
            text: page.visible_text.clone(),
            meta_tags: page.meta_tags.clone(),
            has_structured_data: event_block.is_some(),
            event_block,
            has_social_tags: page.meta_tags.keys().any(|k| k.starts_with("og:")),
        })
    }
}

// ---------------------------------------------------------------------------
// MockModel
// ---------------------------------------------------------------------------

/// Mock model client returning a fixed reply and counting calls.
#[derive(Clone)]
pub struct MockModel {
    reply: Arc<Mutex<Result<String, ScrapeError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Ok(reply.to_string()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_error(error: ScrapeError) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Err(error))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `complete` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelClient for MockModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().unwrap();
        match &*reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(ScrapeError::ModelCall(e.to_string())),
        }
    }
}
