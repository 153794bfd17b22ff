pub mod confidence;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod slug;
pub mod traits;
pub mod validate;
pub mod vocab;

#[doc(hidden)]
pub mod testutil;

pub use error::ScrapeError;
pub use models::{Confidence, DistilledContent, Extracted, RenderedPage, ScrapeMeta, ScrapedEventData};
pub use pipeline::ExtractionPipeline;
pub use traits::{Distiller, ModelClient, PageFetcher};
