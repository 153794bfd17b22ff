pub mod browser_fetcher;
pub mod distiller;
pub mod llm;

pub use browser_fetcher::BrowserFetcher;
pub use distiller::HtmlDistiller;
pub use llm::OpenAiModelClient;
