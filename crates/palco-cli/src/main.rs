use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use palco_client::{BrowserFetcher, HtmlDistiller, OpenAiModelClient};
use palco_core::ExtractionPipeline;

/// Extract a structured event record from an event-listing page.
///
/// Renders the page in a headless browser, distills its content, asks an
/// extraction model for the event fields, and validates the reply. The
/// result pre-fills the submission form; on failure, manual entry is the
/// fallback.
#[derive(Parser)]
#[command(name = "palco", version, about)]
struct Cli {
    /// Event-listing URL to extract from
    url: String,

    /// Extraction model (e.g., "gpt-4o-mini", "gemini-2.5-flash")
    #[arg(short, long, env = "PALCO_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(
        short,
        long,
        env = "PALCO_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    base_url: String,

    /// API key (reads from PALCO_API_KEY env var if not provided)
    #[arg(short, long, env = "PALCO_API_KEY")]
    api_key: String,

    /// Page navigation timeout in seconds
    #[arg(long, default_value_t = 30)]
    nav_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("palco=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if let Some(scrape_err) = err.downcast_ref::<palco_core::ScrapeError>() {
                eprintln!("{}", scrape_err.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let fetcher = BrowserFetcher::with_timeout(Duration::from_secs(cli.nav_timeout_secs));
    let distiller = HtmlDistiller::new();
    let model = OpenAiModelClient::with_base_url(&cli.api_key, &cli.model, &cli.base_url)?;

    let pipeline = ExtractionPipeline::new(fetcher, distiller, model);
    let extracted = pipeline.extract(&cli.url).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&extracted).context("failed to serialize result")?
    );
    Ok(())
}
