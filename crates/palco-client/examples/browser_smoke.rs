/// Smoke-test for `BrowserFetcher`.
///
/// Launches a headless Chromium, fetches <https://example.com>, and prints
/// what the fetcher captured.
///
/// Run with:
///   cargo run --example browser_smoke
use palco_client::BrowserFetcher;
use palco_core::traits::PageFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let fetcher = BrowserFetcher::new();

    let url = "https://example.com";
    println!("Fetching {url} …");
    let page = fetcher.fetch(url).await?;

    // Basic sanity checks
    assert!(
        page.html.contains("<h1>Example Domain</h1>"),
        "Expected <h1> not found in rendered HTML"
    );
    assert!(
        page.visible_text.contains("Example Domain"),
        "Expected visible text missing"
    );

    println!(
        "OK — {} bytes of HTML, {} chars of visible text, {} meta tags, {} JSON-LD blocks",
        page.html.len(),
        page.visible_text.chars().count(),
        page.meta_tags.len(),
        page.structured_data.len(),
    );
    println!("Title: {:?}", page.title);
    Ok(())
}
