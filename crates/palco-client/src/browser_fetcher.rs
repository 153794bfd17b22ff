use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use palco_core::error::ScrapeError;
use palco_core::models::RenderedPage;
use palco_core::traits::PageFetcher;
use url::Url;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9";

/// Fixed settling period after the initial load, giving client-side
/// rendered pages time to populate the DOM. Not adaptive.
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Headless-browser page fetcher using Chromium via the Chrome DevTools
/// Protocol.
///
/// Every [`PageFetcher::fetch`] call launches its own short-lived Chromium
/// process, performs exactly one navigation, captures the rendered page,
/// and tears the process down — on success, error, and timeout alike.
/// Concurrent extractions therefore never share browser state, at the cost
/// of one process per in-flight request.
#[derive(Clone)]
pub struct BrowserFetcher {
    nav_timeout: Duration,
}

impl BrowserFetcher {
    /// Fetcher with the standard **30 s** navigation timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(nav_timeout: Duration) -> Self {
        Self { nav_timeout }
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// On systems where Chromium is installed via **snap**, the wrapper at
    /// `/snap/bin/chromium` strips unknown CLI flags, breaking headless
    /// mode. We look for the real binary inside the snap first, then fall
    /// back to well-known system paths. If nothing is found we return
    /// `None` and let `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            // Snap (Ubuntu default)
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            // Flatpak
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            // Common apt / manual installs
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        // Also honour an explicit override via env var.
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn browser_config() -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = Self::find_chrome_binary() {
            tracing::debug!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .arg("--lang=pt-BR")
            .build()
            .map_err(|e| ScrapeError::Fetch(format!("browser config error: {e}")))
    }
}

impl Default for BrowserFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<RenderedPage, ScrapeError> {
        validate_scheme(url)?;

        let session = BrowserSession::launch(Self::browser_config()?).await?;

        // Navigation and initial load are bounded by the timeout; the
        // settle delay and capture run after the load signal.
        let outcome = match tokio::time::timeout(self.nav_timeout, session.navigate(url)).await {
            Ok(Ok(page)) => {
                tokio::time::sleep(SETTLE_DELAY).await;
                capture(&page).await
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ScrapeError::FetchTimeout(self.nav_timeout.as_secs())),
        };

        // Torn down unconditionally; a leaked Chromium outlives the request.
        session.shutdown().await;
        outcome
    }
}

/// Only http(s) targets are navigable; everything else is a fetch error
/// before a browser is ever launched.
fn validate_scheme(url: &str) -> Result<(), ScrapeError> {
    let parsed = Url::parse(url).map_err(|e| ScrapeError::Fetch(format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ScrapeError::Fetch(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}

/// One Chromium process plus its CDP handler task.
struct BrowserSession {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, ScrapeError> {
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection
        // to work.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a tab with the desktop identity and wait for the initial load.
    async fn navigate(&self, url: &str) -> Result<Page, ScrapeError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Fetch(format!("failed to open page: {e}")))?;

        let ua_override = SetUserAgentOverrideParams::builder()
            .user_agent(DESKTOP_USER_AGENT)
            .accept_language(ACCEPT_LANGUAGE)
            .build()
            .map_err(|e| ScrapeError::Fetch(format!("user-agent override error: {e}")))?;
        page.set_user_agent(ua_override)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("failed to set user agent: {e}")))?;

        page.goto(url)
            .await
            .map_err(|e| ScrapeError::Fetch(format!("failed to navigate to {url}: {e}")))?;

        // <body> present is the minimal signal that the page rendered its
        // main content.
        page.find_element("body")
            .await
            .map_err(|e| ScrapeError::Fetch(format!("page did not render body: {e}")))?;

        Ok(page)
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {e}");
        }
        self.handler_task.abort();
    }
}

/// Capture everything the distiller needs from the settled DOM.
async fn capture(page: &Page) -> Result<RenderedPage, ScrapeError> {
    let html = page
        .content()
        .await
        .map_err(|e| ScrapeError::Fetch(format!("failed to read page content: {e}")))?;

    let visible_text: String = evaluate(
        page,
        "document.body ? document.body.innerText : ''",
        "visible text",
    )
    .await?;

    let meta_tags: BTreeMap<String, String> = evaluate(
        page,
        r#"(() => {
            const out = {};
            for (const el of document.querySelectorAll('meta')) {
                const key = el.getAttribute('property') || el.getAttribute('name');
                const content = el.getAttribute('content');
                if (!key || !content) continue;
                if ((key.startsWith('og:') || key === 'description') && !(key in out)) {
                    out[key] = content;
                }
            }
            return out;
        })()"#,
        "meta tags",
    )
    .await?;

    let structured_data: Vec<String> = evaluate(
        page,
        r#"Array.from(
            document.querySelectorAll('script[type="application/ld+json"]')
        ).map(el => el.textContent || '')"#,
        "structured data",
    )
    .await?;

    let title = page
        .get_title()
        .await
        .map_err(|e| ScrapeError::Fetch(format!("failed to read page title: {e}")))?;

    Ok(RenderedPage {
        html,
        visible_text,
        meta_tags,
        structured_data,
        title,
    })
}

async fn evaluate<T: serde::de::DeserializeOwned>(
    page: &Page,
    expr: &str,
    what: &str,
) -> Result<T, ScrapeError> {
    page.evaluate(expr)
        .await
        .map_err(|e| ScrapeError::Fetch(format!("failed to evaluate {what}: {e}")))?
        .into_value()
        .map_err(|e| ScrapeError::Fetch(format!("unexpected {what} result: {e}")))
}
