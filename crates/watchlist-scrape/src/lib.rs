pub mod browser;
pub mod extract;
pub mod scroll;

use anyhow::Result;
use chromiumoxide::Page;
use chrono::Utc;
use std::time::Duration;
use tracing::info;
use watchlist_models::{Platform, TitleRecord};

pub use browser::BrowserClient;
pub use extract::extract_titles;
pub use scroll::{Clock, ScrollSettings, ScrollSurface, Scroller, TokioClock};

/// Drive one rendered watchlist page to quiescence and extract its titles.
///
/// `grace` gives a headful user time to finish logging in before the
/// scroll loop starts. Safe to invoke more than once per page load.
pub async fn scrape_watchlist(
    page: &Page,
    platform: Platform,
    settings: ScrollSettings,
    grace: Duration,
) -> Result<Vec<TitleRecord>> {
    if !grace.is_zero() {
        tokio::time::sleep(grace).await;
    }

    let scroller = Scroller::new(settings);
    let outcome = scroller.settle(page, &TokioClock).await?;
    info!(
        platform = platform.slug(),
        attempts = outcome.attempts,
        final_height = outcome.final_height,
        "Page reached quiescence"
    );

    let html = page.content().await?;
    let records = extract_titles(platform, &html, Utc::now().date_naive());
    info!(platform = platform.slug(), count = records.len(), "Extracted watchlist items");
    Ok(records)
}
