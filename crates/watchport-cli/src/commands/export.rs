use crate::output::Output;
use chrono::Utc;
use color_eyre::eyre::{eyre, Result};
use futures::FutureExt;
use std::path::PathBuf;
use std::time::Duration;
use watchlist_config::{Config, PathManager};
use watchlist_csv::{encode, export_filename, CsvSchema};
use watchlist_models::Platform;
use watchlist_scrape::{scrape_watchlist, BrowserClient, ScrollSettings};
use watchlist_sites::{classify, descriptor_for, SiteStatus};

pub async fn run_export(
    url: Option<String>,
    platform: Option<String>,
    format: Option<String>,
    out: Option<PathBuf>,
    headless: bool,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::new().map_err(|e| eyre!("{}", e))?;
    let mut config = Config::load(&paths.config_file()).map_err(|e| eyre!("{}", e))?;
    if headless {
        config.browser.headless = true;
    }

    let (platform, target_url) = resolve_target(url.as_deref(), platform.as_deref(), output)?;

    let schema: CsvSchema = format
        .as_deref()
        .unwrap_or(&config.export.format)
        .parse()
        .map_err(|e: String| eyre!(e))?;

    output.info(format!(
        "Opening the {} watchlist: {}",
        platform.display_name(),
        target_url
    ));
    if !config.browser.headless {
        output.info("Log in if prompted; scrolling starts after a short grace period.");
    }

    let mut browser = BrowserClient::launch(&config.browser, &paths)
        .await
        .map_err(|e| eyre!("{}", e))?;

    let settings = ScrollSettings::from(&config.scroll);
    // The grace wait exists so a headful user can log in first.
    let grace = if config.browser.headless {
        Duration::ZERO
    } else {
        Duration::from_secs(config.browser.page_grace_secs)
    };
    let scraped = browser
        .with_page(&target_url, |page| {
            async move { scrape_watchlist(page, platform, settings, grace).await }.boxed()
        })
        .await;

    if let Err(e) = browser.shutdown().await {
        output.warn(format!("Browser shutdown was not clean: {}", e));
    }
    let records = scraped.map_err(|e| eyre!("{}", e))?;

    if records.is_empty() {
        output.warn(format!(
            "No watchlist items found on {}. Make sure you are logged in and the watchlist is not empty.",
            platform.display_name()
        ));
        return Ok(());
    }

    let csv_text = encode(&records, schema).map_err(|e| eyre!("{}", e))?;

    let path = out.unwrap_or_else(|| {
        let filename = export_filename(platform, Utc::now().date_naive());
        match &config.export.output_dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    });
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&path, &csv_text).await?;

    output.success(format!(
        "Exported {} titles from {} to {}",
        records.len(),
        platform.display_name(),
        path.display()
    ));
    Ok(())
}

/// Pick the platform and the URL to open, from either a raw URL or an
/// explicit platform name.
fn resolve_target(
    url: Option<&str>,
    platform: Option<&str>,
    output: &Output,
) -> Result<(Platform, String)> {
    if let Some(url) = url {
        return match classify(url) {
            SiteStatus::Unsupported => Err(eyre!(
                "{} is not a supported streaming site; run `watchport platforms` for the list",
                url
            )),
            SiteStatus::Supported {
                platform,
                on_watchlist_page,
                watchlist_url,
            } => {
                if on_watchlist_page {
                    Ok((platform, url.to_string()))
                } else {
                    output.warn(format!(
                        "Not a watchlist page; opening {} instead",
                        watchlist_url
                    ));
                    Ok((platform, watchlist_url.to_string()))
                }
            }
        };
    }

    if let Some(name) = platform {
        let platform: Platform = name.parse().map_err(|e: String| eyre!(e))?;
        return Ok((platform, descriptor_for(platform).watchlist_url.to_string()));
    }

    Err(eyre!("Pass --url or --platform to pick a watchlist"))
}
