use anyhow::{anyhow, Result};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::future::BoxFuture;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use watchlist_config::{BrowserOptions, PathManager};
use which::which;

/// Owns the Chromium instance the streaming-site pages render in.
///
/// The profile directory persists between runs so streaming logins
/// survive; headless mode therefore only works once a headful run has
/// signed in.
pub struct BrowserClient {
    browser: Option<Browser>,
    handler_task: Option<tokio::task::JoinHandle<()>>,
}

impl BrowserClient {
    pub async fn launch(options: &BrowserOptions, paths: &PathManager) -> Result<Self> {
        paths.ensure_directories()?;
        let user_data_dir = paths.browser_profile_dir();

        let mut chrome_path = options
            .chrome_path
            .clone()
            .or_else(Self::find_system_chromium);

        // No system Chromium: download one via the fetcher.
        // https://github.com/mattsse/chromiumoxide?tab=readme-ov-file#fetcher
        if chrome_path.is_none() {
            info!("No system Chromium found, downloading via BrowserFetcher...");
            let download_path = paths.chromium_download_dir();
            tokio::fs::create_dir_all(&download_path).await?;

            let fetcher = BrowserFetcher::new(
                BrowserFetcherOptions::builder()
                    .with_path(&download_path)
                    .build()
                    .map_err(|e| anyhow!("Failed to create BrowserFetcherOptions: {}", e))?,
            );
            let fetched = fetcher
                .fetch()
                .await
                .map_err(|e| anyhow!("Failed to fetch Chromium: {}", e))?;
            info!("Chromium downloaded to: {:?}", fetched.executable_path);
            chrome_path = Some(fetched.executable_path);
        }

        let config = Self::build_browser_config(chrome_path, &user_data_dir, options.headless)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        // Drive the CDP event stream until the browser goes away.
        let handler_task = tokio::spawn(async move {
            let mut error_count = 0;
            const MAX_ERRORS: usize = 10;

            while let Some(h) = handler.next().await {
                match h {
                    Ok(_) => {
                        error_count = 0;
                    }
                    Err(e) => {
                        error_count += 1;
                        warn!(
                            "Browser handler error (count: {}/{}): {:?}",
                            error_count, MAX_ERRORS, e
                        );
                        if error_count >= MAX_ERRORS {
                            error!(
                                "Browser handler received {} consecutive errors. Browser process may have crashed.",
                                error_count
                            );
                            break;
                        }
                    }
                }
            }

            if error_count > 0 {
                error!("Browser handler task ended after {} errors", error_count);
            } else {
                info!("Browser handler task ended normally");
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
        })
    }

    fn is_docker() -> bool {
        Path::new("/.dockerenv").exists()
            || std::fs::read_to_string("/proc/self/cgroup")
                .ok()
                .map(|s| s.contains("docker") || s.contains("containerd"))
                .unwrap_or(false)
    }

    fn find_system_chromium() -> Option<PathBuf> {
        if Self::is_docker() {
            let docker_paths = ["/usr/bin/chromium", "/usr/bin/chromium-browser"];
            for path in &docker_paths {
                if Path::new(path).exists() {
                    return Some(PathBuf::from(path));
                }
            }
        }

        if cfg!(target_os = "macos") {
            let macos_paths = [
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/opt/homebrew/bin/chromium",
                "/usr/local/bin/chromium",
            ];
            for path in &macos_paths {
                let path_buf = PathBuf::from(path);
                if path_buf.exists() {
                    return Some(path_buf);
                }
            }
        }

        let system_paths = [
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/local/bin/chromium",
            "/usr/local/bin/chromium-browser",
            "/opt/chromium/chromium",
            "/usr/bin/google-chrome",
        ];
        for path in &system_paths {
            if Path::new(path).exists() {
                return Some(PathBuf::from(path));
            }
        }

        which("chromium")
            .or_else(|_| which("chromium-browser"))
            .or_else(|_| which("google-chrome"))
            .ok()
    }

    fn build_browser_config(
        chrome_path: Option<PathBuf>,
        user_data_dir: &Path,
        headless: bool,
    ) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder();

        if let Some(path) = chrome_path {
            info!("Configuring browser with Chromium at {:?}", path);
            builder = builder.chrome_executable(path);
        }

        let is_docker = Self::is_docker();

        // Headless is forced inside containers, configurable otherwise.
        if headless || is_docker {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }

        if is_docker || !cfg!(target_os = "macos") {
            builder = builder.arg("--no-sandbox").arg("--disable-dev-shm-usage");
        }

        builder = builder
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--log-level=3")
            .arg("--disable-sync")
            .arg("--disable-default-apps")
            .arg("--disable-background-timer-throttling")
            .arg("--disable-renderer-backgrounding")
            .arg("--window-size=1280,900")
            .arg(format!("--user-data-dir={}", user_data_dir.display()));

        builder
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))
    }

    /// Run `operation` on a fresh page, closing the page even on error.
    pub async fn with_page<F, R>(&self, url: &str, operation: F) -> Result<R>
    where
        F: for<'a> FnOnce(&'a Page) -> BoxFuture<'a, Result<R>>,
    {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| anyhow!("Browser not initialized"))?;
        let page = browser.new_page(url).await?;

        let result = operation(&page).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }
        result
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(browser) = self.browser.take() {
            info!("Shutting down browser instance");
            if let Some(handler_task) = self.handler_task.take() {
                let _ = tokio::time::timeout(Duration::from_secs(2), handler_task).await;
            }
            drop(browser);
            info!("Browser instance shut down");
        }
        Ok(())
    }
}

impl Drop for BrowserClient {
    fn drop(&mut self) {
        if let Some(_browser) = self.browser.take() {
            debug!("Closing browser");
        }
        // Handler task ends when the browser closes.
    }
}
