use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::Page;
use std::time::Duration;
use tracing::debug;
use watchlist_config::ScrollOptions;

/// Bounds for the scroll-until-quiescent loop.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSettings {
    /// Pause before each scroll-to-bottom.
    pub tick_interval: Duration,
    /// Pause after scrolling before re-reading the content height, so
    /// lazy loaders get a chance to append.
    pub settle_delay: Duration,
    /// Hard cap on scroll attempts.
    pub max_attempts: u32,
    /// Consecutive unchanged height readings that count as quiescence.
    pub stall_threshold: u32,
    /// Pause after scrolling back to the top, letting lazy images load.
    pub final_delay: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            settle_delay: Duration::from_millis(800),
            max_attempts: 100,
            stall_threshold: 5,
            final_delay: Duration::from_millis(500),
        }
    }
}

impl From<&ScrollOptions> for ScrollSettings {
    fn from(options: &ScrollOptions) -> Self {
        Self {
            tick_interval: Duration::from_millis(options.tick_interval_ms),
            settle_delay: Duration::from_millis(options.settle_delay_ms),
            max_attempts: options.max_attempts,
            stall_threshold: options.stall_threshold,
            final_delay: Duration::from_millis(options.final_delay_ms),
        }
    }
}

/// The scrollable thing being driven. Abstracted so the loop can be
/// tested without a browser.
#[async_trait]
pub trait ScrollSurface: Sync {
    async fn content_height(&self) -> Result<u64>;
    async fn scroll_to_bottom(&self) -> Result<()>;
    async fn scroll_to_top(&self) -> Result<()>;
}

/// Time source, injected so tests run on simulated time.
#[async_trait]
pub trait Clock: Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scrolling,
    Settling,
    Done,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollOutcome {
    pub attempts: u32,
    pub final_height: u64,
    /// True when the loop ended because the height stopped growing,
    /// false when it hit the attempt cap.
    pub quiescent: bool,
}

/// Repeatedly scrolls to the bottom until the content height stops
/// growing, then scrolls back to the top. Terminates after at most
/// `max_attempts` scrolls no matter what the page does.
pub struct Scroller {
    settings: ScrollSettings,
}

impl Scroller {
    pub fn new(settings: ScrollSettings) -> Self {
        Self { settings }
    }

    pub async fn settle<S, C>(&self, surface: &S, clock: &C) -> Result<ScrollOutcome>
    where
        S: ScrollSurface + ?Sized,
        C: Clock + ?Sized,
    {
        let mut last_height = surface.content_height().await?;
        let mut attempts = 0u32;
        let mut stalled = 0u32;
        let mut phase = Phase::Scrolling;

        loop {
            match phase {
                Phase::Scrolling => {
                    clock.sleep(self.settings.tick_interval).await;
                    surface.scroll_to_bottom().await?;
                    phase = Phase::Settling;
                }
                Phase::Settling => {
                    clock.sleep(self.settings.settle_delay).await;
                    let height = surface.content_height().await?;
                    attempts += 1;

                    if height == last_height {
                        stalled += 1;
                    } else {
                        stalled = 0;
                    }
                    debug!(attempts, height, stalled, "Scroll tick");
                    last_height = height;

                    if stalled >= self.settings.stall_threshold
                        || attempts >= self.settings.max_attempts
                    {
                        phase = Phase::Done;
                    } else {
                        phase = Phase::Scrolling;
                    }
                }
                Phase::Done => {
                    surface.scroll_to_top().await?;
                    clock.sleep(self.settings.final_delay).await;
                    return Ok(ScrollOutcome {
                        attempts,
                        final_height: last_height,
                        quiescent: stalled >= self.settings.stall_threshold,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl ScrollSurface for Page {
    async fn content_height(&self) -> Result<u64> {
        let result = self.evaluate("document.body.scrollHeight").await?;
        Ok(result
            .value()
            .and_then(|v| v.as_f64())
            .map(|h| h as u64)
            .unwrap_or(0))
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await?;
        Ok(())
    }

    async fn scroll_to_top(&self) -> Result<()> {
        self.evaluate("window.scrollTo(0, 0)").await?;
        Ok(())
    }
}
