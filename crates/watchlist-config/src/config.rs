use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool configuration. Every field defaults, so a missing config file
/// yields a fully working setup.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportOptions,
    #[serde(default)]
    pub scroll: ScrollOptions,
    #[serde(default)]
    pub browser: BrowserOptions,
    #[serde(default)]
    pub import: ImportOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Default CSV schema: "simple", "full", or "imdb-list".
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory exported files land in. Defaults to the working directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Bounds for the scroll-and-settle loop that forces lazy content to render.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrollOptions {
    #[serde(default = "default_tick_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_stall_threshold")]
    pub stall_threshold: u32,
    #[serde(default = "default_final_delay_ms")]
    pub final_delay_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Headless works only when the streaming session in the persistent
    /// profile is already logged in; headful allows logging in on the fly.
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Explicit Chromium executable; discovered automatically when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
    /// Seconds to wait after opening the watchlist page before scrolling,
    /// so a headful user can finish logging in.
    #[serde(default = "default_page_grace_secs")]
    pub page_grace_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportOptions {
    /// IMDB list-edit page URL, e.g. https://www.imdb.com/list/ls0000/edit
    #[serde(default)]
    pub list_url: Option<String>,
    /// Session cookie header for imdb.com; prompted for when unset.
    #[serde(default)]
    pub cookie: Option<String>,
    /// Pause after each add-to-list submission.
    #[serde(default = "default_add_delay_ms")]
    pub add_delay_ms: u64,
    /// Slightly longer pause between titles.
    #[serde(default = "default_title_delay_ms")]
    pub title_delay_ms: u64,
}

fn default_format() -> String {
    "simple".to_string()
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    800
}

fn default_max_attempts() -> u32 {
    100
}

fn default_stall_threshold() -> u32 {
    5
}

fn default_final_delay_ms() -> u64 {
    500
}

fn default_headless() -> bool {
    false
}

fn default_page_grace_secs() -> u64 {
    5
}

fn default_add_delay_ms() -> u64 {
    1000
}

fn default_title_delay_ms() -> u64 {
    2000
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_dir: None,
        }
    }
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_ms(),
            settle_delay_ms: default_settle_ms(),
            max_attempts: default_max_attempts(),
            stall_threshold: default_stall_threshold(),
            final_delay_ms: default_final_delay_ms(),
        }
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            page_grace_secs: default_page_grace_secs(),
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            list_url: None,
            cookie: None,
            add_delay_ms: default_add_delay_ms(),
            title_delay_ms: default_title_delay_ms(),
        }
    }
}

impl Config {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/watchport.toml")).unwrap();
        assert_eq!(config.scroll.stall_threshold, 5);
        assert_eq!(config.scroll.max_attempts, 100);
        assert_eq!(config.export.format, "simple");
        assert_eq!(config.import.add_delay_ms, 1000);
        assert!(config.import.title_delay_ms > config.import.add_delay_ms);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scroll]\nstall_threshold = 3\n\n[browser]\nheadless = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scroll.stall_threshold, 3);
        assert_eq!(config.scroll.tick_interval_ms, 1000);
        assert!(config.browser.headless);
        assert!(config.import.cookie.is_none());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let text = toml::to_string(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.scroll.tick_interval_ms, 1000);
        assert_eq!(parsed.scroll.settle_delay_ms, 800);
        assert_eq!(parsed.export.format, "simple");
        assert_eq!(parsed.import.title_delay_ms, 2000);
        assert!(!parsed.browser.headless);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not toml [").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
