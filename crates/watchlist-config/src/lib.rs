pub mod config;
pub mod paths;

pub use config::{BrowserOptions, Config, ExportOptions, ImportOptions, ScrollOptions};
pub use paths::PathManager;
