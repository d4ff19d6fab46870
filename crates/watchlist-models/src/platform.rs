use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Streaming platforms with a scrapeable watchlist page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    Netflix,
    PrimeVideo,
    Hulu,
    DisneyPlus,
    AppleTv,
    Max,
    Peacock,
    ParamountPlus,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Netflix,
        Platform::PrimeVideo,
        Platform::Hulu,
        Platform::DisneyPlus,
        Platform::AppleTv,
        Platform::Max,
        Platform::Peacock,
        Platform::ParamountPlus,
    ];

    /// Stable identifier used in CLI args and export filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Netflix => "netflix",
            Platform::PrimeVideo => "amazon",
            Platform::Hulu => "hulu",
            Platform::DisneyPlus => "disney",
            Platform::AppleTv => "appletv",
            Platform::Max => "max",
            Platform::Peacock => "peacock",
            Platform::ParamountPlus => "paramount",
        }
    }

    /// Human-readable name, written into exported records.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Netflix => "Netflix",
            Platform::PrimeVideo => "Prime Video",
            Platform::Hulu => "Hulu",
            Platform::DisneyPlus => "Disney+",
            Platform::AppleTv => "Apple TV+",
            Platform::Max => "Max",
            Platform::Peacock => "Peacock",
            Platform::ParamountPlus => "Paramount+",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.slug() == slug)
            .ok_or_else(|| {
                let known: Vec<&str> = Platform::ALL.iter().map(|p| p.slug()).collect();
                format!("Unknown platform '{}'. Known platforms: {}", s, known.join(", "))
            })
    }
}
