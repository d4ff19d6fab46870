use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// One normalized watchlist entry extracted from a rendered page.
///
/// The scraped pages do not distinguish movies from shows reliably, so
/// `media_type` is the constant "Movie/Show" for every record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleRecord {
    pub title: String,
    pub media_type: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub extracted: NaiveDate,
}

impl TitleRecord {
    pub const MEDIA_TYPE: &'static str = "Movie/Show";

    pub fn new(title: impl Into<String>, platform: Platform, extracted: NaiveDate) -> Self {
        Self {
            title: title.into(),
            media_type: Self::MEDIA_TYPE.to_string(),
            platform,
            image_url: None,
            extracted,
        }
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|u| !u.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_constant_media_type() {
        let record = TitleRecord::new(
            "Severance",
            Platform::AppleTv,
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        );
        assert_eq!(record.media_type, "Movie/Show");
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_with_image_url_drops_empty() {
        let record = TitleRecord::new(
            "Dark",
            Platform::Netflix,
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        )
        .with_image_url(Some(String::new()));
        assert_eq!(record.image_url, None);
    }
}
