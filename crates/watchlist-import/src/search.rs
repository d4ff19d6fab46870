use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use watchlist_models::SearchMatch;

const SUGGESTION_BASE: &str = "https://v2.sg.media-imdb.com/suggestion";

/// Looks a title up and returns its candidate IMDB matches.
#[async_trait]
pub trait TitleSearch: Sync {
    async fn search(&self, title: &str) -> Result<Vec<SearchMatch>>;
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<SuggestionItem>,
}

#[derive(Debug, Deserialize)]
struct SuggestionItem {
    id: String,
    #[serde(rename = "l")]
    label: String,
    #[serde(rename = "y")]
    year: Option<u32>,
    #[serde(rename = "q")]
    kind: Option<String>,
}

/// Client for the unauthenticated IMDB suggestion endpoint, the same
/// one that backs the site's search box.
pub struct SuggestionClient {
    http: reqwest::Client,
}

impl SuggestionClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Suggestions are sharded by the first character of the query.
    fn suggestion_url(title: &str) -> Option<String> {
        let initial = title.chars().next()?.to_lowercase().next()?;
        Some(format!(
            "{}/{}/{}.json",
            SUGGESTION_BASE,
            initial,
            urlencoding::encode(title)
        ))
    }
}

#[async_trait]
impl TitleSearch for SuggestionClient {
    async fn search(&self, title: &str) -> Result<Vec<SearchMatch>> {
        let url = Self::suggestion_url(title)
            .ok_or_else(|| anyhow!("Cannot search for an empty title"))?;

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Suggestion request for {:?} failed: {}", title, e))?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Suggestion request for {:?} returned {}",
                title,
                response.status()
            ));
        }

        let body: SuggestionResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Suggestion response for {:?} was not JSON: {}", title, e))?;

        let matches = title_matches(body);
        debug!(title, count = matches.len(), "Suggestion search finished");
        Ok(matches)
    }
}

/// Every title entry ("tt" id) counts as a match; people and keyword
/// suggestions are dropped. The endpoint's labels often differ from the
/// scraped title, so no label comparison happens here.
fn title_matches(body: SuggestionResponse) -> Vec<SearchMatch> {
    body.d
        .into_iter()
        .filter(|item| item.id.starts_with("tt"))
        .map(|item| SearchMatch {
            id: item.id,
            title: item.label,
            year: item.year,
            kind: item.kind,
        })
        .collect()
}
