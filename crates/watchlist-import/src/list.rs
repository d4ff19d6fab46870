use crate::token::ADD_FORM_FIELD;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Adds single titles to a list. Abstracted so the import loop can be
/// tested without touching imdb.com.
#[async_trait]
pub trait ListMutator: Sync {
    async fn add(&self, const_id: &str) -> Result<()>;
}

/// Submits adds against one IMDB list using a session cookie and the
/// CSRF token scraped from the list-edit page. A missing token degrades
/// to tokenless submissions rather than refusing to try.
pub struct ImdbListEditor {
    http: reqwest::Client,
    list_id: String,
    token: Option<String>,
    cookie: String,
}

impl ImdbListEditor {
    pub fn new(
        http: reqwest::Client,
        list_id: String,
        token: Option<String>,
        cookie: String,
    ) -> Self {
        Self {
            http,
            list_id,
            token,
            cookie,
        }
    }
}

#[async_trait]
impl ListMutator for ImdbListEditor {
    async fn add(&self, const_id: &str) -> Result<()> {
        let url = format!(
            "https://www.imdb.com/list/{}/{}/add",
            self.list_id, const_id
        );
        debug!(%url, "Submitting list add");

        let mut request = self
            .http
            .post(&url)
            .header(reqwest::header::COOKIE, &self.cookie);
        if let Some(token) = &self.token {
            request = request.form(&[(ADD_FORM_FIELD, token.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Add request for {} failed: {}", const_id, e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Add request for {} returned {}",
                const_id,
                response.status()
            ));
        }
        Ok(())
    }
}

/// Pull the `ls…` list id out of a list URL.
pub fn list_id_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid list URL {:?}: {}", url, e))?;
    let mut segments = parsed
        .path_segments()
        .ok_or_else(|| anyhow!("List URL {:?} has no path", url))?;

    segments
        .find(|s| s.starts_with("ls") && s.len() > 2 && s[2..].chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No list id (ls…) found in URL {:?}", url))
}

/// True for imdb.com list pages in edit mode, where the add form and
/// its token live. Edit mode shows up either as an `/edit` path segment
/// or as an `edit` query parameter.
pub fn is_list_edit_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let on_imdb = host == "imdb.com" || host.ends_with(".imdb.com");
    let path = parsed.path();
    let edit_path = path.ends_with("/edit") || path.contains("/edit/");
    let edit_query = parsed.query_pairs().any(|(key, _)| key == "edit");
    on_imdb && path.contains("/list/") && (edit_path || edit_query)
}
