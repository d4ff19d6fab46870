use crate::output::{Output, OutputFormat};
use color_eyre::eyre::{eyre, Result};
use std::path::PathBuf;
use watchlist_config::{Config, PathManager};
use watchlist_csv::parse_titles;
use watchlist_import::{
    discover_token, is_list_edit_url, list_id_from_url, run_import as import_titles,
    ImdbListEditor, ImportDelays, SuggestionClient,
};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub async fn run_import(
    csv: PathBuf,
    list_url: Option<String>,
    cookie: Option<String>,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::new().map_err(|e| eyre!("{}", e))?;
    let config = Config::load(&paths.config_file()).map_err(|e| eyre!("{}", e))?;

    let csv_text = tokio::fs::read_to_string(&csv)
        .await
        .map_err(|e| eyre!("Failed to read {}: {}", csv.display(), e))?;
    let titles = parse_titles(&csv_text);
    if titles.is_empty() {
        output.warn(format!("No titles found in {}", csv.display()));
        return Ok(());
    }
    output.info(format!(
        "Found {} titles in {}",
        titles.len(),
        csv.display()
    ));

    let list_url = list_url
        .or_else(|| config.import.list_url.clone())
        .ok_or_else(|| eyre!("No list URL; pass --list-url or set import.list_url in the config"))?;
    if !is_list_edit_url(&list_url) {
        output.warn(format!(
            "{} does not look like a list edit page (expected …/list/ls…/edit); token discovery may fail",
            list_url
        ));
    }
    let list_id = list_id_from_url(&list_url).map_err(|e| eyre!("{}", e))?;

    let cookie = match cookie.or_else(|| config.import.cookie.clone()) {
        Some(cookie) => cookie,
        None => rpassword::prompt_password("imdb.com session cookie: ")?,
    };

    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    // The add form's CSRF token lives on the list-edit page.
    let page_html = http
        .get(&list_url)
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let token = match discover_token(&page_html, &cookie) {
        Some((token, source)) => {
            output.info(format!("Using the token from the {}", source.as_str()));
            Some(token)
        }
        None => {
            output.warn(format!(
                "No CSRF token found on {}; submitting adds without one (they may be rejected)",
                list_url
            ));
            None
        }
    };

    let search = SuggestionClient::new(http.clone());
    let editor = ImdbListEditor::new(http, list_id, token, cookie);
    let delays = ImportDelays::from(&config.import);

    let report = import_titles(&titles, &search, &editor, delays).await;

    match output.format() {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&report)?);
        }
        OutputFormat::Human => {
            output.info(format!(
                "Processed {}/{} titles",
                report.processed, report.total
            ));
            output.success(format!("Added {} entries to the list", report.added));
            if report.failed > 0 {
                output.warn(format!("{} titles could not be imported:", report.failed));
            }
            for error in &report.errors {
                output.warn(format!("  {}", error));
            }
        }
    }

    if report.added == 0 && report.total > 0 {
        return Err(eyre!("Nothing was added to the list"));
    }
    Ok(())
}
