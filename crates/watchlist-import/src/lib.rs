pub mod list;
pub mod progress;
pub mod search;
pub mod token;

use std::time::Duration;
use tracing::{info, warn};
use watchlist_config::ImportOptions;
use watchlist_models::ImportReport;

pub use list::{is_list_edit_url, list_id_from_url, ImdbListEditor, ListMutator};
pub use progress::ProgressTracker;
pub use search::{SuggestionClient, TitleSearch};
pub use token::{discover_token, TokenSource, ADD_FORM_FIELD};

/// Politeness pauses so the import does not hammer imdb.com.
#[derive(Debug, Clone, Copy)]
pub struct ImportDelays {
    /// After each successful add.
    pub after_add: Duration,
    /// Between titles.
    pub between_titles: Duration,
}

impl Default for ImportDelays {
    fn default() -> Self {
        Self {
            after_add: Duration::from_millis(1000),
            between_titles: Duration::from_millis(2000),
        }
    }
}

impl From<&ImportOptions> for ImportDelays {
    fn from(options: &ImportOptions) -> Self {
        Self {
            after_add: Duration::from_millis(options.add_delay_ms),
            between_titles: Duration::from_millis(options.title_delay_ms),
        }
    }
}

/// Search each title and add every match to the list, sequentially.
///
/// One failed title never aborts the run: it is counted, logged and the
/// loop moves on. A title counts as processed once it has at least one
/// match; each match that lands counts toward `added` individually.
pub async fn run_import<S, M>(
    titles: &[String],
    search: &S,
    list: &M,
    delays: ImportDelays,
) -> ImportReport
where
    S: TitleSearch + ?Sized,
    M: ListMutator + ?Sized,
{
    let mut report = ImportReport::new(titles.len());
    let mut progress = ProgressTracker::new(titles.len(), 10);

    for (idx, title) in titles.iter().enumerate() {
        let matches = match search.search(title).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(%title, error = %e, "Search failed, skipping title");
                report.failed += 1;
                report.errors.push(format!("{}: {}", title, e));
                progress.record_failed();
                progress.log_progress(idx + 1);
                continue;
            }
        };

        if matches.is_empty() {
            warn!(%title, "No matches found");
            report.failed += 1;
            report.errors.push(format!("{}: no matches found", title));
            progress.record_failed();
            progress.log_progress(idx + 1);
            continue;
        }

        report.processed += 1;
        for matched in &matches {
            match list.add(&matched.id).await {
                Ok(()) => {
                    info!(%title, id = %matched.id, year = ?matched.year, "Added to list");
                    report.added += 1;
                    progress.record_added();
                }
                Err(e) => {
                    warn!(%title, id = %matched.id, error = %e, "Add failed");
                    report.errors.push(format!("{} ({}): {}", title, matched.id, e));
                }
            }
            // Rejections are paced too; a run of failures must not hit
            // the endpoint any faster than successes do.
            tokio::time::sleep(delays.after_add).await;
        }

        progress.log_progress(idx + 1);
        if idx + 1 < titles.len() {
            tokio::time::sleep(delays.between_titles).await;
        }
    }

    progress.log_summary("List import");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use watchlist_models::SearchMatch;

    struct FakeSearch {
        results: HashMap<String, Vec<SearchMatch>>,
        fail_on: Option<String>,
    }

    impl FakeSearch {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
                fail_on: None,
            }
        }

        fn with(mut self, title: &str, ids: &[&str]) -> Self {
            let matches = ids
                .iter()
                .map(|id| SearchMatch {
                    id: id.to_string(),
                    title: title.to_string(),
                    year: None,
                    kind: None,
                })
                .collect();
            self.results.insert(title.to_string(), matches);
            self
        }
    }

    #[async_trait]
    impl TitleSearch for FakeSearch {
        async fn search(&self, title: &str) -> Result<Vec<SearchMatch>> {
            if self.fail_on.as_deref() == Some(title) {
                return Err(anyhow!("simulated outage"));
            }
            Ok(self.results.get(title).cloned().unwrap_or_default())
        }
    }

    struct FakeList {
        adds: Mutex<Vec<String>>,
        reject: Vec<String>,
    }

    impl FakeList {
        fn new() -> Self {
            Self {
                adds: Mutex::new(Vec::new()),
                reject: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ListMutator for FakeList {
        async fn add(&self, const_id: &str) -> Result<()> {
            if self.reject.iter().any(|id| id == const_id) {
                return Err(anyhow!("403 Forbidden"));
            }
            self.adds.lock().unwrap().push(const_id.to_string());
            Ok(())
        }
    }

    fn no_delays() -> ImportDelays {
        ImportDelays {
            after_add: Duration::ZERO,
            between_titles: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_every_match_counts_toward_added() {
        // A title naming both a movie and a show adds two entries but
        // counts as one processed title.
        let search = FakeSearch::new().with("Fargo", &["tt2802850", "tt0116282"]);
        let list = FakeList::new();
        let titles = vec!["Fargo".to_string()];

        let report = run_import(&titles, &search, &list, no_delays()).await;

        assert_eq!(report.total, 1);
        assert_eq!(report.processed, 1);
        assert_eq!(report.added, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(
            *list.adds.lock().unwrap(),
            vec!["tt2802850".to_string(), "tt0116282".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_matches_counts_as_failed() {
        let search = FakeSearch::new();
        let list = FakeList::new();
        let titles = vec!["Completely Made Up Show 9000".to_string()];

        let report = run_import(&titles, &search, &list, no_delays()).await;

        assert_eq!(report.processed, 0);
        assert_eq!(report.added, 0);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("no matches"));
    }

    #[tokio::test]
    async fn test_search_error_does_not_abort_the_run() {
        let mut search = FakeSearch::new()
            .with("Dark", &["tt5753856"])
            .with("Ozark", &["tt5071412"]);
        search.fail_on = Some("Dark".to_string());
        let list = FakeList::new();
        let titles = vec!["Dark".to_string(), "Ozark".to_string()];

        let report = run_import(&titles, &search, &list, no_delays()).await;

        assert_eq!(report.total, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(*list.adds.lock().unwrap(), vec!["tt5071412".to_string()]);
    }

    #[tokio::test]
    async fn test_add_failure_still_counts_the_title_as_processed() {
        let search = FakeSearch::new().with("Fargo", &["tt2802850", "tt0116282"]);
        let mut list = FakeList::new();
        list.reject = vec!["tt2802850".to_string()];
        let titles = vec!["Fargo".to_string()];

        let report = run_import(&titles, &search, &list, no_delays()).await;

        assert_eq!(report.processed, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(*list.adds.lock().unwrap(), vec!["tt0116282".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_adds_are_still_paced() {
        let search = FakeSearch::new().with("Fargo", &["tt2802850", "tt0116282"]);
        let mut list = FakeList::new();
        list.reject = vec!["tt2802850".to_string(), "tt0116282".to_string()];
        let titles = vec!["Fargo".to_string()];
        let delays = ImportDelays {
            after_add: Duration::from_millis(1000),
            between_titles: Duration::ZERO,
        };

        let start = tokio::time::Instant::now();
        let report = run_import(&titles, &search, &list, delays).await;

        assert_eq!(report.added, 0);
        assert_eq!(report.errors.len(), 2);
        // Both rejected attempts still pay the after-add pause.
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_empty_input_yields_an_empty_report() {
        let search = FakeSearch::new();
        let list = FakeList::new();

        let report = run_import(&[], &search, &list, no_delays()).await;

        assert_eq!(report.total, 0);
        assert_eq!(report.processed, 0);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_delays_come_from_config_options() {
        let options = ImportOptions::default();
        let delays = ImportDelays::from(&options);
        assert_eq!(delays.after_add, Duration::from_millis(1000));
        assert_eq!(delays.between_titles, Duration::from_millis(2000));
    }
}
