//! One complete digest run.
//!
//! 1. **Loading**: read the monitored URLs from the links document
//! 2. **Extracting**: scrape each URL in turn for same-day articles
//! 3. **Filtering**: drop articles already delivered in earlier runs
//! 4. **Delivering**: mail (or, on a dry run, log) the digest
//! 5. **Remembering**: record the delivered ids in the history
//!
//! Ids are only recorded after the mail server accepted the digest, so a
//! failed delivery is retried by the next run.

use crate::config::AppConfig;
use crate::history::HistoryStore;
use crate::links::load_urls;
use crate::mailer::{DeliveryOutcome, MailTransport, Mailer};
use crate::models::Article;
use crate::scrapers::{strategy_for, ArticleExtractor, PageFetcher};
use std::error::Error;
use tracing::{error, info, instrument};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Monitored URLs read from the links document.
    pub urls: usize,
    /// Same-day articles found across all URLs.
    pub found: usize,
    /// Articles not delivered before.
    pub new: usize,
    pub delivery: DeliveryOutcome,
}

/// Drives a run over the configured pages.
#[derive(Debug)]
pub struct Orchestrator<'a, F, T> {
    config: &'a AppConfig,
    fetcher: &'a F,
    mailer: &'a Mailer<T>,
    history: HistoryStore,
}

impl<'a, F: PageFetcher, T: MailTransport> Orchestrator<'a, F, T> {
    pub fn new(config: &'a AppConfig, fetcher: &'a F, mailer: &'a Mailer<T>) -> Self {
        Self {
            config,
            fetcher,
            mailer,
            history: HistoryStore::new(&config.history_path, config.history_limit),
        }
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Only when the links document cannot be read; every other failure is
    /// logged and contained.
    #[instrument(level = "info", skip_all, fields(reference_date = %self.config.reference_date))]
    pub async fn run(&self) -> Result<RunSummary, Box<dyn Error>> {
        let urls = load_urls(&self.config.links_path).await?;
        info!(count = urls.len(), "Total URLs found");

        let articles = self.collect(&urls).await;
        let fresh = self.history.filter_new(articles.clone()).await;
        info!(found = articles.len(), new = fresh.len(), "Filtered against history");

        let delivery = self.deliver(&fresh).await;

        Ok(RunSummary {
            urls: urls.len(),
            found: articles.len(),
            new: fresh.len(),
            delivery,
        })
    }

    /// Extract articles from every URL, one page at a time.
    async fn collect(&self, urls: &[String]) -> Vec<Article> {
        let extractor = ArticleExtractor::new(self.fetcher, self.config.reference_date);
        let mut all = Vec::new();

        for (i, url) in urls.iter().enumerate() {
            info!(%url, index = i + 1, total = urls.len(), "Processing page");
            let strategy = match strategy_for(url, &self.config.sites) {
                Ok(strategy) => strategy,
                Err(e) => {
                    error!(%url, error = %e, "Invalid site configuration; skipping page");
                    continue;
                }
            };
            let articles = extractor.extract_from_url(url, strategy.as_ref()).await;
            info!(%url, count = articles.len(), "Articles found for page");
            all.extend(articles);
        }
        all
    }

    /// Deliver the digest and remember what was delivered.
    async fn deliver(&self, fresh: &[Article]) -> DeliveryOutcome {
        if fresh.is_empty() {
            info!("No new articles found");
            return DeliveryOutcome::Skipped;
        }

        if self.config.dry_run {
            let preview = self.mailer.formatter().format_text(fresh);
            info!(articles = fresh.len(), "Dry run; digest not sent\n{}", preview);
            return DeliveryOutcome::Previewed;
        }

        let outcome = self.mailer.send(fresh).await;
        if outcome == DeliveryOutcome::Sent {
            let ids: Vec<String> = fresh.iter().map(|a| a.id.clone()).collect();
            if let Err(e) = self.history.save(&ids).await {
                error!(error = %e, path = %self.history.path().display(), "Failed to save history");
            }
        } else {
            info!(%outcome, "Digest not delivered; history left unchanged");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::FileConfig;
    use crate::mailer::tests::{formatter, RecordingTransport};
    use crate::scrapers::extractor::tests::{today, StaticFetcher, BODY, LISTING};
    use clap::Parser;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(dir: &Path, dry_run: bool) -> AppConfig {
        let links = dir.join("links.txt");
        std::fs::write(
            &links,
            "https://news.example/home\nnot a link\nhttps://down.example/\n",
        )
        .unwrap();
        let mut args = vec![
            "news_digest".to_string(),
            "--links".to_string(),
            links.display().to_string(),
            "--history-file".to_string(),
            dir.join("history.json").display().to_string(),
        ];
        if dry_run {
            args.push("--dry-run".to_string());
        }
        let cli = Cli::parse_from(args);
        AppConfig::resolve(&cli, FileConfig::default(), today())
    }

    fn fetcher() -> StaticFetcher {
        StaticFetcher::default()
            .with("https://news.example/home", LISTING)
            .with("https://news.example/news/energy", BODY)
            .with("https://other.example/trade", BODY)
    }

    fn mailer(fail: bool) -> Mailer<RecordingTransport> {
        Mailer::new(
            RecordingTransport {
                fail,
                ..Default::default()
            },
            formatter(),
            Some("sender@example.org".into()),
            Some("me@example.org".into()),
        )
    }

    #[tokio::test]
    async fn test_run_sends_then_remembers() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), false);
        let fetcher = fetcher();
        let mailer = mailer(false);
        let orchestrator = Orchestrator::new(&config, &fetcher, &mailer);

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                urls: 2,
                found: 2,
                new: 2,
                delivery: DeliveryOutcome::Sent,
            }
        );
        assert_eq!(HistoryStore::new(&config.history_path, 1000).load().await.len(), 2);

        // Second run: everything is known, nothing is sent
        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.found, 2);
        assert_eq!(summary.new, 0);
        assert_eq!(summary.delivery, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_articles_new() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), false);
        let fetcher = fetcher();
        let mailer = mailer(true);
        let orchestrator = Orchestrator::new(&config, &fetcher, &mailer);

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.delivery, DeliveryOutcome::Failed);
        assert!(!config.history_path.exists());

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.new, 2);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_touch_history() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), true);
        let fetcher = fetcher();
        let mailer = mailer(false);
        let orchestrator = Orchestrator::new(&config, &fetcher, &mailer);

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.delivery, DeliveryOutcome::Previewed);
        assert!(!config.history_path.exists());
    }

    #[tokio::test]
    async fn test_missing_links_document_aborts() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path(), false);
        config.links_path = dir.path().join("missing.docx");
        let fetcher = fetcher();
        let mailer = mailer(false);
        let orchestrator = Orchestrator::new(&config, &fetcher, &mailer);

        assert!(orchestrator.run().await.is_err());
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_site_rule_skips_only_that_page() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path(), true);
        config.sites = vec![crate::scrapers::SiteRule::new("down.example", Some("li[["), None)];
        let fetcher = fetcher();
        let mailer = mailer(false);
        let orchestrator = Orchestrator::new(&config, &fetcher, &mailer);

        let summary = orchestrator.run().await.unwrap();
        assert_eq!(summary.found, 2);
        assert!(!fetcher
            .requests
            .borrow()
            .iter()
            .any(|url| url.contains("down.example")));
    }
}
