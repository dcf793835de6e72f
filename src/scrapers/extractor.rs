//! Same-day article extraction from a listing page.
//!
//! Extraction runs in two phases, mirroring how the page is used:
//!
//! 1. **Scanning**: parse the listing page, walk the article blocks chosen by
//!    the [`ExtractionStrategy`] and keep those dated on the reference day
//!    that have a title and a link ([`scan_listing`]).
//! 2. **Fetching**: download each kept article, take its paragraph text and
//!    summarize it. Articles that end up without a summary are dropped.
//!
//! Pages and articles are processed strictly one at a time.

use super::fetch::{paragraph_text, PageFetcher};
use super::strategy::{descendants, ExtractionStrategy};
use crate::dates::{find_date_in_text, parse_date};
use crate::models::{source_domain, Article, DISPLAY_DATE_FORMAT};
use crate::summarize::summarize;
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

static TITLES: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3").unwrap());
static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// An article block that passed the date, title and link checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: Url,
    pub date: NaiveDate,
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Resolve the publication date of an article block.
///
/// Date elements proposed by the strategy are tried first, each one's whole
/// trimmed text parsed as a date. Failing that, the block's full text is
/// searched for date-shaped substrings.
pub fn block_date(block: ElementRef<'_>, strategy: &dyn ExtractionStrategy) -> Option<NaiveDate> {
    strategy
        .date_elements(block)
        .into_iter()
        .map(element_text)
        .filter(|text| !text.trim().is_empty())
        .find_map(|text| parse_date(&text))
        .or_else(|| find_date_in_text(&element_text(block)))
}

/// Scan a listing page for blocks published on `reference_date`.
///
/// Blocks are skipped when they carry no date or another date, have no
/// `h1`/`h2`/`h3`, repeat a title already seen on this page, or have no
/// resolvable link.
pub fn scan_listing(
    page_html: &str,
    base_url: &Url,
    strategy: &dyn ExtractionStrategy,
    reference_date: NaiveDate,
) -> Vec<Candidate> {
    let document = Html::parse_document(page_html);
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for block in strategy.article_blocks(&document) {
        match block_date(block, strategy) {
            Some(date) if date == reference_date => {}
            _ => continue,
        }

        let Some(title_element) = descendants(block, &TITLES).into_iter().next() else {
            continue;
        };
        let title = element_text(title_element).trim().to_string();
        if !seen_titles.insert(title.clone()) {
            debug!(%title, "Skipping duplicate title");
            continue;
        }

        let Some(href) = descendants(block, &LINKS)
            .into_iter()
            .find_map(|a| a.value().attr("href"))
        else {
            continue;
        };
        match base_url.join(href) {
            Ok(url) => candidates.push(Candidate {
                title,
                url,
                date: reference_date,
            }),
            Err(e) => debug!(%href, error = %e, "Unresolvable article link"),
        }
    }

    candidates
}

/// Turns listing pages into summarized [`Article`]s dated on a reference day.
#[derive(Debug)]
pub struct ArticleExtractor<'f, F> {
    fetcher: &'f F,
    reference_date: NaiveDate,
}

impl<'f, F: PageFetcher> ArticleExtractor<'f, F> {
    pub fn new(fetcher: &'f F, reference_date: NaiveDate) -> Self {
        Self {
            fetcher,
            reference_date,
        }
    }

    /// Extract today's articles from an already downloaded listing page.
    #[instrument(level = "info", skip_all, fields(base_url = %base_url))]
    pub async fn extract(
        &self,
        page_html: &str,
        base_url: &Url,
        strategy: &dyn ExtractionStrategy,
    ) -> Vec<Article> {
        let candidates = scan_listing(page_html, base_url, strategy, self.reference_date);
        debug!(count = candidates.len(), "Same-day candidates on listing");
        let source = source_domain(base_url);

        stream::iter(candidates)
            .then(|candidate| {
                let source = source.clone();
                async move {
                    let content = self.article_summary(candidate.url.as_str()).await;
                    if candidate.title.is_empty() || content.is_empty() {
                        warn!(url = %candidate.url, "Article has no title or no content; skipping");
                        return None;
                    }
                    Some(Article::new(
                        candidate.title,
                        content,
                        source,
                        candidate.url.to_string(),
                        candidate.date.format(DISPLAY_DATE_FORMAT).to_string(),
                    ))
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await
    }

    /// Fetch and extract one listing page.
    ///
    /// Any failure is logged and yields no articles, so one broken page
    /// never aborts a run.
    #[instrument(level = "info", skip(self, strategy))]
    pub async fn extract_from_url(&self, url: &str, strategy: &dyn ExtractionStrategy) -> Vec<Article> {
        match self.try_extract_from_url(url, strategy).await {
            Ok(articles) => {
                info!(count = articles.len(), "Extracted articles");
                articles
            }
            Err(e) => {
                error!(error = %e, "Failed to process page");
                Vec::new()
            }
        }
    }

    async fn try_extract_from_url(
        &self,
        url: &str,
        strategy: &dyn ExtractionStrategy,
    ) -> Result<Vec<Article>, Box<dyn Error>> {
        let base_url = Url::parse(url)?;
        let html = self.fetcher.fetch(url).await?;
        Ok(self.extract(&html, &base_url, strategy).await)
    }

    /// Summary of the article at `url`; empty when the fetch fails.
    async fn article_summary(&self, url: &str) -> String {
        match self.fetcher.fetch(url).await {
            Ok(html) => {
                let text = paragraph_text(&html);
                debug!(%url, preview = %truncate_for_log(&text, 120), "Fetched article body");
                summarize(&text)
            }
            Err(e) => {
                warn!(%url, error = %e, "Failed to fetch article content");
                String::new()
            }
        }
    }
}
