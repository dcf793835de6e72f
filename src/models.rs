//! Data models for scraped articles.
//!
//! This module defines the core data structure used throughout the application:
//! - [`Article`]: a same-day article found on one of the monitored pages,
//!   already summarized and ready to be rendered into the digest.
//!
//! Articles are built fresh on every run and never mutated afterwards. The
//! only thing that outlives a run is the [`Article::id`], which is persisted
//! by [`crate::history::HistoryStore`] once the digest has been delivered.

use sha2::{Digest, Sha256};
use url::Url;

/// Format used for [`Article::date`] and the digest heading.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// A same-day news article extracted from a monitored page.
///
/// # Identity
///
/// Two articles are considered the same when their `id` matches. The id is
/// derived from `source` and `title` with [`article_id`], so it is stable
/// across runs and processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The headline as it appears on the listing page.
    pub title: String,
    /// Short extract of the article body (see [`crate::summarize`]).
    pub content: String,
    /// Host of the listing page the article was found on.
    pub source: String,
    /// Absolute URL of the full article.
    pub url: String,
    /// Publication date formatted as `DD/MM/YYYY`.
    pub date: String,
    /// Deterministic identifier, `<source>-<digest>`.
    pub id: String,
}

impl Article {
    /// Build an article, deriving its id from `source` and `title`.
    pub fn new(title: String, content: String, source: String, url: String, date: String) -> Self {
        let id = article_id(&source, &title);
        Self {
            title,
            content,
            source,
            url,
            date,
            id,
        }
    }
}

/// Derive the stable identifier of an article.
///
/// The id is the source followed by the first 16 hex digits of the SHA-256
/// of `source` and `title` separated by a newline.
pub fn article_id(source: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"\n");
    hasher.update(title.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", source, &digest[..16])
}

/// Extract the network location (host and optional port) of a URL.
/// For example: "https://ec.europa.eu/commission" -> "ec.europa.eu"
pub fn source_domain(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_id_is_deterministic() {
        let a = article_id("ec.europa.eu", "Commission adopts new rules");
        let b = article_id("ec.europa.eu", "Commission adopts new rules");
        assert_eq!(a, b);
        assert!(a.starts_with("ec.europa.eu-"));
        assert_eq!(a.len(), "ec.europa.eu-".len() + 16);
    }

    #[test]
    fn test_article_id_depends_on_source_and_title() {
        let base = article_id("a.example", "Title");
        assert_ne!(base, article_id("b.example", "Title"));
        assert_ne!(base, article_id("a.example", "Title!"));
    }

    #[test]
    fn test_article_new_sets_id() {
        let article = Article::new(
            "Headline".into(),
            "Body.".into(),
            "news.example".into(),
            "https://news.example/a".into(),
            "14/11/2024".into(),
        );
        assert_eq!(article.id, article_id("news.example", "Headline"));
    }

    #[test]
    fn test_source_domain() {
        let url = Url::parse("https://ec.europa.eu/commission/presscorner/home/en").unwrap();
        assert_eq!(source_domain(&url), "ec.europa.eu");

        let url = Url::parse("http://127.0.0.1:8080/news").unwrap();
        assert_eq!(source_domain(&url), "127.0.0.1:8080");
    }
}
