//! Strategies for locating article blocks and their dates on a page.
//!
//! Most pages are handled by [`HeuristicStrategy`], which treats every
//! `article` and `div` element as a potential article and scans common
//! inline tags for a date. Sites whose markup defeats the heuristic get a
//! [`SiteRule`] with explicit CSS selectors, turned into a
//! [`SelectorStrategy`] by [`strategy_for`].

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

static ARTICLE_BLOCKS: Lazy<Selector> = Lazy::new(|| Selector::parse("article, div").unwrap());
static DATE_TAGS: Lazy<Selector> = Lazy::new(|| Selector::parse("time, span, div, p").unwrap());

/// Per-site overrides for locating articles and dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Selector matching one element per article.
    #[serde(default)]
    pub article_selector: Option<String>,
    /// Selector, relative to an article block, matching its date text.
    #[serde(default)]
    pub date_selector: Option<String>,
}

/// A [`SiteConfig`] bound to the URLs containing `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteRule {
    pub pattern: String,
    #[serde(flatten)]
    pub site: SiteConfig,
}

impl SiteRule {
    pub fn new(pattern: &str, article_selector: Option<&str>, date_selector: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_string(),
            site: SiteConfig {
                article_selector: article_selector.map(str::to_string),
                date_selector: date_selector.map(str::to_string),
            },
        }
    }

    fn matches(&self, url: &str) -> bool {
        url.contains(&self.pattern)
    }
}

/// Built-in site rules, used when the configuration file does not list any.
pub fn default_site_rules() -> Vec<SiteRule> {
    vec![SiteRule::new(
        "https://ec.europa.eu/commission/presscorner/home/en",
        Some("section.latest-news li"),
        Some("span.date"),
    )]
}

/// Find the site configuration for `url`: the first rule whose pattern is
/// contained in the URL.
pub fn site_config_for<'r>(url: &str, rules: &'r [SiteRule]) -> Option<&'r SiteConfig> {
    rules.iter().find(|rule| rule.matches(url)).map(|rule| &rule.site)
}

/// How article blocks and date candidates are found on a page.
pub trait ExtractionStrategy: fmt::Debug {
    /// Elements that each may hold one article, in document order.
    fn article_blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;

    /// Elements inside `block` whose text may be a publication date.
    fn date_elements<'a>(&self, block: ElementRef<'a>) -> Vec<ElementRef<'a>>;
}

/// Descendants of `scope` matching `selector`, excluding `scope` itself.
pub(crate) fn descendants<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope
        .select(selector)
        .filter(|el| el.id() != scope.id())
        .collect()
}

/// Generic markup heuristics, used for sites without a rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicStrategy;

impl ExtractionStrategy for HeuristicStrategy {
    fn article_blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&ARTICLE_BLOCKS).collect()
    }

    fn date_elements<'a>(&self, block: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        descendants(block, &DATE_TAGS)
    }
}

/// Explicit selectors from a [`SiteConfig`]. A selector left unset falls
/// back to the matching half of [`HeuristicStrategy`].
#[derive(Debug)]
pub struct SelectorStrategy {
    article_selector: Option<Selector>,
    date_selector: Option<Selector>,
}

fn parse_selector(raw: &str) -> Result<Selector, Box<dyn Error>> {
    Selector::parse(raw).map_err(|e| format!("invalid CSS selector {:?}: {:?}", raw, e).into())
}

impl SelectorStrategy {
    pub fn from_config(config: &SiteConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            article_selector: config.article_selector.as_deref().map(parse_selector).transpose()?,
            date_selector: config.date_selector.as_deref().map(parse_selector).transpose()?,
        })
    }
}

impl ExtractionStrategy for SelectorStrategy {
    fn article_blocks<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        match &self.article_selector {
            Some(selector) => document.select(selector).collect(),
            None => HeuristicStrategy.article_blocks(document),
        }
    }

    fn date_elements<'a>(&self, block: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match &self.date_selector {
            Some(selector) => descendants(block, selector),
            None => HeuristicStrategy.date_elements(block),
        }
    }
}

/// Pick the extraction strategy for `url`.
///
/// # Errors
///
/// Fails when the matching rule carries a selector that does not parse.
pub fn strategy_for(url: &str, rules: &[SiteRule]) -> Result<Box<dyn ExtractionStrategy>, Box<dyn Error>> {
    match site_config_for(url, rules) {
        Some(config) => Ok(Box::new(SelectorStrategy::from_config(config)?)),
        None => Ok(Box::new(HeuristicStrategy)),
    }
}
