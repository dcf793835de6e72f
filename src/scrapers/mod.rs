//! Scraping of monitored news pages.
//!
//! Every monitored URL is a listing page (a homepage, a press corner, a
//! section front). Scraping one follows a two-phase pattern:
//!
//! 1. **Scanning**: find the article blocks on the listing page, keep those
//!    published on the reference day
//! 2. **Fetching**: download each kept article and summarize its text
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`strategy`] | Where article blocks and dates live on a page (heuristic or per-site selectors) |
//! | [`fetch`] | HTTP client with a browser user agent; paragraph text of article pages |
//! | [`extractor`] | The two phases above, producing [`crate::models::Article`]s |
//!
//! Failures are contained: a page that cannot be fetched or parsed yields no
//! articles, and an article whose body cannot be fetched is dropped.

pub mod extractor;
pub mod fetch;
pub mod strategy;

pub use extractor::ArticleExtractor;
pub use fetch::{HttpFetcher, PageFetcher};
pub use strategy::{strategy_for, SiteRule};
