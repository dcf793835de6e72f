//! Digest rendering.
//!
//! The digest is mailed as a `multipart/alternative` message carrying two
//! renderings of the same article list:
//!
//! # Submodules
//!
//! - [`html`]: the HTML document shown by mail clients
//! - [`text`]: the plain-text fallback
//!
//! Both start with the same heading, `"<digest title> - DD/MM/YYYY"`, which
//! is also used as the email subject.

pub mod html;
pub mod text;

use crate::models::{Article, DISPLAY_DATE_FORMAT};
use chrono::NaiveDate;

/// Title and date shown at the top of a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestHeader {
    pub title: String,
    pub date: NaiveDate,
}

impl DigestHeader {
    pub fn new(title: &str, date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            date,
        }
    }

    /// `"<title> - DD/MM/YYYY"`.
    pub fn heading(&self) -> String {
        format!("{} - {}", self.title, self.date.format(DISPLAY_DATE_FORMAT))
    }
}

/// Renders a list of articles into the digest bodies.
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    header: DigestHeader,
}

impl DigestFormatter {
    pub fn new(header: DigestHeader) -> Self {
        Self { header }
    }

    /// Email subject line.
    pub fn subject(&self) -> String {
        self.header.heading()
    }

    /// HTML document for `articles`.
    pub fn format(&self, articles: &[Article]) -> String {
        html::render_html(&self.header, articles)
    }

    /// Plain-text rendering of `articles`.
    pub fn format_text(&self, articles: &[Article]) -> String {
        text::render_text(&self.header, articles)
    }
}
