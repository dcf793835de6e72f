//! Plain-text rendering of the digest, sent as the alternative part of the
//! email for clients that do not display HTML.

use super::DigestHeader;
use crate::models::Article;
use std::fmt::{self, Write};

/// Render `articles` as plain text.
pub fn render_text(header: &DigestHeader, articles: &[Article]) -> String {
    let mut text = String::new();
    // Formatting into a String cannot fail
    write_digest(&mut text, header, articles).map(|()| text).unwrap_or_default()
}

fn write_digest(out: &mut impl Write, header: &DigestHeader, articles: &[Article]) -> fmt::Result {
    let heading = header.heading();
    writeln!(out, "{}\n{}", heading, "=".repeat(heading.chars().count()))?;

    for article in articles {
        writeln!(out)?;
        writeln!(out, "{}", article.title)?;
        writeln!(out, "Fonte: {}", article.source)?;
        writeln!(out, "Data: {}\n", article.date)?;
        writeln!(out, "{}\n", article.content)?;
        writeln!(out, "Leggi l'articolo completo: {}", article.url)?;
        writeln!(out, "----")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_text() {
        let header = DigestHeader::new("Digest", NaiveDate::from_ymd_opt(2024, 11, 14).unwrap());
        let article = Article::new(
            "Title".into(),
            "Summary.".into(),
            "news.example".into(),
            "https://news.example/a".into(),
            "14/11/2024".into(),
        );
        let text = render_text(&header, &[article]);
        assert!(text.starts_with(&format!("Digest - 14/11/2024\n{}\n", "=".repeat(19))));
        assert!(text.contains("Fonte: news.example\n"));
        assert!(text.contains("Leggi l'articolo completo: https://news.example/a\n"));
    }

    #[test]
    fn test_render_text_article_layout() {
        let header = DigestHeader::new("Digest", NaiveDate::from_ymd_opt(2024, 11, 14).unwrap());
        let article = Article::new(
            "Title".into(),
            "Summary.".into(),
            "news.example".into(),
            "https://news.example/a".into(),
            "14/11/2024".into(),
        );
        let text = render_text(&header, &[article]);
        assert!(text.ends_with(
            "\nTitle\nFonte: news.example\nData: 14/11/2024\n\nSummary.\n\n\
             Leggi l'articolo completo: https://news.example/a\n----\n"
        ));
    }

    #[test]
    fn test_render_text_empty() {
        let header = DigestHeader::new("Digest", NaiveDate::from_ymd_opt(2024, 11, 14).unwrap());
        assert_eq!(
            render_text(&header, &[]),
            format!("Digest - 14/11/2024\n{}\n", "=".repeat(19))
        );
    }
}
