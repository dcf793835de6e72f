//! HTML rendering of the digest.
//!
//! Scraped fields are untrusted: titles, sources, summaries and URLs are
//! escaped before being placed in the document.

use super::DigestHeader;
use crate::models::Article;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::{self, Write};

/// Render `articles` as a complete HTML document.
///
/// An empty list still yields a valid document with the heading and no
/// article sections.
pub fn render_html(header: &DigestHeader, articles: &[Article]) -> String {
    let mut html = String::new();
    // Formatting into a String cannot fail
    write_document(&mut html, header, articles).map(|()| html).unwrap_or_default()
}

fn write_document(out: &mut impl Write, header: &DigestHeader, articles: &[Article]) -> fmt::Result {
    let heading = encode_text(&header.heading()).into_owned();

    writeln!(out, "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", heading)?;
    writeln!(out, "</head>\n<body>")?;
    writeln!(out, "<h1>{}</h1>\n<hr>", heading)?;

    for article in articles {
        writeln!(out, "<h2>{}</h2>", encode_text(&article.title))?;
        writeln!(out, "<p><strong>Fonte:</strong> {}</p>", encode_text(&article.source))?;
        writeln!(out, "<p><strong>Data:</strong> {}</p>", encode_text(&article.date))?;
        writeln!(out, "<p>{}</p>", encode_text(&article.content))?;
        writeln!(
            out,
            "<p><a href=\"{}\">Leggi l'articolo completo</a></p>\n<hr>",
            encode_double_quoted_attribute(&article.url)
        )?;
    }

    writeln!(out, "</body>\n</html>")
}
