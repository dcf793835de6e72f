//! Reading the list of monitored pages.
//!
//! The list is kept in a word-processor document: every paragraph whose
//! trimmed text starts with `http` is a page to monitor. `.docx` files are
//! read directly (zip archive, `word/document.xml`); any other file is read
//! as plain text with one paragraph per line.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::error::Error;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the text of every paragraph (`w:p`) of a WordprocessingML body.
pub fn docx_paragraphs(document_xml: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let mut reader = Reader::from_str(document_xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                // A self-closing paragraph is an empty line
                if e.name().as_ref() == b"w:p" {
                    paragraphs.push(String::new());
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_paragraph && in_text => {
                current.push_str(&t.decode()?);
            }
            Event::GeneralRef(r) if in_paragraph && in_text => {
                let name = r.decode()?;
                if let Some(resolved) = resolve_predefined_entity(&name) {
                    current.push_str(resolved);
                } else if let Some(ch) = r.resolve_char_ref()? {
                    current.push(ch);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Paragraphs of the `.docx` file held in `bytes`.
pub fn read_docx(bytes: Vec<u8>) -> Result<Vec<String>, Box<dyn Error>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    docx_paragraphs(&xml)
}

/// Keep the paragraphs that are URLs, trimmed.
pub fn urls_from_paragraphs<I, S>(paragraphs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paragraphs
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| p.starts_with("http"))
        .collect()
}

/// Load the monitored URLs from the document at `path`.
///
/// # Errors
///
/// Fails when the file is missing or unreadable, or when a `.docx` file is
/// not a valid document.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub async fn load_urls(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let bytes = fs::read(path).await?;
    let is_docx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));

    let urls = if is_docx {
        urls_from_paragraphs(read_docx(bytes)?)
    } else {
        urls_from_paragraphs(String::from_utf8(bytes)?.lines())
    };
    info!(count = urls.len(), "Loaded monitored URLs");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Pages to monitor</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">  https://ec.europa.eu/commission/presscorner/home/en </w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>https://news.example/list?</w:t></w:r><w:r><w:t>a=1&amp;b=2</w:t></w:r></w:p>
    <w:p><w:r><w:t>see http://not-at-start.example</w:t></w:r></w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#;

    fn docx_bytes(xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs() {
        let paragraphs = docx_paragraphs(DOCUMENT_XML).unwrap();
        assert_eq!(paragraphs.len(), 5);
        assert_eq!(paragraphs[0], "Pages to monitor");
        assert_eq!(paragraphs[2], "");
        assert_eq!(paragraphs[3], "https://news.example/list?a=1&b=2");
    }

    #[test]
    fn test_urls_from_paragraphs() {
        let urls = urls_from_paragraphs(docx_paragraphs(DOCUMENT_XML).unwrap());
        assert_eq!(
            urls,
            vec![
                "https://ec.europa.eu/commission/presscorner/home/en",
                "https://news.example/list?a=1&b=2",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_urls_from_docx() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.docx");
        std::fs::write(&path, docx_bytes(DOCUMENT_XML)).unwrap();

        let urls = load_urls(&path).await.unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_load_urls_from_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "# monitored\nhttps://a.example\n\n  http://b.example  \nftp://c.example\n").unwrap();

        let urls = load_urls(&path).await.unwrap();
        assert_eq!(urls, vec!["https://a.example", "http://b.example"]);
    }

    #[tokio::test]
    async fn test_load_urls_missing_or_invalid() {
        let dir = TempDir::new().unwrap();
        assert!(load_urls(&dir.path().join("missing.docx")).await.is_err());

        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(load_urls(&path).await.is_err());
    }
}
