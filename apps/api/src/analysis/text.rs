use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Body part of a Word document inside the .docx package.
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum JdTextError {
    #[error("Unsupported file type '{0}'. Upload a .txt, .pdf or .docx job description.")]
    UnsupportedFormat(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read Word document: {0}")]
    Docx(String),

    #[error("Could not extract text from the file.")]
    Empty,
}

/// Extracts plain text from an uploaded job description (.txt, .pdf or .docx).
pub fn extract_jd_text(file_name: &str, bytes: &[u8]) -> Result<String, JdTextError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" => String::from_utf8_lossy(bytes).into_owned(),
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| JdTextError::Pdf(e.to_string()))?,
        "docx" => extract_docx_text(bytes)?,
        other => return Err(JdTextError::UnsupportedFormat(other.to_string())),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(JdTextError::Empty);
    }
    Ok(text.to_string())
}

/// Text runs (`w:t`) of the document body, one line per paragraph.
fn extract_docx_text(bytes: &[u8]) -> Result<String, JdTextError> {
    let docx_err = |e: &dyn std::fmt::Display| JdTextError::Docx(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| docx_err(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| docx_err(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(&e))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event().map_err(|e| docx_err(&e))? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().map_err(|e| docx_err(&e))?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}
