//! Text extraction for uploaded documents.
//!
//! Dispatches on file extension: plain text, PDF (`pdf-extract`), DOCX (the
//! `word/document.xml` part of the archive) and legacy DOC (best-effort lossy text).

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;

/// Extensions accepted for uploads, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Text,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Resolves a document on disk to its raw text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, AppError>;
}

/// Default extractor backed by the file-format libraries.
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, path: &Path) -> Result<String, AppError> {
        let kind = DocumentKind::from_path(path).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type '{}'. Allowed: .pdf, .docx, .doc, .txt",
                path.display()
            ))
        })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::UnprocessableEntity(format!("Could not read '{}': {e}", path.display()))
        })?;

        let shown = path.display().to_string();
        let text = tokio::task::spawn_blocking(move || extract_from_bytes(kind, &bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
            .map_err(|reason| {
                AppError::UnprocessableEntity(format!(
                    "Failed to extract text from '{shown}': {reason}"
                ))
            })?;

        debug!(path = %shown, kind = ?kind, chars = text.len(), "Extracted document text");
        Ok(text)
    }
}

fn extract_from_bytes(kind: DocumentKind, bytes: &[u8]) -> Result<String, String> {
    match kind {
        DocumentKind::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string()),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::Doc => Ok(extract_legacy_doc(bytes)),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("not a Word document: {e}"))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| e.to_string())?;
    Ok(document_xml_to_text(&xml))
}

/// Collects the text runs (`<w:t>`) of a WordprocessingML body.
/// Paragraph ends and breaks become newlines, tabs become `\t`.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;
    let mut in_text_run = false;
    let mut in_run = false;

    while let Some(open) = rest.find('<') {
        if in_text_run {
            out.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match name {
            "w:r" => in_run = !tag.starts_with('/') && !tag.ends_with('/'),
            "w:t" => in_text_run = !tag.starts_with('/') && !tag.ends_with('/'),
            "w:p" if tag.starts_with('/') => out.push('\n'),
            "w:br" | "w:cr" if in_run => out.push('\n'),
            // Outside a run, `w:tab` is a tab-stop definition in paragraph properties.
            "w:tab" if in_run => out.push('\t'),
            _ => {}
        }

        rest = &rest[open + close + 1..];
    }

    out.trim_end().to_string()
}

/// Decodes the predefined XML entities and numeric character references.
/// Unknown or malformed references are kept verbatim.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Legacy binary `.doc` has no stable text layer; keep printable runs only.
fn extract_legacy_doc(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| {
            if c == '\n' || c == '\t' || (!c.is_control() && c != char::REPLACEMENT_CHARACTER) {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
