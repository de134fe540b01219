//! Multi-format text extraction

use calamine::Reader;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::ingestion::table::render_table;
use crate::types::{DocumentFormat, DocumentPayload};

/// Plain text pulled out of one uploaded document
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    /// Source format
    pub format: DocumentFormat,
    /// Original file name, when known
    pub filename: Option<String>,
    /// Full textual content, structure flattened
    pub text: String,
    /// SHA-256 of `text`
    pub content_hash: String,
    /// Page count (PDF only)
    pub page_count: Option<u32>,
}

/// Converts document payloads into plain text
#[derive(Debug, Clone)]
pub struct FileParser {
    pdf_timeout: Duration,
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl FileParser {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pdf_timeout: Duration::from_secs(config.pdf_timeout_secs),
        }
    }

    /// Extract the text of a payload using the extractor for its declared format
    pub fn extract(&self, payload: DocumentPayload) -> Result<ExtractedDocument> {
        let DocumentPayload {
            format,
            data,
            filename,
        } = payload;

        if data.is_empty() {
            return Err(Error::extraction(format, "file is empty"));
        }

        let (text, page_count) = match format {
            DocumentFormat::Pdf => {
                let pages = self.parse_pdf(&data)?;
                let count = pages.len() as u32;
                (pages.join("\n"), Some(count))
            }
            DocumentFormat::Csv => (Self::parse_csv(&data)?, None),
            DocumentFormat::Xlsx => (Self::parse_xlsx(&data)?, None),
            DocumentFormat::Docx => (Self::parse_docx(&data)?, None),
        };

        tracing::info!(
            "Extracted {} characters from {} ({})",
            text.chars().count(),
            filename.as_deref().unwrap_or("upload"),
            format
        );

        Ok(ExtractedDocument {
            format,
            filename,
            content_hash: hash_content(&text),
            text,
            page_count,
        })
    }

    /// Extract PDF text page by page, in document order
    fn parse_pdf(&self, data: &[u8]) -> Result<Vec<String>> {
        let pages = match self.extract_pdf_pages_with_timeout(data) {
            Ok(pages) => pages,
            Err(reason) => {
                tracing::warn!("pdf-extract failed ({}), using lopdf fallback", reason);
                Self::extract_pdf_pages_fallback(data)?
            }
        };

        Ok(pages.iter().map(|page| clean_pdf_page(page)).collect())
    }

    /// Run pdf-extract on a worker thread so a pathological font cannot hang the caller
    fn extract_pdf_pages_with_timeout(&self, data: &[u8]) -> std::result::Result<Vec<String>, String> {
        use std::sync::mpsc;
        use std::thread;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem_by_pages(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.pdf_timeout) {
            Ok(Ok(pages)) => {
                let _ = handle.join();
                Ok(pages)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e.to_string())
            }
            // The worker cannot be killed; it is left to finish on its own.
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(format!("timed out after {:?}", self.pdf_timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err("extraction thread panicked".to_string()),
        }
    }

    /// Fallback PDF extraction using lopdf; a page that cannot be read yields an empty segment
    fn extract_pdf_pages_fallback(data: &[u8]) -> Result<Vec<String>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(DocumentFormat::Pdf, format!("failed to load PDF: {}", e)))?;

        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_number| {
                doc.extract_text(&[page_number]).unwrap_or_else(|e| {
                    tracing::debug!("No text on page {}: {}", page_number, e);
                    String::new()
                })
            })
            .collect();

        Ok(pages)
    }

    /// Parse CSV (header row assumed) into a linearised table
    fn parse_csv(data: &[u8]) -> Result<String> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| Error::extraction(DocumentFormat::Csv, e.to_string()))?
            .clone();

        if headers.is_empty() {
            return Err(Error::extraction(DocumentFormat::Csv, "no columns found"));
        }

        let mut rows = vec![headers.iter().map(str::to_string).collect::<Vec<_>>()];
        for record in reader.records() {
            let record = record.map_err(|e| Error::extraction(DocumentFormat::Csv, e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(render_table(rows))
    }

    /// Parse the first sheet of an Excel workbook into a linearised table
    fn parse_xlsx(data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::extraction(DocumentFormat::Xlsx, e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::extraction(DocumentFormat::Xlsx, "workbook has no sheets"))?
            .map_err(|e| Error::extraction(DocumentFormat::Xlsx, e.to_string()))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

        Ok(render_table(rows))
    }

    /// Parse DOCX paragraphs, one per line
    fn parse_docx(data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction(DocumentFormat::Docx, e.to_string()))?;

        let lines: Vec<String> = doc
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Concatenated text of one DOCX paragraph
pub(crate) fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        collect_paragraph_child(child, &mut text);
    }
    text
}

fn collect_paragraph_child(child: &docx_rs::ParagraphChild, text: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => {
            for child in &run.children {
                match child {
                    docx_rs::RunChild::Text(t) => text.push_str(&t.text),
                    docx_rs::RunChild::Tab(_) => text.push('\t'),
                    docx_rs::RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for child in &link.children {
                collect_paragraph_child(child, text);
            }
        }
        _ => {}
    }
}

fn cell_to_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => s.clone(),
        calamine::Data::Error(e) => e.to_string(),
    }
}

/// Strip NULs and trailing whitespace left behind by PDF text engines
fn clean_pdf_page(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Hash content for change detection
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
