//! Uploaded document formats and payloads

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// MIME type of `.docx` uploads
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type of `.xlsx` uploads
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Comma-separated values with a header row
    Csv,
    /// Microsoft Word document (.docx)
    Docx,
    /// Excel spreadsheet (.xlsx), first sheet only
    Xlsx,
}

impl DocumentFormat {
    /// All formats, in the order they are offered to users
    pub const ALL: [DocumentFormat; 4] = [Self::Pdf, Self::Csv, Self::Docx, Self::Xlsx];

    /// Detect format from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Detect format from a MIME type, ignoring any parameters
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "text/csv" => Some(Self::Csv),
            DOCX_MIME => Some(Self::Docx),
            XLSX_MIME => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Detect format from a file name: extension first, then a guessed MIME type
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("");

        if let Some(format) = Self::from_extension(extension) {
            return Ok(format);
        }

        mime_guess::from_path(filename)
            .iter()
            .find_map(|mime| Self::from_mime(mime.essence_str()))
            .ok_or_else(|| Error::UnsupportedFileType(format!("{} - expected pdf, csv, docx or xlsx", filename)))
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }

    /// Canonical MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
            Self::Docx => DOCX_MIME,
            Self::Xlsx => XLSX_MIME,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Docx => "DOCX",
            Self::Xlsx => "Excel",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw uploaded file plus its declared format.
///
/// Consumed by a single extraction call.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub format: DocumentFormat,
    pub data: Bytes,
    /// Original file name, when known
    pub filename: Option<String>,
}

impl DocumentPayload {
    pub fn new(format: DocumentFormat, data: impl Into<Bytes>) -> Self {
        Self {
            format,
            data: data.into(),
            filename: None,
        }
    }

    /// Build a payload whose format is detected from the file name
    pub fn from_file(filename: &str, data: impl Into<Bytes>) -> Result<Self> {
        let format = DocumentFormat::from_filename(filename)?;
        Ok(Self {
            format,
            data: data.into(),
            filename: Some(filename.to_string()),
        })
    }

    /// Name used in logs and summaries
    pub fn display_filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("document.{}", self.format.extension()))
    }
}
