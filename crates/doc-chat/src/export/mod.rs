//! Transcript exporters
//!
//! Every exporter is a pure function of the transcript and always writes
//! every entry, in order.

pub mod docx;
pub mod pdf;
pub mod table;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::session::Transcript;
use crate::types::document::{DOCX_MIME, XLSX_MIME};

/// Downloadable transcript formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated A4 document
    Pdf,
    /// Word document with "You:" / "Chatbot:" headings
    Docx,
    /// Delimited text table
    Csv,
    /// Spreadsheet table
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Pdf, Self::Docx, Self::Csv, Self::Xlsx];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => DOCX_MIME,
            Self::Csv => "text/csv",
            Self::Xlsx => XLSX_MIME,
        }
    }

    /// Suggested download file name
    pub fn file_name(&self) -> String {
        format!("chat_history.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" | "word" => Ok(Self::Docx),
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(Error::UnsupportedFileType(format!(
                "{} - expected pdf, docx, csv or xlsx",
                other
            ))),
        }
    }
}

/// Generated export bytes, regenerated on every request
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Serialize the transcript into the selected format
pub fn export(format: ExportFormat, transcript: &Transcript) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::export_pdf(transcript)?,
        ExportFormat::Docx => docx::export_docx(transcript)?,
        ExportFormat::Csv => table::export_csv(transcript)?,
        ExportFormat::Xlsx => table::export_xlsx(transcript)?,
    };

    tracing::info!(
        "Exported {} transcript entries as {} ({} bytes)",
        transcript.len(),
        format,
        bytes.len()
    );

    Ok(ExportArtifact { format, bytes })
}
