//! Tabular transcript export: one row per entry under a "Query" / "Response" header

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{Error, Result};
use crate::session::Transcript;

/// Header row for both tabular formats
pub const HEADERS: [&str; 2] = ["Query", "Response"];

/// Worksheet name used by the spreadsheet export
pub const SHEET_NAME: &str = "Chat History";

/// Render the transcript as CSV
pub fn export_csv(transcript: &Transcript) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(HEADERS).map_err(csv_error)?;
    for entry in transcript {
        writer
            .write_record([entry.question(), entry.answer()])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::export(format!("failed to flush CSV: {}", e)))
}

/// Render the transcript as a single-sheet XLSX workbook.
///
/// Cells are never truncated: a question or answer longer than Excel's
/// 32,767 character cell limit fails the whole export with `Error::Export`.
pub fn export_xlsx(transcript: &Transcript) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    for (col, title) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(xlsx_error)?;
    }
    for (i, entry) in transcript.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, entry.question()).map_err(xlsx_error)?;
        sheet.write_string(row, 1, entry.answer()).map_err(xlsx_error)?;
    }
    sheet.set_column_width(0, 40).map_err(xlsx_error)?;
    sheet.set_column_width(1, 80).map_err(xlsx_error)?;

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn csv_error(e: csv::Error) -> Error {
    Error::export(format!("failed to write CSV: {}", e))
}

fn xlsx_error(e: XlsxError) -> Error {
    Error::export(format!("failed to write XLSX: {}", e))
}
