//! Word transcript export

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::session::Transcript;

/// Paragraph style id used for the "You:" / "Chatbot:" headings
pub const HEADING_STYLE: &str = "Heading2";

/// Render the transcript as a DOCX document.
///
/// Each entry becomes four paragraphs: a "You:" heading, the question,
/// a "Chatbot:" heading and the answer.
pub fn export_docx(transcript: &Transcript) -> Result<Vec<u8>> {
    let mut docx = Docx::new().add_style(
        Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("Heading 2")
            .bold()
            .size(26),
    );

    for entry in transcript {
        docx = docx
            .add_paragraph(heading("You:"))
            .add_paragraph(body(entry.question()))
            .add_paragraph(heading("Chatbot:"))
            .add_paragraph(body(entry.answer()));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| Error::export(format!("failed to write DOCX: {}", e)))?;

    Ok(cursor.into_inner())
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new()
        .style(HEADING_STYLE)
        .add_run(Run::new().add_text(text))
}

/// Body paragraph; embedded newlines become line breaks
fn body(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line.trim_end_matches('\r'));
    }
    Paragraph::new().add_run(run)
}
