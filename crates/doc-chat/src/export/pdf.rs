//! Paginated A4 transcript export
//!
//! Layout is computed first as plain data (`PdfLayout`) and then rendered
//! with lopdf, so pagination can be checked without parsing PDF bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::session::Transcript;

/// A4 width in points
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height in points
pub const PAGE_HEIGHT: f32 = 841.89;
/// Distance from the top edge to the first line of every page
pub const TOP_MARGIN: f32 = 50.0;
/// Left edge of every line
pub const LEFT_MARGIN: f32 = 50.0;
/// Vertical advance after each line
pub const LINE_HEIGHT: f32 = 20.0;
/// Extra vertical space after each transcript entry
pub const ENTRY_SPACING: f32 = 10.0;
/// An answer line is never drawn below this height; a new page starts instead
pub const LINE_BOTTOM_LIMIT: f32 = 40.0;
/// After an entry's spacing, a cursor below this height starts a new page
pub const ENTRY_BOTTOM_LIMIT: f32 = 50.0;
/// Maximum words per rendered answer line
pub const WORDS_PER_LINE: usize = 10;
/// Font size for every line
pub const FONT_SIZE: f32 = 12.0;

/// How a line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Bold red "You: ..." line
    Question,
    /// Plain black "Chatbot: ..." line
    Answer,
}

/// One line of text at a fixed vertical position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Baseline, in points from the bottom edge
    pub y: f32,
    pub text: String,
    pub style: LineStyle,
}

/// Lines of every page, in page order
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub pages: Vec<Vec<PlacedLine>>,
}

/// Split text into lines of at most `max_words` whitespace-delimited words
pub fn wrap_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Place every transcript entry on A4 pages.
///
/// Questions are a single unwrapped line, even when wider than the page.
/// Answers are wrapped at `WORDS_PER_LINE` words and break to a new page
/// whenever the cursor has dropped below `LINE_BOTTOM_LIMIT`.
pub fn layout_transcript(transcript: &Transcript) -> PdfLayout {
    let top = PAGE_HEIGHT - TOP_MARGIN;
    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut y = top;

    for entry in transcript {
        push_line(&mut pages, y, format!("You: {}", entry.question()), LineStyle::Question);
        y -= LINE_HEIGHT;

        for line in wrap_words(entry.answer(), WORDS_PER_LINE) {
            if y < LINE_BOTTOM_LIMIT {
                pages.push(Vec::new());
                y = top;
            }
            push_line(&mut pages, y, format!("Chatbot: {}", line), LineStyle::Answer);
            y -= LINE_HEIGHT;
        }

        y -= ENTRY_SPACING;
        if y < ENTRY_BOTTOM_LIMIT {
            pages.push(Vec::new());
            y = top;
        }
    }

    // A break after the final entry leaves a blank trailing page
    if pages.len() > 1 && pages.last().is_some_and(Vec::is_empty) {
        pages.pop();
    }

    PdfLayout { pages }
}

fn push_line(pages: &mut [Vec<PlacedLine>], y: f32, text: String, style: LineStyle) {
    if let Some(page) = pages.last_mut() {
        page.push(PlacedLine { y, text, style });
    }
}

/// Render the transcript as PDF bytes.
///
/// Text is drawn with the standard Helvetica fonts in WinAnsi encoding, so
/// characters outside that code page (Cyrillic, Arabic, CJK, ...) are written
/// as '?' and cannot be read back from the artifact.
pub fn export_pdf(transcript: &Transcript) -> Result<Vec<u8>> {
    render_layout(&layout_transcript(transcript))
}

/// Render a computed layout with the standard Helvetica fonts
pub fn render_layout(layout: &PdfLayout) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for lines in &layout.pages {
        let content = Content {
            operations: lines.iter().flat_map(line_operations).collect::<Vec<_>>(),
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::export(format!("failed to encode page content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| Error::export(format!("failed to write PDF: {}", e)))?;

    Ok(buffer)
}

fn line_operations(line: &PlacedLine) -> Vec<Operation> {
    let (font, rgb) = match line.style {
        LineStyle::Question => ("F2", [1.0, 0.0, 0.0]),
        LineStyle::Answer => ("F1", [0.0, 0.0, 0.0]),
    };

    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), real(FONT_SIZE)]),
        Operation::new("rg", rgb.iter().map(|c| real(*c)).collect()),
        Operation::new("Td", vec![real(LEFT_MARGIN), real(line.y)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Encode text for the WinAnsi-encoded standard fonts; unmappable characters become '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '\t' | '\n' | '\r' => b' ',
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
