//! Document ingestion: per-format extraction and normalization

mod normalize;
mod parser;
mod table;

pub use normalize::{normalize, Context};
pub use parser::{ExtractedDocument, FileParser};
#[cfg(test)]
pub(crate) use parser::paragraph_text;
pub use table::{render_table, CELL_SEPARATOR};
