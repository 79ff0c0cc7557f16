//! Turns event payloads into per-race JSON files: locate the embedded HTML
//! table, parse it into records, write them under the resolved race name.

pub mod error;
pub mod table;
pub mod writer;

pub use error::{ExportError, TableError};
pub use table::{extract_table, locate_table_html, parse_table, Table};
pub use writer::{output_path, write_records};
