mod csv;

pub use csv::{CsvExporter, DEFAULT_EXPORT_FILENAME};
