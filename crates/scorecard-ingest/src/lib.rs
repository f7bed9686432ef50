pub mod discovery;
pub mod error;
pub mod pmml;
pub mod schema;
pub mod spreadsheet;

pub use discovery::{FileSet, list_files, resolve_file_set};
pub use error::{IngestError, InputKind, LookupError, Result};
pub use pmml::{PmmlExtractor, parse_pmml};
pub use schema::SchemaExtractor;
pub use spreadsheet::{
    DATA_SHEET, METHOD_COLUMN, NAME_COLUMN, SpreadsheetExtractor, SpreadsheetRow,
};
