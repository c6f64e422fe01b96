// mysqldump-table-csv: pull one table's rows out of a gzip mysqldump as CSV.
//
// The pipeline is input -> parser::insert (line filter) -> parser::values
// (VALUES tokenizer) -> writer, driven by extract::TableExtractor.

pub mod error;
pub mod extract;
pub mod input;
pub mod interrupt;
pub mod logger;
pub mod parser;
pub mod progress;
pub mod writer;

pub use error::{DumpError, TokenizeError};
pub use extract::{StopReason, Summary, TableExtractor};
pub use interrupt::InterruptFlag;
pub use parser::Row;
pub use writer::{CsvSink, SinkState};
