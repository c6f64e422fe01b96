// Extraction pipeline: read lines, keep INSERTs for one table, write their rows as CSV.
// Single pass, strictly sequential: each statement's rows are written before the
// next line is read.

use crate::error::{snippet, DumpError};
use crate::input::LineReader;
use crate::interrupt::InterruptFlag;
use crate::parser::insert::{values_sane, InsertClassifier};
use crate::parser::values::parse_rows;
use crate::writer::{CsvSink, SinkState};
use log::debug;
use std::fmt;
use std::io::{BufRead, Write};

const LOG_EVERY_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfInput,
    Interrupted,
    OutputClosed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::EndOfInput => "end of input",
            StopReason::Interrupted => "interrupted",
            StopReason::OutputClosed => "output closed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub lines: u64,
    pub statements: u64,
    pub rows: u64,
    pub stop: StopReason,
}

pub struct TableExtractor {
    classifier: InsertClassifier,
    table: String,
}

impl TableExtractor {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            classifier: InsertClassifier::new(),
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    // Run the whole pass. Rows already written stay written if a later line is fatal.
    pub fn run<R, W>(
        &self,
        reader: R,
        sink: &mut CsvSink<W>,
        interrupt: &InterruptFlag,
        log_progress: bool,
    ) -> Result<Summary, DumpError>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = LineReader::new(reader);
        let mut statements = 0u64;
        let mut last_logged = 0u64;
        let rows_before = sink.rows_written();

        let stop = loop {
            if interrupt.is_raised() {
                break StopReason::Interrupted;
            }
            let Some(line) = lines.next_line()? else {
                break StopReason::EndOfInput;
            };

            if log_progress && lines.bytes_read() - last_logged > LOG_EVERY_BYTES {
                debug!(
                    "TableExtractor: {} bytes decompressed, {} statements for {}",
                    lines.bytes_read(),
                    statements,
                    self.table
                );
                last_logged = lines.bytes_read();
            }

            let Some(values) = self.classifier.target_values(&line, &self.table) else {
                continue;
            };
            let line_number = lines.line_number();
            if !values_sane(values) {
                return Err(DumpError::MalformedValues {
                    line: line_number,
                    snippet: snippet(values),
                });
            }

            let rows = parse_rows(values).map_err(|source| DumpError::Tokenize {
                line: line_number,
                source,
            })?;
            statements += 1;
            debug!(
                "TableExtractor: line {} has {} rows for {}",
                line_number,
                rows.len(),
                self.table
            );

            if let Some(stop) = write_rows(&rows, sink, interrupt)? {
                break stop;
            }
        };

        let stop = match (stop, sink.flush()?) {
            (StopReason::EndOfInput | StopReason::Interrupted, SinkState::Closed) => {
                StopReason::OutputClosed
            }
            (stop, _) => stop,
        };

        Ok(Summary {
            lines: lines.line_number(),
            statements,
            rows: sink.rows_written() - rows_before,
            stop,
        })
    }
}

// Returns a stop reason when writing cannot or should not continue.
fn write_rows<W: Write>(
    rows: &[crate::parser::Row],
    sink: &mut CsvSink<W>,
    interrupt: &InterruptFlag,
) -> Result<Option<StopReason>, DumpError> {
    for row in rows {
        if interrupt.is_raised() {
            return Ok(Some(StopReason::Interrupted));
        }
        if sink.write_row(row)? == SinkState::Closed {
            return Ok(Some(StopReason::OutputClosed));
        }
    }
    Ok(None)
}
