// CSV output for extracted rows.
// A reader that goes away early (e.g. `| head`) is a normal way for a run to end,
// so a broken pipe is reported as SinkState::Closed instead of an error.

use crate::error::DumpError;
use csv::{Terminator, Writer, WriterBuilder};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Open,
    Closed,
}

pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    rows_written: u64,
    state: SinkState,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        // Rows of one table can differ in length when a value trips the
        // paren heuristic, so records are not forced to a fixed width.
        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(line_terminator())
            .from_writer(out);
        Self {
            writer,
            rows_written: 0,
            state: SinkState::Open,
        }
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<SinkState, DumpError> {
        if self.state == SinkState::Closed {
            return Ok(SinkState::Closed);
        }
        match self.writer.write_record(row) {
            Ok(()) => {
                self.rows_written += 1;
                Ok(SinkState::Open)
            }
            Err(err) => self.fail(csv_io_error(err)),
        }
    }

    pub fn flush(&mut self) -> Result<SinkState, DumpError> {
        if self.state == SinkState::Closed {
            return Ok(SinkState::Closed);
        }
        match self.writer.flush() {
            Ok(()) => Ok(SinkState::Open),
            Err(err) => self.fail(err),
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    fn fail(&mut self, err: io::Error) -> Result<SinkState, DumpError> {
        if err.kind() == io::ErrorKind::BrokenPipe {
            log::debug!("CsvSink: output closed after {} rows", self.rows_written);
            self.state = SinkState::Closed;
            return Ok(SinkState::Closed);
        }
        Err(DumpError::Write(err))
    }
}

fn csv_io_error(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => err,
        other => io::Error::new(io::ErrorKind::Other, format!("{:?}", other)),
    }
}

#[cfg(windows)]
fn line_terminator() -> Terminator {
    Terminator::CRLF
}

#[cfg(not(windows))]
fn line_terminator() -> Terminator {
    Terminator::Any(b'\n')
}
