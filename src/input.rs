// Opens a gzip dump and yields it line by line.
// Lines are read as bytes so a stray non-UTF-8 byte in a dump does not stop the run.

use crate::error::DumpError;
use crate::progress::CountingReader;
use flate2::read::MultiGzDecoder;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_BYTES: usize = 256 * 1024;

pub type DumpReader = BufReader<MultiGzDecoder<CountingReader<File>>>;

// Open `path` as a (possibly multi-member) gzip stream.
pub fn open_dump(path: &Path, bar: Option<ProgressBar>) -> Result<DumpReader, DumpError> {
    let file = File::open(path).map_err(|source| DumpError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let counted = CountingReader::new(file, bar);
    Ok(BufReader::with_capacity(
        READ_BUFFER_BYTES,
        MultiGzDecoder::new(counted),
    ))
}

// Reads lines with their terminators stripped, reusing one byte buffer.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: u64,
    bytes_read: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            bytes_read: 0,
        }
    }

    // Next line without "\n" or "\r\n"; None at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, DumpError> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| DumpError::Read {
                line: self.line_number + 1,
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        self.bytes_read += n as u64;
        strip_line_ending(&mut self.buf);
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    // 1-based number of the line last returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    // Decompressed bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

// Not-gzip input surfaces from flate2 as InvalidInput/InvalidData on first read.
pub fn is_corrupt_stream(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn lines_of(input: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(Cursor::new(input.to_vec()));
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn strips_lf_and_crlf() {
        assert_eq!(lines_of(b"a\nb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(lines_of(b"\n\nx\n"), vec!["", "", "x"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(lines_of(b"a\xffb\n"), vec!["a\u{fffd}b"]);
    }

    #[test]
    fn tracks_line_numbers_and_bytes() {
        let mut reader = LineReader::new(Cursor::new(b"ab\ncd\n".to_vec()));
        reader.next_line().unwrap();
        reader.next_line().unwrap();
        assert_eq!(reader.line_number(), 2);
        assert_eq!(reader.bytes_read(), 6);
        assert!(reader.next_line().unwrap().is_none());
    }

    #[test]
    fn reads_multi_member_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.sql.gz");
        let mut bytes = Vec::new();
        for part in ["one\n", "two\n"] {
            let mut enc = GzEncoder::new(Vec::new(), Compression::default());
            enc.write_all(part.as_bytes()).unwrap();
            bytes.extend(enc.finish().unwrap());
        }
        std::fs::write(&path, bytes).unwrap();

        let mut reader = LineReader::new(open_dump(&path, None).unwrap());
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("two"));
        assert!(reader.next_line().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = open_dump(Path::new("/nonexistent/dump.sql.gz"), None).unwrap_err();
        assert!(matches!(err, DumpError::Open { .. }));
    }

    #[test]
    fn plain_text_is_not_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.sql");
        std::fs::write(&path, "INSERT INTO `t` VALUES (1);\n").unwrap();
        let mut reader = LineReader::new(open_dump(&path, None).unwrap());
        match reader.next_line() {
            Err(DumpError::Read { line, source }) => {
                assert_eq!(line, 1);
                assert!(is_corrupt_stream(&source));
            }
            other => panic!("expected read error, got {:?}", other.map(|_| ())),
        }
    }
}
