// 🧾 Record Parser - raw lines → (name, day) check-ins
//
// Each line is `<name> <day>` separated by whitespace. Anything that does
// not split into exactly two tokens is dropped without an error.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

// ============================================================================
// CHECK-IN
// ============================================================================

/// One `(name, day)` observation from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub name: String,
    /// Day label, lowercased for lookup
    pub day_label: String,
    /// 1-based line in the source (for diagnostics)
    pub line_number: usize,
}

/// Parse a single raw line. Returns `None` for malformed lines.
pub fn parse_line(line: &str, line_number: usize) -> Option<CheckIn> {
    let mut tokens = line.split_whitespace();
    let (name, day) = (tokens.next()?, tokens.next()?);
    if tokens.next().is_some() {
        return None;
    }

    Some(CheckIn {
        name: name.to_string(),
        day_label: day.to_lowercase(),
        line_number,
    })
}

// ============================================================================
// STREAMING READER
// ============================================================================

/// Counters collected while reading a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines consumed (malformed ones included)
    pub lines_read: usize,
    /// Lines discarded for not having exactly two tokens
    pub malformed: usize,
    /// True when `max_records` stopped reading before the source ended
    pub truncated: bool,
}

/// Lazy iterator over the check-ins of a buffered source.
///
/// `max_records` caps the number of input lines consumed; `None` reads the
/// whole source. Lines that are not valid UTF-8 count as malformed; only a
/// failing read surfaces as `Err`.
pub struct CheckInReader<R> {
    reader: R,
    buf: Vec<u8>,
    max_records: Option<usize>,
    stats: ParseStats,
    done: bool,
}

impl<R: BufRead> CheckInReader<R> {
    pub fn new(reader: R) -> Self {
        CheckInReader {
            reader,
            buf: Vec::new(),
            max_records: None,
            stats: ParseStats::default(),
            done: false,
        }
    }

    /// Builder pattern: stop after `max` input lines
    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn at_cap(&self) -> bool {
        self.max_records
            .map_or(false, |max| self.stats.lines_read >= max)
    }

    /// Next raw line into `buf`; `false` at end of input
    fn read_raw_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        Ok(self.reader.read_until(b'\n', &mut self.buf)? > 0)
    }

    /// Whether anything other than blank lines remains past the cap
    fn has_unread_content(&mut self) -> bool {
        loop {
            match self.read_raw_line() {
                Ok(true) => {
                    if !String::from_utf8_lossy(&self.buf).trim().is_empty() {
                        return true;
                    }
                }
                Ok(false) | Err(_) => return false,
            }
        }
    }
}

impl<R: BufRead> Iterator for CheckInReader<R> {
    type Item = io::Result<CheckIn>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.at_cap() {
                self.done = true;
                self.stats.truncated = self.has_unread_content();
                return None;
            }

            match self.read_raw_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }

            self.stats.lines_read += 1;
            let line_number = self.stats.lines_read;
            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(
                        line = line_number,
                        error = %e,
                        "discarding non-UTF-8 check-in line"
                    );
                    self.stats.malformed += 1;
                    continue;
                }
            };

            match parse_line(line, line_number) {
                Some(check_in) => return Some(Ok(check_in)),
                None => {
                    if !line.trim().is_empty() {
                        tracing::debug!(
                            line = line_number,
                            content = %line.trim(),
                            "discarding malformed check-in line"
                        );
                    }
                    self.stats.malformed += 1;
                }
            }
        }
        None
    }
}

// ============================================================================
// FILE SOURCE
// ============================================================================

/// A path-backed check-in source. Every `open()` starts from the beginning,
/// so the same source can be read any number of times.
#[derive(Debug, Clone)]
pub struct CheckInSource {
    path: PathBuf,
    max_records: Option<usize>,
}

impl CheckInSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CheckInSource {
            path: path.as_ref().to_path_buf(),
            max_records: None,
        }
    }

    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<CheckInReader<BufReader<File>>, PipelineError> {
        let file = File::open(&self.path).map_err(|e| PipelineError::from_io(&self.path, e))?;
        Ok(CheckInReader::new(BufReader::new(file)).with_max_records(self.max_records))
    }
}

// ============================================================================
// TESTS
// ============================================================================
