// src/pipeline/readers/tsv_reader.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::readers::BaseReader;

/// Reads delimiter-separated review data line by line.
///
/// Lines are decoded lossily: invalid UTF-8 sequences become U+FFFD instead of
/// failing the whole run, since the published dumps are not always clean.
pub struct TsvReader {
    source: String,
    inner: Box<dyn BufRead>,
}

impl TsvReader {
    /// Opens the file at `path`. Failure is fatal to the run.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PipelineError::SourceNotFound {
            path: PathBuf::from(path),
            source,
        })?;
        debug!(path = %path.display(), "Opened input source");
        Ok(TsvReader {
            source: path.display().to_string(),
            inner: Box::new(BufReader::new(file)),
        })
    }

    /// Wraps an already open stream, e.g. stdin or an in-memory buffer.
    pub fn from_reader<R: BufRead + 'static>(source: impl Into<String>, reader: R) -> Self {
        TsvReader {
            source: source.into(),
            inner: Box::new(reader),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl BaseReader for TsvReader {
    fn read_lines(self) -> Box<dyn Iterator<Item = Result<String>>> {
        Box::new(LossyLines {
            reader: self.inner,
            buf: Vec::new(),
        })
    }
}

struct LossyLines {
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
}

impl Iterator for LossyLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(PipelineError::from(e))),
        }
    }
}
