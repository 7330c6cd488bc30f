//! JSON Lines frame source and sink
//!
//! One frame object per line; blank lines are skipped. Parse failures carry
//! the 1-based line number so a bad recording can be located.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

use super::frame::Frame;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to read frames: {0}")]
    Io(#[from] io::Error),

    #[error("malformed frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Iterator over the frames of a JSON Lines stream
pub struct FrameReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl FrameReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(FrameError::Io(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(&line).map_err(|source| FrameError::Parse {
                    line: self.line_no,
                    source,
                }),
            );
        }
    }
}

/// Writes frames as JSON Lines
pub struct FrameWriter<W: Write> {
    out: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write(&mut self, frame: &Frame) -> Result<(), FrameError> {
        let line = serde_json::to_string(frame).map_err(FrameError::Encode)?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FrameError> {
        self.out.flush()?;
        Ok(())
    }
}
