//! Streaming line scanner with a bounded header window.

use std::io::{self, BufRead};

use tracing::warn;

/// Iterator over the trimmed text lines of a byte stream.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Invalid UTF-8 is replaced rather than rejected. A read error ends the
/// stream; it is logged and not reported to the caller.
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    lines_read: usize,
    skip_lf: bool,
    done: bool,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
            lines_read: 0,
            skip_lf: false,
            done: false,
        }
    }

    /// Number of lines produced so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Read the next line into `buf` without its terminator.
    /// Returns `false` at end of input.
    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();

        // The `\n` of a `\r\n` pair split across two reads
        if self.skip_lf {
            self.skip_lf = false;
            if self.reader.fill_buf()?.first() == Some(&b'\n') {
                self.reader.consume(1);
            }
        }

        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(!self.buf.is_empty());
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    let terminator = available[end];
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    self.skip_lf = terminator == b'\r';
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_line() {
            Ok(false) => {
                self.done = true;
                None
            }
            Ok(true) => {
                self.lines_read += 1;
                Some(String::from_utf8_lossy(&self.buf).trim().to_string())
            }
            Err(e) => {
                warn!("Stopping scan after {} lines: {}", self.lines_read, e);
                self.done = true;
                None
            }
        }
    }
}

/// The first `capacity` lines of a file, kept for slicer detection.
#[derive(Debug, Clone)]
pub struct HeaderWindow {
    lines: Vec<String>,
    capacity: usize,
}

impl HeaderWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Keep `line` if the window is not full yet.
    pub fn offer(&mut self, line: &str) {
        if !self.is_full() {
            self.lines.push(line.to_string());
        }
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    /// The retained lines joined with newlines.
    pub fn blob(&self) -> String {
        self.lines.join("\n")
    }
}
