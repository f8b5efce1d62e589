//! Line-level primitives for CNAB files.
//!
//! [`LineWriter`] accumulates fixed-width lines separated by the line break
//! marker; [`Lines`] splits a stream back on the same marker.

use crate::limits::{FINAL_CONTROL_BYTE, LINE_BREAK};

// =============================================================================
// DECODING
// =============================================================================

/// Iterator over the lines of a CNAB stream.
///
/// Splits on [`LINE_BREAK`] exactly like a byte split: a trailing marker
/// yields a final empty line, and an empty stream yields one empty line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [u8],
    done: bool,
}

impl<'a> Lines<'a> {
    /// Creates a splitter over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            rest: data,
            done: false,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.done {
            return None;
        }
        match self
            .rest
            .windows(LINE_BREAK.len())
            .position(|w| w == LINE_BREAK)
        {
            Some(pos) => {
                let line = &self.rest[..pos];
                self.rest = &self.rest[pos + LINE_BREAK.len()..];
                Some(line)
            }
            None => {
                self.done = true;
                Some(self.rest)
            }
        }
    }
}

/// Returns true for lines that carry no record: empty lines and a lone
/// final control byte.
#[inline]
pub fn is_blank_line(line: &[u8]) -> bool {
    matches!(line, [] | [FINAL_CONTROL_BYTE])
}

// =============================================================================
// ENCODING
// =============================================================================

/// Output buffer for a CNAB file.
///
/// Every line is exactly `line_width` bytes; [`LINE_BREAK`] is written
/// between lines, never after the last one.
#[derive(Debug, Clone)]
pub struct LineWriter {
    buf: Vec<u8>,
    line_width: usize,
    lines: usize,
}

impl LineWriter {
    /// Creates a writer for lines of `line_width` bytes.
    pub fn new(line_width: usize) -> Self {
        Self {
            buf: Vec::new(),
            line_width,
            lines: 0,
        }
    }

    /// Creates a writer with room for `lines` lines.
    pub fn with_capacity(line_width: usize, lines: usize) -> Self {
        Self {
            buf: Vec::with_capacity(lines * (line_width + LINE_BREAK.len())),
            line_width,
            lines: 0,
        }
    }

    /// Number of lines started so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Starts a new space-filled line and returns it for writing.
    pub fn begin_line(&mut self) -> &mut [u8] {
        if self.lines > 0 {
            self.buf.extend_from_slice(LINE_BREAK);
        }
        self.lines += 1;
        let start = self.buf.len();
        self.buf.resize(start + self.line_width, b' ');
        &mut self.buf[start..]
    }

    /// Appends [`FINAL_CONTROL_BYTE`].
    pub fn write_final_control_byte(&mut self) {
        self.buf.push(FINAL_CONTROL_BYTE);
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split() {
        let lines: Vec<_> = Lines::new(b"AAA\r\nBBB\r\nCCC").collect();
        assert_eq!(lines, [&b"AAA"[..], b"BBB", b"CCC"]);
    }

    #[test]
    fn test_lines_trailing_break() {
        let lines: Vec<_> = Lines::new(b"AAA\r\n").collect();
        assert_eq!(lines, [&b"AAA"[..], b""]);
    }

    #[test]
    fn test_lines_lone_lf_is_not_a_break() {
        let lines: Vec<_> = Lines::new(b"AA\nBB\n\rCC").collect();
        assert_eq!(lines, [&b"AA\nBB\n\rCC"[..]]);
    }

    #[test]
    fn test_lines_empty_input() {
        let lines: Vec<_> = Lines::new(b"").collect();
        assert_eq!(lines, [&b""[..]]);
    }

    #[test]
    fn test_blank_lines() {
        assert!(is_blank_line(b""));
        assert!(is_blank_line(&[FINAL_CONTROL_BYTE]));
        assert!(!is_blank_line(b" "));
    }

    #[test]
    fn test_writer_breaks_between_lines_only() {
        let mut writer = LineWriter::new(3);
        writer.begin_line().copy_from_slice(b"ABC");
        writer.begin_line()[0] = b'D';
        assert_eq!(writer.as_bytes(), b"ABC\r\nD  ");
        assert_eq!(writer.line_count(), 2);

        writer.write_final_control_byte();
        assert_eq!(writer.into_bytes(), b"ABC\r\nD  \x1A");
    }

    #[test]
    fn test_writer_single_line() {
        let mut writer = LineWriter::with_capacity(5, 1);
        writer.begin_line();
        assert_eq!(writer.len(), 5);
        assert_eq!(writer.as_bytes(), b"     ");
    }
}
